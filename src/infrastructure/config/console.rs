//! Deployment-specific console settings (the white-label knobs).

use serde::Deserialize;

/// What a deployment of the console shows and loads.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Whether MPC controllers are loaded at all.
    #[serde(default = "default_load_mpc")]
    pub load_mpc: bool,
    /// Controller types offered when creating a new controller.
    #[serde(default = "default_mpc_device_list")]
    pub mpc_device_list: Vec<String>,
    /// Visible entries of the application menu, by name.
    #[serde(default = "default_main_menu_entries")]
    pub main_menu_entries: Vec<String>,
    /// Visible entries of the project menu, by name.
    #[serde(default = "default_project_menu_entries")]
    pub project_menu_entries: Vec<String>,
    /// `data.type` values that denote devices. Other records returned by the
    /// devices endpoint are charts.
    #[serde(default = "default_device_types")]
    pub device_types: Vec<String>,
    /// `data.type` values that denote ML model controllers.
    #[serde(default = "default_ml_model_types")]
    pub ml_model_types: Vec<String>,
}

const fn default_load_mpc() -> bool {
    true
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn default_mpc_device_list() -> Vec<String> {
    strings(&["EMS", "SetpointOptimizer", "PVProductionService", "ConsumptionService"])
}

fn default_main_menu_entries() -> Vec<String> {
    strings(&["Home", "Documentation"])
}

fn default_project_menu_entries() -> Vec<String> {
    strings(&[
        "Favorites",
        "Areas",
        "AI/ML",
        "Variables",
        "Workbench",
        "Documents",
        "Rules",
        "Event list",
        "Settings",
    ])
}

fn default_device_types() -> Vec<String> {
    strings(&[
        "LightSwitch",
        "LightDimmer",
        "Temperature",
        "SocketSwitch",
        "ThermostatDigital",
        "ElectricityMeter",
        "HeatingMeter",
        "Battery",
        "PVSystem",
        "HouseConsumption",
        "Generator",
        "MainsConnection",
        "ElectricChargingStation",
        "HeatPump",
        "EaseeWallbox",
        "EnergyView",
    ])
}

fn default_ml_model_types() -> Vec<String> {
    strings(&[
        "HeatingCircuitOptimization",
        "PVProductionService",
        "ConsumptionService",
        "EMS",
        "PVMonitoringService",
        "SetpointOptimizer",
        "LoadMonitor",
        "BakingMonitor",
    ])
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            load_mpc: default_load_mpc(),
            mpc_device_list: default_mpc_device_list(),
            main_menu_entries: default_main_menu_entries(),
            project_menu_entries: default_project_menu_entries(),
            device_types: default_device_types(),
            ml_model_types: default_ml_model_types(),
        }
    }
}
