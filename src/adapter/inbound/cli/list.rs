//! `list` command: load one collection and print it.

use anyhow::{anyhow, bail, Context, Result};
use tabled::Tabled;
use tracing::info;

use super::command::{CollectionArg, ListArgs};
use super::output;
use crate::application::store::LoadOutcome;
use crate::application::ConsoleContext;
use crate::domain::{
    Alert, Controller, Device, Member, ModuleRecord, Permission, Project, Room, Rule,
};
use crate::infrastructure::bootstrap::build_console;
use crate::infrastructure::config::Config;

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Devices")]
    devices: u32,
    #[tabled(rename = "Warnings")]
    warnings: u32,
    #[tabled(rename = "Errors")]
    errors: u32,
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            devices: p.stats.devices,
            warnings: p.stats.warnings,
            errors: p.stats.errors,
        }
    }
}

/// Devices and controllers share the envelope, and the row.
#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Favorite")]
    favorite: &'static str,
}

impl DeviceRow {
    fn new(
        id: &impl ToString,
        name: &str,
        kind: &str,
        room: Option<&impl ToString>,
        favorite: bool,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
            room: room.map(ToString::to_string).unwrap_or_default(),
            favorite: if favorite { "★" } else { "" },
        }
    }
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self::new(&d.id, &d.name, &d.data.kind, d.collection_id.as_ref(), d.favorite)
    }
}

impl From<&Controller> for DeviceRow {
    fn from(c: &Controller) -> Self {
        Self::new(&c.id, &c.name, &c.data.kind, c.collection_id.as_ref(), c.favorite)
    }
}

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Active")]
    active: bool,
    #[tabled(rename = "Conditions")]
    conditions: usize,
    #[tabled(rename = "Actions")]
    actions: usize,
}

impl From<&Rule> for RuleRow {
    fn from(r: &Rule) -> Self {
        Self {
            id: r.id.to_string(),
            name: r.name.clone(),
            active: r.active,
            conditions: r.conditions.len(),
            actions: r.actions.len(),
        }
    }
}

#[derive(Tabled)]
struct NamedRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&Room> for NamedRow {
    fn from(r: &Room) -> Self {
        Self {
            id: r.id.to_string(),
            name: r.name.clone(),
        }
    }
}

impl From<&Permission> for NamedRow {
    fn from(p: &Permission) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
        }
    }
}

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
}

impl From<&Member> for MemberRow {
    fn from(m: &Member) -> Self {
        Self {
            id: m.id.to_string(),
            name: m.name.clone(),
            email: m.email.clone().unwrap_or_default(),
            role: m.role.clone(),
        }
    }
}

#[derive(Tabled)]
struct ModuleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Mappings")]
    mappings: usize,
}

impl From<&ModuleRecord> for ModuleRow {
    fn from(m: &ModuleRecord) -> Self {
        Self {
            id: m.id.to_string(),
            name: m.name.clone(),
            kind: m.kind.clone(),
            mappings: m.mappings.len(),
        }
    }
}

#[derive(Tabled)]
struct MeasurementRow {
    #[tabled(rename = "Variable")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Severity")]
    severity: u8,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Accepted")]
    accepted: String,
}

impl From<&Alert> for AlertRow {
    fn from(a: &Alert) -> Self {
        Self {
            id: a.id.to_string(),
            title: a.title.clone(),
            severity: a.severity,
            created: a
                .created_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            accepted: a.accepted_by.clone().unwrap_or_default(),
        }
    }
}

/// Load the requested collection and print it.
///
/// # Errors
///
/// Configuration errors, a missing `--project` for project-scoped
/// collections, and failed or discarded loads.
pub async fn execute(args: &ListArgs) -> Result<()> {
    let config = Config::load(&args.config)
        .with_context(|| format!("invalid configuration in {}", args.config.display()))?;
    config.init_logging();

    let console = build_console(&config);
    let context = &console.context;

    if args.collection.is_project_scoped() {
        let project = args
            .project
            .as_deref()
            .ok_or_else(|| anyhow!("--project is required to list {}", args.collection))?;
        context.projects().select(project.into());
    }

    let outcome = load(context, args).await;
    info!(collection = %args.collection, outcome = %outcome, "List load finished");

    let result = match outcome.resolved() {
        LoadOutcome::Loaded { count } => {
            output::section(&format!("{} ({count})", args.collection));
            print(context, args.collection);
            Ok(())
        }
        LoadOutcome::Skipped => {
            output::warning(&format!("{} are disabled in this deployment", args.collection));
            Ok(())
        }
        LoadOutcome::Failed { reason } => Err(anyhow!(
            "failed to load {}: {reason}",
            args.collection
        )),
        other => Err(anyhow!("{} load did not complete: {other}", args.collection)),
    };

    context.shutdown();
    result
}

async fn load(context: &ConsoleContext, args: &ListArgs) -> LoadOutcome {
    match args.collection {
        CollectionArg::Projects => context.projects().load().await,
        CollectionArg::Devices => context.devices().load().await,
        CollectionArg::Controllers => context.controllers().load().await,
        CollectionArg::Rules => context.rules().load().await,
        CollectionArg::Rooms => context.rooms().load().await,
        CollectionArg::Modules => context.modules().load().await,
        CollectionArg::Measurements => context.measurements().load().await,
        CollectionArg::Alerts => context.alerts().load_page(args.page, args.accepted).await,
        CollectionArg::Members => context.members().load().await,
        CollectionArg::Permissions => context.permissions().load().await,
    }
}

fn print(context: &ConsoleContext, collection: CollectionArg) {
    match collection {
        CollectionArg::Projects => {
            let projects = context.projects().filter_by_name("");
            let rows = projects.iter().map(ProjectRow::from).collect();
            output::records(&projects, rows);
        }
        CollectionArg::Devices => {
            let mut devices = context.devices().store().all();
            devices.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
            let rows = devices.iter().map(DeviceRow::from).collect();
            output::records(&devices, rows);
        }
        CollectionArg::Controllers => {
            let mut controllers = context.controllers().store().all();
            controllers.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
            let rows = controllers.iter().map(DeviceRow::from).collect();
            output::records(&controllers, rows);
        }
        CollectionArg::Rules => {
            let rules = context.rules().filter_by_name("");
            let rows = rules.iter().map(RuleRow::from).collect();
            output::records(&rules, rows);
        }
        CollectionArg::Rooms => {
            let rooms = context.rooms().rooms();
            let rows = rooms.iter().map(NamedRow::from).collect();
            output::records(&rooms, rows);
        }
        CollectionArg::Modules => {
            let mut modules = context.modules().store().all();
            modules.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
            let rows = modules.iter().map(ModuleRow::from).collect();
            output::records(&modules, rows);
        }
        CollectionArg::Measurements => {
            let (_, values) = context.measurements().snapshot();
            let mut entries: Vec<(String, String)> = values
                .into_iter()
                .filter(|(name, _)| !name.is_empty())
                .map(|(name, value)| (name, value.to_string()))
                .collect();
            entries.sort();
            let rows = entries
                .iter()
                .map(|(name, value)| MeasurementRow {
                    name: name.clone(),
                    value: value.clone(),
                })
                .collect();
            let records: Vec<_> = entries
                .iter()
                .map(|(name, value)| serde_json::json!({ "name": name, "value": value }))
                .collect();
            output::records(&records, rows);
        }
        CollectionArg::Members => {
            let members = context.members().members();
            let rows = members.iter().map(MemberRow::from).collect();
            output::records(&members, rows);
        }
        CollectionArg::Permissions => {
            let permissions = context.permissions().permissions();
            let rows = permissions.iter().map(NamedRow::from).collect();
            output::records(&permissions, rows);
        }
        CollectionArg::Alerts => {
            let alerts = context.alerts().filtered();
            let rows = alerts.iter().map(AlertRow::from).collect();
            output::records(&alerts, rows);
            output::field(
                "Total",
                format!(
                    "{} (page {})",
                    context.alerts().total(),
                    output::muted(context.alerts().query().page)
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DeviceData;

    #[test]
    fn device_row_marks_favorites() {
        let mut device = Device::new("d1", "Inverter", DeviceData::of_kind("PVSystem")).in_room("r1");
        device.favorite = true;
        let row = DeviceRow::from(&device);
        assert_eq!(row.room, "r1");
        assert_eq!(row.kind, "PVSystem");
        assert_eq!(row.favorite, "★");
    }

    #[test]
    fn member_row_leaves_missing_email_blank() {
        let row = MemberRow::from(&Member::new("u1", "projectAdmin"));
        assert_eq!(row.role, "projectAdmin");
        assert!(row.email.is_empty());
    }

    #[test]
    fn alert_row_formats_creation_time() {
        let mut alert = Alert::new("a1", "Overvoltage");
        alert.created_at = "2024-05-01T10:30:00Z".parse().ok();
        let row = AlertRow::from(&alert);
        assert_eq!(row.created, "2024-05-01 10:30");
        assert!(row.accepted.is_empty());
    }
}
