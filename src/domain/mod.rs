//! Backend-agnostic domain types: records, identifiers, load state, reports.

pub mod alert;
pub mod device;
pub mod id;
pub mod load_state;
pub mod measurement;
pub mod member;
pub mod module;
pub mod navigation;
pub mod project;
pub mod record;
pub mod report;
pub mod room;
pub mod rule;

pub use alert::{Alert, AlertPage};
pub use device::{Controller, Device, DeviceData, DeviceMeta};
pub use id::RecordId;
pub use load_state::LoadState;
pub use measurement::{MeasurementRecord, MeasurementValue};
pub use member::{Member, Permission, PermissionGrant};
pub use module::ModuleRecord;
pub use navigation::NavEntry;
pub use project::{Project, ProjectLimits, ProjectStats};
pub use record::Record;
pub use report::{Report, ReportLevel};
pub use room::Room;
pub use rule::{Condition, Rule, RuleAction, ScheduleItem, TimeOfDay};
