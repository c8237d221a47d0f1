mod audit;
mod broker;
mod directory;
mod report;
mod store;

pub use audit::AuditLog;
pub use broker::CredentialBroker;
pub use directory::AccountDirectory;
pub use report::ReportSink;
pub use store::{SnapshotState, VolumeStore};
