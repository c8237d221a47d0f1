//! Application services and ports for the volume sweep.

#![forbid(unsafe_code)]

mod remediation_service;
mod report_service;
mod sweep_ports;
mod sweep_service;

pub use remediation_service::RemediationService;
pub use report_service::{ReportService, render_csv};
pub use sweep_ports::{
    AccountDirectory, AuditLog, CredentialBroker, ReportSink, SnapshotState, VolumeStore,
};
pub use sweep_service::{SweepOutcome, SweepService, SweepSummary};
