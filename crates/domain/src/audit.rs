use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record appended to the audit log when a volume is destroyed.
///
/// Written exactly once per remediated volume and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Identifier of the deleted volume.
    pub volume_id: String,
    /// Provider volume type label.
    pub volume_type: String,
    /// Volume size in GiB.
    pub size_gib: i32,
    /// Region the volume lived in.
    pub region: String,
    /// Timestamp of the deletion.
    pub terminated_at: DateTime<Utc>,
}
