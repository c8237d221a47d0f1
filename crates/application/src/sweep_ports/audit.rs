use async_trait::async_trait;

use volsweep_core::AppResult;
use volsweep_domain::AuditRecord;

/// Append-only log port recording destroyed volumes.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Appends one termination record.
    async fn append_record(&self, record: AuditRecord) -> AppResult<()>;
}
