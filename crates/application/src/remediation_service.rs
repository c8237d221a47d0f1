use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::info;

use volsweep_core::{AppError, AppResult};
use volsweep_domain::{AuditRecord, Volume};

use crate::sweep_ports::{AuditLog, SnapshotState, VolumeStore};

/// Snapshot-then-delete executor for expired volumes.
///
/// Each step is a hard precondition for the next. A failure leaves the volume
/// in whatever partial state the step reached; there is no rollback, and the
/// caller moves on to the next volume.
#[derive(Clone)]
pub struct RemediationService {
    audit_log: Arc<dyn AuditLog>,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl RemediationService {
    /// Creates an executor with the given snapshot poll bounds.
    #[must_use]
    pub fn new(audit_log: Arc<dyn AuditLog>, poll_interval: Duration, max_poll_attempts: u32) -> Self {
        Self {
            audit_log,
            poll_interval,
            max_poll_attempts,
        }
    }

    /// Snapshots, deletes, and records one expired volume.
    pub async fn remediate(
        &self,
        store: &dyn VolumeStore,
        volume: &Volume,
        region: &str,
    ) -> AppResult<AuditRecord> {
        let snapshot_id = store
            .create_snapshot(volume.id(), volume.point_of_contact())
            .await?;
        info!(
            volume_id = %volume.id(),
            snapshot_id = %snapshot_id,
            "snapshot initiated"
        );

        self.wait_for_snapshot(store, snapshot_id.as_str()).await?;
        store.delete_volume(volume.id()).await?;
        info!(volume_id = %volume.id(), region = %region, "volume deleted");

        let record = AuditRecord {
            volume_id: volume.id().to_owned(),
            volume_type: volume.volume_type().to_owned(),
            size_gib: volume.size_gib(),
            region: region.to_owned(),
            terminated_at: Utc::now(),
        };
        self.audit_log.append_record(record.clone()).await?;

        Ok(record)
    }

    async fn wait_for_snapshot(
        &self,
        store: &dyn VolumeStore,
        snapshot_id: &str,
    ) -> AppResult<()> {
        for _ in 0..self.max_poll_attempts {
            match store.snapshot_state(snapshot_id).await? {
                SnapshotState::Completed => return Ok(()),
                SnapshotState::Failed => {
                    return Err(AppError::Provider(format!(
                        "snapshot {snapshot_id} entered an error state"
                    )));
                }
                SnapshotState::Pending => tokio::time::sleep(self.poll_interval).await,
            }
        }

        Err(AppError::Timeout(format!(
            "snapshot {snapshot_id} still pending after {} polls",
            self.max_poll_attempts
        )))
    }
}
