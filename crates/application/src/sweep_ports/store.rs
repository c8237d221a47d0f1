use async_trait::async_trait;
use chrono::NaiveDate;

use volsweep_core::AppResult;
use volsweep_domain::Volume;

/// Progress state of a snapshot, as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotState {
    /// Snapshot is still being captured.
    Pending,
    /// Snapshot finished and is safe to rely on.
    Completed,
    /// Provider reported the snapshot as failed.
    Failed,
}

/// Provider port over the volumes of one account/region scope.
#[async_trait]
pub trait VolumeStore: Send + Sync {
    /// Lists volumes currently unattached from any instance.
    async fn list_unattached_volumes(&self) -> AppResult<Vec<Volume>>;

    /// Stamps the retention deadline tag on one volume.
    async fn write_ttl_tag(&self, volume_id: &str, deadline: NaiveDate) -> AppResult<()>;

    /// Initiates a pre-deletion snapshot tagged with the point of contact,
    /// returning the snapshot identifier.
    async fn create_snapshot(
        &self,
        volume_id: &str,
        point_of_contact: &str,
    ) -> AppResult<String>;

    /// Probes the state of one snapshot.
    async fn snapshot_state(&self, snapshot_id: &str) -> AppResult<SnapshotState>;

    /// Deletes one volume.
    async fn delete_volume(&self, volume_id: &str) -> AppResult<()>;
}
