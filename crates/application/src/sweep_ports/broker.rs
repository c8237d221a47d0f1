use std::sync::Arc;

use async_trait::async_trait;

use volsweep_core::AppResult;
use volsweep_domain::Account;

use super::store::VolumeStore;

/// Credential port producing scoped provider handles.
#[async_trait]
pub trait CredentialBroker: Send + Sync {
    /// Assumes the target role in `account` and returns a volume store bound
    /// to that account and `region`.
    ///
    /// The returned handle carries short-lived credentials owned by one sweep
    /// iteration; it is never reused across scopes. Rejected assumptions
    /// surface as [`volsweep_core::AppError::Credential`] and the caller
    /// skips the scope.
    async fn acquire(&self, account: &Account, region: &str) -> AppResult<Arc<dyn VolumeStore>>;
}
