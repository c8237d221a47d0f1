use async_trait::async_trait;

use volsweep_core::AppResult;
use volsweep_domain::Account;

/// Inventory port listing the accounts in scope for the sweep.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Lists accounts flagged as enrolled in volume lifecycling.
    ///
    /// A failure here aborts the run; there is no per-account fallback before
    /// the fleet is known.
    async fn list_enrolled_accounts(&self) -> AppResult<Vec<Account>>;
}
