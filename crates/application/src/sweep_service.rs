use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use volsweep_core::AppResult;
use volsweep_domain::{Account, ReportRow, SweepMode, Volume, classify, plan};

use crate::remediation_service::RemediationService;
use crate::sweep_ports::{AccountDirectory, CredentialBroker, VolumeStore};

/// Per-run counters summarizing one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepSummary {
    /// Accounts returned by the inventory.
    pub accounts: u32,
    /// Account/region scopes swept to completion.
    pub scopes_swept: u32,
    /// Scopes skipped after a credential or listing failure.
    pub scopes_skipped: u32,
    /// Volumes classified across all scopes.
    pub volumes_classified: u32,
    /// Retention tags stamped.
    pub tags_written: u32,
    /// Volumes snapshotted, deleted, and recorded.
    pub volumes_remediated: u32,
    /// Per-volume actions that failed and were skipped.
    pub action_failures: u32,
}

/// Accumulated output of one sweep run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Report rows for every volume the policy marked reportable.
    pub rows: Vec<ReportRow>,
    /// Run counters.
    pub summary: SweepSummary,
}

#[derive(Default)]
struct VolumeOutcome {
    row: Option<ReportRow>,
    tag_written: bool,
    remediated: bool,
    failures: u32,
}

/// Sequential sweep over every enrolled account and approved region.
///
/// One scope at a time, one volume at a time. A failing scope is logged and
/// skipped; it never aborts sibling scopes.
#[derive(Clone)]
pub struct SweepService {
    directory: Arc<dyn AccountDirectory>,
    broker: Arc<dyn CredentialBroker>,
    remediation: RemediationService,
    regions: Vec<String>,
    mode: SweepMode,
}

impl SweepService {
    /// Creates a sweep service over the approved region list.
    #[must_use]
    pub fn new(
        directory: Arc<dyn AccountDirectory>,
        broker: Arc<dyn CredentialBroker>,
        remediation: RemediationService,
        regions: Vec<String>,
        mode: SweepMode,
    ) -> Self {
        Self {
            directory,
            broker,
            remediation,
            regions,
            mode,
        }
    }

    /// Runs one sweep to completion and returns the accumulated rows.
    ///
    /// Only the inventory lookup is fatal; every later failure narrows to the
    /// scope or volume it occurred in.
    pub async fn run(&self, today: NaiveDate) -> AppResult<SweepOutcome> {
        let accounts = self.directory.list_enrolled_accounts().await?;
        let mut summary = SweepSummary {
            accounts: u32::try_from(accounts.len()).unwrap_or(u32::MAX),
            ..SweepSummary::default()
        };
        let mut rows = Vec::new();

        for account in &accounts {
            for region in &self.regions {
                let store = match self.broker.acquire(account, region.as_str()).await {
                    Ok(store) => store,
                    Err(error) => {
                        warn!(
                            account = %account.name(),
                            region = %region,
                            error = %error,
                            "skipping scope: could not acquire scoped client"
                        );
                        summary.scopes_skipped = summary.scopes_skipped.saturating_add(1);
                        continue;
                    }
                };

                let volumes = match store.list_unattached_volumes().await {
                    Ok(volumes) => volumes,
                    Err(error) => {
                        warn!(
                            account = %account.name(),
                            region = %region,
                            error = %error,
                            "skipping scope: could not list volumes"
                        );
                        summary.scopes_skipped = summary.scopes_skipped.saturating_add(1);
                        continue;
                    }
                };

                info!(
                    account = %account.name(),
                    region = %region,
                    volume_count = volumes.len(),
                    "sweeping scope"
                );

                for volume in &volumes {
                    summary.volumes_classified = summary.volumes_classified.saturating_add(1);
                    let outcome = self
                        .apply_policy(store.as_ref(), account, region.as_str(), volume, today)
                        .await;

                    if let Some(row) = outcome.row {
                        rows.push(row);
                    }
                    if outcome.tag_written {
                        summary.tags_written = summary.tags_written.saturating_add(1);
                    }
                    if outcome.remediated {
                        summary.volumes_remediated = summary.volumes_remediated.saturating_add(1);
                    }
                    summary.action_failures =
                        summary.action_failures.saturating_add(outcome.failures);
                }

                summary.scopes_swept = summary.scopes_swept.saturating_add(1);
            }
        }

        Ok(SweepOutcome { rows, summary })
    }

    async fn apply_policy(
        &self,
        store: &dyn VolumeStore,
        account: &Account,
        region: &str,
        volume: &Volume,
        today: NaiveDate,
    ) -> VolumeOutcome {
        let disposition = classify(volume, today);
        let actions = plan(disposition, self.mode);
        let mut outcome = VolumeOutcome::default();

        // Rows capture the tag snapshot before any write this run performs.
        if actions.report {
            outcome.row = Some(ReportRow::from_volume(volume, account, region));
        }

        if let Some(deadline) = actions.write_tag {
            match store.write_ttl_tag(volume.id(), deadline).await {
                Ok(()) => {
                    outcome.tag_written = true;
                    info!(
                        volume_id = %volume.id(),
                        deadline = %deadline,
                        "retention tag stamped"
                    );
                }
                Err(error) => {
                    warn!(
                        volume_id = %volume.id(),
                        error = %error,
                        "failed to stamp retention tag"
                    );
                    outcome.failures = outcome.failures.saturating_add(1);
                }
            }
        }

        if actions.remediate {
            match self.remediation.remediate(store, volume, region).await {
                Ok(record) => {
                    outcome.remediated = true;
                    info!(
                        volume_id = %record.volume_id,
                        region = %record.region,
                        "volume remediated"
                    );
                }
                Err(error) => {
                    warn!(
                        volume_id = %volume.id(),
                        error = %error,
                        "remediation failed, volume left in partial state"
                    );
                    outcome.failures = outcome.failures.saturating_add(1);
                }
            }
        }

        outcome
    }
}
