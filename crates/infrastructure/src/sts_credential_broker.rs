use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use aws_sdk_ec2::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_sts::error::DisplayErrorContext;
use tracing::debug;

use volsweep_application::{CredentialBroker, VolumeStore};
use volsweep_core::{AppError, AppResult, NonEmptyString};
use volsweep_domain::Account;

use crate::ec2_volume_store::Ec2VolumeStore;

/// Shortest role session the token service allows, in seconds.
const SESSION_DURATION_SECONDS: i32 = 900;

/// STS-backed credential broker producing one scoped EC2 client per call.
///
/// Every acquisition performs a fresh role assumption; nothing is cached or
/// shared between calls, so a scope's credentials live and die with its
/// sweep iteration.
#[derive(Clone)]
pub struct StsCredentialBroker {
    client: aws_sdk_sts::Client,
    role_name: NonEmptyString,
}

impl StsCredentialBroker {
    /// Creates a broker assuming the given role name in each target account.
    #[must_use]
    pub fn new(client: aws_sdk_sts::Client, role_name: NonEmptyString) -> Self {
        Self { client, role_name }
    }
}

#[async_trait]
impl CredentialBroker for StsCredentialBroker {
    async fn acquire(&self, account: &Account, region: &str) -> AppResult<Arc<dyn VolumeStore>> {
        let role_arn = format!("arn:aws:iam::{}:role/{}", account.id(), self.role_name);
        let session_name = format!("{}_{}_session", account.id(), self.role_name);

        let assumed = self
            .client
            .assume_role()
            .role_arn(role_arn.as_str())
            .role_session_name(session_name.as_str())
            .duration_seconds(SESSION_DURATION_SECONDS)
            .send()
            .await
            .map_err(|error| {
                AppError::Credential(format!(
                    "failed to assume {role_arn}: {}",
                    DisplayErrorContext(error)
                ))
            })?;

        let credentials = assumed.credentials().ok_or_else(|| {
            AppError::Credential(format!(
                "role assumption for {role_arn} returned no credentials"
            ))
        })?;

        let expiry = SystemTime::try_from(credentials.expiration().to_owned()).ok();
        debug!(
            account = %account.name(),
            region = %region,
            expires = %credentials.expiration(),
            "scoped client issued"
        );

        let scoped = Credentials::new(
            credentials.access_key_id(),
            credentials.secret_access_key(),
            Some(credentials.session_token().to_owned()),
            expiry,
            "volsweep-sts",
        );
        let config = aws_sdk_ec2::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_owned()))
            .credentials_provider(scoped)
            .build();

        Ok(Arc::new(Ec2VolumeStore::new(aws_sdk_ec2::Client::from_conf(
            config,
        ))))
    }
}
