use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use tracing::debug;

use volsweep_application::AccountDirectory;
use volsweep_core::{AppError, AppResult, NonEmptyString};
use volsweep_domain::Account;

const NAME_ATTRIBUTE: &str = "Name";
const ID_ATTRIBUTE: &str = "Id";

/// DynamoDB-backed inventory of accounts enrolled in volume lifecycling.
///
/// Enrollment is a boolean attribute named per deployment, so one inventory
/// table can drive several lifecycling jobs.
#[derive(Clone)]
pub struct DynamoDbAccountDirectory {
    client: aws_sdk_dynamodb::Client,
    table_name: NonEmptyString,
    capability_flag: NonEmptyString,
}

impl DynamoDbAccountDirectory {
    /// Creates a directory over the inventory table and capability flag.
    #[must_use]
    pub fn new(
        client: aws_sdk_dynamodb::Client,
        table_name: NonEmptyString,
        capability_flag: NonEmptyString,
    ) -> Self {
        Self {
            client,
            table_name,
            capability_flag,
        }
    }
}

#[async_trait]
impl AccountDirectory for DynamoDbAccountDirectory {
    async fn list_enrolled_accounts(&self) -> AppResult<Vec<Account>> {
        let mut items = self
            .client
            .scan()
            .table_name(self.table_name.as_str())
            .into_paginator()
            .items()
            .send();

        let mut accounts = Vec::new();
        while let Some(item) = items.next().await {
            let item = item.map_err(|error| {
                AppError::Provider(format!(
                    "failed to scan inventory table {}: {}",
                    self.table_name,
                    DisplayErrorContext(error)
                ))
            })?;

            let enrolled = item
                .get(self.capability_flag.as_str())
                .and_then(|value| value.as_bool().ok())
                .copied()
                .unwrap_or(false);
            if !enrolled {
                continue;
            }

            let name = item.get(NAME_ATTRIBUTE).and_then(|value| value.as_s().ok());
            let id = item.get(ID_ATTRIBUTE).and_then(|value| value.as_s().ok());
            match (name, id) {
                (Some(name), Some(id)) => accounts.push(Account::new(name.clone(), id.clone())?),
                _ => debug!(
                    table = %self.table_name,
                    "enrolled inventory row missing Name or Id, skipped"
                ),
            }
        }

        Ok(accounts)
    }
}
