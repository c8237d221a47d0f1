use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;

use volsweep_application::AuditLog;
use volsweep_core::{AppError, AppResult, NonEmptyString};
use volsweep_domain::AuditRecord;

/// DynamoDB-backed append-only log of destroyed volumes.
#[derive(Clone)]
pub struct DynamoDbAuditLog {
    client: aws_sdk_dynamodb::Client,
    table_name: NonEmptyString,
}

impl DynamoDbAuditLog {
    /// Creates a log over the audit table.
    #[must_use]
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: NonEmptyString) -> Self {
        Self { client, table_name }
    }
}

#[async_trait]
impl AuditLog for DynamoDbAuditLog {
    async fn append_record(&self, record: AuditRecord) -> AppResult<()> {
        let volume_id = record.volume_id.clone();
        self.client
            .put_item()
            .table_name(self.table_name.as_str())
            .item("volume_id", AttributeValue::S(record.volume_id))
            .item("type", AttributeValue::S(record.volume_type))
            .item("size", AttributeValue::N(record.size_gib.to_string()))
            .item("region", AttributeValue::S(record.region))
            .item(
                "terminate_timestamp",
                AttributeValue::S(record.terminated_at.to_rfc3339()),
            )
            .send()
            .await
            .map_err(|error| {
                AppError::Provider(format!(
                    "failed to append audit record for {volume_id}: {}",
                    DisplayErrorContext(error)
                ))
            })?;

        Ok(())
    }
}
