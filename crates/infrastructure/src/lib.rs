//! AWS adapters for the volume sweep ports.

#![forbid(unsafe_code)]

mod dynamodb_account_directory;
mod dynamodb_audit_log;
mod ec2_volume_store;
mod s3_report_sink;
mod sts_credential_broker;

pub use dynamodb_account_directory::DynamoDbAccountDirectory;
pub use dynamodb_audit_log::DynamoDbAuditLog;
pub use ec2_volume_store::Ec2VolumeStore;
pub use s3_report_sink::S3ReportSink;
pub use sts_credential_broker::StsCredentialBroker;
