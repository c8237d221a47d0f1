use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

use volsweep_application::ReportSink;
use volsweep_core::{AppError, AppResult, NonEmptyString};

/// S3-backed destination for the rendered sweep report.
///
/// Uploads overwrite the previous object of the same key; the report has no
/// version history.
#[derive(Clone)]
pub struct S3ReportSink {
    client: aws_sdk_s3::Client,
    bucket: NonEmptyString,
}

impl S3ReportSink {
    /// Creates a sink writing into the given bucket.
    #[must_use]
    pub fn new(client: aws_sdk_s3::Client, bucket: NonEmptyString) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl ReportSink for S3ReportSink {
    async fn upload(&self, object_name: &str, body: Vec<u8>) -> AppResult<String> {
        self.client
            .put_object()
            .bucket(self.bucket.as_str())
            .key(object_name)
            .content_type("text/csv")
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|error| {
                AppError::Provider(format!(
                    "failed to upload report {object_name}: {}",
                    DisplayErrorContext(error)
                ))
            })?;

        Ok(format!("s3://{}/{object_name}", self.bucket))
    }
}
