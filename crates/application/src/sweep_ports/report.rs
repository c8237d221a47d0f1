use async_trait::async_trait;

use volsweep_core::AppResult;

/// Destination port for the rendered sweep report.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Uploads the report body under `object_name`, overwriting any prior
    /// report of the same name, and returns the stored location.
    async fn upload(&self, object_name: &str, body: Vec<u8>) -> AppResult<String>;
}
