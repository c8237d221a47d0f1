use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use volsweep_core::{AppError, AppResult};
use volsweep_domain::{REPORT_COLUMNS, ReportRow};

use crate::sweep_ports::ReportSink;

/// Renders report rows as a fully quoted CSV document.
///
/// The first record is a single generated-at field, the second the column
/// schema, then one record per row.
pub fn render_csv(generated_at: DateTime<Utc>, rows: &[ReportRow]) -> AppResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .flexible(true)
        .from_writer(Vec::new());

    writer
        .write_record([format!("Report generated at {generated_at}")])
        .and_then(|()| writer.write_record(REPORT_COLUMNS))
        .map_err(|error| AppError::Internal(format!("failed to render report header: {error}")))?;

    for row in rows {
        writer
            .write_record(row.as_record())
            .map_err(|error| AppError::Internal(format!("failed to render report row: {error}")))?;
    }

    writer
        .into_inner()
        .map_err(|error| AppError::Internal(format!("failed to finish report: {error}")))
}

/// Publishes the rendered sweep report to the configured sink.
///
/// Re-running a sweep replaces the previous report; there is no history.
#[derive(Clone)]
pub struct ReportService {
    sink: Arc<dyn ReportSink>,
    report_name: String,
}

impl ReportService {
    /// Creates a report service writing under the given object basename.
    #[must_use]
    pub fn new(sink: Arc<dyn ReportSink>, report_name: impl Into<String>) -> Self {
        Self {
            sink,
            report_name: report_name.into(),
        }
    }

    /// Renders and uploads the report, returning its stored location.
    pub async fn publish(
        &self,
        generated_at: DateTime<Utc>,
        rows: &[ReportRow],
    ) -> AppResult<String> {
        let body = render_csv(generated_at, rows)?;
        let object_name = format!("{}.csv", self.report_name);
        let location = self.sink.upload(object_name.as_str(), body).await?;
        info!(location = %location, row_count = rows.len(), "report published");

        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use tokio::sync::Mutex;

    use volsweep_core::AppResult;
    use volsweep_domain::ReportRow;

    use crate::sweep_ports::ReportSink;

    use super::{ReportService, render_csv};

    #[derive(Default)]
    struct FakeReportSink {
        uploads: Mutex<Vec<(String, Vec<u8>)>>,
    }

    #[async_trait]
    impl ReportSink for FakeReportSink {
        async fn upload(&self, object_name: &str, body: Vec<u8>) -> AppResult<String> {
            self.uploads
                .lock()
                .await
                .push((object_name.to_owned(), body));
            Ok(format!("s3://reports/{object_name}"))
        }
    }

    fn sample_row() -> ReportRow {
        ReportRow {
            volume_id: "vol-1".to_owned(),
            account: "sandbox".to_owned(),
            region: "us-east-1".to_owned(),
            size_gib: 8,
            volume_type: "gp3".to_owned(),
            created_at: Utc
                .with_ymd_and_hms(2023, 6, 1, 12, 0, 0)
                .single()
                .unwrap_or_default(),
            point_of_contact: "No Contact Identified".to_owned(),
            ttl: String::new(),
        }
    }

    #[test]
    fn csv_starts_with_generated_at_then_schema() {
        let generated_at = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_default();

        let body = render_csv(generated_at, &[sample_row()]).unwrap_or_default();
        let text = String::from_utf8(body).unwrap_or_default();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("\"Report generated at 2024-01-01 00:00:00 UTC\"")
        );
        let schema = lines.next().unwrap_or_default();
        assert!(schema.starts_with("\"Volume ID\",\"Account\",\"Region\""));
        assert!(schema.ends_with("\"Point of Contact\",\"Termination Date\""));
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn csv_quotes_every_field() {
        let generated_at = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_default();

        let body = render_csv(generated_at, &[sample_row()]).unwrap_or_default();
        let text = String::from_utf8(body).unwrap_or_default();
        let row = text.lines().nth(2).unwrap_or_default();

        assert!(row.starts_with("\"vol-1\",\"sandbox\",\"us-east-1\",\"8\",\"gp3\""));
    }

    #[tokio::test]
    async fn publish_uploads_under_the_report_name() {
        let sink = Arc::new(FakeReportSink::default());
        let service = ReportService::new(sink.clone(), "orphaned_volumes");

        let location = service.publish(Utc::now(), &[sample_row()]).await;

        assert!(location.is_ok());
        assert_eq!(
            location.unwrap_or_default(),
            "s3://reports/orphaned_volumes.csv"
        );
        let uploads = sink.uploads.lock().await;
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].0, "orphaned_volumes.csv");
    }
}
