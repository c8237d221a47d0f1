//! Volsweep unattached-volume sweep runtime.

#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};

use aws_config::BehaviorVersion;
use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use volsweep_application::{RemediationService, ReportService, SweepService};
use volsweep_core::{AppError, AppResult, NonEmptyString, SweepRunId};
use volsweep_domain::SweepMode;
use volsweep_infrastructure::{
    DynamoDbAccountDirectory, DynamoDbAuditLog, S3ReportSink, StsCredentialBroker,
};

#[derive(Debug, Clone)]
struct SweeperConfig {
    inventory_table: String,
    capability_flag: String,
    target_role: String,
    regions: Vec<String>,
    remediation_enabled: bool,
    report_compliant: bool,
    report_bucket: String,
    report_name: String,
    audit_table: String,
    snapshot_poll_interval_ms: u64,
    snapshot_poll_max_attempts: u32,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = SweeperConfig::load()?;
    let run_id = SweepRunId::new();
    let started_at = Instant::now();

    info!(
        run_id = %run_id,
        region_count = config.regions.len(),
        remediation_enabled = config.remediation_enabled,
        report_compliant = config.report_compliant,
        "volsweep-sweeper started"
    );

    let shared_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
    let dynamodb_client = aws_sdk_dynamodb::Client::new(&shared_config);

    let directory = Arc::new(DynamoDbAccountDirectory::new(
        dynamodb_client.clone(),
        NonEmptyString::new(config.inventory_table.clone())?,
        NonEmptyString::new(config.capability_flag.clone())?,
    ));
    let broker = Arc::new(StsCredentialBroker::new(
        aws_sdk_sts::Client::new(&shared_config),
        NonEmptyString::new(config.target_role.clone())?,
    ));
    let audit_log = Arc::new(DynamoDbAuditLog::new(
        dynamodb_client,
        NonEmptyString::new(config.audit_table.clone())?,
    ));
    let remediation = RemediationService::new(
        audit_log,
        Duration::from_millis(config.snapshot_poll_interval_ms),
        config.snapshot_poll_max_attempts,
    );
    let sweep_service = SweepService::new(
        directory,
        broker,
        remediation,
        config.regions.clone(),
        SweepMode {
            remediation_enabled: config.remediation_enabled,
            report_compliant: config.report_compliant,
        },
    );
    let report_service = ReportService::new(
        Arc::new(S3ReportSink::new(
            aws_sdk_s3::Client::new(&shared_config),
            NonEmptyString::new(config.report_bucket.clone())?,
        )),
        config.report_name.clone(),
    );

    let outcome = sweep_service.run(Utc::now().date_naive()).await?;
    let report_location = report_service.publish(Utc::now(), &outcome.rows).await?;

    info!(
        run_id = %run_id,
        accounts = outcome.summary.accounts,
        scopes_swept = outcome.summary.scopes_swept,
        scopes_skipped = outcome.summary.scopes_skipped,
        volumes_classified = outcome.summary.volumes_classified,
        tags_written = outcome.summary.tags_written,
        volumes_remediated = outcome.summary.volumes_remediated,
        action_failures = outcome.summary.action_failures,
        report_location = %report_location,
        elapsed_ms = u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX),
        "sweep finished"
    );

    Ok(())
}

impl SweeperConfig {
    fn load() -> AppResult<Self> {
        let inventory_table = required_env("INVENTORY_TABLE")?;
        let capability_flag = required_env("CAPABILITY_FLAG")?;
        let target_role = required_env("TARGET_ROLE")?;
        let regions = required_env("APPROVED_REGIONS")?
            .split(',')
            .map(|region| region.trim().to_owned())
            .filter(|region| !region.is_empty())
            .collect::<Vec<_>>();
        let remediation_enabled = env_flag("REMEDIATION_ENABLED");
        let report_compliant = env_flag("REPORT_COMPLIANT");
        let report_bucket = required_env("REPORT_BUCKET")?;
        let report_name = env::var("REPORT_NAME")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "orphaned_volumes".to_owned());
        let audit_table = required_env("AUDIT_TABLE")?;
        let snapshot_poll_interval_ms = parse_env_u64("SNAPSHOT_POLL_INTERVAL_MS", 3_000)?;
        let snapshot_poll_max_attempts = parse_env_u32("SNAPSHOT_POLL_MAX_ATTEMPTS", 200)?;

        if regions.is_empty() {
            return Err(AppError::Validation(
                "APPROVED_REGIONS must name at least one region".to_owned(),
            ));
        }

        if snapshot_poll_interval_ms == 0 {
            return Err(AppError::Validation(
                "SNAPSHOT_POLL_INTERVAL_MS must be greater than zero".to_owned(),
            ));
        }

        if snapshot_poll_max_attempts == 0 {
            return Err(AppError::Validation(
                "SNAPSHOT_POLL_MAX_ATTEMPTS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            inventory_table,
            capability_flag,
            target_role,
            regions,
            remediation_enabled,
            report_compliant,
            report_bucket,
            report_name,
            audit_table,
            snapshot_poll_interval_ms,
            snapshot_poll_max_attempts,
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn env_flag(name: &str) -> bool {
    env::var(name).map(|value| value == "true").unwrap_or(false)
}

fn parse_env_u32(name: &str, default: u32) -> AppResult<u32> {
    match env::var(name) {
        Ok(value) => value.parse::<u32>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_env_u64(name: &str, default: u64) -> AppResult<u64> {
    match env::var(name) {
        Ok(value) => value.parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}
