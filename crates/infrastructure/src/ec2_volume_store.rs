use std::collections::BTreeMap;

use async_trait::async_trait;
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::{
    Filter, ResourceType, SnapshotState as Ec2SnapshotState, Tag, TagSpecification, VolumeState,
    VolumeType,
};
use chrono::{DateTime, NaiveDate};

use volsweep_application::{SnapshotState, VolumeStore};
use volsweep_core::{AppError, AppResult};
use volsweep_domain::{TTL_TAG_KEY, Volume};

/// Tag stamped on pre-deletion snapshots so the owner stays reachable after
/// the volume is gone.
const SNAPSHOT_POC_TAG_KEY: &str = "VolumePoc";

/// EC2-backed volume store scoped to one account and region.
pub struct Ec2VolumeStore {
    client: aws_sdk_ec2::Client,
}

impl Ec2VolumeStore {
    /// Creates a store over a scoped EC2 client.
    #[must_use]
    pub fn new(client: aws_sdk_ec2::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VolumeStore for Ec2VolumeStore {
    async fn list_unattached_volumes(&self) -> AppResult<Vec<Volume>> {
        let mut pages = self
            .client
            .describe_volumes()
            .filters(
                Filter::builder()
                    .name("status")
                    .values(VolumeState::Available.as_str())
                    .build(),
            )
            .into_paginator()
            .send();

        let mut volumes = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|error| {
                AppError::Provider(format!(
                    "failed to describe volumes: {}",
                    DisplayErrorContext(error)
                ))
            })?;
            for volume in page.volumes() {
                volumes.push(convert_volume(volume)?);
            }
        }

        Ok(volumes)
    }

    async fn write_ttl_tag(&self, volume_id: &str, deadline: NaiveDate) -> AppResult<()> {
        self.client
            .create_tags()
            .resources(volume_id)
            .tags(
                Tag::builder()
                    .key(TTL_TAG_KEY)
                    .value(deadline.to_string())
                    .build(),
            )
            .send()
            .await
            .map_err(|error| {
                AppError::Provider(format!(
                    "failed to tag volume {volume_id}: {}",
                    DisplayErrorContext(error)
                ))
            })?;

        Ok(())
    }

    async fn create_snapshot(
        &self,
        volume_id: &str,
        point_of_contact: &str,
    ) -> AppResult<String> {
        let snapshot = self
            .client
            .create_snapshot()
            .volume_id(volume_id)
            .description(format!("Automated pre-remediation snapshot of {volume_id}"))
            .tag_specifications(
                TagSpecification::builder()
                    .resource_type(ResourceType::Snapshot)
                    .tags(
                        Tag::builder()
                            .key(SNAPSHOT_POC_TAG_KEY)
                            .value(point_of_contact)
                            .build(),
                    )
                    .build(),
            )
            .send()
            .await
            .map_err(|error| {
                AppError::Provider(format!(
                    "failed to snapshot volume {volume_id}: {}",
                    DisplayErrorContext(error)
                ))
            })?;

        snapshot
            .snapshot_id()
            .map(str::to_owned)
            .ok_or_else(|| {
                AppError::Provider(format!("snapshot of {volume_id} returned no identifier"))
            })
    }

    async fn snapshot_state(&self, snapshot_id: &str) -> AppResult<SnapshotState> {
        let described = self
            .client
            .describe_snapshots()
            .snapshot_ids(snapshot_id)
            .send()
            .await
            .map_err(|error| {
                AppError::Provider(format!(
                    "failed to describe snapshot {snapshot_id}: {}",
                    DisplayErrorContext(error)
                ))
            })?;

        let snapshot = described.snapshots().first().ok_or_else(|| {
            AppError::Provider(format!("snapshot {snapshot_id} not found"))
        })?;

        Ok(match snapshot.state() {
            Some(Ec2SnapshotState::Completed) => SnapshotState::Completed,
            Some(Ec2SnapshotState::Error) => SnapshotState::Failed,
            _ => SnapshotState::Pending,
        })
    }

    async fn delete_volume(&self, volume_id: &str) -> AppResult<()> {
        self.client
            .delete_volume()
            .volume_id(volume_id)
            .send()
            .await
            .map_err(|error| {
                AppError::Provider(format!(
                    "failed to delete volume {volume_id}: {}",
                    DisplayErrorContext(error)
                ))
            })?;

        Ok(())
    }
}

fn convert_volume(volume: &aws_sdk_ec2::types::Volume) -> AppResult<Volume> {
    let id = volume.volume_id().unwrap_or_default();
    let created_at = volume
        .create_time()
        .and_then(|time| DateTime::from_timestamp(time.secs(), time.subsec_nanos()))
        .ok_or_else(|| AppError::Provider(format!("volume {id} has no creation time")))?;

    let mut tags = BTreeMap::new();
    for tag in volume.tags() {
        if let (Some(key), Some(value)) = (tag.key(), tag.value()) {
            tags.insert(key.to_owned(), value.to_owned());
        }
    }

    Volume::new(
        id,
        volume.size().unwrap_or_default(),
        volume
            .volume_type()
            .map(VolumeType::as_str)
            .unwrap_or_default(),
        created_at,
        tags,
    )
}
