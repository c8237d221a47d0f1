use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use volsweep_core::{AppError, AppResult};

/// Canonical key of the retention deadline tag. Capitalized `Ttl` is the one
/// spelling used for reads, writes, and report output.
pub const TTL_TAG_KEY: &str = "Ttl";

/// Tag key naming the owner to contact before a volume is destroyed.
pub const POC_TAG_KEY: &str = "Poc";

/// Sentinel recorded when a volume carries no point-of-contact tag.
pub const NO_CONTACT_SENTINEL: &str = "No Contact Identified";

/// An unattached block-storage volume as observed from the provider.
///
/// The sweep only ever observes a volume, stamps one tag on it, or destroys
/// it; the struct is a read model, not an owned resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    id: String,
    size_gib: i32,
    volume_type: String,
    created_at: DateTime<Utc>,
    tags: BTreeMap<String, String>,
}

impl Volume {
    /// Creates a volume read model. Tag keys are unique by construction.
    pub fn new(
        id: impl Into<String>,
        size_gib: i32,
        volume_type: impl Into<String>,
        created_at: DateTime<Utc>,
        tags: BTreeMap<String, String>,
    ) -> AppResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(AppError::Validation(
                "volume id must not be empty".to_owned(),
            ));
        }

        Ok(Self {
            id,
            size_gib,
            volume_type: volume_type.into(),
            created_at,
            tags,
        })
    }

    /// Returns the volume identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the volume size in GiB.
    #[must_use]
    pub fn size_gib(&self) -> i32 {
        self.size_gib
    }

    /// Returns the provider volume type label.
    #[must_use]
    pub fn volume_type(&self) -> &str {
        self.volume_type.as_str()
    }

    /// Returns the volume creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns one tag value by key.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Returns the raw retention tag value, when present.
    #[must_use]
    pub fn ttl_value(&self) -> Option<&str> {
        self.tag(TTL_TAG_KEY)
    }

    /// Returns the point of contact, falling back to the sentinel.
    #[must_use]
    pub fn point_of_contact(&self) -> &str {
        self.tag(POC_TAG_KEY).unwrap_or(NO_CONTACT_SENTINEL)
    }
}
