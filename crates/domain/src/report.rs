use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::volume::Volume;

/// Column schema of the sweep report, in emission order.
pub const REPORT_COLUMNS: [&str; 8] = [
    "Volume ID",
    "Account",
    "Region",
    "Size",
    "Type",
    "Creation Time",
    "Point of Contact",
    "Termination Date",
];

/// One report line for a classified volume.
///
/// Rows capture the tag snapshot taken before any tag write, so a volume
/// stamped during the same run still shows an empty termination date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Volume identifier.
    pub volume_id: String,
    /// Account alias the volume was found in.
    pub account: String,
    /// Region the volume lives in.
    pub region: String,
    /// Volume size in GiB.
    pub size_gib: i32,
    /// Provider volume type label.
    pub volume_type: String,
    /// Volume creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Point of contact, or the no-contact sentinel.
    pub point_of_contact: String,
    /// Raw retention tag value, empty when the tag is absent.
    pub ttl: String,
}

impl ReportRow {
    /// Builds a row from the volume's current tag snapshot.
    #[must_use]
    pub fn from_volume(volume: &Volume, account: &Account, region: &str) -> Self {
        Self {
            volume_id: volume.id().to_owned(),
            account: account.name().to_owned(),
            region: region.to_owned(),
            size_gib: volume.size_gib(),
            volume_type: volume.volume_type().to_owned(),
            created_at: volume.created_at(),
            point_of_contact: volume.point_of_contact().to_owned(),
            ttl: volume.ttl_value().unwrap_or_default().to_owned(),
        }
    }

    /// Returns the row as ordered record fields matching [`REPORT_COLUMNS`].
    #[must_use]
    pub fn as_record(&self) -> [String; 8] {
        [
            self.volume_id.clone(),
            self.account.clone(),
            self.region.clone(),
            self.size_gib.to_string(),
            self.volume_type.clone(),
            self.created_at.to_rfc3339(),
            self.point_of_contact.clone(),
            self.ttl.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;

    use crate::account::Account;
    use crate::volume::{NO_CONTACT_SENTINEL, POC_TAG_KEY, TTL_TAG_KEY, Volume};

    use super::{REPORT_COLUMNS, ReportRow};

    fn account() -> Account {
        Account::new("sandbox", "123456789012")
            .unwrap_or_else(|_| unreachable!("fixture account is valid"))
    }

    #[test]
    fn untagged_volume_row_uses_sentinel_and_empty_ttl() {
        let volume = Volume::new("vol-1", 8, "gp3", Utc::now(), BTreeMap::new())
            .unwrap_or_else(|_| unreachable!("fixture volume is valid"));

        let row = ReportRow::from_volume(&volume, &account(), "us-east-1");
        assert_eq!(row.point_of_contact, NO_CONTACT_SENTINEL);
        assert_eq!(row.ttl, "");
    }

    #[test]
    fn tagged_volume_row_carries_tag_values() {
        let mut tags = BTreeMap::new();
        tags.insert(POC_TAG_KEY.to_owned(), "Steve".to_owned());
        tags.insert(TTL_TAG_KEY.to_owned(), "2020-07-17".to_owned());
        let volume = Volume::new("vol-2", 120, "io1", Utc::now(), tags)
            .unwrap_or_else(|_| unreachable!("fixture volume is valid"));

        let row = ReportRow::from_volume(&volume, &account(), "eu-west-1");
        assert_eq!(row.point_of_contact, "Steve");
        assert_eq!(row.ttl, "2020-07-17");
        assert_eq!(row.account, "sandbox");
    }

    #[test]
    fn record_order_matches_column_schema() {
        let volume = Volume::new("vol-1", 8, "gp3", Utc::now(), BTreeMap::new())
            .unwrap_or_else(|_| unreachable!("fixture volume is valid"));

        let record = ReportRow::from_volume(&volume, &account(), "us-east-1").as_record();
        assert_eq!(record.len(), REPORT_COLUMNS.len());
        assert_eq!(record[0], "vol-1");
        assert_eq!(record[2], "us-east-1");
        assert_eq!(record[3], "8");
    }
}
