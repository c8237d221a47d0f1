use chrono::{Days, NaiveDate};

use crate::ttl::TtlTag;
use crate::volume::Volume;

/// Days granted when stamping a fresh retention deadline on a volume.
pub const TTL_EXTENSION_DAYS: u64 = 30;

/// Classification outcome for one volume after policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Volume has no retention tag and needs one stamped.
    NeedsTag {
        /// Deadline to stamp, `today + TTL_EXTENSION_DAYS`.
        deadline: NaiveDate,
    },
    /// Deadline is today or later; the volume is left alone.
    Compliant {
        /// Parsed retention deadline.
        deadline: NaiveDate,
    },
    /// Deadline has passed; the volume is eligible for destruction.
    Expired {
        /// Parsed retention deadline.
        deadline: NaiveDate,
    },
    /// Tag value is not a date; the volume is permanently protected.
    Exempt,
}

/// Run mode switching between report-only and destructive behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepMode {
    /// Enables tag writes and snapshot-then-delete remediation.
    pub remediation_enabled: bool,
    /// Includes compliant volumes in the report.
    pub report_compliant: bool,
}

/// Side effects planned for one classified volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VolumeActions {
    /// Deadline to stamp on the volume, when one is due.
    pub write_tag: Option<NaiveDate>,
    /// Snapshot-then-delete the volume.
    pub remediate: bool,
    /// Emit a report row built from the pre-action tag snapshot.
    pub report: bool,
}

/// Classifies one volume against the current date.
///
/// Evaluated first-match: missing tag, unexpired deadline, expired deadline,
/// then the non-date exemption.
#[must_use]
pub fn classify(volume: &Volume, today: NaiveDate) -> Disposition {
    match TtlTag::interpret(volume.ttl_value()) {
        TtlTag::Missing => Disposition::NeedsTag {
            deadline: today + Days::new(TTL_EXTENSION_DAYS),
        },
        TtlTag::Deadline(deadline) if deadline >= today => Disposition::Compliant { deadline },
        TtlTag::Deadline(deadline) => Disposition::Expired { deadline },
        TtlTag::Exempt => Disposition::Exempt,
    }
}

/// Maps a disposition and run mode to the side effects to perform.
///
/// Tag writes are gated on the same flag as deletion: a report-only run
/// mutates nothing.
#[must_use]
pub fn plan(disposition: Disposition, mode: SweepMode) -> VolumeActions {
    match disposition {
        Disposition::NeedsTag { deadline } => VolumeActions {
            write_tag: mode.remediation_enabled.then_some(deadline),
            remediate: false,
            report: true,
        },
        Disposition::Compliant { .. } => VolumeActions {
            write_tag: None,
            remediate: false,
            report: mode.report_compliant,
        },
        Disposition::Expired { .. } => VolumeActions {
            write_tag: None,
            remediate: mode.remediation_enabled,
            report: !mode.remediation_enabled,
        },
        Disposition::Exempt => VolumeActions {
            write_tag: None,
            remediate: false,
            report: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{NaiveDate, Utc};
    use proptest::prelude::*;

    use crate::volume::{TTL_TAG_KEY, Volume};

    use super::{Disposition, SweepMode, classify, plan};

    const DRY_RUN: SweepMode = SweepMode {
        remediation_enabled: false,
        report_compliant: false,
    };
    const DESTRUCTIVE: SweepMode = SweepMode {
        remediation_enabled: true,
        report_compliant: false,
    };

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
    }

    fn volume_with_ttl(ttl: Option<&str>) -> Volume {
        let mut tags = BTreeMap::new();
        if let Some(value) = ttl {
            tags.insert(TTL_TAG_KEY.to_owned(), value.to_owned());
        }
        Volume::new("vol-1", 8, "gp3", Utc::now(), tags)
            .unwrap_or_else(|_| unreachable!("fixture volume is valid"))
    }

    #[test]
    fn untagged_volume_needs_tag_thirty_days_out() {
        let disposition = classify(&volume_with_ttl(None), date(2024, 1, 1));
        assert_eq!(
            disposition,
            Disposition::NeedsTag {
                deadline: date(2024, 1, 31)
            }
        );
    }

    #[test]
    fn tagged_volume_without_ttl_key_needs_tag() {
        let mut tags = BTreeMap::new();
        tags.insert("Poc".to_owned(), "Steve".to_owned());
        let volume = Volume::new("vol-1", 8, "gp3", Utc::now(), tags)
            .unwrap_or_else(|_| unreachable!("fixture volume is valid"));

        let disposition = classify(&volume, date(2024, 1, 1));
        assert_eq!(
            disposition,
            Disposition::NeedsTag {
                deadline: date(2024, 1, 31)
            }
        );
    }

    #[test]
    fn deadline_on_current_date_is_compliant() {
        let disposition = classify(&volume_with_ttl(Some("2024-01-01")), date(2024, 1, 1));
        assert_eq!(
            disposition,
            Disposition::Compliant {
                deadline: date(2024, 1, 1)
            }
        );
    }

    #[test]
    fn past_deadline_is_expired() {
        let disposition = classify(&volume_with_ttl(Some("2020-01-01")), date(2024, 1, 1));
        assert_eq!(
            disposition,
            Disposition::Expired {
                deadline: date(2020, 1, 1)
            }
        );
    }

    #[test]
    fn non_date_ttl_is_exempt() {
        let disposition = classify(&volume_with_ttl(Some("not-a-date")), date(2024, 1, 1));
        assert_eq!(disposition, Disposition::Exempt);
    }

    #[test]
    fn needs_tag_writes_only_when_remediation_enabled() {
        let disposition = Disposition::NeedsTag {
            deadline: date(2024, 1, 31),
        };

        let dry_run = plan(disposition, DRY_RUN);
        assert_eq!(dry_run.write_tag, None);
        assert!(dry_run.report);
        assert!(!dry_run.remediate);

        let destructive = plan(disposition, DESTRUCTIVE);
        assert_eq!(destructive.write_tag, Some(date(2024, 1, 31)));
        assert!(destructive.report);
        assert!(!destructive.remediate);
    }

    #[test]
    fn compliant_volume_reports_only_when_configured() {
        let disposition = Disposition::Compliant {
            deadline: date(2024, 6, 1),
        };

        let silent = plan(disposition, DESTRUCTIVE);
        assert!(!silent.report);
        assert!(!silent.remediate);
        assert_eq!(silent.write_tag, None);

        let reported = plan(
            disposition,
            SweepMode {
                remediation_enabled: true,
                report_compliant: true,
            },
        );
        assert!(reported.report);
        assert!(!reported.remediate);
    }

    #[test]
    fn expired_volume_remediates_or_reports_by_mode() {
        let disposition = Disposition::Expired {
            deadline: date(2020, 1, 1),
        };

        let dry_run = plan(disposition, DRY_RUN);
        assert!(!dry_run.remediate);
        assert!(dry_run.report);

        let destructive = plan(disposition, DESTRUCTIVE);
        assert!(destructive.remediate);
        assert!(!destructive.report);
    }

    #[test]
    fn exempt_volume_is_reported_and_never_touched() {
        for mode in [DRY_RUN, DESTRUCTIVE] {
            let actions = plan(Disposition::Exempt, mode);
            assert!(actions.report);
            assert!(!actions.remediate);
            assert_eq!(actions.write_tag, None);
        }
    }

    proptest! {
        // Any tag value that is not a calendar date protects the volume
        // forever, no matter the mode or how old the volume is.
        #[test]
        fn non_date_values_never_remediate(value in "[a-zA-Z!@#_ -]{1,32}") {
            prop_assume!(crate::ttl::parse_deadline(value.as_str()).is_none());

            let disposition = classify(&volume_with_ttl(Some(value.as_str())), date(2099, 12, 31));
            prop_assert_eq!(disposition, Disposition::Exempt);

            for mode in [DRY_RUN, DESTRUCTIVE] {
                let actions = plan(disposition, mode);
                prop_assert!(!actions.remediate);
                prop_assert!(actions.report);
                prop_assert_eq!(actions.write_tag, None);
            }
        }
    }
}
