use chrono::NaiveDate;

/// Calendar-date format accepted by the retention tag.
const TTL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a retention tag value as an ISO calendar date.
///
/// A value that does not parse is the designed exemption escape hatch, so the
/// failure branch is a `None`, never an error.
#[must_use]
pub fn parse_deadline(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, TTL_DATE_FORMAT).ok()
}

/// Interpreted state of a volume's retention tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlTag {
    /// No retention tag present.
    Missing,
    /// Tag parses as a calendar-date deadline.
    Deadline(NaiveDate),
    /// Tag value is not a date; the volume is permanently exempt.
    Exempt,
}

impl TtlTag {
    /// Interprets a raw tag value.
    #[must_use]
    pub fn interpret(value: Option<&str>) -> Self {
        match value {
            None => Self::Missing,
            Some(raw) => parse_deadline(raw).map_or(Self::Exempt, Self::Deadline),
        }
    }
}
