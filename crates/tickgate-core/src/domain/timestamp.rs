use std::fmt::{Display, Formatter};
use std::ops::Sub;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::error::FormatError;

/// RFC3339 timestamp normalized to UTC.
///
/// Input may carry any offset; the canonical form always renders with the
/// `Z` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn parse(input: &str) -> Result<Self, FormatError> {
        let parsed =
            OffsetDateTime::parse(input, &Rfc3339).map_err(|_| FormatError::InvalidTimestamp {
                value: input.to_owned(),
            })?;

        Ok(Self(parsed.to_offset(UtcOffset::UTC)))
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    pub fn format_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .unwrap_or_else(|_| String::from("<unformattable>"))
    }
}

impl Sub for UtcDateTime {
    type Output = Duration;

    fn sub(self, other: Self) -> Duration {
        self.0 - other.0
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

impl Serialize for UtcDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_rfc3339())
    }
}

impl<'de> Deserialize<'de> for UtcDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_utc_timestamp() {
        let parsed = UtcDateTime::parse("2026-01-01T00:00:00Z").expect("must parse");
        assert_eq!(parsed.format_rfc3339(), "2026-01-01T00:00:00Z");
    }

    #[test]
    fn normalizes_offset_to_utc() {
        let parsed = UtcDateTime::parse("2026-01-01T01:00:00+01:00").expect("must parse");
        assert_eq!(parsed.format_rfc3339(), "2026-01-01T00:00:00Z");
    }

    #[test]
    fn rejects_naive_timestamp() {
        let err = UtcDateTime::parse("2026-01-01 00:00:00").expect_err("must fail");
        assert!(matches!(err, FormatError::InvalidTimestamp { .. }));
    }

    #[test]
    fn subtraction_yields_signed_duration() {
        let earlier = UtcDateTime::parse("2026-01-01T00:00:00Z").expect("must parse");
        let later = UtcDateTime::parse("2026-01-01T00:01:00Z").expect("must parse");
        assert_eq!((later - earlier).whole_milliseconds(), 60_000);
        assert_eq!((earlier - later).whole_milliseconds(), -60_000);
    }
}
