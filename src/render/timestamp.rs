//! Display formatting for post timestamps.
//!
//! Posts carry UTC instants only; how they read on screen is decided here.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, SecondsFormat, Utc};

use crate::errors::AppError;

/// Long-form layout: `October 19, 2026 14:05`.
const LONG_PATTERN: &str = "%B %-d, %Y %H:%M";

/// Strategy for turning a timestamp into display text.
pub trait TimestampFormatter: Send + Sync {
    fn format(&self, at: DateTime<Utc>) -> String;
}

/// Configured display format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeFormat {
    /// Long month name, numeric day and year, hour:minute
    Long,
    /// RFC 3339 with second precision
    Iso,
    /// Any chrono strftime pattern
    Pattern(String),
}

impl TimeFormat {
    /// Parse `long`, `iso`, or a strftime pattern. Returns `None` for patterns chrono rejects.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "" => None,
            s if s.eq_ignore_ascii_case("long") => Some(TimeFormat::Long),
            s if s.eq_ignore_ascii_case("iso") => Some(TimeFormat::Iso),
            s => {
                let valid = StrftimeItems::new(s).all(|item| !matches!(item, Item::Error));
                valid.then(|| TimeFormat::Pattern(s.to_string()))
            }
        }
    }
}

/// Formatter driven by a [`TimeFormat`] and a fixed display offset.
#[derive(Debug, Clone)]
pub struct ConfiguredFormatter {
    format: TimeFormat,
    offset: FixedOffset,
}

impl ConfiguredFormatter {
    pub fn new(format: TimeFormat, utc_offset_minutes: i32) -> Result<Self, AppError> {
        let offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                AppError::Config(format!("UTC offset out of range: {}", utc_offset_minutes))
            })?;
        Ok(Self { format, offset })
    }
}

impl Default for ConfiguredFormatter {
    fn default() -> Self {
        Self {
            format: TimeFormat::Long,
            offset: Utc.fix(),
        }
    }
}

impl TimestampFormatter for ConfiguredFormatter {
    fn format(&self, at: DateTime<Utc>) -> String {
        let local = at.with_timezone(&self.offset);
        match &self.format {
            TimeFormat::Long => local.format(LONG_PATTERN).to_string(),
            TimeFormat::Iso => local.to_rfc3339_opts(SecondsFormat::Secs, true),
            TimeFormat::Pattern(pattern) => local.format(pattern).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 9, 14, 5, 30).unwrap()
    }

    #[test]
    fn test_long_format() {
        let f = ConfiguredFormatter::default();
        assert_eq!(f.format(sample()), "October 9, 2026 14:05");
    }

    #[test]
    fn test_offset_shifts_display() {
        let f = ConfiguredFormatter::new(TimeFormat::Long, 7 * 60).unwrap();
        assert_eq!(f.format(sample()), "October 9, 2026 21:05");
    }

    #[test]
    fn test_iso_format() {
        let f = ConfiguredFormatter::new(TimeFormat::Iso, 0).unwrap();
        assert_eq!(f.format(sample()), "2026-10-09T14:05:30Z");
    }

    #[test]
    fn test_custom_pattern() {
        let format = TimeFormat::parse("%d/%m/%Y").unwrap();
        let f = ConfiguredFormatter::new(format, 0).unwrap();
        assert_eq!(f.format(sample()), "09/10/2026");
    }

    #[test]
    fn test_parse_rejects_bad_pattern() {
        assert_eq!(TimeFormat::parse("LONG"), Some(TimeFormat::Long));
        assert_eq!(TimeFormat::parse("%Q"), None);
        assert_eq!(TimeFormat::parse("  "), None);
    }

    #[test]
    fn test_offset_out_of_range() {
        assert!(ConfiguredFormatter::new(TimeFormat::Long, 24 * 60).is_err());
    }
}
