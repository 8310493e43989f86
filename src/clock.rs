use chrono::{DateTime, Local};

use crate::error::{ExtractError, Result};

const COARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FINE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f";

/// Time zone used to render timestamps in the output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    #[default]
    Local,
    Utc,
}

impl Clock {
    /// Whole-second wall time for the `time` column.
    pub fn format_coarse(self, secs: i64) -> Result<String> {
        self.format(secs, 0, COARSE_FORMAT)
    }

    /// Wall time with nine fractional digits for the `detailed_timestamp` column.
    pub fn format_fine(self, secs: i64, nanos: u32) -> Result<String> {
        self.format(secs, nanos, FINE_FORMAT)
    }

    fn format(self, secs: i64, nanos: u32, fmt: &str) -> Result<String> {
        let instant =
            DateTime::from_timestamp(secs, nanos).ok_or(ExtractError::TimestampRange { secs })?;
        Ok(match self {
            Self::Local => instant.with_timezone(&Local).format(fmt).to_string(),
            Self::Utc => instant.format(fmt).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_coarse_has_no_fraction() {
        assert_eq!(Clock::Utc.format_coarse(0).unwrap(), "1970-01-01 00:00:00");
        assert_eq!(
            Clock::Utc.format_coarse(978_307_200).unwrap(),
            "2001-01-01 00:00:00"
        );
    }

    #[test]
    fn utc_fine_always_prints_nine_digits() {
        assert_eq!(
            Clock::Utc.format_fine(0, 0).unwrap(),
            "1970-01-01 00:00:00.000000000"
        );
        assert_eq!(
            Clock::Utc.format_fine(1, 333_333_333).unwrap(),
            "1970-01-01 00:00:01.333333333"
        );
    }

    #[test]
    fn local_matches_chrono_local_rendering() {
        let expected = DateTime::from_timestamp(1_000, 0)
            .unwrap()
            .with_timezone(&Local)
            .format(COARSE_FORMAT)
            .to_string();
        assert_eq!(Clock::Local.format_coarse(1_000).unwrap(), expected);
    }

    #[test]
    fn out_of_range_seconds_are_an_error() {
        for clock in [Clock::Utc, Clock::Local] {
            assert!(matches!(
                clock.format_coarse(i64::MAX / 2),
                Err(ExtractError::TimestampRange { secs }) if secs == i64::MAX / 2
            ));
            assert!(matches!(
                clock.format_fine(i64::MIN / 2, 0),
                Err(ExtractError::TimestampRange { .. })
            ));
        }
    }
}
