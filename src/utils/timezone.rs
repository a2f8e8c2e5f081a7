use chrono::{DateTime, Local, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::AppError;

/// Timezone used to turn epoch timestamps into calendar dates.
///
/// `Local` follows the machine's zone, so the same history file can bucket
/// differently on two hosts; pass a named zone for reproducible reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Timezone {
    Local,
    Named(Tz),
}

impl Timezone {
    /// `None`, empty or "local" select the machine zone; "utc"/"z" and IANA
    /// names select a fixed zone.
    pub(crate) fn parse(value: Option<&str>) -> Result<Self, AppError> {
        let name = value.map(str::trim).unwrap_or_default();
        if name.is_empty() || name.eq_ignore_ascii_case("local") {
            Ok(Timezone::Local)
        } else if name.eq_ignore_ascii_case("utc") || name.eq_ignore_ascii_case("z") {
            Ok(Timezone::Named(chrono_tz::UTC))
        } else {
            name.parse::<Tz>()
                .map(Timezone::Named)
                .map_err(|_| AppError::InvalidTimezone {
                    input: name.to_string(),
                })
        }
    }

    /// Calendar date of an epoch-seconds timestamp, `None` when out of range
    pub(crate) fn date_of(self, epoch_secs: i64) -> Option<NaiveDate> {
        let utc = DateTime::<Utc>::from_timestamp(epoch_secs, 0)?;
        let date = match self {
            Timezone::Local => utc.with_timezone(&Local).date_naive(),
            Timezone::Named(tz) => utc.with_timezone(&tz).date_naive(),
        };
        Some(date)
    }
}
