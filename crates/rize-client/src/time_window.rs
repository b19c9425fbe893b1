//! Start/end resolution for new sessions

use chrono::{DateTime, Duration, NaiveDateTime, SecondsFormat, Timelike as _, Utc};

use crate::error::RizeError;

/// Session length used when the caller does not supply one
pub const DEFAULT_SESSION_MINUTES: i64 = 90;

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a user supplied timestamp.
///
/// RFC 3339 timestamps with an offset are converted to UTC. Anything else is read as a naive
/// timestamp in UTC, with an optional trailing `Z`.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RizeError> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let naive = trimmed.strip_suffix('Z').unwrap_or(trimmed);

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(naive, format).ok())
        .map(|parsed| parsed.and_utc())
        .ok_or_else(|| RizeError::TimeFormat(raw.to_string()))
}

/// Format a timestamp the way the upstream expects it: second precision with a `Z` designator
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// A resolved session window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SessionWindow {
    /// Resolve a window from whichever bounds were provided.
    ///
    /// Both bounds are used verbatim. A single bound is extended by `duration_minutes` in the
    /// missing direction, and with no bounds at all the window starts at `now`.
    pub fn resolve(
        start_time: Option<&str>,
        end_time: Option<&str>,
        duration_minutes: i64,
        now: DateTime<Utc>,
    ) -> Result<Self, RizeError> {
        let out_of_range = || RizeError::DurationOutOfRange(duration_minutes);
        let duration = Duration::try_minutes(duration_minutes).ok_or_else(out_of_range)?;
        let after = |start: DateTime<Utc>| {
            start
                .checked_add_signed(duration)
                .ok_or_else(out_of_range)
        };

        let (start, end) = match (start_time, end_time) {
            (Some(start), Some(end)) => (parse_timestamp(start)?, parse_timestamp(end)?),
            (Some(start), None) => {
                let start = parse_timestamp(start)?;
                (start, after(start)?)
            }
            (None, Some(end)) => {
                let end = parse_timestamp(end)?;
                let start = end.checked_sub_signed(duration).ok_or_else(out_of_range)?;
                (start, end)
            }
            (None, None) => {
                let start = now.with_nanosecond(0).unwrap_or(now);
                (start, after(start)?)
            }
        };

        Ok(Self { start, end })
    }

    pub fn start_time(&self) -> String {
        format_timestamp(&self.start)
    }

    pub fn end_time(&self) -> String {
        format_timestamp(&self.end)
    }
}
