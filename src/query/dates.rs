//! Date-range handling for `from`/`to`/`usedate`.
//!
//! Dates travel on the wire as `yyyyMMdd` and are stored in a parsed query as
//! epoch milliseconds of local midnight in the evaluation zone.

use crate::query::compiler::ParsedQuery;
use crate::query::types::{DateFieldSelector, QueryParameterKind};
use chrono::{
    DateTime, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Wire format of `from`/`to` values
pub const FILTER_DATE_FORMAT: &str = "%Y%m%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time zone '{0}': expected 'utc', 'local' or an offset like '+05:30'")]
pub struct ZoneParseError(pub String);

/// Time zone in which calendar dates are interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvalZone {
    #[default]
    Utc,
    /// The host's local zone
    Local,
    Fixed(FixedOffset),
}

impl EvalZone {
    /// Epoch millis of a wall-clock time in this zone. Ambiguous times pick the
    /// earliest instant, or the latest when `latest` is set; skipped times fail.
    fn epoch_millis_of(self, naive: NaiveDateTime, latest: bool) -> Option<i64> {
        match self {
            EvalZone::Utc => Some(naive.and_utc().timestamp_millis()),
            EvalZone::Local => resolve_local(Local.from_local_datetime(&naive), naive, latest),
            EvalZone::Fixed(offset) => {
                resolve_local(offset.from_local_datetime(&naive), naive, latest)
            },
        }
    }

    /// Calendar date of an instant in this zone
    fn date_of(self, epoch_millis: i64) -> Option<NaiveDate> {
        let utc = DateTime::<Utc>::from_timestamp_millis(epoch_millis)?;
        Some(match self {
            EvalZone::Utc => utc.date_naive(),
            EvalZone::Local => utc.with_timezone(&Local).date_naive(),
            EvalZone::Fixed(offset) => utc.with_timezone(&offset).date_naive(),
        })
    }
}

/// Pick one instant for a wall-clock time. A skipped time can come back with
/// the offset from before the transition, so the instant has to map back to the
/// same wall-clock time to count.
fn resolve_local<Tz: TimeZone>(
    result: LocalResult<DateTime<Tz>>,
    naive: NaiveDateTime,
    latest: bool,
) -> Option<i64> {
    let picked = if latest { result.latest() } else { result.earliest() }?;
    let round_trip = picked.timezone().from_utc_datetime(&picked.naive_utc());
    (round_trip.naive_local() == naive).then(|| picked.timestamp_millis())
}

impl FromStr for EvalZone {
    type Err = ZoneParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "utc" | "z" => return Ok(EvalZone::Utc),
            "local" => return Ok(EvalZone::Local),
            _ => {},
        }

        let err = || ZoneParseError(s.to_string());
        let (sign, rest) = match trimmed.split_at_checked(1) {
            Some(("+", rest)) => (1, rest),
            Some(("-", rest)) => (-1, rest),
            _ => return Err(err()),
        };
        let digits: String = rest.chars().filter(|c| *c != ':').collect();
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(err());
        }
        let hours: i32 = digits[..2].parse().map_err(|_| err())?;
        let minutes: i32 = digits[2..].parse().map_err(|_| err())?;
        if minutes >= 60 {
            return Err(err());
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(EvalZone::Fixed)
            .ok_or_else(err)
    }
}

impl fmt::Display for EvalZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalZone::Utc => write!(f, "utc"),
            EvalZone::Local => write!(f, "local"),
            EvalZone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

impl Serialize for EvalZone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EvalZone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a strict `yyyyMMdd` date into epoch millis of its midnight in `zone`.
pub fn parse_filter_date(value: &str, zone: EvalZone) -> Option<i64> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let date = NaiveDate::parse_from_str(value, FILTER_DATE_FORMAT).ok()?;
    zone.epoch_millis_of(date.and_hms_opt(0, 0, 0)?, false)
}

/// Inverse of [`parse_filter_date`]: the `yyyyMMdd` day containing the instant.
pub fn format_filter_date(epoch_millis: i64, zone: EvalZone) -> Option<String> {
    zone.date_of(epoch_millis).map(|date| date.format(FILTER_DATE_FORMAT).to_string())
}

/// Returns 23:59:59.999 of the calendar day (in `zone`) containing `epoch_millis`,
/// so a `to:` bound covers the whole named day. Instants outside the supported
/// calendar range are returned unchanged.
pub fn round_up_to_end_of_day(epoch_millis: i64, zone: EvalZone) -> i64 {
    zone.date_of(epoch_millis)
        .and_then(|date| date.and_hms_milli_opt(23, 59, 59, 999))
        .and_then(|end_of_day| zone.epoch_millis_of(end_of_day, true))
        .unwrap_or(epoch_millis)
}

/// First validated `from`/`to` value as epoch millis; 0 means no bound.
pub fn get_date_as_epoch(parsed: &ParsedQuery, kind: QueryParameterKind) -> i64 {
    parsed.first(kind).and_then(|value| value.parse::<i64>().ok()).unwrap_or(0)
}

/// The selected `usedate` field, `None` if the query did not pick one.
pub fn get_use_date_field(parsed: &ParsedQuery) -> Option<DateFieldSelector> {
    parsed.first(QueryParameterKind::UseDate).and_then(DateFieldSelector::from_token)
}
