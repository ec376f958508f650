//! Backup stamp formatting and parsing.
//!
//! Stamps are written in local time but carry no zone. Parsing first reads
//! them as UTC; a result that lands further in the future than the allowed
//! skew must have been a local stamp east of UTC, and is reinterpreted as
//! local time.

use crate::{Error, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

/// `strftime` layout of a backup stamp.
pub const STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Default future skew tolerated before a stamp is read as local time.
pub const DEFAULT_FUTURE_SKEW_MINUTES: i64 = 5;

/// Stamp for a backup taken now.
pub fn now_stamp() -> String {
    Local::now().format(STAMP_FORMAT).to_string()
}

fn parse_naive(stamp: &str) -> Option<NaiveDateTime> {
    if stamp.len() != 14 || !stamp.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).ok()
}

/// Parses a stamp with the default skew, relative to the current time.
///
/// Returns `None` for anything that is not a valid `YYYYMMDDHHMMSS` stamp.
pub fn parse_stamp(stamp: &str) -> Option<DateTime<Utc>> {
    parse_stamp_at(stamp, DEFAULT_FUTURE_SKEW_MINUTES, Utc::now())
}

/// Parses a stamp as of `now`, allowing `skew_minutes` of future drift.
pub fn parse_stamp_at(stamp: &str, skew_minutes: i64, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let naive = parse_naive(stamp)?;
    let as_utc = naive.and_utc();

    if as_utc - now > chrono::Duration::minutes(skew_minutes) {
        // Nonexistent local times (DST gaps) keep the UTC reading.
        if let Some(local) = Local.from_local_datetime(&naive).earliest() {
            return Some(local.with_timezone(&Utc));
        }
    }
    Some(as_utc)
}

/// Validates a cutoff stamp for pruning.
///
/// # Errors
/// `InvalidStamp` when `stamp` is not `YYYYMMDDHHMMSS`.
pub fn parse_cutoff(stamp: &str) -> Result<DateTime<Utc>> {
    parse_stamp(stamp).ok_or_else(|| Error::InvalidStamp {
        stamp: stamp.to_string(),
    })
}
