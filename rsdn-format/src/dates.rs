//! Post timestamps as shown to readers.
//!
//! Timestamps are stored in UTC. The client offset comes from the
//! [`HostContext`] and is applied before formatting.

use crate::host::HostContext;
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, Utc};

const MAX_OFFSET_MINUTES: f64 = 24.0 * 60.0;

/// `dd.MM.yy HH:mm`
pub const YEAR_FORMAT: &str = "%d.%m.%y %H:%M";
/// `dd.MM.yy`
pub const LONG_FORMAT: &str = "%d.%m.%y";
/// `dd.MM HH:mm`
pub const SHORT_FORMAT: &str = "%d.%m %H:%M";

fn offset(minutes: f64) -> Duration {
    let minutes = if minutes.is_finite() {
        minutes.clamp(-MAX_OFFSET_MINUTES, MAX_OFFSET_MINUTES)
    } else {
        0.0
    };
    Duration::seconds((minutes * 60.0).round() as i64)
}

/// Shift a UTC timestamp by the client offset. Near the ends of the
/// representable range the timestamp is returned unshifted.
pub fn correct(server_time: DateTime<Utc>, offset_minutes: f64) -> NaiveDateTime {
    let time = server_time.naive_utc();
    time.checked_add_signed(offset(offset_minutes)).unwrap_or(time)
}

pub fn to_client_time(server_time: DateTime<Utc>, host: &dyn HostContext) -> NaiveDateTime {
    correct(server_time, host.timezone_offset_minutes())
}

/// Inverse of [`to_client_time`].
pub fn to_server_time(client_time: NaiveDateTime, host: &dyn HostContext) -> DateTime<Utc> {
    client_time
        .checked_sub_signed(offset(host.timezone_offset_minutes()))
        .unwrap_or(client_time)
        .and_utc()
}

pub fn to_year_string(time: &NaiveDateTime) -> String {
    time.format(YEAR_FORMAT).to_string()
}

pub fn to_long_string(time: &NaiveDateTime) -> String {
    time.format(LONG_FORMAT).to_string()
}

pub fn to_short_string(time: &NaiveDateTime) -> String {
    time.format(SHORT_FORMAT).to_string()
}

/// Short form for the last six months relative to `now`, date only before.
pub fn to_depend_string(time: &NaiveDateTime, now: &NaiveDateTime) -> String {
    let recent = now
        .checked_sub_months(Months::new(6))
        .is_some_and(|cutoff| *time > cutoff);
    if recent {
        to_short_string(time)
    } else {
        to_long_string(time)
    }
}

pub fn day_beginning(time: &NaiveDateTime) -> NaiveDateTime {
    time.date().and_time(chrono::NaiveTime::MIN)
}

pub fn month_beginning(time: &NaiveDateTime) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(time.year(), time.month(), 1)
        .unwrap_or(time.date())
        .and_time(chrono::NaiveTime::MIN)
}
