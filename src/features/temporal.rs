//! Calendar and elapsed-time features. All instants are UTC.

use crate::error::{FeatureError, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use std::f64::consts::PI;

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Trained models expect the hour encoded with a 7 step period.
const HOUR_CYCLE_PERIOD: f64 = 7.0;
const DAY_CYCLE_PERIOD: f64 = 7.0;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an RFC 3339, naive datetime or bare date string. Naive values are taken as UTC.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>> {
    let v = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(v) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(v, fmt) {
            return Ok(naive.and_utc());
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(v, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }
    Err(FeatureError::InvalidTimestamp {
        field,
        value: value.to_string(),
    })
}

/// Like [`parse_timestamp`], treating blank and `NaT`/`null` markers as absent.
pub fn parse_optional_timestamp(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>> {
    match value.map(str::trim) {
        None => Ok(None),
        Some(v) if v.is_empty() || v.eq_ignore_ascii_case("nat") || v.eq_ignore_ascii_case("null") => {
            Ok(None)
        }
        Some(v) => parse_timestamp(field, v).map(Some),
    }
}

fn elapsed_days(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY
}

/// `ln(1 + days)` between account creation and the transaction; negative ages clamp to 0.
pub fn account_age_log_before_transaction(created: DateTime<Utc>, tx: DateTime<Utc>) -> f64 {
    let days = elapsed_days(created, tx);
    if days < 0.0 {
        tracing::debug!(%created, %tx, "account created after transaction; clamping age");
        return 0.0;
    }
    days.ln_1p()
}

/// 1 if the account is less than one day old at `now`.
pub fn account_is_new(created: DateTime<Utc>, now: DateTime<Utc>) -> i8 {
    (elapsed_days(created, now) < 1.0) as i8
}

/// Weekday with Monday = 0.
fn weekday(tx: DateTime<Utc>) -> u32 {
    tx.weekday().num_days_from_monday()
}

pub fn is_weekend(tx: DateTime<Utc>) -> i8 {
    (weekday(tx) >= 5) as i8
}

/// 22:00 through 05:59 inclusive.
pub fn is_sleeping_hours(tx: DateTime<Utc>) -> i8 {
    let hour = tx.hour();
    (hour >= 22 || hour <= 5) as i8
}

fn cyclic(value: f64, period: f64) -> (f64, f64) {
    let angle = 2.0 * PI * value / period;
    (angle.sin(), angle.cos())
}

pub fn day_of_week_cyclic(tx: DateTime<Utc>) -> (f64, f64) {
    cyclic(weekday(tx) as f64, DAY_CYCLE_PERIOD)
}

pub fn hour_of_day_cyclic(tx: DateTime<Utc>) -> (f64, f64) {
    cyclic(tx.hour() as f64, HOUR_CYCLE_PERIOD)
}

/// `ln(1 + hours)` since the previous transaction; 0.0 without history or when misordered.
pub fn time_since_last_transaction_log(current: DateTime<Utc>, last: Option<DateTime<Utc>>) -> f64 {
    let Some(last) = last else {
        return 0.0;
    };
    let hours = (current - last).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_HOUR;
    if hours < 0.0 {
        tracing::debug!(%current, %last, "previous transaction after current; no gap signal");
        return 0.0;
    }
    hours.ln_1p()
}
