//! Human-friendly duration strings.
//!
//! Goal definitions say "every 1 week" or "snooze 30 minutes". This module turns
//! those strings into validated, strictly positive [`chrono::Duration`] values
//! at the configuration boundary; the goal state machine itself only ever sees
//! structured durations.
//!
//! Grammar: one or more `<number><unit>` terms, e.g. `"1 week"`, `"2h30m"`,
//! `"1 day and 12 hours"`, `"1.5 hours"`. A bare number is read as seconds.
//! Months are 30 days and years 365 days.

use chrono::Duration;

use crate::error::ConfigError;

const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;
const WEEK: f64 = 7.0 * DAY;
const MONTH: f64 = 30.0 * DAY;
const YEAR: f64 = 365.0 * DAY;

/// Parse a duration string into a strictly positive duration.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidDuration`] naming `input` when it is empty,
/// contains an unknown unit or a unit without a number, or adds up to zero.
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration {
        input: input.to_string(),
    };

    let mut rest = input.trim();
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total_secs = 0.0_f64;
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if num_len == 0 {
            return Err(invalid());
        }
        let value: f64 = rest[..num_len].parse().map_err(|_| invalid())?;
        rest = rest[num_len..].trim_start();

        let unit_len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let unit = rest[..unit_len].to_ascii_lowercase();
        let scale = unit_seconds(&unit).ok_or_else(invalid)?;
        total_secs += value * scale;

        rest = skip_separators(&rest[unit_len..]);
        if let Some(after) = rest.strip_prefix("and") {
            // "and" must stand alone and be followed by another term.
            if !after.starts_with(|c: char| c.is_whitespace() || c.is_ascii_digit()) {
                return Err(invalid());
            }
            rest = skip_separators(after);
            if rest.is_empty() {
                return Err(invalid());
            }
        }
    }

    let millis = (total_secs * 1000.0).round();
    if !millis.is_finite() || millis < 1.0 || millis >= i64::MAX as f64 {
        return Err(invalid());
    }
    Duration::try_milliseconds(millis as i64).ok_or_else(invalid)
}

/// Render a duration in the largest whole units, e.g. `"1w 2d 3h"`.
///
/// Milliseconds are kept (`"1s 500ms"`), so any value [`parse_duration`]
/// returns formats back to the same duration.
pub fn format_duration(duration: Duration) -> String {
    let mut millis = duration.num_milliseconds();
    if millis <= 0 {
        return "0s".to_string();
    }

    let mut parts = Vec::new();
    for (unit, size) in [
        ("w", 604_800_000),
        ("d", 86_400_000),
        ("h", 3_600_000),
        ("m", 60_000),
        ("s", 1_000),
        ("ms", 1),
    ] {
        let count = millis / size;
        if count > 0 {
            parts.push(format!("{count}{unit}"));
            millis -= count * size;
        }
    }
    parts.join(" ")
}

fn skip_separators(s: &str) -> &str {
    s.trim_start_matches(|c: char| c.is_whitespace() || c == ',')
}

fn unit_seconds(unit: &str) -> Option<f64> {
    let scale = match unit {
        "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => 0.001,
        "" | "s" | "sec" | "secs" | "second" | "seconds" => 1.0,
        "m" | "min" | "mins" | "minute" | "minutes" => MINUTE,
        "h" | "hr" | "hrs" | "hour" | "hours" => HOUR,
        "d" | "day" | "days" => DAY,
        "w" | "wk" | "wks" | "week" | "weeks" => WEEK,
        "mo" | "month" | "months" => MONTH,
        "y" | "yr" | "yrs" | "year" | "years" => YEAR,
        _ => return None,
    };
    Some(scale)
}
