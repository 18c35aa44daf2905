//! Minutes-since-midnight clock helpers.

use chrono::{Duration, NaiveTime, Timelike};

use crate::error::ParseTimeError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Add minutes to a clock value, wrapping at midnight.
pub fn add_minutes(time: u32, minutes: u32) -> u32 {
    (time % MINUTES_PER_DAY + minutes % MINUTES_PER_DAY) % MINUTES_PER_DAY
}

/// Render a clock value as "9:05 AM". Values past midnight wrap.
pub fn format_time(minutes: u32) -> String {
    let time = NaiveTime::MIN + Duration::minutes(i64::from(minutes % MINUTES_PER_DAY));
    time.format("%-I:%M %p").to_string()
}

/// Render a span as "2h 30m", "2h" or "45m".
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Parse "9:00 AM" style strings into minutes since midnight.
pub fn parse_time_string(input: &str) -> Result<u32, ParseTimeError> {
    NaiveTime::parse_from_str(input.trim(), "%I:%M %p")
        .map(|time| time.hour() * 60 + time.minute())
        .map_err(|_| ParseTimeError {
            input: input.to_string(),
        })
}
