use std::str::FromStr;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

static TICKTICK_DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^([a-z]+)\.?\s+(\d{1,2}),?\s+(\d{4})(?:\s+(?:at\s+)?(\d{1,2}):(\d{2})\s*(AM|PM))?$",
    )
    .unwrap()
});

static MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

static FALLBACK_DATETIME_FORMATS: [&str; 13] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
    "%B %d %Y %I:%M %p",
    "%B %d %Y %H:%M",
    "%d %B %Y %I:%M %p",
    "%d %B %Y %H:%M",
];

static FALLBACK_DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d %Y", "%d %B %Y"];

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
#[error("Unrecognized date format: {0:?}")]
pub struct TaskDateParseError(pub String);

/// A date exported by TickTick, with or without a time of day.
///
/// Times are local to the account's timezone: TickTick does not export any
/// offset, so the offset is attached when rendering.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TaskDate {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl TaskDate {
    /// Render as `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:00.000+HH:MM`
    pub fn format_with_offset(&self, offset: &FixedOffset) -> String {
        match self {
            TaskDate::Date(date) => date.format("%Y-%m-%d").to_string(),
            TaskDate::DateTime(datetime) => {
                format!("{}{}", datetime.format("%Y-%m-%dT%H:%M:00.000"), offset)
            }
        }
    }

    fn parse_ticktick_format(s: &str) -> Option<Result<Self, TaskDateParseError>> {
        let captures = TICKTICK_DATE_PATTERN.captures(s)?;
        // Any other word followed by numbers is left to the generic parser
        let month = month_from_name(&captures[1])?;
        let invalid = || TaskDateParseError(s.to_string());

        let day: u32 = captures[2].parse().ok()?;
        let year: i32 = captures[3].parse().ok()?;
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            return Some(Err(invalid()));
        };

        let Some(hour) = captures.get(4) else {
            return Some(Ok(TaskDate::Date(date)));
        };
        let hour: u32 = hour.as_str().parse().ok()?;
        let minute: u32 = captures[5].parse().ok()?;
        if !(1..=12).contains(&hour) {
            return Some(Err(invalid()));
        }
        let is_pm = captures[6].eq_ignore_ascii_case("PM");
        let hour = (hour % 12) + if is_pm { 12 } else { 0 };

        Some(
            NaiveTime::from_hms_opt(hour, minute, 0)
                .map(|time| TaskDate::DateTime(date.and_time(time)))
                .ok_or_else(invalid),
        )
    }

    fn parse_generic_format(s: &str) -> Result<Self, TaskDateParseError> {
        let cleaned = remove_date_noise(s);

        for format in FALLBACK_DATETIME_FORMATS {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(&cleaned, format) {
                return Ok(TaskDate::DateTime(
                    datetime.with_second(0).unwrap_or(datetime),
                ));
            }
        }

        for format in FALLBACK_DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(&cleaned, format) {
                return Ok(TaskDate::Date(date));
            }
        }

        Err(TaskDateParseError(s.to_string()))
    }
}

impl FromStr for TaskDate {
    type Err = TaskDateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(result) = TaskDate::parse_ticktick_format(s) {
            return result;
        }

        TaskDate::parse_generic_format(s)
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    if name.len() < 3 {
        return None;
    }

    MONTH_NAMES
        .iter()
        .position(|month| month.starts_with(name.as_str()))
        .map(|index| index as u32 + 1)
}

/// Drop the ` at ` separator, detach `AM`/`PM` markers from the time and
/// collapse commas and whitespace.
fn remove_date_noise(s: &str) -> String {
    let without_at = s.replacen(" at ", " ", 1).replace(',', " ");
    let mut cleaned = without_at.split_whitespace().collect::<Vec<_>>().join(" ");

    for marker in ["AM", "PM", "am", "pm"] {
        if let Some(prefix) = cleaned.strip_suffix(marker) {
            if prefix.ends_with(|c: char| c.is_ascii_digit()) {
                cleaned = format!("{prefix} {marker}");
            }
            break;
        }
    }

    cleaned
}
