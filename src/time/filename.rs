//! Filename timestamp parsing

use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

lazy_static! {
    /// Tolerant date pattern: YYYY MM DD with optional `.`, `_` or `-`
    /// separators, followed by up to three further two-digit groups
    /// (hour, minute, second), each independently optional.
    ///
    /// Matches names like `IMG_20230502_143015`, `photo_2023-05-02`
    /// or `2023.05.02_14`. Unanchored; the first match wins.
    static ref DATE_PATTERN: Regex = Regex::new(
        r"(\d{4})[._-]?(\d{2})[._-]?(\d{2})(?:[._-]?(\d{2}))?(?:[._-]?(\d{2}))?(?:[._-]?(\d{2}))?"
    )
    .unwrap();
}

/// Default hour when the filename carries a date but no time of day.
/// Mid-afternoon keeps date-only shots sorted between morning and
/// evening captures from the same day.
const DEFAULT_HOUR: u32 = 14;

/// Date and time fields extracted from a filename
///
/// Year, month and day are mandatory for a match; hour, minute and
/// second fall back to 14:00:00 when absent. Fields are raw captures:
/// calendar validation happens in [`FilenameDate::to_datetime`], not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilenameDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl FilenameDate {
    /// Validate the extracted fields and build a `NaiveDateTime`
    ///
    /// Accepts years 1970-2050 and defers day-in-month and time-of-day
    /// checks to chrono. Returns `None` for out-of-range dates.
    pub fn to_datetime(self) -> Option<NaiveDateTime> {
        if !(1970..=2050).contains(&self.year) {
            return None;
        }
        if !(1..=12).contains(&self.month) {
            return None;
        }
        if !(1..=31).contains(&self.day) {
            return None;
        }

        chrono::NaiveDate::from_ymd_opt(self.year, self.month, self.day)?
            .and_hms_opt(self.hour, self.minute, self.second)
    }
}

/// Extract a date from a filename
///
/// Returns `None` when no year/month/day triple is present anywhere in
/// the string. The result is unvalidated; callers decide what to do
/// with out-of-range dates.
pub fn parse_filename_date(filename: &str) -> Option<FilenameDate> {
    let caps = DATE_PATTERN.captures(filename)?;

    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let day: u32 = caps.get(3)?.as_str().parse().ok()?;
    let hour = capture_or(&caps, 4, DEFAULT_HOUR);
    let minute = capture_or(&caps, 5, 0);
    let second = capture_or(&caps, 6, 0);

    trace!(filename, year, month, day, hour, minute, second, "Matched date pattern");

    Some(FilenameDate {
        year,
        month,
        day,
        hour,
        minute,
        second,
    })
}

fn capture_or(caps: &regex::Captures<'_>, index: usize, default: u32) -> u32 {
    caps.get(index)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(default)
}
