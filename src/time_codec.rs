/*!
 * Conversion between milliseconds and the textual time representations used
 * by each subtitle dialect.
 *
 * Two families of checks live here and are kept apart on purpose:
 * - [`parse_time`] is tolerant and is what the format parsers build on.
 * - [`is_valid_time`] is strict (exact digit groups and numeric ranges) and is
 *   meant for validating user-entered time fields.
 */

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;

pub const TIME_UNIT_HOUR: u64 = 3_600_000;
pub const TIME_UNIT_MINUTE: u64 = 60_000;
pub const TIME_UNIT_SECOND: u64 = 1_000;

/// Textual time layouts understood by the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimePattern {
    /// `h:mm:ss.cs` (Advanced SubStation Alpha, centiseconds)
    AssCentiseconds,
    /// `hh:mm:ss,SSS` (SubRip)
    SubRip,
    /// `hh:mm:ss.SSS` (WebVTT long form)
    WebVtt,
    /// `mm:ss.SS` (LRC lyrics, centiseconds)
    Lrc,
    /// `hh:mm:ss`
    HoursMinutesSeconds,
    /// `mm:ss`
    MinutesSeconds,
}

impl TimePattern {
    pub const ALL: [TimePattern; 6] = [
        TimePattern::AssCentiseconds,
        TimePattern::SubRip,
        TimePattern::WebVtt,
        TimePattern::Lrc,
        TimePattern::HoursMinutesSeconds,
        TimePattern::MinutesSeconds,
    ];

    /// The pattern string, e.g. `hh:mm:ss,SSS`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssCentiseconds => "h:mm:ss.cs",
            Self::SubRip => "hh:mm:ss,SSS",
            Self::WebVtt => "hh:mm:ss.SSS",
            Self::Lrc => "mm:ss.SS",
            Self::HoursMinutesSeconds => "hh:mm:ss",
            Self::MinutesSeconds => "mm:ss",
        }
    }

    /// Smallest time step the pattern can represent, in milliseconds.
    /// Patterns without a fraction only keep whole seconds.
    pub fn resolution_ms(&self) -> u64 {
        match self {
            Self::SubRip | Self::WebVtt => 1,
            Self::AssCentiseconds | Self::Lrc => 10,
            Self::HoursMinutesSeconds | Self::MinutesSeconds => TIME_UNIT_SECOND,
        }
    }
}

impl fmt::Display for TimePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimePattern {
    type Err = SubtitleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|pattern| pattern.as_str() == s)
            .ok_or_else(|| SubtitleError::UnsupportedTimePattern(s.to_string()))
    }
}

/// Format milliseconds with the given pattern.
///
/// Components are truncated, never rounded. Patterns without an hour group
/// (`mm:ss.SS`, `mm:ss`) drop the hours entirely.
pub fn format_time(ms: u64, pattern: TimePattern) -> String {
    let hours = ms / TIME_UNIT_HOUR;
    let minutes = (ms % TIME_UNIT_HOUR) / TIME_UNIT_MINUTE;
    let seconds = (ms % TIME_UNIT_MINUTE) / TIME_UNIT_SECOND;
    let millis = ms % TIME_UNIT_SECOND;

    match pattern {
        TimePattern::AssCentiseconds => {
            format!("{}:{:02}:{:02}.{:02}", hours, minutes, seconds, millis / 10)
        }
        TimePattern::SubRip => format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis),
        TimePattern::WebVtt => format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis),
        TimePattern::Lrc => format!("{:02}:{:02}.{:02}", minutes, seconds, millis / 10),
        TimePattern::HoursMinutesSeconds => format!("{:02}:{:02}:{:02}", hours, minutes, seconds),
        TimePattern::MinutesSeconds => format!("{:02}:{:02}", minutes, seconds),
    }
}

/// Format milliseconds with a pattern given as a string
pub fn format_time_str(ms: u64, pattern: &str) -> Result<String, SubtitleError> {
    Ok(format_time(ms, pattern.parse()?))
}

/// Parse `hh:mm:ss[,.]SSS` or `mm:ss[,.]SSS` into milliseconds.
///
/// `,` and `.` are interchangeable. The fraction is right-padded with zeros
/// or truncated to three digits, so `5` is 500ms and `5678` is 567ms. There
/// are no range checks: `00:75.00` is 75 seconds.
pub fn parse_time(text: &str) -> Result<u64, SubtitleError> {
    let invalid = || SubtitleError::InvalidTimeFormat(text.to_string());

    let normalized = text.trim().replace(',', ".");
    let parts: Vec<&str> = normalized.split(':').collect();
    let (hours, minutes, seconds_millis) = match parts.as_slice() {
        [hours, minutes, seconds] => (*hours, *minutes, *seconds),
        [minutes, seconds] => ("0", *minutes, *seconds),
        _ => return Err(invalid()),
    };

    let (seconds, fraction) = match seconds_millis.split_once('.') {
        Some((seconds, fraction)) => (seconds, Some(fraction)),
        None => (seconds_millis, None),
    };

    let millis = match fraction {
        Some(fraction) => normalize_fraction(fraction).ok_or_else(invalid)?,
        None => 0,
    };

    let hours = parse_component(hours).ok_or_else(invalid)?;
    let minutes = parse_component(minutes).ok_or_else(invalid)?;
    let seconds = parse_component(seconds).ok_or_else(invalid)?;

    combine(hours, minutes, seconds, millis).ok_or_else(invalid)
}

/// Parse an ASS timestamp, which must be exactly `h:mm:ss.cc`
pub fn parse_ass_time(text: &str) -> Result<u64, SubtitleError> {
    let invalid = || SubtitleError::InvalidTimeFormat(format!("Invalid ASS time format: {}", text));

    let parts: Vec<&str> = text.trim().split(':').collect();
    let [hours, minutes, seconds_centis] = parts.as_slice() else {
        return Err(invalid());
    };

    let (seconds, centis) = seconds_centis.split_once('.').ok_or_else(invalid)?;
    if centis.len() != 2 {
        return Err(invalid());
    }

    let hours = parse_component(hours).ok_or_else(invalid)?;
    let minutes = parse_component(minutes).ok_or_else(invalid)?;
    let seconds = parse_component(seconds).ok_or_else(invalid)?;
    let centis = parse_component(centis).ok_or_else(invalid)?;

    combine(hours, minutes, seconds, centis * 10).ok_or_else(invalid)
}

/// Strict structural validation of a time string against a pattern.
///
/// Every digit group must have its exact width and be in range: hours 0-99
/// (a single digit 0-9 for the ASS pattern), minutes and seconds 0-59,
/// centiseconds 0-99, milliseconds 0-999. `,` and `.` are interchangeable.
pub fn is_valid_time(text: &str, pattern: TimePattern) -> bool {
    let normalized = text.replace(',', ".");
    let parts: Vec<&str> = normalized.split(':').collect();

    match (pattern, parts.as_slice()) {
        (TimePattern::SubRip | TimePattern::WebVtt, [hours, minutes, seconds]) => {
            is_in_range(hours, 0, 99, 2)
                && is_in_range(minutes, 0, 59, 2)
                && is_valid_seconds(seconds, Fraction::Millis)
        }
        (TimePattern::AssCentiseconds, [hours, minutes, seconds]) => {
            is_in_range(hours, 0, 9, 1)
                && is_in_range(minutes, 0, 59, 2)
                && is_valid_seconds(seconds, Fraction::Centis)
        }
        (TimePattern::HoursMinutesSeconds, [hours, minutes, seconds]) => {
            is_in_range(hours, 0, 99, 2)
                && is_in_range(minutes, 0, 59, 2)
                && is_in_range(seconds, 0, 59, 2)
        }
        (TimePattern::Lrc, [minutes, seconds]) => {
            is_in_range(minutes, 0, 59, 2) && is_valid_seconds(seconds, Fraction::OptionalCentis)
        }
        (TimePattern::MinutesSeconds, [minutes, seconds]) => {
            is_in_range(minutes, 0, 59, 2) && is_in_range(seconds, 0, 59, 2)
        }
        _ => false,
    }
}

/// [`is_valid_time`] with the pattern given as a string
pub fn is_valid_time_str(text: &str, pattern: &str) -> Result<bool, SubtitleError> {
    Ok(is_valid_time(text, pattern.parse()?))
}

/// Move a time string by `delta_ms` and reformat it with the same pattern.
///
/// The text comes back unchanged when it is not a valid time for `pattern`
/// or when the result would be negative.
pub fn shift_time_text(text: &str, delta_ms: i64, pattern: TimePattern) -> String {
    if !is_valid_time(text, pattern) {
        return text.to_string();
    }

    let Ok(ms) = parse_time(text) else {
        return text.to_string();
    };

    match i64::try_from(ms).ok().and_then(|ms| ms.checked_add(delta_ms)) {
        Some(shifted) if shifted >= 0 => format_time(shifted as u64, pattern),
        _ => text.to_string(),
    }
}

/// Checks that `value` has exactly `expected_len` ASCII digits and that its
/// numeric value is within `min..=max`
pub fn is_in_range(value: &str, min: u32, max: u32, expected_len: usize) -> bool {
    value.len() == expected_len
        && value.bytes().all(|b| b.is_ascii_digit())
        && value.parse::<u32>().is_ok_and(|n| (min..=max).contains(&n))
}

#[derive(Clone, Copy)]
enum Fraction {
    Millis,
    Centis,
    OptionalCentis,
}

fn is_valid_seconds(seconds_fraction: &str, fraction: Fraction) -> bool {
    let parts: Vec<&str> = seconds_fraction.split('.').collect();
    match (fraction, parts.as_slice()) {
        (Fraction::OptionalCentis, [seconds]) => is_in_range(seconds, 0, 59, 2),
        (Fraction::OptionalCentis | Fraction::Centis, [seconds, centis]) => {
            is_in_range(seconds, 0, 59, 2) && is_in_range(centis, 0, 99, 2)
        }
        (Fraction::Millis, [seconds, millis]) => {
            is_in_range(seconds, 0, 59, 2) && is_in_range(millis, 0, 999, 3)
        }
        _ => false,
    }
}

fn parse_component(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

// Fraction digits right-padded / truncated to milliseconds
fn normalize_fraction(fraction: &str) -> Option<u64> {
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut digits: String = fraction.chars().take(3).collect();
    while digits.len() < 3 {
        digits.push('0');
    }
    digits.parse().ok()
}

fn combine(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Option<u64> {
    hours
        .checked_mul(TIME_UNIT_HOUR)?
        .checked_add(minutes.checked_mul(TIME_UNIT_MINUTE)?)?
        .checked_add(seconds.checked_mul(TIME_UNIT_SECOND)?)?
        .checked_add(millis)
}
