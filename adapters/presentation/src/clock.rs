//! Wall-clock formatting for the HUD and completion results.

use std::{error::Error, fmt};

/// Formats milliseconds as `MM:SS.d`, flooring to whole tenths.
///
/// Minutes grow past two digits instead of wrapping, so very long runs stay
/// readable.
#[must_use]
pub fn format_time(milliseconds: u64) -> String {
    let total_seconds = milliseconds / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    let tenths = milliseconds % 1000 / 100;
    format!("{minutes:02}:{seconds:02}.{tenths}")
}

/// Parses a `MM:SS.d` string back into milliseconds.
///
/// Accepts any number of minute digits; seconds must be two digits below 60
/// and tenths a single digit.
pub fn parse_time(value: &str) -> Result<u64, TimeParseError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TimeParseError::Empty);
    }

    let (minutes_text, rest) = trimmed
        .split_once(':')
        .ok_or(TimeParseError::MissingMinuteSeparator)?;
    let (seconds_text, tenths_text) = rest
        .split_once('.')
        .ok_or(TimeParseError::MissingTenthsSeparator)?;

    let minutes: u32 = parse_digits(minutes_text)
        .ok_or_else(|| TimeParseError::InvalidMinutes {
            text: minutes_text.to_owned(),
        })?;

    if seconds_text.len() != 2 {
        return Err(TimeParseError::InvalidSeconds {
            text: seconds_text.to_owned(),
        });
    }
    let seconds: u32 = parse_digits(seconds_text)
        .ok_or_else(|| TimeParseError::InvalidSeconds {
            text: seconds_text.to_owned(),
        })?;
    if seconds >= 60 {
        return Err(TimeParseError::SecondsOutOfRange { seconds });
    }

    if tenths_text.len() != 1 {
        return Err(TimeParseError::InvalidTenths {
            text: tenths_text.to_owned(),
        });
    }
    let tenths: u32 = parse_digits(tenths_text)
        .ok_or_else(|| TimeParseError::InvalidTenths {
            text: tenths_text.to_owned(),
        })?;

    Ok(u64::from(minutes) * 60_000 + u64::from(seconds) * 1_000 + u64::from(tenths) * 100)
}

fn parse_digits(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Errors raised when a time string cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimeParseError {
    /// The input contained no characters besides whitespace.
    Empty,
    /// The `:` between minutes and seconds was absent.
    MissingMinuteSeparator,
    /// The `.` between seconds and tenths was absent.
    MissingTenthsSeparator,
    /// The minutes field was not an unsigned number.
    InvalidMinutes {
        /// Field text that failed to parse.
        text: String,
    },
    /// The seconds field was not a two-digit number.
    InvalidSeconds {
        /// Field text that failed to parse.
        text: String,
    },
    /// The seconds field named a value of sixty or more.
    SecondsOutOfRange {
        /// Parsed seconds value.
        seconds: u32,
    },
    /// The tenths field was not a single digit.
    InvalidTenths {
        /// Field text that failed to parse.
        text: String,
    },
}

impl fmt::Display for TimeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "time string was empty"),
            Self::MissingMinuteSeparator => {
                write!(f, "time string is missing the ':' minute separator")
            }
            Self::MissingTenthsSeparator => {
                write!(f, "time string is missing the '.' tenths separator")
            }
            Self::InvalidMinutes { text } => {
                write!(f, "minutes field '{text}' is not an unsigned number")
            }
            Self::InvalidSeconds { text } => {
                write!(f, "seconds field '{text}' is not a two-digit number")
            }
            Self::SecondsOutOfRange { seconds } => {
                write!(f, "seconds field must be below 60 (received {seconds})")
            }
            Self::InvalidTenths { text } => {
                write!(f, "tenths field '{text}' is not a single digit")
            }
        }
    }
}

impl Error for TimeParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_floors_to_tenths() {
        assert_eq!(format_time(0), "00:00.0");
        assert_eq!(format_time(999), "00:00.9");
        assert_eq!(format_time(1_000), "00:01.0");
        assert_eq!(format_time(59_999), "00:59.9");
        assert_eq!(format_time(60_000), "01:00.0");
        assert_eq!(format_time(83_449), "01:23.4");
    }

    #[test]
    fn long_runs_keep_all_minute_digits() {
        assert_eq!(format_time(3_723_400), "62:03.4");
        assert_eq!(format_time(36_000_000), "600:00.0");
    }

    #[test]
    fn parsing_inverts_formatting() {
        assert_eq!(parse_time("00:00.0"), Ok(0));
        assert_eq!(parse_time("01:23.4"), Ok(83_400));
        assert_eq!(parse_time("62:03.4"), Ok(3_723_400));
        assert_eq!(parse_time("5:30.2"), Ok(330_200));
        assert_eq!(parse_time(" 01:00.0 "), Ok(60_000));
    }

    #[test]
    fn formatted_strings_are_stable_through_a_parse_cycle() {
        for milliseconds in [0, 999, 60_000, 83_449, 3_723_400, 7_260_123] {
            let formatted = format_time(milliseconds);
            let reparsed = parse_time(&formatted).unwrap();
            assert_eq!(format_time(reparsed), formatted);
        }
    }

    #[test]
    fn malformed_strings_are_rejected() {
        assert_eq!(parse_time(""), Err(TimeParseError::Empty));
        assert_eq!(parse_time("   "), Err(TimeParseError::Empty));
        assert_eq!(parse_time("1234"), Err(TimeParseError::MissingMinuteSeparator));
        assert_eq!(parse_time("01:234"), Err(TimeParseError::MissingTenthsSeparator));
        assert_eq!(
            parse_time("aa:00.0"),
            Err(TimeParseError::InvalidMinutes {
                text: "aa".to_owned()
            })
        );
        assert_eq!(
            parse_time("+5:00.0"),
            Err(TimeParseError::InvalidMinutes {
                text: "+5".to_owned()
            })
        );
        assert_eq!(
            parse_time("01:7.0"),
            Err(TimeParseError::InvalidSeconds {
                text: "7".to_owned()
            })
        );
        assert_eq!(
            parse_time("01:71.0"),
            Err(TimeParseError::SecondsOutOfRange { seconds: 71 })
        );
        assert_eq!(
            parse_time("01:00.45"),
            Err(TimeParseError::InvalidTenths {
                text: "45".to_owned()
            })
        );
    }

    #[test]
    fn error_messages_name_the_offending_field() {
        assert_eq!(
            parse_time("01:99.0").unwrap_err().to_string(),
            "seconds field must be below 60 (received 99)"
        );
        assert_eq!(
            parse_time("x:00.0").unwrap_err().to_string(),
            "minutes field 'x' is not an unsigned number"
        );
    }
}
