//! Timestamp parsing.
//!
//! Point-of-sale and time-clock exports disagree on how they write times, so
//! the parser tries a configured, ordered list of `chrono` formats and keeps
//! the first one that matches.

use chrono::{Datelike, NaiveDateTime};

use crate::config::{DEFAULT_TIMESTAMP_FORMATS, EngineSettings};
use crate::error::{EngineError, EngineResult};

/// Parses export timestamps with an ordered list of formats.
///
/// # Example
///
/// ```
/// use tip_pool_engine::calculation::TimestampParser;
/// use chrono::NaiveDateTime;
///
/// let parser = TimestampParser::default();
/// let expected =
///     NaiveDateTime::parse_from_str("2024-01-10 23:15", "%Y-%m-%d %H:%M").unwrap();
///
/// assert_eq!(parser.parse("01/10/2024 23:15").unwrap(), expected);
/// assert_eq!(parser.parse("01/10/24 11:15 PM").unwrap(), expected);
/// assert!(parser.parse("Jan 10th, late").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampParser {
    formats: Vec<String>,
}

impl TimestampParser {
    /// Creates a parser that tries `formats` in order.
    pub fn new<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            formats: formats.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a parser from the engine settings.
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self::new(settings.timestamp_formats.iter().cloned())
    }

    /// The formats tried, in order.
    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    /// Parses `text` with the first format that accepts it.
    ///
    /// Surrounding whitespace is ignored. Returns `DateFormat` carrying the
    /// original text when no format matches.
    pub fn parse(&self, text: &str) -> EngineResult<NaiveDateTime> {
        let trimmed = text.trim();
        self.formats
            .iter()
            .find_map(|format| {
                NaiveDateTime::parse_from_str(trimmed, format)
                    .ok()
                    .filter(|parsed| accepts_year(format, parsed))
            })
            .ok_or_else(|| EngineError::DateFormat {
                text: text.to_string(),
            })
    }
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self::new(DEFAULT_TIMESTAMP_FORMATS)
    }
}

/// `%Y` reads any number of digits; require four so `01/10/24 ...` falls
/// through to a two-digit-year format instead of landing in year 24.
fn accepts_year(format: &str, parsed: &NaiveDateTime) -> bool {
    !format.contains("%Y") || parsed.year() >= 1000
}
