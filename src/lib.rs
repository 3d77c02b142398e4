mod config;
mod consts;
mod engine;
mod field;
mod format;
mod pattern;
mod prelude;
mod range;
mod types;
mod vocabulary;

pub use config::FieldConfig;
pub use consts::*;
pub use engine::{EngineError, FormatEngine, ParseFailure};
pub use field::{
    ChangeKind, FieldSnapshot, FieldState, FieldStatus, InvalidReason, Origin, Registration,
    ValueChangeEvent, ValueField,
};
pub use format::FormatSpec;
pub use pattern::{CompiledPattern, Token};
pub use range::{BoundsParseError, RangeBounds, RangeViolation, Validity};
pub use types::Month;
pub use vocabulary::{LocaleVocabulary, MonthNames, VocabularyList};

use crate::prelude::*;
use std::str::FromStr;

/// A month within a year, with no day or time component.
///
/// Ordering is lexicographic by `(year, month)`. The textual form used by
/// `Display`, `FromStr` and serde is ISO 8601 `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}", "year", "month.get()")]
pub struct YearMonth {
    year: i32,
    month: Month,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid year-month format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid month: {} (must be {}-{})", "_0", MIN_MONTH, MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Empty year-month string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

/// Misconfiguration of a field, its formats, vocabulary or bounds.
///
/// These are programmer errors: the offending call is rejected and nothing
/// is changed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A month vocabulary list does not have exactly 12 entries.
    #[error("{list} must have exactly {} entries, got {len}", MONTHS_PER_YEAR)]
    VocabularyLength { list: VocabularyList, len: usize },

    /// Minimum year is greater than maximum year.
    #[error("Invalid year bounds: minimum ({min}) is greater than maximum ({max})")]
    InvertedBounds { min: i32, max: i32 },

    /// Pattern has no year token.
    #[error("Pattern {0:?} has no year token (YYYY or YY)")]
    MissingYearToken(String),

    /// Pattern has no month token.
    #[error("Pattern {0:?} has no month token (M, MM, MMM or MMMM)")]
    MissingMonthToken(String),

    /// Pattern has more than one year token or more than one month token.
    #[error("Pattern {pattern:?} repeats the {token} token")]
    RepeatedToken { pattern: String, token: Token },

    /// A name token is used while the vocabulary it reads from is unset.
    #[error("Pattern token {token} needs {list}, which is not set")]
    MissingVocabulary { token: Token, list: VocabularyList },
}

impl YearMonth {
    /// Creates a year-month, validating the month number
    ///
    /// # Errors
    /// Returns `ParseError::InvalidMonth` if `month` is not in 1..=12.
    pub fn new(year: i32, month: u8) -> Result<Self, ParseError> {
        Ok(Self {
            year,
            month: Month::new(month)?,
        })
    }

    /// Creates a year-month from an already validated month
    pub const fn from_parts(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// Returns the year component
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month component (1..=12)
    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    /// Returns the Month type
    pub const fn month_typed(&self) -> Month {
        self.month
    }

    /// The following month, rolling into January of the next year.
    /// Returns `None` past the last representable year.
    pub fn next(self) -> Option<Self> {
        if self.month.get() == DECEMBER {
            let year = self.year.checked_add(1)?;
            Some(Self::from_parts(year, Month::new(JANUARY).ok()?))
        } else {
            Some(Self::from_parts(self.year, Month::new(self.month.get() + 1).ok()?))
        }
    }

    /// The preceding month, rolling into December of the previous year.
    /// Returns `None` before the first representable year.
    pub fn prev(self) -> Option<Self> {
        if self.month.get() == JANUARY {
            let year = self.year.checked_sub(1)?;
            Some(Self::from_parts(year, Month::new(DECEMBER).ok()?))
        } else {
            Some(Self::from_parts(self.year, Month::new(self.month.get() - 1).ok()?))
        }
    }

    /// Converts to database columns: (`year`, `month`)
    pub const fn to_columns(&self) -> (i32, u8) {
        (self.year, self.month.get())
    }
}

impl FromStr for YearMonth {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        // The year may carry a sign, so split on the last separator
        let (year, month) = trimmed
            .rsplit_once(DATE_SEPARATOR)
            .ok_or_else(|| ParseError::InvalidFormat(trimmed.to_owned()))?;

        if year.is_empty() || month.len() != 2 {
            return Err(ParseError::InvalidFormat(trimmed.to_owned()));
        }

        let year = year
            .parse::<i32>()
            .map_err(|_| ParseError::InvalidFormat(trimmed.to_owned()))?;
        let month = month
            .parse::<u8>()
            .map_err(|_| ParseError::InvalidFormat(trimmed.to_owned()))?;

        Self::new(year, month)
    }
}

impl TryFrom<(i32, u8)> for YearMonth {
    type Error = ParseError;

    fn try_from(value: (i32, u8)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1)
    }
}

impl serde::Serialize for YearMonth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for YearMonth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
