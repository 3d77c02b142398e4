use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, RANGE_SEPARATOR, YearMonth, prelude::*};

/// Optional inclusive year bounds.
/// When both are set the minimum must be less than or equal to the maximum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBounds", into = "RawBounds")]
pub struct RangeBounds {
    min_year: Option<i32>,
    max_year: Option<i32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBounds {
    #[serde(default)]
    min_year: Option<i32>,
    #[serde(default)]
    max_year: Option<i32>,
}

/// Why a value falls outside its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum RangeViolation {
    /// Year is before the minimum year.
    #[display(fmt = "below minimum")]
    BelowMinimum { year: i32, min: i32 },

    /// Year is after the maximum year.
    #[display(fmt = "above maximum")]
    AboveMaximum { year: i32, max: i32 },
}

/// Outcome of checking a value against [`RangeBounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Validity {
    Valid,
    Invalid(RangeViolation),
}

impl Validity {
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl RangeBounds {
    /// Creates bounds with validation.
    ///
    /// # Errors
    /// Returns `ConfigError::InvertedBounds` if both are set and min > max.
    pub fn new(min_year: Option<i32>, max_year: Option<i32>) -> Result<Self, ConfigError> {
        if let (Some(min), Some(max)) = (min_year, max_year) {
            if min > max {
                log::warn!("rejected year bounds {min}/{max}");
                return Err(ConfigError::InvertedBounds { min, max });
            }
        }
        Ok(Self { min_year, max_year })
    }

    /// Bounds that accept every year
    pub const fn unbounded() -> Self {
        Self {
            min_year: None,
            max_year: None,
        }
    }

    pub const fn min_year(&self) -> Option<i32> {
        self.min_year
    }

    pub const fn max_year(&self) -> Option<i32> {
        self.max_year
    }

    /// Replaces the minimum year, keeping the maximum
    ///
    /// # Errors
    /// Returns `ConfigError::InvertedBounds` if the result would have min > max.
    pub fn with_min_year(self, min_year: Option<i32>) -> Result<Self, ConfigError> {
        Self::new(min_year, self.max_year)
    }

    /// Replaces the maximum year, keeping the minimum
    ///
    /// # Errors
    /// Returns `ConfigError::InvertedBounds` if the result would have min > max.
    pub fn with_max_year(self, max_year: Option<i32>) -> Result<Self, ConfigError> {
        Self::new(self.min_year, max_year)
    }

    /// Checks if `year` lies within the bounds; an unset bound is open
    pub fn contains(&self, year: i32) -> bool {
        self.min_year.is_none_or(|min| min <= year) && self.max_year.is_none_or(|max| year <= max)
    }

    /// Validates a value against the bounds.
    /// An empty value is always valid and only the year is compared.
    pub fn validate(&self, value: Option<YearMonth>) -> Validity {
        let Some(value) = value else {
            return Validity::Valid;
        };
        let year = value.year();
        match (self.min_year, self.max_year) {
            (Some(min), _) if year < min => Validity::Invalid(RangeViolation::BelowMinimum { year, min }),
            (_, Some(max)) if year > max => Validity::Invalid(RangeViolation::AboveMaximum { year, max }),
            _ => Validity::Valid,
        }
    }
}

impl fmt::Display for RangeBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(min) = self.min_year {
            write!(f, "{min}")?;
        }
        write!(f, "{RANGE_SEPARATOR}")?;
        if let Some(max) = self.max_year {
            write!(f, "{max}")?;
        }
        Ok(())
    }
}

/// Error parsing textual bounds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoundsParseError {
    /// Invalid bounds format.
    #[error("Invalid year bounds format: {0}")]
    InvalidFormat(String),

    /// Bounds parsed but are inverted.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl FromStr for RangeBounds {
    type Err = BoundsParseError;

    /// Parses `min/max`, where either side may be empty for an open bound.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        let separator_count = trimmed.matches(RANGE_SEPARATOR).count();
        if separator_count != 1 {
            return Err(BoundsParseError::InvalidFormat(format!(
                "expected exactly one '{RANGE_SEPARATOR}', found {separator_count}: {s}"
            )));
        }

        let (min, max) = trimmed
            .split_once(RANGE_SEPARATOR)
            .ok_or_else(|| BoundsParseError::InvalidFormat(s.to_owned()))?;

        let parse_side = |side: &str| -> Result<Option<i32>, BoundsParseError> {
            let side = side.trim();
            if side.is_empty() {
                return Ok(None);
            }
            side.parse::<i32>()
                .map(Some)
                .map_err(|_| BoundsParseError::InvalidFormat(s.to_owned()))
        };

        Ok(Self::new(parse_side(min)?, parse_side(max)?)?)
    }
}

impl TryFrom<RawBounds> for RangeBounds {
    type Error = ConfigError;

    fn try_from(raw: RawBounds) -> Result<Self, Self::Error> {
        Self::new(raw.min_year, raw.max_year)
    }
}

impl From<RangeBounds> for RawBounds {
    fn from(bounds: RangeBounds) -> Self {
        Self {
            min_year: bounds.min_year,
            max_year: bounds.max_year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u8) -> Option<YearMonth> {
        Some(YearMonth::new(year, month).unwrap())
    }

    #[test]
    fn test_new_valid_bounds() {
        assert!(RangeBounds::new(Some(2020), Some(2026)).is_ok());
        assert!(RangeBounds::new(Some(2020), Some(2020)).is_ok());
        assert!(RangeBounds::new(None, Some(2026)).is_ok());
        assert!(RangeBounds::new(Some(2020), None).is_ok());
        assert_eq!(RangeBounds::new(None, None).unwrap(), RangeBounds::unbounded());
    }

    #[test]
    fn test_new_inverted_bounds() {
        let result = RangeBounds::new(Some(2026), Some(2020));
        assert_eq!(result, Err(ConfigError::InvertedBounds { min: 2026, max: 2020 }));
    }

    #[test]
    fn test_with_min_and_max() {
        let bounds = RangeBounds::unbounded().with_min_year(Some(2020)).unwrap();
        let bounds = bounds.with_max_year(Some(2026)).unwrap();
        assert_eq!(bounds.min_year(), Some(2020));
        assert_eq!(bounds.max_year(), Some(2026));

        assert!(bounds.with_min_year(Some(2027)).is_err());
        assert!(bounds.with_max_year(Some(2019)).is_err());
    }

    #[test]
    fn test_validate_empty_always_valid() {
        let bounds = RangeBounds::new(Some(2020), Some(2026)).unwrap();
        assert_eq!(bounds.validate(None), Validity::Valid);
    }

    #[test]
    fn test_validate_below_and_above() {
        let bounds = RangeBounds::new(Some(2020), Some(2026)).unwrap();

        assert_eq!(
            bounds.validate(ym(2019, 6)),
            Validity::Invalid(RangeViolation::BelowMinimum { year: 2019, min: 2020 })
        );
        assert_eq!(
            bounds.validate(ym(2027, 1)),
            Validity::Invalid(RangeViolation::AboveMaximum { year: 2027, max: 2026 })
        );
        assert_eq!(bounds.validate(ym(2020, 1)), Validity::Valid);
        assert_eq!(bounds.validate(ym(2026, 12)), Validity::Valid);
    }

    #[test]
    fn test_validate_matches_contains() {
        let cases = [
            RangeBounds::unbounded(),
            RangeBounds::new(Some(2000), None).unwrap(),
            RangeBounds::new(None, Some(2000)).unwrap(),
            RangeBounds::new(Some(1999), Some(2001)).unwrap(),
            RangeBounds::new(Some(2000), Some(2000)).unwrap(),
        ];
        for bounds in cases {
            for year in [i32::MIN, 1998, 1999, 2000, 2001, 2002, i32::MAX] {
                for month in [1, 12] {
                    assert_eq!(
                        bounds.validate(ym(year, month)).is_valid(),
                        bounds.contains(year),
                        "{bounds} with {year}-{month}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_violation_display() {
        assert_eq!(
            RangeViolation::BelowMinimum { year: 2019, min: 2020 }.to_string(),
            "below minimum"
        );
        assert_eq!(
            RangeViolation::AboveMaximum { year: 2027, max: 2026 }.to_string(),
            "above maximum"
        );
    }

    #[test]
    fn test_display_and_parse() {
        let bounds = RangeBounds::new(Some(2020), Some(2026)).unwrap();
        assert_eq!(bounds.to_string(), "2020/2026");
        assert_eq!("2020/2026".parse::<RangeBounds>().unwrap(), bounds);

        let open_max = RangeBounds::new(Some(2020), None).unwrap();
        assert_eq!(open_max.to_string(), "2020/");
        assert_eq!(" 2020 / ".parse::<RangeBounds>().unwrap(), open_max);

        let open_min = RangeBounds::new(None, Some(2026)).unwrap();
        assert_eq!(open_min.to_string(), "/2026");
        assert_eq!("/2026".parse::<RangeBounds>().unwrap(), open_min);

        assert_eq!("/".parse::<RangeBounds>().unwrap(), RangeBounds::unbounded());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "2020".parse::<RangeBounds>(),
            Err(BoundsParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            "2020/2021/2022".parse::<RangeBounds>(),
            Err(BoundsParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            "20x0/2026".parse::<RangeBounds>(),
            Err(BoundsParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            "2026/2020".parse::<RangeBounds>(),
            Err(BoundsParseError::Config(ConfigError::InvertedBounds { .. }))
        ));
    }

    #[test]
    fn test_serde() {
        let bounds = RangeBounds::new(Some(2020), None).unwrap();
        let json = serde_json::to_string(&bounds).unwrap();
        assert_eq!(json, r#"{"minYear":2020,"maxYear":null}"#);

        let parsed: RangeBounds = serde_json::from_str(r#"{"maxYear":2026}"#).unwrap();
        assert_eq!(parsed, RangeBounds::new(None, Some(2026)).unwrap());

        let result: Result<RangeBounds, _> = serde_json::from_str(r#"{"minYear":2026,"maxYear":2020}"#);
        assert!(result.is_err());
    }
}
