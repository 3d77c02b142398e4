use chrono::{Datelike, Local};

use crate::{ConfigError, FormatSpec, LocaleVocabulary, YearMonth};

/// Input text matched none of the configured patterns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{input:?} matches none of the {patterns} configured patterns")]
pub struct ParseFailure {
    pub input:    String,
    pub patterns: usize,
}

/// Error from [`FormatEngine::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The formats or vocabulary cannot be used.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The text is not a year-month under any pattern.
    #[error(transparent)]
    Unparseable(#[from] ParseFailure),
}

/// Formats and parses year-months with a [`FormatSpec`] and [`LocaleVocabulary`].
///
/// Holds no state besides an optional pinned reference year for two-digit
/// years; without one the current local year is read on every parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatEngine {
    reference_year: Option<i32>,
}

impl FormatEngine {
    /// Engine reading the system clock for `YY` resolution
    pub const fn new() -> Self {
        Self {
            reference_year: None,
        }
    }

    /// Engine resolving `YY` into the century of `year`
    pub const fn with_reference_year(year: i32) -> Self {
        Self {
            reference_year: Some(year),
        }
    }

    /// Year whose century two-digit years are placed in
    pub fn reference_year(&self) -> i32 {
        self.reference_year.unwrap_or_else(|| Local::now().year())
    }

    /// Formats `value` with the canonical pattern; an empty value is empty text.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingVocabulary` if the canonical pattern needs
    /// a month list that is not set.
    pub fn format(
        &self,
        value: Option<YearMonth>,
        spec: &FormatSpec,
        vocabulary: &LocaleVocabulary,
    ) -> Result<String, ConfigError> {
        value.map_or_else(
            || Ok(String::new()),
            |value| spec.canonical().render(value, vocabulary),
        )
    }

    /// Parses `text` with the canonical pattern, then each fallback in order.
    /// The first pattern that matches wins. Blank text is an empty value.
    ///
    /// # Errors
    /// Returns `EngineError::Unparseable` if no pattern matches, or
    /// `EngineError::Config` if a pattern that was tried needs a month list
    /// that is not set.
    pub fn parse(
        &self,
        text: &str,
        spec: &FormatSpec,
        vocabulary: &LocaleVocabulary,
    ) -> Result<Option<YearMonth>, EngineError> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let reference_year = self.reference_year();
        for (position, pattern) in spec.patterns().enumerate() {
            if let Some(value) = pattern.matches(text, vocabulary, reference_year)? {
                if position > 0 {
                    log::debug!("{text:?} matched fallback pattern {:?}", pattern.source());
                }
                return Ok(Some(value));
            }
        }

        log::debug!("{text:?} matched none of {:?}", spec.sources());
        Err(ParseFailure {
            input:    text.to_owned(),
            patterns: spec.len(),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Token, VocabularyList};

    fn ym(year: i32, month: u8) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn engine() -> FormatEngine {
        FormatEngine::with_reference_year(2025)
    }

    #[test]
    fn test_format_empty_is_empty_text() {
        let text = engine()
            .format(None, &FormatSpec::default(), &LocaleVocabulary::default())
            .unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_format_uses_canonical_only() {
        let spec = FormatSpec::new(["MM.YYYY", "MM/YYYY"]).unwrap();
        let text = engine()
            .format(Some(ym(2019, 6)), &spec, &LocaleVocabulary::default())
            .unwrap();
        assert_eq!(text, "06.2019");
    }

    #[test]
    fn test_parse_blank_is_empty_value() {
        let spec = FormatSpec::default();
        let vocab = LocaleVocabulary::default();
        assert_eq!(engine().parse("", &spec, &vocab), Ok(None));
        assert_eq!(engine().parse("   ", &spec, &vocab), Ok(None));
    }

    #[test]
    fn test_parse_falls_back_in_order() {
        let spec = FormatSpec::new(["MM.YYYY", "MM/YYYY"]).unwrap();
        let vocab = LocaleVocabulary::default();
        assert_eq!(engine().parse("06.2019", &spec, &vocab), Ok(Some(ym(2019, 6))));
        assert_eq!(engine().parse("06/2019", &spec, &vocab), Ok(Some(ym(2019, 6))));
    }

    #[test]
    fn test_earliest_pattern_wins_ambiguity() {
        let vocab = LocaleVocabulary::default();

        // "0102" is month 1 / year 02 under MMYY, and month 2 / year 01 under YYMM
        let spec = FormatSpec::new(["MMYY", "YYMM"]).unwrap();
        assert_eq!(engine().parse("0102", &spec, &vocab), Ok(Some(ym(2002, 1))));

        let spec = FormatSpec::new(["YYMM", "MMYY"]).unwrap();
        assert_eq!(engine().parse("0102", &spec, &vocab), Ok(Some(ym(2001, 2))));
    }

    #[test]
    fn test_parse_failure() {
        let spec = FormatSpec::new(["MM.YYYY", "MM/YYYY"]).unwrap();
        let result = engine().parse("June 2019", &spec, &LocaleVocabulary::default());
        assert_eq!(
            result,
            Err(EngineError::Unparseable(ParseFailure {
                input:    "June 2019".to_owned(),
                patterns: 2,
            }))
        );
    }

    #[test]
    fn test_two_digit_year_current_century() {
        let spec = FormatSpec::single("MM.YY").unwrap();
        let vocab = LocaleVocabulary::default();
        assert_eq!(engine().parse("06.19", &spec, &vocab), Ok(Some(ym(2019, 6))));
        assert_eq!(
            FormatEngine::with_reference_year(1999).parse("06.19", &spec, &vocab),
            Ok(Some(ym(1919, 6)))
        );
    }

    #[test]
    fn test_system_clock_reference_year() {
        let engine = FormatEngine::new();
        let year = engine.reference_year();
        assert_eq!(year, Local::now().year());

        let spec = FormatSpec::single("MM.YY").unwrap();
        let parsed = engine
            .parse("06.19", &spec, &LocaleVocabulary::default())
            .unwrap()
            .unwrap();
        assert_eq!(parsed.year(), year.div_euclid(100) * 100 + 19);
    }

    #[test]
    fn test_short_name_scenario() {
        let spec = FormatSpec::new(["MMM YYYY", "MM.YYYY"]).unwrap();
        let vocab = LocaleVocabulary::default();

        let value = engine().parse("Jan 2024", &spec, &vocab).unwrap();
        assert_eq!(value, Some(ym(2024, 1)));
        assert_eq!(engine().format(value, &spec, &vocab).unwrap(), "Jan 2024");

        assert_eq!(engine().parse("03.2024", &spec, &vocab), Ok(Some(ym(2024, 3))));
    }

    #[test]
    fn test_round_trip_through_canonical() {
        let vocab = LocaleVocabulary::default();
        for patterns in [
            vec!["MM.YYYY"],
            vec!["M/YYYY", "MM.YYYY"],
            vec!["MMM YYYY"],
            vec!["MMMM YYYY", "MMM YYYY"],
            vec!["YYYY-MM"],
            vec!["MM.YY"],
        ] {
            let spec = FormatSpec::new(&patterns).unwrap();
            for year in [2000, 2010, 2025, 2099] {
                for month in 1..=12 {
                    let value = Some(ym(year, month));
                    let text = engine().format(value, &spec, &vocab).unwrap();
                    assert_eq!(
                        engine().parse(&text, &spec, &vocab),
                        Ok(value),
                        "{patterns:?} via {text:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_missing_full_names_is_config_error() {
        let spec = FormatSpec::single("MMMM YYYY").unwrap();
        let vocab = LocaleVocabulary::empty();
        let expected = ConfigError::MissingVocabulary {
            token: Token::MonthName,
            list:  VocabularyList::FullNames,
        };

        assert_eq!(
            engine().parse("June 2019", &spec, &vocab),
            Err(EngineError::Config(expected.clone()))
        );
        assert_eq!(engine().parse("06.2019", &spec, &vocab), Err(EngineError::Config(expected.clone())));
        assert_eq!(engine().format(Some(ym(2019, 6)), &spec, &vocab), Err(expected));
    }
}
