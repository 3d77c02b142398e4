use serde::{Deserialize, Serialize};

use crate::{ConfigError, FormatSpec, LocaleVocabulary, RangeBounds, VocabularyList};

/// Host-supplied configuration of a [`ValueField`](crate::ValueField).
///
/// Every key is optional. Unset month lists keep the English defaults, an
/// empty `formats` list selects the default `YYYY-MM` pattern.
///
/// ```json
/// {
///   "formats": ["MMM YYYY", "MM.YYYY"],
///   "shortMonthNames": ["Jan", "Feb", "Mar", "Apr", "May", "Jun",
///                       "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"],
///   "minYear": 2020,
///   "maxYear": 2026,
///   "errorMessage": "Pick a month between 2020 and 2026"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldConfig {
    /// Canonical pattern first, then parse-only fallbacks
    pub formats: Vec<String>,
    /// Full month names for `MMMM`
    pub month_names: Option<Vec<String>>,
    /// Labels shown in the calendar overlay
    pub month_labels: Option<Vec<String>>,
    /// Abbreviated month names for `MMM`
    pub short_month_names: Option<Vec<String>>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    /// Message shown to the user while the field is invalid
    pub error_message: Option<String>,
}

impl FieldConfig {
    /// Validates every key and builds the engine configuration.
    ///
    /// # Errors
    /// Returns the first `ConfigError` found: a malformed pattern, a month
    /// list without 12 entries, or a minimum year above the maximum year.
    pub fn build(&self) -> Result<(FormatSpec, LocaleVocabulary, RangeBounds), ConfigError> {
        let spec = FormatSpec::new(&self.formats)?;

        let mut vocabulary = LocaleVocabulary::default();
        for (list, names) in [
            (VocabularyList::FullNames, &self.month_names),
            (VocabularyList::ShortLabels, &self.month_labels),
            (VocabularyList::ShortNames, &self.short_month_names),
        ] {
            if let Some(names) = names {
                vocabulary.set_list(list, Some(names))?;
            }
        }

        let bounds = RangeBounds::new(self.min_year, self.max_year)?;

        Ok((spec, vocabulary, bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Month, YearMonth};

    #[test]
    fn test_empty_config_is_default() {
        let config: FieldConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, FieldConfig::default());

        let (spec, vocabulary, bounds) = config.build().unwrap();
        assert_eq!(spec, FormatSpec::default());
        assert_eq!(vocabulary, LocaleVocabulary::default());
        assert_eq!(bounds, RangeBounds::unbounded());
    }

    #[test]
    fn test_full_config_from_json() {
        let json = r#"{
            "formats": ["MMMM YYYY", "MM/YYYY"],
            "monthNames": ["Januar", "Februar", "März", "April", "Mai", "Juni",
                           "Juli", "August", "September", "Oktober", "November", "Dezember"],
            "monthLabels": ["Jan", "Feb", "Mär", "Apr", "Mai", "Jun",
                            "Jul", "Aug", "Sep", "Okt", "Nov", "Dez"],
            "minYear": 2020,
            "maxYear": 2026,
            "errorMessage": "Ungültiger Monat"
        }"#;
        let config: FieldConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.error_message.as_deref(), Some("Ungültiger Monat"));

        let (spec, vocabulary, bounds) = config.build().unwrap();
        assert_eq!(spec.sources(), vec!["MMMM YYYY", "MM/YYYY"]);
        assert_eq!(vocabulary.label(Month::new(3).unwrap()), "Mär");
        // Short names were not configured and stay English
        assert_eq!(vocabulary.short_names().unwrap().get(Month::new(10).unwrap()), "Oct");
        assert_eq!(bounds, RangeBounds::new(Some(2020), Some(2026)).unwrap());

        let value = YearMonth::new(2024, 3).unwrap();
        assert_eq!(spec.canonical().render(value, &vocabulary).unwrap(), "März 2024");
    }

    #[test]
    fn test_build_rejects_bad_month_list() {
        let config = FieldConfig {
            short_month_names: Some(vec!["Jan".to_owned(); 11]),
            ..FieldConfig::default()
        };
        assert_eq!(
            config.build(),
            Err(ConfigError::VocabularyLength {
                list: VocabularyList::ShortNames,
                len:  11,
            })
        );
    }

    #[test]
    fn test_build_rejects_inverted_bounds() {
        let config = FieldConfig {
            min_year: Some(2026),
            max_year: Some(2020),
            ..FieldConfig::default()
        };
        assert_eq!(
            config.build(),
            Err(ConfigError::InvertedBounds { min: 2026, max: 2020 })
        );
    }

    #[test]
    fn test_build_rejects_bad_pattern() {
        let config = FieldConfig {
            formats: vec!["MM.YYYY".to_owned(), "YYYY".to_owned()],
            ..FieldConfig::default()
        };
        assert_eq!(
            config.build(),
            Err(ConfigError::MissingMonthToken("YYYY".to_owned()))
        );
    }
}
