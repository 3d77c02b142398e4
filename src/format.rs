use serde::{Deserialize, Serialize};

use crate::{ConfigError, pattern::CompiledPattern};

/// An ordered, non-empty list of patterns.
///
/// The first (canonical) pattern is used for display and as the first parse
/// attempt; the remaining fallback patterns are tried in order when parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FormatSpec {
    canonical: CompiledPattern,
    fallbacks: Vec<CompiledPattern>,
}

impl Default for FormatSpec {
    /// The single pattern `YYYY-MM`
    fn default() -> Self {
        Self {
            canonical: CompiledPattern::iso(),
            fallbacks: Vec::new(),
        }
    }
}

impl FormatSpec {
    /// Compiles every pattern, canonical first.
    ///
    /// An empty list yields the default spec.
    ///
    /// # Errors
    /// Returns the `ConfigError` of the first pattern that fails to compile.
    pub fn new<S: AsRef<str>>(patterns: impl IntoIterator<Item = S>) -> Result<Self, ConfigError> {
        let mut compiled = patterns
            .into_iter()
            .map(|p| CompiledPattern::compile(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter();

        Ok(compiled.next().map_or_else(Self::default, |canonical| Self {
            canonical,
            fallbacks: compiled.collect(),
        }))
    }

    /// A spec with one pattern used for both display and parsing
    ///
    /// # Errors
    /// Returns a `ConfigError` if `pattern` is malformed.
    pub fn single(pattern: &str) -> Result<Self, ConfigError> {
        Self::new([pattern])
    }

    /// Builds a spec from a primary pattern and additional parse-only patterns.
    ///
    /// A `None` primary resets to the default spec regardless of the others;
    /// `None` entries among the additional patterns are skipped.
    ///
    /// # Errors
    /// Returns the `ConfigError` of the first pattern that fails to compile.
    pub fn with_primary(primary: Option<&str>, additional: &[Option<&str>]) -> Result<Self, ConfigError> {
        match primary {
            None => Ok(Self::default()),
            Some(primary) => Self::new(std::iter::once(primary).chain(additional.iter().flatten().copied())),
        }
    }

    /// The pattern used for display and first parse attempt
    pub const fn canonical(&self) -> &CompiledPattern {
        &self.canonical
    }

    /// Parse-only patterns, in the order they are tried
    pub fn fallbacks(&self) -> &[CompiledPattern] {
        &self.fallbacks
    }

    /// Every pattern in parse order
    pub fn patterns(&self) -> impl Iterator<Item = &CompiledPattern> {
        std::iter::once(&self.canonical).chain(&self.fallbacks)
    }

    /// Number of patterns, always at least one
    pub fn len(&self) -> usize {
        1 + self.fallbacks.len()
    }

    /// Always false; present for API symmetry with `len`
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Pattern sources in parse order
    pub fn sources(&self) -> Vec<&str> {
        self.patterns().map(CompiledPattern::source).collect()
    }
}

impl TryFrom<Vec<String>> for FormatSpec {
    type Error = ConfigError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FormatSpec> for Vec<String> {
    fn from(spec: FormatSpec) -> Self {
        spec.patterns().map(|p| p.source().to_owned()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_and_fallbacks() {
        let spec = FormatSpec::new(["MM.YYYY", "MM/YYYY", "YYYY-MM"]).unwrap();
        assert_eq!(spec.canonical().source(), "MM.YYYY");
        assert_eq!(
            spec.fallbacks().iter().map(CompiledPattern::source).collect::<Vec<_>>(),
            vec!["MM/YYYY", "YYYY-MM"]
        );
        assert_eq!(spec.len(), 3);
        assert_eq!(spec.sources(), vec!["MM.YYYY", "MM/YYYY", "YYYY-MM"]);
    }

    #[test]
    fn test_default_spec() {
        let spec = FormatSpec::default();
        assert_eq!(spec.sources(), vec!["YYYY-MM"]);
        assert!(!spec.is_empty());

        let empty: [&str; 0] = [];
        assert_eq!(FormatSpec::new(empty).unwrap(), spec);
    }

    #[test]
    fn test_single() {
        let spec = FormatSpec::single("MMM YYYY").unwrap();
        assert_eq!(spec.sources(), vec!["MMM YYYY"]);
        assert!(spec.fallbacks().is_empty());
    }

    #[test]
    fn test_with_primary() {
        let spec = FormatSpec::with_primary(Some("MM.YYYY"), &[None, Some("MM/YYYY"), None]).unwrap();
        assert_eq!(spec.sources(), vec!["MM.YYYY", "MM/YYYY"]);

        // No primary clears the whole spec, even with additional patterns
        let spec = FormatSpec::with_primary(None, &[Some("MM/YYYY")]).unwrap();
        assert_eq!(spec, FormatSpec::default());
    }

    #[test]
    fn test_rejects_malformed_pattern() {
        let result = FormatSpec::new(["MM.YYYY", "MM"]);
        assert_eq!(result, Err(ConfigError::MissingYearToken("MM".to_owned())));

        let result = FormatSpec::with_primary(Some("YYYY"), &[]);
        assert_eq!(result, Err(ConfigError::MissingMonthToken("YYYY".to_owned())));
    }

    #[test]
    fn test_serde_as_pattern_list() {
        let spec = FormatSpec::new(["MMM YYYY", "MM.YYYY"]).unwrap();
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#"["MMM YYYY","MM.YYYY"]"#);

        let parsed: FormatSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, spec);

        let result: Result<FormatSpec, _> = serde_json::from_str(r#"["YYYY"]"#);
        assert!(result.is_err());
    }
}
