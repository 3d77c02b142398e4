use crate::consts::{ENGLISH_MONTH_NAMES, ENGLISH_SHORT_MONTH_NAMES, MONTHS_PER_YEAR};
use crate::types::Month;
use crate::{ConfigError, prelude::*};

/// Identifies one of the three month lists of a [`LocaleVocabulary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum VocabularyList {
    /// Full month names, read by `MMMM`
    #[display(fmt = "month names")]
    FullNames,
    /// Short labels shown by the calendar overlay
    #[display(fmt = "month labels")]
    ShortLabels,
    /// Abbreviated month names, read by `MMM`
    #[display(fmt = "short month names")]
    ShortNames,
}

/// Exactly twelve month strings, index 0 = January.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref)]
pub struct MonthNames(Vec<String>);

impl MonthNames {
    /// Validates that `names` holds one entry per month.
    ///
    /// # Errors
    /// Returns `ConfigError::VocabularyLength` if `names` does not have exactly 12 entries.
    pub fn new<S: Into<String>>(
        list: VocabularyList,
        names: impl IntoIterator<Item = S>,
    ) -> Result<Self, ConfigError> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() != MONTHS_PER_YEAR {
            log::warn!("rejected {list}: {} entries", names.len());
            return Err(ConfigError::VocabularyLength {
                list,
                len: names.len(),
            });
        }
        Ok(Self(names))
    }

    fn from_static(names: &[&str; MONTHS_PER_YEAR]) -> Self {
        Self(names.iter().map(|s| (*s).to_owned()).collect())
    }

    /// Entry for the given month
    pub fn get(&self, month: Month) -> &str {
        self.0.get(month.index()).map_or("", String::as_str)
    }

    /// Every entry that is a case-insensitive prefix of `input`, as
    /// `(month, bytes consumed)`, longest entry first.
    ///
    /// Empty entries never match.
    pub fn prefix_matches(&self, input: &str) -> Vec<(Month, usize)> {
        let mut found: Vec<(Month, usize)> = self
            .0
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.is_empty())
            .filter_map(|(index, name)| {
                let consumed = prefix_len_ignore_case(input, name)?;
                Some((Month::from_index(index)?, consumed))
            })
            .collect();
        // Stable sort keeps calendar order among equal lengths
        found.sort_by(|a, b| b.1.cmp(&a.1));
        found
    }
}

/// Byte length of the prefix of `input` equal to `prefix` ignoring case.
fn prefix_len_ignore_case(input: &str, prefix: &str) -> Option<usize> {
    let mut chars = input.char_indices();
    for expected in prefix.chars() {
        let (_, actual) = chars.next()?;
        if actual != expected && !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    Some(chars.next().map_or(input.len(), |(i, _)| i))
}

/// Month names and labels for one locale.
///
/// Each list is optional. An unset list makes the pattern tokens that read it
/// fail with [`ConfigError::MissingVocabulary`] at parse/format time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleVocabulary {
    full_names:   Option<MonthNames>,
    short_labels: Option<MonthNames>,
    short_names:  Option<MonthNames>,
}

impl Default for LocaleVocabulary {
    /// English names, abbreviations and labels
    fn default() -> Self {
        Self {
            full_names:   Some(MonthNames::from_static(&ENGLISH_MONTH_NAMES)),
            short_labels: Some(MonthNames::from_static(&ENGLISH_SHORT_MONTH_NAMES)),
            short_names:  Some(MonthNames::from_static(&ENGLISH_SHORT_MONTH_NAMES)),
        }
    }
}

impl LocaleVocabulary {
    /// A vocabulary with no list set
    pub const fn empty() -> Self {
        Self {
            full_names:   None,
            short_labels: None,
            short_names:  None,
        }
    }

    /// Replaces (or with `None`, unsets) one list.
    ///
    /// # Errors
    /// Returns `ConfigError::VocabularyLength` if the list does not have 12 entries;
    /// the vocabulary is left unchanged.
    pub fn set_list<S: Into<String>>(
        &mut self,
        list: VocabularyList,
        names: Option<impl IntoIterator<Item = S>>,
    ) -> Result<(), ConfigError> {
        let names = names.map(|n| MonthNames::new(list, n)).transpose()?;
        *self.slot(list) = names;
        Ok(())
    }

    /// Builder form of [`set_list`](Self::set_list)
    ///
    /// # Errors
    /// Returns `ConfigError::VocabularyLength` if the list does not have 12 entries.
    pub fn with_list<S: Into<String>>(
        mut self,
        list: VocabularyList,
        names: Option<impl IntoIterator<Item = S>>,
    ) -> Result<Self, ConfigError> {
        self.set_list(list, names)?;
        Ok(self)
    }

    fn slot(&mut self, list: VocabularyList) -> &mut Option<MonthNames> {
        match list {
            VocabularyList::FullNames => &mut self.full_names,
            VocabularyList::ShortLabels => &mut self.short_labels,
            VocabularyList::ShortNames => &mut self.short_names,
        }
    }

    /// The requested list, if set
    pub const fn list(&self, list: VocabularyList) -> Option<&MonthNames> {
        match list {
            VocabularyList::FullNames => self.full_names.as_ref(),
            VocabularyList::ShortLabels => self.short_labels.as_ref(),
            VocabularyList::ShortNames => self.short_names.as_ref(),
        }
    }

    pub const fn full_names(&self) -> Option<&MonthNames> {
        self.full_names.as_ref()
    }

    pub const fn short_labels(&self) -> Option<&MonthNames> {
        self.short_labels.as_ref()
    }

    pub const fn short_names(&self) -> Option<&MonthNames> {
        self.short_names.as_ref()
    }

    /// Label shown for `month` in the calendar overlay, falling back to the
    /// English abbreviation when no labels are set.
    pub fn label(&self, month: Month) -> &str {
        self.short_labels
            .as_ref()
            .map_or(ENGLISH_SHORT_MONTH_NAMES[month.index()], |labels| {
                labels.get(month)
            })
    }
}
