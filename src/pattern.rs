//! Compilation of format patterns such as `MM.YYYY` or `MMM YYYY`.
//!
//! A pattern is scanned left to right, taking the longest token at each
//! position (`MMMM` before `MMM` before `MM` before `M`, `YYYY` before `YY`).
//! Anything else is a literal that must appear verbatim in the input.

use crate::consts::{CENTURY, DATE_SEPARATOR, FULL_YEAR_DIGITS, MONTH_DIGITS, SHORT_YEAR_DIGITS};
use crate::types::Month;
use crate::vocabulary::{LocaleVocabulary, MonthNames, VocabularyList};
use crate::{ConfigError, YearMonth, prelude::*};

/// A year or month placeholder in a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Token {
    /// Year with at least four digits
    #[display(fmt = "YYYY")]
    FullYear,
    /// Last two digits of the year, resolved into the current century
    #[display(fmt = "YY")]
    ShortYear,
    /// Full month name
    #[display(fmt = "MMMM")]
    MonthName,
    /// Abbreviated month name
    #[display(fmt = "MMM")]
    ShortMonthName,
    /// Two-digit, zero-padded month number
    #[display(fmt = "MM")]
    PaddedMonth,
    /// Month number without padding
    #[display(fmt = "M")]
    Month,
}

impl Token {
    /// Pattern spellings, longest first within each family
    const SPELLINGS: [(&'static str, Self); 6] = [
        ("YYYY", Self::FullYear),
        ("YY", Self::ShortYear),
        ("MMMM", Self::MonthName),
        ("MMM", Self::ShortMonthName),
        ("MM", Self::PaddedMonth),
        ("M", Self::Month),
    ];

    const fn is_year(self) -> bool {
        matches!(self, Self::FullYear | Self::ShortYear)
    }

    /// The vocabulary list this token reads, for name tokens
    pub const fn vocabulary(self) -> Option<VocabularyList> {
        match self {
            Self::MonthName => Some(VocabularyList::FullNames),
            Self::ShortMonthName => Some(VocabularyList::ShortNames),
            Self::FullYear | Self::ShortYear | Self::PaddedMonth | Self::Month => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Token(Token),
    Literal(String),
}

/// A validated pattern with exactly one year token and one month token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    source:   String,
    segments: Vec<Segment>,
}

/// Partially matched value threaded through backtracking.
#[derive(Debug, Clone, Copy, Default)]
struct Captures {
    year:  Option<i32>,
    month: Option<Month>,
}

impl CompiledPattern {
    /// Tokenizes and validates `pattern`.
    ///
    /// Name tokens are not checked against a vocabulary here; that happens
    /// when the pattern is used.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingYearToken`, `ConfigError::MissingMonthToken`
    /// or `ConfigError::RepeatedToken` if the pattern does not have exactly one
    /// year and one month token.
    pub fn compile(pattern: &str) -> Result<Self, ConfigError> {
        let segments = tokenize(pattern);

        let mut year = None;
        let mut month = None;
        for token in segments.iter().filter_map(|s| match s {
            Segment::Token(t) => Some(*t),
            Segment::Literal(_) => None,
        }) {
            let slot = if token.is_year() { &mut year } else { &mut month };
            if slot.replace(token).is_some() {
                log::warn!("rejected pattern {pattern:?}: repeated {token}");
                return Err(ConfigError::RepeatedToken {
                    pattern: pattern.to_owned(),
                    token,
                });
            }
        }
        if year.is_none() {
            log::warn!("rejected pattern {pattern:?}: no year token");
            return Err(ConfigError::MissingYearToken(pattern.to_owned()));
        }
        if month.is_none() {
            log::warn!("rejected pattern {pattern:?}: no month token");
            return Err(ConfigError::MissingMonthToken(pattern.to_owned()));
        }

        Ok(Self {
            source: pattern.to_owned(),
            segments,
        })
    }

    /// The `YYYY-MM` pattern, built without going through validation
    pub(crate) fn iso() -> Self {
        Self {
            source:   format!("YYYY{DATE_SEPARATOR}MM"),
            segments: vec![
                Segment::Token(Token::FullYear),
                Segment::Literal(DATE_SEPARATOR.to_string()),
                Segment::Token(Token::PaddedMonth),
            ],
        }
    }

    /// The pattern text this was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Tokens in pattern order
    pub fn tokens(&self) -> impl Iterator<Item = Token> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Token(t) => Some(*t),
            Segment::Literal(_) => None,
        })
    }

    /// Fails if a name token needs a vocabulary list that is unset.
    fn check_vocabulary(&self, vocabulary: &LocaleVocabulary) -> Result<(), ConfigError> {
        self.tokens()
            .filter_map(|token| Some((token, token.vocabulary()?)))
            .try_for_each(|(token, list)| names(token, list, vocabulary).map(|_| ()))
    }

    /// Matches the whole of `text` against this pattern.
    ///
    /// `reference_year` supplies the century for `YY`. Returns `Ok(None)`
    /// when the text does not match.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingVocabulary` if the pattern uses a name
    /// token whose list is not set.
    pub fn matches(
        &self,
        text: &str,
        vocabulary: &LocaleVocabulary,
        reference_year: i32,
    ) -> Result<Option<YearMonth>, ConfigError> {
        self.check_vocabulary(vocabulary)?;
        let matcher = Matcher {
            segments: &self.segments,
            vocabulary,
            century: reference_year.div_euclid(CENTURY) * CENTURY,
        };
        Ok(matcher
            .match_from(0, text, Captures::default())
            .and_then(|c| Some(YearMonth::from_parts(c.year?, c.month?))))
    }

    /// Renders `value` with this pattern.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingVocabulary` if the pattern uses a name
    /// token whose list is not set.
    pub fn render(
        &self,
        value: YearMonth,
        vocabulary: &LocaleVocabulary,
    ) -> Result<String, ConfigError> {
        self.check_vocabulary(vocabulary)?;
        let mut out = String::with_capacity(self.source.len() + 4);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Token(Token::FullYear) => {
                    out.push_str(&format!("{:0width$}", value.year(), width = FULL_YEAR_DIGITS));
                }
                Segment::Token(Token::ShortYear) => {
                    out.push_str(&format!("{:02}", value.year().rem_euclid(CENTURY)));
                }
                Segment::Token(Token::PaddedMonth) => {
                    out.push_str(&format!("{:02}", value.month()));
                }
                Segment::Token(Token::Month) => out.push_str(&value.month().to_string()),
                Segment::Token(token @ (Token::MonthName | Token::ShortMonthName)) => {
                    if let Some(list) = token.vocabulary() {
                        out.push_str(names(*token, list, vocabulary)?.get(value.month_typed()));
                    }
                }
            }
        }
        Ok(out)
    }
}

fn names(
    token: Token,
    list: VocabularyList,
    vocabulary: &LocaleVocabulary,
) -> Result<&MonthNames, ConfigError> {
    vocabulary
        .list(list)
        .ok_or(ConfigError::MissingVocabulary { token, list })
}

fn tokenize(pattern: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = pattern;
    while let Some(first) = rest.chars().next() {
        if let Some((spelling, token)) = Token::SPELLINGS
            .iter()
            .find(|(spelling, _)| rest.starts_with(spelling))
        {
            segments.push(Segment::Token(*token));
            rest = &rest[spelling.len()..];
            continue;
        }
        match segments.last_mut() {
            Some(Segment::Literal(text)) => text.push(first),
            _ => segments.push(Segment::Literal(first.to_string())),
        }
        rest = &rest[first.len_utf8()..];
    }
    segments
}

fn leading_digits(input: &str) -> usize {
    input.bytes().take_while(u8::is_ascii_digit).count()
}

struct Matcher<'a> {
    segments:   &'a [Segment],
    vocabulary: &'a LocaleVocabulary,
    century:    i32,
}

impl Matcher<'_> {
    /// Depth-first match of `segments[index..]` against `input`, trying each
    /// token's candidates in order until the rest of the pattern fits.
    fn match_from(&self, index: usize, input: &str, captures: Captures) -> Option<Captures> {
        let Some(segment) = self.segments.get(index) else {
            return input.is_empty().then_some(captures);
        };

        match segment {
            Segment::Literal(text) => {
                let rest = input.strip_prefix(text.as_str())?;
                self.match_from(index + 1, rest, captures)
            }
            Segment::Token(token) => self
                .candidates(*token, input, captures)
                .into_iter()
                .find_map(|(consumed, next)| self.match_from(index + 1, &input[consumed..], next)),
        }
    }

    /// Possible `(bytes consumed, updated captures)` for `token` at the start of `input`.
    ///
    /// `YYYY` tries the fewest digits first so a following numeric token keeps
    /// its digits; month tokens try the most.
    fn candidates(&self, token: Token, input: &str, captures: Captures) -> Vec<(usize, Captures)> {
        let digits = leading_digits(input);
        let with_year = |year| Captures {
            year: Some(year),
            ..captures
        };
        let with_month = |month| Captures {
            month: Some(month),
            ..captures
        };

        match token {
            Token::FullYear => (FULL_YEAR_DIGITS..=digits)
                .filter_map(|len| Some((len, with_year(input[..len].parse::<i32>().ok()?))))
                .collect(),
            Token::ShortYear if digits >= SHORT_YEAR_DIGITS => input[..SHORT_YEAR_DIGITS]
                .parse::<i32>()
                .ok()
                .and_then(|two| self.century.checked_add(two))
                .map(|year| vec![(SHORT_YEAR_DIGITS, with_year(year))])
                .unwrap_or_default(),
            Token::ShortYear => Vec::new(),
            Token::PaddedMonth | Token::Month => (1..=digits.min(MONTH_DIGITS))
                .rev()
                .filter_map(|len| {
                    let month = Month::new(input[..len].parse::<u8>().ok()?).ok()?;
                    Some((len, with_month(month)))
                })
                .collect(),
            Token::MonthName | Token::ShortMonthName => token
                .vocabulary()
                .and_then(|list| self.vocabulary.list(list))
                .map(|names| {
                    names
                        .prefix_matches(input)
                        .into_iter()
                        .map(|(month, len)| (len, with_month(month)))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}
