//! The public-facing year-month field.
//!
//! A [`ValueField`] owns its formats, vocabulary and bounds, stores the
//! current value with its validity, and notifies subscribers synchronously
//! whenever the visible value or validity changes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, EngineError, FieldConfig, FormatEngine, FormatSpec, LocaleVocabulary, Month,
    RangeBounds, RangeViolation, UNPARSEABLE, Validity, YearMonth, prelude::*,
};

/// Who triggered a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Origin {
    /// The surrounding application
    #[display(fmt = "programmatic")]
    Programmatic,
    /// The user typing or picking a month
    #[display(fmt = "user")]
    User,
}

/// What a [`ValueChangeEvent`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// The stored value changed (validity may have changed too)
    Value,
    /// Only validity or its reason changed; old and new value are equal
    Validity,
}

/// Why a field is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum InvalidReason {
    /// The last text entered matched no pattern
    #[display(fmt = "{}", UNPARSEABLE)]
    Unparseable,
    /// The value's year is outside the bounds
    #[display(fmt = "{_0}")]
    OutOfRange(RangeViolation),
}

/// Value, validity and error reason of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldState {
    pub value:        Option<YearMonth>,
    pub valid:        bool,
    pub error_reason: Option<InvalidReason>,
}

/// The field's state seen as a state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    Empty,
    Valid(YearMonth),
    /// Holds the retained value, which may be empty when unparseable text
    /// was entered into an empty field
    Invalid(Option<YearMonth>, InvalidReason),
}

/// Notification delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueChangeEvent {
    pub old_value: Option<YearMonth>,
    pub new_value: Option<YearMonth>,
    pub origin:    Origin,
    pub kind:      ChangeKind,
    /// Validity after the change
    pub valid:     bool,
}

/// Handle returned by [`ValueField::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Registration(u64);

/// Serializable view of a field for a host binding layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSnapshot {
    /// ISO 8601 `YYYY-MM`, or null when empty
    pub value:         Option<YearMonth>,
    /// The value formatted with the canonical pattern
    pub text:          String,
    pub invalid:       bool,
    pub error_message: Option<String>,
}

type Listener = Box<dyn FnMut(&ValueChangeEvent)>;

impl FieldState {
    const EMPTY: Self = Self {
        value:        None,
        valid:        true,
        error_reason: None,
    };

    fn validated(value: Option<YearMonth>, bounds: &RangeBounds) -> Self {
        match bounds.validate(value) {
            Validity::Valid => Self {
                value,
                valid: true,
                error_reason: None,
            },
            Validity::Invalid(violation) => Self {
                value,
                valid: false,
                error_reason: Some(InvalidReason::OutOfRange(violation)),
            },
        }
    }

    pub const fn status(&self) -> FieldStatus {
        match (self.value, self.error_reason) {
            (value, Some(reason)) => FieldStatus::Invalid(value, reason),
            (Some(value), None) => FieldStatus::Valid(value),
            (None, None) => FieldStatus::Empty,
        }
    }
}

/// A bounded, pattern-driven year-month input.
///
/// Typed text goes through [`parse_and_set`](Self::parse_and_set); values
/// picked in a calendar overlay go through [`set_value`](Self::set_value) with
/// [`Origin::User`]. Parse failures and out-of-range years never surface as
/// errors: they only mark the field invalid while keeping a value.
pub struct ValueField {
    state:         FieldState,
    spec:          FormatSpec,
    vocabulary:    LocaleVocabulary,
    bounds:        RangeBounds,
    engine:        FormatEngine,
    error_message: Option<String>,
    listeners:     Vec<(Registration, Listener)>,
    next_listener: u64,
}

impl Default for ValueField {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueField")
            .field("state", &self.state)
            .field("spec", &self.spec.sources())
            .field("bounds", &self.bounds)
            .field("error_message", &self.error_message)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl ValueField {
    /// An empty field with the default pattern, English vocabulary and no bounds
    pub fn new() -> Self {
        Self {
            state:         FieldState::EMPTY,
            spec:          FormatSpec::default(),
            vocabulary:    LocaleVocabulary::default(),
            bounds:        RangeBounds::unbounded(),
            engine:        FormatEngine::new(),
            error_message: None,
            listeners:     Vec::new(),
            next_listener: 0,
        }
    }

    /// A field holding `value` from the start, without notification
    pub fn with_value(value: Option<YearMonth>) -> Self {
        let mut field = Self::new();
        field.state = FieldState::validated(value, &field.bounds);
        field
    }

    /// A field configured from host settings
    ///
    /// # Errors
    /// Returns the `ConfigError` of the first invalid setting.
    pub fn from_config(config: &FieldConfig) -> Result<Self, ConfigError> {
        let mut field = Self::new();
        field.apply_config(config)?;
        Ok(field)
    }

    /// Replaces the engine, e.g. to pin the reference year for `YY`
    #[must_use]
    pub fn with_engine(mut self, engine: FormatEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Applies every setting, or none of them if any is invalid.
    ///
    /// New bounds revalidate the current value; formats and vocabulary do not.
    ///
    /// # Errors
    /// Returns the `ConfigError` of the first invalid setting.
    pub fn apply_config(&mut self, config: &FieldConfig) -> Result<(), ConfigError> {
        let (spec, vocabulary, bounds) = config.build()?;
        self.spec = spec;
        self.vocabulary = vocabulary;
        self.error_message.clone_from(&config.error_message);
        self.set_bounds(bounds);
        Ok(())
    }

    pub const fn state(&self) -> &FieldState {
        &self.state
    }

    pub const fn status(&self) -> FieldStatus {
        self.state.status()
    }

    pub const fn value(&self) -> Option<YearMonth> {
        self.state.value
    }

    pub const fn is_valid(&self) -> bool {
        self.state.valid
    }

    pub const fn error_reason(&self) -> Option<InvalidReason> {
        self.state.error_reason
    }

    pub const fn format_spec(&self) -> &FormatSpec {
        &self.spec
    }

    pub const fn vocabulary(&self) -> &LocaleVocabulary {
        &self.vocabulary
    }

    pub const fn bounds(&self) -> RangeBounds {
        self.bounds
    }

    /// Stores an already structured value and revalidates it.
    pub fn set_value(&mut self, value: Option<YearMonth>, origin: Origin) {
        let next = FieldState::validated(value, &self.bounds);
        self.transition(next, origin);
    }

    /// Parses `text` and stores the result.
    ///
    /// Text that matches no pattern keeps the current value and marks the
    /// field invalid as unparseable. Blank text empties the field.
    ///
    /// # Errors
    /// Returns a `ConfigError` if a pattern needs a month list that is not
    /// set; the field is left unchanged.
    pub fn parse_and_set(&mut self, text: &str, origin: Origin) -> Result<(), ConfigError> {
        match self.engine.parse(text, &self.spec, &self.vocabulary) {
            Ok(value) => {
                self.set_value(value, origin);
                Ok(())
            }
            Err(EngineError::Unparseable(failure)) => {
                log::debug!("{failure}");
                let next = FieldState {
                    value:        self.state.value,
                    valid:        false,
                    error_reason: Some(InvalidReason::Unparseable),
                };
                self.transition(next, origin);
                Ok(())
            }
            Err(EngineError::Config(err)) => Err(err),
        }
    }

    /// A month picked in the calendar overlay
    pub fn select(&mut self, value: YearMonth) {
        self.set_value(Some(value), Origin::User);
    }

    /// Empties the field, as the clear button does
    pub fn clear(&mut self) {
        self.set_value(None, Origin::User);
    }

    /// Replaces the bounds and revalidates the current value immediately.
    pub fn set_bounds(&mut self, bounds: RangeBounds) {
        self.bounds = bounds;
        let next = FieldState::validated(self.state.value, &self.bounds);
        self.transition(next, Origin::Programmatic);
    }

    /// Sets the minimum year, keeping the maximum
    ///
    /// # Errors
    /// Returns `ConfigError::InvertedBounds` if it would exceed the maximum year.
    pub fn set_min_year(&mut self, min_year: Option<i32>) -> Result<(), ConfigError> {
        let bounds = self.bounds.with_min_year(min_year)?;
        self.set_bounds(bounds);
        Ok(())
    }

    /// Sets the maximum year, keeping the minimum
    ///
    /// # Errors
    /// Returns `ConfigError::InvertedBounds` if it would be below the minimum year.
    pub fn set_max_year(&mut self, max_year: Option<i32>) -> Result<(), ConfigError> {
        let bounds = self.bounds.with_max_year(max_year)?;
        self.set_bounds(bounds);
        Ok(())
    }

    /// Affects later formatting and parsing only
    pub fn set_format_spec(&mut self, spec: FormatSpec) {
        self.spec = spec;
    }

    /// Affects later formatting and parsing only
    pub fn set_vocabulary(&mut self, vocabulary: LocaleVocabulary) {
        self.vocabulary = vocabulary;
    }

    pub fn set_error_message(&mut self, message: Option<String>) {
        self.error_message = message;
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// The message to show the user: the configured error message while
    /// invalid (or the reason, if none is configured), nothing while valid.
    pub fn displayed_error(&self) -> Option<String> {
        let reason = self.state.error_reason?;
        Some(
            self.error_message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| reason.to_string()),
        )
    }

    /// The current value formatted with the canonical pattern
    ///
    /// # Errors
    /// Returns a `ConfigError` if the canonical pattern needs a month list
    /// that is not set.
    pub fn text(&self) -> Result<String, ConfigError> {
        self.engine.format(self.state.value, &self.spec, &self.vocabulary)
    }

    /// Label shown for `month` in the calendar overlay
    pub fn month_label(&self, month: Month) -> &str {
        self.vocabulary.label(month)
    }

    /// Serializable view for a host binding layer
    ///
    /// # Errors
    /// Returns a `ConfigError` if the value cannot be formatted.
    pub fn snapshot(&self) -> Result<FieldSnapshot, ConfigError> {
        Ok(FieldSnapshot {
            value:         self.state.value,
            text:          self.text()?,
            invalid:       !self.state.valid,
            error_message: self.displayed_error(),
        })
    }

    /// Registers a listener called synchronously on every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&ValueChangeEvent) + 'static) -> Registration {
        let registration = Registration(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((registration, Box::new(listener)));
        registration
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, registration: Registration) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(r, _)| *r != registration);
        self.listeners.len() != before
    }

    fn transition(&mut self, next: FieldState, origin: Origin) {
        let previous = std::mem::replace(&mut self.state, next);

        let kind = if previous.value != next.value {
            ChangeKind::Value
        } else if previous.valid != next.valid || previous.error_reason != next.error_reason {
            ChangeKind::Validity
        } else {
            return;
        };
        log::debug!(
            "{origin} change: {:?} -> {:?}",
            previous.status(),
            next.status()
        );

        let event = ValueChangeEvent {
            old_value: previous.value,
            new_value: next.value,
            origin,
            kind,
            valid: next.valid,
        };
        for (registration, listener) in &mut self.listeners {
            log::trace!("notifying listener {}", registration.0);
            listener(&event);
        }
    }
}
