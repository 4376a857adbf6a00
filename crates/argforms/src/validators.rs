//! Field validators.
//!
//! A [`Validator`] inspects a bound field (its raw command-line input and
//! its coerced value) and either lets validation continue, stops the chain,
//! or reports a [`ValidationError`]. Validators are attached to
//! [`FieldDef`](crate::fields::FieldDef)s and run in declaration order by
//! [`validate_field`](crate::validation::validate_field).
//!
//! Two validators have a special [`ValidatorRole`]: [`InputRequired`] stops
//! the chain when it fails, and [`Optional`] stops the chain (discarding
//! earlier errors) when no input was given.

use std::fmt;

use argforms_core::{ValidationError, Value};

use crate::helpers::stringify;

/// What the validator chain should do after a validator passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Run the next validator.
    Continue,
    /// Skip the remaining validators.
    Stop,
}

/// How the validation pipeline treats a validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorRole {
    /// An ordinary check on the coerced value. Skipped when coercion failed.
    Check,
    /// Requires input; a failure stops the chain.
    Required,
    /// Makes the field optional; stopping clears earlier errors.
    Optional,
}

/// The state of a bound field as seen by validators.
#[derive(Debug, Clone, Copy)]
pub struct FieldInput<'a> {
    /// Raw values from the command line, `None` if the argument was absent.
    pub raw: Option<&'a [String]>,
    /// The coerced value (or the default when the argument was absent).
    pub value: &'a Value,
}

impl FieldInput<'_> {
    /// Returns `true` if at least one non-blank raw value was supplied.
    pub fn has_input(&self) -> bool {
        self.raw
            .is_some_and(|raw| raw.iter().any(|s| !s.trim().is_empty()))
    }
}

/// A trait for validating bound fields.
///
/// # Examples
///
/// ```
/// use argforms::validators::{FieldInput, Flow, NumberRange, Validator};
/// use argforms_core::Value;
///
/// let v = NumberRange::new(Some(1.0), Some(5.0));
/// let raw = vec!["3".to_string()];
/// let input = FieldInput { raw: Some(&raw), value: &Value::Int(3) };
/// assert_eq!(v.validate(&input), Ok(Flow::Continue));
/// ```
pub trait Validator: Send + Sync + fmt::Debug {
    /// Validates the bound field.
    fn validate(&self, input: &FieldInput<'_>) -> Result<Flow, ValidationError>;

    /// Returns a human-readable name for this validator.
    fn name(&self) -> &str;

    /// Returns how the pipeline treats this validator.
    fn role(&self) -> ValidatorRole {
        ValidatorRole::Check
    }
}

/// Fails when no input was supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct InputRequired {
    /// Overrides the default message.
    pub message: Option<String>,
}

impl InputRequired {
    /// Creates an `InputRequired` validator with the default message.
    pub const fn new() -> Self {
        Self { message: None }
    }

    /// Creates an `InputRequired` validator with a custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

impl Validator for InputRequired {
    fn validate(&self, input: &FieldInput<'_>) -> Result<Flow, ValidationError> {
        if input.has_input() {
            return Ok(Flow::Continue);
        }
        let message = self
            .message
            .clone()
            .unwrap_or_else(|| "this field is required".to_string());
        Err(ValidationError::new(message, "required"))
    }

    fn name(&self) -> &str {
        "InputRequired"
    }

    fn role(&self) -> ValidatorRole {
        ValidatorRole::Required
    }
}

/// Stops validation when no input was supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct Optional;

impl Validator for Optional {
    fn validate(&self, input: &FieldInput<'_>) -> Result<Flow, ValidationError> {
        if input.has_input() {
            Ok(Flow::Continue)
        } else {
            Ok(Flow::Stop)
        }
    }

    fn name(&self) -> &str {
        "Optional"
    }

    fn role(&self) -> ValidatorRole {
        ValidatorRole::Optional
    }
}

/// Checks that numeric values fall within an inclusive range.
///
/// List values are checked item by item. A missing value fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberRange {
    /// The minimum allowed value.
    pub min: Option<f64>,
    /// The maximum allowed value.
    pub max: Option<f64>,
}

impl NumberRange {
    /// Creates a new `NumberRange`.
    pub const fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    fn message(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("number must be between {min} and {max}"),
            (Some(min), None) => format!("number must be at least {min}"),
            (None, Some(max)) => format!("number must be at most {max}"),
            (None, None) => "not a number".to_string(),
        }
    }

    fn check(&self, value: &Value) -> bool {
        let number = match value {
            Value::Int(i) => *i as f64,
            Value::Float(f) => *f,
            Value::Decimal(d) => match rust_decimal::prelude::ToPrimitive::to_f64(d) {
                Some(f) => f,
                None => return false,
            },
            Value::List(items) => return items.iter().all(|item| self.check(item)),
            _ => return false,
        };
        self.min.map_or(true, |min| number >= min) && self.max.map_or(true, |max| number <= max)
    }
}

impl Validator for NumberRange {
    fn validate(&self, input: &FieldInput<'_>) -> Result<Flow, ValidationError> {
        if self.check(input.value) {
            return Ok(Flow::Continue);
        }
        let mut err = ValidationError::new(self.message(), "number_range");
        if let Some(min) = self.min {
            err = err.with_param("min", min.to_string());
        }
        if let Some(max) = self.max {
            err = err.with_param("max", max.to_string());
        }
        Err(err)
    }

    fn name(&self) -> &str {
        "NumberRange"
    }
}

/// Checks the length (in characters) of a string value.
///
/// A missing value counts as the empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Length {
    /// Minimum number of characters.
    pub min: Option<usize>,
    /// Maximum number of characters.
    pub max: Option<usize>,
}

impl Length {
    /// Creates a new `Length`.
    pub const fn new(min: Option<usize>, max: Option<usize>) -> Self {
        Self { min, max }
    }
}

impl Validator for Length {
    fn validate(&self, input: &FieldInput<'_>) -> Result<Flow, ValidationError> {
        let len = match input.value {
            Value::Null => 0,
            Value::String(s) => s.chars().count(),
            other => stringify(other).chars().count(),
        };
        let too_short = self.min.is_some_and(|min| len < min);
        let too_long = self.max.is_some_and(|max| len > max);
        if !too_short && !too_long {
            return Ok(Flow::Continue);
        }
        let message = match (self.min, self.max) {
            (Some(min), Some(max)) => {
                format!("field must be between {min} and {max} characters long")
            }
            (Some(min), None) => format!("field must be at least {min} characters long"),
            (None, Some(max)) => format!("field cannot be longer than {max} characters"),
            (None, None) => unreachable!("a length with no bounds always passes"),
        };
        Err(ValidationError::new(message, "length").with_param("length", len.to_string()))
    }

    fn name(&self) -> &str {
        "Length"
    }
}

/// Checks that the value is one of a fixed set.
#[derive(Debug, Clone, PartialEq)]
pub struct AnyOf {
    /// The accepted values.
    pub values: Vec<Value>,
}

impl AnyOf {
    /// Creates a new `AnyOf` from anything convertible into values.
    pub fn new<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for AnyOf {
    fn validate(&self, input: &FieldInput<'_>) -> Result<Flow, ValidationError> {
        if self.values.contains(input.value) {
            return Ok(Flow::Continue);
        }
        let accepted = self
            .values
            .iter()
            .map(stringify)
            .collect::<Vec<_>>()
            .join(", ");
        Err(ValidationError::new(
            format!("invalid value, must be one of: {accepted}"),
            "any_of",
        ))
    }

    fn name(&self) -> &str {
        "AnyOf"
    }
}

/// Checks the rendered value against a regular expression.
#[derive(Debug, Clone)]
pub struct Regexp {
    /// The pattern the value must match.
    pub regex: regex::Regex,
    /// Overrides the default message.
    pub message: Option<String>,
}

impl Regexp {
    /// Compiles `pattern` into a new `Regexp` validator.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: regex::Regex::new(pattern)?,
            message: None,
        })
    }

    /// Sets a custom failure message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Validator for Regexp {
    fn validate(&self, input: &FieldInput<'_>) -> Result<Flow, ValidationError> {
        if self.regex.is_match(&stringify(input.value)) {
            return Ok(Flow::Continue);
        }
        let message = self
            .message
            .clone()
            .unwrap_or_else(|| "invalid input".to_string());
        Err(ValidationError::new(message, "regexp").with_param("pattern", self.regex.as_str()))
    }

    fn name(&self) -> &str {
        "Regexp"
    }
}
