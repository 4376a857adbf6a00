//! Field definitions and string ⇄ value coercion.
//!
//! Each [`FieldDef`] describes a single form field: its name, its
//! [`FieldType`], an optional default, help metadata, and validators. The
//! [`FieldType`] enum carries the type-specific parameters and performs the
//! conversion between command-line strings and typed [`Value`]s in both
//! directions ([`FieldType::coerce`] and [`FieldType::stringify`]).
//!
//! The [`FieldKind`] category slices ([`DATETIME_TYPES`], [`MULTIPLE_TYPES`],
//! [`PRIMITIVE_TYPES`], [`SELECT_TYPES`], [`SIMPLE_TYPES`]) decide how a
//! field is registered and bound.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use argforms_core::Value;

use crate::helpers::{
    self, format_date, format_datetime, DefaultValue, DEFAULT_DATETIME_FORMAT,
    DEFAULT_DATE_FORMAT,
};
use crate::validators::{InputRequired, Optional, Validator, ValidatorRole};

/// The kind of a field, without its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A flag.
    Boolean,
    /// A date.
    Date,
    /// A date and time.
    DateTime,
    /// An exact decimal number.
    Decimal,
    /// A floating-point number.
    Float,
    /// An integer.
    Integer,
    /// Free text.
    String,
    /// One value out of a fixed set.
    Select,
    /// Any number of values out of a fixed set.
    SelectMultiple,
    /// A repeated field of a simple type.
    List,
    /// A nested form.
    Form,
}

impl FieldKind {
    /// Returns `true` if `self` is one of `kinds`.
    pub fn is_in(self, kinds: &[Self]) -> bool {
        kinds.contains(&self)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Boolean => "Boolean",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
            Self::Decimal => "Decimal",
            Self::Float => "Float",
            Self::Integer => "Integer",
            Self::String => "String",
            Self::Select => "Select",
            Self::SelectMultiple => "SelectMultiple",
            Self::List => "List",
            Self::Form => "Form",
        };
        f.write_str(name)
    }
}

/// Kinds parsed with a strftime format.
pub const DATETIME_TYPES: &[FieldKind] = &[FieldKind::Date, FieldKind::DateTime];

/// Kinds that accept the argument multiple times.
pub const MULTIPLE_TYPES: &[FieldKind] = &[FieldKind::List, FieldKind::SelectMultiple];

/// Kinds converted with a plain parse.
pub const PRIMITIVE_TYPES: &[FieldKind] = &[
    FieldKind::Decimal,
    FieldKind::Float,
    FieldKind::Integer,
    FieldKind::String,
];

/// Kinds restricted to a fixed set of choices.
pub const SELECT_TYPES: &[FieldKind] = &[FieldKind::Select, FieldKind::SelectMultiple];

/// Kinds allowed inside a [`FieldType::List`].
pub const SIMPLE_TYPES: &[FieldKind] = &[
    FieldKind::Date,
    FieldKind::DateTime,
    FieldKind::Decimal,
    FieldKind::Float,
    FieldKind::Integer,
    FieldKind::String,
];

/// How raw strings are converted before being compared with select choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Coerce {
    /// Keep the raw string.
    #[default]
    String,
    /// Parse as `i64`.
    Integer,
    /// Parse as `f64`.
    Float,
    /// Parse as a decimal.
    Decimal,
}

impl Coerce {
    /// Picks the coercion matching the type of the first choice.
    pub fn infer(choices: &[Choice]) -> Self {
        match choices.first().map(|choice| &choice.value) {
            Some(Value::Int(_)) => Self::Integer,
            Some(Value::Float(_)) => Self::Float,
            Some(Value::Decimal(_)) => Self::Decimal,
            _ => Self::String,
        }
    }

    /// Converts `raw`, returning `None` if it does not parse.
    pub fn apply(self, raw: &str) -> Option<Value> {
        match self {
            Self::String => Some(Value::String(raw.to_string())),
            Self::Integer => raw.trim().parse().ok().map(Value::Int),
            Self::Float => raw.trim().parse().ok().map(Value::Float),
            Self::Decimal => rust_decimal::Decimal::from_str(raw.trim())
                .ok()
                .map(Value::Decimal),
        }
    }
}

/// One entry of a select field.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    /// The value produced when this choice is selected.
    pub value: Value,
    /// Display label.
    pub label: String,
}

impl Choice {
    /// Creates a choice whose label is the rendered value.
    pub fn new(value: impl Into<Value>) -> Self {
        let value = value.into();
        let label = helpers::stringify(&value);
        Self { value, label }
    }

    /// Creates a choice with an explicit label.
    pub fn labeled(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// The type of a form field, including type-specific parameters.
#[derive(Debug, Clone)]
pub enum FieldType {
    /// A flag. Presence on the command line flips the default.
    Boolean,
    /// A date parsed with a strftime format.
    Date {
        /// strftime format used for parsing and display.
        format: String,
    },
    /// A date and time parsed with a strftime format.
    DateTime {
        /// strftime format used for parsing and display.
        format: String,
    },
    /// An exact decimal number.
    Decimal,
    /// A floating-point number.
    Float,
    /// A 64-bit integer.
    Integer,
    /// Free text.
    String,
    /// A single choice.
    Select {
        /// The available choices.
        choices: Vec<Choice>,
        /// Conversion applied before the membership check.
        coerce: Coerce,
    },
    /// Multiple choices; the argument may repeat.
    SelectMultiple {
        /// The available choices.
        choices: Vec<Choice>,
        /// Conversion applied before the membership check.
        coerce: Coerce,
    },
    /// A repeated field of a simple type.
    List(Box<FieldType>),
    /// A nested form. Its arguments are prefixed with the field name.
    Form(Vec<FieldDef>),
}

impl FieldType {
    /// A date field using [`DEFAULT_DATE_FORMAT`].
    pub fn date() -> Self {
        Self::date_with_format(DEFAULT_DATE_FORMAT)
    }

    /// A date field with a custom strftime format.
    pub fn date_with_format(format: impl Into<String>) -> Self {
        Self::Date {
            format: format.into(),
        }
    }

    /// A date-time field using [`DEFAULT_DATETIME_FORMAT`].
    pub fn datetime() -> Self {
        Self::datetime_with_format(DEFAULT_DATETIME_FORMAT)
    }

    /// A date-time field with a custom strftime format.
    pub fn datetime_with_format(format: impl Into<String>) -> Self {
        Self::DateTime {
            format: format.into(),
        }
    }

    /// A select field whose labels are the values themselves.
    ///
    /// The coercion is inferred from the type of the first value.
    ///
    /// ```
    /// use argforms::fields::{Coerce, FieldType};
    ///
    /// let field = FieldType::select([1, 2, 3]);
    /// assert!(matches!(field, FieldType::Select { coerce: Coerce::Integer, .. }));
    /// ```
    pub fn select<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let choices: Vec<Choice> = values.into_iter().map(Choice::new).collect();
        let coerce = Coerce::infer(&choices);
        Self::Select { choices, coerce }
    }

    /// A select field with `(value, label)` pairs.
    pub fn select_labeled<I, V, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<Value>,
        L: Into<String>,
    {
        let choices: Vec<Choice> = pairs
            .into_iter()
            .map(|(value, label)| Choice::labeled(value, label))
            .collect();
        let coerce = Coerce::infer(&choices);
        Self::Select { choices, coerce }
    }

    /// A multiple-select field whose labels are the values themselves.
    pub fn select_multiple<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let choices: Vec<Choice> = values.into_iter().map(Choice::new).collect();
        let coerce = Coerce::infer(&choices);
        Self::SelectMultiple { choices, coerce }
    }

    /// A repeated field of `inner`.
    pub fn list(inner: Self) -> Self {
        Self::List(Box::new(inner))
    }

    /// A nested form made of `fields`.
    pub fn form(fields: impl IntoIterator<Item = FieldDef>) -> Self {
        Self::Form(fields.into_iter().collect())
    }

    /// Replaces the coercion of a select field. Other types are unchanged.
    #[must_use]
    pub fn with_coerce(mut self, new: Coerce) -> Self {
        if let Self::Select { coerce, .. } | Self::SelectMultiple { coerce, .. } = &mut self {
            *coerce = new;
        }
        self
    }

    /// Returns the kind of this type.
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Boolean => FieldKind::Boolean,
            Self::Date { .. } => FieldKind::Date,
            Self::DateTime { .. } => FieldKind::DateTime,
            Self::Decimal => FieldKind::Decimal,
            Self::Float => FieldKind::Float,
            Self::Integer => FieldKind::Integer,
            Self::String => FieldKind::String,
            Self::Select { .. } => FieldKind::Select,
            Self::SelectMultiple { .. } => FieldKind::SelectMultiple,
            Self::List(_) => FieldKind::List,
            Self::Form(_) => FieldKind::Form,
        }
    }

    /// A display name, including the inner type of lists (`List<Integer>`).
    pub fn type_name(&self) -> String {
        match self {
            Self::List(inner) => format!("List<{}>", inner.type_name()),
            other => other.kind().to_string(),
        }
    }

    /// Returns `true` if the argument may be given more than once.
    pub fn is_multiple(&self) -> bool {
        self.kind().is_in(MULTIPLE_TYPES)
    }

    /// The choices of a select field.
    pub fn choices(&self) -> Option<&[Choice]> {
        match self {
            Self::Select { choices, .. } | Self::SelectMultiple { choices, .. } => {
                Some(choices.as_slice())
            }
            _ => None,
        }
    }

    /// The strftime format of a date or date-time field.
    pub fn format(&self) -> Option<&str> {
        match self {
            Self::Date { format } | Self::DateTime { format } => Some(format.as_str()),
            _ => None,
        }
    }

    /// The value a field holds when nothing was supplied and no default
    /// applies.
    pub fn empty_value(&self) -> Value {
        match self {
            Self::Boolean => Value::Bool(false),
            Self::List(_) | Self::SelectMultiple { .. } => Value::List(Vec::new()),
            Self::Form(fields) => Value::Map(
                fields
                    .iter()
                    .map(|field| (field.name.clone(), field.field_type.empty_value()))
                    .collect(),
            ),
            _ => Value::Null,
        }
    }

    /// Converts one raw command-line string into a typed value.
    ///
    /// For repeated types the string is a single occurrence; the caller
    /// collects the results into a list. Errors are user-facing messages.
    ///
    /// ```
    /// use argforms::fields::FieldType;
    /// use argforms_core::Value;
    ///
    /// assert_eq!(FieldType::Integer.coerce("42"), Ok(Value::Int(42)));
    /// assert_eq!(
    ///     FieldType::Integer.coerce("x"),
    ///     Err("x: not a valid integer value".to_string())
    /// );
    /// ```
    pub fn coerce(&self, raw: &str) -> Result<Value, String> {
        let invalid = |what: &str| format!("{raw}: not a valid {what} value");
        match self {
            Self::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "y" | "on" => Ok(Value::Bool(true)),
                "false" | "0" | "no" | "n" | "off" | "" => Ok(Value::Bool(false)),
                _ => Err(invalid("boolean")),
            },
            Self::Date { format } => chrono::NaiveDate::parse_from_str(raw.trim(), format)
                .map(Value::Date)
                .map_err(|_| invalid("date")),
            Self::DateTime { format } => {
                chrono::NaiveDateTime::parse_from_str(raw.trim(), format)
                    .map(Value::DateTime)
                    .map_err(|_| invalid("datetime"))
            }
            Self::Decimal => Coerce::Decimal.apply(raw).ok_or_else(|| invalid("decimal")),
            Self::Float => Coerce::Float.apply(raw).ok_or_else(|| invalid("float")),
            Self::Integer => Coerce::Integer.apply(raw).ok_or_else(|| invalid("integer")),
            Self::String => Ok(Value::String(raw.to_string())),
            Self::Select { choices, coerce } => coerce
                .apply(raw)
                .filter(|value| choices.iter().any(|choice| &choice.value == value))
                .ok_or_else(|| format!("{raw}: not a valid choice")),
            Self::SelectMultiple { choices, coerce } => coerce
                .apply(raw)
                .filter(|value| choices.iter().any(|choice| &choice.value == value))
                .ok_or_else(|| format!("'{raw}' is not a valid choice for this field")),
            Self::List(inner) => inner.coerce(raw),
            Self::Form(_) => Err(format!(
                "{raw}: a nested form cannot be given a value directly"
            )),
        }
    }

    /// Applies a select field's coercion to a default value.
    ///
    /// Defaults that do not survive the coercion become `Null` (or are
    /// dropped from a multiple-select list). A scalar default for a repeated
    /// field becomes a one-item list. Other types are unchanged.
    ///
    /// ```
    /// use argforms::fields::{Coerce, FieldType};
    /// use argforms_core::Value;
    ///
    /// let field = FieldType::select(["foo", "bar"]).with_coerce(Coerce::Integer);
    /// assert_eq!(field.coerce_default(Value::from("foo")), Value::Null);
    /// ```
    pub fn coerce_default(&self, value: Value) -> Value {
        match (self, value) {
            (_, Value::Null) => Value::Null,
            (Self::Select { coerce, .. }, value) => coerce
                .apply(&helpers::stringify(&value))
                .unwrap_or(Value::Null),
            (Self::SelectMultiple { coerce, .. }, Value::List(items)) => Value::List(
                items
                    .iter()
                    .filter_map(|item| coerce.apply(&helpers::stringify(item)))
                    .collect(),
            ),
            (Self::SelectMultiple { coerce, .. }, value) => Value::List(
                coerce
                    .apply(&helpers::stringify(&value))
                    .into_iter()
                    .collect(),
            ),
            (Self::List(_), value @ Value::List(_)) => value,
            (Self::List(_), value) => Value::List(vec![value]),
            (_, value) => value,
        }
    }

    /// Renders a value the way it would be typed for this field.
    ///
    /// Dates use the field's own format. Lists render each item with the
    /// inner type and join them with `", "`.
    pub fn stringify(&self, value: &Value) -> String {
        match (self, value) {
            (Self::Date { format }, Value::Date(d)) => format_date(d, format),
            (Self::DateTime { format }, Value::DateTime(dt)) => format_datetime(dt, format),
            (Self::List(inner), Value::List(items)) => items
                .iter()
                .map(|item| inner.stringify(item))
                .collect::<Vec<_>>()
                .join(", "),
            (_, other) => helpers::stringify(other),
        }
    }
}

/// Complete definition of a form field.
///
/// ```
/// use argforms::fields::{FieldDef, FieldType};
/// use argforms::validators::NumberRange;
///
/// let field = FieldDef::new("rating", FieldType::Integer)
///     .description("how much you liked it")
///     .default(3)
///     .validator(NumberRange::new(Some(1.0), Some(5.0)));
/// assert_eq!(field.validators.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// The field name. Underscores become hyphens in the argument name.
    pub name: String,
    /// The field type, controlling coercion and registration.
    pub field_type: FieldType,
    /// Value used when the argument is absent.
    pub default: Option<DefaultValue>,
    /// Help text.
    pub description: Option<String>,
    /// Placeholder shown in usage; defaults to the upper-cased name.
    pub metavar: Option<String>,
    /// Validators run in order after coercion.
    pub validators: Vec<Arc<dyn Validator>>,
}

impl FieldDef {
    /// Creates a field with no default, description or validators.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            default: None,
            description: None,
            metavar: None,
            validators: Vec::new(),
        }
    }

    /// Sets a static default value.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Static(value.into()));
        self
    }

    /// Sets a default, static or callable.
    #[must_use]
    pub fn default_value(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Sets the metavar.
    #[must_use]
    pub fn metavar(mut self, metavar: impl Into<String>) -> Self {
        self.metavar = Some(metavar.into());
        self
    }

    /// Appends a validator.
    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Shorthand for `.validator(InputRequired::new())`.
    #[must_use]
    pub fn required(self) -> Self {
        self.validator(InputRequired::new())
    }

    /// Shorthand for `.validator(Optional)`.
    #[must_use]
    pub fn optional(self) -> Self {
        self.validator(Optional)
    }

    /// Returns the kind of this field's type.
    pub const fn kind(&self) -> FieldKind {
        self.field_type.kind()
    }

    /// The metavar, defaulting to the upper-cased name.
    pub fn metavar_or_default(&self) -> String {
        self.metavar
            .clone()
            .unwrap_or_else(|| self.name.to_uppercase())
    }

    /// The validators actually run for this field.
    ///
    /// Select fields without an explicit [`InputRequired`] or [`Optional`]
    /// validator behave as optional.
    pub fn effective_validators(&self) -> Vec<Arc<dyn Validator>> {
        let has_flow_validator = self
            .validators
            .iter()
            .any(|v| v.role() != ValidatorRole::Check);
        if self.kind().is_in(SELECT_TYPES) && !has_flow_validator {
            let mut validators: Vec<Arc<dyn Validator>> = vec![Arc::new(Optional)];
            validators.extend(self.validators.iter().cloned());
            validators
        } else {
            self.validators.clone()
        }
    }
}
