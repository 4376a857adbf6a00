//! Default values and value-to-string rendering.
//!
//! A field default is either a plain [`Value`] or a zero-argument callable
//! evaluated when the form is bound. Callables cannot be rendered in
//! `--help` output, so they carry an optional human description instead
//! (see [`default`], [`now`], and [`today`]).
//!
//! [`stringify`] renders a value the way a user would type it on the
//! command line; [`quote`] wraps multi-word text for display.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use argforms_core::Value;

use crate::fields::FieldDef;

/// Default strftime format for date fields.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default strftime format for date-time fields.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Help text shown for a callable default that has no description.
pub const DYNAMIC_DEFAULT_TEXT: &str = "dynamic";

/// A zero-argument function producing a default value.
pub type DefaultFn = Arc<dyn Fn() -> Value + Send + Sync>;

/// The default value of a field.
#[derive(Clone)]
pub enum DefaultValue {
    /// A fixed value.
    Static(Value),
    /// A value computed at bind time.
    Dynamic {
        /// Produces the value.
        func: DefaultFn,
        /// What to show in help output in place of the value.
        description: Option<String>,
    },
}

impl DefaultValue {
    /// Returns the default value, calling the function for dynamic defaults.
    ///
    /// ```
    /// use argforms::helpers::{default, DefaultValue};
    /// use argforms_core::Value;
    ///
    /// assert_eq!(DefaultValue::Static(Value::Int(7)).resolve(), Value::Int(7));
    /// assert_eq!(default(|| Value::from("bar"), "always bar").resolve(), Value::from("bar"));
    /// ```
    pub fn resolve(&self) -> Value {
        match self {
            Self::Static(value) => value.clone(),
            Self::Dynamic { func, .. } => func(),
        }
    }

    /// Returns `true` for callable defaults.
    pub const fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic { .. })
    }

    /// Text describing a dynamic default in help output.
    ///
    /// Returns `None` for static defaults, which are rendered from their
    /// value instead.
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Static(_) => None,
            Self::Dynamic { description, .. } => {
                Some(description.as_deref().unwrap_or(DYNAMIC_DEFAULT_TEXT))
            }
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Dynamic { description, .. } => f
                .debug_struct("Dynamic")
                .field("description", description)
                .finish_non_exhaustive(),
        }
    }
}

impl PartialEq for DefaultValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Static(a), Self::Static(b)) => a == b,
            (Self::Dynamic { func: a, .. }, Self::Dynamic { func: b, .. }) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Wraps a callable default with the description shown in help output.
///
/// ```
/// use argforms::helpers::default;
/// use argforms_core::Value;
///
/// let wrapped = default(|| Value::Int(42), "some default value");
/// assert_eq!(wrapped.resolve(), Value::Int(42));
/// assert_eq!(wrapped.description(), Some("some default value"));
/// ```
pub fn default<F>(func: F, description: impl Into<String>) -> DefaultValue
where
    F: Fn() -> Value + Send + Sync + 'static,
{
    DefaultValue::Dynamic {
        func: Arc::new(func),
        description: Some(description.into()),
    }
}

/// Wraps a callable default without a description.
///
/// Help output shows `dynamic` for these.
pub fn dynamic<F>(func: F) -> DefaultValue
where
    F: Fn() -> Value + Send + Sync + 'static,
{
    DefaultValue::Dynamic {
        func: Arc::new(func),
        description: None,
    }
}

/// A default of the current local date and time, described as `now`.
pub fn now() -> DefaultValue {
    default(|| Value::DateTime(chrono::Local::now().naive_local()), "now")
}

/// A default of the current local date, described as `today`.
pub fn today() -> DefaultValue {
    default(|| Value::Date(chrono::Local::now().date_naive()), "today")
}

/// Renders a value the way it would be typed on the command line.
///
/// Dates and date-times use [`DEFAULT_DATE_FORMAT`] and
/// [`DEFAULT_DATETIME_FORMAT`]; list items are joined with `", "`.
/// `Null` renders as an empty string.
///
/// ```
/// use argforms::helpers::stringify;
/// use argforms_core::Value;
///
/// let date = chrono::NaiveDate::from_ymd_opt(2016, 11, 27).unwrap();
/// assert_eq!(stringify(&Value::Date(date)), "2016-11-27");
/// assert_eq!(stringify(&Value::Float(7.42)), "7.42");
/// assert_eq!(stringify(&Value::Null), "");
/// ```
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Date(d) => format_date(d, DEFAULT_DATE_FORMAT),
        Value::DateTime(dt) => format_datetime(dt, DEFAULT_DATETIME_FORMAT),
        Value::List(items) => items.iter().map(stringify).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

/// Wraps `text` in double quotes when it contains more than one word.
///
/// ```
/// use argforms::helpers::quote;
///
/// assert_eq!(quote("foo"), "foo");
/// assert_eq!(quote("baz qux"), "\"baz qux\"");
/// ```
pub fn quote(text: &str) -> Cow<'_, str> {
    if text.split_whitespace().nth(1).is_some() {
        Cow::Owned(format!("\"{text}\""))
    } else {
        Cow::Borrowed(text)
    }
}

/// Formats a date with a strftime format, falling back to the default
/// format when `format` contains invalid specifiers.
pub(crate) fn format_date(d: &chrono::NaiveDate, format: &str) -> String {
    try_render(d.format(format)).unwrap_or_else(|| d.format(DEFAULT_DATE_FORMAT).to_string())
}

/// Formats a date-time with a strftime format, falling back to the
/// default format when `format` contains invalid specifiers.
pub(crate) fn format_datetime(dt: &chrono::NaiveDateTime, format: &str) -> String {
    try_render(dt.format(format))
        .unwrap_or_else(|| dt.format(DEFAULT_DATETIME_FORMAT).to_string())
}

// chrono reports bad specifiers as a `fmt::Error`, which `to_string` turns
// into a panic.
fn try_render(formatted: impl fmt::Display) -> Option<String> {
    use std::fmt::Write;

    let mut out = String::new();
    write!(out, "{formatted}").ok()?;
    Some(out)
}

/// Returns `true` if `format` is a valid strftime format string.
pub(crate) fn is_valid_format(format: &str) -> bool {
    chrono::format::StrftimeItems::new(format)
        .all(|item| !matches!(item, chrono::format::Item::Error))
}

/// Initial values supplied when a form is constructed.
///
/// Lookup precedence for a field is: object value, then data value, then
/// the field's own default. Both sources are nested maps keyed by field
/// name, mirroring the shape of [`BaseForm::data`](crate::form::BaseForm).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitialData {
    /// Values taken from an existing object.
    pub obj: Option<Value>,
    /// Values passed explicitly as initial data.
    pub data: Option<Value>,
}

impl InitialData {
    /// Resolves the default for the field at `path` (field names from the
    /// outermost form inwards, ending with `field`'s own name).
    pub fn resolve(&self, path: &[&str], field: &FieldDef) -> Option<DefaultValue> {
        [self.obj.as_ref(), self.data.as_ref()]
            .into_iter()
            .flatten()
            .find_map(|source| source.lookup(path))
            .map(|value| DefaultValue::Static(value.clone()))
            .or_else(|| field.default.clone())
    }
}
