//! Validation pipeline for bound fields.
//!
//! Binding and validation happen in two steps, each collecting errors
//! rather than short-circuiting:
//!
//! 1. [`process_field`] coerces the raw command-line strings into a typed
//!    value (or falls back to the default when the argument was absent),
//!    recording coercion failures.
//! 2. [`validate_field`] runs the field's validators over the result.
//!
//! [`BoundField`] pairs a field definition with the state produced by
//! these steps.

use argforms_core::Value;

use crate::fields::FieldDef;
use crate::helpers::DefaultValue;
use crate::validators::{FieldInput, Flow, ValidatorRole};

/// A leaf field bound to raw input, its coerced value, and its errors.
#[derive(Debug, Clone)]
pub struct BoundField {
    /// Full name: nested form names and the field name joined with `-`.
    pub name: String,
    /// The field names from the outermost form down to this field.
    pub path: Vec<String>,
    /// The field definition.
    pub field: FieldDef,
    /// Raw values, `None` if the argument was not supplied.
    pub raw: Option<Vec<String>>,
    /// The coerced value, or the default.
    pub value: Value,
    /// Errors from coercion and, after [`validate`](Self::validate), from
    /// the validators.
    pub errors: Vec<String>,
}

impl BoundField {
    /// Binds `field` to its raw input, coercing it immediately.
    pub fn bind(
        field: &FieldDef,
        path: Vec<String>,
        raw: Option<&[String]>,
        default: Option<&DefaultValue>,
    ) -> Self {
        let (value, errors) = process_field(field, raw, default);
        Self {
            name: path.join("-"),
            path,
            field: field.clone(),
            raw: raw.map(<[String]>::to_vec),
            value,
            errors,
        }
    }

    /// The argument name shown to users (`_` replaced by `-`).
    pub fn argument_name(&self) -> String {
        self.name.replace('_', "-")
    }

    /// The view of this field passed to validators.
    pub fn input(&self) -> FieldInput<'_> {
        FieldInput {
            raw: self.raw.as_deref(),
            value: &self.value,
        }
    }

    /// Runs the validators. Returns `true` if no errors remain.
    pub fn validate(&mut self) -> bool {
        let process_errors = std::mem::take(&mut self.errors);
        let errors = validate_field(&self.field, &self.input(), process_errors);
        self.errors = errors;
        self.errors.is_empty()
    }
}

/// Converts raw input into a typed value.
///
/// Returns the value and any coercion errors. An absent argument takes the
/// default (resolving callables) or the type's empty value. Repeated
/// fields coerce every occurrence; single-valued fields take the last one.
pub fn process_field(
    field: &FieldDef,
    raw: Option<&[String]>,
    default: Option<&DefaultValue>,
) -> (Value, Vec<String>) {
    let field_type = &field.field_type;
    let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
        let value = default.map_or_else(
            || field_type.empty_value(),
            |default| field_type.coerce_default(default.resolve()),
        );
        return (value, Vec::new());
    };

    let mut errors = Vec::new();
    let value = if field_type.is_multiple() {
        let items = raw
            .iter()
            .filter_map(|item| field_type.coerce(item).map_err(|e| errors.push(e)).ok())
            .collect();
        Value::List(items)
    } else {
        let last = &raw[raw.len() - 1];
        field_type.coerce(last).unwrap_or_else(|e| {
            errors.push(e);
            Value::Null
        })
    };
    tracing::trace!(field = %field.name, value = %value, errors = errors.len(), "processed field");
    (value, errors)
}

/// Runs the field's validators and returns the final error list.
///
/// `process_errors` are the coercion errors from [`process_field`]. Check
/// validators are skipped while errors are present. An [`Optional`]
/// validator that stops the chain discards all errors; a failing
/// [`InputRequired`] replaces them with its own message.
///
/// [`Optional`]: crate::validators::Optional
/// [`InputRequired`]: crate::validators::InputRequired
pub fn validate_field(
    field: &FieldDef,
    input: &FieldInput<'_>,
    process_errors: Vec<String>,
) -> Vec<String> {
    let mut errors = process_errors;
    for validator in field.effective_validators() {
        let role = validator.role();
        if role == ValidatorRole::Check && !errors.is_empty() {
            continue;
        }
        match validator.validate(input) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Stop) => {
                if role == ValidatorRole::Optional {
                    errors.clear();
                }
                break;
            }
            Err(err) => {
                if role == ValidatorRole::Required {
                    errors.clear();
                    errors.push(err.message);
                    break;
                }
                errors.push(err.message);
            }
        }
    }
    errors
}

/// Coerces and validates a single field in one step.
///
/// Returns the cleaned value or the list of error messages.
pub fn clean_field_value(
    field: &FieldDef,
    raw: Option<&[String]>,
    default: Option<&DefaultValue>,
) -> Result<Value, Vec<String>> {
    let mut bound = BoundField::bind(field, vec![field.name.clone()], raw, default);
    if bound.validate() {
        Ok(bound.value)
    } else {
        Err(bound.errors)
    }
}
