//! # argforms
//!
//! Declarative forms driven from command-line arguments. A form is a list of
//! typed fields; it registers one `clap` argument per field, binds the parsed
//! values, coerces them, runs validators, and reports errors per field.
//!
//! ## Modules
//!
//! - [`fields`] - Field definitions, field types, and string ⇄ value coercion
//! - [`helpers`] - Default values, `stringify`, and `quote`
//! - [`validators`] - The `Validator` trait and built-in validators
//! - [`validation`] - The per-field bind and validate pipeline
//! - [`multidict`] - A read-only multi-value view of parsed arguments
//! - [`parser`] - Registration of fields as `clap` arguments
//! - [`form`] - The `Form` trait and `BaseForm`
//!
//! ## Example
//!
//! ```
//! use argforms::validators::NumberRange;
//! use argforms::{BaseForm, FieldDef, FieldType, Form, Multidict};
//!
//! let mut form = BaseForm::new(vec![
//!     FieldDef::new("rating", FieldType::Integer)
//!         .required()
//!         .validator(NumberRange::new(Some(1.0), Some(5.0))),
//! ]);
//! let cmd = form.configure_parser(clap::Command::new("rate")).unwrap();
//!
//! let matches = cmd.try_get_matches_from(["rate", "--rating", "9"]).unwrap();
//! assert!(!form.bind_and_validate(&Multidict::from_matches(&matches)));
//!
//! let mut out = Vec::new();
//! form.print_errors(&mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "rating: number must be between 1 and 5\n");
//! ```

pub mod fields;
pub mod form;
pub mod helpers;
pub mod multidict;
pub mod parser;
pub mod validation;
pub mod validators;

pub use fields::{
    Choice, Coerce, FieldDef, FieldKind, FieldType, DATETIME_TYPES, MULTIPLE_TYPES,
    PRIMITIVE_TYPES, SELECT_TYPES, SIMPLE_TYPES,
};
pub use form::{BaseForm, Form};
pub use helpers::{default, dynamic, now, quote, stringify, today, DefaultValue};
pub use multidict::Multidict;
