//! Form trait and `BaseForm` implementation.
//!
//! The [`Form`] trait is the core abstraction: a form registers its fields
//! as command-line arguments, binds the parsed values, validates them, and
//! reports errors. [`BaseForm`] is the general-purpose implementation built
//! from a list of field definitions.

use std::collections::{BTreeMap, HashMap};
use std::io::{self, Write};

use argforms_core::logging::form_span;
use argforms_core::{FormResult, Value};
use clap::Command;

use crate::fields::{FieldDef, FieldType};
use crate::helpers::InitialData;
use crate::multidict::Multidict;
use crate::parser::{self, ArgumentNames, Registration};
use crate::validation::BoundField;

/// The core form trait. All form types implement this.
///
/// Validation failures never surface as `Err`: they are collected per field
/// and the boolean result of [`validate`](Form::validate) tells the caller
/// whether to proceed.
pub trait Form: Send + Sync {
    /// Returns the form's name, used in log output.
    fn name(&self) -> &str;

    /// Returns the form's field definitions in declaration order.
    fn fields(&self) -> &[FieldDef];

    /// Adds one argument per field to `cmd`.
    fn configure_parser(&self, cmd: Command) -> FormResult<Command>;

    /// Binds parsed argument values to the fields.
    fn bind(&mut self, args: &Multidict);

    /// Returns `true` if this form has been bound.
    fn is_bound(&self) -> bool;

    /// Runs the validators. Returns `true` if every field is valid.
    ///
    /// An unbound form is never valid.
    fn validate(&mut self) -> bool;

    /// Binds `args` and validates in one step.
    fn bind_and_validate(&mut self, args: &Multidict) -> bool {
        self.bind(args);
        self.validate()
    }

    /// Returns per-field validation errors keyed by full field name.
    fn errors(&self) -> &HashMap<String, Vec<String>>;

    /// Returns the bound values, with nested forms as [`Value::Map`]s.
    fn data(&self) -> &BTreeMap<String, Value>;

    /// Writes one `<argument-name>: <message>` line per error, in field
    /// declaration order.
    fn print_errors(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Writes the errors to standard error.
    fn print_errors_stderr(&self) -> io::Result<()> {
        let stderr = io::stderr();
        let mut handle = stderr.lock();
        self.print_errors(&mut handle)
    }
}

/// A general-purpose form implementation.
///
/// # Examples
///
/// ```
/// use argforms::{BaseForm, FieldDef, FieldType, Form, Multidict};
/// use argforms_core::Value;
///
/// let mut form = BaseForm::new(vec![
///     FieldDef::new("name", FieldType::String).required(),
///     FieldDef::new("count", FieldType::Integer).default(1),
/// ]);
/// let cmd = form.configure_parser(clap::Command::new("demo")).unwrap();
/// let matches = cmd.try_get_matches_from(["demo", "--name", "alice"]).unwrap();
///
/// assert!(form.bind_and_validate(&Multidict::from_matches(&matches)));
/// assert_eq!(form.data()["name"], Value::from("alice"));
/// assert_eq!(form.data()["count"], Value::Int(1));
/// ```
#[derive(Debug, Clone)]
pub struct BaseForm {
    name: String,
    field_defs: Vec<FieldDef>,
    short_arguments: BTreeMap<String, char>,
    initial: InitialData,
    bound: bool,
    bound_fields: Vec<BoundField>,
    errors: HashMap<String, Vec<String>>,
    data: BTreeMap<String, Value>,
}

impl BaseForm {
    /// Creates a new `BaseForm` with the given field definitions.
    pub fn new(fields: Vec<FieldDef>) -> Self {
        Self {
            name: "form".to_string(),
            field_defs: fields,
            short_arguments: BTreeMap::new(),
            initial: InitialData::default(),
            bound: false,
            bound_fields: Vec::new(),
            errors: HashMap::new(),
            data: BTreeMap::new(),
        }
    }

    /// Sets the form name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Assigns the short flag `-<short>` to the top-level field `field`.
    ///
    /// Assigning a letter again moves it to the new field.
    #[must_use]
    pub fn short_argument(mut self, short: char, field: impl Into<String>) -> Self {
        self.short_arguments.retain(|_, c| *c != short);
        self.short_arguments.insert(field.into(), short);
        self
    }

    /// Sets values taken from an existing object. These take precedence
    /// over both initial data and field defaults.
    #[must_use]
    pub fn with_obj(mut self, obj: impl Into<Value>) -> Self {
        self.initial.obj = Some(obj.into());
        self
    }

    /// Sets initial data. These take precedence over field defaults.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.initial.data = Some(data.into());
        self
    }

    /// Returns the short flags keyed by field name.
    pub const fn short_arguments(&self) -> &BTreeMap<String, char> {
        &self.short_arguments
    }

    /// Returns the bound leaf fields in declaration order.
    pub fn bound_fields(&self) -> &[BoundField] {
        &self.bound_fields
    }

    /// Checks the field declarations and short-flag assignments.
    pub fn check(&self) -> FormResult<()> {
        parser::check_fields(&self.field_defs, &[])?;
        parser::check_shorts(&self.field_defs, &self.short_arguments)
    }

    /// Like [`Form::configure_parser`], leaving out the named fields.
    ///
    /// Names are full field names; naming a nested form leaves out all of
    /// its fields.
    pub fn configure_parser_excluding(&self, cmd: Command, exclude: &[&str]) -> FormResult<Command> {
        if let Err(err) = self.check() {
            tracing::warn!(form = %self.name, error = %err, "invalid form declaration");
            return Err(err);
        }
        let _guard = form_span(&self.name).entered();
        tracing::debug!(fields = self.field_defs.len(), "configuring parser");
        let mut names = ArgumentNames::from_command(&cmd);
        parser::register_fields(
            cmd,
            &self.field_defs,
            &[],
            Registration {
                shorts: &self.short_arguments,
                exclude,
                initial: &self.initial,
            },
            &mut names,
        )
    }

    fn bind_fields(&mut self, fields: &[FieldDef], prefix: &[String], args: &Multidict) {
        for field in fields {
            let mut path = prefix.to_vec();
            path.push(field.name.clone());
            if let FieldType::Form(children) = &field.field_type {
                self.bind_fields(children, &path, args);
                continue;
            }
            let id = path.join("-");
            let lookup: Vec<&str> = path.iter().map(String::as_str).collect();
            let default = self.initial.resolve(&lookup, field);
            let bound = BoundField::bind(field, path, args.get_list(&id), default.as_ref());
            insert_path(&mut self.data, &bound.path, bound.value.clone());
            self.bound_fields.push(bound);
        }
    }
}

impl Form for BaseForm {
    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &[FieldDef] {
        &self.field_defs
    }

    fn configure_parser(&self, cmd: Command) -> FormResult<Command> {
        self.configure_parser_excluding(cmd, &[])
    }

    fn bind(&mut self, args: &Multidict) {
        let _guard = form_span(&self.name).entered();
        self.bound = true;
        self.bound_fields.clear();
        self.errors.clear();
        self.data.clear();

        let fields = std::mem::take(&mut self.field_defs);
        self.bind_fields(&fields, &[], args);
        self.field_defs = fields;
        tracing::debug!(fields = self.bound_fields.len(), "bound arguments");
    }

    fn is_bound(&self) -> bool {
        self.bound
    }

    fn validate(&mut self) -> bool {
        if !self.bound {
            return false;
        }
        let _guard = form_span(&self.name).entered();
        self.errors.clear();
        for bound in &mut self.bound_fields {
            if !bound.validate() {
                self.errors.insert(bound.name.clone(), bound.errors.clone());
            }
        }
        tracing::debug!(invalid = self.errors.len(), "validated form");
        self.errors.is_empty()
    }

    fn errors(&self) -> &HashMap<String, Vec<String>> {
        &self.errors
    }

    fn data(&self) -> &BTreeMap<String, Value> {
        &self.data
    }

    fn print_errors(&self, out: &mut dyn Write) -> io::Result<()> {
        for bound in &self.bound_fields {
            let name = bound.argument_name();
            for message in &bound.errors {
                writeln!(out, "{name}: {message}")?;
            }
        }
        Ok(())
    }
}

fn insert_path(map: &mut BTreeMap<String, Value>, path: &[String], value: Value) {
    match path {
        [] => {}
        [last] => {
            map.insert(last.clone(), value);
        }
        [head, rest @ ..] => {
            let entry = map
                .entry(head.clone())
                .or_insert_with(|| Value::Map(BTreeMap::new()));
            if let Value::Map(inner) = entry {
                insert_path(inner, rest, value);
            }
        }
    }
}
