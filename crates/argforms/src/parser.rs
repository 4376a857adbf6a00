//! Registration of form fields as `clap` arguments.
//!
//! Every leaf field becomes one [`clap::Arg`]:
//!
//! - the argument id is the field's full name (nested form names joined
//!   with `-`), and the long flag is the id with `_` replaced by `-`;
//! - the value name is the field's metavar (upper-cased name by default);
//! - the help text is the description followed by a parenthesised list of
//!   notes: date format and example, choices, a repeat note, the default.
//!
//! No clap defaults are set. Defaults are applied by the form when it binds,
//! so [`Multidict::from_matches`](crate::Multidict::from_matches) only ever
//! sees what the user typed.

use std::collections::{BTreeMap, HashSet};

use argforms_core::{FormError, FormResult, Value};
use clap::{Arg, ArgAction, Command};

use crate::fields::{FieldDef, FieldKind, FieldType, SIMPLE_TYPES};
use crate::helpers::{
    format_date, format_datetime, is_valid_format, quote, DefaultValue, InitialData,
};

/// Help note added to arguments that may be repeated.
pub const REPEAT_NOTE: &str = "may be supplied multiple times";

/// The instant rendered as the `example` in date and date-time help text.
pub fn example_datetime() -> Option<chrono::NaiveDateTime> {
    chrono::NaiveDate::from_ymd_opt(2017, 11, 27)?.and_hms_opt(13, 52, 41)
}

/// Checks a list of field declarations, recursing into nested forms.
///
/// Rejects names shorter than two characters, duplicate names, invalid
/// date formats, and lists of anything but simple types.
pub fn check_fields(fields: &[FieldDef], prefix: &[&str]) -> FormResult<()> {
    let mut seen = HashSet::new();
    for field in fields {
        let qualified = full_name(prefix, &field.name);
        if field.name.chars().count() < 2 {
            return Err(FormError::FieldNameTooShort(qualified));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(FormError::DuplicateField(qualified));
        }
        match &field.field_type {
            FieldType::List(inner) if !inner.kind().is_in(SIMPLE_TYPES) => {
                return Err(FormError::UnsupportedFieldType {
                    type_name: field.field_type.type_name(),
                    field: qualified,
                });
            }
            FieldType::Form(children) => {
                let mut path = prefix.to_vec();
                path.push(&field.name);
                check_fields(children, &path)?;
            }
            _ => {}
        }
        let format = match &field.field_type {
            FieldType::List(inner) => inner.format(),
            other => other.format(),
        };
        if let Some(format) = format.filter(|f| !is_valid_format(f)) {
            return Err(FormError::ConfigurationError(format!(
                "invalid date format {format:?} for field '{qualified}'"
            )));
        }
    }
    Ok(())
}

/// Builds the help text for a field, or `None` if there is nothing to say.
///
/// ```
/// use argforms::fields::{FieldDef, FieldType};
/// use argforms::parser::help_text;
///
/// let field = FieldDef::new("color", FieldType::select(["red", "dark blue"]))
///     .description("paint color")
///     .default("red");
/// assert_eq!(
///     help_text(&field, field.default.as_ref()).as_deref(),
///     Some("paint color (choices: red, \"dark blue\"; default: red)")
/// );
/// ```
pub fn help_text(field: &FieldDef, default: Option<&DefaultValue>) -> Option<String> {
    let field_type = &field.field_type;
    let mut notes = Vec::new();

    let dated = match field_type {
        FieldType::List(inner) => &**inner,
        other => other,
    };
    if let (Some(format), Some(example)) = (dated.format(), example_datetime()) {
        notes.push(format!("format: {}", quote(format)));
        let rendered = match dated {
            FieldType::Date { .. } => format_date(&example.date(), format),
            _ => format_datetime(&example, format),
        };
        notes.push(format!("example: {}", quote(&rendered)));
    }

    if let Some(choices) = field_type.choices().filter(|c| !c.is_empty()) {
        let rendered: Vec<String> = choices
            .iter()
            .map(|choice| quote(&field_type.stringify(&choice.value)).into_owned())
            .collect();
        notes.push(format!("choices: {}", rendered.join(", ")));
    }

    if field_type.is_multiple() {
        notes.push(REPEAT_NOTE.to_string());
    }

    match default {
        Some(DefaultValue::Static(Value::Null)) | None => {}
        Some(DefaultValue::Static(value)) => {
            notes.push(format!("default: {}", quote(&field_type.stringify(value))));
        }
        Some(dynamic) => {
            if let Some(description) = dynamic.description() {
                notes.push(format!("default: {}", quote(description)));
            }
        }
    }

    let notes = (!notes.is_empty()).then(|| format!("({})", notes.join("; ")));
    match (field.description.as_deref(), notes) {
        (Some(description), Some(notes)) => Some(format!("{description} {notes}")),
        (Some(description), None) => Some(description.to_string()),
        (None, notes) => notes,
    }
}

/// Builds the `clap` argument for a leaf field.
pub fn build_argument(
    field: &FieldDef,
    id: &str,
    short: Option<char>,
    default: Option<&DefaultValue>,
) -> Arg {
    let mut arg = Arg::new(id.to_string()).long(id.replace('_', "-"));
    if let Some(short) = short {
        arg = arg.short(short);
    }
    if let Some(help) = help_text(field, default) {
        arg = arg.help(help);
    }
    match field.kind() {
        FieldKind::Boolean => {
            let default_true = matches!(default, Some(DefaultValue::Static(Value::Bool(true))));
            arg.action(if default_true {
                ArgAction::SetFalse
            } else {
                ArgAction::SetTrue
            })
        }
        // Single-valued fields also append; binding keeps the last value.
        _ => arg
            .value_name(field.metavar_or_default())
            .action(ArgAction::Append),
    }
}

/// Options for [`register_fields`].
#[derive(Debug, Clone, Copy)]
pub struct Registration<'a> {
    /// Short flags, keyed by top-level field name.
    pub shorts: &'a BTreeMap<String, char>,
    /// Full names of fields (or nested forms) to leave out.
    pub exclude: &'a [&'a str],
    /// Initial values that override field defaults.
    pub initial: &'a InitialData,
}

/// Argument ids, long flags, and short flags already taken on a command.
///
/// Seeded from the command's own arguments and its automatic `--help` and
/// `--version` flags, then grown by [`ArgumentNames::claim`] as fields are
/// registered, so two fields can never map onto the same flag.
#[derive(Debug, Clone, Default)]
pub struct ArgumentNames {
    ids: HashSet<String>,
    longs: HashSet<String>,
    shorts: HashSet<char>,
}

impl ArgumentNames {
    /// Collects the names already in use on `cmd`.
    pub fn from_command(cmd: &Command) -> Self {
        let mut names = Self::default();
        for arg in cmd.get_arguments() {
            names.ids.insert(arg.get_id().as_str().to_string());
            if let Some(long) = arg.get_long() {
                names.longs.insert(long.to_string());
            }
            if let Some(short) = arg.get_short() {
                names.shorts.insert(short);
            }
        }
        if !cmd.is_disable_help_flag_set() {
            names.reserve("help", 'h');
        }
        if cmd.get_version().is_some() && !cmd.is_disable_version_flag_set() {
            names.reserve("version", 'V');
        }
        names
    }

    fn reserve(&mut self, name: &str, short: char) {
        self.ids.insert(name.to_string());
        self.longs.insert(name.to_string());
        self.shorts.insert(short);
    }

    /// Records the names of `arg`, failing if any of them is taken.
    pub fn claim(&mut self, arg: &Arg) -> FormResult<()> {
        let id = arg.get_id().as_str();
        if self.ids.contains(id) {
            return Err(FormError::DuplicateField(id.to_string()));
        }
        if let Some(long) = arg.get_long() {
            if self.longs.contains(long) {
                return Err(FormError::DuplicateField(format!("{id} (--{long})")));
            }
        }
        if let Some(short) = arg.get_short() {
            if self.shorts.contains(&short) {
                return Err(FormError::ConfigurationError(format!(
                    "short argument -{short} for field '{id}' is already in use"
                )));
            }
        }
        self.ids.insert(id.to_string());
        if let Some(long) = arg.get_long() {
            self.longs.insert(long.to_string());
        }
        if let Some(short) = arg.get_short() {
            self.shorts.insert(short);
        }
        Ok(())
    }
}

/// Adds one argument per leaf field to `cmd`, recursing into nested forms.
///
/// `fields` must already have passed [`check_fields`]. Every generated
/// argument is claimed in `names`; a collision with an existing argument or
/// an earlier field is an error.
pub fn register_fields(
    mut cmd: Command,
    fields: &[FieldDef],
    prefix: &[&str],
    options: Registration<'_>,
    names: &mut ArgumentNames,
) -> FormResult<Command> {
    for field in fields {
        let id = full_name(prefix, &field.name);
        if options.exclude.contains(&id.as_str()) {
            tracing::debug!(field = %id, "excluded from parser");
            continue;
        }
        let short = if prefix.is_empty() {
            options.shorts.get(&field.name).copied()
        } else {
            None
        };

        let mut path = prefix.to_vec();
        path.push(&field.name);

        if let FieldType::Form(children) = &field.field_type {
            if short.is_some() {
                tracing::warn!(field = %id, "short argument assigned to a nested form");
                return Err(FormError::ShortArgumentOnFormField(id));
            }
            cmd = register_fields(cmd, children, &path, options, names)?;
            continue;
        }

        let default = options.initial.resolve(&path, field);
        tracing::debug!(field = %id, kind = %field.kind(), short = ?short, "registering argument");
        let arg = build_argument(field, &id, short, default.as_ref());
        if let Err(err) = names.claim(&arg) {
            tracing::warn!(field = %id, error = %err, "argument name collision");
            return Err(err);
        }
        cmd = cmd.arg(arg);
    }
    Ok(cmd)
}

/// Checks that every short flag refers to a top-level field.
pub fn check_shorts(fields: &[FieldDef], shorts: &BTreeMap<String, char>) -> FormResult<()> {
    for (name, short) in shorts {
        if !fields.iter().any(|field| &field.name == name) {
            return Err(FormError::ConfigurationError(format!(
                "short argument -{short} refers to unknown field '{name}'"
            )));
        }
    }
    Ok(())
}

/// Joins `prefix` and `name` with `-`.
pub fn full_name(prefix: &[&str], name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}-{name}", prefix.join("-"))
    }
}
