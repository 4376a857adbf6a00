//! Integration tests for forms driven from a real `clap` parser.
//!
//! Each test declares a form, registers it on a fresh command, parses an
//! argument vector, and binds the result through `Multidict::from_matches`.

use std::collections::BTreeMap;
use std::str::FromStr;

use argforms::helpers::{default, dynamic, now};
use argforms::validators::NumberRange;
use argforms::{BaseForm, FieldDef, FieldType, Form, Multidict};
use argforms_core::{FormError, Value};
use clap::{Arg, Command};

/// Pairs a form with the command it configured.
struct Harness {
    form: BaseForm,
    cmd: Command,
}

impl Harness {
    fn new(form: BaseForm) -> Self {
        let cmd = form.configure_parser(Command::new("test")).unwrap();
        Self { form, cmd }
    }

    fn excluding(form: BaseForm, exclude: &[&str]) -> Self {
        let cmd = form
            .configure_parser_excluding(Command::new("test"), exclude)
            .unwrap();
        Self { form, cmd }
    }

    fn arg(&self, long: &str) -> Option<&Arg> {
        self.cmd.get_arguments().find(|a| a.get_long() == Some(long))
    }

    fn help(&self, long: &str) -> String {
        self.arg(long)
            .and_then(Arg::get_help)
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    fn metavar(&self, long: &str) -> Option<String> {
        self.arg(long)
            .and_then(Arg::get_value_names)
            .map(|names| names[0].to_string())
    }

    fn bind(&mut self, args: &[&str]) -> bool {
        let argv = std::iter::once("test").chain(args.iter().copied());
        let matches = self.cmd.clone().try_get_matches_from(argv).unwrap();
        self.form
            .bind_and_validate(&Multidict::from_matches(&matches))
    }

    fn result_for(&mut self, args: &[&str]) -> BTreeMap<String, Value> {
        assert!(self.bind(args), "errors: {:?}", self.form.errors());
        self.form.data().clone()
    }
}

fn map<const N: usize>(entries: [(&str, Value); N]) -> BTreeMap<String, Value> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

// ── Field basics ────────────────────────────────────────────────────

#[test]
fn test_field_basics() {
    let kinds = [
        FieldType::date(),
        FieldType::datetime(),
        FieldType::Decimal,
        FieldType::Float,
        FieldType::Integer,
        FieldType::String,
    ];
    for kind in kinds {
        let form = BaseForm::new(vec![
            FieldDef::new("all", kind.clone())
                .description("a helping message")
                .metavar("FOO"),
            FieldDef::new("desc", kind.clone()).description("another help message"),
            FieldDef::new("var", kind.clone()).metavar("FOO"),
            FieldDef::new("nothing", kind),
        ]);
        let harness = Harness::new(form);
        assert!(harness.help("all").starts_with("a helping message"));
        assert_eq!(harness.metavar("all").as_deref(), Some("FOO"));
        assert!(harness.help("desc").starts_with("another help message"));
        assert_eq!(harness.metavar("desc").as_deref(), Some("DESC"));
        assert_eq!(harness.metavar("var").as_deref(), Some("FOO"));
        assert_eq!(harness.metavar("nothing").as_deref(), Some("NOTHING"));
    }
}

#[test]
fn test_field_values() {
    let form = BaseForm::new(vec![
        FieldDef::new("day", FieldType::date()),
        FieldDef::new("moment", FieldType::datetime()),
        FieldDef::new("exact", FieldType::Decimal),
        FieldDef::new("approx", FieldType::Float),
        FieldDef::new("count", FieldType::Integer),
        FieldDef::new("text", FieldType::String),
        FieldDef::new("flag", FieldType::Boolean),
    ]);
    let mut harness = Harness::new(form);

    let empty = harness.result_for(&[]);
    assert_eq!(empty["day"], Value::Null);
    assert_eq!(empty["flag"], Value::Bool(false));

    let result = harness.result_for(&[
        "--day",
        "2016-11-27",
        "--moment",
        "2016-11-27 12:22:42",
        "--exact",
        "7.42",
        "--approx",
        "7.42",
        "--count",
        "7",
        "--text",
        "foo",
        "--flag",
    ]);
    let day = chrono::NaiveDate::from_ymd_opt(2016, 11, 27).unwrap();
    assert_eq!(result["day"], Value::Date(day));
    assert_eq!(
        result["moment"],
        Value::DateTime(day.and_hms_opt(12, 22, 42).unwrap())
    );
    assert_eq!(
        result["exact"],
        Value::Decimal(rust_decimal::Decimal::from_str("7.42").unwrap())
    );
    assert_eq!(result["approx"], Value::Float(7.42));
    assert_eq!(result["count"], Value::Int(7));
    assert_eq!(result["text"], Value::from("foo"));
    assert_eq!(result["flag"], Value::Bool(true));
}

#[test]
fn test_static_defaults_in_help_and_data() {
    let day = chrono::NaiveDate::from_ymd_opt(2016, 11, 27).unwrap();
    let form = BaseForm::new(vec![
        FieldDef::new("day", FieldType::date()).default(day),
        FieldDef::new("moment", FieldType::datetime()).default(day.and_hms_opt(12, 22, 42).unwrap()),
        FieldDef::new("count", FieldType::Integer).default(42),
        FieldDef::new("text", FieldType::String).default("two words"),
    ]);
    let mut harness = Harness::new(form);
    assert!(harness.help("day").contains("default: 2016-11-27"));
    assert!(harness.help("moment").contains("default: \"2016-11-27 12:22:42\""));
    assert!(harness.help("count").contains("default: 42"));
    assert!(harness.help("text").contains("default: \"two words\""));

    let result = harness.result_for(&["--count", "1"]);
    assert_eq!(result["day"], Value::Date(day));
    assert_eq!(result["count"], Value::Int(1));
    assert_eq!(result["text"], Value::from("two words"));
}

#[test]
fn test_boolean_default_true_is_cleared_by_flag() {
    let form = BaseForm::new(vec![FieldDef::new("color", FieldType::Boolean).default(true)]);
    let mut harness = Harness::new(form);
    assert_eq!(harness.result_for(&[])["color"], Value::Bool(true));
    assert_eq!(harness.result_for(&["--color"])["color"], Value::Bool(false));
}

// ── Date/time formats ───────────────────────────────────────────────

#[test]
fn test_datetime_formats() {
    let form = BaseForm::new(vec![
        FieldDef::new("default_fmt", FieldType::datetime()),
        FieldDef::new("compact", FieldType::datetime_with_format("%Y%m%d%H%M%S")),
        FieldDef::new("dotted", FieldType::date_with_format("%d.%m.%Y")),
    ]);
    let mut harness = Harness::new(form);
    assert!(harness
        .help("default-fmt")
        .contains("format: \"%Y-%m-%d %H:%M:%S\"; example: \"2017-11-27 13:52:41\""));
    assert!(harness
        .help("compact")
        .contains("format: %Y%m%d%H%M%S; example: 20171127135241"));
    assert!(harness
        .help("dotted")
        .contains("format: %d.%m.%Y; example: 27.11.2017"));

    let result = harness.result_for(&["--compact", "20161127122242", "--dotted", "27.11.2016"]);
    let day = chrono::NaiveDate::from_ymd_opt(2016, 11, 27).unwrap();
    assert_eq!(
        result["compact"],
        Value::DateTime(day.and_hms_opt(12, 22, 42).unwrap())
    );
    assert_eq!(result["dotted"], Value::Date(day));
}

// ── Select fields ───────────────────────────────────────────────────

#[test]
fn test_select_fields() {
    let choices = ["foo", "bar", "baz qux"];
    let choices_str = "choices: foo, bar, \"baz qux\"";
    let form = BaseForm::new(vec![
        FieldDef::new("default", FieldType::select(choices)).default("foo"),
        FieldDef::new(
            "invalid",
            FieldType::select(choices).with_coerce(argforms::Coerce::Integer),
        )
        .default("foo"),
        FieldDef::new("multiple", FieldType::select_multiple(choices)),
        FieldDef::new("single", FieldType::select(choices)),
    ]);
    let mut harness = Harness::new(form);

    assert!(harness.help("default").contains(choices_str));
    assert!(harness.help("default").contains("default: foo"));
    assert!(harness.help("invalid").contains(choices_str));
    assert!(harness.help("invalid").contains("default: foo"));
    assert!(harness.help("multiple").contains(choices_str));
    assert!(harness.help("multiple").contains("may be supplied multiple times"));
    assert!(harness.help("single").contains(choices_str));

    assert_eq!(
        harness.result_for(&[]),
        map([
            ("default", Value::from("foo")),
            ("invalid", Value::Null),
            ("multiple", Value::List(vec![])),
            ("single", Value::Null),
        ])
    );

    let result = harness.result_for(&[
        "--single=foo",
        "--single=bar",
        "--multiple=foo",
        "--multiple=bar",
    ]);
    assert_eq!(result["default"], Value::from("foo"));
    assert_eq!(result["invalid"], Value::Null);
    assert_eq!(
        result["multiple"],
        Value::List(vec![Value::from("foo"), Value::from("bar")])
    );
    assert_eq!(result["single"], Value::from("bar"));
}

// ── Field lists ─────────────────────────────────────────────────────

#[test]
fn test_field_lists() {
    let day = |y, m, d| chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap();
    let cases: Vec<(FieldType, [&str; 2], Vec<Value>)> = vec![
        (
            FieldType::date(),
            ["2018-07-22", "2016-05-27"],
            vec![Value::Date(day(2018, 7, 22)), Value::Date(day(2016, 5, 27))],
        ),
        (
            FieldType::datetime(),
            ["2018-07-22 17:42:07", "2016-05-27 09:12:29"],
            vec![
                Value::DateTime(day(2018, 7, 22).and_hms_opt(17, 42, 7).unwrap()),
                Value::DateTime(day(2016, 5, 27).and_hms_opt(9, 12, 29).unwrap()),
            ],
        ),
        (
            FieldType::Decimal,
            ["42.7", "7.42"],
            vec![
                Value::Decimal(rust_decimal::Decimal::from_str("42.7").unwrap()),
                Value::Decimal(rust_decimal::Decimal::from_str("7.42").unwrap()),
            ],
        ),
        (
            FieldType::Float,
            ["42.7", "7.42"],
            vec![Value::Float(42.7), Value::Float(7.42)],
        ),
        (
            FieldType::Integer,
            ["42", "7"],
            vec![Value::Int(42), Value::Int(7)],
        ),
        (
            FieldType::String,
            ["foo", "bar"],
            vec![Value::from("foo"), Value::from("bar")],
        ),
    ];
    for (inner, raw, expected) in cases {
        let form = BaseForm::new(vec![FieldDef::new("value", FieldType::list(inner))]);
        let mut harness = Harness::new(form);
        assert!(harness.help("value").contains("may be supplied multiple times"));
        assert_eq!(harness.result_for(&[])["value"], Value::List(vec![]));
        let result = harness.result_for(&["--value", raw[0], "--value", raw[1]]);
        assert_eq!(result["value"], Value::List(expected));
    }
}

#[test]
fn test_field_list_validator_checks_every_item() {
    let form = BaseForm::new(vec![FieldDef::new(
        "scores",
        FieldType::list(FieldType::Integer),
    )
    .validator(NumberRange::new(Some(0.0), Some(10.0)))]);
    let mut harness = Harness::new(form);
    assert!(harness.bind(&["--scores", "3", "--scores", "4"]));
    assert!(!harness.bind(&["--scores", "3", "--scores", "11"]));
    assert_eq!(
        harness.form.errors()["scores"],
        ["number must be between 0 and 10"]
    );
}

// ── Nested forms ────────────────────────────────────────────────────

#[test]
fn test_form_fields() {
    let grandchild = || FieldType::form([FieldDef::new("value", FieldType::String)]);
    let child = || {
        FieldType::form([
            FieldDef::new("aaa", grandchild()),
            FieldDef::new("b_bb", grandchild()),
            FieldDef::new("c_c_c", grandchild()),
        ])
    };
    let form = BaseForm::new(vec![
        FieldDef::new("xxx", child()),
        FieldDef::new("y_yy", child()),
        FieldDef::new("z_z_z", child()),
    ]);
    let mut harness = Harness::new(form);

    let parents = [("xxx", "xxx", "x"), ("y_yy", "y-yy", "y"), ("z_z_z", "z-z-z", "z")];
    let children = [("aaa", "aaa", "a"), ("b_bb", "b-bb", "b"), ("c_c_c", "c-c-c", "c")];
    for (_, parent_long, _) in parents {
        for (_, child_long, _) in children {
            let long = format!("{parent_long}-{child_long}-value");
            assert!(harness.arg(&long).is_some(), "missing --{long}");
        }
    }

    let nested = |f: &dyn Fn(&str, &str) -> Value| {
        let mut outer = BTreeMap::new();
        for (parent, _, p) in parents {
            let mut middle = BTreeMap::new();
            for (child, _, c) in children {
                middle.insert(child.to_string(), Value::Map(map([("value", f(p, c))])));
            }
            outer.insert(parent.to_string(), Value::Map(middle));
        }
        outer
    };

    assert_eq!(harness.result_for(&[]), nested(&|_, _| Value::Null));

    let mut argv = Vec::new();
    for (_, parent_long, p) in parents {
        for (_, child_long, c) in children {
            argv.push(format!("--{parent_long}-{child_long}-value"));
            argv.push(format!("{p}{c}"));
        }
    }
    let argv: Vec<&str> = argv.iter().map(String::as_str).collect();
    assert_eq!(
        harness.result_for(&argv),
        nested(&|p, c| Value::from(format!("{p}{c}")))
    );
    assert_eq!(
        harness.form.bound_fields()[4].name,
        "y_yy-b_bb-value"
    );
}

// ── Excluding fields ────────────────────────────────────────────────

#[test]
fn test_exclude_fields() {
    let form = BaseForm::new(vec![
        FieldDef::new("value", FieldType::String),
        FieldDef::new("other", FieldType::String),
        FieldDef::new(
            "child",
            FieldType::form([FieldDef::new("value", FieldType::String)]),
        ),
    ]);
    let harness = Harness::excluding(form, &["value", "child"]);
    assert!(harness.arg("value").is_none());
    assert!(harness.arg("child-value").is_none());
    assert!(harness.arg("other").is_some());
}

// ── Defaults ────────────────────────────────────────────────────────

#[test]
fn test_default_precedence() {
    let fields = || vec![FieldDef::new("value", FieldType::String)];
    let obj = map([("value", Value::from("foo"))]);
    let data = map([("value", Value::from("baz"))]);

    let with_obj = Harness::new(BaseForm::new(fields()).with_obj(obj.clone()));
    assert!(with_obj.help("value").contains("default: foo"));

    let with_data = Harness::new(BaseForm::new(fields()).with_data(data.clone()));
    assert!(with_data.help("value").contains("default: baz"));

    let mut both = Harness::new(
        BaseForm::new(fields())
            .with_obj(obj.clone())
            .with_data(data.clone()),
    );
    assert!(both.help("value").contains("default: foo"));
    assert_eq!(both.result_for(&[])["value"], Value::from("foo"));

    let mut plain = Harness::new(BaseForm::new(fields()));
    assert_eq!(plain.result_for(&[])["value"], Value::Null);

    let mut data_only = Harness::new(BaseForm::new(fields()).with_data(data));
    assert_eq!(data_only.result_for(&[])["value"], Value::from("baz"));
}

#[test]
fn test_callable_defaults() {
    let form = BaseForm::new(vec![
        FieldDef::new("common", FieldType::datetime()).default_value(now()),
        FieldDef::new("specified", FieldType::String)
            .default_value(default(|| Value::from("bar"), "always bar")),
        FieldDef::new("unknown", FieldType::String).default_value(dynamic(|| Value::from("foo"))),
    ]);
    let mut harness = Harness::new(form);
    assert!(harness.help("common").contains("default: now"));
    assert!(harness.help("specified").contains("default: \"always bar\""));
    assert!(harness.help("unknown").contains("default: dynamic"));

    let result = harness.result_for(&[]);
    assert!(matches!(result["common"], Value::DateTime(_)));
    assert_eq!(result["specified"], Value::from("bar"));
    assert_eq!(result["unknown"], Value::from("foo"));
}

// ── Short arguments ─────────────────────────────────────────────────

#[test]
fn test_short_arguments() {
    let form = BaseForm::new(vec![
        FieldDef::new("alpha", FieldType::String),
        FieldDef::new("bravo", FieldType::String),
        FieldDef::new("charlie", FieldType::String),
        FieldDef::new("delta", FieldType::String),
    ])
    .short_argument('a', "alpha")
    .short_argument('b', "bravo")
    .short_argument('c', "echo")
    .short_argument('c', "charlie")
    .short_argument('d', "delta");
    let mut harness = Harness::new(form);
    for name in ["alpha", "bravo", "charlie", "delta"] {
        let short = harness.arg(name).and_then(Arg::get_short);
        assert_eq!(short, name.chars().next());
    }

    assert_eq!(
        harness.result_for(&[]),
        map([
            ("alpha", Value::Null),
            ("bravo", Value::Null),
            ("charlie", Value::Null),
            ("delta", Value::Null),
        ])
    );
    assert_eq!(
        harness.result_for(&["-aecho", "-bgolf", "-ckilo", "-dlima"]),
        map([
            ("alpha", Value::from("echo")),
            ("bravo", Value::from("golf")),
            ("charlie", Value::from("kilo")),
            ("delta", Value::from("lima")),
        ])
    );
}

// ── Declaration errors ──────────────────────────────────────────────

#[test]
fn test_short_argument_on_form_field() {
    let form = BaseForm::new(vec![FieldDef::new(
        "child",
        FieldType::form([FieldDef::new("value", FieldType::String)]),
    )])
    .short_argument('c', "child");
    let err = form.configure_parser(Command::new("test")).unwrap_err();
    assert!(matches!(err, FormError::ShortArgumentOnFormField(_)));
    assert!(err
        .to_string()
        .contains("cannot assign a short argument to a FormField"));
}

#[test]
fn test_single_character_field_name() {
    let form = BaseForm::new(vec![FieldDef::new("a", FieldType::String)]);
    let err = form.configure_parser(Command::new("test")).unwrap_err();
    assert!(err
        .to_string()
        .contains("field names must be at least two characters"));
}

#[test]
fn test_unsupported_field_type() {
    let form = BaseForm::new(vec![FieldDef::new(
        "flags",
        FieldType::list(FieldType::Boolean),
    )]);
    let err = form.configure_parser(Command::new("test")).unwrap_err();
    assert!(err.to_string().contains("unsupported field type"));
    assert!(err.to_string().contains("List<Boolean>"));
}

#[test]
fn test_field_named_help_collides_with_help_flag() {
    let form = BaseForm::new(vec![FieldDef::new("help", FieldType::String)]);
    let err = form.configure_parser(Command::new("test")).unwrap_err();
    assert!(matches!(err, FormError::DuplicateField(_)));

    let cmd = form
        .configure_parser(Command::new("test").disable_help_flag(true))
        .unwrap();
    let matches = cmd.try_get_matches_from(["test", "--help", "me"]).unwrap();
    assert_eq!(Multidict::from_matches(&matches).get("help"), Some("me"));
}

#[test]
fn test_short_h_collides_with_help_flag() {
    let form = BaseForm::new(vec![FieldDef::new("host", FieldType::String)])
        .short_argument('h', "host");
    let err = form.configure_parser(Command::new("test")).unwrap_err();
    assert!(matches!(err, FormError::ConfigurationError(_)));
    assert!(err.to_string().contains("-h"));
}

#[test]
fn test_long_flag_collisions() {
    let form = BaseForm::new(vec![
        FieldDef::new("a_b", FieldType::String),
        FieldDef::new("a-b", FieldType::String),
    ]);
    let err = form.configure_parser(Command::new("test")).unwrap_err();
    assert!(matches!(err, FormError::DuplicateField(_)));

    let form = BaseForm::new(vec![
        FieldDef::new("xx_yy", FieldType::String),
        FieldDef::new(
            "xx",
            FieldType::form([FieldDef::new("yy", FieldType::String)]),
        ),
    ]);
    let err = form.configure_parser(Command::new("test")).unwrap_err();
    assert!(err.to_string().contains("--xx-yy"));

    let cmd = Command::new("test").arg(Arg::new("verbose").long("verbose"));
    let form = BaseForm::new(vec![FieldDef::new("verbose", FieldType::Boolean)]);
    assert!(form.configure_parser(cmd).is_err());
}

// ── Validation and error output ─────────────────────────────────────

#[test]
fn test_print_errors() {
    let form = BaseForm::new(vec![
        FieldDef::new(
            "child",
            FieldType::form([FieldDef::new("value", FieldType::select(Vec::<&str>::new()))]),
        ),
        FieldDef::new("multiple", FieldType::select_multiple(Vec::<&str>::new())),
        FieldDef::new("number", FieldType::Integer),
    ]);
    let mut harness = Harness::new(form);
    assert!(!harness.bind(&[
        "--child-value",
        "foo",
        "--multiple",
        "bar",
        "--number",
        "baz",
    ]));

    let mut out = Vec::new();
    harness.form.print_errors(&mut out).unwrap();
    let expected = [
        "child-value: foo: not a valid choice",
        "multiple: 'bar' is not a valid choice for this field",
        "number: baz: not a valid integer value",
    ];
    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!("{}\n", expected.join("\n"))
    );
    assert_eq!(harness.form.errors().len(), 3);
    assert!(harness.form.errors().contains_key("child-value"));
}

#[test]
fn test_required_field_missing_then_supplied() {
    let form = BaseForm::new(vec![
        FieldDef::new("name", FieldType::String).required(),
        FieldDef::new("level", FieldType::Integer)
            .optional()
            .validator(NumberRange::new(Some(1.0), Some(3.0))),
    ]);
    let mut harness = Harness::new(form);

    assert!(!harness.bind(&[]));
    assert_eq!(harness.form.errors()["name"], ["this field is required"]);
    assert!(!harness.form.errors().contains_key("level"));

    assert!(harness.bind(&["--name", "alice"]));
    assert!(harness.form.errors().is_empty());

    assert!(!harness.bind(&["--name", "alice", "--level", "4"]));
    assert_eq!(
        harness.form.errors()["level"],
        ["number must be between 1 and 3"]
    );
}

#[test]
fn test_multidict_from_pairs_binds_like_matches() {
    let mut form = BaseForm::new(vec![
        FieldDef::new("tags", FieldType::list(FieldType::String)),
        FieldDef::new("count", FieldType::Integer),
    ]);
    let args = Multidict::from_pairs([("tags", "a"), ("tags", "b"), ("count", "3")]);
    assert!(form.bind_and_validate(&args));
    assert_eq!(
        form.data()["tags"],
        Value::List(vec![Value::from("a"), Value::from("b")])
    );
    assert_eq!(form.data()["count"], Value::Int(3));
}

#[test]
fn test_select_multiple_scalar_default_binds_a_list() {
    let mut harness = Harness::new(BaseForm::new(vec![FieldDef::new(
        "topics",
        FieldType::select_multiple(["foo", "bar"]),
    )
    .default("foo")]));
    assert_eq!(
        harness.result_for(&[]),
        map([("topics", Value::List(vec![Value::from("foo")]))])
    );
    assert_eq!(
        harness.result_for(&["--topics", "bar"]),
        map([("topics", Value::List(vec![Value::from("bar")]))])
    );
}

#[test]
fn test_data_serializes_to_json() {
    let mut harness = Harness::new(BaseForm::new(vec![
        FieldDef::new("name", FieldType::String),
        FieldDef::new("count", FieldType::Integer).default(2),
        FieldDef::new("tags", FieldType::list(FieldType::String)),
        FieldDef::new(
            "child",
            FieldType::form([FieldDef::new("flag", FieldType::Boolean)]),
        ),
    ]));
    harness.result_for(&["--name", "Ada", "--tags", "x", "--child-flag"]);
    let json = serde_json::to_value(harness.form.data()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "name": "Ada",
            "count": 2,
            "tags": ["x"],
            "child": {"flag": true},
        })
    );
}
