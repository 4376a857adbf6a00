//! The feedback form collected by the `feedback` binary.

use argforms::validators::{Length, NumberRange, Regexp};
use argforms::{today, BaseForm, FieldDef, FieldType};
use argforms_core::{FormError, FormResult, Value};

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// Builds the feedback form.
///
/// The `rating` and `comment` fields are nested forms, so their arguments
/// appear as `--rating-score`, `--comment-title`, and so on.
pub fn feedback_form() -> FormResult<BaseForm> {
    let email = Regexp::new(EMAIL_PATTERN)
        .map_err(|e| FormError::ConfigurationError(e.to_string()))?
        .with_message("not a valid email address");

    Ok(BaseForm::new(vec![
        FieldDef::new("name", FieldType::String)
            .description("your name")
            .required(),
        FieldDef::new("email", FieldType::String)
            .description("where to send a reply")
            .metavar("ADDRESS")
            .optional()
            .validator(email),
        FieldDef::new("visited", FieldType::date())
            .description("day of the visit")
            .default_value(today()),
        FieldDef::new("channel", FieldType::select(["web", "email", "phone"]))
            .description("how you reached us")
            .default("web"),
        FieldDef::new(
            "topics",
            FieldType::select_multiple(["billing", "support", "product"]),
        )
        .description("what the feedback is about"),
        FieldDef::new("tags", FieldType::list(FieldType::String)).description("free-form tags"),
        FieldDef::new("rating", rating_form()),
        FieldDef::new("comment", comment_form()),
        FieldDef::new("tip", FieldType::Decimal)
            .description("optional tip")
            .default(Value::Decimal(Default::default())),
        FieldDef::new("anonymous", FieldType::Boolean).description("hide your name"),
    ])
    .with_name("feedback")
    .short_argument('n', "name")
    .short_argument('e', "email")
    .short_argument('t', "tags"))
}

fn rating_form() -> FieldType {
    FieldType::form([
        FieldDef::new("score", FieldType::Integer)
            .description("overall score")
            .required()
            .validator(NumberRange::new(Some(1.0), Some(5.0))),
        FieldDef::new("would_return", FieldType::Boolean).description("would you come back"),
    ])
}

fn comment_form() -> FieldType {
    FieldType::form([
        FieldDef::new("title", FieldType::String)
            .description("a short summary")
            .optional()
            .validator(Length::new(Some(3), Some(80))),
        FieldDef::new("body", FieldType::String).description("the full comment"),
    ])
}
