//! Declarative field rules applied to raw JSON bodies before any handler runs.
//!
//! A [`RuleSet`] is an ordered list of [`FieldRule`]s. Evaluation never stops
//! at the first failure: every failing check of every field is reported, in
//! declaration order, so a client gets the complete picture in one round trip.
//! Fields that pass are trimmed/escaped and returned; undeclared fields are
//! dropped.

pub mod rule_sets;

use serde_json::{Map, Value};
use url::Url;
use validator::ValidateEmail;

use crate::{
    errors::{AppError, FieldError},
    utils::sanitize::escape_markup,
};

pub use rule_sets::ValidationRules;

/// `Full` evaluates every rule (create). `Partial` skips rules whose field is
/// absent from the body (update).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Full,
    Partial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    /// Checks are skipped when the field is absent or null.
    Optional,
    /// Checks are skipped when the field is absent, null or blank.
    /// A blank value is stored as null.
    OptionalFalsy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// A string with at least one non-whitespace character.
    NotBlank,
    /// Null or a string.
    Text,
    /// Blank, or a mailbox address.
    Email,
    /// Blank, or an absolute URL with an http/https scheme and a host.
    HttpUrl,
    /// Null or an array of strings.
    TextList,
}

impl Check {
    pub fn passes(self, value: &Value) -> bool {
        match self {
            Check::NotBlank => value.as_str().is_some_and(|s| !s.trim().is_empty()),
            Check::Text => value.is_null() || value.is_string(),
            Check::Email => match value {
                Value::Null => true,
                Value::String(s) => s.trim().is_empty() || is_email(s.trim()),
                _ => false,
            },
            Check::HttpUrl => match value {
                Value::Null => true,
                Value::String(s) => s.trim().is_empty() || is_http_url(s.trim()),
                _ => false,
            },
            Check::TextList => match value {
                Value::Null => true,
                Value::Array(items) => items.iter().all(Value::is_string),
                _ => false,
            },
        }
    }
}

/// A mailbox whose domain has at least one dot, as in `ada@example.com`.
pub fn is_email(candidate: &str) -> bool {
    candidate.validate_email()
        && candidate
            .rsplit_once('@')
            .is_some_and(|(_, domain)| domain.contains('.') && !domain.ends_with('.'))
}

pub fn is_http_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.has_host(),
        Err(_) => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sanitizer {
    Trim,
    Escape,
    NormalizeEmail,
}

impl Sanitizer {
    fn apply(self, value: Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.apply_str(&s)),
            Value::Array(items) => Value::Array(items.into_iter().map(|item| self.apply(item)).collect()),
            other => other,
        }
    }

    fn apply_str(self, s: &str) -> String {
        match self {
            Sanitizer::Trim => s.trim().to_string(),
            Sanitizer::Escape => escape_markup(s),
            Sanitizer::NormalizeEmail => s.trim().to_lowercase(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    field: &'static str,
    presence: Presence,
    checks: Vec<(Check, &'static str)>,
    sanitizers: Vec<Sanitizer>,
}

impl FieldRule {
    fn new(field: &'static str, presence: Presence) -> Self {
        FieldRule {
            field,
            presence,
            checks: Vec::new(),
            sanitizers: Vec::new(),
        }
    }

    pub fn required(field: &'static str) -> Self {
        Self::new(field, Presence::Required)
    }

    pub fn optional(field: &'static str) -> Self {
        Self::new(field, Presence::Optional)
    }

    pub fn optional_falsy(field: &'static str) -> Self {
        Self::new(field, Presence::OptionalFalsy)
    }

    pub fn check(mut self, check: Check, message: &'static str) -> Self {
        self.checks.push((check, message));
        self
    }

    pub fn trim(mut self) -> Self {
        self.sanitizers.push(Sanitizer::Trim);
        self
    }

    pub fn escape(mut self) -> Self {
        self.sanitizers.push(Sanitizer::Escape);
        self
    }

    pub fn normalize_email(mut self) -> Self {
        self.sanitizers.push(Sanitizer::NormalizeEmail);
        self
    }

    fn skips(&self, value: &Value) -> bool {
        match self.presence {
            Presence::Required => false,
            Presence::Optional => value.is_null(),
            Presence::OptionalFalsy => match value {
                Value::Null => true,
                Value::String(s) => s.trim().is_empty(),
                _ => false,
            },
        }
    }

    fn sanitize(&self, value: Value) -> Value {
        self.sanitizers.iter().fold(value, |value, sanitizer| sanitizer.apply(value))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<FieldRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        RuleSet::default()
    }

    pub fn field(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Runs every rule and returns either the sanitized declared fields or
    /// the ordered failure list.
    pub fn evaluate(&self, body: &Value, mode: Mode) -> Result<Map<String, Value>, Vec<FieldError>> {
        let Some(object) = body.as_object() else {
            return Err(vec![FieldError::new("body", "Request body must be a JSON object")]);
        };

        let mut failures = Vec::new();
        let mut accepted = Map::new();

        for rule in &self.rules {
            let supplied = object.get(rule.field);
            if mode == Mode::Partial && supplied.is_none() {
                continue;
            }
            let value = supplied.unwrap_or(&Value::Null);

            if rule.skips(value) {
                if supplied.is_some() {
                    accepted.insert(rule.field.to_string(), Value::Null);
                }
                continue;
            }

            // Checks see the stored form, so a value that sanitizes to blank fails presence.
            let sanitized = rule.sanitize(value.clone());

            let mut passed = true;
            for (check, message) in &rule.checks {
                if !check.passes(&sanitized) {
                    failures.push(FieldError::new(rule.field, *message));
                    passed = false;
                }
            }

            if passed && supplied.is_some() {
                accepted.insert(rule.field.to_string(), sanitized);
            }
        }

        if failures.is_empty() {
            Ok(accepted)
        } else {
            Err(failures)
        }
    }

    /// The request gate: a failing body never reaches a handler.
    pub fn check(&self, body: &Value, mode: Mode) -> Result<Map<String, Value>, AppError> {
        self.evaluate(body, mode).map_err(AppError::ValidationError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_rules() -> RuleSet {
        RuleSet::new()
            .field(
                FieldRule::required("title")
                    .check(Check::NotBlank, "Title is required")
                    .check(Check::Text, "Title must be text")
                    .trim()
                    .escape(),
            )
            .field(
                FieldRule::optional_falsy("link")
                    .check(Check::HttpUrl, "Link must be a valid URL")
                    .trim(),
            )
            .field(
                FieldRule::optional("labels")
                    .check(Check::TextList, "Labels must be an array of strings")
                    .trim(),
            )
    }

    #[test]
    fn blank_and_whitespace_required_values_fail() {
        for title in [json!(""), json!("   "), Value::Null] {
            let errors = sample_rules().evaluate(&json!({ "title": title }), Mode::Full).unwrap_err();
            assert_eq!(errors, vec![FieldError::new("title", "Title is required")]);
        }
    }

    #[test]
    fn missing_required_field_fails_in_full_mode_only() {
        let errors = sample_rules().evaluate(&json!({}), Mode::Full).unwrap_err();
        assert_eq!(errors[0].field, "title");

        let fields = sample_rules().evaluate(&json!({}), Mode::Partial).unwrap();
        assert!(fields.is_empty());
    }

    #[test]
    fn a_field_accumulates_every_failing_check_in_order() {
        let errors = sample_rules()
            .evaluate(&json!({ "title": 42, "link": "nope", "labels": "x" }), Mode::Full)
            .unwrap_err();

        assert_eq!(
            errors,
            vec![
                FieldError::new("title", "Title is required"),
                FieldError::new("title", "Title must be text"),
                FieldError::new("link", "Link must be a valid URL"),
                FieldError::new("labels", "Labels must be an array of strings"),
            ]
        );
    }

    #[test]
    fn optional_urls_accept_absent_blank_and_http() {
        let rules = sample_rules();
        assert!(rules.evaluate(&json!({ "title": "t" }), Mode::Full).is_ok());
        assert!(rules.evaluate(&json!({ "title": "t", "link": "" }), Mode::Full).is_ok());
        assert!(rules.evaluate(&json!({ "title": "t", "link": "https://example.com" }), Mode::Full).is_ok());
        assert!(rules.evaluate(&json!({ "title": "t", "link": "not a url" }), Mode::Full).is_err());
        assert!(rules.evaluate(&json!({ "title": "t", "link": "ftp://example.com" }), Mode::Full).is_err());
    }

    #[test]
    fn blank_optional_values_become_null() {
        let fields = sample_rules()
            .evaluate(&json!({ "title": "t", "link": "  " }), Mode::Full)
            .unwrap();
        assert_eq!(fields["link"], Value::Null);
    }

    #[test]
    fn sanitizers_trim_escape_and_drop_undeclared_fields() {
        let fields = sample_rules()
            .evaluate(
                &json!({ "title": "  <i>Hello</i>  ", "labels": [" a ", "b "], "owner": "me" }),
                Mode::Full,
            )
            .unwrap();

        assert_eq!(fields["title"], "&lt;i&gt;Hello&lt;&#x2F;i&gt;");
        assert_eq!(fields["labels"], json!(["a", "b"]));
        assert!(!fields.contains_key("owner"));
    }

    #[test]
    fn dotless_email_domains_are_rejected() {
        assert!(is_email("ada@example.com"));
        assert!(!is_email("ada@localhost"));
        assert!(!is_email("ada@example."));
        assert!(!Check::Email.passes(&json!("ada@localhost")));
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        let errors = sample_rules().evaluate(&json!(["title"]), Mode::Full).unwrap_err();
        assert_eq!(errors[0].field, "body");
    }

    #[test]
    fn gate_wraps_failures_in_a_validation_error() {
        match sample_rules().check(&json!({ "title": "" }), Mode::Full) {
            Err(AppError::ValidationError(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn http_url_requires_scheme_and_host() {
        assert!(is_http_url("http://localhost:3000/demo"));
        assert!(!is_http_url("example.com"));
        assert!(!is_http_url("mailto:me@example.com"));
    }
}
