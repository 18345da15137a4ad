//! # Schema
//!
//! Declarative per-field rules evaluated against a flat [`Record`].
//!
//! - Every declared field is inspected exactly once per call
//! - Only the first violated rule of a field is reported
//! - Undeclared keys in the record are ignored
//!
//! ## Absent Values
//!
//! Missing keys, `null`, and, for optional fields, empty strings are absent.
//! Absent optional fields pass. Absent required fields report their required
//! message. A required text field holding `""` is present and goes through its
//! rules, so `min_length` reports instead of `Required`.
//!
//! ## Numbers
//!
//! Number fields accept JSON numbers or text holding a finite decimal number.
//! Anything else fails with `Expected number` rather than being coerced.
use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    sync::LazyLock,
};

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

pub type Record = Map<String, Value>;

pub const REQUIRED: &str = "Required";
pub const EXPECTED_TEXT: &str = "Expected text";
pub const EXPECTED_NUMBER: &str = "Expected number";

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .unwrap()
});

pub fn is_email(input: &str) -> bool {
    EMAIL.is_match(input) && !input.starts_with('.') && !input.contains("..")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Text,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    MinLength(usize, &'static str),
    NonEmpty(&'static str),
    Email(&'static str),
    Positive(&'static str),
}

#[derive(Debug, Clone)]
pub struct Field {
    name: &'static str,
    kind: Kind,
    optional: bool,
    required_message: &'static str,
    rules: Vec<Rule>,
}

/// A value that made it past presence and type checks.
enum Typed<'a> {
    Text(&'a str),
    Number(f64),
}

impl Field {
    pub fn text(name: &'static str) -> Self {
        Self::new(name, Kind::Text)
    }

    pub fn number(name: &'static str) -> Self {
        Self::new(name, Kind::Number)
    }

    fn new(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            optional: false,
            required_message: REQUIRED,
            rules: Vec::new(),
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn required_message(mut self, message: &'static str) -> Self {
        self.required_message = message;
        self
    }

    pub fn min_length(self, min: usize, message: &'static str) -> Self {
        self.rule(Rule::MinLength(min, message))
    }

    pub fn non_empty(self, message: &'static str) -> Self {
        self.rule(Rule::NonEmpty(message))
    }

    pub fn email(self, message: &'static str) -> Self {
        self.rule(Rule::Email(message))
    }

    pub fn positive(self, message: &'static str) -> Self {
        self.rule(Rule::Positive(message))
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn check(&self, value: Option<&Value>) -> Result<(), &'static str> {
        let typed = match (self.kind, value) {
            (_, None | Some(Value::Null)) => None,
            (Kind::Text, Some(Value::String(s))) => {
                if self.optional && s.is_empty() {
                    None
                } else {
                    Some(Typed::Text(s))
                }
            }
            (Kind::Text, Some(_)) => return Err(EXPECTED_TEXT),
            (Kind::Number, Some(Value::Number(n))) => {
                Some(Typed::Number(n.as_f64().ok_or(EXPECTED_NUMBER)?))
            }
            (Kind::Number, Some(Value::String(s))) if s.trim().is_empty() => None,
            (Kind::Number, Some(Value::String(s))) => Some(Typed::Number(parse_number(s)?)),
            (Kind::Number, Some(_)) => return Err(EXPECTED_NUMBER),
        };

        let Some(typed) = typed else {
            return if self.optional {
                Ok(())
            } else {
                Err(self.required_message)
            };
        };

        for rule in &self.rules {
            if let Some(message) = violation(*rule, &typed) {
                return Err(message);
            }
        }

        Ok(())
    }
}

fn parse_number(input: &str) -> Result<f64, &'static str> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or(EXPECTED_NUMBER)
}

fn violation(rule: Rule, value: &Typed) -> Option<&'static str> {
    let passed = match (rule, value) {
        (Rule::MinLength(min, _), Typed::Text(s)) => s.chars().count() >= min,
        (Rule::NonEmpty(_), Typed::Text(s)) => !s.is_empty(),
        (Rule::Email(_), Typed::Text(s)) => is_email(s),
        (Rule::Positive(_), Typed::Number(n)) => *n > 0.0,
        // Rules declared against the wrong kind never fire.
        _ => true,
    };

    if passed {
        return None;
    }

    Some(match rule {
        Rule::MinLength(_, message)
        | Rule::NonEmpty(message)
        | Rule::Email(message)
        | Rule::Positive(message) => message,
    })
}

#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Map of every invalid field to its first violated rule. Empty means valid.
    pub fn validate(&self, record: &Record) -> ValidationErrors {
        let mut errors = ValidationErrors::default();

        for field in &self.fields {
            if let Err(message) = field.check(record.get(field.name)) {
                errors.0.insert(field.name.to_string(), message.to_string());
            }
        }

        errors
    }

    pub fn parse(&self, record: &Record) -> Result<(), ValidationErrors> {
        let errors = self.validate(record);

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Field name to a single human-readable message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(BTreeMap::from([(field.into(), message.into())]))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (field, message)) in self.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
