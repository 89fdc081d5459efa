// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Declarative field rules and the routine that checks JSON objects
//! against them.
//!
//! A schema is a plain slice of [`FieldRule`] rows. Fields are checked in
//! row order and every violation is reported, so adding a field to a schema
//! means adding a row.

use serde_json::{Map, Value};
use validator::ValidateUrl;

/// Primitive type a field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
}

/// String format checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `local@domain.tld` shape
    Email,
    /// Absolute, well-formed URL
    Uri,
}

/// One row of a schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldType,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub format: Option<Format>,
    /// Allowed values; empty means unconstrained.
    pub allowed: &'static [&'static str],
}

impl FieldRule {
    /// An optional, unconstrained string field.
    pub const fn string(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldType::String,
            required: false,
            min_length: None,
            max_length: None,
            format: None,
            allowed: &[],
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn min(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    pub const fn max(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    pub const fn email(mut self) -> Self {
        self.format = Some(Format::Email);
        self
    }

    pub const fn uri(mut self) -> Self {
        self.format = Some(Format::Uri);
        self
    }

    pub const fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.allowed = values;
        self
    }
}

/// Whether absent required fields are violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Every required field must be present and non-empty.
    Full,
    /// Only fields present in the candidate are checked.
    Partial,
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn into_result(self) -> Result<(), Vec<String>> {
        if self.valid {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Check `candidate` against `schema`.
pub fn validate(schema: &[FieldRule], candidate: &Map<String, Value>, mode: Mode) -> ValidationReport {
    let mut errors = Vec::new();

    for rule in schema {
        let value = candidate.get(rule.name);

        if mode == Mode::Partial && value.is_none() {
            continue;
        }

        let blank = matches!(value, None | Some(Value::Null))
            || matches!(value, Some(Value::String(s)) if s.is_empty());
        if mode == Mode::Full && rule.required && blank {
            errors.push(format!("{} is required", rule.name));
            continue;
        }

        let value = match value {
            None | Some(Value::Null) => continue,
            Some(v) => v,
        };

        check_value(rule, value, &mut errors);
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

fn check_value(rule: &FieldRule, value: &Value, errors: &mut Vec<String>) {
    let text = value.as_str();

    match rule.kind {
        FieldType::String if text.is_none() => {
            errors.push(format!("{} must be a string", rule.name));
        }
        FieldType::String => {}
    }

    if let Some(text) = text {
        let len = text.chars().count();
        if let Some(min) = rule.min_length {
            if len < min {
                errors.push(format!("{} must be at least {} characters", rule.name, min));
            }
        }
        if let Some(max) = rule.max_length {
            if len > max {
                errors.push(format!(
                    "{} must be no more than {} characters",
                    rule.name, max
                ));
            }
        }

        match rule.format {
            Some(Format::Email) if !is_email(text) => {
                errors.push(format!("{} must be a valid email address", rule.name));
            }
            Some(Format::Uri) if !text.validate_url() => {
                errors.push(format!("{} must be a valid URL", rule.name));
            }
            _ => {}
        }
    }

    if !rule.allowed.is_empty() && !text.is_some_and(|t| rule.allowed.contains(&t)) {
        errors.push(format!(
            "{} must be one of: {}",
            rule.name,
            rule.allowed.join(", ")
        ));
    }
}

/// Simple `local@domain.tld` check: no whitespace, exactly one `@`, and a
/// dot inside the domain with at least one character on each side.
pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < domain.len() - 1)
}
