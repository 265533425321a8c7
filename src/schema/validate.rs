//! Field-level validation
//!
//! Violations are collected, never raised: a record is checked in one pass and
//! every problem found is reported together.

use super::field::FieldType;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

static EMAIL_LOCAL_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~.-]+$").expect("valid local part pattern")
});

static EMAIL_DOMAIN_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").expect("valid domain label pattern")
});

const EMAIL_MAX_LEN: usize = 254;
const EMAIL_LOCAL_MAX_LEN: usize = 64;

/// Reserved names that can never receive mail
const SPECIAL_USE_DOMAINS: &[&str] = &["arpa", "invalid", "local", "localhost", "onion", "test"];

/// What went wrong with a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MissingField,
    InvalidValue,
    UnknownField,
}

/// A single field-level violation
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct ValidationError {
    pub field: String,
    pub kind: ViolationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub message: String,
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            message: format!("missing required field {}", field),
            field,
            kind: ViolationKind::MissingField,
            reason: None,
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let field = field.into();
        let reason = reason.into();
        Self {
            message: format!("invalid value for field {}: {}", field, reason),
            field,
            kind: ViolationKind::InvalidValue,
            reason: Some(reason),
        }
    }

    pub fn unknown(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            message: format!("unknown field {}", field),
            field,
            kind: ViolationKind::UnknownField,
            reason: None,
        }
    }
}

/// Every violation found in a document. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Returns `None` when there is nothing to report.
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn to_vec(&self) -> Vec<ValidationError> {
        self.0.clone()
    }

    /// Whether any violation names `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn for_field(&self, field: &str) -> Vec<&ValidationError> {
        self.0.iter().filter(|e| e.field == field).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Treatment of fields a record kind does not declare
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    /// Keep them in the output untouched
    #[default]
    Allow,
    /// Drop them from the output
    Ignore,
    /// Report each one as a violation
    Forbid,
}

impl FromStr for UnknownFieldPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(UnknownFieldPolicy::Allow),
            "ignore" => Ok(UnknownFieldPolicy::Ignore),
            "forbid" => Ok(UnknownFieldPolicy::Forbid),
            other => Err(format!("expected allow, ignore or forbid, got '{}'", other)),
        }
    }
}

/// How far values may be converted to the declared type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionMode {
    /// Accept numeric strings, booleans for numbers, whole floats for integers,
    /// 0/1 and yes/no for booleans
    #[default]
    Lax,
    /// Accept only the exact JSON type
    Strict,
}

impl FromStr for CoercionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lax" => Ok(CoercionMode::Lax),
            "strict" => Ok(CoercionMode::Strict),
            other => Err(format!("expected lax or strict, got '{}'", other)),
        }
    }
}

/// Knobs applied to every `validate` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationOptions {
    pub unknown_fields: UnknownFieldPolicy,
    pub coercion: CoercionMode,
}

/// Convert `value` to `field_type`, returning the reason on failure
pub(crate) fn coerce(
    field_type: FieldType,
    value: &Value,
    mode: CoercionMode,
) -> Result<Value, String> {
    match field_type {
        FieldType::Text => coerce_text(value),
        FieldType::Integer => coerce_integer(value, mode),
        FieldType::Decimal => coerce_decimal(value, mode),
        FieldType::Boolean => coerce_boolean(value, mode),
        FieldType::Email => coerce_email(value),
    }
}

fn coerce_text(value: &Value) -> Result<Value, String> {
    match value {
        Value::String(_) => Ok(value.clone()),
        other => Err(type_mismatch("string", other)),
    }
}

fn coerce_integer(value: &Value, mode: CoercionMode) -> Result<Value, String> {
    match (value, mode) {
        (Value::Number(n), _) if n.is_i64() || n.is_u64() => Ok(value.clone()),
        (Value::Number(n), CoercionMode::Lax) => {
            let f = n.as_f64().unwrap_or(f64::NAN);
            if !f.is_finite() || f.fract() != 0.0 {
                Err("expected integer, got a number with a fractional part".to_string())
            } else if f.abs() >= i64::MAX as f64 {
                Err(format!("integer out of range: {}", n))
            } else {
                Ok(Value::from(f as i64))
            }
        }
        (Value::Bool(b), CoercionMode::Lax) => Ok(Value::from(i64::from(*b))),
        (Value::String(s), CoercionMode::Lax) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| format!("unable to parse '{}' as an integer", s)),
        (other, _) => Err(type_mismatch("integer", other)),
    }
}

fn coerce_decimal(value: &Value, mode: CoercionMode) -> Result<Value, String> {
    let parsed = match (value, mode) {
        (Value::Number(n), _) => n.as_f64(),
        (Value::Bool(b), CoercionMode::Lax) => Some(if *b { 1.0 } else { 0.0 }),
        (Value::String(s), CoercionMode::Lax) => Some(
            s.trim()
                .parse::<f64>()
                .map_err(|_| format!("unable to parse '{}' as a number", s))?,
        ),
        (other, _) => return Err(type_mismatch("number", other)),
    };

    parsed
        .filter(|f| f.is_finite())
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| "expected a finite number".to_string())
}

fn coerce_boolean(value: &Value, mode: CoercionMode) -> Result<Value, String> {
    match (value, mode) {
        (Value::Bool(_), _) => Ok(value.clone()),
        (Value::Number(n), CoercionMode::Lax) => match n.as_f64() {
            Some(f) if f == 0.0 => Ok(Value::Bool(false)),
            Some(f) if f == 1.0 => Ok(Value::Bool(true)),
            _ => Err(format!("unable to interpret {} as a boolean", n)),
        },
        (Value::String(s), CoercionMode::Lax) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "on" | "1" => Ok(Value::Bool(true)),
            "false" | "f" | "no" | "n" | "off" | "0" => Ok(Value::Bool(false)),
            _ => Err(format!("unable to interpret '{}' as a boolean", s)),
        },
        (other, _) => Err(type_mismatch("boolean", other)),
    }
}

fn coerce_email(value: &Value) -> Result<Value, String> {
    let raw = value
        .as_str()
        .ok_or_else(|| type_mismatch("string", value))?;
    let address = raw.trim();

    check_email(address)
        .map(|_| Value::String(address.to_string()))
        .map_err(|detail| format!("value is not a valid email address: {}", detail))
}

/// Check the shape of an email address, returning what is wrong with it
pub fn check_email(address: &str) -> Result<(), &'static str> {
    if address.len() > EMAIL_MAX_LEN {
        return Err("the address is too long");
    }

    let (local, domain) = address
        .split_once('@')
        .ok_or("an email address must have an @-sign")?;

    if domain.contains('@') {
        return Err("an email address may contain only one @-sign");
    }
    if local.is_empty() {
        return Err("there must be something before the @-sign");
    }
    if domain.is_empty() {
        return Err("there must be something after the @-sign");
    }
    if local.len() > EMAIL_LOCAL_MAX_LEN {
        return Err("the part before the @-sign is too long");
    }
    if !EMAIL_LOCAL_PART.is_match(local) {
        return Err("the part before the @-sign contains invalid characters");
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return Err("the part before the @-sign has a misplaced period");
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return Err("the part after the @-sign is not valid; it should have a period");
    }
    if !labels.iter().all(|label| EMAIL_DOMAIN_LABEL.is_match(label)) {
        return Err("the part after the @-sign is not a valid domain name");
    }
    if labels
        .last()
        .is_some_and(|tld| tld.chars().all(|c| c.is_ascii_digit()))
    {
        return Err("the part after the @-sign is not valid; it cannot end in a number");
    }

    let domain = domain.to_ascii_lowercase();
    if SPECIAL_USE_DOMAINS
        .iter()
        .any(|special| domain == *special || domain.ends_with(&format!(".{}", special)))
    {
        return Err("the part after the @-sign is a special-use or reserved name");
    }

    Ok(())
}

fn type_mismatch(expected: &str, actual: &Value) -> String {
    format!("expected {}, got {}", expected, json_type_name(actual))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
