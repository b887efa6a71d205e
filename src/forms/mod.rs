//! Declarative form validation for data entered by users.
//!
//! A [`FormDescriptor`] lists fields with their [`Validator`]s. Validating a
//! set of raw values checks every field and either returns the normalized
//! values or a [`FormErrors`] describing each failing field.

pub mod payment;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::dates::parse_iso_date;

pub use payment::{payment_form, PaymentFormData, PaymentFormInput};

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// A failing field together with its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every field that failed validation, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message for `field`, if it failed.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for FormErrors {}

type ValidatorCallback = dyn Fn(&str) -> Result<String, String> + Send + Sync;

/// Field validators. Each returns the value to keep for the field.
#[derive(Clone)]
pub enum Validator {
    /// Accepts anything the lenient date parser reads and keeps the input as
    /// typed; otherwise fails with `message`.
    Date { message: &'static str },
    Custom(Arc<ValidatorCallback>),
}

impl Validator {
    pub fn custom<F>(func: F) -> Self
    where
        F: Fn(&str) -> Result<String, String> + Send + Sync + 'static,
    {
        Validator::Custom(Arc::new(func))
    }

    pub fn validate(&self, input: &str) -> Result<String, ValidationError> {
        match self {
            Validator::Date { message } => match parse_iso_date(input) {
                Some(_) => Ok(input.to_string()),
                None => Err(ValidationError::new(*message)),
            },
            Validator::Custom(func) => func(input).map_err(ValidationError::new),
        }
    }
}

/// Declarative description of a single form field.
#[derive(Clone)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub validator: Validator,
}

impl FieldDescriptor {
    pub fn new(key: &'static str, label: &'static str, validator: Validator) -> Self {
        Self {
            key,
            label,
            required: true,
            validator,
        }
    }

    /// Optional fields accept blank input as "no value" without validating it.
    pub fn with_optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// A full form: its name and ordered fields.
pub struct FormDescriptor {
    pub name: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl FormDescriptor {
    pub fn new(name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { name, fields }
    }

    /// Runs every field's validator. Missing values are validated as empty
    /// strings; blank optional fields normalize to an empty string.
    pub fn validate(
        &self,
        values: &BTreeMap<&'static str, String>,
    ) -> Result<BTreeMap<&'static str, String>, FormErrors> {
        let mut normalized = BTreeMap::new();
        let mut errors = FormErrors::default();
        for field in &self.fields {
            let raw = values.get(field.key).map(String::as_str).unwrap_or("");
            if !field.required && raw.trim().is_empty() {
                normalized.insert(field.key, String::new());
                continue;
            }
            match field.validator.validate(raw) {
                Ok(value) => {
                    normalized.insert(field.key, value);
                }
                Err(err) => errors.errors.push(FieldError {
                    field: field.key,
                    message: err.message,
                }),
            }
        }
        if errors.is_empty() {
            Ok(normalized)
        } else {
            tracing::debug!(form = self.name, failures = errors.errors.len(), "Form rejected");
            Err(errors)
        }
    }
}

/// Leading-integer parse: optional whitespace and sign, then digits. Trailing
/// text is ignored (`"12abc"` reads as 12).
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['+', '-']));
    let digits = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    trimmed[..sign_len + digits].parse().ok()
}

/// Leading-decimal parse: sign, digits with an optional fraction and
/// exponent. Trailing text is ignored (`"12.5kg"` reads as 12.5).
pub fn parse_leading_float(input: &str) -> Option<f64> {
    let trimmed = input.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = usize::from(trimmed.starts_with(['+', '-']));
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }
    trimmed[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
