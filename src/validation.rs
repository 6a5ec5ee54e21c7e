use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::error::ApiError;

static EMAIL_REGEX: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok());

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 255 && EMAIL_REGEX.as_ref().is_some_and(|re| re.is_match(email))
}

/// Collects per-field messages; the first message recorded for a field wins.
#[derive(Debug, Default)]
pub struct FieldErrors {
    order: Vec<String>,
    errors: HashMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        if !self.errors.contains_key(field) {
            self.order.push(field.to_string());
            self.errors.insert(field.to_string(), message.into());
        }
    }

    /// Records `message` when `value` is missing or blank; returns the trimmed value.
    pub fn required<'a>(&mut self, field: &str, value: Option<&'a str>, message: &str) -> Option<&'a str> {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Some(v),
            _ => {
                self.add(field, message);
                None
            }
        }
    }

    /// Records `message` unless `value` is one of `allowed`.
    pub fn one_of(&mut self, field: &str, value: &str, allowed: &[&str], message: &str) {
        if !allowed.contains(&value) {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Ok when nothing was recorded, otherwise a validation error listing every message.
    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let message = self
            .order
            .iter()
            .filter_map(|f| self.errors.get(f).cloned())
            .collect::<Vec<_>>()
            .join(", ");
        Err(ApiError::validation_error(message, Some(self.errors)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("first.last+jobs@mail.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("ada@"));
        assert!(!is_valid_email("ada example.com"));
        assert!(!is_valid_email("ada@example"));
    }

    #[test]
    fn joins_messages_in_insertion_order() {
        let mut errors = FieldErrors::new();
        errors.required("title", None, "Please enter job title.");
        errors.required("company", Some("  "), "Please enter company name.");
        errors.add("title", "ignored");

        let err = errors.finish().unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Please enter job title., Please enter company name.");
    }

    #[test]
    fn required_returns_trimmed_value() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.required("name", Some(" Ada "), "Please enter name."), Some("Ada"));
        assert!(errors.is_empty());
        assert!(errors.finish().is_ok());
    }
}
