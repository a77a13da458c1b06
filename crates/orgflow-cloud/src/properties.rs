//! Typed access to resource properties
//!
//! The driver stringifies template values, so numbers may arrive either as
//! JSON numbers or as numeric strings. Both are accepted.

use crate::error::{ProvisionError, Result};
use crate::lifecycle::Properties;
use serde_json::Value;

/// Read-only view over a property map that reports missing or malformed
/// values as terminal errors
pub struct PropertyReader<'a> {
    props: &'a Properties,
}

impl<'a> PropertyReader<'a> {
    pub fn new(props: &'a Properties) -> Self {
        Self { props }
    }

    /// A non-blank string property
    pub fn required_str(&self, key: &str) -> Result<&'a str> {
        match self.props.get(key) {
            None | Some(Value::Null) => Err(ProvisionError::MissingProperty(key.to_string())),
            Some(Value::String(s)) if s.trim().is_empty() => Err(
                ProvisionError::InvalidProperties(format!("{} must not be empty", key)),
            ),
            Some(Value::String(s)) => Ok(s.trim()),
            Some(other) => Err(ProvisionError::InvalidProperties(format!(
                "{} must be a string, got {}",
                key, other
            ))),
        }
    }

    /// A non-empty list of non-blank strings
    pub fn string_list(&self, key: &str) -> Result<Vec<String>> {
        let items = match self.props.get(key) {
            None | Some(Value::Null) => {
                return Err(ProvisionError::MissingProperty(key.to_string()));
            }
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(ProvisionError::InvalidProperties(format!(
                    "{} must be a list of strings, got {}",
                    key, other
                )));
            }
        };

        if items.is_empty() {
            return Err(ProvisionError::InvalidProperties(format!(
                "{} must not be empty",
                key
            )));
        }

        items
            .iter()
            .map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
                other => Err(ProvisionError::InvalidProperties(format!(
                    "{} contains an invalid entry: {}",
                    key, other
                ))),
            })
            .collect()
    }

    /// An optional non-negative integer (JSON number or numeric string)
    pub fn optional_u64(&self, key: &str) -> Result<Option<u64>> {
        match self.props.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| {
                ProvisionError::InvalidProperties(format!(
                    "{} must be a non-negative integer, got {}",
                    key, n
                ))
            }),
            Some(Value::String(s)) => s.trim().parse::<u64>().map(Some).map_err(|_| {
                ProvisionError::InvalidProperties(format!(
                    "{} must be a non-negative integer, got {:?}",
                    key, s
                ))
            }),
            Some(other) => Err(ProvisionError::InvalidProperties(format!(
                "{} must be a non-negative integer, got {}",
                key, other
            ))),
        }
    }

    /// An optional duration in seconds: a number, or a string such as
    /// `"30"`, `"30s"`, `"5m"` or `"1h"`
    pub fn optional_duration_secs(&self, key: &str) -> Result<Option<u64>> {
        match self.props.get(key) {
            Some(Value::String(s)) => parse_duration_secs(s).map(Some).ok_or_else(|| {
                ProvisionError::InvalidProperties(format!("{} is not a valid duration: {:?}", key, s))
            }),
            _ => self.optional_u64(key),
        }
    }
}

fn parse_duration_secs(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    let (digits, multiplier) = match raw.char_indices().last()? {
        (i, 's') => (&raw[..i], 1),
        (i, 'm') => (&raw[..i], 60),
        (i, 'h') => (&raw[..i], 3600),
        _ => (raw, 1),
    };
    digits.trim().parse::<u64>().ok()?.checked_mul(multiplier)
}

/// Minimal shape check for an email address: one `@`, a non-empty local part
/// and a dotted domain
pub fn validate_email(email: &str) -> Result<()> {
    let invalid = || ProvisionError::InvalidProperties(format!("invalid email address: {}", email));

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(invalid());
    }
    Ok(())
}
