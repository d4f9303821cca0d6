//! Per-field pattern check.

use crate::error::{FormError, Result};
use crate::schema::FieldDescriptor;
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    /// Empty when valid; the rule's message verbatim otherwise.
    pub message: String,
}

impl ValidationOutcome {
    pub fn valid() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// Test `value` against the field's rule, if it has one.
///
/// Matching is unanchored (`is_match`); authored patterns carry their own
/// `^`/`$`. A pattern that fails to compile is an error, not an outcome.
pub fn check_field(field: &FieldDescriptor, value: &str) -> Result<ValidationOutcome> {
    let Some(rule) = &field.validation else {
        return Ok(ValidationOutcome::valid());
    };

    let re = Regex::new(&rule.pattern).map_err(|source| FormError::Pattern {
        field: field.id.clone(),
        source,
    })?;

    if re.is_match(value) {
        Ok(ValidationOutcome::valid())
    } else {
        Ok(ValidationOutcome::invalid(rule.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, ValidationRule};
    use pretty_assertions::assert_eq;

    const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
    const EMAIL_MESSAGE: &str = "Please enter a valid email address";

    fn field(validation: Option<ValidationRule>) -> FieldDescriptor {
        FieldDescriptor {
            id: "email".to_string(),
            kind: FieldKind::Email,
            label: "Email".to_string(),
            required: true,
            placeholder: None,
            validation,
            options: None,
        }
    }

    fn email_rule() -> Option<ValidationRule> {
        Some(ValidationRule {
            pattern: EMAIL_PATTERN.to_string(),
            message: EMAIL_MESSAGE.to_string(),
        })
    }

    #[test]
    fn no_rule_accepts_anything() {
        let f = field(None);
        for v in ["", "anything", "  "] {
            assert_eq!(check_field(&f, v).unwrap(), ValidationOutcome::valid());
        }
    }

    #[test]
    fn email_rule_rejects_with_configured_message() {
        let f = field(email_rule());
        assert_eq!(
            check_field(&f, "bad").unwrap(),
            ValidationOutcome::invalid(EMAIL_MESSAGE)
        );
        assert_eq!(check_field(&f, "a@b.co").unwrap(), ValidationOutcome::valid());
        assert!(!check_field(&f, "a b@c.de").unwrap().valid);
    }

    #[test]
    fn matching_is_unanchored() {
        let f = field(Some(ValidationRule {
            pattern: r"\d{5}".to_string(),
            message: "needs a zip".to_string(),
        }));
        assert!(check_field(&f, "zip 12345 here").unwrap().valid);
        assert!(!check_field(&f, "1234").unwrap().valid);
    }

    #[test]
    fn broken_pattern_is_an_error() {
        let f = field(Some(ValidationRule {
            pattern: "(".to_string(),
            message: "m".to_string(),
        }));
        let err = check_field(&f, "x").unwrap_err();
        assert!(matches!(err, FormError::Pattern { ref field, .. } if field == "email"));
    }
}
