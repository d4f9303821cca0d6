//! Library error type.
//!
//! Schema problems are not errors here: they are data (`ViolationList`) that the
//! session shows to the user. `FormError` covers the things that can go wrong
//! around them: I/O, JSON encoding, bad patterns, the export sink and theme store.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A validation pattern that does not compile. The contract rejects these,
    /// so this only shows up for documents built by hand.
    #[error("invalid pattern for field '{field}': {source}")]
    Pattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("export failed: {0}")]
    Export(String),

    #[error("unknown theme '{0}' (expected \"light\" or \"dark\")")]
    Theme(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// A field event arrived while the schema text does not pass the contract,
    /// so there is no form to edit.
    #[error("cannot change field '{0}': the schema is invalid, fix it first")]
    NoForm(String),

    /// Input that the field's control cannot accept (a toggle sent to a text
    /// input, a choice outside the option list).
    #[error("field '{field}' cannot accept {input}")]
    Input { field: String, input: String },

    #[error("event script line {line}: {source}")]
    Script {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pattern_error_names_the_field() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = FormError::Pattern {
            field: "zip".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("invalid pattern for field 'zip':"));
    }

    #[test]
    fn theme_error_display() {
        let err = FormError::Theme("blue".to_string());
        assert_eq!(
            err.to_string(),
            "unknown theme 'blue' (expected \"light\" or \"dark\")"
        );
    }
}
