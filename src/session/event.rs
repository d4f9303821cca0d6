//! User events, the session's reactions to them, and event scripts.
//!
//! Script format: one JSON object per line, blank lines and `#` comments
//! skipped. `after_ms` advances the clock before the event runs.
//!
//! {"event": "edit", "text": "{...}"}
//! {"event": "change", "field": "email", "input": {"text": "a@b.co"}}
//! {"event": "change", "field": "agree", "input": {"checked": true}}
//! {"event": "submit"}
//! {"event": "tick", "after_ms": 3000}

use crate::error::{FormError, Result};
use crate::export::ExportRefusal;
use crate::form::SubmitOutcome;
use crate::render::ControlInput;
use crate::schema::{Violation, ViolationList};
use crate::theme::Theme;
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// Editor text changed.
    Edit { text: String },
    Change { field: String, input: ControlInput },
    Submit,
    /// Time passed; run due timers.
    Tick,
    /// Clear values and errors without submitting.
    Reset,
    CopySchema,
    DownloadSchema,
    DownloadSubmissions,
    ToggleTheme,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScriptStep {
    #[serde(default)]
    pub after_ms: u64,
    #[serde(flatten)]
    pub event: Event,
}

/// Parse a JSON-lines event script.
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let step = serde_json::from_str(line).map_err(|source| FormError::Script {
            line: lineno + 1,
            source,
        })?;
        steps.push(step);
    }
    Ok(steps)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// `reset` is true when the new document replaced a different one and
    /// the form was cleared.
    SchemaAccepted { reset: bool },
    SchemaRejected { violations: ViolationList },
    FieldChanged { field: String, error: Option<String> },
    Submitted(SubmitOutcome),
    Exported { target: String },
    Refused(ExportRefusal),
    NoticeCleared,
    Idle,
    FormReset,
    ThemeChanged(Theme),
    /// Something went wrong while handling the event; shown like a violation.
    Failed(Violation),
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reaction::SchemaAccepted { reset: true } => write!(f, "schema ok (form reset)"),
            Reaction::SchemaAccepted { reset: false } => write!(f, "schema ok"),
            Reaction::SchemaRejected { violations } => {
                write!(f, "schema invalid ({} problem(s))", violations.len())?;
                for v in violations {
                    write!(f, "\n  {}", v)?;
                }
                Ok(())
            }
            Reaction::FieldChanged { field, error: None } => write!(f, "{} updated", field),
            Reaction::FieldChanged {
                field,
                error: Some(e),
            } => write!(f, "{} updated: {}", field, e),
            Reaction::Submitted(outcome) => match outcome {
                SubmitOutcome::Blocked { message } => write!(f, "submit blocked: {}", message),
                SubmitOutcome::MissingRequired { fields } => {
                    write!(f, "submit blocked, required: {}", fields.join(", "))
                }
                SubmitOutcome::Rejected { errors } => {
                    write!(f, "submit rejected")?;
                    for (id, msg) in errors {
                        write!(f, "\n  {}: {}", id, msg)?;
                    }
                    Ok(())
                }
                SubmitOutcome::Accepted { index } => {
                    write!(f, "submission #{} recorded", index + 1)
                }
            },
            Reaction::Exported { target } => write!(f, "exported to {}", target),
            Reaction::Refused(refusal) => write!(f, "refused: {}", refusal),
            Reaction::NoticeCleared => write!(f, "notice cleared"),
            Reaction::Idle => write!(f, "nothing to do"),
            Reaction::FormReset => write!(f, "form reset"),
            Reaction::ThemeChanged(theme) => write!(f, "theme is now {}", theme),
            Reaction::Failed(v) => write!(f, "error: {}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_script_lines() {
        let steps = parse_script(
            r#"
            # fill in and submit
            {"event": "change", "field": "email", "input": {"text": "a@b.co"}}
            {"event": "change", "field": "agree", "input": {"checked": true}}
            {"event": "change", "field": "plan", "input": {"choice": "pro"}}
            {"event": "submit"}
            {"event": "tick", "after_ms": 3000}
            "#,
        )
        .unwrap();
        assert_eq!(
            steps,
            vec![
                ScriptStep {
                    after_ms: 0,
                    event: Event::Change {
                        field: "email".to_string(),
                        input: ControlInput::Text("a@b.co".to_string()),
                    },
                },
                ScriptStep {
                    after_ms: 0,
                    event: Event::Change {
                        field: "agree".to_string(),
                        input: ControlInput::Checked(true),
                    },
                },
                ScriptStep {
                    after_ms: 0,
                    event: Event::Change {
                        field: "plan".to_string(),
                        input: ControlInput::Choice("pro".to_string()),
                    },
                },
                ScriptStep { after_ms: 0, event: Event::Submit },
                ScriptStep { after_ms: 3000, event: Event::Tick },
            ]
        );
    }

    #[test]
    fn bad_line_reports_its_number() {
        let err = parse_script("{\"event\":\"submit\"}\n{\"event\":\"launch\"}\n").unwrap_err();
        assert!(matches!(err, FormError::Script { line: 2, .. }));
    }
}
