//! Submission aggregation: re-check every rule-bearing field, then append a
//! timestamped snapshot of the form to the session's submission log.

use crate::error::Result;
use crate::form::check::check_field;
use crate::form::state::FormState;
use crate::schema::contract::SUBMITTED_AT_KEY;
use crate::schema::{FieldKind, SchemaDocument};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

pub const INVALID_SCHEMA_MESSAGE: &str =
    "Please fix the schema errors before submitting the form.";

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub fn iso_millis(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// One accepted snapshot: the form values plus `submittedAt`.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub values: FormState,
    pub submitted_at: DateTime<Utc>,
}

/// One flat map. The timestamp wins over a field that shares its key, so
/// the key is never written twice.
impl Serialize for Submission {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = s.serialize_map(None)?;
        for (id, value) in self.values.iter().filter(|(id, _)| *id != SUBMITTED_AT_KEY) {
            map.serialize_entry(id, value)?;
        }
        map.serialize_entry(SUBMITTED_AT_KEY, &iso_millis(&self.submitted_at))?;
        map.end()
    }
}

/// Append-only, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SubmissionLog(Vec<Submission>);

impl SubmissionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Submission] {
        &self.0
    }

    pub fn last(&self) -> Option<&Submission> {
        self.0.last()
    }

    /// Pretty-printed JSON array, as written by the submissions download.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn append(&mut self, submission: Submission) {
        self.0.push(submission);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The editor text is not a valid schema; nothing was touched.
    Blocked { message: String },
    /// Required fields are empty. This mirrors the browser's own constraint
    /// check, which stops the submit before any pattern runs.
    MissingRequired { fields: Vec<String> },
    /// Pattern failures by field id.
    Rejected { errors: BTreeMap<String, String> },
    /// Appended at index `index` of the log.
    Accepted { index: usize },
}

impl SubmitOutcome {
    pub fn accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }

    /// Pattern failures; empty for every outcome except `Rejected`.
    pub fn errors(&self) -> BTreeMap<String, String> {
        match self {
            SubmitOutcome::Rejected { errors } => errors.clone(),
            _ => BTreeMap::new(),
        }
    }
}

/// Ids of required fields left blank, in display order. A required checkbox
/// must be checked. A radio group with no options has nothing to pick, so
/// it never blocks.
pub fn missing_required(document: &SchemaDocument, state: &FormState) -> Vec<String> {
    document
        .fields
        .iter()
        .filter(|f| f.required)
        .filter(|f| !(f.kind == FieldKind::Radio && f.options().is_empty()))
        .filter(|f| state.get(&f.id).map(|v| v.is_blank()).unwrap_or(true))
        .map(|f| f.id.clone())
        .collect()
}

/// Run a submit against the current document.
///
/// Only fields that carry a rule and hold a non-empty text value are checked:
/// an empty required field is the required gate's business, not a pattern
/// mismatch. On success the snapshot is appended; clearing the form and
/// showing the notice are left to the session.
pub fn submit(
    document: Option<&SchemaDocument>,
    state: &FormState,
    log: &mut SubmissionLog,
    now: DateTime<Utc>,
) -> Result<SubmitOutcome> {
    let Some(document) = document else {
        return Ok(SubmitOutcome::Blocked {
            message: INVALID_SCHEMA_MESSAGE.to_string(),
        });
    };

    let missing = missing_required(document, state);
    if !missing.is_empty() {
        return Ok(SubmitOutcome::MissingRequired { fields: missing });
    }

    let mut errors = BTreeMap::new();
    for field in document.fields.iter().filter(|f| f.validation.is_some()) {
        // Checkbox values are booleans and never pattern-checked.
        if field.kind == FieldKind::Checkbox {
            continue;
        }
        let value = state.text(&field.id);
        if value.is_empty() {
            continue;
        }
        let outcome = check_field(field, value)?;
        if !outcome.valid {
            errors.insert(field.id.clone(), outcome.message);
        }
    }

    if !errors.is_empty() {
        return Ok(SubmitOutcome::Rejected { errors });
    }

    log.append(Submission {
        values: state.clone(),
        submitted_at: now,
    });
    Ok(SubmitOutcome::Accepted { index: log.len() - 1 })
}
