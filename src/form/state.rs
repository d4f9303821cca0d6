//! Transient per-session values and error messages, keyed by field id.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current value of one control. Checkboxes hold booleans, everything else text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Text(_) => None,
        }
    }

    /// Empty text or an unchecked box.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Bool(b) => !b,
        }
    }
}

/// Field id -> current value. Fields the user never touched are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState(BTreeMap<String, FieldValue>);

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&FieldValue> {
        self.0.get(id)
    }

    /// Text value, or "" when absent or boolean.
    pub fn text(&self, id: &str) -> &str {
        self.get(id).and_then(FieldValue::as_text).unwrap_or("")
    }

    /// Checkbox value, or false when absent.
    pub fn checked(&self, id: &str) -> bool {
        self.get(id).and_then(FieldValue::as_bool).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    // Writes go through `Session::on_field_change` only.
    pub(crate) fn set(&mut self, id: &str, value: FieldValue) {
        self.0.insert(id.to_string(), value);
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

/// Field id -> message currently shown under the control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str).filter(|m| !m.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set or clear one field's message. An empty message clears it.
    pub(crate) fn set(&mut self, id: &str, message: &str) {
        if message.is_empty() {
            self.0.remove(id);
        } else {
            self.0.insert(id.to_string(), message.to_string());
        }
    }

    /// Replace every message at once; fields not in `errors` are cleared.
    pub(crate) fn replace(&mut self, errors: BTreeMap<String, String>) {
        self.0 = errors;
        self.0.retain(|_, m| !m.is_empty());
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}
