//! Schema document types.
//!
//! JSON shape:
//! {
//!   "formTitle": "Contact us",
//!   "formDescription": "We usually answer within a day.",
//!   "fields": [
//!     {
//!       "id": "email",
//!       "type": "email",                 // text | email | select | radio | textarea | checkbox
//!       "label": "Email",
//!       "required": true,
//!       "placeholder": "you@example.com", // optional
//!       "validation": { "pattern": "^...$", "message": "..." }, // optional
//!       "options": [{ "value": "us", "label": "United States" }] // select / radio
//!     }
//!   ]
//! }
//!
//! These types are only ever built from text that already passed the contract
//! walk, so serde sees well-formed input.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    pub form_title: String,
    pub form_description: String,
    /// Display order.
    pub fields: Vec<FieldDescriptor>,
}

impl SchemaDocument {
    pub fn field(&self, id: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Pretty-printed serialization with optional keys omitted.
    pub fn to_canonical_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: FieldKind,

    pub label: String,

    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRule>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<ChoiceOption>>,
}

impl FieldDescriptor {
    /// Choice set for select/radio. Missing `options` is an empty set.
    pub fn options(&self) -> &[ChoiceOption] {
        self.options.as_deref().unwrap_or(&[])
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options().iter().any(|o| o.value == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    pub pattern: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Select,
    Radio,
    Textarea,
    Checkbox,
}

impl FieldKind {
    pub const ALL: [FieldKind; 6] = [
        FieldKind::Text,
        FieldKind::Email,
        FieldKind::Select,
        FieldKind::Radio,
        FieldKind::Textarea,
        FieldKind::Checkbox,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Select => "select",
            FieldKind::Radio => "radio",
            FieldKind::Textarea => "textarea",
            FieldKind::Checkbox => "checkbox",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// Checkbox values are booleans; every other kind holds a string.
    pub fn is_boolean(self) -> bool {
        matches!(self, FieldKind::Checkbox)
    }

    /// Kinds whose rule is checked on every change rather than only on submit.
    pub fn validates_eagerly(self) -> bool {
        matches!(self, FieldKind::Email)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
