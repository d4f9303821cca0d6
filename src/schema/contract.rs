//! Structural contract for schema documents.
//!
//! The walk runs over raw `serde_json::Value` rather than typed structs so that
//! every problem in the document is reported, not just the first one serde
//! would trip over. Checks:
//! - root is an object with non-empty `formTitle` / `formDescription`
//! - `fields` is a non-empty array of objects
//! - each field: non-empty unique `id` (not `submittedAt`), known `type`, non-empty `label`,
//!   boolean `required`, string `placeholder` (optional)
//! - `validation` (optional): non-empty `pattern` that compiles, non-empty `message`
//! - `options` (optional): non-empty array of non-empty `{value, label}` pairs
//!
//! Unknown keys are ignored.

use crate::schema::types::FieldKind;
use crate::schema::violation::{Path, Violation};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const REQUIRED: &str = "Required";
pub const EMPTY_STRING: &str = "String must contain at least 1 character(s)";
pub const EMPTY_ARRAY: &str = "Array must contain at least 1 element(s)";

/// Key holding the timestamp in a serialized submission; no field may use it.
pub const SUBMITTED_AT_KEY: &str = "submittedAt";

/// Check a parsed document and return every violation, in document order.
pub fn check(root: &Value) -> Vec<Violation> {
    let mut c = Checker::default();
    c.document(root);
    c.violations
}

#[derive(Default)]
struct Checker {
    violations: Vec<Violation>,
}

impl Checker {
    fn fail(&mut self, path: &Path, message: impl Into<String>) {
        self.violations.push(Violation::at(path, message));
    }

    fn document(&mut self, root: &Value) {
        let Some(obj) = root.as_object() else {
            self.fail(&Path::root(), type_mismatch("object", root));
            return;
        };
        let path = Path::root();
        self.non_empty_string(obj, "formTitle", &path);
        self.non_empty_string(obj, "formDescription", &path);

        let fields_path = path.key("fields");
        let Some(fields) = self.array(obj, "fields", &path) else {
            return;
        };
        if fields.is_empty() {
            self.fail(&fields_path, EMPTY_ARRAY);
            return;
        }

        // id -> index of first occurrence
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for (i, field) in fields.iter().enumerate() {
            let field_path = fields_path.index(i);
            let Some(id) = self.field(field, &field_path) else {
                continue;
            };
            if id == SUBMITTED_AT_KEY {
                self.fail(
                    &field_path.key("id"),
                    format!("Field id '{}' is reserved for the submission timestamp", id),
                );
                continue;
            }
            if let Some(first) = seen.get(id) {
                self.fail(
                    &field_path.key("id"),
                    format!("Duplicate field id '{}' (first used by fields -> {})", id, first),
                );
            } else {
                seen.insert(id, i);
            }
        }
    }

    /// Check one field; returns its id when it is a non-empty string.
    fn field<'v>(&mut self, field: &'v Value, path: &Path) -> Option<&'v str> {
        let Some(obj) = field.as_object() else {
            self.fail(path, type_mismatch("object", field));
            return None;
        };

        let id = self.non_empty_string(obj, "id", path);
        self.kind(obj, path);
        self.non_empty_string(obj, "label", path);
        self.boolean(obj, "required", path);
        self.optional_string(obj, "placeholder", path);

        if let Some(rule) = present(obj, "validation") {
            self.rule(rule, &path.key("validation"));
        }
        if let Some(options) = present(obj, "options") {
            self.options(options, &path.key("options"));
        }

        id
    }

    fn kind(&mut self, obj: &Map<String, Value>, path: &Path) {
        let Some(kind) = self.string(obj, "type", path) else {
            return;
        };
        if FieldKind::parse(kind).is_none() {
            let expected = FieldKind::ALL
                .iter()
                .map(|k| format!("'{}'", k))
                .collect::<Vec<_>>()
                .join(" | ");
            self.fail(
                &path.key("type"),
                format!("Invalid field type '{}'. Expected {}", kind, expected),
            );
        }
    }

    fn rule(&mut self, rule: &Value, path: &Path) {
        let Some(obj) = rule.as_object() else {
            self.fail(path, type_mismatch("object", rule));
            return;
        };
        if let Some(pattern) = self.non_empty_string(obj, "pattern", path) {
            if let Err(err) = Regex::new(pattern) {
                self.fail(
                    &path.key("pattern"),
                    format!("Invalid regular expression: {}", regex_summary(&err)),
                );
            }
        }
        self.non_empty_string(obj, "message", path);
    }

    fn options(&mut self, options: &Value, path: &Path) {
        let Some(items) = options.as_array() else {
            self.fail(path, type_mismatch("array", options));
            return;
        };
        if items.is_empty() {
            self.fail(path, EMPTY_ARRAY);
            return;
        }
        for (i, item) in items.iter().enumerate() {
            let item_path = path.index(i);
            let Some(obj) = item.as_object() else {
                self.fail(&item_path, type_mismatch("object", item));
                continue;
            };
            self.non_empty_string(obj, "value", &item_path);
            self.non_empty_string(obj, "label", &item_path);
        }
    }

    fn string<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        key: &str,
        path: &Path,
    ) -> Option<&'v str> {
        match obj.get(key) {
            None => {
                self.fail(&path.key(key), REQUIRED);
                None
            }
            Some(Value::String(s)) => Some(s.as_str()),
            Some(other) => {
                self.fail(&path.key(key), type_mismatch("string", other));
                None
            }
        }
    }

    fn non_empty_string<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        key: &str,
        path: &Path,
    ) -> Option<&'v str> {
        let s = self.string(obj, key, path)?;
        if s.is_empty() {
            self.fail(&path.key(key), EMPTY_STRING);
            return None;
        }
        Some(s)
    }

    fn optional_string(&mut self, obj: &Map<String, Value>, key: &str, path: &Path) {
        if let Some(v) = present(obj, key) {
            if !v.is_string() {
                self.fail(&path.key(key), type_mismatch("string", v));
            }
        }
    }

    fn boolean(&mut self, obj: &Map<String, Value>, key: &str, path: &Path) {
        match obj.get(key) {
            None => self.fail(&path.key(key), REQUIRED),
            Some(Value::Bool(_)) => {}
            Some(other) => self.fail(&path.key(key), type_mismatch("boolean", other)),
        }
    }

    fn array<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        key: &str,
        path: &Path,
    ) -> Option<&'v Vec<Value>> {
        match obj.get(key) {
            None => {
                self.fail(&path.key(key), REQUIRED);
                None
            }
            Some(Value::Array(items)) => Some(items),
            Some(other) => {
                self.fail(&path.key(key), type_mismatch("array", other));
                None
            }
        }
    }
}

/// Optional keys: absent and `null` both mean "not given".
fn present<'v>(obj: &'v Map<String, Value>, key: &str) -> Option<&'v Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn type_mismatch(expected: &str, got: &Value) -> String {
    format!("Expected {}, received {}", expected, json_type_name(got))
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// regex errors render as a multi-line diagram; keep the last line.
fn regex_summary(err: &regex::Error) -> String {
    let text = err.to_string();
    text.lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("unparseable pattern")
        .trim_start_matches("error: ")
        .to_string()
}
