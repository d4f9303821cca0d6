use crate::schema::contract;
use crate::schema::types::SchemaDocument;
use crate::schema::violation::{Violation, ViolationList};
use serde_json::Value;

/// Parse editor text and check it against the contract.
///
/// - malformed JSON: exactly one violation carrying the parser message
/// - contract failures: every violation found, in document order
///
/// Pure; callers re-run it on every edit.
pub fn validate(raw: &str) -> Result<SchemaDocument, ViolationList> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ViolationList::single(Violation::document(e.to_string())))?;

    let violations = contract::check(&value);
    if !violations.is_empty() {
        return Err(ViolationList::from(violations));
    }

    // The contract walk covers everything serde needs, so this only fails if
    // the two drift apart.
    serde_json::from_value(value).map_err(|e| {
        ViolationList::single(Violation::document(format!(
            "document does not match the schema contract: {}",
            e
        )))
    })
}
