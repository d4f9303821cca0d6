//! Schema layer: the form description contract and its validator.
//!
//! This module is separate from form state and rendering. It owns:
//! - the document types (`SchemaDocument`, `FieldDescriptor`, ...)
//! - the structural contract walk over raw JSON
//! - violations (path + message) and `validate`

pub mod contract;
pub mod types;
pub mod validate;
pub mod violation;

pub use types::{ChoiceOption, FieldDescriptor, FieldKind, SchemaDocument, ValidationRule};
pub use validate::validate;
pub use violation::{Path, Violation, ViolationList};
