//! Schema-driven forms.
//!
//! A form is described by a JSON schema document (title, description, typed
//! fields with optional pattern rules and choices). This crate validates that
//! document, renders it into controls, checks field values and collects
//! submissions inside a single-owner `Session`.

pub mod config;
pub mod error;
pub mod export;
pub mod form;
pub mod render;
pub mod schema;
pub mod session;
pub mod theme;

pub use config::Config;
pub use error::{FormError, Result};
pub use schema::{SchemaDocument, ViolationList, validate};
pub use session::{Event, Reaction, Session};

/// Contact form used by `schemaform sample` and as a starting document.
pub const SAMPLE_SCHEMA: &str = include_str!("../demos/contact.json");
