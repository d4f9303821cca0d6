//! Form layer: live values, per-field checks and submission.
//!
//! Everything here works on a validated `SchemaDocument`; nothing in this
//! module parses schema text.

pub mod check;
pub mod state;
pub mod submit;

pub use check::{ValidationOutcome, check_field};
pub use state::{FieldErrors, FieldValue, FormState};
pub use submit::{Submission, SubmissionLog, SubmitOutcome, iso_millis, missing_required, submit};
