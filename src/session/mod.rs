//! The editing session: single owner of everything that changes.
//!
//! A session holds the editor text, the document parsed from it, the live
//! form values and messages, the submission log, the success notice and the
//! theme. Each user event is handled to completion by `Session::handle`,
//! which never returns an error: failures come back as `Reaction::Failed`.

pub mod event;
pub mod timer;

pub use event::{Event, Reaction, ScriptStep, parse_script};
pub use timer::{NoticeTimer, after_millis};

use crate::config::Config;
use crate::error::{FormError, Result};
use crate::export::{
    ExportRefusal, ExportSink, JSON_MIME, SCHEMA_FILENAME, submissions_filename,
};
use crate::form::{
    self, FieldErrors, FieldValue, FormState, SubmissionLog, SubmitOutcome, check_field,
};
use crate::render::{ControlInput, InteractiveControl, PageModel, render};
use crate::schema::{FieldDescriptor, SchemaDocument, Violation, ViolationList, validate};
use crate::theme::{self, Theme, ThemeStore};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

pub const SUCCESS_MESSAGE: &str = "Form submitted successfully!";

pub struct Session {
    config: Config,
    text: String,
    document: std::result::Result<SchemaDocument, ViolationList>,
    /// Last document that validated; decides whether an edit resets the form.
    last_valid: Option<SchemaDocument>,
    values: FormState,
    errors: FieldErrors,
    submissions: SubmissionLog,
    notice: NoticeTimer,
    theme: Theme,
    theme_store: Box<dyn ThemeStore>,
}

impl Session {
    /// Start a session on `text`, reading the persisted theme once.
    pub fn new(config: Config, text: impl Into<String>, theme_store: Box<dyn ThemeStore>) -> Self {
        let text = text.into();
        let document = validate(&text);
        let theme = theme::load_or_default(&*theme_store);
        Self {
            config,
            last_valid: document.as_ref().ok().cloned(),
            text,
            document,
            values: FormState::new(),
            errors: FieldErrors::new(),
            submissions: SubmissionLog::new(),
            notice: NoticeTimer::new(),
            theme,
            theme_store,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn document(&self) -> std::result::Result<&SchemaDocument, &ViolationList> {
        self.document.as_ref()
    }

    pub fn values(&self) -> &FormState {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn submissions(&self) -> &SubmissionLog {
        &self.submissions
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.message()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// One control per field in display order; empty while the schema is invalid.
    pub fn controls(&self) -> Vec<InteractiveControl<'_>> {
        match &self.document {
            Ok(doc) => doc
                .fields
                .iter()
                .map(|f| render(f, self.values.get(&f.id), self.errors.get(&f.id)))
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn page(&self) -> PageModel<'_> {
        PageModel {
            document: self.document(),
            values: &self.values,
            errors: &self.errors,
            notice: self.notice(),
            theme: self.theme,
            submissions: self.submissions.len(),
        }
    }

    /// React to one event at time `now`.
    pub fn handle(
        &mut self,
        event: Event,
        now: DateTime<Utc>,
        sink: &mut dyn ExportSink,
    ) -> Reaction {
        if let Event::Tick = event {
            return if self.notice.fire_due(now) {
                debug!("success notice cleared");
                Reaction::NoticeCleared
            } else {
                Reaction::Idle
            };
        }
        if self.notice.fire_due(now) {
            debug!("success notice cleared");
        }

        let result = match event {
            Event::Edit { text } => Ok(self.edit(text)),
            Event::Change { field, input } => self.change(&field, input),
            Event::Submit => self.submit(now),
            Event::Tick => Ok(Reaction::Idle),
            Event::Reset => Ok(self.reset()),
            Event::CopySchema => self.copy_schema(sink),
            Event::DownloadSchema => self.download_schema(sink),
            Event::DownloadSubmissions => self.download_submissions(now, sink),
            Event::ToggleTheme => self.toggle_theme(),
        };

        result.unwrap_or_else(|err| {
            warn!("event failed: {}", err);
            Reaction::Failed(Violation::document(err.to_string()))
        })
    }

    fn edit(&mut self, text: String) -> Reaction {
        self.text = text;
        self.document = validate(&self.text);
        match &self.document {
            Ok(doc) => {
                let reset = self.last_valid.as_ref() != Some(doc);
                if reset {
                    self.values.clear();
                    self.errors.clear();
                    self.last_valid = Some(doc.clone());
                }
                debug!(fields = doc.fields.len(), reset, "schema accepted");
                Reaction::SchemaAccepted { reset }
            }
            Err(violations) => {
                debug!(count = violations.len(), "schema rejected");
                Reaction::SchemaRejected {
                    violations: violations.clone(),
                }
            }
        }
    }

    fn change(&mut self, id: &str, input: ControlInput) -> Result<Reaction> {
        let Ok(doc) = &self.document else {
            return Err(FormError::NoForm(id.to_string()));
        };
        let field = doc
            .field(id)
            .ok_or_else(|| FormError::UnknownField(id.to_string()))?;

        let control = render(field, self.values.get(id), self.errors.get(id));
        let values = &mut self.values;
        let errors = &mut self.errors;
        let mut checked = Ok(());
        control.handle(input, |field, value| {
            checked = on_field_change(values, errors, field, value);
        })?;
        checked?;

        debug!(field = id, "field changed");
        Ok(Reaction::FieldChanged {
            field: id.to_string(),
            error: self.errors.get(id).map(str::to_string),
        })
    }

    fn submit(&mut self, now: DateTime<Utc>) -> Result<Reaction> {
        let outcome = form::submit(
            self.document.as_ref().ok(),
            &self.values,
            &mut self.submissions,
            now,
        )?;

        match &outcome {
            SubmitOutcome::Blocked { message } => warn!("submit blocked: {}", message),
            SubmitOutcome::MissingRequired { fields } => {
                debug!(missing = ?fields, "submit stopped by required fields")
            }
            SubmitOutcome::Rejected { errors } => {
                debug!(failures = errors.len(), "submit rejected");
                self.errors.replace(errors.clone());
            }
            SubmitOutcome::Accepted { index } => {
                info!(submission = index + 1, "submission recorded");
                self.values.clear();
                self.errors.clear();
                self.notice.show(SUCCESS_MESSAGE, now, self.config.notice_delay());
            }
        }
        Ok(Reaction::Submitted(outcome))
    }

    fn reset(&mut self) -> Reaction {
        self.values.clear();
        self.errors.clear();
        Reaction::FormReset
    }

    fn copy_schema(&mut self, sink: &mut dyn ExportSink) -> Result<Reaction> {
        if self.document.is_err() {
            return Ok(self.refuse(ExportRefusal::InvalidSchema));
        }
        sink.copy_text(&self.text)?;
        info!("schema copied");
        Ok(Reaction::Exported {
            target: "clipboard".to_string(),
        })
    }

    fn download_schema(&mut self, sink: &mut dyn ExportSink) -> Result<Reaction> {
        if self.document.is_err() {
            return Ok(self.refuse(ExportRefusal::InvalidSchema));
        }
        sink.download_file(SCHEMA_FILENAME, &self.text, JSON_MIME)?;
        info!(file = SCHEMA_FILENAME, "schema downloaded");
        Ok(Reaction::Exported {
            target: SCHEMA_FILENAME.to_string(),
        })
    }

    fn download_submissions(
        &mut self,
        now: DateTime<Utc>,
        sink: &mut dyn ExportSink,
    ) -> Result<Reaction> {
        if self.submissions.is_empty() {
            return Ok(self.refuse(ExportRefusal::NoSubmissions));
        }
        let filename = submissions_filename(&now);
        sink.download_file(&filename, &self.submissions.to_pretty_json()?, JSON_MIME)?;
        info!(file = %filename, count = self.submissions.len(), "submissions downloaded");
        Ok(Reaction::Exported { target: filename })
    }

    fn refuse(&self, refusal: ExportRefusal) -> Reaction {
        warn!("{}", refusal);
        Reaction::Refused(refusal)
    }

    fn toggle_theme(&mut self) -> Result<Reaction> {
        let next = self.theme.toggled();
        self.theme_store.save(next)?;
        self.theme = next;
        Ok(Reaction::ThemeChanged(next))
    }
}

/// The one place form values are written. Email fields are checked right
/// away; other kinds wait for submit.
fn on_field_change(
    values: &mut FormState,
    errors: &mut FieldErrors,
    field: &FieldDescriptor,
    value: FieldValue,
) -> Result<()> {
    if field.kind.validates_eagerly() {
        if let Some(text) = value.as_text() {
            let outcome = check_field(field, text)?;
            errors.set(&field.id, &outcome.message);
        }
    }
    values.set(&field.id, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MemorySink;
    use crate::theme::MemoryThemeStore;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    const DOC: &str = r#"{"formTitle":"T","formDescription":"D","fields":[
        {"id":"name","type":"text","label":"Name","required":true},
        {"id":"email","type":"email","label":"Email","required":true,
         "validation":{"pattern":"^[^\\s@]+@[^\\s@]+\\.[^\\s@]+$",
                       "message":"Please enter a valid email address"}},
        {"id":"zip","type":"text","label":"Zip","required":false,
         "validation":{"pattern":"^\\d{5}$","message":"Five digits"}}
    ]}"#;

    fn t(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000 + ms).unwrap()
    }

    fn session(text: &str) -> Session {
        Session::new(Config::default(), text, Box::new(MemoryThemeStore::default()))
    }

    fn type_text(s: &mut Session, field: &str, text: &str, sink: &mut MemorySink) -> Reaction {
        s.handle(
            Event::Change {
                field: field.to_string(),
                input: ControlInput::Text(text.to_string()),
            },
            t(0),
            sink,
        )
    }

    #[test]
    fn email_is_checked_on_every_change() {
        let mut s = session(DOC);
        let mut sink = MemorySink::default();
        assert_eq!(
            type_text(&mut s, "email", "bad", &mut sink),
            Reaction::FieldChanged {
                field: "email".to_string(),
                error: Some("Please enter a valid email address".to_string()),
            }
        );
        type_text(&mut s, "email", "a@b.co", &mut sink);
        assert_eq!(s.errors().get("email"), None);
    }

    #[test]
    fn other_patterns_wait_for_submit() {
        let mut s = session(DOC);
        let mut sink = MemorySink::default();
        type_text(&mut s, "zip", "12", &mut sink);
        assert!(s.errors().is_empty());

        type_text(&mut s, "name", "Ada", &mut sink);
        type_text(&mut s, "email", "a@b.co", &mut sink);
        let r = s.handle(Event::Submit, t(0), &mut sink);
        assert!(matches!(r, Reaction::Submitted(SubmitOutcome::Rejected { .. })));
        assert_eq!(s.errors().get("zip"), Some("Five digits"));
        assert_eq!(s.values().text("zip"), "12");
    }

    #[test]
    fn eager_check_leaves_other_errors_alone() {
        let mut s = session(DOC);
        let mut sink = MemorySink::default();
        type_text(&mut s, "name", "Ada", &mut sink);
        type_text(&mut s, "email", "a@b.co", &mut sink);
        type_text(&mut s, "zip", "1", &mut sink);
        s.handle(Event::Submit, t(0), &mut sink);
        type_text(&mut s, "email", "nope", &mut sink);
        assert_eq!(s.errors().get("zip"), Some("Five digits"));
        assert_eq!(s.errors().len(), 2);
    }

    #[test]
    fn identical_reedit_keeps_values_but_new_schema_resets() {
        let mut s = session(DOC);
        let mut sink = MemorySink::default();
        type_text(&mut s, "name", "Ada", &mut sink);

        let same = format!("{}\n", DOC);
        assert_eq!(
            s.handle(Event::Edit { text: same }, t(0), &mut sink),
            Reaction::SchemaAccepted { reset: false }
        );
        assert_eq!(s.values().text("name"), "Ada");

        let broken = s.handle(Event::Edit { text: "{".to_string() }, t(0), &mut sink);
        assert!(matches!(broken, Reaction::SchemaRejected { .. }));
        assert!(s.controls().is_empty());

        let changed = DOC.replace("\"Name\"", "\"Full name\"");
        assert_eq!(
            s.handle(Event::Edit { text: changed }, t(0), &mut sink),
            Reaction::SchemaAccepted { reset: true }
        );
        assert!(s.values().is_empty());
    }

    #[test]
    fn unknown_field_becomes_a_failed_reaction() {
        let mut s = session(DOC);
        let mut sink = MemorySink::default();
        let r = type_text(&mut s, "nope", "x", &mut sink);
        assert_eq!(r, Reaction::Failed(Violation::document("unknown field 'nope'")));
    }

    #[test]
    fn change_with_invalid_schema_names_the_schema() {
        let mut s = session(DOC);
        let mut sink = MemorySink::default();
        s.handle(Event::Edit { text: "{".to_string() }, t(0), &mut sink);
        let r = type_text(&mut s, "name", "Ada", &mut sink);
        assert_eq!(
            r,
            Reaction::Failed(Violation::document(
                "cannot change field 'name': the schema is invalid, fix it first"
            ))
        );
    }

    #[test]
    fn unbounded_notice_delay_still_accepts() {
        let config = Config {
            notice_delay_ms: u64::MAX,
            ..Config::default()
        };
        let mut s = Session::new(config, DOC, Box::new(MemoryThemeStore::default()));
        let mut sink = MemorySink::default();
        type_text(&mut s, "name", "Ada", &mut sink);
        type_text(&mut s, "email", "a@b.co", &mut sink);
        assert!(matches!(
            s.handle(Event::Submit, t(0), &mut sink),
            Reaction::Submitted(SubmitOutcome::Accepted { .. })
        ));
        assert_eq!(s.handle(Event::Tick, t(1_000_000), &mut sink), Reaction::Idle);
        assert_eq!(s.notice(), Some(SUCCESS_MESSAGE));
    }

    #[test]
    fn success_notice_clears_itself() {
        let mut s = session(DOC);
        let mut sink = MemorySink::default();
        type_text(&mut s, "name", "Ada", &mut sink);
        type_text(&mut s, "email", "a@b.co", &mut sink);
        s.handle(Event::Submit, t(0), &mut sink);
        assert_eq!(s.notice(), Some(SUCCESS_MESSAGE));

        assert_eq!(s.handle(Event::Tick, t(1000), &mut sink), Reaction::Idle);
        assert_eq!(s.handle(Event::Tick, t(3000), &mut sink), Reaction::NoticeCleared);
        assert_eq!(s.notice(), None);
    }

    #[test]
    fn second_submission_keeps_its_own_notice() {
        let mut s = session(DOC);
        let mut sink = MemorySink::default();
        for at in [0, 2000] {
            type_text(&mut s, "name", "Ada", &mut sink);
            type_text(&mut s, "email", "a@b.co", &mut sink);
            assert!(matches!(
                s.handle(Event::Submit, t(at), &mut sink),
                Reaction::Submitted(SubmitOutcome::Accepted { .. })
            ));
        }
        assert_eq!(s.handle(Event::Tick, t(3000), &mut sink), Reaction::Idle);
        assert_eq!(s.notice(), Some(SUCCESS_MESSAGE));
        assert_eq!(s.handle(Event::Tick, t(5000), &mut sink), Reaction::NoticeCleared);
    }

    #[test]
    fn toggle_theme_persists() {
        let mut s = Session::new(
            Config::default(),
            DOC,
            Box::new(MemoryThemeStore {
                value: Some(Theme::Dark),
            }),
        );
        assert_eq!(s.theme(), Theme::Dark);
        let mut sink = MemorySink::default();
        assert_eq!(
            s.handle(Event::ToggleTheme, t(0), &mut sink),
            Reaction::ThemeChanged(Theme::Light)
        );
        assert_eq!(s.theme(), Theme::Light);
    }
}
