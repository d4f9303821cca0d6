//! Export sink: where copied text and downloaded files go.

use crate::error::{FormError, Result};
use crate::form::iso_millis;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

pub const SCHEMA_FILENAME: &str = "schema.json";
pub const CLIPBOARD_FILENAME: &str = "clipboard.txt";
pub const JSON_MIME: &str = "application/json";

pub trait ExportSink {
    fn copy_text(&mut self, text: &str) -> Result<()>;
    fn download_file(&mut self, filename: &str, content: &str, mime_type: &str) -> Result<()>;
}

/// `form-submissions-<ISO-8601>.json`
pub fn submissions_filename(now: &DateTime<Utc>) -> String {
    format!("form-submissions-{}.json", iso_millis(now))
}

/// Why an export was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportRefusal {
    InvalidSchema,
    NoSubmissions,
}

impl ExportRefusal {
    pub fn message(self) -> &'static str {
        match self {
            ExportRefusal::InvalidSchema => {
                "Cannot export an invalid schema. Fix the errors first."
            }
            ExportRefusal::NoSubmissions => "There are no submissions to download yet.",
        }
    }
}

impl std::fmt::Display for ExportRefusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Writes downloads into a directory; copied text goes to `clipboard.txt`
/// there, replacing the previous copy.
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&self, filename: &str, content: &str) -> Result<()> {
        // Filenames come from this crate, but keep them inside `dir` anyway.
        if filename.contains('/') || filename.contains('\\') || filename.starts_with('.') {
            return Err(FormError::Export(format!("refusing file name {:?}", filename)));
        }
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(filename), content)?;
        Ok(())
    }
}

impl ExportSink for DirSink {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        self.write(CLIPBOARD_FILENAME, text)
    }

    fn download_file(&mut self, filename: &str, content: &str, _mime_type: &str) -> Result<()> {
        self.write(filename, content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub content: String,
    pub mime_type: String,
}

/// Keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub copied: Vec<String>,
    pub downloads: Vec<Download>,
}

impl MemorySink {
    pub fn calls(&self) -> usize {
        self.copied.len() + self.downloads.len()
    }
}

impl ExportSink for MemorySink {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        self.copied.push(text.to_string());
        Ok(())
    }

    fn download_file(&mut self, filename: &str, content: &str, mime_type: &str) -> Result<()> {
        self.downloads.push(Download {
            filename: filename.to_string(),
            content: content.to_string(),
            mime_type: mime_type.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn submissions_filename_uses_iso_timestamp() {
        let t = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            submissions_filename(&t),
            "form-submissions-2024-03-09T14:05:07.000Z.json"
        );
    }

    #[test]
    fn dir_sink_writes_files_and_clipboard() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirSink::new(dir.path().join("out"));
        sink.download_file(SCHEMA_FILENAME, "{ }", JSON_MIME).unwrap();
        sink.copy_text("copied").unwrap();
        assert_eq!(fs::read_to_string(sink.dir().join(SCHEMA_FILENAME)).unwrap(), "{ }");
        assert_eq!(fs::read_to_string(sink.dir().join(CLIPBOARD_FILENAME)).unwrap(), "copied");
    }

    #[test]
    fn dir_sink_rejects_paths() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirSink::new(dir.path());
        assert!(sink.download_file("../escape.json", "x", JSON_MIME).is_err());
    }
}
