//! Runtime settings shared by the CLI and sessions.

use std::path::PathBuf;

pub const DEFAULT_NOTICE_MS: u64 = 3000;
pub const DEFAULT_THEME_FILE: &str = ".schemaform-theme";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// How long the success notice stays up after a submission.
    pub notice_delay_ms: u64,
    pub theme_file: PathBuf,
    /// Where downloads land.
    pub out_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notice_delay_ms: DEFAULT_NOTICE_MS,
            theme_file: PathBuf::from(DEFAULT_THEME_FILE),
            out_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// The notice delay, saturating at the largest representable duration.
    pub fn notice_delay(&self) -> chrono::Duration {
        i64::try_from(self.notice_delay_ms)
            .ok()
            .and_then(chrono::Duration::try_milliseconds)
            .unwrap_or(chrono::Duration::MAX)
    }
}
