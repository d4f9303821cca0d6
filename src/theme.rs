//! Light/dark theme and where it is persisted.
//!
//! The theme is read once when a session starts and written only when the
//! user toggles it.

use crate::error::{FormError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl FromStr for Theme {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(FormError::Theme(other.to_string())),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single persisted key holding "light" or "dark".
pub trait ThemeStore {
    /// `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Theme>>;
    fn save(&mut self, theme: Theme) -> Result<()>;
}

/// Theme stored as the whole content of a small text file.
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<Theme>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text.parse()?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, theme: Theme) -> Result<()> {
        fs::write(&self.path, theme.as_str())?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryThemeStore {
    pub value: Option<Theme>,
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Result<Option<Theme>> {
        Ok(self.value)
    }

    fn save(&mut self, theme: Theme) -> Result<()> {
        self.value = Some(theme);
        Ok(())
    }
}

/// Startup read: a missing or unreadable value falls back to light.
pub fn load_or_default(store: &dyn ThemeStore) -> Theme {
    match store.load() {
        Ok(theme) => theme.unwrap_or_default(),
        Err(err) => {
            tracing::warn!("ignoring stored theme: {}", err);
            Theme::default()
        }
    }
}
