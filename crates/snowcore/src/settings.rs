//! Application settings stored at `<config>/config.json`.
//!
//! Holds the mod storage root, the UI theme and the UI language. Every
//! setter writes the file straight away when the value actually changes.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ModError, Result};
use crate::fsutil;
use crate::paths;

/// Folder under the home directory used when no storage path is configured.
pub const DEFAULT_STORAGE_DIR: &str = "MyModProjects";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
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
    type Err = ModError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ModError::Validation(format!("unknown theme '{other}'"))),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Language {
    #[default]
    #[serde(rename = "zh_CN")]
    ZhCn,
    #[serde(rename = "en_US")]
    EnUs,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::ZhCn, Language::EnUs];

    pub fn code(self) -> &'static str {
        match self {
            Language::ZhCn => "zh_CN",
            Language::EnUs => "en_US",
        }
    }

    /// Prefix of the note written for freshly ingested mods.
    pub fn original_file_label(self) -> &'static str {
        match self {
            Language::ZhCn => "原始文件:",
            Language::EnUs => "Original File:",
        }
    }

    /// Tree label for a record with an empty first category.
    pub fn uncategorized_label(self) -> &'static str {
        match self {
            Language::ZhCn => "未分类",
            Language::EnUs => "Uncategorized",
        }
    }

    /// Tree label for a record with an empty second category.
    pub fn default_category_label(self) -> &'static str {
        match self {
            Language::ZhCn => "默认",
            Language::EnUs => "Default",
        }
    }
}

impl FromStr for Language {
    type Err = ModError;

    fn from_str(s: &str) -> Result<Self> {
        Language::ALL
            .into_iter()
            .find(|l| l.code() == s)
            .ok_or_else(|| ModError::Validation(format!("unknown language '{s}'")))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Process-wide settings, constructed once and passed to whoever needs them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
    #[serde(default, deserialize_with = "lenient")]
    pub theme: Theme,
    #[serde(default, deserialize_with = "lenient")]
    pub language: Language,
    #[serde(skip)]
    path: PathBuf,
}

impl Settings {
    /// Defaults bound to `path`; nothing is written.
    pub fn with_defaults(path: impl Into<PathBuf>) -> Self {
        Settings {
            storage_path: default_storage_path(),
            theme: Theme::default(),
            language: Language::default(),
            path: path.into(),
        }
    }

    /// Load settings from `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let mut settings = fsutil::read_json::<Settings>(path)?
            .unwrap_or_else(|| Settings::with_defaults(path));
        settings.path = path.to_path_buf();
        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        fsutil::write_json_atomic(&self.path, self)
    }

    pub fn file_path(&self) -> &Path {
        &self.path
    }

    /// Change the storage root. Returns whether anything changed.
    pub fn set_storage_path(&mut self, path: impl Into<PathBuf>) -> Result<bool> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(ModError::Validation("storage path must not be empty".into()));
        }
        if path == self.storage_path {
            return Ok(false);
        }
        self.commit(|s| s.storage_path = path)?;
        tracing::info!("Storage path changed to {}", self.storage_path.display());
        Ok(true)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<bool> {
        if theme == self.theme {
            return Ok(false);
        }
        self.commit(|s| s.theme = theme)?;
        Ok(true)
    }

    /// Flip between light and dark, returning the new theme.
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        self.set_theme(self.theme.toggled())?;
        Ok(self.theme)
    }

    pub fn set_language(&mut self, language: Language) -> Result<bool> {
        if language == self.language {
            return Ok(false);
        }
        self.commit(|s| s.language = language)?;
        Ok(true)
    }

    /// Apply `change` only once the changed settings are on disk.
    fn commit(&mut self, change: impl FnOnce(&mut Settings)) -> Result<()> {
        let mut next = self.clone();
        change(&mut next);
        next.save()?;
        *self = next;
        Ok(())
    }
}

fn default_storage_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(paths::fallback_base)
        .join(DEFAULT_STORAGE_DIR)
}

/// Accept any JSON value; unknown or non-string values become the default.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default())
}
