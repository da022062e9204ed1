//! Rename-based enable/disable of mod files.
//!
//! A mod recorded at `P` lives on disk either at `P` (enabled) or at
//! `P.disabled` (disabled). The state is always probed from disk; callers
//! must not cache it across operations.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{ModError, Result};

pub const DISABLED_SUFFIX: &str = ".disabled";

/// On-disk status of a cataloged mod file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModState {
    Enabled,
    Disabled,
    /// Neither form exists; the file was removed outside the manager.
    Missing,
}

impl ModState {
    /// Probe `path` (the enabled form) and its disabled sibling.
    ///
    /// If both forms exist the disabled one wins, matching what the game
    /// loader would see as the odd one out.
    pub fn probe(path: &Path) -> Self {
        let state = if disabled_path(path).exists() {
            ModState::Disabled
        } else if path.exists() {
            ModState::Enabled
        } else {
            ModState::Missing
        };
        tracing::debug!("Probed {}: {state}", path.display());
        state
    }

    pub fn is_enabled(self) -> bool {
        self == ModState::Enabled
    }

    pub fn is_missing(self) -> bool {
        self == ModState::Missing
    }
}

impl fmt::Display for ModState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModState::Enabled => "enabled",
            ModState::Disabled => "disabled",
            ModState::Missing => "missing",
        })
    }
}

/// `P` -> `P.disabled`.
pub fn disabled_path(path: &Path) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(DISABLED_SUFFIX);
    PathBuf::from(raw)
}

/// Strip a trailing `.disabled`, yielding the enabled form.
pub fn enabled_path(path: &Path) -> PathBuf {
    match path.to_str().and_then(|s| s.strip_suffix(DISABLED_SUFFIX)) {
        Some(stripped) if !stripped.is_empty() => PathBuf::from(stripped),
        _ => path.to_path_buf(),
    }
}

/// True if either the enabled or the disabled form of `path` exists.
pub fn either_form_exists(path: &Path) -> bool {
    path.exists() || disabled_path(path).exists()
}

/// Rename the disabled form back to `path`. No-op when already enabled or
/// missing. Returns the state probed after the attempt.
pub fn enable(path: &Path) -> Result<ModState> {
    let disabled = disabled_path(path);
    if disabled.exists() {
        if path.exists() {
            return Err(ModError::DuplicateFile {
                path: path.to_path_buf(),
            });
        }
        std::fs::rename(&disabled, path).map_err(ModError::io("rename", &disabled))?;
        tracing::info!("Enabled {}", path.display());
    }
    Ok(ModState::probe(path))
}

/// Rename `path` to its disabled form. No-op when already disabled or
/// missing. Returns the state probed after the attempt.
pub fn disable(path: &Path) -> Result<ModState> {
    if path.exists() {
        let disabled = disabled_path(path);
        if disabled.exists() {
            return Err(ModError::DuplicateFile { path: disabled });
        }
        std::fs::rename(path, &disabled).map_err(ModError::io("rename", path))?;
        tracing::info!("Disabled {}", path.display());
    }
    Ok(ModState::probe(path))
}

pub fn set_enabled(path: &Path, enabled: bool) -> Result<ModState> {
    if enabled {
        enable(path)
    } else {
        disable(path)
    }
}

/// Delete whichever forms of `path` exist.
pub fn remove_all_forms(path: &Path) -> Result<()> {
    for candidate in [path.to_path_buf(), disabled_path(path)] {
        if candidate.exists() {
            std::fs::remove_file(&candidate).map_err(ModError::io("delete", &candidate))?;
            tracing::info!("Deleted {}", candidate.display());
        }
    }
    Ok(())
}
