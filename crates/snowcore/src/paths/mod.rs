//! Layout of the per-user config directory.
//!
//! ```text
//! <config>/snowbreak_mod_manager/
//!   projects.json   catalog
//!   config.json     settings
//!   images/         preview images, flat namespace
//! ```

use std::path::{Path, PathBuf};

use crate::error::{ModError, Result};

pub const APP_DIR_NAME: &str = "snowbreak_mod_manager";
pub const PROJECTS_FILE: &str = "projects.json";
pub const CONFIG_FILE: &str = "config.json";
pub const IMAGES_DIR: &str = "images";

/// Resolved locations of every file the manager persists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    /// Use `root` as the config directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        AppPaths { root: root.into() }
    }

    /// The default config directory (`~/.config/snowbreak_mod_manager/` on Linux).
    pub fn default_root() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(fallback_base)
            .join(APP_DIR_NAME)
    }

    /// Create the config directory and the images directory.
    pub fn ensure(&self) -> Result<()> {
        for dir in [self.root.clone(), self.images_dir()] {
            std::fs::create_dir_all(&dir).map_err(ModError::io("create directory", &dir))?;
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn projects_file(&self) -> PathBuf {
        self.root.join(PROJECTS_FILE)
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        AppPaths::new(Self::default_root())
    }
}

/// Base directory used when the platform reports no config or home
/// directory: the executable's directory, else the working directory.
/// Never a literal `~`, which the filesystem would treat as a plain name.
pub fn fallback_base() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Final component of `path` as a string, if it has one.
pub fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// File name without its last extension (`skin_a.zip` -> `skin_a`).
pub fn file_stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|n| n.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let paths = AppPaths::new("/cfg");
        assert_eq!(paths.projects_file(), PathBuf::from("/cfg/projects.json"));
        assert_eq!(paths.config_file(), PathBuf::from("/cfg/config.json"));
        assert_eq!(paths.images_dir(), PathBuf::from("/cfg/images"));
    }

    #[test]
    fn test_default_root_name() {
        assert!(AppPaths::default_root().ends_with(APP_DIR_NAME));
    }

    #[test]
    fn test_fallback_base_is_real_dir() {
        let base = fallback_base();
        assert!(!base.starts_with("~"));
        assert!(base.is_dir(), "{}", base.display());
    }

    #[test]
    fn test_ensure_creates_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AppPaths::new(tmp.path().join("cfg"));
        paths.ensure().unwrap();
        assert!(paths.root().is_dir());
        assert!(paths.images_dir().is_dir());
    }

    #[test]
    fn test_file_name_and_stem() {
        let p = Path::new("/mods/skin_a.zip");
        assert_eq!(file_name(p), Some("skin_a.zip"));
        assert_eq!(file_stem(p), Some("skin_a"));
        assert_eq!(file_stem(Path::new("/mods/archive.tar.gz")), Some("archive.tar"));
    }
}
