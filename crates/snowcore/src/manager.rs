//! The application object handed to a presentation layer.
//!
//! A `ModManager` owns the settings and the catalog for one config
//! directory. Every catalog mutation goes through it and is persisted before
//! the call returns; presentation code never touches the JSON files.

use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, ModRecord, RecordEdit};
use crate::categories::{self, CategoryIndex, CategoryTree};
use crate::error::{ModError, Result};
use crate::images;
use crate::ingest;
use crate::paths::AppPaths;
use crate::settings::Settings;
use crate::toggle::{self, ModState};

/// What the details panel shows for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModDetails {
    pub index: usize,
    pub name: String,
    pub note: String,
    /// Set only when the attached image file still exists.
    pub image: Option<PathBuf>,
    pub state: ModState,
}

impl ModDetails {
    /// Whether the enable checkbox is interactive.
    pub fn can_toggle(&self) -> bool {
        !self.state.is_missing()
    }

    /// Whether the enable checkbox is ticked.
    pub fn checked(&self) -> bool {
        self.state.is_enabled()
    }

    /// Whether the name should be highlighted as an error.
    pub fn name_is_error(&self) -> bool {
        self.state.is_missing()
    }
}

#[derive(Debug)]
pub struct ModManager {
    paths: AppPaths,
    settings: Settings,
    catalog: Catalog,
    warnings: Vec<ModError>,
}

impl ModManager {
    /// Open the config directory, creating it if needed.
    ///
    /// Unreadable or malformed `config.json`/`projects.json` do not fail the
    /// open: defaults or an empty catalog are used and the problem is kept in
    /// [`ModManager::warnings`].
    pub fn open(paths: AppPaths) -> Result<Self> {
        paths.ensure()?;
        let mut warnings = Vec::new();

        let config_file = paths.config_file();
        let settings = Settings::load(&config_file).unwrap_or_else(|e| {
            tracing::warn!("Using default settings: {e}");
            warnings.push(e);
            Settings::with_defaults(&config_file)
        });

        let projects_file = paths.projects_file();
        let catalog = Catalog::load(&projects_file).unwrap_or_else(|e| {
            tracing::warn!("Starting with an empty catalog: {e}");
            warnings.push(e);
            Catalog::empty(&projects_file)
        });

        tracing::info!(
            "Opened {} with {} mods",
            catalog.file_path().display(),
            catalog.len()
        );
        Ok(ModManager {
            paths,
            settings,
            catalog,
            warnings,
        })
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Settings setters save `config.json` themselves.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Problems recovered from while opening.
    pub fn warnings(&self) -> &[ModError] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<ModError> {
        std::mem::take(&mut self.warnings)
    }

    pub fn tree(&self) -> CategoryTree {
        CategoryTree::build(&self.catalog, self.settings.language)
    }

    pub fn category_index(&self) -> CategoryIndex {
        categories::category_index(&self.catalog)
    }

    /// Copy `source` into the storage root under the two categories and
    /// catalog it. Returns the new record's index.
    pub fn add_mod(&mut self, source: &Path, category1: &str, category2: &str) -> Result<usize> {
        ingest::ingest(
            &mut self.catalog,
            &self.settings.storage_path,
            source,
            category1,
            category2,
            self.settings.language,
        )
    }

    pub fn state(&self, index: usize) -> Result<ModState> {
        Ok(self.catalog.get(index)?.state())
    }

    /// Enable or disable a mod by renaming its file.
    ///
    /// On error nothing is assumed about the outcome; query
    /// [`ModManager::state`] or [`ModManager::details`] again.
    pub fn set_enabled(&self, index: usize, enabled: bool) -> Result<ModState> {
        let record = self.catalog.get(index)?;
        toggle::set_enabled(&record.path, enabled)
    }

    pub fn details(&self, index: usize) -> Result<ModDetails> {
        let record = self.catalog.get(index)?;
        Ok(ModDetails {
            index,
            name: record.name.clone(),
            note: record.note.clone(),
            image: record.image().filter(|p| p.exists()).map(Path::to_path_buf),
            state: record.state(),
        })
    }

    /// Update name and note and persist the catalog, including any image
    /// attached since the last save.
    pub fn save_details(&mut self, index: usize, name: &str, note: &str) -> Result<()> {
        let previous = self.catalog.get(index)?.clone();
        self.catalog.update(
            index,
            RecordEdit {
                name: Some(name.to_string()),
                note: Some(note.to_string()),
                image_path: None,
            },
        )?;
        if let Err(e) = self.catalog.save() {
            self.catalog.update(
                index,
                RecordEdit {
                    name: Some(previous.name),
                    note: Some(previous.note),
                    image_path: None,
                },
            )?;
            return Err(e);
        }
        tracing::info!("Saved details for '{name}'");
        Ok(())
    }

    /// Copy an image into the images directory and attach it to a record.
    /// The catalog is not saved; that happens on [`ModManager::save_details`].
    pub fn attach_image(&mut self, index: usize, source: &Path) -> Result<PathBuf> {
        self.catalog.get(index)?;
        let dest = images::import_image(&self.paths.images_dir(), source)?;
        self.catalog.update(
            index,
            RecordEdit {
                image_path: Some(dest.to_string_lossy().into_owned()),
                ..Default::default()
            },
        )?;
        Ok(dest)
    }

    /// Delete the mod file (either form) and drop the record.
    pub fn delete_mod(&mut self, index: usize) -> Result<ModRecord> {
        let path = self.catalog.get(index)?.path.clone();
        toggle::remove_all_forms(&path)?;

        let record = self.catalog.remove(index)?;
        if let Err(e) = self.catalog.save() {
            self.catalog.restore(index, record);
            return Err(e);
        }
        tracing::info!("Deleted mod '{}'", record.name);
        Ok(record)
    }

    /// Write the catalog as it is now.
    pub fn persist(&self) -> Result<()> {
        self.catalog.save()
    }

    /// Final save on shutdown.
    pub fn close(self) -> Result<()> {
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Language;

    struct Env {
        tmp: tempfile::TempDir,
        manager: ModManager,
    }

    impl Env {
        fn new() -> Self {
            let tmp = tempfile::tempdir().unwrap();
            let mut manager = ModManager::open(AppPaths::new(tmp.path().join("cfg"))).unwrap();
            manager
                .settings_mut()
                .set_storage_path(tmp.path().join("root"))
                .unwrap();
            manager.settings_mut().set_language(Language::EnUs).unwrap();
            Env { tmp, manager }
        }

        fn source(&self, name: &str) -> PathBuf {
            let path = self.tmp.path().join("downloads").join(name);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, name.as_bytes()).unwrap();
            path
        }

        fn reopen(&self) -> ModManager {
            ModManager::open(AppPaths::new(self.tmp.path().join("cfg"))).unwrap()
        }
    }

    #[test]
    fn test_open_fresh() {
        let env = Env::new();
        assert!(env.manager.catalog().is_empty());
        assert!(env.manager.warnings().is_empty());
        assert!(env.manager.paths().images_dir().is_dir());
    }

    #[test]
    fn test_open_with_malformed_files() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AppPaths::new(tmp.path());
        std::fs::write(paths.projects_file(), "not json").unwrap();
        std::fs::write(paths.config_file(), "{").unwrap();

        let mut manager = ModManager::open(paths).unwrap();
        assert!(manager.catalog().is_empty());
        let warnings = manager.take_warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings
            .iter()
            .all(|w| matches!(w, ModError::ConfigParse { .. })));
        assert!(manager.warnings().is_empty());
    }

    #[test]
    fn test_add_toggle_and_details() {
        let mut env = Env::new();
        let src = env.source("skin_a.zip");
        let idx = env.manager.add_mod(&src, "Alice", "Default").unwrap();

        let details = env.manager.details(idx).unwrap();
        assert_eq!(details.state, ModState::Enabled);
        assert!(details.checked() && details.can_toggle() && !details.name_is_error());

        assert_eq!(env.manager.set_enabled(idx, false).unwrap(), ModState::Disabled);
        let details = env.manager.details(idx).unwrap();
        assert!(!details.checked());
        assert!(details.can_toggle());

        assert_eq!(env.manager.set_enabled(idx, true).unwrap(), ModState::Enabled);
        assert_eq!(env.reopen().catalog().len(), 1);
    }

    #[test]
    fn test_disabled_only_on_disk_reads_disabled() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AppPaths::new(tmp.path().join("cfg"));
        let mod_dir = tmp.path().join("m");
        std::fs::create_dir_all(&mod_dir).unwrap();
        std::fs::write(mod_dir.join("x.pak.disabled"), b"x").unwrap();

        let mut catalog = Catalog::empty(paths.projects_file());
        catalog.append(ModRecord::new("x", mod_dir.join("x.pak"), "A", "B"));
        paths.ensure().unwrap();
        catalog.save().unwrap();

        let manager = ModManager::open(paths).unwrap();
        let details = manager.details(0).unwrap();
        assert_eq!(details.state, ModState::Disabled);
        assert!(!details.checked());
        assert!(details.can_toggle());
        assert!(!details.name_is_error());
    }

    #[test]
    fn test_missing_file_reads_missing() {
        let mut env = Env::new();
        let src = env.source("x.pak");
        let idx = env.manager.add_mod(&src, "A", "B").unwrap();
        std::fs::remove_file(&env.manager.catalog().get(idx).unwrap().path).unwrap();

        let details = env.manager.details(idx).unwrap();
        assert_eq!(details.state, ModState::Missing);
        assert!(!details.checked());
        assert!(!details.can_toggle());
        assert!(details.name_is_error());
        // Missing records stay cataloged.
        assert_eq!(env.manager.catalog().len(), 1);
        assert_eq!(env.manager.set_enabled(idx, true).unwrap(), ModState::Missing);
    }

    #[test]
    fn test_save_details_persists() {
        let mut env = Env::new();
        let src = env.source("skin_a.zip");
        let idx = env.manager.add_mod(&src, "Alice", "Default").unwrap();

        env.manager.save_details(idx, "Fancy skin", "my note").unwrap();
        let reopened = env.reopen();
        let record = reopened.catalog().get(idx).unwrap();
        assert_eq!(record.name, "Fancy skin");
        assert_eq!(record.note, "my note");
    }

    #[test]
    fn test_attach_image_waits_for_save() {
        let mut env = Env::new();
        let src = env.source("skin_a.zip");
        let idx = env.manager.add_mod(&src, "Alice", "Default").unwrap();
        let img = env.source("cover.png");

        let dest = env.manager.attach_image(idx, &img).unwrap();
        assert_eq!(dest, env.manager.paths().images_dir().join("cover.png"));
        assert_eq!(env.manager.details(idx).unwrap().image, Some(dest.clone()));
        assert_eq!(env.reopen().catalog().get(idx).unwrap().image_path, "");

        let (name, note) = {
            let r = env.manager.catalog().get(idx).unwrap();
            (r.name.clone(), r.note.clone())
        };
        env.manager.save_details(idx, &name, &note).unwrap();
        assert_eq!(
            env.reopen().catalog().get(idx).unwrap().image(),
            Some(dest.as_path())
        );
    }

    #[test]
    fn test_delete_removes_both_forms() {
        let mut env = Env::new();
        let a = env.source("a.pak");
        let b = env.source("b.pak");
        env.manager.add_mod(&a, "C", "D").unwrap();
        env.manager.add_mod(&b, "C", "D").unwrap();
        env.manager.set_enabled(0, false).unwrap();

        let path = env.manager.catalog().get(0).unwrap().path.clone();
        let removed = env.manager.delete_mod(0).unwrap();
        assert_eq!(removed.name, "a");
        assert!(!toggle::either_form_exists(&path));

        let reopened = env.reopen();
        assert_eq!(reopened.catalog().len(), 1);
        assert_eq!(reopened.catalog().get(0).unwrap().name, "b");
    }

    #[test]
    fn test_failed_toggle_reports_unchanged_state() {
        let mut env = Env::new();
        // The disabled form of this name is longer than a file name may be.
        let src = env.source(&format!("{}.pak", "a".repeat(248)));
        let idx = env.manager.add_mod(&src, "A", "B").unwrap();

        let err = env.manager.set_enabled(idx, false).unwrap_err();
        assert!(matches!(err, ModError::Io { action: "rename", .. }), "{err:?}");
        assert_eq!(env.manager.state(idx).unwrap(), ModState::Enabled);
        assert!(env.manager.details(idx).unwrap().checked());
    }

    #[test]
    fn test_failed_delete_keeps_record() {
        let mut env = Env::new();
        let a = env.source("a.pak");
        let idx = env.manager.add_mod(&a, "C", "D").unwrap();
        // Swap the mod file for a directory so removing it fails.
        let path = env.manager.catalog().get(idx).unwrap().path.clone();
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let err = env.manager.delete_mod(idx).unwrap_err();
        assert!(matches!(err, ModError::Io { action: "delete", .. }), "{err:?}");
        assert_eq!(env.manager.catalog().len(), 1);
        assert_eq!(env.reopen().catalog().get(idx).unwrap().name, "a");
    }

    #[test]
    fn test_failed_copy_adds_nothing() {
        let mut env = Env::new();
        let storage = env.manager.settings().storage_path.clone();
        std::fs::create_dir_all(&storage).unwrap();
        std::fs::write(storage.join("Alice"), b"").unwrap();

        let src = env.source("skin_a.zip");
        let err = env.manager.add_mod(&src, "Alice", "Default").unwrap_err();
        assert!(matches!(err, ModError::Io { .. }), "{err:?}");
        assert!(env.manager.catalog().is_empty());
        assert!(env.reopen().catalog().is_empty());
    }

    #[test]
    fn test_bad_index() {
        let mut env = Env::new();
        assert!(matches!(
            env.manager.delete_mod(0),
            Err(ModError::NoSuchRecord { .. })
        ));
        assert!(env.manager.details(2).is_err());
        assert!(env.manager.save_details(0, "n", "t").is_err());
    }

    #[test]
    fn test_tree_and_index() {
        let mut env = Env::new();
        let a = env.source("a.pak");
        env.manager.add_mod(&a, "Alice", "Skin").unwrap();
        let tree = env.manager.tree();
        assert_eq!(tree.categories[0].name, "Alice");
        assert!(env.manager.category_index()["Alice"].contains("Skin"));
    }

    #[test]
    fn test_close_persists() {
        let mut env = Env::new();
        let a = env.source("a.pak");
        env.manager.add_mod(&a, "Alice", "Skin").unwrap();
        let img = env.source("a.png");
        env.manager.attach_image(0, &img).unwrap();

        let Env { tmp, manager } = env;
        manager.close().unwrap();
        let reopened = ModManager::open(AppPaths::new(tmp.path().join("cfg"))).unwrap();
        assert!(reopened.catalog().get(0).unwrap().image().is_some());
    }
}
