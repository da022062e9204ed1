//! Ingestion of new mod files into the storage root.
//!
//! A file chosen by the user is copied to
//! `<storage_root>/<category1>/<category2>/<file name>` and a record for it
//! is appended to the catalog. Nothing is overwritten: an existing
//! destination, enabled or disabled, refuses the whole operation.

use std::path::{Component, Path, PathBuf};

use crate::catalog::{Catalog, ModRecord};
use crate::error::{ModError, Result};
use crate::paths;
use crate::settings::Language;
use crate::toggle;

/// A validated ingestion: inputs checked, destination computed and free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestPlan {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub file_name: String,
    pub category1: String,
    pub category2: String,
}

impl IngestPlan {
    /// Validate inputs and compute the destination. Touches nothing on disk.
    pub fn new(
        storage_root: &Path,
        source: &Path,
        category1: &str,
        category2: &str,
    ) -> Result<Self> {
        let category1 = validate_category(category1, "primary")?;
        let category2 = validate_category(category2, "secondary")?;

        if !source.is_file() {
            return Err(ModError::Validation(format!(
                "source is not a file: {}",
                source.display()
            )));
        }
        let file_name = paths::file_name(source)
            .ok_or_else(|| {
                ModError::Validation(format!(
                    "source has no usable file name: {}",
                    source.display()
                ))
            })?
            .to_string();

        let destination = storage_root
            .join(&category1)
            .join(&category2)
            .join(&file_name);
        // A source already named `*.disabled` is recorded under its enabled
        // form, so both forms of that path must be free.
        let record_path = toggle::enabled_path(&destination);
        if toggle::either_form_exists(&record_path) || destination.exists() {
            return Err(ModError::DuplicateFile { path: record_path });
        }

        Ok(IngestPlan {
            source: source.to_path_buf(),
            destination,
            file_name,
            category1,
            category2,
        })
    }

    /// Copy the source into place, creating the category directories.
    pub fn copy(&self) -> Result<()> {
        if let Some(dir) = self.destination.parent() {
            std::fs::create_dir_all(dir).map_err(ModError::io("create directory", dir))?;
        }
        if let Err(e) = std::fs::copy(&self.source, &self.destination) {
            // The destination was checked free, so anything there now is a
            // partial copy.
            if self.destination.exists() {
                if let Err(cleanup) = std::fs::remove_file(&self.destination) {
                    tracing::warn!(
                        "Could not remove partial copy {}: {cleanup}",
                        self.destination.display()
                    );
                }
            }
            return Err(ModError::io("copy", &self.source)(e));
        }
        Ok(())
    }

    /// The record describing the copied file.
    pub fn record(&self, language: Language) -> ModRecord {
        let name = paths::file_stem(Path::new(&self.file_name))
            .unwrap_or(&self.file_name)
            .to_string();
        ModRecord::new(
            name,
            self.destination.clone(),
            self.category1.clone(),
            self.category2.clone(),
        )
        .with_note(format!(
            "{} {}",
            language.original_file_label(),
            self.file_name
        ))
    }
}

/// Copy `source` into the storage root and append it to `catalog`, then
/// persist. Returns the new record's index.
///
/// On any failure the catalog is left as it was; a copied file whose record
/// could not be saved is removed again.
pub fn ingest(
    catalog: &mut Catalog,
    storage_root: &Path,
    source: &Path,
    category1: &str,
    category2: &str,
    language: Language,
) -> Result<usize> {
    let plan = IngestPlan::new(storage_root, source, category1, category2)?;
    plan.copy()?;

    let index = catalog.append(plan.record(language));
    if let Err(e) = catalog.save() {
        catalog.pop();
        if let Err(cleanup) = std::fs::remove_file(&plan.destination) {
            tracing::warn!(
                "Could not remove {} after failed save: {cleanup}",
                plan.destination.display()
            );
        }
        return Err(e);
    }

    tracing::info!(
        "Added mod '{}' under {}/{}",
        plan.file_name,
        plan.category1,
        plan.category2
    );
    Ok(index)
}

/// Trim a category and make sure it names exactly one directory level.
pub fn validate_category(raw: &str, which: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ModError::Validation(format!("{which} category is required")));
    }
    let mut components = Path::new(trimmed).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single_normal || trimmed.contains(['/', '\\']) {
        return Err(ModError::Validation(format!(
            "{which} category '{trimmed}' must be a single folder name"
        )));
    }
    Ok(trimmed.to_string())
}
