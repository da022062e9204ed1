//! The mod catalog: an ordered list of [`ModRecord`]s persisted as a JSON
//! array in `projects.json`.
//!
//! Insertion order is both the tree order and the file order. There are no
//! partial updates: every save rewrites the whole array.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ModError, Result};
use crate::fsutil;
use crate::toggle::{self, ModState};

/// One cataloged mod file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModRecord {
    pub name: String,
    /// Enabled form of the file. Never carries the `.disabled` suffix.
    pub path: PathBuf,
    #[serde(default)]
    pub note: String,
    /// Copied preview image, empty when none is attached.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_path: String,
    #[serde(default)]
    pub category1: String,
    #[serde(default)]
    pub category2: String,
}

impl ModRecord {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        category1: impl Into<String>,
        category2: impl Into<String>,
    ) -> Self {
        let path: PathBuf = path.into();
        ModRecord {
            name: name.into(),
            path: toggle::enabled_path(&path),
            note: String::new(),
            image_path: String::new(),
            category1: category1.into(),
            category2: category2.into(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Attached image path, if one is set.
    pub fn image(&self) -> Option<&Path> {
        if self.image_path.is_empty() {
            None
        } else {
            Some(Path::new(&self.image_path))
        }
    }

    /// Current on-disk state, probed fresh.
    pub fn state(&self) -> ModState {
        ModState::probe(&self.path)
    }
}

/// Field edits applied by "save details" and image attachment. `None` leaves
/// a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordEdit {
    pub name: Option<String>,
    pub note: Option<String>,
    pub image_path: Option<String>,
}

impl RecordEdit {
    fn apply(self, record: &mut ModRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(note) = self.note {
            record.note = note;
        }
        if let Some(image_path) = self.image_path {
            record.image_path = image_path;
        }
    }
}

/// In-memory catalog bound to its backing file.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<ModRecord>,
    path: PathBuf,
}

impl Catalog {
    /// An empty catalog that will be saved to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Catalog {
            records: Vec::new(),
            path: path.into(),
        }
    }

    /// Read the catalog from `path`.
    ///
    /// A missing file is an empty catalog. Malformed JSON, including a
    /// top-level value that is not an array, is a [`ModError::ConfigParse`];
    /// callers recover by continuing with [`Catalog::empty`].
    pub fn load(path: &Path) -> Result<Self> {
        let mut records: Vec<ModRecord> = fsutil::read_json(path)?.unwrap_or_default();
        for record in &mut records {
            let enabled = toggle::enabled_path(&record.path);
            if enabled != record.path {
                tracing::warn!(
                    "Record '{}' was stored with its disabled path; normalizing",
                    record.name
                );
                record.path = enabled;
            }
        }
        tracing::debug!("Loaded {} mod records from {}", records.len(), path.display());
        Ok(Catalog {
            records,
            path: path.to_path_buf(),
        })
    }

    /// Rewrite the whole catalog file atomically.
    pub fn save(&self) -> Result<()> {
        fsutil::write_json_atomic(&self.path, &self.records)
    }

    pub fn file_path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[ModRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&ModRecord> {
        let len = self.records.len();
        self.records
            .get(index)
            .ok_or(ModError::NoSuchRecord { index, len })
    }

    /// Append a record and return its index.
    pub fn append(&mut self, record: ModRecord) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    pub fn update(&mut self, index: usize, edit: RecordEdit) -> Result<()> {
        let len = self.records.len();
        let record = self
            .records
            .get_mut(index)
            .ok_or(ModError::NoSuchRecord { index, len })?;
        edit.apply(record);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<ModRecord> {
        if index >= self.records.len() {
            return Err(ModError::NoSuchRecord {
                index,
                len: self.records.len(),
            });
        }
        Ok(self.records.remove(index))
    }

    /// Put a previously removed record back at `index`.
    pub(crate) fn restore(&mut self, index: usize, record: ModRecord) {
        let index = index.min(self.records.len());
        self.records.insert(index, record);
    }

    /// Drop the last record. Used to roll back an append whose save failed.
    pub(crate) fn pop(&mut self) -> Option<ModRecord> {
        self.records.pop()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &ModRecord)> {
        self.records.iter().enumerate()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
