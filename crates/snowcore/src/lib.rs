//! Core of the Snowbreak mod manager: the mod catalog, the rename-based
//! enable/disable toggle, ingestion of new mod files and the settings that
//! tie them to a per-user config directory.
//!
//! Presentation layers hold a [`manager::ModManager`] and never touch the
//! backing JSON files directly.

pub mod catalog;
pub mod categories;
pub mod error;
pub mod fsutil;
pub mod images;
pub mod ingest;
pub mod manager;
pub mod paths;
pub mod settings;
pub mod toggle;

pub use catalog::{Catalog, ModRecord};
pub use error::{ModError, Result};
pub use manager::{ModDetails, ModManager};
pub use settings::{Language, Settings, Theme};
pub use toggle::ModState;
