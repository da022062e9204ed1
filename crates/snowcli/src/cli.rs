//! Command-line surface of `snowmod`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use snowcore::Language;

#[derive(Parser, Debug)]
#[command(name = "snowmod", version)]
#[command(about = "Catalog, enable and disable Snowbreak mod files")]
pub struct Cli {
    /// Use this directory instead of the per-user config directory.
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the catalog grouped by category (the default).
    Tree,
    /// Show one mod's details.
    Show { index: usize },
    /// Copy a mod file into the storage folder and catalog it.
    Add {
        file: PathBuf,
        category1: String,
        category2: String,
    },
    /// Enable a mod (drop the .disabled suffix).
    Enable { index: usize },
    /// Disable a mod (add the .disabled suffix).
    Disable { index: usize },
    /// Edit a mod's display name and/or note.
    Edit {
        index: usize,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Attach a preview image to a mod.
    Image { index: usize, file: PathBuf },
    /// Delete a mod file and its catalog entry.
    Delete {
        index: usize,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// List existing categories.
    Categories,
    /// Show or change settings.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Print the current settings.
    Show,
    /// Set the folder mods are copied into.
    Storage { path: PathBuf },
    /// Set or toggle the theme.
    Theme {
        #[arg(value_enum)]
        theme: ThemeArg,
    },
    /// Set the language (zh_CN or en_US).
    Language {
        #[arg(value_parser = parse_language)]
        language: Language,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

fn parse_language(raw: &str) -> Result<Language, String> {
    raw.parse::<Language>().map_err(|e| e.to_string())
}
