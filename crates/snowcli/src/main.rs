mod cli;
mod render;

use anyhow::{bail, Context, Result};
use clap::Parser;
use snowcore::paths::AppPaths;
use snowcore::{ModManager, Theme};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, ConfigCommand, ThemeArg};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = cli
        .config_dir
        .map(AppPaths::new)
        .unwrap_or_default();
    let mut manager = ModManager::open(paths).context("opening config directory")?;
    for warning in manager.take_warnings() {
        eprintln!("warning: {warning}");
    }

    match cli.command.unwrap_or(Command::Tree) {
        Command::Tree => {
            print!("{}", render::tree(&manager.tree(), |i| {
                manager.state(i).unwrap_or(snowcore::ModState::Missing)
            }));
        }
        Command::Show { index } => {
            print!("{}", render::details(&manager.details(index)?));
        }
        Command::Add {
            file,
            category1,
            category2,
        } => {
            let index = manager
                .add_mod(&file, &category1, &category2)
                .with_context(|| format!("adding {}", file.display()))?;
            let record = manager.catalog().get(index)?;
            println!("Added #{index} {} -> {}", record.name, record.path.display());
        }
        Command::Enable { index } => toggle(&manager, index, true)?,
        Command::Disable { index } => toggle(&manager, index, false)?,
        Command::Edit { index, name, note } => {
            if name.is_none() && note.is_none() {
                bail!("nothing to change: pass --name and/or --note");
            }
            let record = manager.catalog().get(index)?;
            let name = name.unwrap_or_else(|| record.name.clone());
            let note = note.unwrap_or_else(|| record.note.clone());
            manager.save_details(index, &name, &note)?;
            println!("Saved #{index} {name}");
        }
        Command::Image { index, file } => {
            let dest = manager
                .attach_image(index, &file)
                .with_context(|| format!("attaching {}", file.display()))?;
            let record = manager.catalog().get(index)?;
            let (name, note) = (record.name.clone(), record.note.clone());
            manager.save_details(index, &name, &note)?;
            println!("Attached {} to #{index}", dest.display());
        }
        Command::Delete { index, yes } => {
            let name = manager.catalog().get(index)?.name.clone();
            if !yes {
                bail!("refusing to delete '{name}' without --yes");
            }
            manager.delete_mod(index)?;
            println!("Deleted '{name}'");
        }
        Command::Categories => {
            print!("{}", render::categories(&manager.category_index()));
        }
        Command::Config(cmd) => configure(&mut manager, cmd)?,
    }
    Ok(())
}

fn toggle(manager: &ModManager, index: usize, enabled: bool) -> Result<()> {
    let result = manager.set_enabled(index, enabled);
    // Report what is on disk now, whatever the rename did.
    let state = manager.state(index)?;
    let name = &manager.catalog().get(index)?.name;
    println!("{} {name} ({state})", render::state_marker(state));
    result.map(|_| ()).with_context(|| {
        format!(
            "could not {} '{name}'",
            if enabled { "enable" } else { "disable" }
        )
    })
}

fn configure(manager: &mut ModManager, cmd: ConfigCommand) -> Result<()> {
    let settings = manager.settings_mut();
    match cmd {
        ConfigCommand::Show => {}
        ConfigCommand::Storage { path } => {
            settings.set_storage_path(path)?;
        }
        ConfigCommand::Theme {
            theme: ThemeArg::Toggle,
        } => {
            settings.toggle_theme()?;
        }
        ConfigCommand::Theme {
            theme: ThemeArg::Light,
        } => {
            settings.set_theme(Theme::Light)?;
        }
        ConfigCommand::Theme {
            theme: ThemeArg::Dark,
        } => {
            settings.set_theme(Theme::Dark)?;
        }
        ConfigCommand::Language { language } => {
            settings.set_language(language)?;
        }
    }
    print!("{}", render::settings(manager.settings()));
    Ok(())
}
