//! Plain-text rendering of the catalog views.

use std::fmt::Write;

use snowcore::categories::{CategoryIndex, CategoryTree};
use snowcore::{ModDetails, ModState, Settings};

pub fn state_marker(state: ModState) -> &'static str {
    match state {
        ModState::Enabled => "[x]",
        ModState::Disabled => "[ ]",
        ModState::Missing => "[!]",
    }
}

/// Indented tree; `state_of` is asked for each leaf so states are fresh.
pub fn tree(tree: &CategoryTree, state_of: impl Fn(usize) -> ModState) -> String {
    if tree.is_empty() {
        return "No mods cataloged yet.\n".to_string();
    }
    let mut out = String::new();
    for category in &tree.categories {
        let _ = writeln!(out, "{}", category.name);
        for sub in &category.children {
            let _ = writeln!(out, "  {}", sub.name);
            for leaf in &sub.mods {
                let state = state_of(leaf.index);
                let marker = state_marker(state);
                let _ = write!(out, "    {:>3} {marker} {}", leaf.index, leaf.name);
                if state.is_missing() {
                    out.push_str("  (file missing)");
                }
                out.push('\n');
            }
        }
    }
    let count = tree.mod_count();
    let _ = writeln!(out, "{count} mod{}", if count == 1 { "" } else { "s" });
    out
}

pub fn details(details: &ModDetails) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{}  {}", details.index, details.name);
    let toggle = if details.can_toggle() {
        state_marker(details.state)
    } else {
        "[-]"
    };
    let _ = writeln!(out, "state: {} {}", toggle, details.state);
    match &details.image {
        Some(image) => {
            let _ = writeln!(out, "image: {}", image.display());
        }
        None => out.push_str("image: none\n"),
    }
    if !details.note.is_empty() {
        out.push_str("note:\n");
        for line in details.note.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }
    out
}

pub fn categories(index: &CategoryIndex) -> String {
    let mut out = String::new();
    for (primary, secondaries) in index {
        let joined: Vec<&str> = secondaries.iter().map(String::as_str).collect();
        let _ = writeln!(out, "{primary}: {}", joined.join(", "));
    }
    out
}

pub fn settings(settings: &Settings) -> String {
    format!(
        "storage_path: {}\ntheme: {}\nlanguage: {}\n",
        settings.storage_path.display(),
        settings.theme,
        settings.language
    )
}
