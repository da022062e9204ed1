//! Two-level category view over the catalog.
//!
//! Records carry a primary category (`category1`, e.g. a character) and a
//! secondary one (`category2`, e.g. a skin). This module builds:
//! - the tree shown to the user, grouped in first-appearance order
//! - the index of existing categories offered when adding a mod

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::Catalog;
use crate::settings::Language;

/// A mod entry in the tree, pointing back at its catalog position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLeaf {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subcategory {
    pub name: String,
    pub mods: Vec<TreeLeaf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub children: Vec<Subcategory>,
}

/// The full category tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTree {
    pub categories: Vec<Category>,
}

impl CategoryTree {
    /// Group the catalog by category. Empty category strings are shown with
    /// the language's fallback labels.
    pub fn build(catalog: &Catalog, language: Language) -> Self {
        let mut tree = CategoryTree::default();

        for (index, record) in catalog.iter() {
            let cat1 = display_or(&record.category1, language.uncategorized_label());
            let cat2 = display_or(&record.category2, language.default_category_label());

            let c1 = match tree.categories.iter().position(|c| c.name == cat1) {
                Some(pos) => pos,
                None => {
                    tree.categories.push(Category {
                        name: cat1.to_string(),
                        children: Vec::new(),
                    });
                    tree.categories.len() - 1
                }
            };
            let children = &mut tree.categories[c1].children;
            let c2 = match children.iter().position(|s| s.name == cat2) {
                Some(pos) => pos,
                None => {
                    children.push(Subcategory {
                        name: cat2.to_string(),
                        mods: Vec::new(),
                    });
                    children.len() - 1
                }
            };
            children[c2].mods.push(TreeLeaf {
                index,
                name: record.name.clone(),
            });
        }

        tree
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Look up a top-level category by name.
    #[cfg(test)]
    fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Number of mod leaves in the tree.
    pub fn mod_count(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| &c.children)
            .map(|s| s.mods.len())
            .sum()
    }
}

/// Existing categories: primary name -> sorted secondary names.
pub type CategoryIndex = BTreeMap<String, BTreeSet<String>>;

/// Collect every (category1, category2) pair used by a record. Records
/// missing either category are skipped.
pub fn category_index(catalog: &Catalog) -> CategoryIndex {
    let mut index = CategoryIndex::new();
    for (_, record) in catalog.iter() {
        if record.category1.is_empty() || record.category2.is_empty() {
            continue;
        }
        index
            .entry(record.category1.clone())
            .or_default()
            .insert(record.category2.clone());
    }
    index
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}
