//! Static category -> cuisines table.
//!
//! Loaded once at startup (from TOML, or the built-in table) and shared
//! read-only; nothing mutates it afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::config::AppConfig;
use crate::errors::DirectoryError;

const BUILTIN_CATEGORIES: &str = include_str!("../config/categories.toml");

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryEntry {
    pub name: String,
    #[serde(default)]
    pub cuisines: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CategoryFile {
    #[serde(default, rename = "category")]
    categories: Vec<CategoryEntry>,
}

/// Category names in configuration order, each with its cuisine list.
#[derive(Debug, Clone, Default)]
pub struct CategoryMap {
    entries: Vec<CategoryEntry>,
    index: HashMap<String, usize>,
}

impl CategoryMap {
    /// # Errors
    /// Returns `Config` if a category name appears twice.
    pub fn from_entries(entries: Vec<CategoryEntry>) -> Result<Self, DirectoryError> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, e) in entries.iter().enumerate() {
            if index.insert(e.name.clone(), i).is_some() {
                return Err(DirectoryError::Config(format!("duplicate category `{}`", e.name)));
            }
        }
        Ok(Self { entries, index })
    }

    /// # Errors
    /// Returns `Config` on malformed TOML or duplicate names.
    pub fn from_toml_str(s: &str) -> Result<Self, DirectoryError> {
        let file: CategoryFile = toml::from_str(s)?;
        Self::from_entries(file.categories)
    }

    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| DirectoryError::Io(format!("{}: {e}", path.display())))?;
        let map = Self::from_toml_str(&s)?;
        log::info!("loaded {} categories from {}", map.len(), path.display());
        Ok(map)
    }

    /// The table compiled into the binary.
    ///
    /// # Errors
    /// Only if the bundled table is malformed.
    pub fn builtin() -> Result<Self, DirectoryError> {
        Self::from_toml_str(BUILTIN_CATEGORIES)
    }

    /// The table named by `categories_path`, or the built-in one when unset.
    /// Never touches the restaurant data file.
    ///
    /// # Errors
    /// Returns an error if the configured file cannot be read or parsed.
    pub fn from_config(config: &AppConfig) -> Result<Self, DirectoryError> {
        match &config.categories_path {
            Some(p) => Self::load(p),
            None => Self::builtin(),
        }
    }

    /// Cuisines grouped under `name` (exact, case-sensitive match).
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&[String]> {
        self.index.get(name).map(|&i| self.entries[i].cuisines.as_slice())
    }

    /// Union of the cuisines of every known name, de-duplicated in first-seen
    /// order. Unknown names contribute nothing.
    #[must_use]
    pub fn resolve_all<'a, I>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut out: Vec<String> = Vec::new();
        for cuisine in names.into_iter().filter_map(|n| self.resolve(n)).flatten() {
            if !out.contains(cuisine) {
                out.push(cuisine.clone());
            }
        }
        out
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
