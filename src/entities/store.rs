//! Auto-saved current menu.
//!
//! The working list is written after every change as long as it has items,
//! and read back on startup. An empty list is never written, so clearing
//! the wheel and quitting keeps the last real menu around; [`MenuStore::forget`]
//! is the way to drop it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::{debug, warn};

use super::item::Item;

/// File name of the auto-saved list inside the data directory
pub const CURRENT_LIST_FILE: &str = "menu_roulette_items.json";

#[derive(Debug, Clone)]
pub struct MenuStore {
    path: PathBuf,
}

impl MenuStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Previously saved items, or an empty list if there is nothing usable
    pub fn load(&self) -> Vec<Item> {
        if !self.path.exists() {
            return Vec::new();
        }
        match read_items(&self.path) {
            Ok(items) => {
                debug!("Restored {} menu items from {}", items.len(), self.path.display());
                items
            }
            Err(e) => {
                warn!("Ignoring saved menu {}: {:#}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    /// Write `items`; returns false (and writes nothing) for an empty list.
    pub fn save(&self, items: &[Item]) -> Result<bool> {
        if items.is_empty() {
            return Ok(false);
        }
        let json = serde_json::to_string(items)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        debug!("Saved {} menu items", items.len());
        Ok(true)
    }

    /// Delete the saved list; returns false if there was none.
    pub fn forget(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed {}", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }
}

/// Read a JSON array of items (also the format of the CLI `--menu` file)
pub fn read_items(path: &Path) -> Result<Vec<Item>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))?;
    if !value.is_array() {
        bail!("{} does not contain an item array", path.display());
    }
    Ok(serde_json::from_value(value)?)
}

/// Menu file given on the command line.
///
/// `.json` files are item arrays; anything else is plain text with one
/// label per line (blank lines skipped).
pub fn load_menu_file(path: &Path) -> Result<Vec<Item>> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        return read_items(path);
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Item::new)
        .collect())
}
