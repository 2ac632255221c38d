//! Named menu snapshots: save, load, delete, import and export.
//!
//! The whole collection lives in one JSON array file. Import appends; it
//! never replaces what is already there.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::item::Item;

/// File name of the saved list collection inside the data directory
pub const SAVED_LISTS_FILE: &str = "menu_roulette_saved_lists.json";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SaveListError {
    #[error("list name is empty")]
    EmptyName,

    #[error("there are no menu items to save")]
    EmptyList,
}

/// One saved menu, shaped like the exported JSON
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedMenuList {
    pub id: Uuid,
    pub name: String,
    pub items: Vec<Item>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Collection of saved lists backed by a JSON file
#[derive(Debug, Default)]
pub struct SavedLists {
    lists: Vec<SavedMenuList>,
    path: Option<PathBuf>,
}

impl SavedLists {
    /// In-memory collection, never written to disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from `path`. A missing file is an empty collection; a corrupt one
    /// is logged and treated as empty so the app still starts.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lists = if path.exists() {
            match read_lists(&path) {
                Ok(lists) => lists,
                Err(e) => {
                    warn!("Ignoring unreadable saved lists {}: {:#}", path.display(), e);
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };
        info!("Saved lists: {} from {}", lists.len(), path.display());
        Self { lists, path: Some(path) }
    }

    pub fn lists(&self) -> &[SavedMenuList] {
        &self.lists
    }

    pub fn get(&self, id: Uuid) -> Option<&SavedMenuList> {
        self.lists.iter().find(|l| l.id == id)
    }

    /// Snapshot `items` under `name`. Both must be non-empty.
    pub fn save_current(&mut self, name: &str, items: &[Item]) -> Result<&SavedMenuList> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SaveListError::EmptyName.into());
        }
        if items.is_empty() {
            return Err(SaveListError::EmptyList.into());
        }
        let now = Utc::now();
        self.lists.push(SavedMenuList {
            id: Uuid::new_v4(),
            name: name.to_string(),
            items: items.to_vec(),
            created_at: now,
            updated_at: now,
        });
        self.persist()?;
        info!("Saved menu list '{}' ({} items)", name, items.len());
        Ok(&self.lists[self.lists.len() - 1])
    }

    /// Remove a list; returns it if it existed
    pub fn delete(&mut self, id: Uuid) -> Result<Option<SavedMenuList>> {
        let Some(pos) = self.lists.iter().position(|l| l.id == id) else {
            return Ok(None);
        };
        let removed = self.lists.remove(pos);
        self.persist()?;
        info!("Deleted menu list '{}'", removed.name);
        Ok(Some(removed))
    }

    /// Write every list to `path` as pretty JSON
    pub fn export_to(&self, path: &Path) -> Result<()> {
        write_lists(path, &self.lists)?;
        info!("Exported {} menu lists to {}", self.lists.len(), path.display());
        Ok(())
    }

    /// Append every list found in `path`; returns how many were added.
    pub fn import_from(&mut self, path: &Path) -> Result<usize> {
        let imported = read_lists(path)?;
        let count = imported.len();
        self.lists.extend(imported);
        self.persist()?;
        info!("Imported {} menu lists from {}", count, path.display());
        Ok(count)
    }

    fn persist(&self) -> Result<()> {
        match self.path {
            Some(ref path) => write_lists(path, &self.lists),
            None => Ok(()),
        }
    }
}

/// Default export file name for `date`: `menu-lists-YYYY-MM-DD.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("menu-lists-{}.json", date.format("%Y-%m-%d"))
}

fn read_lists(path: &Path) -> Result<Vec<SavedMenuList>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    if !value.is_array() {
        bail!("{} does not contain a list array", path.display());
    }
    serde_json::from_value(value)
        .with_context(|| format!("Unexpected list format in {}", path.display()))
}

fn write_lists(path: &Path, lists: &[SavedMenuList]) -> Result<()> {
    let json = serde_json::to_string_pretty(lists)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(labels: &[&str]) -> Vec<Item> {
        labels.iter().map(|l| Item::new(*l)).collect()
    }

    #[test]
    fn test_save_requires_name_and_items() {
        let mut lists = SavedLists::in_memory();
        let err = lists.save_current("  ", &items(&["A"])).unwrap_err();
        assert_eq!(err.downcast_ref::<SaveListError>(), Some(&SaveListError::EmptyName));

        let err = lists.save_current("Lunch", &[]).unwrap_err();
        assert_eq!(err.downcast_ref::<SaveListError>(), Some(&SaveListError::EmptyList));

        let saved = lists.save_current(" Lunch ", &items(&["A", "B"])).unwrap();
        assert_eq!(saved.name, "Lunch");
        assert_eq!(saved.created_at, saved.updated_at);
        assert_eq!(lists.lists().len(), 1);
    }

    #[test]
    fn test_persist_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.json");

        let mut lists = SavedLists::open(&path);
        let id = lists.save_current("Dinner", &items(&["Sushi", "Ramen"])).unwrap().id;

        let reopened = SavedLists::open(&path);
        assert_eq!(reopened.lists().len(), 1);
        assert_eq!(reopened.get(id).unwrap().items.len(), 2);

        let mut reopened = reopened;
        assert!(reopened.delete(id).unwrap().is_some());
        assert!(reopened.delete(id).unwrap().is_none());
        assert!(SavedLists::open(&path).lists().is_empty());
    }

    #[test]
    fn test_export_then_import_appends() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("export.json");

        let mut source = SavedLists::in_memory();
        source.save_current("One", &items(&["A", "B"])).unwrap();
        source.save_current("Two", &items(&["C", "D"])).unwrap();
        source.export_to(&export).unwrap();

        let mut target = SavedLists::in_memory();
        target.save_current("Mine", &items(&["X", "Y"])).unwrap();
        assert_eq!(target.import_from(&export).unwrap(), 2);
        let names: Vec<_> = target.lists().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Mine", "One", "Two"]);
    }

    #[test]
    fn test_import_rejects_non_array_and_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let obj = dir.path().join("obj.json");
        std::fs::write(&obj, r#"{"name":"x"}"#).unwrap();
        let junk = dir.path().join("junk.json");
        std::fs::write(&junk, "not json").unwrap();

        let mut lists = SavedLists::in_memory();
        assert!(lists.import_from(&obj).is_err());
        assert!(lists.import_from(&junk).is_err());
        assert!(lists.lists().is_empty());
    }

    #[test]
    fn test_corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.json");
        std::fs::write(&path, "{{{").unwrap();
        assert!(SavedLists::open(&path).lists().is_empty());
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(export_file_name(date), "menu-lists-2026-03-09.json");
    }
}
