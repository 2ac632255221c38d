//! Editable menu list feeding the wheel.
//!
//! Every mutation bumps `revision` so the host can tell the engine the item
//! list changed (and auto-save it) without diffing.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::item::Item;

/// Items loaded by "try the sample menu"
pub const SAMPLE_ITEMS: &[&str] = &[
    "醤油ラーメン",
    "カツカレー",
    "カルボナーラ",
    "特上牛丼",
    "おまかせ握り寿司",
    "天ぷら定食",
];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MenuError {
    #[error("menu item name is empty")]
    EmptyLabel,

    #[error("no menu item with id {0}")]
    NotFound(Uuid),
}

/// Ordered list of menu items
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MenuList {
    items: Vec<Item>,
    #[serde(skip)]
    revision: u64,
}

impl MenuList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<Item>) -> Self {
        Self { items, revision: 0 }
    }

    /// Fresh items for each non-blank label, trimmed, in order
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        let items = labels
            .iter()
            .map(|l| l.as_ref().trim())
            .filter(|l| !l.is_empty())
            .map(Item::new)
            .collect();
        Self::from_items(items)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Move the item at `from` into slot `to`, where `to` counts positions
    /// before the removal (drag-and-drop insertion index). Out-of-range
    /// moves and no-ops leave the revision alone.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if from >= self.items.len() || to > self.items.len() || to == from || to == from + 1 {
            return false;
        }
        let item = self.items.remove(from);
        let to = if to > from { to - 1 } else { to };
        self.items.insert(to, item);
        self.touch();
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: Uuid) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Append a trimmed label. Blank labels are refused.
    pub fn add(&mut self, label: &str) -> Result<&Item, MenuError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(MenuError::EmptyLabel);
        }
        self.items.push(Item::new(label));
        self.touch();
        debug!("Menu item added: {}", label);
        Ok(&self.items[self.items.len() - 1])
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Item, MenuError> {
        let pos = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(MenuError::NotFound(id))?;
        let removed = self.items.remove(pos);
        self.touch();
        debug!("Menu item removed: {}", removed.label);
        Ok(removed)
    }

    /// Change a label, keeping the item's id and position
    pub fn rename(&mut self, id: Uuid, label: &str) -> Result<(), MenuError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(MenuError::EmptyLabel);
        }
        let slot = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(MenuError::NotFound(id))?;
        *slot = slot.relabeled(label);
        self.touch();
        Ok(())
    }

    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            self.items.clear();
            self.touch();
            info!("Menu cleared");
        }
    }

    /// Replace all items
    pub fn replace(&mut self, items: Vec<Item>) {
        self.items = items;
        self.touch();
    }

    pub fn load_sample(&mut self) {
        self.replace(Self::from_labels(SAMPLE_ITEMS).items);
        info!("Sample menu loaded ({} items)", self.items.len());
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_trims_and_rejects_blank() {
        let mut menu = MenuList::new();
        let id = menu.add("  Soba  ").unwrap().id;
        assert_eq!(menu.get(id).unwrap().label, "Soba");
        assert_eq!(menu.add("   "), Err(MenuError::EmptyLabel));
        assert_eq!(menu.len(), 1);
        assert_eq!(menu.revision(), 1);
    }

    #[test]
    fn test_remove_and_rename() {
        let mut menu = MenuList::from_labels(&["A", "B", "C"]);
        let b = menu.items()[1].id;

        menu.rename(b, " Bee ").unwrap();
        assert_eq!(menu.items()[1].label, "Bee");
        assert_eq!(menu.items()[1].id, b);
        assert_eq!(menu.rename(b, ""), Err(MenuError::EmptyLabel));

        let removed = menu.remove(b).unwrap();
        assert_eq!(removed.label, "Bee");
        assert_eq!(menu.len(), 2);
        assert_eq!(menu.remove(b), Err(MenuError::NotFound(b)));
    }

    #[test]
    fn test_move_item() {
        let mut menu = MenuList::from_labels(&["A", "B", "C", "D"]);
        let labels = |m: &MenuList| m.items().iter().map(|i| i.label.clone()).collect::<Vec<_>>();

        assert!(menu.move_item(0, 4));
        assert_eq!(labels(&menu), vec!["B", "C", "D", "A"]);
        assert!(menu.move_item(3, 1));
        assert_eq!(labels(&menu), vec!["B", "A", "C", "D"]);

        let rev = menu.revision();
        assert!(!menu.move_item(1, 2));
        assert!(!menu.move_item(9, 0));
        assert_eq!(menu.revision(), rev);
    }

    #[test]
    fn test_from_labels_skips_blank() {
        let menu = MenuList::from_labels(&["Udon", "", "  ", " Tempura "]);
        let labels: Vec<_> = menu.items().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Udon", "Tempura"]);
    }

    #[test]
    fn test_sample_and_clear_bump_revision() {
        let mut menu = MenuList::new();
        menu.clear();
        assert_eq!(menu.revision(), 0);

        menu.load_sample();
        assert_eq!(menu.len(), SAMPLE_ITEMS.len());
        let rev = menu.revision();
        menu.clear();
        assert!(menu.is_empty());
        assert!(menu.revision() > rev);
    }
}
