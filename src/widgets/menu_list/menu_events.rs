//! Menu list widget events.

use std::path::PathBuf;

use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct AddItemEvent(pub String);

#[derive(Clone, Debug)]
pub struct RemoveItemEvent(pub Uuid);

#[derive(Clone, Debug)]
pub struct RenameItemEvent {
    pub id: Uuid,
    pub label: String,
}

/// Drag-and-drop move; `to` is the insertion slot before removal
#[derive(Clone, Debug)]
pub struct MoveItemEvent {
    pub from: usize,
    pub to: usize,
}

#[derive(Clone, Debug)]
pub struct ClearItemsEvent;

#[derive(Clone, Debug)]
pub struct LoadSampleEvent;

/// Confirmed "Start over": empty the menu and forget the auto-saved copy
#[derive(Clone, Debug)]
pub struct StartOverEvent;

/// Photo of a menu to run through the extractor chain
#[derive(Clone, Debug)]
pub struct ExtractFromImageEvent(pub PathBuf);

/// JSON or text menu file replacing the current items
#[derive(Clone, Debug)]
pub struct OpenMenuFileEvent(pub PathBuf);
