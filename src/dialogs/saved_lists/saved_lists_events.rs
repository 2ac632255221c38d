//! Saved list window events.

use std::path::PathBuf;

use uuid::Uuid;

/// Snapshot the current menu under a name
#[derive(Clone, Debug)]
pub struct SaveListEvent(pub String);

/// Replace the current menu with a saved list's items
#[derive(Clone, Debug)]
pub struct LoadSavedListEvent(pub Uuid);

#[derive(Clone, Debug)]
pub struct DeleteSavedListEvent(pub Uuid);

#[derive(Clone, Debug)]
pub struct ImportListsEvent(pub PathBuf);

#[derive(Clone, Debug)]
pub struct ExportListsEvent(pub PathBuf);
