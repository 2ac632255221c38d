//! Saved lists window - named menu snapshots, import and export

mod saved_lists;
pub mod saved_lists_events;

pub use saved_lists::SavedListsDialog;
