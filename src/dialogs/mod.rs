//! Dialog windows - settings and saved lists

pub mod prefs;
pub mod saved_lists;
