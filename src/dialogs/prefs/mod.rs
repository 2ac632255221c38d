//! Preferences - persisted app settings and the settings window

mod prefs;
pub mod prefs_events;

pub use prefs::{AppSettings, render_settings_window};
