//! Menu list panel widget
//!
//! Editable, reorderable list of the wheel's items

pub mod menu_events;
mod menu_list;

pub use menu_list::{IMAGE_EXTENSIONS, MenuListActions, MenuListState, render_menu_list};
