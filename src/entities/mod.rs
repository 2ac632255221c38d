//! Entities - menu items, the editable menu, and their persistence.

pub mod item;
pub mod menu;
pub mod saved_lists;
pub mod store;

pub use item::{Item, truncate_label};
pub use menu::{MenuError, MenuList, SAMPLE_ITEMS};
pub use saved_lists::{SaveListError, SavedLists, SavedMenuList};
pub use store::{MenuStore, load_menu_file};
