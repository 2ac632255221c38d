//! UI Widgets - modular, reusable UI components
//!
//! Each widget is self-contained and communicates via EventBus

pub mod menu_list;
pub mod status;
pub mod wheel;
