//! Menu Roulette - spin a wheel of menu items and let it pick.
//!
//! Re-exports all modules for use by the binary target.

// Core engine (spin engine, scheduling, events, audio cues)
pub mod core;

// Menu items, persistence, photo extraction, sound synthesis
pub mod entities;
pub mod extract;
pub mod synth;

// App modules
pub mod app;
pub mod cli;
pub mod config;
pub mod dialogs;
pub mod headless;
pub mod runner;
pub mod widgets;

// Re-export commonly used types from core
pub use core::event_bus::{BoxedEvent, EventBus, EventEmitter, downcast_event};
pub use core::{SpinEngine, SpinParams, SpinSnapshot, SpinState};

// Re-export entities
pub use entities::{Item, MenuList, SavedLists};
