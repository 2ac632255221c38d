//! Core engine modules - spin engine, geometry, scheduling, audio cues, events
//!
//! Nothing in here touches egui; the desktop host and the headless runner
//! both drive the same engine.

pub mod audio;
pub mod engine;
pub mod event_bus;
pub mod layout;
pub mod params;
pub mod scheduler;
pub mod spin_events;

pub use audio::{AudioCue, AudioCueSink, NullAudio, RecordingAudio};
pub use engine::{MIN_ITEMS, SpinEngine, SpinError, SpinSnapshot, SpinState};
pub use event_bus::{EventBus, EventEmitter, SpinEventEmitter, downcast_event};
pub use layout::{WheelLayout, resolve_winner_index};
pub use params::SpinParams;
pub use scheduler::{FrameHandle, FrameQueue, FrameScheduler, QueuedScheduler};
