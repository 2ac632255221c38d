//! Application module - RouletteApp and related functionality.
//!
//! - `events` - event bus handling (spin commands, menu edits, saved lists)
//! - `menu_io` - file import/export and photo extraction
//! - `run` - eframe::App implementation (frame pump, layout, persistence)

mod events;
mod menu_io;
mod run;

use std::sync::Arc;

use crossbeam_channel::Receiver;
use eframe::egui;
use log::{info, warn};

use crate::config::{self, PathConfig};
use crate::core::event_bus::{EventBus, SpinEventEmitter};
use crate::core::{AudioCueSink, FrameQueue, NullAudio, QueuedScheduler, SpinEngine, SpinSnapshot};
use crate::dialogs::prefs::AppSettings;
use crate::dialogs::saved_lists::SavedListsDialog;
use crate::entities::saved_lists::SAVED_LISTS_FILE;
use crate::entities::store::CURRENT_LIST_FILE;
use crate::entities::{Item, MenuList, MenuStore, SavedLists};
use crate::widgets::menu_list::MenuListState;
use crate::widgets::status::StatusBar;

/// Result of a background photo extraction
pub type ExtractionResult = Result<Vec<String>, String>;

/// Main application state.
///
/// Only `settings` survives restarts through eframe storage; the menu is
/// persisted separately by [`MenuStore`] so it can be shared with the
/// headless mode.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct RouletteApp {
    pub settings: AppSettings,
    #[serde(skip)]
    pub menu: MenuList,
    #[serde(skip)]
    pub engine: SpinEngine,
    #[serde(skip)]
    pub frame_queue: FrameQueue,
    /// Latest engine snapshot, updated from `SpinUpdatedEvent`
    #[serde(skip)]
    pub snapshot: SpinSnapshot,
    /// Slice index of the last winner, for highlighting
    #[serde(skip)]
    pub winner_index: Option<usize>,
    /// Global event bus for application-wide events
    #[serde(skip)]
    pub event_bus: EventBus,
    #[serde(skip)]
    pub store: Option<MenuStore>,
    #[serde(skip)]
    pub saved_lists: SavedLists,
    #[serde(skip)]
    pub path_config: PathConfig,
    #[serde(skip)]
    pub status_bar: StatusBar,
    #[serde(skip)]
    pub menu_list_state: MenuListState,
    #[serde(skip)]
    pub saved_lists_dialog: SavedListsDialog,
    #[serde(skip)]
    pub show_settings: bool,
    #[serde(skip)]
    pub reset_settings_pending: bool,
    /// Menu revision last handed to the engine
    #[serde(skip)]
    pub synced_revision: Option<u64>,
    /// Menu revision last written by the store
    #[serde(skip)]
    pub saved_revision: Option<u64>,
    /// Running photo extraction, if any
    #[serde(skip)]
    pub extraction: Option<Receiver<ExtractionResult>>,
}

impl Default for RouletteApp {
    fn default() -> Self {
        let frame_queue = FrameQueue::new();
        let event_bus = EventBus::new();
        let engine = Self::build_engine(&frame_queue, &event_bus, None, Arc::new(NullAudio));

        Self {
            settings: AppSettings::default(),
            menu: MenuList::new(),
            snapshot: engine.snapshot(),
            engine,
            frame_queue,
            winner_index: None,
            event_bus,
            store: None,
            saved_lists: SavedLists::in_memory(),
            path_config: PathConfig::default(),
            status_bar: StatusBar::new(),
            menu_list_state: MenuListState::default(),
            saved_lists_dialog: SavedListsDialog::new(),
            show_settings: false,
            reset_settings_pending: false,
            synced_revision: None,
            saved_revision: None,
            extraction: None,
        }
    }
}

impl RouletteApp {
    /// Engine wired to the app's frame queue and event bus.
    ///
    /// With a context, every frame request also wakes egui so the animation
    /// keeps running without input.
    fn build_engine(
        queue: &FrameQueue,
        bus: &EventBus,
        ctx: Option<egui::Context>,
        audio: Arc<dyn AudioCueSink>,
    ) -> SpinEngine {
        let scheduler = match ctx {
            Some(ctx) => QueuedScheduler::with_waker(queue.clone(), move || ctx.request_repaint()),
            None => QueuedScheduler::new(queue.clone()),
        };
        let mut engine = SpinEngine::new(Box::new(scheduler), audio);
        engine.set_event_emitter(SpinEventEmitter::from_emitter(bus.emitter()));
        engine
    }

    /// Finish setup after eframe restored `settings`: real scheduler,
    /// audio, persisted menu and saved lists.
    pub fn init(&mut self, ctx: &egui::Context, path_config: PathConfig, initial_items: Option<Vec<Item>>) {
        self.path_config = path_config;

        let audio = make_audio(self.settings.audio_enabled);
        self.engine = Self::build_engine(&self.frame_queue, &self.event_bus, Some(ctx.clone()), audio);
        if let Err(e) = self.engine.set_params(self.settings.spin) {
            warn!("Stored spin settings rejected ({}), using defaults", e);
            self.settings.spin = Default::default();
        }

        let store = MenuStore::new(config::data_file(CURRENT_LIST_FILE, &self.path_config));
        let items = match initial_items {
            Some(items) => items,
            None => store.load(),
        };
        info!("Starting with {} menu items", items.len());
        self.menu.replace(items);
        self.store = Some(store);

        self.saved_lists = SavedLists::open(config::data_file(SAVED_LISTS_FILE, &self.path_config));
        self.snapshot = self.engine.snapshot();
    }

    /// Push menu edits to the engine (only while it is not running)
    /// and auto-save them.
    pub fn sync_menu(&mut self) {
        let revision = self.menu.revision();

        if self.synced_revision != Some(revision) && !self.engine.state().is_active() {
            if let Err(e) = self.engine.set_items(self.menu.items().to_vec()) {
                warn!("Wheel not updated: {}", e);
            } else {
                self.synced_revision = Some(revision);
                self.winner_index = None;
            }
        }

        if self.saved_revision != Some(revision) {
            self.saved_revision = Some(revision);
            if let Some(store) = &self.store
                && let Err(e) = store.save(self.menu.items())
            {
                warn!("Auto-save failed: {:#}", e);
            }
        }
    }

    /// Rebuild the audio sink after the setting changed
    pub fn apply_audio_setting(&mut self) {
        self.engine.set_audio(make_audio(self.settings.audio_enabled));
    }
}

/// Sound output for the engine: real device when enabled and available.
pub fn make_audio(enabled: bool) -> Arc<dyn AudioCueSink> {
    if !enabled {
        return Arc::new(NullAudio);
    }
    #[cfg(feature = "audio")]
    {
        match crate::synth::cpal_sink::CpalAudio::new() {
            Ok(sink) => return Arc::new(sink),
            Err(e) => warn!("Audio unavailable, continuing muted: {:#}", e),
        }
    }
    Arc::new(NullAudio)
}
