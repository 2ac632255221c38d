//! Event handling for RouletteApp.
//!
//! Widgets and dialogs never touch app state directly: they emit events on
//! the bus (or return them as actions) and everything is applied here, once
//! per frame, after the engine has been pumped.

use log::{debug, info, warn};

use super::RouletteApp;
use crate::core::event_bus::{BoxedEvent, downcast_event};
use crate::core::spin_events::*;
use crate::dialogs::prefs::prefs_events::*;
use crate::dialogs::saved_lists::saved_lists_events::*;
use crate::widgets::menu_list::menu_events::*;
use crate::widgets::status::MessageKind;

impl RouletteApp {
    /// Apply everything queued on the bus plus `extra` widget actions.
    pub fn handle_events(&mut self, extra: Vec<BoxedEvent>, now: f64) {
        let mut events = self.event_bus.poll();
        events.extend(extra);

        for event in events {
            // === Engine -> host ===
            if let Some(e) = downcast_event::<SpinUpdatedEvent>(&event) {
                self.snapshot = e.0.clone();
                continue;
            }
            if let Some(e) = downcast_event::<WinnerSelectedEvent>(&event) {
                info!("Winner: #{} {}", e.index, e.item.label);
                self.winner_index = Some(e.index);
                self.status_bar
                    .set_message(format!("Today's pick: {}", e.item.label), MessageKind::Info, now);
                continue;
            }
            if let Some(e) = downcast_event::<SpinRejectedEvent>(&event) {
                self.status_bar.set_message(e.0.to_string(), MessageKind::Error, now);
                continue;
            }

            // === Host -> engine ===
            if downcast_event::<StartSpinEvent>(&event).is_some() {
                // Pick up edits made since the last sync before launching
                self.sync_menu();
                self.winner_index = None;
                if let Err(e) = self.engine.start() {
                    debug!("Start refused: {}", e);
                }
                continue;
            }
            if downcast_event::<StopSpinEvent>(&event).is_some() {
                self.engine.request_stop();
                continue;
            }
            if downcast_event::<ResetSpinEvent>(&event).is_some() {
                self.engine.reset();
                self.winner_index = None;
                continue;
            }

            // === Preferences ===
            if downcast_event::<ToggleSettingsEvent>(&event).is_some() {
                self.show_settings = !self.show_settings;
                continue;
            }
            if downcast_event::<ToggleSavedListsEvent>(&event).is_some() {
                self.settings.show_saved_lists = !self.settings.show_saved_lists;
                continue;
            }
            if downcast_event::<ResetSettingsEvent>(&event).is_some() {
                self.reset_settings_pending = true;
                continue;
            }
            if downcast_event::<AudioEnabledChangedEvent>(&event).is_some() {
                self.apply_audio_setting();
                continue;
            }
            if downcast_event::<SpinParamsChangedEvent>(&event).is_some() {
                if let Err(e) = self.engine.set_params(self.settings.spin) {
                    warn!("Spin settings rejected: {}", e);
                    self.status_bar.set_message(e.to_string(), MessageKind::Error, now);
                }
                continue;
            }

            // === Saved lists ===
            if let Some(e) = downcast_event::<SaveListEvent>(&event) {
                let result = self
                    .saved_lists
                    .save_current(&e.0, self.menu.items())
                    .map(|list| format!("Saved \"{}\"", list.name));
                self.report(result, now);
                continue;
            }
            if let Some(e) = downcast_event::<DeleteSavedListEvent>(&event) {
                let result = self
                    .saved_lists
                    .delete(e.0)
                    .map(|removed| match removed {
                        Some(list) => format!("Deleted \"{}\"", list.name),
                        None => "List already deleted".to_string(),
                    });
                self.report(result, now);
                continue;
            }
            if let Some(e) = downcast_event::<ImportListsEvent>(&event) {
                self.remember_dir(&e.0);
                let result = self
                    .saved_lists
                    .import_from(&e.0)
                    .map(|count| format!("Imported {} lists", count));
                self.report(result, now);
                continue;
            }
            if let Some(e) = downcast_event::<ExportListsEvent>(&event) {
                self.remember_dir(&e.0);
                let result = self
                    .saved_lists
                    .export_to(&e.0)
                    .map(|_| format!("Exported to {}", e.0.display()));
                self.report(result, now);
                continue;
            }

            // Everything below edits the menu, which is frozen mid-spin
            if self.engine.state().is_active() {
                if is_menu_edit(&event) {
                    self.status_bar
                        .set_message("Wait for the wheel to stop", MessageKind::Error, now);
                }
                continue;
            }

            // === Menu list ===
            if let Some(e) = downcast_event::<AddItemEvent>(&event) {
                if let Err(err) = self.menu.add(&e.0) {
                    self.status_bar.set_message(err.to_string(), MessageKind::Error, now);
                }
                continue;
            }
            if let Some(e) = downcast_event::<RemoveItemEvent>(&event) {
                if let Err(err) = self.menu.remove(e.0) {
                    warn!("{}", err);
                }
                continue;
            }
            if let Some(e) = downcast_event::<RenameItemEvent>(&event) {
                if let Err(err) = self.menu.rename(e.id, &e.label) {
                    self.status_bar.set_message(err.to_string(), MessageKind::Error, now);
                }
                continue;
            }
            if let Some(e) = downcast_event::<MoveItemEvent>(&event) {
                self.menu.move_item(e.from, e.to);
                continue;
            }
            if downcast_event::<ClearItemsEvent>(&event).is_some() {
                self.menu.clear();
                continue;
            }
            if downcast_event::<LoadSampleEvent>(&event).is_some() {
                self.menu.load_sample();
                continue;
            }
            if downcast_event::<StartOverEvent>(&event).is_some() {
                info!("Starting over");
                self.menu.clear();
                self.winner_index = None;
                // A photo still being read would refill the menu
                self.extraction = None;
                let result = match &self.store {
                    Some(store) => store.forget().map(|_| "Started over".to_string()),
                    None => Ok("Started over".to_string()),
                };
                self.report(result, now);
                continue;
            }
            if let Some(e) = downcast_event::<OpenMenuFileEvent>(&event) {
                self.open_menu_file(&e.0, now);
                continue;
            }
            if let Some(e) = downcast_event::<ExtractFromImageEvent>(&event) {
                self.start_extraction(e.0.clone(), now);
                continue;
            }

            if let Some(e) = downcast_event::<LoadSavedListEvent>(&event) {
                match self.saved_lists.get(e.0) {
                    Some(list) => {
                        let message = format!("Loaded \"{}\"", list.name);
                        self.menu.replace(list.items.clone());
                        self.status_bar.set_message(message, MessageKind::Info, now);
                    }
                    None => warn!("Saved list {} not found", e.0),
                }
                continue;
            }
            debug!("Unhandled event: {}", (*event).type_name());
        }
    }

    /// Status bar message for a plumbing result
    fn report(&mut self, result: anyhow::Result<String>, now: f64) {
        match result {
            Ok(message) => self.status_bar.set_message(message, MessageKind::Info, now),
            Err(e) => {
                warn!("{:#}", e);
                self.status_bar.set_message(format!("{:#}", e), MessageKind::Error, now);
            }
        }
    }
}

fn is_menu_edit(event: &BoxedEvent) -> bool {
    downcast_event::<AddItemEvent>(event).is_some()
        || downcast_event::<RemoveItemEvent>(event).is_some()
        || downcast_event::<RenameItemEvent>(event).is_some()
        || downcast_event::<MoveItemEvent>(event).is_some()
        || downcast_event::<ClearItemsEvent>(event).is_some()
        || downcast_event::<LoadSampleEvent>(event).is_some()
        || downcast_event::<StartOverEvent>(event).is_some()
        || downcast_event::<OpenMenuFileEvent>(event).is_some()
        || downcast_event::<ExtractFromImageEvent>(event).is_some()
        || downcast_event::<LoadSavedListEvent>(event).is_some()
}
