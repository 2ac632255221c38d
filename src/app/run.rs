//! Main application loop - eframe::App implementation.
//!
//! Each frame:
//! - pumps the engine with the frame requests it queued since last time
//! - renders panels, which hand back their actions as events
//! - applies all events, then pushes menu edits to the wheel

use eframe::egui;
use log::{debug, info, trace, warn};

use crate::app::RouletteApp;
use crate::core::SpinState;
use crate::core::event_bus::BoxedEvent;
use crate::core::spin_events::{ResetSpinEvent, StartSpinEvent, StopSpinEvent};
use crate::dialogs::prefs::prefs_events::{ToggleSavedListsEvent, ToggleSettingsEvent};
use crate::dialogs::prefs::{AppSettings, render_settings_window};
use crate::widgets::menu_list::menu_events::{ExtractFromImageEvent, OpenMenuFileEvent};
use crate::widgets::menu_list::{IMAGE_EXTENSIONS, render_menu_list};
use crate::widgets::wheel::render_wheel;

/// Width of the item list panel
const MENU_PANEL_WIDTH: f32 = 280.0;

impl eframe::App for RouletteApp {
    /// Main frame update - called every frame by eframe.
    ///
    /// Flow:
    /// 1. Apply theme and font settings
    /// 2. Run frame callbacks the engine requested
    /// 3. Pick up finished photo extraction and dropped files
    /// 4. Render UI (top bar, menu list, wheel, status bar, windows)
    /// 5. Apply events, sync menu edits to the wheel
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply theme based on settings
        if self.settings.dark_mode {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }

        // Apply font size from settings
        let mut style = (*ctx.style()).clone();
        for (_, font_id) in style.text_styles.iter_mut() {
            font_id.size = self.settings.font_size;
        }
        ctx.set_style(style);

        // Apply pending settings reset requested via events
        if self.reset_settings_pending {
            self.reset_settings();
            self.reset_settings_pending = false;
        }

        let (now, dt) = ctx.input(|i| (i.time, i.stable_dt as f64));

        // Frame callbacks requested since the last paint
        for handle in self.frame_queue.take_due() {
            self.engine.on_frame(handle, dt);
        }

        self.poll_extraction(now);
        if self.extraction.is_some() {
            // Keep polling while the OCR thread works
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        let mut actions: Vec<BoxedEvent> = Vec::new();
        self.handle_dropped_files(ctx, &mut actions);
        self.handle_keyboard_input(ctx);

        let active = self.engine.state().is_active();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let can_start = !active && self.menu.len() >= crate::core::MIN_ITEMS;
                if ui
                    .add_enabled(can_start, egui::Button::new("Spin"))
                    .on_hover_text("Space")
                    .clicked()
                {
                    self.event_bus.emit(StartSpinEvent);
                }
                let can_stop = self.engine.state() == SpinState::Spinning;
                if ui
                    .add_enabled(can_stop, egui::Button::new("Stop"))
                    .on_hover_text("Space")
                    .clicked()
                {
                    self.event_bus.emit(StopSpinEvent);
                }
                if ui
                    .add_enabled(!active, egui::Button::new("Reset"))
                    .clicked()
                {
                    self.event_bus.emit(ResetSpinEvent);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Settings").clicked() {
                        self.event_bus.emit(ToggleSettingsEvent);
                    }
                    if ui
                        .selectable_label(self.settings.show_saved_lists, "Saved lists")
                        .clicked()
                    {
                        self.event_bus.emit(ToggleSavedListsEvent);
                    }
                    if self.extraction.is_some() {
                        ui.spinner();
                        ui.label("Reading photo...");
                    }
                });
            });
        });

        // Expire old messages BEFORE laying out panels
        self.status_bar.expire(now);
        self.status_bar.render(ctx, &self.snapshot, self.engine.items().len());

        egui::SidePanel::left("menu_list")
            .resizable(true)
            .default_width(MENU_PANEL_WIDTH)
            .show(ctx, |ui| {
                ui.heading("Menu");
                let list_actions = render_menu_list(ui, &mut self.menu_list_state, self.menu.items(), active);
                actions.extend(list_actions.events);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let winner = match self.snapshot.state {
                SpinState::Finished => self.winner_index,
                _ => None,
            };
            if self.snapshot.state == SpinState::Finished
                && let Some(item) = &self.snapshot.winner
            {
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new(&item.label).size(self.settings.font_size * 2.0).strong());
                });
            }
            ui.vertical_centered(|ui| {
                render_wheel(ui, self.engine.items(), self.snapshot.rotation, winner);
            });
        });

        // Settings window
        if self.show_settings {
            render_settings_window(ctx, &mut self.show_settings, &mut self.settings, &self.event_bus);
        }

        // Saved lists window
        if self.settings.show_saved_lists {
            self.saved_lists_dialog.render(
                ctx,
                &mut self.settings.show_saved_lists,
                &self.saved_lists,
                !self.menu.is_empty(),
                active,
                self.settings.last_export_dir.as_deref(),
                &self.event_bus,
            );
        }

        self.handle_events(actions, now);
        self.sync_menu();
    }

    /// Save app state to persistent storage.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match serde_json::to_string(self) {
            Ok(json) => {
                storage.set_string(eframe::APP_KEY, json);
                trace!("App state saved: audio={}", self.settings.audio_enabled);
            }
            Err(e) => warn!("Failed to serialize app state: {}", e),
        }
    }
}

impl RouletteApp {
    /// Reset all settings to defaults.
    pub fn reset_settings(&mut self) {
        info!("Resetting settings to default");
        self.settings = AppSettings::default();
        if let Err(e) = self.engine.set_params(self.settings.spin) {
            warn!("Default spin settings rejected: {}", e);
        }
        self.apply_audio_setting();
    }

    /// Space starts the wheel, or asks it to stop while it spins
    fn handle_keyboard_input(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() || !ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            return;
        }
        match self.engine.state() {
            SpinState::Spinning => self.event_bus.emit(StopSpinEvent),
            SpinState::Slowing => {}
            SpinState::Idle | SpinState::Finished => self.event_bus.emit(StartSpinEvent),
        }
    }

    /// Dropped images go to extraction, anything else is read as a menu file
    fn handle_dropped_files(&mut self, ctx: &egui::Context, actions: &mut Vec<BoxedEvent>) {
        let dropped: Vec<std::path::PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        // Only the last drop counts: each one replaces the menu
        let Some(path) = dropped.into_iter().last() else {
            return;
        };
        debug!("File dropped: {}", path.display());

        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)));
        if is_image {
            actions.push(Box::new(ExtractFromImageEvent(path)));
        } else {
            actions.push(Box::new(OpenMenuFileEvent(path)));
        }
    }
}
