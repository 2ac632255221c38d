use eframe::egui;
use std::path::Path;

use super::saved_lists_events::*;
use crate::core::event_bus::EventBus;
use crate::entities::SavedLists;
use crate::entities::saved_lists::export_file_name;

/// Name field of the save row, kept across frames
#[derive(Default)]
pub struct SavedListsDialog {
    pub name: String,
}

impl SavedListsDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the saved lists window.
    ///
    /// `locked` (wheel spinning) disables save and load; `last_dir` seeds the
    /// import/export dialogs.
    pub fn render(
        &mut self,
        ctx: &egui::Context,
        open: &mut bool,
        lists: &SavedLists,
        has_items: bool,
        locked: bool,
        last_dir: Option<&Path>,
        event_bus: &EventBus,
    ) {
        egui::Window::new("Saved lists")
            .id(egui::Id::new("saved_lists_window"))
            .open(open)
            .default_size([360.0, 420.0])
            .resizable(true)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.name)
                            .hint_text("List name")
                            .desired_width(ui.available_width() - 110.0),
                    );
                    let enabled = !locked && has_items && !self.name.trim().is_empty();
                    if ui
                        .add_enabled(enabled, egui::Button::new("Save current"))
                        .clicked()
                    {
                        event_bus.emit(SaveListEvent(std::mem::take(&mut self.name)));
                    }
                });

                ui.horizontal(|ui| {
                    if ui.button("Import...").clicked() {
                        let mut dialog = rfd::FileDialog::new()
                            .add_filter("Menu lists", &["json"])
                            .set_title("Import Menu Lists");
                        if let Some(dir) = last_dir {
                            dialog = dialog.set_directory(dir);
                        }
                        if let Some(path) = dialog.pick_file() {
                            event_bus.emit(ImportListsEvent(path));
                        }
                    }
                    if ui
                        .add_enabled(!lists.lists().is_empty(), egui::Button::new("Export..."))
                        .clicked()
                    {
                        let mut dialog = rfd::FileDialog::new()
                            .add_filter("Menu lists", &["json"])
                            .set_title("Export Menu Lists")
                            .set_file_name(export_file_name(chrono::Local::now().date_naive()));
                        if let Some(dir) = last_dir {
                            dialog = dialog.set_directory(dir);
                        }
                        if let Some(path) = dialog.save_file() {
                            event_bus.emit(ExportListsEvent(path));
                        }
                    }
                });

                ui.separator();

                if lists.lists().is_empty() {
                    ui.weak("No saved lists yet.");
                    return;
                }

                egui::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        for list in lists.lists() {
                            ui.horizontal(|ui| {
                                ui.vertical(|ui| {
                                    ui.strong(&list.name);
                                    ui.weak(format!(
                                        "{} items - {}",
                                        list.items.len(),
                                        list.updated_at
                                            .with_timezone(&chrono::Local)
                                            .format("%Y-%m-%d %H:%M")
                                    ));
                                });
                                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                    if ui.small_button("Delete").clicked() {
                                        event_bus.emit(DeleteSavedListEvent(list.id));
                                    }
                                    if ui
                                        .add_enabled(!locked, egui::Button::new("Load").small())
                                        .clicked()
                                    {
                                        event_bus.emit(LoadSavedListEvent(list.id));
                                    }
                                });
                            });
                            ui.separator();
                        }
                    });
            });
    }
}
