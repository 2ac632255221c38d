use eframe::egui;
use egui_dnd::dnd;
use uuid::Uuid;

use super::menu_events::*;
use crate::core::event_bus::{BoxedEvent, Event};
use crate::entities::Item;

/// Image types offered by the "From photo" dialog
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp"];

/// Menu list panel result - all actions via events
#[derive(Default)]
pub struct MenuListActions {
    pub events: Vec<BoxedEvent>,
}

impl MenuListActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send<E: Event>(&mut self, event: E) {
        self.events.push(Box::new(event));
    }
}

/// Text inputs that live across frames
#[derive(Default)]
pub struct MenuListState {
    pub new_label: String,
    /// Item being renamed and its edit buffer
    pub editing: Option<(Uuid, String)>,
    /// Focus the rename field on its first frame
    pub focus_edit: bool,
    /// "Start over" clicked, waiting for confirmation
    pub confirm_start_over: bool,
}

/// Render the editable item list.
///
/// `locked` disables every edit (the wheel is spinning).
pub fn render_menu_list(
    ui: &mut egui::Ui,
    state: &mut MenuListState,
    items: &[Item],
    locked: bool,
) -> MenuListActions {
    let mut actions = MenuListActions::new();

    ui.add_enabled_ui(!locked, |ui| {
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut state.new_label)
                    .hint_text("Add a dish...")
                    .desired_width(ui.available_width() - 50.0),
            );
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if (ui.button("Add").clicked() || submitted) && !state.new_label.trim().is_empty() {
                actions.send(AddItemEvent(std::mem::take(&mut state.new_label)));
                response.request_focus();
            }
        });

        ui.horizontal(|ui| {
            if ui.button("From photo...").clicked()
                && let Some(path) = rfd::FileDialog::new()
                    .add_filter("Images", IMAGE_EXTENSIONS)
                    .set_title("Pick a photo of a menu")
                    .pick_file()
            {
                actions.send(ExtractFromImageEvent(path));
            }
            if ui.button("Open...").clicked()
                && let Some(path) = rfd::FileDialog::new()
                    .add_filter("Menu", &["json", "txt"])
                    .set_title("Open Menu")
                    .pick_file()
            {
                actions.send(OpenMenuFileEvent(path));
            }
            if ui.button("Sample").clicked() {
                actions.send(LoadSampleEvent);
            }
            if ui
                .add_enabled(!items.is_empty(), egui::Button::new("Clear"))
                .clicked()
            {
                actions.send(ClearItemsEvent);
            }
            if ui
                .button("Start over")
                .on_hover_text("Empty the menu and forget the auto-saved copy")
                .clicked()
            {
                state.confirm_start_over = true;
            }
        });

        if state.confirm_start_over {
            ui.horizontal(|ui| {
                ui.label("Forget the current menu? Saved lists stay.");
                if ui.button("Start over").clicked() {
                    actions.send(StartOverEvent);
                    state.confirm_start_over = false;
                }
                if ui.button("Cancel").clicked() {
                    state.confirm_start_over = false;
                }
            });
        }
    });

    ui.separator();
    ui.label(format!("{} items", items.len()));

    if items.is_empty() {
        ui.weak("No items yet. Type a dish, load the sample, or read a menu photo.");
        return actions;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            let response = dnd(ui, "menu_list_items").show(items.iter(), |ui, item, handle, _state| {
                ui.horizontal(|ui| {
                    if locked {
                        ui.label("≡");
                    } else {
                        handle.ui(ui, |ui| {
                            ui.label("≡");
                        });
                    }
                    render_row(ui, state, item, locked, &mut actions);
                });
            });
            if !locked && let Some(update) = response.final_update() {
                actions.send(MoveItemEvent {
                    from: update.from,
                    to: update.to,
                });
            }
        });

    actions
}

fn render_row(
    ui: &mut egui::Ui,
    state: &mut MenuListState,
    item: &Item,
    locked: bool,
    actions: &mut MenuListActions,
) {
    let is_editing = matches!(&state.editing, Some((id, _)) if *id == item.id);

    if is_editing && !locked {
        let mut commit = false;
        let mut cancel = false;
        if let Some((_, buffer)) = state.editing.as_mut() {
            let response = ui.text_edit_singleline(buffer);
            if std::mem::take(&mut state.focus_edit) {
                response.request_focus();
            } else if response.lost_focus() {
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    cancel = true;
                } else {
                    commit = true;
                }
            }
        }
        if ui.small_button("OK").clicked() {
            commit = true;
        }
        if commit && let Some((id, label)) = state.editing.take() {
            actions.send(RenameItemEvent { id, label });
        } else if cancel {
            state.editing = None;
        }
        return;
    }

    let label = ui
        .add(egui::Label::new(&item.label).sense(egui::Sense::click()))
        .on_hover_text("Double-click to rename");
    if !locked && label.double_clicked() {
        state.editing = Some((item.id, item.label.clone()));
        state.focus_edit = true;
    }
    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
        if ui.add_enabled(!locked, egui::Button::new("X").small()).clicked() {
            actions.send(RemoveItemEvent(item.id));
        }
    });
}
