use eframe::egui;
use std::path::PathBuf;

use super::prefs_events::{AudioEnabledChangedEvent, ResetSettingsEvent, SpinParamsChangedEvent};
use crate::core::SpinParams;
use crate::core::event_bus::EventBus;
use crate::extract::DEFAULT_OCR_COMMAND;

/// Settings categories
#[derive(Debug, Clone, Copy, PartialEq)]
enum SettingsCategory {
    General,
    Spin,
    Extraction,
}

impl SettingsCategory {
    const ALL: [SettingsCategory; 3] = [
        SettingsCategory::General,
        SettingsCategory::Spin,
        SettingsCategory::Extraction,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            SettingsCategory::General => "General",
            SettingsCategory::Spin => "Spin",
            SettingsCategory::Extraction => "Extraction",
        }
    }

    fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// Application settings
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct AppSettings {
    // Spin
    pub spin: SpinParams,
    pub audio_enabled: bool,

    // UI
    pub dark_mode: bool,
    pub font_size: f32,
    pub show_saved_lists: bool,

    // Extraction
    /// Vision model command tried before OCR; blank disables it
    pub model_command: String,
    /// External OCR command, `{image}` is replaced by the photo path
    pub ocr_command: String,

    /// Directory of the last import/export dialog
    pub last_export_dir: Option<PathBuf>,

    /// Selected category in the settings window (persistent)
    pub selected_settings_category: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            spin: SpinParams::default(),
            audio_enabled: true,
            dark_mode: true,
            font_size: 14.0,
            show_saved_lists: false,
            model_command: String::new(),
            ocr_command: DEFAULT_OCR_COMMAND.to_string(),
            last_export_dir: None,
            selected_settings_category: None,
        }
    }
}

fn render_general_settings(ui: &mut egui::Ui, settings: &mut AppSettings, event_bus: &EventBus) {
    ui.heading("Appearance");
    ui.add_space(8.0);

    ui.label("Font Size:");
    ui.add(
        egui::Slider::new(&mut settings.font_size, 10.0..=22.0)
            .suffix(" px")
            .step_by(0.5),
    );
    ui.add_space(8.0);
    ui.checkbox(&mut settings.dark_mode, "Dark Mode");

    ui.add_space(16.0);
    ui.heading("Sound");
    ui.add_space(8.0);
    if ui
        .checkbox(&mut settings.audio_enabled, "Tick and fanfare sounds")
        .changed()
    {
        event_bus.emit(AudioEnabledChangedEvent(settings.audio_enabled));
    }
    if !cfg!(feature = "audio") {
        ui.weak("Built without the `audio` feature: cues are silent.");
    }

    ui.add_space(16.0);
    if ui.button("Reset all settings").clicked() {
        event_bus.emit(ResetSettingsEvent);
    }
}

fn render_spin_settings(ui: &mut egui::Ui, settings: &mut AppSettings, event_bus: &EventBus) {
    let spin = &mut settings.spin;
    let mut changed = false;

    ui.heading("Wheel");
    ui.add_space(8.0);

    ui.label("Launch velocity:");
    changed |= ui
        .add(egui::Slider::new(&mut spin.launch_velocity, 0.5..=10.0).suffix(" °/frame"))
        .changed();
    ui.label("Acceleration per frame:");
    changed |= ui
        .add(egui::Slider::new(&mut spin.acceleration_step, 0.0..=2.0).step_by(0.05))
        .changed();
    ui.label("Top speed:");
    changed |= ui
        .add(egui::Slider::new(&mut spin.max_velocity, 5.0..=40.0).suffix(" °/frame"))
        .changed();
    ui.label("Slowdown factor (per frame):");
    changed |= ui
        .add(egui::Slider::new(&mut spin.decay_factor, 0.95..=0.998).fixed_decimals(3))
        .changed();

    ui.add_space(8.0);
    changed |= ui
        .checkbox(&mut spin.frame_rate_compensation, "Same speed on every display")
        .on_hover_text("Scale each frame by elapsed time instead of one fixed step")
        .changed();

    // Keep the cap valid while the launch slider moves
    if spin.max_velocity < spin.launch_velocity {
        spin.max_velocity = spin.launch_velocity;
    }

    ui.add_space(16.0);
    if ui.button("Restore defaults").clicked() {
        *spin = SpinParams::default();
        changed = true;
    }

    if changed {
        event_bus.emit(SpinParamsChangedEvent);
    }
}

fn render_extraction_settings(ui: &mut egui::Ui, settings: &mut AppSettings) {
    ui.heading("Menu photos");
    ui.add_space(8.0);
    ui.weak("Quote paths or arguments that contain spaces.");
    ui.add_space(8.0);

    ui.label("Model command (photo as data URL on stdin, JSON array on stdout):");
    ui.add(
        egui::TextEdit::singleline(&mut settings.model_command)
            .hint_text("blank = OCR only")
            .desired_width(f32::INFINITY),
    );
    ui.add_space(8.0);

    ui.label("OCR command ({image} = photo path, text on stdout):");
    ui.add(egui::TextEdit::singleline(&mut settings.ocr_command).desired_width(f32::INFINITY));
    if ui.small_button("Default").clicked() {
        settings.ocr_command = DEFAULT_OCR_COMMAND.to_string();
    }
}

/// Render settings window
pub fn render_settings_window(
    ctx: &egui::Context,
    show_settings: &mut bool,
    settings: &mut AppSettings,
    event_bus: &EventBus,
) {
    let mut selected = settings
        .selected_settings_category
        .as_deref()
        .and_then(SettingsCategory::from_str)
        .unwrap_or(SettingsCategory::General);

    egui::Window::new("Settings")
        .id(egui::Id::new("settings_window"))
        .open(show_settings)
        .default_size([560.0, 380.0])
        .resizable(true)
        .collapsible(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.set_width(120.0);
                    for category in SettingsCategory::ALL {
                        ui.selectable_value(&mut selected, category, category.as_str());
                    }
                });

                ui.separator();

                ui.vertical(|ui| match selected {
                    SettingsCategory::General => render_general_settings(ui, settings, event_bus),
                    SettingsCategory::Spin => render_spin_settings(ui, settings, event_bus),
                    SettingsCategory::Extraction => render_extraction_settings(ui, settings),
                });
            });
        });

    settings.selected_settings_category = Some(selected.as_str().to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_fill_missing_fields() {
        let settings: AppSettings = serde_json::from_str(r#"{"dark_mode":false}"#).unwrap();
        assert!(!settings.dark_mode);
        assert_eq!(settings.spin, SpinParams::default());
        assert_eq!(settings.ocr_command, DEFAULT_OCR_COMMAND);
        assert!(settings.model_command.is_empty());
    }

    #[test]
    fn test_category_names_round_trip() {
        for category in SettingsCategory::ALL {
            assert_eq!(SettingsCategory::from_str(category.as_str()), Some(category));
        }
        assert_eq!(SettingsCategory::from_str("Cache"), None);
    }
}
