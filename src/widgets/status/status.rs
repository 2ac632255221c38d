use eframe::egui;

use crate::core::{SpinSnapshot, SpinState};

/// Seconds a status message stays visible
const MESSAGE_TTL: f64 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// Bottom status bar: spin state, rotation, and the last message
#[derive(Default)]
pub struct StatusBar {
    message: Option<(String, MessageKind, f64)>,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `text`; `now` is egui input time, used for expiry
    pub fn set_message(&mut self, text: impl Into<String>, kind: MessageKind, now: f64) {
        self.message = Some((text.into(), kind, now));
    }

    pub fn message(&self) -> Option<(&str, MessageKind)> {
        self.message.as_ref().map(|(t, k, _)| (t.as_str(), *k))
    }

    /// Drop the message once it is older than its lifetime
    pub fn expire(&mut self, now: f64) {
        if let Some((_, _, at)) = self.message
            && now - at > MESSAGE_TTL
        {
            self.message = None;
        }
    }

    pub fn render(&self, ctx: &egui::Context, snapshot: &SpinSnapshot, item_count: usize) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.monospace(format!("{:<8}", snapshot.state.as_str()));
                ui.separator();
                ui.monospace(format!("{:>9.1}°", snapshot.rotation));
                ui.separator();
                ui.monospace(format!("{} items", item_count));

                if snapshot.state == SpinState::Finished
                    && let Some(winner) = &snapshot.winner
                {
                    ui.separator();
                    ui.monospace(format!("Winner: {}", winner.label));
                }

                if let Some((text, kind)) = self.message() {
                    ui.separator();
                    match kind {
                        MessageKind::Info => ui.monospace(text),
                        MessageKind::Error => ui.colored_label(ui.visuals().error_fg_color, text),
                    };
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_expires() {
        let mut bar = StatusBar::new();
        bar.set_message("Saved", MessageKind::Info, 10.0);
        bar.expire(12.0);
        assert_eq!(bar.message(), Some(("Saved", MessageKind::Info)));
        bar.expire(17.0);
        assert!(bar.message().is_none());
    }
}
