//! Menu files and photo extraction.
//!
//! Extraction shells out to an OCR program, which can take seconds, so it
//! runs on its own thread and reports back through a channel polled once per
//! frame.

use std::path::{Path, PathBuf};

use crossbeam_channel::TryRecvError;
use log::{info, warn};

use super::{ExtractionResult, RouletteApp};
use crate::entities::{MenuList, load_menu_file};
use crate::extract::{ExtractorChain, prepare_image_file};
use crate::widgets::status::MessageKind;

impl RouletteApp {
    /// Replace the menu with the contents of a JSON or plain-text file
    pub fn open_menu_file(&mut self, path: &Path, now: f64) {
        self.remember_dir(path);
        match load_menu_file(path) {
            Ok(items) if items.is_empty() => {
                self.status_bar
                    .set_message(format!("No items in {}", path.display()), MessageKind::Error, now);
            }
            Ok(items) => {
                info!("Loaded {} items from {}", items.len(), path.display());
                let message = format!("Loaded {} items", items.len());
                self.menu.replace(items);
                self.status_bar.set_message(message, MessageKind::Info, now);
            }
            Err(e) => {
                warn!("{:#}", e);
                self.status_bar.set_message(format!("{:#}", e), MessageKind::Error, now);
            }
        }
    }

    /// Read menu items from a photo in the background.
    ///
    /// Only one extraction runs at a time.
    pub fn start_extraction(&mut self, path: PathBuf, now: f64) {
        if self.extraction.is_some() {
            self.status_bar
                .set_message("Already reading a photo", MessageKind::Error, now);
            return;
        }
        self.remember_dir(&path);

        let chain = ExtractorChain::from_commands(&self.settings.model_command, &self.settings.ocr_command);
        let (tx, rx) = crossbeam_channel::bounded::<ExtractionResult>(1);
        let spawned = std::thread::Builder::new()
            .name("extract".into())
            .spawn(move || {
                let result = prepare_image_file(&path)
                    .map_err(|e| format!("{:#}", e))
                    .and_then(|image| chain.extract(&image).map_err(|e| e.to_string()));
                // Receiver gone means the app closed
                let _ = tx.send(result);
            });

        match spawned {
            Ok(_) => {
                self.extraction = Some(rx);
                self.status_bar
                    .set_message("Reading menu photo...", MessageKind::Info, now);
            }
            Err(e) => {
                warn!("Failed to spawn extraction thread: {}", e);
                self.status_bar.set_message(e.to_string(), MessageKind::Error, now);
            }
        }
    }

    /// Apply a finished extraction, if any.
    ///
    /// While the wheel turns the result stays in the channel and is picked up
    /// on the first frame after it stops.
    pub fn poll_extraction(&mut self, now: f64) {
        let Some(rx) = &self.extraction else {
            return;
        };
        if self.engine.state().is_active() {
            return;
        }
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err("Extraction thread exited".to_string()),
        };
        self.extraction = None;

        match result {
            Ok(labels) => {
                let items = MenuList::from_labels(labels.as_slice()).items().to_vec();
                if items.is_empty() {
                    self.status_bar
                        .set_message("No menu items found in the photo", MessageKind::Error, now);
                    return;
                }
                info!("Photo gave {} items", items.len());
                let message = format!("Found {} items", items.len());
                self.menu.replace(items);
                self.status_bar.set_message(message, MessageKind::Info, now);
            }
            Err(e) => {
                warn!("Extraction failed: {}", e);
                self.status_bar.set_message(e, MessageKind::Error, now);
            }
        }
    }

    /// Start the next file dialog where the last one left off
    pub fn remember_dir(&mut self, path: &Path) {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            self.settings.last_export_dir = Some(parent.to_path_buf());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_menu_file_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.txt");
        std::fs::write(&path, "Ramen\n\n  Udon \nSoba\n").unwrap();

        let mut app = RouletteApp::default();
        app.open_menu_file(&path, 0.0);
        let labels: Vec<_> = app.menu.items().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["Ramen", "Udon", "Soba"]);
        assert_eq!(app.settings.last_export_dir.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_open_missing_file_keeps_menu() {
        let mut app = RouletteApp::default();
        app.menu.load_sample();
        let before = app.menu.len();
        app.open_menu_file(Path::new("/nonexistent/menu.json"), 0.0);
        assert_eq!(app.menu.len(), before);
        assert_eq!(app.status_bar.message().unwrap().1, MessageKind::Error);
    }

    #[test]
    fn test_poll_extraction_applies_labels() {
        let mut app = RouletteApp::default();
        let (tx, rx) = crossbeam_channel::bounded(1);
        tx.send(Ok(vec!["Curry".to_string(), " ".to_string(), "Tonkatsu".to_string()]))
            .unwrap();
        app.extraction = Some(rx);

        app.poll_extraction(0.0);
        assert!(app.extraction.is_none());
        let labels: Vec<_> = app.menu.items().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["Curry", "Tonkatsu"]);
    }

    #[test]
    fn test_poll_extraction_error() {
        let mut app = RouletteApp::default();
        let (tx, rx) = crossbeam_channel::bounded(1);
        tx.send(Err("all extractors failed".to_string())).unwrap();
        app.extraction = Some(rx);

        app.poll_extraction(0.0);
        assert!(app.menu.is_empty());
        let (message, kind) = app.status_bar.message().unwrap();
        assert_eq!(kind, MessageKind::Error);
        assert!(message.contains("all extractors failed"));
    }

    #[test]
    fn test_extraction_waits_for_wheel_to_stop() {
        let mut app = RouletteApp::default();
        app.menu.load_sample();
        app.sync_menu();
        app.engine.start().unwrap();

        let (tx, rx) = crossbeam_channel::bounded(1);
        tx.send(Ok(vec!["Curry".to_string(), "Tonkatsu".to_string()]))
            .unwrap();
        app.extraction = Some(rx);

        app.poll_extraction(0.0);
        assert!(app.extraction.is_some());
        assert_eq!(app.menu.len(), crate::entities::SAMPLE_ITEMS.len());

        app.engine.reset();
        app.poll_extraction(1.0);
        assert!(app.extraction.is_none());
        let labels: Vec<_> = app.menu.items().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["Curry", "Tonkatsu"]);
    }

    #[test]
    fn test_poll_extraction_pending() {
        let mut app = RouletteApp::default();
        let (_tx, rx) = crossbeam_channel::bounded::<ExtractionResult>(1);
        app.extraction = Some(rx);
        app.poll_extraction(0.0);
        assert!(app.extraction.is_some());
    }
}
