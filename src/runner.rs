//! Application runner - windowed or headless, chosen by the CLI.

use std::sync::Arc;

use log::{info, trace, warn};

use crate::app::RouletteApp;
use crate::cli::Args;
use crate::config;
use crate::core::{NullAudio, SpinParams};
use crate::entities::store::CURRENT_LIST_FILE;
use crate::entities::{Item, MenuStore, load_menu_file};
use crate::headless::{StopPoint, run_spin};

/// eframe storage file for window geometry and settings
pub const APP_STATE_FILE: &str = "menu_roulette.json";

/// Run the application with given arguments.
///
/// # Returns
/// * `Ok(())` on successful exit
/// * `Err` if the menu file cannot be read, the headless spin fails, or the
///   window cannot be created
pub fn run_app(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    // Create path configuration from CLI args and environment
    let path_config = config::PathConfig::from_env_and_cli(args.config_dir.clone());

    // Ensure directories exist
    if let Err(e) = config::ensure_dirs(&path_config) {
        warn!("Failed to create application directories: {:#}", e);
    }

    info!("Menu Roulette starting...");
    trace!("Command-line args: {:?}", args);
    info!(
        "Config path: {}",
        config::config_file(APP_STATE_FILE, &path_config).display()
    );

    let initial_items: Option<Vec<Item>> = match &args.menu_file {
        Some(path) => {
            info!("Menu file: {}", path.display());
            Some(load_menu_file(path)?)
        }
        None => None,
    };

    if args.headless {
        return run_headless(&args, initial_items, &path_config);
    }

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title(format!("Menu Roulette v{}", env!("CARGO_PKG_VERSION")))
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([640.0, 480.0])
            .with_resizable(true)
            .with_drag_and_drop(true),
        persist_window: true,
        persistence_path: Some(config::config_file(APP_STATE_FILE, &path_config)),
        ..Default::default()
    };

    let path_config_for_app = path_config.clone();

    eframe::run_native(
        "Menu Roulette",
        native_options,
        Box::new(move |cc| {
            // Load persisted app state if available, otherwise create default
            let mut app: RouletteApp = cc
                .storage
                .and_then(|storage| storage.get_string(eframe::APP_KEY))
                .and_then(|json| serde_json::from_str(&json).ok())
                .unwrap_or_else(|| {
                    info!("No persisted state found, creating default app");
                    RouletteApp::default()
                });

            // Restore runtime parts lost during deserialization (#[serde(skip)])
            app.init(&cc.egui_ctx, path_config_for_app, initial_items);
            info!(
                "Applied settings: audio={}, spin={:?}",
                app.settings.audio_enabled, app.settings.spin
            );

            Ok(Box::new(app))
        }),
    )?;

    Ok(())
}

/// Spin once without a window and print the winner.
///
/// Uses the CLI menu, else the auto-saved one, with default spin settings.
fn run_headless(
    args: &Args,
    initial_items: Option<Vec<Item>>,
    path_config: &config::PathConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let items = match initial_items {
        Some(items) => items,
        None => {
            let store = MenuStore::new(config::data_file(CURRENT_LIST_FILE, path_config));
            store.load()
        }
    };

    let outcome = run_spin(
        items,
        SpinParams::default(),
        Arc::new(NullAudio),
        StopPoint::from_cli(args.stop_after, args.seed),
    )?;
    info!(
        "Headless winner #{} after {} frames at {:.1}°",
        outcome.index, outcome.frames, outcome.rotation
    );
    println!("{}", outcome.winner.label);
    Ok(())
}
