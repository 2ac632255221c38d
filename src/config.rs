//! Where settings, the auto-saved menu and logs live.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable overriding the config/data directory
pub const CONFIG_DIR_ENV: &str = "MENU_ROULETTE_CONFIG_DIR";

/// Subdirectory name under the platform config/data roots
const APP_DIR: &str = "menu-roulette";

/// Files whose presence in the working directory makes it the config dir
const LOCAL_MARKERS: &[&str] = &[
    "menu_roulette.json",
    "menu_roulette_items.json",
    "menu_roulette_saved_lists.json",
];

/// Directory overrides resolved from CLI and environment
#[derive(Debug, Clone, Default)]
pub struct PathConfig {
    pub config_dir: Option<PathBuf>,
}

impl PathConfig {
    /// Priority: CLI `--config-dir` → `MENU_ROULETTE_CONFIG_DIR` → none
    pub fn from_env_and_cli(cli_dir: Option<PathBuf>) -> Self {
        let config_dir = cli_dir.or_else(|| std::env::var(CONFIG_DIR_ENV).ok().map(PathBuf::from));
        Self { config_dir }
    }
}

/// Path of a configuration file.
///
/// Resolution order:
/// 1. explicit directory (CLI or env)
/// 2. current directory, if it already holds one of our files
/// 3. platform config dir (`~/.config/menu-roulette` on Linux)
pub fn config_file(name: &str, config: &PathConfig) -> PathBuf {
    resolve_dir(config, dirs_next::config_dir).join(name)
}

/// Path of a data file (auto-saved menu, saved lists, logs). Same order as
/// [`config_file`] with the platform data dir as the last resort.
pub fn data_file(name: &str, config: &PathConfig) -> PathBuf {
    resolve_dir(config, dirs_next::data_dir).join(name)
}

/// Create the config and data directories if missing
pub fn ensure_dirs(config: &PathConfig) -> Result<()> {
    let config_dir = resolve_dir(config, dirs_next::config_dir);
    let data_dir = resolve_dir(config, dirs_next::data_dir);

    for dir in [&config_dir, &data_dir] {
        if !dir.exists() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
    }
    Ok(())
}

fn has_local_files(dir: &Path) -> bool {
    LOCAL_MARKERS.iter().any(|f| dir.join(f).exists())
}

fn resolve_dir(config: &PathConfig, platform: fn() -> Option<PathBuf>) -> PathBuf {
    if let Some(dir) = &config.config_dir {
        return dir.clone();
    }
    if let Ok(cwd) = std::env::current_dir()
        && has_local_files(&cwd)
    {
        return cwd;
    }
    platform()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_dir_wins() {
        let config = PathConfig {
            config_dir: Some(PathBuf::from("/custom")),
        };
        assert_eq!(config_file("a.json", &config), PathBuf::from("/custom/a.json"));
        assert_eq!(data_file("b.json", &config), PathBuf::from("/custom/b.json"));
    }

    #[test]
    fn test_cli_beats_env() {
        let config = PathConfig::from_env_and_cli(Some(PathBuf::from("/from-cli")));
        assert_eq!(config.config_dir, Some(PathBuf::from("/from-cli")));
    }

    #[test]
    fn test_ensure_dirs_creates_custom_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("cfg");
        let config = PathConfig { config_dir: Some(dir.clone()) };
        ensure_dirs(&config).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_local_markers() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(!has_local_files(tmp.path()));
        std::fs::write(tmp.path().join("menu_roulette_items.json"), "[]").unwrap();
        assert!(has_local_files(tmp.path()));
    }
}
