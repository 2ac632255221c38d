use clap::Parser;
use std::path::PathBuf;

#[cfg(feature = "audio")]
const AUDIO_BACKEND: &str = "cpal 0.16";
#[cfg(not(feature = "audio"))]
const AUDIO_BACKEND: &str = "disabled (build with --features audio)";

// Build version with backend info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "Audio:  ", AUDIO_BACKEND, "\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Menu roulette: spin a wheel of menu items and let it pick dinner
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Menu to load on startup: a JSON array of items or plain text, one item per line
    #[arg(value_name = "MENU")]
    pub menu_file: Option<PathBuf>,

    /// Spin once without a window and print the winner
    #[arg(long = "headless")]
    pub headless: bool,

    /// Seed for the headless stop point (random if omitted)
    #[arg(long = "seed", value_name = "N", requires = "headless")]
    pub seed: Option<u64>,

    /// Request the stop after exactly N frames instead of a random count
    #[arg(long = "stop-after", value_name = "FRAMES", requires = "headless")]
    pub stop_after: Option<u32>,

    /// Enable debug logging to file (default: menu_roulette.log)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Custom configuration directory (overrides default platform paths)
    #[arg(short = 'c', long = "config-dir", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headless() {
        let args = Args::try_parse_from([
            "menu-roulette", "menu.json", "--headless", "--seed", "7", "-vv",
        ])
        .unwrap();
        assert_eq!(args.menu_file, Some(PathBuf::from("menu.json")));
        assert!(args.headless);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.verbosity, 2);
        assert!(args.log_file.is_none());
    }

    #[test]
    fn test_log_flag_without_file() {
        let args = Args::try_parse_from(["menu-roulette", "--log"]).unwrap();
        assert_eq!(args.log_file, Some(None));
    }

    #[test]
    fn test_seed_requires_headless() {
        assert!(Args::try_parse_from(["menu-roulette", "--seed", "1"]).is_err());
    }
}
