//! Configuration for solgrid.
//!
//! Read from `~/.config/solgrid/config.toml` at startup. When the file is
//! missing, a commented default is written there and the defaults are used.

pub mod colors;
pub mod keybindings;

pub use colors::ColorConfig;
pub use keybindings::KeybindingConfig;

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::{Rover, DEFAULT_SOL};

pub const DEFAULT_BASE_URL: &str = "https://api.nasa.gov/mars-photos/api/v1";
pub const DEFAULT_API_KEY: &str = "DEMO_KEY";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub defaults: DefaultsConfig,
    pub colors: ColorConfig,
    pub keybindings: KeybindingConfig,
}

/// Where photos come from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            timeout_secs: 10,
        }
    }
}

/// Query shown when the TUI starts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub rover: Rover,
    pub sol: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            rover: Rover::Curiosity,
            sol: DEFAULT_SOL,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in an existing file use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        if config.defaults.sol == 0 {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                reason: "defaults.sol must be a positive integer".to_string(),
            });
        }

        Ok(config)
    }

    /// Get the default config file path: `~/.config/solgrid/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("solgrid").join("config.toml"))
    }

    /// Create a default config file with comments.
    pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        tracing::info!("Wrote default config to {}", path.display());
        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> &'static str {
        r##"# solgrid configuration
#
# Colors can be specified as:
# - Named colors: Black, Red, Green, Yellow, Blue, Magenta, Cyan, Gray,
#   DarkGray, LightRed, LightGreen, LightYellow, LightBlue, LightMagenta,
#   LightCyan, White, Reset
# - Hex colors: "#RRGGBB" or "#RGB"
#
# Keybindings can be specified as:
# - Single characters: "a", "A", "1"
# - Special keys: Enter, Tab, BackTab, Backspace, Delete, Home, End,
#   PageUp, PageDown, Up, Down, Left, Right, Esc, Space, F1-F12
# - With modifiers: "Ctrl+c", "Shift+Tab", "Alt+Enter"

[api]
base_url = "https://api.nasa.gov/mars-photos/api/v1"
# DEMO_KEY is rate limited; get a personal key at https://api.nasa.gov
api_key = "DEMO_KEY"
timeout_secs = 10

[defaults]
# One of: curiosity, opportunity, spirit, perseverance
rover = "curiosity"
sol = 1000

[colors]
active_border = "Cyan"
inactive_border = "DarkGray"

# Selected card
selection_bg = "#C1440E"
selection_fg = "White"

# Card text
card_title = "LightYellow"
card_meta = "Gray"

# Enlarged view
modal_border = "#C1440E"
metadata_label = "Yellow"
metadata_link = "Blue"
rover_active = "LightGreen"
rover_inactive = "Gray"

# Errors and banners
error_fg = "LightRed"
banner_fg = "Black"
banner_bg = "Yellow"

# Background
star = "Gray"

# Status bar
status_fg = "White"
status_bg = "DarkGray"

[keybindings]
quit = ["q", "Ctrl+c"]
move_up = ["k", "Up"]
move_down = ["j", "Down"]
move_left = ["h", "Left"]
move_right = ["l", "Right"]
next_rover = ["Tab"]
prev_rover = ["BackTab", "Shift+Tab"]
edit_sol = ["e", "/"]
open_photo = ["Enter"]
close = ["Esc"]
load_more = ["n", "PageDown"]
retry = ["r"]
reload = ["R"]
open_in_browser = ["o"]
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid config file at {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}
