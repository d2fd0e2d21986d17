//! Configuration management (`config.toml`)
//!
//! Handles loading, saving, and providing defaults for engine settings.
//! Settings are stored in TOML format in the platform-specific config directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use partybox_shared::{
    AiDifficulty, DEFAULT_POINTS_TO_WIN, MAX_POINTS_TO_WIN, MIN_POINTS_TO_WIN, NextRound,
};

const CONFIG_FILE: &str = "config.toml";

/// Engine configuration.
///
/// Contains all user-configurable settings organized into sections.
/// Serialized to/from TOML format for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Tick loop settings
    #[serde(default)]
    pub runtime: RuntimeSettings,
    /// Controller settings
    #[serde(default)]
    pub input: InputConfig,
    /// Defaults offered by the setup wizard
    #[serde(default)]
    pub tournament: TournamentDefaults,
    /// Save memory settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Fixed-timestep loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeSettings {
    /// Fixed update rate in Hz (default: the console's default tick rate)
    #[serde(default)]
    pub tick_rate: Option<u32>,
    /// Longest frame delta fed to the simulation, in milliseconds (default: 100)
    #[serde(default = "default_max_delta_ms")]
    pub max_delta_ms: u64,
}

/// Controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Deadzone for analog sticks (0.0-1.0)
    #[serde(default = "default_deadzone")]
    pub stick_deadzone: f32,
    /// Stick deflection that counts as a menu flick (0.0-1.0)
    #[serde(default = "default_axis_threshold")]
    pub axis_threshold: f32,
}

/// Tournament defaults used when the setup wizard opens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentDefaults {
    /// Points needed to win (default: 4, range: 1-7)
    #[serde(default = "default_points_to_win")]
    pub points_to_win: u8,
    /// How the next minigame gets chosen (default: least_points)
    #[serde(default)]
    pub next_round: NextRound,
    /// AI difficulty (default: medium)
    #[serde(default)]
    pub ai_difficulty: AiDifficulty,
}

/// Save memory configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Whether the emulated save memory is fitted (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Override for the save file location (default: `<data dir>/partybox.eep`)
    #[serde(default)]
    pub save_path: Option<PathBuf>,
}

fn default_max_delta_ms() -> u64 {
    100
}
fn default_deadzone() -> f32 {
    0.15
}
fn default_axis_threshold() -> f32 {
    0.25
}
fn default_points_to_win() -> u8 {
    DEFAULT_POINTS_TO_WIN
}
fn default_true() -> bool {
    true
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            tick_rate: None,
            max_delta_ms: default_max_delta_ms(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            stick_deadzone: default_deadzone(),
            axis_threshold: default_axis_threshold(),
        }
    }
}

impl Default for TournamentDefaults {
    fn default() -> Self {
        Self {
            points_to_win: default_points_to_win(),
            next_round: NextRound::default(),
            ai_difficulty: AiDifficulty::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            save_path: None,
        }
    }
}

impl TournamentDefaults {
    /// Points to win, brought into the range the setup wizard offers.
    pub fn clamped_points_to_win(&self) -> u8 {
        self.points_to_win.clamp(MIN_POINTS_TO_WIN, MAX_POINTS_TO_WIN)
    }
}

impl StorageConfig {
    /// Where the save memory image lives, if anywhere.
    pub fn resolved_save_path(&self) -> Option<PathBuf> {
        if !self.enabled {
            return None;
        }
        self.save_path
            .clone()
            .or_else(|| data_dir().map(|dir| dir.join("partybox.eep")))
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Partybox\config`
/// On macOS: `~/Library/Application Support/io.partybox.Partybox`
/// On Linux: `~/.config/Partybox`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.partybox", "", "Partybox")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Returns the platform-specific data directory (save memory image).
///
/// Returns `None` if the home directory cannot be determined.
pub fn data_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.partybox", "", "Partybox")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Loads the configuration from disk.
///
/// Reads `config.toml` from the platform's configuration directory.
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    config_dir()
        .map(|dir| load_from(&dir))
        .unwrap_or_default()
}

/// Loads `config.toml` from `dir`, falling back to defaults.
pub fn load_from(dir: &Path) -> Config {
    std::fs::read_to_string(dir.join(CONFIG_FILE))
        .ok()
        .and_then(|content| parse(&content))
        .unwrap_or_default()
}

/// Parses a configuration document, logging why it was rejected.
pub fn parse(content: &str) -> Option<Config> {
    match toml::from_str(content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Ignoring unparsable config.toml: {}", e);
            None
        }
    }
}

/// Saves the configuration to disk.
///
/// Writes `config.toml` to the platform's configuration directory.
/// Creates the directory if it doesn't exist.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file
/// cannot be written.
pub fn save(config: &Config) -> std::io::Result<()> {
    match config_dir() {
        Some(dir) => save_to(&dir, config),
        None => Ok(()),
    }
}

/// Writes `config.toml` into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file
/// cannot be written.
pub fn save_to(dir: &Path, config: &Config) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let content = toml::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(dir.join(CONFIG_FILE), content)
}
