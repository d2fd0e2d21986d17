//! Shared types for the Partybox party-game console.

pub mod console;
pub mod constants;
pub mod ids;
pub mod minigame;
pub mod save_format;

pub use console::{ConsoleSpecs, partybox_specs};
pub use constants::*;
pub use ids::{AiDifficulty, InvalidValue, NextRound, is_valid_internal_name};
pub use minigame::MinigameInfo;
pub use save_format::{RecordError, SAVE_RECORD_SIZE, SaveRecord};
