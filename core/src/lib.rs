//! Partybox Core - party-game engine framework
//!
//! This crate provides the level state machine, tournament bookkeeping,
//! persistence and input handling that every Partybox console backend
//! shares.
//!
//! # Architecture
//!
//! - [`Console`] - Trait implemented by each console backend (graphics, audio, save memory)
//! - [`PartyRunner`] - Frame loop with fixed timestep updates
//! - [`LevelMachine`] - Level lifecycle and transitions
//! - [`PartyContext`] - Session state handed to every level hook
//! - [`Minigame`] - Trait implemented by each minigame

pub mod config;
pub mod console;
pub mod context;
pub mod input;
#[cfg(test)]
mod integration;
pub mod level;
pub mod levels;
pub mod machine;
pub mod minigame;
pub mod roster;
pub mod runner;
pub mod runtime;
pub mod save_store;
#[cfg(test)]
pub mod test_utils;
pub mod tournament;

// Re-export core traits and types
pub use config::Config;
pub use console::{Audio, Console, ConsoleSpecs, Graphics, NullAudio, NullGraphics, RawInput};
pub use context::PartyContext;
pub use input::{Buttons, Direction8, InputFrame, PadState};
pub use level::{Level, LevelId};
pub use levels::TournamentSetup;
pub use machine::LevelMachine;
pub use minigame::{Minigame, MinigameRegistry};
pub use roster::PlayerRoster;
pub use runner::{FrameReport, PartyRunner};
pub use runtime::{FixedTimestep, RuntimeConfig};
pub use save_store::{FileSaveDevice, MemorySaveDevice, SaveDevice, SaveState, SessionSnapshot};
pub use tournament::{RoundSummary, Tournament};
