//! Partybox Library
//!
//! The headless console backend, the demo minigames and the tournament
//! launcher behind the `partybox` binary.

pub mod console;
pub mod launcher;
pub mod minigames;

pub use console::HeadlessConsole;
pub use launcher::{LaunchOptions, TournamentOutcome, run};
