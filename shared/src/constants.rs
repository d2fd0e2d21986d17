//! Centralized constants for the Partybox console.
//!
//! Single source of truth for limits shared by the engine, the save format
//! and the launcher.

/// Number of player seats in every round (humans first, AI fills the rest).
pub const MAX_PLAYERS: usize = 4;

/// Number of controller ports on the console.
pub const CONTROLLER_PORTS: usize = 4;

/// Number of audio mixer channels reset on every level teardown.
pub const MIXER_CHANNELS: usize = 32;

/// Maximum number of minigames a build can register.
///
/// The persisted blacklist is a `u32` bitmask, one bit per minigame.
pub const MAX_MINIGAMES: usize = 32;

/// Points-to-win presets offered by the setup wizard (inclusive range).
pub const MIN_POINTS_TO_WIN: u8 = 1;
pub const MAX_POINTS_TO_WIN: u8 = 7;

/// Points-to-win used when a fresh tournament is configured.
pub const DEFAULT_POINTS_TO_WIN: u8 = 4;

/// Magic header of the persisted tournament record.
pub const SAVE_MAGIC: [u8; 4] = *b"NBGJ";
