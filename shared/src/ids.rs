//! Identifier enums shared by the engine and the save format.
//!
//! Both enums are stored as single bytes in the persisted record, so every
//! variant has a fixed discriminant.

use serde::{Deserialize, Serialize};

/// A byte read from storage did not name a known variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} value {value}")]
pub struct InvalidValue {
    /// Which enum was being decoded
    pub kind: &'static str,
    /// The offending byte
    pub value: u8,
}

/// Difficulty of the AI players filling empty seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum AiDifficulty {
    Easy = 0,
    #[default]
    Medium = 1,
    Hard = 2,
}

impl AiDifficulty {
    pub const ALL: [AiDifficulty; 3] = [AiDifficulty::Easy, AiDifficulty::Medium, AiDifficulty::Hard];
}

impl TryFrom<u8> for AiDifficulty {
    type Error = InvalidValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Easy),
            1 => Ok(Self::Medium),
            2 => Ok(Self::Hard),
            _ => Err(InvalidValue {
                kind: "ai difficulty",
                value,
            }),
        }
    }
}

/// How the minigame for the next round gets decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum NextRound {
    /// A player with the fewest points picks.
    #[default]
    LeastPoints = 0,
    /// Players take turns picking.
    RoundRobin = 1,
    /// A random player picks.
    RandomPlayer = 2,
    /// The minigame is picked at random.
    RandomGame = 3,
    /// No tournament; anyone picks, nobody scores towards a win.
    FreePlay = 4,
}

impl NextRound {
    /// Policies selectable in the competitive setup screen, in menu order.
    pub const COMPETITIVE: [NextRound; 4] = [
        NextRound::LeastPoints,
        NextRound::RoundRobin,
        NextRound::RandomPlayer,
        NextRound::RandomGame,
    ];

    /// Whether a player is granted the right to pick the next minigame.
    pub fn has_chooser(self) -> bool {
        matches!(
            self,
            NextRound::LeastPoints | NextRound::RoundRobin | NextRound::RandomPlayer
        )
    }

    /// Next competitive policy, wrapping `RandomGame` back to `LeastPoints`.
    pub fn cycle_next(self) -> NextRound {
        match self {
            NextRound::LeastPoints => NextRound::RoundRobin,
            NextRound::RoundRobin => NextRound::RandomPlayer,
            NextRound::RandomPlayer => NextRound::RandomGame,
            NextRound::RandomGame | NextRound::FreePlay => NextRound::LeastPoints,
        }
    }

    /// Previous competitive policy, wrapping `LeastPoints` to `RandomGame`.
    pub fn cycle_prev(self) -> NextRound {
        match self {
            NextRound::LeastPoints | NextRound::FreePlay => NextRound::RandomGame,
            NextRound::RoundRobin => NextRound::LeastPoints,
            NextRound::RandomPlayer => NextRound::RoundRobin,
            NextRound::RandomGame => NextRound::RandomPlayer,
        }
    }
}

impl TryFrom<u8> for NextRound {
    type Error = InvalidValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::LeastPoints),
            1 => Ok(Self::RoundRobin),
            2 => Ok(Self::RandomPlayer),
            3 => Ok(Self::RandomGame),
            4 => Ok(Self::FreePlay),
            _ => Err(InvalidValue {
                kind: "next round policy",
                value,
            }),
        }
    }
}

/// Returns true if a minigame internal name is usable as a registry key.
///
/// Rules:
/// - Must be non-empty
/// - Only ASCII letters, digits, '_' and '-'
pub fn is_valid_internal_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
