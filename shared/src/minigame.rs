//! Minigame metadata shown by the selection menu.

use serde::{Deserialize, Serialize};

/// Descriptive metadata every minigame exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinigameInfo {
    /// Display name, also the sort key of the selection menu
    pub name: String,
    /// Who made it
    pub developer: String,
    /// One-paragraph pitch
    pub description: String,
    /// How to play
    pub instructions: String,
}

impl MinigameInfo {
    pub fn new(
        name: impl Into<String>,
        developer: impl Into<String>,
        description: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            developer: developer.into(),
            description: description.into(),
            instructions: instructions.into(),
        }
    }
}
