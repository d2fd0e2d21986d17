//! Player roster: controller ports to dense player numbers.
//!
//! Player numbers are indices into the roster, not controller ports. With
//! ports 0 and 2 enabled, player 0 plays on port 0 and player 1 on port 2.
//! Seats past the human count are played by the AI.

use smallvec::SmallVec;

use partybox_shared::{AiDifficulty, CONTROLLER_PORTS, MAX_PLAYERS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Player {
    port: usize,
}

/// Active human players and the global AI difficulty.
#[derive(Debug, Clone, Default)]
pub struct PlayerRoster {
    players: SmallVec<[Player; MAX_PLAYERS]>,
    ai_difficulty: AiDifficulty,
}

impl PlayerRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the human players from the enabled controller ports.
    ///
    /// Enabled ports are packed left to right: a lower port always gets a
    /// lower player number.
    pub fn set_active(&mut self, enabled: [bool; CONTROLLER_PORTS]) {
        self.players = enabled
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(|(port, _)| Player { port })
            .take(MAX_PLAYERS)
            .collect();
        tracing::debug!(
            "Roster set: {} human player(s) on ports {:?}",
            self.players.len(),
            self.players.iter().map(|p| p.port).collect::<Vec<_>>()
        );
    }

    /// Same as [`set_active`](Self::set_active) from a port bitmask (bit n = port n).
    pub fn set_active_mask(&mut self, mask: u8) {
        self.set_active(std::array::from_fn(|port| mask & (1 << port) != 0));
    }

    /// Which ports are in use (inverse of `set_active`).
    pub fn enabled_ports(&self) -> [bool; CONTROLLER_PORTS] {
        let mut enabled = [false; CONTROLLER_PORTS];
        for player in &self.players {
            enabled[player.port] = true;
        }
        enabled
    }

    /// Controller port of a human player.
    ///
    /// # Panics
    ///
    /// Panics if `player` is not a human player in this roster.
    pub fn controller_for(&self, player: usize) -> usize {
        match self.players.get(player) {
            Some(p) => p.port,
            None => panic!(
                "player {} has no controller ({} human player(s))",
                player,
                self.players.len()
            ),
        }
    }

    /// Player number driven by a controller port, if that port is in use.
    pub fn player_for_port(&self, port: usize) -> Option<usize> {
        self.players.iter().position(|p| p.port == port)
    }

    pub fn human_count(&self) -> usize {
        self.players.len()
    }

    /// Whether a seat is played by a human (seats past the roster are AI).
    pub fn is_human(&self, player: usize) -> bool {
        player < self.players.len()
    }

    pub fn ai_difficulty(&self) -> AiDifficulty {
        self.ai_difficulty
    }

    pub fn set_ai_difficulty(&mut self, difficulty: AiDifficulty) {
        self.ai_difficulty = difficulty;
    }
}
