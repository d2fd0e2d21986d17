//! Session state shared by every level.
//!
//! The runner owns one [`PartyContext`] and hands it to each level hook. It
//! replaces the loose globals a console game would otherwise keep: roster,
//! tournament, save state, minigame registry, input and the random stream.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::{Config, TournamentDefaults};
use crate::input::InputFrame;
use crate::level::{Level, LevelId};
use crate::minigame::MinigameRegistry;
use crate::roster::PlayerRoster;
use crate::save_store::{SaveState, SessionSnapshot};
use crate::tournament::Tournament;

/// A transition waiting for the next tick boundary.
pub(crate) struct PendingLevel {
    pub(crate) id: LevelId,
    /// Fresh minigame instance when `id` is the minigame slot
    pub(crate) minigame: Option<Box<dyn Level>>,
}

pub struct PartyContext {
    pub roster: PlayerRoster,
    pub tournament: Tournament,
    pub save: SaveState,
    pub minigames: MinigameRegistry,
    pub input: InputFrame,
    pub rng: Pcg32,
    /// Values the setup wizard starts from
    pub defaults: TournamentDefaults,
    pending: Option<PendingLevel>,
    subtick: f32,
    frame: u64,
}

impl PartyContext {
    pub fn new(config: &Config, save: SaveState, minigames: MinigameRegistry, seed: u64) -> Self {
        let mut tournament = Tournament::new();
        tournament.set_points_to_win(config.tournament.clamped_points_to_win());
        tournament.set_policy(config.tournament.next_round);

        let mut roster = PlayerRoster::new();
        roster.set_ai_difficulty(config.tournament.ai_difficulty);

        Self {
            roster,
            tournament,
            save,
            minigames,
            input: InputFrame::new(config.input.clone()),
            rng: Pcg32::seed_from_u64(seed),
            defaults: config.tournament.clone(),
            pending: None,
            subtick: 0.0,
            frame: 0,
        }
    }

    // ========================================================================
    // Level transitions
    // ========================================================================

    /// Ask for `id` to become the current level at the next tick boundary.
    ///
    /// The last request made before the boundary wins. Requesting the
    /// minigame level builds a fresh instance of the selected minigame right
    /// away.
    ///
    /// # Panics
    ///
    /// Panics when requesting the minigame level with no minigame selected.
    pub fn request_transition(&mut self, id: LevelId) {
        let minigame = match id {
            LevelId::Minigame => Some(self.minigames.instantiate_selected()),
            _ => None,
        };
        if let Some(previous) = &self.pending {
            tracing::debug!("Transition to {:?} replaces {:?}", id, previous.id);
        }
        self.pending = Some(PendingLevel { id, minigame });
    }

    /// Whether a transition is waiting to be promoted.
    pub fn was_changed(&self) -> bool {
        self.pending.is_some()
    }

    /// Level waiting to be promoted, if any.
    pub fn pending_level(&self) -> Option<LevelId> {
        self.pending.as_ref().map(|p| p.id)
    }

    pub(crate) fn take_pending(&mut self) -> Option<PendingLevel> {
        self.pending.take()
    }

    // ========================================================================
    // Timing
    // ========================================================================

    /// How far the frame is between two fixed ticks (0.0 to 1.0).
    pub fn subtick(&self) -> f32 {
        self.subtick
    }

    pub(crate) fn set_subtick(&mut self, subtick: f32) {
        self.subtick = subtick;
    }

    /// Frames run since boot.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub(crate) fn next_frame(&mut self) {
        self.frame += 1;
    }

    // ========================================================================
    // Minigame-facing helpers
    // ========================================================================

    /// Number of human players.
    pub fn player_count(&self) -> usize {
        self.roster.human_count()
    }

    pub fn is_human(&self, player: usize) -> bool {
        self.roster.is_human(player)
    }

    /// Controller port of a human player. Panics past the roster.
    pub fn controller_for(&self, player: usize) -> usize {
        self.roster.controller_for(player)
    }

    pub fn ai_difficulty(&self) -> partybox_shared::AiDifficulty {
        self.roster.ai_difficulty()
    }

    pub fn declare_winner(&mut self, player: usize) {
        tracing::debug!("Player {} wins the round", player);
        self.tournament.declare_winner(player);
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Write the save record. `full` captures a crash-recovery checkpoint.
    pub fn save_progress(&mut self, full: bool) {
        let snapshot = SessionSnapshot::capture(
            &self.roster,
            &self.tournament,
            self.minigames.selected(),
        );
        self.save.save(full, &snapshot);
    }

    /// Bring back the tournament stored in the save record: roster, points,
    /// policy, chooser and the minigame that was being played.
    pub fn restore_saved_session(&mut self) {
        let game = self.save.restore_into(&mut self.roster, &mut self.tournament);
        match game.filter(|&g| g < self.minigames.count()) {
            Some(game) => self.minigames.select(game),
            None => tracing::warn!("Saved minigame {:?} is not registered", game),
        }
    }
}

impl std::fmt::Debug for PartyContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartyContext")
            .field("roster", &self.roster)
            .field("tournament", &self.tournament)
            .field("save", &self.save)
            .field("minigames", &self.minigames)
            .field("pending", &self.pending_level())
            .field("frame", &self.frame)
            .finish()
    }
}
