//! Round outcomes and next-chooser selection.
//!
//! A tournament tracks points per seat across rounds. Minigames only flag
//! winners; points are awarded when the results level finalizes the round.

use rand::Rng;
use smallvec::SmallVec;

use partybox_shared::{DEFAULT_POINTS_TO_WIN, MAX_PLAYERS, NextRound};

/// Small list of player numbers.
pub type PlayerList = SmallVec<[usize; MAX_PLAYERS]>;

/// What happened when a round was finalized.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoundSummary {
    /// Players flagged as winners this round (may be empty, may be several)
    pub winners: PlayerList,
    /// Players that reached the points needed to win
    pub champions: PlayerList,
    /// Whether the tournament is over
    pub ending: bool,
}

/// Points, round winners and the next-round policy.
#[derive(Debug, Clone)]
pub struct Tournament {
    points: [u8; MAX_PLAYERS],
    points_to_win: u8,
    winners: [bool; MAX_PLAYERS],
    policy: NextRound,
    chooser: Option<usize>,
    candidates: PlayerList,
    participants: usize,
}

impl Default for Tournament {
    fn default() -> Self {
        Self {
            points: [0; MAX_PLAYERS],
            points_to_win: DEFAULT_POINTS_TO_WIN,
            winners: [false; MAX_PLAYERS],
            policy: NextRound::default(),
            chooser: Some(0),
            candidates: PlayerList::new(),
            participants: MAX_PLAYERS,
        }
    }
}

impl Tournament {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Round play
    // ========================================================================

    /// Flag a player as a winner of the current round.
    ///
    /// Idempotent; several players may win the same round.
    pub fn declare_winner(&mut self, player: usize) {
        assert!(
            player < MAX_PLAYERS,
            "player {} out of range (max {})",
            player,
            MAX_PLAYERS
        );
        self.winners[player] = true;
    }

    pub fn is_winner(&self, player: usize) -> bool {
        self.winners.get(player).copied().unwrap_or(false)
    }

    /// Players flagged as winners of the current round.
    pub fn winners(&self) -> PlayerList {
        (0..MAX_PLAYERS).filter(|&p| self.winners[p]).collect()
    }

    /// Clear every winner flag. Done whenever a minigame is entered.
    pub fn reset_winners(&mut self) {
        self.winners = [false; MAX_PLAYERS];
    }

    /// Award a point to every flagged winner and check for a tournament win.
    ///
    /// In free play points still accumulate but the tournament never ends.
    pub fn finalize_round(&mut self) -> RoundSummary {
        let winners = self.winners();
        for &player in &winners {
            self.points[player] = self.points[player].saturating_add(1);
        }

        let champions: PlayerList = (0..MAX_PLAYERS).filter(|&p| self.has_won(p)).collect();
        let ending = self.policy != NextRound::FreePlay && !champions.is_empty();

        tracing::info!(
            "Round finalized: winners {:?}, points {:?}{}",
            winners.as_slice(),
            self.points,
            if ending { " (tournament over)" } else { "" }
        );

        RoundSummary {
            winners,
            champions,
            ending,
        }
    }

    // ========================================================================
    // Next round
    // ========================================================================

    /// Pick who chooses the next minigame according to the policy.
    ///
    /// Returns `None` for policies without a chooser (random game, free
    /// play); the candidate list is then empty.
    pub fn select_next_chooser<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        let seats = self.participants;
        match self.policy {
            NextRound::LeastPoints => {
                let least = self.points[..seats].iter().copied().min().unwrap_or(0);
                self.candidates = (0..seats).filter(|&p| self.points[p] == least).collect();
                let pick = rng.random_range(0..self.candidates.len());
                self.chooser = Some(self.candidates[pick]);
            }
            NextRound::RoundRobin => {
                let next = self.chooser.map_or(0, |last| (last + 1) % seats);
                self.candidates = PlayerList::from_slice(&[next]);
                self.chooser = Some(next);
            }
            NextRound::RandomPlayer => {
                self.candidates = (0..seats).collect();
                self.chooser = Some(rng.random_range(0..seats));
            }
            NextRound::RandomGame | NextRound::FreePlay => {
                self.candidates.clear();
                self.chooser = None;
            }
        }
        tracing::debug!(
            "Next chooser ({:?}): {:?} from {:?}",
            self.policy,
            self.chooser,
            self.candidates.as_slice()
        );
        self.chooser
    }

    /// Players the last chooser was drawn from.
    pub fn candidates(&self) -> &[usize] {
        &self.candidates
    }

    pub fn chooser(&self) -> Option<usize> {
        self.chooser
    }

    pub fn set_chooser(&mut self, chooser: Option<usize>) {
        self.chooser = chooser.filter(|&p| p < MAX_PLAYERS);
    }

    // ========================================================================
    // Configuration and scores
    // ========================================================================

    pub fn policy(&self) -> NextRound {
        self.policy
    }

    pub fn set_policy(&mut self, policy: NextRound) {
        self.policy = policy;
    }

    pub fn points_to_win(&self) -> u8 {
        self.points_to_win
    }

    pub fn set_points_to_win(&mut self, points: u8) {
        self.points_to_win = points.max(1);
    }

    /// Seats taking part in chooser selection (AI fills empty seats).
    pub fn participants(&self) -> usize {
        self.participants
    }

    pub fn set_participants(&mut self, seats: usize) {
        self.participants = seats.clamp(1, MAX_PLAYERS);
        if self.chooser.is_some_and(|c| c >= self.participants) {
            self.chooser = Some(0);
        }
    }

    pub fn points(&self, player: usize) -> u8 {
        self.points.get(player).copied().unwrap_or(0)
    }

    pub fn all_points(&self) -> [u8; MAX_PLAYERS] {
        self.points
    }

    /// Overwrite a score. Only save restore uses this.
    pub fn set_points(&mut self, player: usize, points: u8) {
        if let Some(slot) = self.points.get_mut(player) {
            *slot = points;
        }
    }

    /// Start a new tournament: everyone back to zero.
    pub fn reset_points(&mut self) {
        self.points = [0; MAX_PLAYERS];
        self.reset_winners();
    }

    pub fn has_won(&self, player: usize) -> bool {
        self.points(player) >= self.points_to_win
    }
}
