use partybox_shared::{
    AiDifficulty, CONTROLLER_PORTS, MAX_POINTS_TO_WIN, MIN_POINTS_TO_WIN, NextRound,
};

use crate::context::PartyContext;
use crate::input::Buttons;
use crate::level::{Level, LevelId};

use super::HoldTimer;

/// Seconds a button must be held to confirm players or finish setup.
const HOLD_TO_CONFIRM: f32 = 1.0;
/// Fade-out after setup is finished, in seconds.
const DONE_FADE: f32 = 1.0;

/// Screens of the setup wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetupStage {
    /// Free play or compete
    #[default]
    Mode,
    /// Controllers join with Start
    Players,
    /// Skipped when every seat is human
    AiDifficulty,
    /// Points to win, next-round policy, blacklist entry
    GameConfig,
    /// Per-minigame toggles
    Blacklist,
    /// Fading out before the tournament starts
    Done,
}

/// Everything needed to start a tournament.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentSetup {
    pub enabled_ports: [bool; CONTROLLER_PORTS],
    pub ai_difficulty: AiDifficulty,
    pub points_to_win: u8,
    pub next_round: NextRound,
    pub blacklist: u32,
}

impl TournamentSetup {
    /// Apply the setup to the session, save the configuration and head for
    /// the minigame picker.
    ///
    /// Player 0 picks the first minigame.
    pub fn commit(&self, ctx: &mut PartyContext) {
        ctx.roster.set_active(self.enabled_ports);
        ctx.roster.set_ai_difficulty(self.ai_difficulty);
        ctx.tournament.set_points_to_win(self.points_to_win);
        ctx.tournament.set_policy(self.next_round);
        ctx.tournament.set_chooser(Some(0));
        ctx.tournament.reset_points();
        ctx.save.set_blacklist(self.blacklist);
        ctx.save_progress(false);
        tracing::info!(
            "Tournament set up: {} human(s), {} point(s) to win, {:?}, AI {:?}",
            ctx.roster.human_count(),
            self.points_to_win,
            self.next_round,
            self.ai_difficulty
        );
        ctx.request_transition(LevelId::MinigameSelect);
    }
}

/// Tournament setup wizard.
#[derive(Debug)]
pub struct SetupWizard {
    stage: SetupStage,
    selection: usize,
    joined: [bool; CONTROLLER_PORTS],
    hold: HoldTimer,
    fade: f32,
    points_to_win: u8,
    next_round: NextRound,
    ai_difficulty: AiDifficulty,
    blacklist: u32,
}

impl Default for SetupWizard {
    fn default() -> Self {
        Self {
            stage: SetupStage::Mode,
            selection: 0,
            joined: [false; CONTROLLER_PORTS],
            hold: HoldTimer::default(),
            fade: 0.0,
            points_to_win: partybox_shared::DEFAULT_POINTS_TO_WIN,
            next_round: NextRound::LeastPoints,
            ai_difficulty: AiDifficulty::Medium,
            blacklist: 0,
        }
    }
}

impl SetupWizard {
    pub fn stage(&self) -> SetupStage {
        self.stage
    }

    /// Cursor position within the current stage.
    pub fn selection(&self) -> usize {
        self.selection
    }

    pub fn joined(&self) -> [bool; CONTROLLER_PORTS] {
        self.joined
    }

    pub fn points_to_win(&self) -> u8 {
        self.points_to_win
    }

    pub fn next_round(&self) -> NextRound {
        self.next_round
    }

    pub fn blacklist(&self) -> u32 {
        self.blacklist
    }

    fn is_free_play(&self) -> bool {
        self.next_round == NextRound::FreePlay
    }

    /// Row of the blacklist entry on the game config screen.
    fn blacklist_row(&self) -> usize {
        if self.is_free_play() { 0 } else { 2 }
    }

    fn config_rows(&self) -> usize {
        self.blacklist_row() + 1
    }

    fn enter(&mut self, stage: SetupStage, selection: usize) {
        tracing::debug!("Setup: {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
        self.selection = selection;
        self.hold.reset();
    }

    fn navigate(&mut self, ctx: &PartyContext, rows: usize) {
        if rows == 0 {
            return;
        }
        if ctx.input.any_down() {
            self.selection = (self.selection + 1) % rows;
        } else if ctx.input.any_up() {
            self.selection = (self.selection + rows - 1) % rows;
        }
    }

    fn update_mode(&mut self, ctx: &mut PartyContext) {
        self.navigate(ctx, 2);
        if ctx.input.any_pressed(Buttons::A) {
            self.next_round = if self.selection == 0 {
                NextRound::FreePlay
            } else if ctx.defaults.next_round == NextRound::FreePlay {
                NextRound::LeastPoints
            } else {
                ctx.defaults.next_round
            };
            self.enter(SetupStage::Players, 0);
        }
    }

    fn update_players(&mut self, ctx: &mut PartyContext, dt: f32) {
        for port in 0..CONTROLLER_PORTS {
            if ctx.input.pressed(port).contains(Buttons::START) {
                self.joined[port] = !self.joined[port];
            }
        }
        let count = self.joined.iter().filter(|j| **j).count();

        if ctx.input.any_pressed(Buttons::B) {
            self.enter(SetupStage::Mode, 0);
            return;
        }

        let holding = count > 0 && ctx.input.any_held(Buttons::A);
        if self.hold.tick(holding, dt, HOLD_TO_CONFIRM) {
            ctx.roster.set_active(self.joined);
            if count == CONTROLLER_PORTS {
                self.enter(SetupStage::GameConfig, 0);
            } else {
                self.enter(SetupStage::AiDifficulty, self.ai_difficulty as usize);
            }
        }
    }

    fn update_ai_difficulty(&mut self, ctx: &mut PartyContext) {
        self.navigate(ctx, AiDifficulty::ALL.len());
        if ctx.input.any_pressed(Buttons::A) {
            self.ai_difficulty = AiDifficulty::ALL[self.selection];
            ctx.roster.set_ai_difficulty(self.ai_difficulty);
            self.enter(SetupStage::GameConfig, 0);
        } else if ctx.input.any_pressed(Buttons::B) {
            self.enter(SetupStage::Players, 0);
        }
    }

    fn update_game_config(&mut self, ctx: &mut PartyContext, dt: f32) {
        self.navigate(ctx, self.config_rows());
        let points_row = !self.is_free_play() && self.selection == 0;
        let policy_row = !self.is_free_play() && self.selection == 1;

        if ctx.input.any_pressed(Buttons::A) || ctx.input.any_right() {
            if points_row {
                self.points_to_win = if self.points_to_win >= MAX_POINTS_TO_WIN {
                    MIN_POINTS_TO_WIN
                } else {
                    self.points_to_win + 1
                };
            } else if policy_row {
                self.next_round = self.next_round.cycle_next();
            } else if self.selection == self.blacklist_row() {
                self.enter(SetupStage::Blacklist, 0);
            }
        } else if ctx.input.any_left() {
            if points_row {
                self.points_to_win = if self.points_to_win <= MIN_POINTS_TO_WIN {
                    MAX_POINTS_TO_WIN
                } else {
                    self.points_to_win - 1
                };
            } else if policy_row {
                self.next_round = self.next_round.cycle_prev();
            }
        } else if ctx.input.any_pressed(Buttons::B) {
            self.enter(SetupStage::Players, 0);
        } else if self
            .hold
            .tick(ctx.input.any_held(Buttons::START), dt, HOLD_TO_CONFIRM)
        {
            self.fade = DONE_FADE;
            self.enter(SetupStage::Done, 0);
        }
    }

    fn update_blacklist(&mut self, ctx: &mut PartyContext) {
        let order = ctx.minigames.sorted_indices();
        self.navigate(ctx, order.len());

        if ctx.input.any_pressed(Buttons::A) || ctx.input.any_right() || ctx.input.any_left() {
            if let Some(&game) = order.get(self.selection) {
                self.blacklist ^= 1 << game;
            }
        } else if ctx.input.any_pressed(Buttons::B) {
            let any_allowed = (0..ctx.minigames.count()).any(|g| self.blacklist & (1 << g) == 0);
            if any_allowed {
                let row = self.blacklist_row();
                self.enter(SetupStage::GameConfig, row);
            }
        }
    }

    fn update_done(&mut self, ctx: &mut PartyContext, dt: f32) {
        self.fade -= dt;
        if self.fade < 0.0 && !ctx.was_changed() {
            self.to_setup(ctx).commit(ctx);
        }
    }

    fn to_setup(&self, ctx: &PartyContext) -> TournamentSetup {
        TournamentSetup {
            enabled_ports: ctx.roster.enabled_ports(),
            ai_difficulty: ctx.roster.ai_difficulty(),
            points_to_win: self.points_to_win,
            next_round: self.next_round,
            blacklist: self.blacklist,
        }
    }
}

impl Level for SetupWizard {
    fn init(&mut self, ctx: &mut PartyContext) {
        let registered = ctx.minigames.count();
        let valid = if registered >= 32 {
            u32::MAX
        } else {
            (1u32 << registered) - 1
        };

        *self = Self {
            points_to_win: ctx.defaults.clamped_points_to_win(),
            ai_difficulty: ctx.defaults.ai_difficulty,
            blacklist: ctx.save.blacklist() & valid,
            ..Self::default()
        };
    }

    fn update(&mut self, ctx: &mut PartyContext, dt: f32) {
        match self.stage {
            SetupStage::Mode => self.update_mode(ctx),
            SetupStage::Players => self.update_players(ctx, dt),
            SetupStage::AiDifficulty => self.update_ai_difficulty(ctx),
            SetupStage::GameConfig => self.update_game_config(ctx, dt),
            SetupStage::Blacklist => self.update_blacklist(ctx),
            SetupStage::Done => self.update_done(ctx, dt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PadState;
    use crate::test_utils::{EventLog, press, release_all, test_context};

    fn wizard(ctx: &mut PartyContext) -> SetupWizard {
        let mut wizard = SetupWizard::default();
        wizard.init(ctx);
        wizard
    }

    fn step(wizard: &mut SetupWizard, ctx: &mut PartyContext, port: usize, buttons: Buttons) {
        press(ctx, port, buttons);
        wizard.update(ctx, 0.016);
        release_all(ctx);
        wizard.update(ctx, 0.016);
    }

    fn hold(wizard: &mut SetupWizard, ctx: &mut PartyContext, port: usize, buttons: Buttons) {
        let mut pads = [PadState::default(); CONTROLLER_PORTS];
        pads[port] = PadState::with_buttons(buttons);
        for _ in 0..12 {
            ctx.input.advance(pads);
            wizard.update(ctx, 0.1);
        }
        release_all(ctx);
    }

    /// Compete mode with ports 0 and 2 joined, sitting on the game config screen.
    fn to_game_config(wizard: &mut SetupWizard, ctx: &mut PartyContext) {
        step(wizard, ctx, 0, Buttons::D_DOWN);
        step(wizard, ctx, 0, Buttons::A);
        assert_eq!(wizard.stage(), SetupStage::Players);
        step(wizard, ctx, 0, Buttons::START);
        step(wizard, ctx, 2, Buttons::START);
        hold(wizard, ctx, 0, Buttons::A);
        assert_eq!(wizard.stage(), SetupStage::AiDifficulty);
        assert_eq!(wizard.selection(), AiDifficulty::Medium as usize);
        step(wizard, ctx, 0, Buttons::D_DOWN);
        step(wizard, ctx, 0, Buttons::A);
        assert_eq!(wizard.stage(), SetupStage::GameConfig);
    }

    #[test]
    fn compete_flow_commits_configuration() {
        let log = EventLog::default();
        let mut ctx = test_context(&log);
        let mut wizard = wizard(&mut ctx);
        to_game_config(&mut wizard, &mut ctx);

        assert_eq!(ctx.roster.enabled_ports(), [true, false, true, false]);
        assert_eq!(ctx.ai_difficulty(), AiDifficulty::Hard);

        // Points 4 -> 5, then policy LeastPoints -> RoundRobin.
        step(&mut wizard, &mut ctx, 0, Buttons::D_RIGHT);
        step(&mut wizard, &mut ctx, 0, Buttons::D_DOWN);
        step(&mut wizard, &mut ctx, 0, Buttons::A);
        assert_eq!(wizard.points_to_win(), 5);
        assert_eq!(wizard.next_round(), NextRound::RoundRobin);

        hold(&mut wizard, &mut ctx, 1, Buttons::START);
        assert_eq!(wizard.stage(), SetupStage::Done);
        wizard.update(&mut ctx, 0.5);
        assert_eq!(ctx.pending_level(), None);
        wizard.update(&mut ctx, 0.6);

        assert_eq!(ctx.pending_level(), Some(LevelId::MinigameSelect));
        assert_eq!(ctx.tournament.points_to_win(), 5);
        assert_eq!(ctx.tournament.policy(), NextRound::RoundRobin);
        assert_eq!(ctx.tournament.chooser(), Some(0));
        assert!(!ctx.save.has_crashed());
    }

    #[test]
    fn points_wrap_both_ways() {
        let log = EventLog::default();
        let mut ctx = test_context(&log);
        let mut wizard = wizard(&mut ctx);
        to_game_config(&mut wizard, &mut ctx);

        for _ in 0..4 {
            step(&mut wizard, &mut ctx, 0, Buttons::D_RIGHT);
        }
        assert_eq!(wizard.points_to_win(), 1);
        step(&mut wizard, &mut ctx, 0, Buttons::D_LEFT);
        assert_eq!(wizard.points_to_win(), MAX_POINTS_TO_WIN);
    }

    #[test]
    fn four_humans_skip_ai_difficulty() {
        let log = EventLog::default();
        let mut ctx = test_context(&log);
        let mut wizard = wizard(&mut ctx);
        step(&mut wizard, &mut ctx, 0, Buttons::A);
        assert_eq!(wizard.next_round(), NextRound::FreePlay);
        for port in 0..CONTROLLER_PORTS {
            step(&mut wizard, &mut ctx, port, Buttons::START);
        }
        hold(&mut wizard, &mut ctx, 3, Buttons::A);
        assert_eq!(wizard.stage(), SetupStage::GameConfig);
        assert_eq!(ctx.roster.human_count(), 4);
    }

    #[test]
    fn confirming_players_needs_someone_joined() {
        let log = EventLog::default();
        let mut ctx = test_context(&log);
        let mut wizard = wizard(&mut ctx);
        step(&mut wizard, &mut ctx, 0, Buttons::A);
        hold(&mut wizard, &mut ctx, 0, Buttons::A);
        assert_eq!(wizard.stage(), SetupStage::Players);

        step(&mut wizard, &mut ctx, 1, Buttons::START);
        step(&mut wizard, &mut ctx, 1, Buttons::START);
        assert_eq!(wizard.joined(), [false; CONTROLLER_PORTS]);

        step(&mut wizard, &mut ctx, 0, Buttons::B);
        assert_eq!(wizard.stage(), SetupStage::Mode);
    }

    #[test]
    fn blacklist_cannot_exclude_every_game() {
        let log = EventLog::default();
        let mut ctx = test_context(&log);
        let mut wizard = wizard(&mut ctx);
        to_game_config(&mut wizard, &mut ctx);

        step(&mut wizard, &mut ctx, 0, Buttons::D_UP);
        assert_eq!(wizard.selection(), 2);
        step(&mut wizard, &mut ctx, 0, Buttons::A);
        assert_eq!(wizard.stage(), SetupStage::Blacklist);

        let games = ctx.minigames.count();
        for _ in 0..games {
            step(&mut wizard, &mut ctx, 0, Buttons::A);
            step(&mut wizard, &mut ctx, 0, Buttons::D_DOWN);
        }
        assert_eq!(wizard.blacklist().count_ones() as usize, games);

        step(&mut wizard, &mut ctx, 0, Buttons::B);
        assert_eq!(wizard.stage(), SetupStage::Blacklist);

        step(&mut wizard, &mut ctx, 0, Buttons::A);
        step(&mut wizard, &mut ctx, 0, Buttons::B);
        assert_eq!(wizard.stage(), SetupStage::GameConfig);
        assert_eq!(wizard.selection(), 2);
    }

    #[test]
    fn free_play_only_offers_blacklist() {
        let log = EventLog::default();
        let mut ctx = test_context(&log);
        let mut wizard = wizard(&mut ctx);
        step(&mut wizard, &mut ctx, 0, Buttons::A);
        step(&mut wizard, &mut ctx, 0, Buttons::START);
        hold(&mut wizard, &mut ctx, 0, Buttons::A);
        step(&mut wizard, &mut ctx, 0, Buttons::A);
        assert_eq!(wizard.stage(), SetupStage::GameConfig);

        step(&mut wizard, &mut ctx, 0, Buttons::D_RIGHT);
        assert_eq!(wizard.stage(), SetupStage::Blacklist);
        assert_eq!(wizard.points_to_win(), 4);
    }

    #[test]
    fn blacklist_starts_from_save() {
        let log = EventLog::default();
        let mut ctx = test_context(&log);
        ctx.save.set_blacklist(0b1 | (1 << 20));
        let wizard = wizard(&mut ctx);
        assert_eq!(wizard.blacklist(), 0b1);
    }
}
