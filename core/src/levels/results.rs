use partybox_shared::NextRound;

use crate::context::PartyContext;
use crate::input::Buttons;
use crate::level::{Level, LevelId};
use crate::tournament::RoundSummary;

/// Seconds after the scoreboard settles before it can be dismissed.
const CONFIRM_DELAY: f32 = 2.0;
/// Extra time a tournament win is announced for before confirming.
const ANNOUNCE_DELAY: f32 = 3.0;
const FADE_OUT_DURATION: f32 = 0.6;
const FADE_OUT_POST_DELAY: f32 = 0.2;

// Chooser animation timeline, in seconds since confirming.
const CHOOSE_MOVE: f32 = 1.0;
const CHOOSE_SELECT: f32 = 4.0;
const CHOOSE_SELECTED: f32 = 5.0;
const CHOOSE_DONE: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultsPhase {
    /// Scoreboard, waiting for confirmation
    #[default]
    Showing,
    /// Spotlight cycling over the candidates before landing on the chooser
    SelectingNext,
    FadingOut,
}

/// Scoreboard after every minigame.
///
/// Points are awarded and the next chooser decided as soon as the level
/// starts; the rest is presentation timing.
#[derive(Debug, Default)]
pub struct ResultsLevel {
    summary: RoundSummary,
    phase: ResultsPhase,
    time: f32,
    confirm_start: f32,
    choose_anim: f32,
    fade_start: f32,
    done: bool,
}

impl ResultsLevel {
    pub fn phase(&self) -> ResultsPhase {
        self.phase
    }

    /// Outcome of the round that just ended.
    pub fn summary(&self) -> &RoundSummary {
        &self.summary
    }

    /// Whether the scoreboard is announcing a tournament winner.
    pub fn is_announcing(&self) -> bool {
        self.summary.ending && self.time > ANNOUNCE_DELAY
    }

    pub fn can_confirm(&self) -> bool {
        self.phase == ResultsPhase::Showing && self.time - self.confirm_start > CONFIRM_DELAY
    }

    /// Player the chooser spotlight is on, if the animation is showing one.
    pub fn spotlight(&self, ctx: &PartyContext) -> Option<usize> {
        if self.phase == ResultsPhase::Showing || self.choose_anim < CHOOSE_MOVE {
            return None;
        }
        let candidates = ctx.tournament.candidates();
        if self.choose_anim < CHOOSE_SELECT && !candidates.is_empty() {
            let count = candidates.len();
            let step = ((self.choose_anim - CHOOSE_MOVE) * (count * 3) as f32) as usize;
            return Some(candidates[step % count]);
        }
        ctx.tournament.chooser()
    }

    /// Fade-to-black factor, 0.0 to 1.0.
    pub fn fade(&self) -> f32 {
        if self.phase != ResultsPhase::FadingOut {
            return 0.0;
        }
        ((self.time - self.fade_start) / FADE_OUT_DURATION).min(1.0)
    }

    fn start_fade(&mut self) {
        self.phase = ResultsPhase::FadingOut;
        self.fade_start = self.time;
    }

    fn confirm(&mut self, ctx: &PartyContext) {
        let policy = ctx.tournament.policy();
        if self.summary.ending || !policy.has_chooser() {
            self.start_fade();
        } else {
            self.phase = ResultsPhase::SelectingNext;
            self.choose_anim = 0.0;
        }
    }

    fn animate_chooser(&mut self, ctx: &PartyContext, dt: f32) {
        self.choose_anim += dt;
        // Nothing to spin through with a single candidate.
        if ctx.tournament.candidates().len() <= 1
            && (CHOOSE_MOVE..CHOOSE_SELECTED).contains(&self.choose_anim)
        {
            self.choose_anim = CHOOSE_SELECTED;
        }
        if self.choose_anim >= CHOOSE_DONE {
            self.start_fade();
        }
    }

    fn finish(&mut self, ctx: &mut PartyContext) {
        self.done = true;
        if self.summary.ending {
            tracing::info!(
                "Tournament won by player(s) {:?}",
                self.summary.champions.as_slice()
            );
            ctx.tournament.reset_points();
            ctx.save.clear_crash_flag();
            ctx.request_transition(LevelId::MainMenu);
        } else {
            ctx.request_transition(LevelId::MinigameSelect);
        }
    }
}

impl Level for ResultsLevel {
    fn init(&mut self, ctx: &mut PartyContext) {
        let summary = ctx.tournament.finalize_round();
        let confirm_start = if summary.ending { ANNOUNCE_DELAY } else { 0.0 };

        if !summary.ending && ctx.tournament.policy() != NextRound::FreePlay {
            let chooser = ctx.tournament.select_next_chooser(&mut ctx.rng);
            tracing::debug!(
                "Next chooser {:?} from {:?}",
                chooser,
                ctx.tournament.candidates()
            );
        }

        *self = Self {
            summary,
            confirm_start,
            ..Self::default()
        };
    }

    fn update(&mut self, ctx: &mut PartyContext, dt: f32) {
        if self.done || ctx.was_changed() {
            return;
        }
        self.time += dt;

        match self.phase {
            ResultsPhase::Showing => {
                let auto = ctx.player_count() == 0;
                if self.can_confirm() && (auto || ctx.input.any_pressed(Buttons::A)) {
                    self.confirm(ctx);
                }
            }
            ResultsPhase::SelectingNext => self.animate_chooser(ctx, dt),
            ResultsPhase::FadingOut => {
                if self.time > self.fade_start + FADE_OUT_DURATION + FADE_OUT_POST_DELAY {
                    self.finish(ctx);
                }
            }
        }
    }
}
