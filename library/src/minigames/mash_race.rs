use rand::Rng;

use partybox_core::input::Buttons;
use partybox_core::{Level, LevelId, Minigame, PartyContext};
use partybox_shared::{AiDifficulty, MAX_PLAYERS, MinigameInfo};

use super::OUTRO_DURATION;

/// Presses needed to cross the line.
const GOAL: u32 = 40;
/// The race is called after this many seconds.
const TIME_LIMIT: f32 = 12.0;

/// AI presses per second.
fn ai_rate(difficulty: AiDifficulty) -> f32 {
    match difficulty {
        AiDifficulty::Easy => 4.0,
        AiDifficulty::Medium => 6.0,
        AiDifficulty::Hard => 8.0,
    }
}

/// Mash A to run; first to the line wins.
#[derive(Debug, Default)]
pub struct MashRace {
    progress: [u32; MAX_PLAYERS],
    next_ai_press: [f32; MAX_PLAYERS],
    elapsed: f32,
    outro: Option<f32>,
}

impl MashRace {
    pub fn progress(&self) -> [u32; MAX_PLAYERS] {
        self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.outro.is_some()
    }

    fn ai_interval<R: Rng + ?Sized>(rate: f32, rng: &mut R) -> f32 {
        rng.random_range(0.7..1.3) / rate
    }

    fn finish(&mut self, ctx: &mut PartyContext) {
        let best = self.progress.iter().copied().max().unwrap_or(0);
        if best > 0 {
            for seat in 0..MAX_PLAYERS {
                if self.progress[seat] == best {
                    ctx.declare_winner(seat);
                }
            }
        }
        tracing::debug!(
            "Mash race over after {:.1}s: {:?}",
            self.elapsed,
            self.progress
        );
        self.outro = Some(OUTRO_DURATION);
    }
}

impl Level for MashRace {
    fn init(&mut self, ctx: &mut PartyContext) {
        let rate = ai_rate(ctx.ai_difficulty());
        *self = Self::default();
        for seat in ctx.player_count()..MAX_PLAYERS {
            self.next_ai_press[seat] = Self::ai_interval(rate, &mut ctx.rng);
        }
    }

    fn update(&mut self, ctx: &mut PartyContext, _dt: f32) {
        if self.is_finished() {
            return;
        }
        for player in 0..ctx.player_count() {
            let port = ctx.controller_for(player);
            if ctx.input.pressed(port).contains(Buttons::A) {
                self.progress[player] += 1;
            }
        }
    }

    fn fixed_update(&mut self, ctx: &mut PartyContext, dt: f32) {
        if let Some(remaining) = self.outro.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 && !ctx.was_changed() {
                ctx.request_transition(LevelId::Results);
            }
            return;
        }

        self.elapsed += dt;
        let rate = ai_rate(ctx.ai_difficulty());
        for seat in ctx.player_count()..MAX_PLAYERS {
            self.next_ai_press[seat] -= dt;
            if self.next_ai_press[seat] <= 0.0 {
                self.progress[seat] += 1;
                self.next_ai_press[seat] += Self::ai_interval(rate, &mut ctx.rng);
            }
        }

        let crossed = self.progress.iter().any(|&p| p >= GOAL);
        if crossed || self.elapsed >= TIME_LIMIT {
            self.finish(ctx);
        }
    }
}

impl Minigame for MashRace {
    const INTERNAL_NAME: &'static str = "mash_race";

    fn info() -> MinigameInfo {
        MinigameInfo::new(
            "Mash Race",
            "Partybox",
            "A sprint decided entirely by how fast you can press a button.",
            "Mash A to run. First across the line wins.",
        )
    }
}
