use rand::Rng;

use partybox_core::input::Buttons;
use partybox_core::{Level, LevelId, Minigame, PartyContext};
use partybox_shared::{AiDifficulty, MAX_PLAYERS, MinigameInfo};

use super::OUTRO_DURATION;

/// Seconds after the signal before slow players are given up on.
const TIMEOUT: f32 = 3.0;

/// Typical AI reaction time in seconds.
fn ai_reaction(difficulty: AiDifficulty) -> f32 {
    match difficulty {
        AiDifficulty::Easy => 0.7,
        AiDifficulty::Medium => 0.45,
        AiDifficulty::Hard => 0.28,
    }
}

/// Wait for the signal, then press A before anyone else.
///
/// Pressing early disqualifies the seat for the round.
#[derive(Debug, Default)]
pub struct QuickDraw {
    signal_at: f32,
    elapsed: f32,
    reactions: [Option<f32>; MAX_PLAYERS],
    fouled: [bool; MAX_PLAYERS],
    ai_reactions: [f32; MAX_PLAYERS],
    outro: Option<f32>,
}

impl QuickDraw {
    pub fn signal_shown(&self) -> bool {
        self.elapsed >= self.signal_at
    }

    /// Reaction time of a seat, once it has drawn.
    pub fn reaction(&self, seat: usize) -> Option<f32> {
        self.reactions.get(seat).copied().flatten()
    }

    pub fn is_fouled(&self, seat: usize) -> bool {
        self.fouled.get(seat).copied().unwrap_or(false)
    }

    pub fn is_finished(&self) -> bool {
        self.outro.is_some()
    }

    fn everyone_done(&self) -> bool {
        (0..MAX_PLAYERS).all(|seat| self.fouled[seat] || self.reactions[seat].is_some())
    }

    fn finish(&mut self, ctx: &mut PartyContext) {
        let fastest = (0..MAX_PLAYERS)
            .filter(|&seat| !self.fouled[seat])
            .filter_map(|seat| self.reactions[seat])
            .reduce(f32::min);
        if let Some(fastest) = fastest {
            for seat in 0..MAX_PLAYERS {
                if !self.fouled[seat] && self.reactions[seat] == Some(fastest) {
                    ctx.declare_winner(seat);
                }
            }
        }
        tracing::debug!(
            "Quick draw over: reactions {:?}, fouls {:?}",
            self.reactions,
            self.fouled
        );
        self.outro = Some(OUTRO_DURATION);
    }
}

impl Level for QuickDraw {
    fn init(&mut self, ctx: &mut PartyContext) {
        let base = ai_reaction(ctx.ai_difficulty());
        *self = Self {
            signal_at: ctx.rng.random_range(1.5..3.5),
            ..Self::default()
        };
        for seat in ctx.player_count()..MAX_PLAYERS {
            self.ai_reactions[seat] = base * ctx.rng.random_range(0.8..1.2);
        }
    }

    fn update(&mut self, ctx: &mut PartyContext, _dt: f32) {
        if self.is_finished() {
            return;
        }
        for player in 0..ctx.player_count() {
            let port = ctx.controller_for(player);
            if !ctx.input.pressed(port).contains(Buttons::A) {
                continue;
            }
            if self.fouled[player] || self.reactions[player].is_some() {
                continue;
            }
            if self.signal_shown() {
                self.reactions[player] = Some(self.elapsed - self.signal_at);
            } else {
                tracing::debug!("Player {} drew early", player);
                self.fouled[player] = true;
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
        if self.signal_shown() {
            let since_signal = self.elapsed - self.signal_at;
            for seat in ctx.player_count()..MAX_PLAYERS {
                if self.reactions[seat].is_none() && since_signal >= self.ai_reactions[seat] {
                    self.reactions[seat] = Some(self.ai_reactions[seat]);
                }
            }
            if self.everyone_done() || since_signal >= TIMEOUT {
                self.finish(ctx);
            }
        } else if self.everyone_done() {
            // Every human drew early and there is no AI left to wait for.
            self.finish(ctx);
        }
    }
}

impl Minigame for QuickDraw {
    const INTERNAL_NAME: &'static str = "quick_draw";

    fn info() -> MinigameInfo {
        MinigameInfo::new(
            "Quick Draw",
            "Partybox",
            "High noon. Wait for the signal and draw faster than everyone else.",
            "Press A as soon as the signal appears. Drawing early disqualifies you.",
        )
    }
}
