use crate::context::PartyContext;
use crate::input::Buttons;
use crate::level::{Level, LevelId};

/// Fade-out after Start before the setup wizard opens, in seconds.
const FADE_DURATION: f32 = 1.2;

/// Title screen: waits for Start (or A) on any controller.
#[derive(Debug, Default)]
pub struct TitleLevel {
    fade: Option<f32>,
}

impl TitleLevel {
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }
}

impl Level for TitleLevel {
    fn init(&mut self, _ctx: &mut PartyContext) {
        self.fade = None;
    }

    fn update(&mut self, ctx: &mut PartyContext, dt: f32) {
        match self.fade.as_mut() {
            None => {
                if ctx.input.any_pressed(Buttons::START | Buttons::A) {
                    self.fade = Some(FADE_DURATION);
                }
            }
            Some(remaining) => {
                *remaining -= dt;
                if *remaining < 0.0 && !ctx.was_changed() {
                    ctx.request_transition(LevelId::GameSetup);
                }
            }
        }
    }
}
