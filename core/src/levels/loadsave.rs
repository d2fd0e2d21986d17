use crate::context::PartyContext;
use crate::input::Buttons;
use crate::level::{Level, LevelId};

/// Text of the crash-recovery prompt.
pub const CRASH_PROMPT: &str = "A crash was detected.\nWould you like to restore the save?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestoreChoice {
    #[default]
    Yes,
    No,
}

impl RestoreChoice {
    fn toggled(self) -> Self {
        match self {
            RestoreChoice::Yes => RestoreChoice::No,
            RestoreChoice::No => RestoreChoice::Yes,
        }
    }
}

/// Boot level: offers to resume a tournament that did not finish cleanly.
#[derive(Debug, Default)]
pub struct LoadSaveLevel {
    prompting: bool,
    choice: RestoreChoice,
}

impl LoadSaveLevel {
    /// Whether the Yes/No prompt is showing.
    pub fn is_prompting(&self) -> bool {
        self.prompting
    }

    pub fn choice(&self) -> RestoreChoice {
        self.choice
    }
}

impl Level for LoadSaveLevel {
    fn init(&mut self, ctx: &mut PartyContext) {
        self.choice = RestoreChoice::Yes;
        self.prompting = ctx.save.has_crashed();
        if !self.prompting {
            ctx.request_transition(LevelId::MainMenu);
        } else {
            tracing::info!("Unfinished tournament found in save memory");
        }
    }

    fn update(&mut self, ctx: &mut PartyContext, _dt: f32) {
        if !self.prompting || ctx.was_changed() {
            return;
        }

        if ctx.input.any_left() || ctx.input.any_right() {
            self.choice = self.choice.toggled();
        } else if ctx.input.any_pressed(Buttons::A) {
            match self.choice {
                RestoreChoice::Yes => {
                    ctx.restore_saved_session();
                    ctx.request_transition(LevelId::MinigameSelect);
                }
                RestoreChoice::No => {
                    tracing::info!("Save restore declined");
                    ctx.save.clear_crash_flag();
                    ctx.request_transition(LevelId::MainMenu);
                }
            }
        }
    }
}
