//! Built-in levels
//!
//! Flow logic only; drawing is left to the console backend.

mod loadsave;
mod results;
mod select;
mod setup;
mod title;

pub use loadsave::{CRASH_PROMPT, LoadSaveLevel, RestoreChoice};
pub use results::{ResultsLevel, ResultsPhase};
pub use select::{MinigameSelectLevel, Picker};
pub use setup::{SetupStage, SetupWizard, TournamentSetup};
pub use title::TitleLevel;

use crate::level::LevelId;
use crate::machine::LevelMachine;

/// Register every built-in level. The minigame slot is filled on demand.
pub fn register_builtin(machine: &mut LevelMachine) {
    machine.register(LevelId::LoadSave, Box::new(LoadSaveLevel::default()));
    machine.register(LevelId::MainMenu, Box::new(TitleLevel::default()));
    machine.register(LevelId::GameSetup, Box::new(SetupWizard::default()));
    machine.register(
        LevelId::MinigameSelect,
        Box::new(MinigameSelectLevel::default()),
    );
    machine.register(LevelId::Results, Box::new(ResultsLevel::default()));
}

/// Tracks how long a button stays down.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldTimer {
    elapsed: f32,
}

impl HoldTimer {
    /// Advance by `dt`. Returns true once the button has been held for
    /// `duration` seconds, then starts over. Releasing resets the count.
    pub fn tick(&mut self, held: bool, dt: f32, duration: f32) -> bool {
        if !held {
            self.elapsed = 0.0;
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= duration {
            self.elapsed = 0.0;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Fraction of `duration` held so far, for progress rings.
    pub fn progress(&self, duration: f32) -> f32 {
        (self.elapsed / duration).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hold_timer_fires_after_duration() {
        let mut timer = HoldTimer::default();
        assert!(!timer.tick(true, 0.4, 1.0));
        assert!(!timer.tick(true, 0.4, 1.0));
        assert!((timer.progress(1.0) - 0.8).abs() < 1e-5);
        assert!(timer.tick(true, 0.4, 1.0));
        assert_eq!(timer.progress(1.0), 0.0);
    }

    #[test]
    fn releasing_resets_hold() {
        let mut timer = HoldTimer::default();
        timer.tick(true, 0.9, 1.0);
        timer.tick(false, 0.1, 1.0);
        assert!(!timer.tick(true, 0.5, 1.0));
    }
}
