//! Level identifiers and the level lifecycle trait.

use crate::context::PartyContext;

/// Every level the engine knows about.
///
/// `Minigame` is a slot rather than a fixed level: it is rebound to a fresh
/// instance of the selected minigame each time it is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelId {
    /// Crash-recovery prompt shown at boot
    LoadSave,
    /// Title screen
    MainMenu,
    /// Tournament setup wizard
    GameSetup,
    /// Minigame picker
    MinigameSelect,
    /// The currently loaded minigame
    Minigame,
    /// Round results and next chooser
    Results,
}

impl LevelId {
    pub const ALL: [LevelId; 6] = [
        LevelId::LoadSave,
        LevelId::MainMenu,
        LevelId::GameSetup,
        LevelId::MinigameSelect,
        LevelId::Minigame,
        LevelId::Results,
    ];
}

/// Lifecycle hooks of a level.
///
/// Every hook is optional. `init` runs once when the level becomes current,
/// `update` once per frame with the real frame delta, `fixed_update` zero or
/// more times per frame at the fixed tick rate, and `cleanup` once when the
/// level is torn down.
pub trait Level {
    fn init(&mut self, _ctx: &mut PartyContext) {}

    fn update(&mut self, _ctx: &mut PartyContext, _dt: f32) {}

    fn fixed_update(&mut self, _ctx: &mut PartyContext, _dt: f32) {}

    fn cleanup(&mut self, _ctx: &mut PartyContext) {}
}
