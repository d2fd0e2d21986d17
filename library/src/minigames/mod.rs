//! Demo minigames bundled with the launcher.
//!
//! Both read human input in `update` and simulate (including the AI seats)
//! in `fixed_update`. Seats past the human count are AI-controlled.

mod mash_race;
mod quick_draw;

pub use mash_race::MashRace;
pub use quick_draw::QuickDraw;

use partybox_core::MinigameRegistry;

/// Seconds a minigame lingers on its final state before handing over to the
/// results screen.
pub(crate) const OUTRO_DURATION: f32 = 1.0;

/// Registry with every bundled minigame.
pub fn registry() -> MinigameRegistry {
    let mut registry = MinigameRegistry::new();
    registry.register::<MashRace>();
    registry.register::<QuickDraw>();
    registry
}
