//! Level lifecycle state machine
//!
//! Holds every registered level plus the minigame slot, and performs the
//! promotion of a requested level at the start of each tick.

use hashbrown::HashMap;

use partybox_shared::MIXER_CHANNELS;

use crate::console::{Audio, Graphics};
use crate::context::PartyContext;
use crate::level::{Level, LevelId};

#[derive(Default)]
pub struct LevelMachine {
    levels: HashMap<LevelId, Box<dyn Level>>,
    minigame: Option<Box<dyn Level>>,
    current: Option<LevelId>,
}

impl LevelMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the level that runs for `id`.
    ///
    /// # Panics
    ///
    /// Panics for the minigame slot, which is filled from the minigame
    /// registry instead.
    pub fn register(&mut self, id: LevelId, level: Box<dyn Level>) {
        assert!(
            id != LevelId::Minigame,
            "the minigame level is bound from the minigame registry"
        );
        self.levels.insert(id, level);
    }

    pub fn is_registered(&self, id: LevelId) -> bool {
        id == LevelId::Minigame || self.levels.contains_key(&id)
    }

    /// The level currently running.
    pub fn current(&self) -> Option<LevelId> {
        self.current
    }

    /// Promote the pending level, if any.
    ///
    /// The outgoing level is torn down first. Entering the minigame level
    /// clears every round winner before its `init` runs. Returns whether a
    /// transition happened.
    ///
    /// # Panics
    ///
    /// Panics if the requested level was never registered.
    pub fn tick_promote<G: Graphics, A: Audio>(
        &mut self,
        ctx: &mut PartyContext,
        graphics: &mut G,
        audio: &mut A,
    ) -> bool {
        let Some(pending) = ctx.take_pending() else {
            return false;
        };
        assert!(
            self.is_registered(pending.id),
            "level {:?} is not registered",
            pending.id
        );

        if let Some(outgoing) = self.current.take() {
            self.teardown(outgoing, ctx, graphics, audio);
        }

        tracing::info!("Entering level {:?}", pending.id);
        if let Some(minigame) = pending.minigame {
            self.minigame = Some(minigame);
        }
        self.current = Some(pending.id);

        if pending.id == LevelId::Minigame {
            ctx.tournament.reset_winners();
        }
        self.level_mut(pending.id).init(ctx);
        true
    }

    /// Run the current level's per-frame update.
    pub fn tick_variable(&mut self, ctx: &mut PartyContext, dt: f32) {
        if let Some(id) = self.current {
            self.level_mut(id).update(ctx, dt);
        }
    }

    /// Run one fixed-rate update of the current level.
    pub fn tick_fixed(&mut self, ctx: &mut PartyContext, dt: f32) {
        if let Some(id) = self.current {
            self.level_mut(id).fixed_update(ctx, dt);
        }
    }

    /// Tear down the current level without replacing it (shutdown).
    pub fn shutdown<G: Graphics, A: Audio>(
        &mut self,
        ctx: &mut PartyContext,
        graphics: &mut G,
        audio: &mut A,
    ) {
        if let Some(outgoing) = self.current.take() {
            self.teardown(outgoing, ctx, graphics, audio);
        }
    }

    fn teardown<G: Graphics, A: Audio>(
        &mut self,
        id: LevelId,
        ctx: &mut PartyContext,
        graphics: &mut G,
        audio: &mut A,
    ) {
        tracing::debug!("Leaving level {:?}", id);

        // Nothing queued on the co-processor may still reference level data.
        graphics.wait_idle();
        for channel in 0..MIXER_CHANNELS {
            audio.stop_channel(channel);
        }

        self.level_mut(id).cleanup(ctx);
        if id == LevelId::Minigame {
            self.minigame = None;
            ctx.minigames.cleanup();
        }

        audio.close();
        audio.init(MIXER_CHANNELS);
    }

    fn level_mut(&mut self, id: LevelId) -> &mut (dyn Level + 'static) {
        let level = match id {
            LevelId::Minigame => self.minigame.as_deref_mut(),
            _ => self.levels.get_mut(&id).map(|level| level.as_mut()),
        };
        match level {
            Some(level) => level,
            None => panic!("level {:?} is not registered", id),
        }
    }
}

impl std::fmt::Debug for LevelMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelMachine")
            .field("registered", &self.levels.keys().collect::<Vec<_>>())
            .field("minigame_loaded", &self.minigame.is_some())
            .field("current", &self.current)
            .finish()
    }
}
