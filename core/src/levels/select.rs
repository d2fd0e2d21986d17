use smallvec::SmallVec;

use partybox_shared::{CONTROLLER_PORTS, NextRound};

use crate::context::PartyContext;
use crate::input::Buttons;
use crate::level::{Level, LevelId};

/// Delay before the console picks on behalf of an AI chooser, in seconds.
const AUTO_PICK_DELAY: f32 = 1.5;

/// Who decides the next minigame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Picker {
    /// A human chooser on their own controller
    Player { player: usize, port: usize },
    /// Free play: any human controller
    AnyHuman,
    /// The console picks at random (AI chooser or random-game policy)
    #[default]
    Auto,
}

impl Picker {
    fn for_session(ctx: &PartyContext) -> Self {
        match ctx.tournament.policy() {
            NextRound::RandomGame => Picker::Auto,
            NextRound::FreePlay if ctx.player_count() > 0 => Picker::AnyHuman,
            NextRound::FreePlay => Picker::Auto,
            _ => match ctx.tournament.chooser() {
                Some(player) if ctx.is_human(player) => Picker::Player {
                    player,
                    port: ctx.controller_for(player),
                },
                _ => Picker::Auto,
            },
        }
    }

    fn accepts_port(self, ctx: &PartyContext, port: usize) -> bool {
        match self {
            Picker::Player { port: p, .. } => p == port,
            Picker::AnyHuman => ctx.roster.player_for_port(port).is_some(),
            Picker::Auto => false,
        }
    }
}

/// Minigame picker shown before every round.
#[derive(Debug, Default)]
pub struct MinigameSelectLevel {
    /// Registry indices on offer, in display order
    list: Vec<usize>,
    cursor: usize,
    has_moved: bool,
    picker: Picker,
    timer: f32,
    picked: bool,
}

impl MinigameSelectLevel {
    pub fn picker(&self) -> Picker {
        self.picker
    }

    /// Registry indices on offer, in display order.
    pub fn list(&self) -> &[usize] {
        &self.list
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Registry index under the cursor.
    pub fn highlighted(&self) -> Option<usize> {
        self.list.get(self.cursor).copied()
    }

    fn pick(&mut self, ctx: &mut PartyContext, game: usize) {
        self.picked = true;
        ctx.minigames.select(game);
        ctx.save_progress(true);
        ctx.request_transition(LevelId::Minigame);
    }

    fn navigate(&mut self, offset: i32) {
        if offset == 0 {
            self.has_moved = false;
            return;
        }
        if self.has_moved || self.list.is_empty() {
            return;
        }
        let last = self.list.len() as i32 - 1;
        self.cursor = (self.cursor as i32 + offset).clamp(0, last) as usize;
        self.has_moved = true;
    }
}

impl Level for MinigameSelectLevel {
    fn init(&mut self, ctx: &mut PartyContext) {
        let mut list = ctx.minigames.allowed_indices(ctx.save.blacklist());
        if list.is_empty() {
            list = ctx.minigames.sorted_indices();
        }
        if list.is_empty() {
            tracing::warn!("No minigames registered; nothing to pick");
        }

        let cursor = ctx
            .minigames
            .selected()
            .and_then(|game| list.iter().position(|&g| g == game))
            .unwrap_or(0);

        *self = Self {
            list,
            cursor,
            picker: Picker::for_session(ctx),
            ..Self::default()
        };
        tracing::debug!("Minigame picker: {:?}", self.picker);
    }

    fn update(&mut self, ctx: &mut PartyContext, dt: f32) {
        if self.picked || ctx.was_changed() || self.list.is_empty() {
            return;
        }
        self.timer += dt;

        if self.picker == Picker::Auto {
            if self.timer >= AUTO_PICK_DELAY {
                let blacklist = ctx.save.blacklist();
                if let Some(game) = ctx.minigames.random_allowed(blacklist, &mut ctx.rng) {
                    self.pick(ctx, game);
                }
            }
            return;
        }

        let ports: SmallVec<[usize; CONTROLLER_PORTS]> = (0..CONTROLLER_PORTS)
            .filter(|&port| self.picker.accepts_port(ctx, port))
            .collect();

        let offset = ports
            .iter()
            .map(|&port| ctx.input.direction(port).selection_offset())
            .find(|&o| o != 0)
            .unwrap_or(0);
        self.navigate(offset);

        let confirmed = ports
            .iter()
            .any(|&port| ctx.input.pressed(port).contains(Buttons::A));
        if confirmed {
            if let Some(game) = self.highlighted() {
                self.pick(ctx, game);
            }
        }
    }
}
