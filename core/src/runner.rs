//! Console runner for the party engine
//!
//! Owns the console backends, the level machine and the session context, and
//! drives them one frame at a time:
//!
//! 1. latch controller input
//! 2. promote a pending level transition
//! 3. run fixed updates to catch up with elapsed time
//! 4. run one variable update with the real frame delta

use std::time::{Duration, Instant};

use anyhow::Result;

use partybox_shared::{CONTROLLER_PORTS, MIXER_CHANNELS};

use crate::config::Config;
use crate::console::{Audio, Console, ConsoleSpecs, Graphics, RawInput};
use crate::context::PartyContext;
use crate::input::PadState;
use crate::level::LevelId;
use crate::levels::{TournamentSetup, register_builtin};
use crate::machine::LevelMachine;
use crate::minigame::MinigameRegistry;
use crate::runtime::{FixedTimestep, RuntimeConfig};
use crate::save_store::SaveState;

/// What happened during one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Fixed updates run this frame
    pub ticks: u32,
    /// Interpolation factor left over after the fixed updates
    pub alpha: f32,
    /// Level current at the end of the frame
    pub level: Option<LevelId>,
    /// Whether a transition was promoted at the start of the frame
    pub transitioned: bool,
}

/// High-level runner for any console type.
pub struct PartyRunner<C: Console> {
    console: C,
    graphics: C::Graphics,
    audio: C::Audio,
    machine: LevelMachine,
    ctx: PartyContext,
    timestep: FixedTimestep,
    pads: [PadState; CONTROLLER_PORTS],
}

impl<C: Console> PartyRunner<C> {
    /// Create a runner with the built-in levels, booting into the
    /// crash-recovery check.
    ///
    /// # Errors
    /// Returns an error if graphics or audio initialization fails.
    pub fn new(
        console: C,
        config: &Config,
        minigames: MinigameRegistry,
        seed: u64,
    ) -> Result<Self> {
        let mut machine = LevelMachine::new();
        register_builtin(&mut machine);
        Self::from_parts(console, config, minigames, machine, seed)
    }

    /// Create a runner around a caller-built level machine.
    ///
    /// The first frame still enters [`LevelId::LoadSave`], which must be
    /// registered.
    pub fn from_parts(
        console: C,
        config: &Config,
        minigames: MinigameRegistry,
        machine: LevelMachine,
        seed: u64,
    ) -> Result<Self> {
        let specs = C::specs();
        let graphics = console.create_graphics()?;
        let mut audio = console.create_audio()?;
        audio.init(MIXER_CHANNELS);

        let device = if config.storage.enabled {
            console.open_save_device()
        } else {
            None
        };
        let save = SaveState::open(device);

        let mut ctx = PartyContext::new(config, save, minigames, seed);
        ctx.request_transition(LevelId::LoadSave);

        let timestep = FixedTimestep::new(RuntimeConfig::new(&config.runtime, specs));
        tracing::info!(
            "{} runner ready: {} Hz, {} minigame(s), seed {}",
            specs.name,
            timestep.tick_rate(),
            ctx.minigames.count(),
            seed
        );

        Ok(Self {
            console,
            graphics,
            audio,
            machine,
            ctx,
            timestep,
            pads: [PadState::default(); CONTROLLER_PORTS],
        })
    }

    /// Get the console specs.
    pub fn specs(&self) -> &'static ConsoleSpecs {
        C::specs()
    }

    /// Duration of one fixed update.
    pub fn tick_duration(&self) -> Duration {
        self.timestep.tick_duration()
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn graphics(&self) -> &C::Graphics {
        &self.graphics
    }

    pub fn audio(&self) -> &C::Audio {
        &self.audio
    }

    pub fn context(&self) -> &PartyContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut PartyContext {
        &mut self.ctx
    }

    /// The level currently running.
    pub fn current_level(&self) -> Option<LevelId> {
        self.machine.current()
    }

    /// Latch raw input for a controller port. Takes effect next frame.
    pub fn set_input(&mut self, port: usize, raw: &RawInput) {
        if port < CONTROLLER_PORTS {
            self.pads[port] = self.console.map_input(raw);
        }
    }

    /// Latch an already-mapped pad state for a controller port.
    pub fn set_pad(&mut self, port: usize, pad: PadState) {
        if port < CONTROLLER_PORTS {
            self.pads[port] = pad;
        }
    }

    /// Skip the boot flow and start a tournament right away.
    pub fn start_tournament(&mut self, setup: &TournamentSetup) {
        setup.commit(&mut self.ctx);
    }

    /// Resume the tournament stored in save memory, if one was interrupted.
    ///
    /// Returns false when the save holds no unfinished tournament.
    pub fn resume_tournament(&mut self) -> bool {
        if !self.ctx.save.has_crashed() {
            return false;
        }
        self.ctx.restore_saved_session();
        self.ctx.request_transition(LevelId::MinigameSelect);
        true
    }

    /// Run a frame using wall-clock time since the previous frame.
    pub fn frame(&mut self) -> FrameReport {
        let delta = self.timestep.measure(Instant::now());
        self.frame_with_delta(delta)
    }

    /// Run a frame as if `delta` had elapsed since the previous one.
    pub fn frame_with_delta(&mut self, delta: Duration) -> FrameReport {
        self.ctx.input.advance(self.pads);
        self.graphics.begin_frame();

        let transitioned =
            self.machine
                .tick_promote(&mut self.ctx, &mut self.graphics, &mut self.audio);
        if transitioned {
            self.timestep.reset_accumulator();
        }

        let delta = self.timestep.accumulate(delta);
        let tick_dt = self.timestep.tick_duration().as_secs_f32();
        let mut ticks = 0;
        // A level that asked to leave is not simulated further.
        while !self.ctx.was_changed() && self.timestep.consume_tick() {
            let start = Instant::now();
            self.machine.tick_fixed(&mut self.ctx, tick_dt);
            self.timestep.check_budget(start.elapsed());
            ticks += 1;
        }

        let alpha = self.timestep.alpha();
        self.ctx.set_subtick(alpha);
        self.machine.tick_variable(&mut self.ctx, delta.as_secs_f32());

        self.graphics.end_frame();
        self.ctx.next_frame();

        FrameReport {
            ticks,
            alpha,
            level: self.machine.current(),
            transitioned,
        }
    }

    /// Tear down the running level and wait for the graphics queue to drain.
    pub fn shutdown(&mut self) {
        self.machine
            .shutdown(&mut self.ctx, &mut self.graphics, &mut self.audio);
        let point = self.graphics.sync_point();
        self.graphics.wait_sync(point);
        tracing::info!("Shut down after {} frame(s)", self.ctx.frame());
    }
}
