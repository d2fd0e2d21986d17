//! Shared test utilities for integration and unit tests

use std::cell::RefCell;
use std::rc::Rc;

use rand::Rng;

use partybox_shared::{CONTROLLER_PORTS, ConsoleSpecs, MAX_PLAYERS, MinigameInfo, partybox_specs};

use crate::config::Config;
use crate::console::{Audio, Console, Graphics, SyncPoint};
use crate::context::PartyContext;
use crate::input::{Buttons, PadState};
use crate::level::{Level, LevelId};
use crate::minigame::{Minigame, MinigameRegistry};
use crate::save_store::{MemorySaveDevice, SaveDevice, SaveState};

// ============================================================================
// Event log
// ============================================================================

/// Something a test backend or level observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Init(LevelId),
    Update(LevelId),
    FixedUpdate(LevelId),
    Cleanup(LevelId),
    BeginFrame,
    EndFrame,
    WaitIdle,
    StopChannel(usize),
    MixerClose,
    MixerInit(usize),
}

/// Shared, ordered record of events.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<Event>>>);

impl EventLog {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    /// Drain every event recorded so far.
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    /// Events recorded so far, ignoring frame boundaries.
    pub fn lifecycle(&self) -> Vec<Event> {
        self.take()
            .into_iter()
            .filter(|e| !matches!(e, Event::BeginFrame | Event::EndFrame))
            .collect()
    }
}

// ============================================================================
// Test levels
// ============================================================================

/// Level that logs every hook it receives.
pub struct RecordingLevel {
    id: LevelId,
    log: EventLog,
    redirect: Option<LevelId>,
}

impl RecordingLevel {
    pub fn new(id: LevelId, log: &EventLog) -> Self {
        Self {
            id,
            log: log.clone(),
            redirect: None,
        }
    }

    /// Request `next` from `init`, like a level that only decides where to go.
    pub fn redirect_on_init(mut self, next: LevelId) -> Self {
        self.redirect = Some(next);
        self
    }
}

impl Level for RecordingLevel {
    fn init(&mut self, ctx: &mut PartyContext) {
        self.log.push(Event::Init(self.id));
        if let Some(next) = self.redirect {
            ctx.request_transition(next);
        }
    }

    fn update(&mut self, _ctx: &mut PartyContext, _dt: f32) {
        self.log.push(Event::Update(self.id));
    }

    fn fixed_update(&mut self, _ctx: &mut PartyContext, _dt: f32) {
        self.log.push(Event::FixedUpdate(self.id));
    }

    fn cleanup(&mut self, _ctx: &mut PartyContext) {
        self.log.push(Event::Cleanup(self.id));
    }
}

/// Minigame that hands the round to a random seat after half a second.
#[derive(Debug, Default)]
pub struct SprintMinigame {
    elapsed: f32,
    finished: bool,
}

impl Level for SprintMinigame {
    fn fixed_update(&mut self, ctx: &mut PartyContext, dt: f32) {
        if self.finished {
            return;
        }
        self.elapsed += dt;
        if self.elapsed >= 0.5 {
            let winner = ctx.rng.random_range(0..MAX_PLAYERS);
            ctx.declare_winner(winner);
            ctx.request_transition(LevelId::Results);
            self.finished = true;
        }
    }
}

impl Minigame for SprintMinigame {
    const INTERNAL_NAME: &'static str = "sprint";

    fn info() -> MinigameInfo {
        MinigameInfo::new("Sprint", "Test Studio", "First to the line.", "Mash A.")
    }
}

// ============================================================================
// Test console
// ============================================================================

/// Graphics backend that logs frame boundaries and idle waits.
pub struct TestGraphics {
    log: EventLog,
    submitted: u64,
}

impl TestGraphics {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            submitted: 0,
        }
    }
}

impl Graphics for TestGraphics {
    fn begin_frame(&mut self) {
        self.log.push(Event::BeginFrame);
    }

    fn end_frame(&mut self) {
        self.submitted += 1;
        self.log.push(Event::EndFrame);
    }

    fn sync_point(&mut self) -> SyncPoint {
        SyncPoint(self.submitted)
    }

    fn wait_sync(&mut self, _point: SyncPoint) {}

    fn wait_idle(&mut self) {
        self.log.push(Event::WaitIdle);
    }
}

/// Mixer backend that logs channel and lifecycle calls.
pub struct TestAudio {
    log: EventLog,
}

impl TestAudio {
    pub fn new(log: &EventLog) -> Self {
        Self { log: log.clone() }
    }
}

impl Audio for TestAudio {
    fn stop_channel(&mut self, channel: usize) {
        self.log.push(Event::StopChannel(channel));
    }

    fn close(&mut self) {
        self.log.push(Event::MixerClose);
    }

    fn init(&mut self, channels: usize) {
        self.log.push(Event::MixerInit(channels));
    }
}

/// Test console for integration and unit tests
pub struct TestConsole {
    log: EventLog,
    save: Option<MemorySaveDevice>,
}

impl TestConsole {
    /// A console with no save memory.
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            save: None,
        }
    }

    /// A console whose save memory is `device`. Clones share the buffer, so
    /// the same device survives a simulated power cycle.
    pub fn with_save(log: &EventLog, device: &MemorySaveDevice) -> Self {
        Self {
            log: log.clone(),
            save: Some(device.clone()),
        }
    }
}

impl Console for TestConsole {
    type Graphics = TestGraphics;
    type Audio = TestAudio;

    fn specs() -> &'static ConsoleSpecs {
        partybox_specs()
    }

    fn create_graphics(&self) -> anyhow::Result<Self::Graphics> {
        Ok(TestGraphics::new(&self.log))
    }

    fn create_audio(&self) -> anyhow::Result<Self::Audio> {
        Ok(TestAudio::new(&self.log))
    }

    fn open_save_device(&self) -> Option<Box<dyn SaveDevice>> {
        self.save
            .as_ref()
            .map(|device| Box::new(device.clone()) as Box<dyn SaveDevice>)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Registry with a logging minigame ("recorder") and [`SprintMinigame`].
pub fn test_registry(log: &EventLog) -> MinigameRegistry {
    let mut registry = MinigameRegistry::new();
    let recorder_log = log.clone();
    registry.register_with(
        "recorder",
        MinigameInfo::new("Recorder", "Test Studio", "Logs its hooks.", "None."),
        move || Box::new(RecordingLevel::new(LevelId::Minigame, &recorder_log)) as Box<dyn Level>,
    );
    registry.register::<SprintMinigame>();
    registry
}

/// Context with no save memory, no humans and a fixed seed.
pub fn test_context(log: &EventLog) -> PartyContext {
    PartyContext::new(&Config::default(), SaveState::absent(), test_registry(log), 42)
}

/// Advance input one frame with only `port` holding `buttons`.
pub fn press(ctx: &mut PartyContext, port: usize, buttons: Buttons) {
    let mut pads = [PadState::default(); CONTROLLER_PORTS];
    pads[port] = PadState::with_buttons(buttons);
    ctx.input.advance(pads);
}

/// Advance input one frame with every controller idle.
pub fn release_all(ctx: &mut PartyContext) {
    ctx.input.advance([PadState::default(); CONTROLLER_PORTS]);
}
