//! Console trait and associated types
//!
//! A console supplies the graphics and audio backends plus the non-volatile
//! save device. The engine is generic over this trait so the same level
//! machine runs on hardware backends, the headless launcher and tests.

use anyhow::Result;

use crate::input::PadState;
use crate::save_store::SaveDevice;

// Re-export ConsoleSpecs from shared crate for convenience
pub use partybox_shared::ConsoleSpecs;

/// Trait for console implementations
pub trait Console: 'static {
    /// Graphics backend type
    type Graphics: Graphics;
    /// Audio backend type
    type Audio: Audio;

    /// Get console specifications
    fn specs() -> &'static ConsoleSpecs;

    /// Create the graphics backend for this console
    fn create_graphics(&self) -> Result<Self::Graphics>;

    /// Create the audio backend for this console
    fn create_audio(&self) -> Result<Self::Audio>;

    /// Open the non-volatile save memory.
    ///
    /// Returns `None` when no save memory is fitted; persistence then
    /// degrades to a no-op.
    fn open_save_device(&self) -> Option<Box<dyn SaveDevice>>;

    /// Map raw input to the engine's pad state
    fn map_input(&self, raw: &RawInput) -> PadState {
        PadState::from_raw(raw)
    }
}

/// Raw input from one physical controller.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawInput {
    /// D-pad
    pub dpad_up: bool,
    pub dpad_down: bool,
    pub dpad_left: bool,
    pub dpad_right: bool,

    /// C buttons
    pub c_up: bool,
    pub c_down: bool,
    pub c_left: bool,
    pub c_right: bool,

    /// Face buttons
    pub button_a: bool,
    pub button_b: bool,
    pub button_z: bool,
    pub start: bool,

    /// Shoulder buttons
    pub left_trigger: bool,
    pub right_trigger: bool,

    /// Analog stick, raw hardware range (about -85..=85)
    pub stick_x: i8,
    pub stick_y: i8,
}

/// Completion marker for commands queued on the graphics co-processor.
///
/// Obtained right after submitting a frame; waiting on it guarantees the
/// co-processor has finished reading everything submitted before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SyncPoint(pub u64);

/// Trait for graphics backends
pub trait Graphics {
    /// Begin a new frame
    fn begin_frame(&mut self);

    /// Submit the frame's commands and present
    fn end_frame(&mut self);

    /// Place a sync point after everything submitted so far
    fn sync_point(&mut self) -> SyncPoint;

    /// Block until the co-processor has passed `point`
    fn wait_sync(&mut self, point: SyncPoint);

    /// Block until every outstanding command has completed
    fn wait_idle(&mut self);
}

/// Trait for audio mixer backends
pub trait Audio {
    /// Stop whatever is playing on a mixer channel
    fn stop_channel(&mut self, channel: usize);

    /// Shut the mixer down, releasing all channels
    fn close(&mut self);

    /// Bring the mixer up with a fresh pool of `channels` channels
    fn init(&mut self, channels: usize);
}

/// No-op graphics backend for headless runs.
///
/// Every submission completes immediately, so sync points are reached as soon
/// as they are placed.
#[derive(Debug, Default)]
pub struct NullGraphics {
    submitted: u64,
}

impl Graphics for NullGraphics {
    fn begin_frame(&mut self) {}

    fn end_frame(&mut self) {
        self.submitted += 1;
    }

    fn sync_point(&mut self) -> SyncPoint {
        SyncPoint(self.submitted)
    }

    fn wait_sync(&mut self, _point: SyncPoint) {}

    fn wait_idle(&mut self) {}
}

/// No-op audio backend for consoles without a mixer
#[derive(Debug, Default)]
pub struct NullAudio;

impl Audio for NullAudio {
    fn stop_channel(&mut self, _channel: usize) {}
    fn close(&mut self) {}
    fn init(&mut self, _channels: usize) {}
}
