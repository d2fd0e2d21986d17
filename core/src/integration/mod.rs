//! Integration tests for the Partybox core framework
//!
//! Drive a full [`PartyRunner`](crate::runner::PartyRunner) through boot,
//! setup, tournament rounds and crash recovery.

#[cfg(test)]
mod setup_flow_tests;

#[cfg(test)]
pub(crate) mod test_utils {
    use std::time::Duration;

    use partybox_shared::{AiDifficulty, CONTROLLER_PORTS, NextRound, SaveRecord};

    use crate::{
        config::Config,
        input::{Buttons, PadState},
        level::LevelId,
        levels::TournamentSetup,
        runner::PartyRunner,
        save_store::MemorySaveDevice,
        test_utils::{EventLog, TestConsole, test_registry},
    };

    /// Slightly longer than one 30 Hz tick.
    pub const FRAME: Duration = Duration::from_millis(34);

    /// Registry bit of the "recorder" minigame, which never finishes.
    pub const NO_RECORDER: u32 = 0b01;

    pub type TestRunner = PartyRunner<TestConsole>;

    pub fn runner_with_save(log: &EventLog, device: &MemorySaveDevice, seed: u64) -> TestRunner {
        PartyRunner::new(
            TestConsole::with_save(log, device),
            &Config::default(),
            test_registry(log),
            seed,
        )
        .unwrap()
    }

    /// AI-only tournament that only plays the sprint minigame.
    pub fn ai_tournament(points_to_win: u8, next_round: NextRound) -> TournamentSetup {
        TournamentSetup {
            enabled_ports: [false; CONTROLLER_PORTS],
            ai_difficulty: AiDifficulty::Medium,
            points_to_win,
            next_round,
            blacklist: NO_RECORDER,
        }
    }

    pub fn run_frames(runner: &mut TestRunner, frames: usize) {
        for _ in 0..frames {
            runner.frame_with_delta(FRAME);
        }
    }

    pub fn run_seconds(runner: &mut TestRunner, seconds: f32) {
        run_frames(runner, (seconds / FRAME.as_secs_f32()).ceil() as usize);
    }

    /// Run until `level` is current. Returns false if it never shows up.
    pub fn run_until_level(runner: &mut TestRunner, level: LevelId, max_frames: usize) -> bool {
        for _ in 0..max_frames {
            if runner.current_level() == Some(level) {
                return true;
            }
            runner.frame_with_delta(FRAME);
        }
        runner.current_level() == Some(level)
    }

    /// Press and release `buttons` on `port` over two frames.
    pub fn tap(runner: &mut TestRunner, port: usize, buttons: Buttons) {
        runner.set_pad(port, PadState::with_buttons(buttons));
        runner.frame_with_delta(FRAME);
        runner.set_pad(port, PadState::default());
        runner.frame_with_delta(FRAME);
    }

    /// Hold `buttons` on `port` for `seconds`, then release.
    pub fn hold(runner: &mut TestRunner, port: usize, buttons: Buttons, seconds: f32) {
        runner.set_pad(port, PadState::with_buttons(buttons));
        run_seconds(runner, seconds);
        runner.set_pad(port, PadState::default());
        runner.frame_with_delta(FRAME);
    }

    /// Decode what is currently in save memory.
    pub fn stored_record(device: &MemorySaveDevice) -> SaveRecord {
        SaveRecord::from_bytes(&device.contents()).unwrap()
    }
}
