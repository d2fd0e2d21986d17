//! Headless tournament launcher
//!
//! Boots a [`PartyRunner`] on the [`HeadlessConsole`] with the bundled
//! minigames, skips the setup wizard and plays frames at the fixed tick rate
//! until the tournament returns to the title screen. Human seats are driven
//! by an autopilot that taps A.

use std::path::PathBuf;

use anyhow::Result;

use partybox_core::config::{self, Config};
use partybox_core::input::{Buttons, PadState};
use partybox_core::{LevelId, PartyRunner, TournamentSetup};
use partybox_shared::{
    AiDifficulty, CONTROLLER_PORTS, MAX_PLAYERS, MAX_POINTS_TO_WIN, MIN_POINTS_TO_WIN, NextRound,
};

use crate::console::HeadlessConsole;
use crate::minigames;

/// Frame cap used when none is given: ten minutes at 30 Hz.
pub const DEFAULT_MAX_FRAMES: u64 = 18_000;

/// How a headless tournament should be run.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Controller ports with a human seated
    pub players: Vec<usize>,
    /// Overrides the configured points to win
    pub points: Option<u8>,
    /// Overrides the configured next-round policy
    pub policy: Option<NextRound>,
    /// Overrides the configured AI difficulty
    pub difficulty: Option<AiDifficulty>,
    /// Overrides the configured save memory image
    pub save: Option<PathBuf>,
    /// Run without save memory
    pub no_save: bool,
    pub seed: u64,
    pub max_frames: u64,
    /// Continue an interrupted tournament instead of starting a new one
    pub resume: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            players: Vec::new(),
            points: None,
            policy: None,
            difficulty: None,
            save: None,
            no_save: false,
            seed: 0,
            max_frames: DEFAULT_MAX_FRAMES,
            resume: false,
        }
    }
}

/// What a headless tournament ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentOutcome {
    pub frames: u64,
    /// Rounds that reached the results screen
    pub rounds: u32,
    /// Whether the tournament ended before the frame cap
    pub finished: bool,
    /// Human seats; the rest were AI
    pub humans: usize,
    /// Points as shown on the last results screen
    pub final_points: [u8; MAX_PLAYERS],
    /// Seats that had reached the points to win on the last results screen
    pub champions: Vec<usize>,
}

/// Run a tournament with the configuration from disk.
///
/// # Errors
/// Returns an error if the console backends fail to initialize.
pub fn run(options: &LaunchOptions) -> Result<TournamentOutcome> {
    run_with_config(options, config::load())
}

/// Run a tournament with an explicit base configuration.
///
/// # Errors
/// Returns an error if the console backends fail to initialize.
pub fn run_with_config(options: &LaunchOptions, mut config: Config) -> Result<TournamentOutcome> {
    if options.no_save {
        config.storage.enabled = false;
    } else if let Some(path) = &options.save {
        config.storage.save_path = Some(path.clone());
    }

    let console = HeadlessConsole::new(config.storage.resolved_save_path());
    let mut runner = PartyRunner::new(console, &config, minigames::registry(), options.seed)?;

    let mut enabled_ports = [false; CONTROLLER_PORTS];
    for &port in &options.players {
        if port < CONTROLLER_PORTS {
            enabled_ports[port] = true;
        } else {
            tracing::warn!("Ignoring controller port {} (only {} ports)", port, CONTROLLER_PORTS);
        }
    }

    let resumed = options.resume && runner.resume_tournament();
    if options.resume && !resumed {
        tracing::warn!("No interrupted tournament in save memory, starting a new one");
    }
    if !resumed {
        let ctx = runner.context();
        let setup = TournamentSetup {
            enabled_ports,
            ai_difficulty: options.difficulty.unwrap_or(config.tournament.ai_difficulty),
            points_to_win: options
                .points
                .unwrap_or(config.tournament.points_to_win)
                .clamp(MIN_POINTS_TO_WIN, MAX_POINTS_TO_WIN),
            next_round: options.policy.unwrap_or(config.tournament.next_round),
            blacklist: ctx.save.blacklist(),
        };
        runner.start_tournament(&setup);
    }

    // A resumed session brings its own roster.
    let human_ports: Vec<usize> = runner
        .context()
        .roster
        .enabled_ports()
        .iter()
        .enumerate()
        .filter_map(|(port, &enabled)| enabled.then_some(port))
        .collect();

    let delta = runner.tick_duration();
    let mut outcome = TournamentOutcome {
        frames: 0,
        rounds: 0,
        finished: false,
        humans: human_ports.len(),
        final_points: [0; MAX_PLAYERS],
        champions: Vec::new(),
    };

    while outcome.frames < options.max_frames {
        let tap = outcome.frames % 2 == 0;
        for &port in &human_ports {
            let pad = if tap {
                PadState::with_buttons(Buttons::A)
            } else {
                PadState::default()
            };
            runner.set_pad(port, pad);
        }

        let report = runner.frame_with_delta(delta);
        outcome.frames += 1;
        if !report.transitioned {
            continue;
        }

        match report.level {
            Some(LevelId::Results) => {
                let tournament = &runner.context().tournament;
                outcome.rounds += 1;
                outcome.final_points = tournament.all_points();
                outcome.champions = (0..MAX_PLAYERS).filter(|&p| tournament.has_won(p)).collect();
                tracing::info!(
                    "Round {}: winners {:?}, points {:?}",
                    outcome.rounds,
                    tournament.winners().as_slice(),
                    outcome.final_points
                );
            }
            Some(LevelId::MainMenu) if outcome.rounds > 0 => {
                outcome.finished = true;
                break;
            }
            _ => {}
        }
    }

    if !outcome.finished {
        tracing::warn!("Stopped after {} frame(s) without a champion", outcome.frames);
    }
    runner.shutdown();
    Ok(outcome)
}
