//! Partybox launcher
//!
//! Runs a headless tournament with the bundled minigames and prints the
//! final standings.
//!
//! # Usage
//!
//! ```bash
//! # Four AI seats, first to 3 points
//! partybox --points 3
//!
//! # Humans on ports 0 and 2, round-robin choosers, no save memory
//! partybox --players 0,2 --policy round-robin --no-save
//!
//! # Pick up an interrupted tournament
//! partybox --resume
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use partybox_library::launcher::DEFAULT_MAX_FRAMES;
use partybox_library::{LaunchOptions, run};
use partybox_shared::{AiDifficulty, MAX_POINTS_TO_WIN, NextRound};

/// Partybox - headless party-game tournaments
#[derive(Parser)]
#[command(name = "partybox")]
#[command(author, version, about = "Run a Partybox tournament without a display")]
struct Args {
    /// Controller ports with a human seated (comma separated, 0-3)
    #[arg(long, value_delimiter = ',', value_parser = clap::value_parser!(u8).range(0..4))]
    players: Vec<u8>,

    /// Points needed to win the tournament
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=(MAX_POINTS_TO_WIN as i64)))]
    points: Option<u8>,

    /// Who picks the next minigame
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Skill of the AI seats
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,

    /// Save memory image (defaults to the platform data directory)
    #[arg(long, conflicts_with = "no_save")]
    save: Option<PathBuf>,

    /// Run without save memory
    #[arg(long)]
    no_save: bool,

    /// Seed for every random draw (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Give up after this many frames
    #[arg(long, default_value_t = DEFAULT_MAX_FRAMES)]
    max_frames: u64,

    /// Continue the tournament stored in save memory
    #[arg(long)]
    resume: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    LeastPoints,
    RoundRobin,
    RandomPlayer,
    RandomGame,
    FreePlay,
}

impl From<PolicyArg> for NextRound {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::LeastPoints => NextRound::LeastPoints,
            PolicyArg::RoundRobin => NextRound::RoundRobin,
            PolicyArg::RandomPlayer => NextRound::RandomPlayer,
            PolicyArg::RandomGame => NextRound::RandomGame,
            PolicyArg::FreePlay => NextRound::FreePlay,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for AiDifficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => AiDifficulty::Easy,
            DifficultyArg::Medium => AiDifficulty::Medium,
            DifficultyArg::Hard => AiDifficulty::Hard,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let options = LaunchOptions {
        players: args.players.iter().map(|&p| p as usize).collect(),
        points: args.points,
        policy: args.policy.map(Into::into),
        difficulty: args.difficulty.map(Into::into),
        save: args.save,
        no_save: args.no_save,
        seed: args.seed.unwrap_or_else(rand::random),
        max_frames: args.max_frames,
        resume: args.resume,
    };

    let outcome = run(&options)?;

    println!(
        "{} round(s) in {} frame(s), seed {}",
        outcome.rounds, outcome.frames, options.seed
    );
    for (player, points) in outcome.final_points.iter().enumerate() {
        let seat = if player < outcome.humans { "human" } else { "AI" };
        let crown = if outcome.champions.contains(&player) { "  champion" } else { "" };
        println!("  P{} ({}): {} point(s){}", player + 1, seat, points, crown);
    }
    if !outcome.finished {
        println!("Tournament unfinished after {} frame(s)", options.max_frames);
    }
    Ok(())
}
