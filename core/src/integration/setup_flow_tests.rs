//! Boot → title → setup wizard → first pick, driven through controller input

use partybox_shared::NextRound;

use crate::input::Buttons;
use crate::level::LevelId;
use crate::save_store::MemorySaveDevice;
use crate::test_utils::EventLog;

use super::test_utils::*;

fn boot_to_setup(runner: &mut TestRunner) {
    assert!(run_until_level(runner, LevelId::MainMenu, 3));
    tap(runner, 1, Buttons::START);
    assert!(run_until_level(runner, LevelId::GameSetup, 60));
}

#[test]
fn free_play_with_one_human() {
    let log = EventLog::default();
    let device = MemorySaveDevice::new();
    let mut runner = runner_with_save(&log, &device, 2);
    boot_to_setup(&mut runner);

    // Mode: free play is the first entry.
    tap(&mut runner, 0, Buttons::A);
    // Players: port 3 joins and confirms.
    tap(&mut runner, 3, Buttons::START);
    hold(&mut runner, 3, Buttons::A, 1.2);
    // AI difficulty: keep the default.
    tap(&mut runner, 0, Buttons::A);
    // Game config: hold Start to finish.
    hold(&mut runner, 0, Buttons::START, 1.2);
    assert!(run_until_level(&mut runner, LevelId::MinigameSelect, 60));

    {
        let ctx = runner.context();
        assert_eq!(ctx.tournament.policy(), NextRound::FreePlay);
        assert_eq!(ctx.player_count(), 1);
        assert_eq!(ctx.controller_for(0), 3);
        assert!(!stored_record(&device).is_crashed());
    }

    // Any human may pick in free play; the cursor starts on "Recorder".
    tap(&mut runner, 3, Buttons::A);
    assert!(run_until_level(&mut runner, LevelId::Minigame, 3));
    assert_eq!(runner.context().minigames.selected(), Some(0));

    let record = stored_record(&device);
    assert!(record.is_crashed());
    assert_eq!(record.player_count, 1);
    assert_eq!(record.next_round, NextRound::FreePlay as u8);
}

#[test]
fn compete_with_custom_points() {
    let log = EventLog::default();
    let device = MemorySaveDevice::new();
    let mut runner = runner_with_save(&log, &device, 4);
    boot_to_setup(&mut runner);

    tap(&mut runner, 0, Buttons::D_DOWN);
    tap(&mut runner, 0, Buttons::A);
    tap(&mut runner, 0, Buttons::START);
    tap(&mut runner, 1, Buttons::START);
    hold(&mut runner, 0, Buttons::A, 1.2);
    // Easy AI.
    tap(&mut runner, 1, Buttons::D_UP);
    tap(&mut runner, 1, Buttons::A);
    // Points: 4 -> 2.
    tap(&mut runner, 0, Buttons::D_LEFT);
    tap(&mut runner, 0, Buttons::D_LEFT);
    hold(&mut runner, 1, Buttons::START, 1.2);
    assert!(run_until_level(&mut runner, LevelId::MinigameSelect, 60));

    let ctx = runner.context();
    assert_eq!(ctx.tournament.points_to_win(), 2);
    assert_eq!(ctx.tournament.policy(), NextRound::LeastPoints);
    assert_eq!(ctx.tournament.chooser(), Some(0));
    assert_eq!(ctx.player_count(), 2);
    assert_eq!(ctx.ai_difficulty(), partybox_shared::AiDifficulty::Easy);
}

#[test]
fn backing_out_of_players_returns_to_mode() {
    let log = EventLog::default();
    let device = MemorySaveDevice::new();
    let mut runner = runner_with_save(&log, &device, 4);
    boot_to_setup(&mut runner);

    tap(&mut runner, 0, Buttons::A);
    tap(&mut runner, 0, Buttons::B);
    // Back on the mode screen: pick compete this time.
    tap(&mut runner, 0, Buttons::D_DOWN);
    tap(&mut runner, 0, Buttons::A);
    tap(&mut runner, 0, Buttons::START);
    hold(&mut runner, 0, Buttons::A, 1.2);
    tap(&mut runner, 0, Buttons::A);
    hold(&mut runner, 0, Buttons::START, 1.2);
    assert!(run_until_level(&mut runner, LevelId::MinigameSelect, 60));
    assert_eq!(runner.context().tournament.policy(), NextRound::LeastPoints);
}
