// tests/admin_commands.rs
//! Integration tests for admin commands: next, stop, unlock, start

mod common;
use common::TestGame;
use std::time::Duration;
use trivia_ng::state::TimerKind;
use trivia_ng::{GameRules, Phase};

#[tokio::test(start_paused = true)]
async fn test_stop_returns_to_idle() {
    let mut game = TestGame::spawn().await;
    game.start_round().await;

    let view = game.say("root", "!admin stop").await;
    assert_eq!(view.phase, Phase::Idle);
    assert_eq!(view.timer, None);
    assert!(view.round.is_none());
    assert!(view.invariants_hold);
    assert!(
        game.system_messages()
            .contains(&"Stopped by administrator.".to_string())
    );

    // The cancelled round timer never moves the game.
    let view = game.advance(60.0).await;
    assert_eq!(view.phase, Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_lock_and_unlock() {
    let game = TestGame::spawn().await;
    game.start_round().await;

    let view = game.say("root", "!a stop lock").await;
    assert_eq!(view.phase, Phase::Locked);

    // Players cannot start a locked game.
    let view = game.say("alice", "!start").await;
    assert_eq!(view.phase, Phase::Locked);

    let view = game.say("root", "!admin unlock").await;
    assert_eq!(view.phase, Phase::Idle);

    let view = game.say("alice", "!start").await;
    assert_eq!(view.phase, Phase::Waiting);
}

#[tokio::test(start_paused = true)]
async fn test_start_forces_locked_game() {
    let game = TestGame::spawn().await;
    game.say("root", "!admin stop lock").await;

    let view = game.say("root", "!admin start").await;
    assert_eq!(view.phase, Phase::Waiting);
    assert_eq!(view.timer, Some(TimerKind::NextRound));

    let view = game.advance(5.1).await;
    assert_eq!(view.phase, Phase::Question);
}

#[tokio::test(start_paused = true)]
async fn test_start_rejected_during_round() {
    let game = TestGame::spawn().await;
    let before = game.start_round().await;

    let view = game.say("root", "!admin start").await;
    assert_eq!(view.phase, Phase::Question);
    assert_eq!(view.epoch, before.epoch);
}

#[tokio::test(start_paused = true)]
async fn test_unlock_only_from_locked() {
    let game = TestGame::spawn().await;
    let view = game.say("root", "!admin unlock").await;
    assert_eq!(view.phase, Phase::Idle);

    game.start_round().await;
    let view = game.say("root", "!admin unlock").await;
    assert_eq!(view.phase, Phase::Question);
}

#[tokio::test(start_paused = true)]
async fn test_next_skips_pause() {
    let game = TestGame::spawn().await;
    game.start_round().await;
    game.advance(45.1).await;

    let view = game.say("skipper", "!admin next").await;
    assert_eq!(view.phase, Phase::Question);
    assert_eq!(view.round.expect("round").id, 2);
    assert!(view.invariants_hold);
}

#[tokio::test(start_paused = true)]
async fn test_next_ignored_during_question() {
    let game = TestGame::spawn().await;
    let before = game.start_round().await;

    let view = game.say("root", "!admin next").await;
    assert_eq!(view.phase, Phase::Question);
    assert_eq!(view.round.map(|r| r.id), before.round.map(|r| r.id));
}

#[tokio::test(start_paused = true)]
async fn test_unauthorized_command_changes_nothing() {
    let game = TestGame::spawn().await;
    let before = game.start_round().await;

    let view = game.say("skipper", "!admin stop").await;
    assert_eq!(view.phase, Phase::Question);
    assert_eq!(view.epoch, before.epoch);
}

#[tokio::test(start_paused = true)]
async fn test_guest_admin_syntax_is_plain_chat() {
    let game = TestGame::spawn().await;
    game.start_round().await;

    let view = game.say("alice", "!admin stop").await;
    assert_eq!(view.phase, Phase::Question);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_command_changes_nothing() {
    let game = TestGame::spawn().await;
    let before = game.start_round().await;

    let view = game.say("root", "!admin explode now").await;
    assert_eq!(view.phase, Phase::Question);
    assert_eq!(view.epoch, before.epoch);
}

#[tokio::test(start_paused = true)]
async fn test_run_admin_through_handle() {
    let game = TestGame::spawn().await;
    let root = game.player("root");

    game.handle
        .run_admin(root.id, "stop", vec!["lock".into()])
        .expect("engine running");
    let view = game.view().await;
    assert_eq!(view.phase, Phase::Locked);

    game.handle
        .run_admin(root.id, "START", Vec::new())
        .expect("engine running");
    let view = game.view().await;
    assert_eq!(view.phase, Phase::Waiting);
}

#[tokio::test(start_paused = true)]
async fn test_admin_activity_keeps_game_alive() {
    let rules = GameRules {
        inactivity_timeout: Duration::from_secs(50),
        ..GameRules::default()
    };
    let game = TestGame::with(rules, common::bank(5)).await;
    game.start_round().await;
    game.advance(45.1).await;

    // Admin commands count as activity even when rejected.
    let view = game.say("skipper", "!admin stop").await;
    assert_eq!(view.phase, Phase::Waiting);
    let view = game.next_question().await;
    assert_eq!(view.phase, Phase::Question);
}

#[tokio::test(start_paused = true)]
async fn test_silence_stops_game() {
    let rules = GameRules {
        inactivity_timeout: Duration::from_secs(50),
        ..GameRules::default()
    };
    let game = TestGame::with(rules, common::bank(5)).await;
    game.start_round().await;
    game.advance(45.1).await;

    let view = game.advance(10.1).await;
    assert_eq!(view.phase, Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_closes_handle() {
    let game = TestGame::spawn().await;
    game.handle.shutdown().expect("engine running");
    tokio::task::yield_now().await;

    assert!(game.handle.inspect().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_closed_waits_for_actor_exit() {
    let game = TestGame::spawn().await;
    game.start_round().await;

    game.handle.shutdown().expect("engine running");
    game.handle.closed().await;

    // The actor is gone and its round timer was disarmed on the way out.
    assert!(game.handle.set_player_count(2).is_err());
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(game.handle.round_info().phase, Phase::Question);
}
