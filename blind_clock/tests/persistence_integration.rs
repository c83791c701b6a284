//! Integration tests for saving and restoring tournaments
//!
//! These tests go through the JSON file store the console uses, so they
//! cover serialization, reload coercions and fallback on bad files.

use blind_clock::{
    catalog::LevelField,
    clock::{ClockActor, ClockCommand, ClockConfig},
    countdown::CountdownStatus,
    notify::NullSink,
    storage::{BackgroundStore, JsonFileStore, MemoryStore, StateStore},
    tournament::{SettingsPatch, Tournament, TournamentSettings},
};
use std::{path::PathBuf, sync::Arc};
use tokio::time::{Duration, Instant};
use uuid::Uuid;

/// Scratch directory removed when dropped
struct ScratchDir(PathBuf);

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn temp_state_path() -> (ScratchDir, PathBuf) {
    let dir = std::env::temp_dir().join(format!("blind-clock-{}", Uuid::new_v4()));
    let path = dir.join("tournament.json");
    (ScratchDir(dir), path)
}

fn open(path: &PathBuf) -> Tournament {
    Tournament::restore(
        ClockConfig::default(),
        Arc::new(JsonFileStore::new(path.clone())),
        Arc::new(NullSink),
    )
}

#[test]
fn test_missing_file_starts_fresh() {
    let (_dir, path) = temp_state_path();
    let tournament = open(&path);

    assert_eq!(tournament.settings(), &TournamentSettings::default());
    assert_eq!(tournament.current_level_id(), 1);
    assert_eq!(tournament.status(), CountdownStatus::Idle);
    assert!(!path.exists());
}

#[test]
fn test_running_tournament_reloads_paused() {
    let (_dir, path) = temp_state_path();
    let t0 = Instant::now();

    {
        let mut tournament = open(&path);
        tournament.update_settings(SettingsPatch {
            title: Some("Friday Night".to_string()),
            currency: Some("kr".to_string()),
            ..Default::default()
        });
        tournament.add_buy_in();
        tournament.add_buy_in();
        tournament.add_re_buy();
        tournament.advance_to_next_level(t0);
        tournament.poll(t0 + Duration::from_secs(75));
        tournament.toggle_panel();
        assert_eq!(tournament.status(), CountdownStatus::Running);
    }

    let restored = open(&path);
    assert_eq!(restored.settings().title, "Friday Night");
    assert_eq!(restored.settings().currency, "kr");
    assert_eq!(restored.buy_ins(), 2);
    assert_eq!(restored.re_buys(), 1);
    assert_eq!(restored.current_level_id(), 2);
    assert_eq!(restored.remaining_secs(), 1200 - 75);
    assert_eq!(restored.status(), CountdownStatus::Paused);
    assert!(restored.panel_open());
}

#[test]
fn test_edited_structure_survives_reload() {
    let (_dir, path) = temp_state_path();

    {
        let mut tournament = open(&path);
        tournament.update_blind_structure("turbo");
        tournament.update_blind_level(3, LevelField::Ante, 25);
        tournament.remove_blind_level(4);
    }

    let restored = open(&path);
    let structure = &restored.settings().blind_structure;
    assert_eq!(structure.name, "Turbo");
    assert_eq!(structure.level(3).map(|l| l.ante), Some(25));
    assert!(structure.level(4).is_none());
    assert_eq!(restored.remaining_secs(), 600);
}

#[test]
fn test_corrupt_file_falls_back_to_defaults() {
    let (_dir, path) = temp_state_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();

    let mut tournament = open(&path);
    assert_eq!(tournament.settings(), &TournamentSettings::default());
    assert_eq!(tournament.buy_ins(), 0);

    // The next mutation overwrites the bad file
    tournament.add_buy_in();
    let store = JsonFileStore::new(path.clone());
    assert_eq!(store.load().unwrap().map(|s| s.buy_ins), Some(1));
}

#[test]
fn test_unknown_saved_level_falls_back_to_first() {
    let store = Arc::new(MemoryStore::new());
    {
        let mut tournament =
            Tournament::new(ClockConfig::default(), store.clone(), Arc::new(NullSink));
        tournament.advance_to_next_level(Instant::now());
    }
    let mut snapshot = store.snapshot().unwrap();
    snapshot.current_level_id = 999;
    let store = Arc::new(MemoryStore::with_snapshot(snapshot));

    let restored = Tournament::restore(ClockConfig::default(), store, Arc::new(NullSink));
    assert_eq!(restored.current_level_id(), 1);
    assert_eq!(restored.remaining_secs(), 1200);
}

#[test]
fn test_invalid_saved_structure_falls_back_to_defaults() {
    let store = Arc::new(MemoryStore::new());
    {
        let mut tournament =
            Tournament::new(ClockConfig::default(), store.clone(), Arc::new(NullSink));
        tournament.add_buy_in();
    }
    let mut snapshot = store.snapshot().unwrap();
    snapshot.settings.blind_structure.levels.clear();
    let store = Arc::new(MemoryStore::with_snapshot(snapshot));

    let restored = Tournament::restore(ClockConfig::default(), store, Arc::new(NullSink));
    assert_eq!(restored.settings(), &TournamentSettings::default());
    assert_eq!(restored.buy_ins(), 0);
}

#[test]
fn test_failing_store_does_not_roll_back() {
    let store = Arc::new(MemoryStore::new());
    store.set_failing(true);

    let mut tournament =
        Tournament::restore(ClockConfig::default(), store.clone(), Arc::new(NullSink));
    tournament.add_buy_in();
    tournament.start(Instant::now());

    assert_eq!(tournament.buy_ins(), 1);
    assert_eq!(tournament.status(), CountdownStatus::Running);
    assert_eq!(store.save_count(), 0);
}

#[test]
fn test_full_reset_removes_file() {
    let (_dir, path) = temp_state_path();
    let mut tournament = open(&path);
    tournament.add_buy_in();
    assert!(path.exists());

    tournament.reset_tournament(true);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_clock_actor_writes_through_background_store() {
    let (_dir, path) = temp_state_path();
    let (store, writer) = BackgroundStore::spawn(Arc::new(JsonFileStore::new(path.clone())));
    let tournament = Tournament::restore(ClockConfig::default(), Arc::new(store), Arc::new(NullSink));
    let (actor, handle) = ClockActor::new(tournament);
    let task = tokio::spawn(actor.run());

    handle.execute(ClockCommand::AddBuyIn).await.unwrap();
    handle.execute(ClockCommand::AddReBuy).await.unwrap();
    handle.execute(ClockCommand::Start).await.unwrap();
    handle.shutdown().await.unwrap();
    task.await.unwrap();
    writer.await.unwrap();

    let reloaded = open(&path);
    assert_eq!(reloaded.buy_ins(), 1);
    assert_eq!(reloaded.re_buys(), 1);
    assert_eq!(reloaded.status(), CountdownStatus::Paused);
}
