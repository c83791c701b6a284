//! Integration tests for level progression
//!
//! These tests play whole structures through the tournament state machine
//! with explicit instants, polling the way the clock actor does.

use blind_clock::{
    catalog::{BlindLevel, BlindStructure, LevelField},
    clock::ClockConfig,
    countdown::CountdownStatus,
    notify::{ClockEvent, MemorySink},
    storage::MemoryStore,
    tournament::{Tournament, TournamentSettings},
    transition::{IgnoreReason, Transition},
};
use std::sync::Arc;
use tokio::time::{Duration, Instant};

const POLL_MS: u64 = 250;

fn three_levels() -> TournamentSettings {
    TournamentSettings {
        blind_structure: BlindStructure::new(
            "Test",
            vec![
                BlindLevel::new(1, 10, 20, 3),
                BlindLevel::new(2, 20, 40, 4),
                BlindLevel::new(3, 40, 80, 5).with_ante(10),
            ],
        ),
        ..TournamentSettings::default()
    }
}

fn setup(delay: Duration) -> (Tournament, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let tournament = Tournament::with_settings(
        ClockConfig::default().with_auto_advance_delay(delay),
        three_levels(),
        Arc::new(MemoryStore::new()),
        sink.clone(),
    );
    (tournament, sink)
}

/// Poll every 250ms from `t0` up to and including `until`
fn poll_until(tournament: &mut Tournament, t0: Instant, until: Duration) {
    let steps = until.as_millis() as u64 / POLL_MS;
    for step in 1..=steps {
        tournament.poll(t0 + Duration::from_millis(step * POLL_MS));
    }
}

fn advanced_levels(sink: &MemorySink) -> Vec<u32> {
    sink.events()
        .into_iter()
        .filter_map(|event| match event {
            ClockEvent::LevelAdvanced { level } => Some(level.id),
            _ => None,
        })
        .collect()
}

fn play_full_structure(delay: Duration) {
    let t0 = Instant::now();
    let (mut tournament, sink) = setup(delay);
    tournament.start(t0);

    poll_until(&mut tournament, t0, Duration::from_secs(30));

    assert_eq!(advanced_levels(&sink), vec![2, 3]);
    assert_eq!(
        sink.count(|e| matches!(e, ClockEvent::LevelCompleted { .. })),
        3
    );
    assert_eq!(tournament.current_level_id(), 3);
    assert_eq!(tournament.status(), CountdownStatus::Complete);
    assert_eq!(tournament.remaining_secs(), 0);
    assert!(tournament.alert_active());
    assert!(!tournament.advance_pending());
}

#[test]
fn test_full_structure_immediate_advance() {
    play_full_structure(Duration::ZERO);
}

#[test]
fn test_full_structure_delayed_advance() {
    play_full_structure(Duration::from_secs(2));
}

#[test]
fn test_immediate_advance_restarts_in_same_poll() {
    let t0 = Instant::now();
    let (mut tournament, _) = setup(Duration::ZERO);
    tournament.start(t0);

    poll_until(&mut tournament, t0, Duration::from_secs(3));

    assert_eq!(tournament.current_level_id(), 2);
    assert_eq!(tournament.status(), CountdownStatus::Running);
    assert_eq!(tournament.remaining_secs(), 4);
    assert!(!tournament.alert_active());
}

#[test]
fn test_completion_reports_next_level() {
    let t0 = Instant::now();
    let (mut tournament, sink) = setup(Duration::from_secs(5));
    tournament.start(t0);
    poll_until(&mut tournament, t0, Duration::from_secs(3));

    let completed = sink
        .events()
        .into_iter()
        .find(|e| matches!(e, ClockEvent::LevelCompleted { .. }));
    match completed {
        Some(ClockEvent::LevelCompleted { level_id, next }) => {
            assert_eq!(level_id, 1);
            assert_eq!(next.map(|level| (level.small_blind, level.big_blind)), Some((20, 40)));
        }
        other => panic!("expected LevelCompleted, got {:?}", other),
    }
}

#[test]
fn test_dismiss_alert_keeps_pending_advance() {
    let t0 = Instant::now();
    let (mut tournament, _) = setup(Duration::from_secs(2));
    tournament.start(t0);
    poll_until(&mut tournament, t0, Duration::from_secs(3));
    assert!(tournament.advance_pending());

    assert!(tournament.dismiss_alert().is_applied());
    assert!(tournament.advance_pending());

    tournament.poll(t0 + Duration::from_secs(5));
    assert_eq!(tournament.current_level_id(), 2);
    assert_eq!(tournament.status(), CountdownStatus::Running);
}

#[test]
fn test_reset_timer_cancels_pending_advance() {
    let t0 = Instant::now();
    let (mut tournament, _) = setup(Duration::from_secs(2));
    tournament.start(t0);
    poll_until(&mut tournament, t0, Duration::from_secs(3));

    tournament.reset_timer();
    tournament.poll(t0 + Duration::from_secs(10));

    assert_eq!(tournament.current_level_id(), 1);
    assert_eq!(tournament.status(), CountdownStatus::Paused);
    assert_eq!(tournament.remaining_secs(), 3);
    assert!(!tournament.advance_pending());
}

#[test]
fn test_final_level_stays_complete() {
    let t0 = Instant::now();
    let (mut tournament, _) = setup(Duration::ZERO);
    tournament.advance_to_next_level(t0);
    tournament.advance_to_next_level(t0);
    assert_eq!(tournament.current_level_id(), 3);
    assert!(tournament.next_level().is_none());

    tournament.poll(t0 + Duration::from_secs(5));
    assert_eq!(tournament.status(), CountdownStatus::Complete);
    assert!(tournament.alert_active());

    assert_eq!(
        tournament.advance_to_next_level(t0 + Duration::from_secs(6)),
        Transition::Ignored(IgnoreReason::FinalLevel)
    );
    assert_eq!(
        tournament.start(t0 + Duration::from_secs(6)),
        Transition::Ignored(IgnoreReason::NoTimeRemaining)
    );
    assert_eq!(tournament.current_level_id(), 3);
}

#[test]
fn test_add_time_revives_completed_final_level() {
    let t0 = Instant::now();
    let (mut tournament, _) = setup(Duration::ZERO);
    tournament.advance_to_next_level(t0);
    tournament.advance_to_next_level(t0);
    tournament.poll(t0 + Duration::from_secs(5));

    tournament.add_time(60, t0 + Duration::from_secs(6));
    assert_eq!(tournament.status(), CountdownStatus::Paused);
    assert_eq!(tournament.remaining_secs(), 60);
    assert!(tournament.start(t0 + Duration::from_secs(7)).is_applied());
}

#[test]
fn test_paused_clock_survives_polls() {
    let t0 = Instant::now();
    let (mut tournament, _) = setup(Duration::ZERO);
    tournament.start(t0);
    tournament.poll(t0 + Duration::from_millis(1_500));
    tournament.pause();

    poll_until(&mut tournament, t0, Duration::from_secs(20));
    assert_eq!(tournament.remaining_secs(), 2);
    assert_eq!(tournament.current_level_id(), 1);

    // Resuming re-anchors: the paused 18.5s are not charged
    tournament.resume(t0 + Duration::from_secs(20));
    tournament.poll(t0 + Duration::from_millis(21_200));
    assert_eq!(tournament.remaining_secs(), 1);
}

#[test]
fn test_reset_tournament_keeps_counters_unless_cleared() {
    let t0 = Instant::now();
    let store = Arc::new(MemoryStore::new());
    let mut tournament = Tournament::with_settings(
        ClockConfig::default(),
        three_levels(),
        store.clone(),
        Arc::new(MemorySink::new()),
    );
    tournament.add_buy_in();
    tournament.add_re_buy();
    tournament.advance_to_next_level(t0);

    tournament.reset_tournament(false);
    assert_eq!(tournament.current_level_id(), 1);
    assert_eq!(tournament.status(), CountdownStatus::Paused);
    assert_eq!(tournament.buy_ins(), 1);
    assert!(store.snapshot().is_some());

    tournament.reset_tournament(true);
    assert_eq!(tournament.buy_ins(), 0);
    assert_eq!(tournament.re_buys(), 0);
    assert_eq!(tournament.settings(), &TournamentSettings::default());
    assert!(store.snapshot().is_none());
}

#[test]
fn test_level_removal_rules() {
    let (mut tournament, _) = setup(Duration::ZERO);

    assert_eq!(
        tournament.remove_blind_level(1),
        Transition::Ignored(IgnoreReason::CurrentLevel)
    );
    assert_eq!(
        tournament.remove_blind_level(42),
        Transition::Ignored(IgnoreReason::UnknownLevel)
    );
    assert!(tournament.remove_blind_level(2).is_applied());
    assert!(tournament.remove_blind_level(3).is_applied());
    assert_eq!(
        tournament.remove_blind_level(1),
        Transition::Ignored(IgnoreReason::SoleLevel)
    );

    // Removed levels are skipped by progression
    let id = tournament.add_blind_level(BlindLevel::new(0, 5, 0, 10));
    assert_eq!(id, 2);
    let added = tournament.settings().blind_structure.level(id).cloned();
    assert_eq!(added.map(|l| (l.small_blind, l.big_blind, l.duration_secs)), Some((5, 5, 60)));
    assert_eq!(tournament.next_level().map(|l| l.id), Some(2));
}

#[test]
fn test_edits_to_upcoming_level_apply_on_advance() {
    let t0 = Instant::now();
    let (mut tournament, _) = setup(Duration::ZERO);
    tournament.update_blind_level(2, LevelField::Duration, 120);
    tournament.update_blind_level(2, LevelField::BigBlind, 50);

    tournament.advance_to_next_level(t0);
    assert_eq!(tournament.remaining_secs(), 120);
    assert_eq!(tournament.current_level().map(|l| l.big_blind), Some(50));
}
