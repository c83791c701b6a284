//! Tournament state machine.
//!
//! Owns the current level, the buy-in counters and the alert/panel flags, and
//! drives one [`CountdownEngine`] scoped to the current level. Every mutation
//! is mirrored to the [`StateStore`]; side effects go through the injected
//! [`NotificationSink`].

use super::models::{SettingsPatch, TournamentSettings, TournamentSnapshot, TournamentView};
use crate::{
    catalog::{self, BlindLevel, LevelField, LevelId, MIN_LEVEL_DURATION_SECS},
    clock::ClockConfig,
    countdown::{CountdownEngine, CountdownState, CountdownStatus, TickOutcome},
    display,
    notify::{ClockEvent, NotificationSink},
    prize::{self, DistributionPatch, Prizes},
    storage::StateStore,
    transition::{IgnoreReason, Transition},
};
use chrono::Utc;
use std::sync::Arc;
use tokio::time::Instant;

/// A single tournament and its clock
pub struct Tournament {
    settings: TournamentSettings,
    current_level_id: LevelId,
    buy_ins: u32,
    re_buys: u32,
    alert_active: bool,
    panel_open: bool,
    engine: CountdownEngine,
    /// Deadline of a delayed auto-advance
    pending_advance: Option<Instant>,
    final_countdown_sent: bool,
    config: ClockConfig,
    store: Arc<dyn StateStore>,
    sink: Arc<dyn NotificationSink>,
}

impl Tournament {
    /// Fresh tournament using the configured default preset
    pub fn new(
        config: ClockConfig,
        store: Arc<dyn StateStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let settings = TournamentSettings::with_preset(&config.default_preset);
        Self::with_settings(config, settings, store, sink)
    }

    /// Fresh tournament with explicit settings.
    ///
    /// An invalid blind structure is replaced by the default preset.
    pub fn with_settings(
        config: ClockConfig,
        mut settings: TournamentSettings,
        store: Arc<dyn StateStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        if let Err(e) = settings.blind_structure.validate() {
            log::warn!(
                "Invalid blind structure ({}), using preset '{}'",
                e,
                config.default_preset
            );
            settings.blind_structure =
                TournamentSettings::with_preset(&config.default_preset).blind_structure;
        }

        let (current_level_id, duration) = settings
            .blind_structure
            .first_level()
            .map_or((1, MIN_LEVEL_DURATION_SECS), |level| {
                (level.id, level.duration_secs)
            });

        Self {
            settings,
            current_level_id,
            buy_ins: 0,
            re_buys: 0,
            alert_active: false,
            panel_open: false,
            engine: CountdownEngine::new(duration),
            pending_advance: None,
            final_countdown_sent: false,
            config,
            store,
            sink,
        }
    }

    /// Load the persisted tournament, falling back to a fresh one.
    ///
    /// Load errors are logged and treated as "nothing saved". A countdown that
    /// was running when saved comes back paused.
    pub fn restore(
        config: ClockConfig,
        store: Arc<dyn StateStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let snapshot = match store.load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::error!("Failed to load saved tournament: {}", e);
                None
            }
        };

        match snapshot {
            Some(snapshot) => Self::from_snapshot(config, snapshot, store, sink),
            None => {
                log::info!("No saved tournament, starting fresh");
                Self::new(config, store, sink)
            }
        }
    }

    fn from_snapshot(
        config: ClockConfig,
        snapshot: TournamentSnapshot,
        store: Arc<dyn StateStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        if let Err(e) = snapshot.settings.blind_structure.validate() {
            log::warn!("Saved blind structure is invalid ({}), starting fresh", e);
            return Self::new(config, store, sink);
        }

        let mut tournament = Self::with_settings(config, snapshot.settings, store, sink);
        let saved_level = tournament
            .settings
            .blind_structure
            .level(snapshot.current_level_id)
            .map(|level| (level.id, level.duration_secs));

        match saved_level {
            Some((id, duration)) => {
                tournament.current_level_id = id;
                tournament.engine = CountdownEngine::from_state(duration, snapshot.countdown);
            }
            None => log::warn!(
                "Saved level {} no longer exists, starting at the first level",
                snapshot.current_level_id
            ),
        }

        tournament.buy_ins = snapshot.buy_ins;
        tournament.re_buys = snapshot.re_buys;
        tournament.alert_active = snapshot.alert_active;
        tournament.panel_open = snapshot.panel_open;

        log::info!(
            "Restored '{}' at level {} with {} remaining (saved {})",
            tournament.settings.title,
            tournament.current_level_id,
            display::format_clock(tournament.engine.remaining_secs()),
            snapshot.saved_at
        );

        tournament
    }

    // === Read-only accessors ===

    pub fn settings(&self) -> &TournamentSettings {
        &self.settings
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn current_level_id(&self) -> LevelId {
        self.current_level_id
    }

    /// Level currently in play
    pub fn current_level(&self) -> Option<&BlindLevel> {
        self.settings.blind_structure.level(self.current_level_id)
    }

    /// Level that follows the current one, if any
    pub fn next_level(&self) -> Option<&BlindLevel> {
        self.settings
            .blind_structure
            .next_level(self.current_level_id)
    }

    pub fn buy_ins(&self) -> u32 {
        self.buy_ins
    }

    pub fn re_buys(&self) -> u32 {
        self.re_buys
    }

    pub fn alert_active(&self) -> bool {
        self.alert_active
    }

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn countdown(&self) -> CountdownState {
        self.engine.state()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.engine.remaining_secs()
    }

    pub fn status(&self) -> CountdownStatus {
        self.engine.status()
    }

    /// Whether a delayed auto-advance is scheduled
    pub fn advance_pending(&self) -> bool {
        self.pending_advance.is_some()
    }

    pub fn prize_pool(&self) -> f64 {
        prize::prize_pool(
            self.buy_ins,
            self.settings.buy_in_amount,
            self.re_buys,
            self.settings.re_buy_amount,
        )
    }

    pub fn prizes(&self) -> Prizes {
        prize::compute_prizes(self.prize_pool(), &self.settings.prize_distribution)
    }

    /// Summary for front ends
    pub fn view(&self) -> TournamentView {
        let structure = &self.settings.blind_structure;
        let countdown = self.engine.state();

        TournamentView {
            title: self.settings.title.clone(),
            currency: self.settings.currency.clone(),
            structure_name: structure.name.clone(),
            level_count: structure.len(),
            level_position: structure
                .position(self.current_level_id)
                .map_or(0, |index| index + 1),
            current_level: self.current_level().cloned(),
            next_level: self.next_level().cloned(),
            countdown,
            clock: display::format_clock(countdown.remaining_secs),
            final_countdown: display::is_final_countdown(countdown.remaining_secs),
            buy_ins: self.buy_ins,
            re_buys: self.re_buys,
            prize_pool: self.prize_pool(),
            prizes: self.prizes(),
            distribution_warning: self
                .settings
                .prize_distribution
                .check()
                .map(|warning| warning.to_string()),
            alert_active: self.alert_active,
            panel_open: self.panel_open,
            advance_pending: self.pending_advance.is_some(),
        }
    }

    /// Persistable form of the current state
    pub fn snapshot(&self) -> TournamentSnapshot {
        TournamentSnapshot {
            settings: self.settings.clone(),
            current_level_id: self.current_level_id,
            buy_ins: self.buy_ins,
            re_buys: self.re_buys,
            alert_active: self.alert_active,
            panel_open: self.panel_open,
            countdown: self.engine.state(),
            saved_at: Utc::now(),
        }
    }

    /// Save the current state; failures are logged and otherwise ignored
    pub fn persist(&self) {
        if let Err(e) = self.store.save(&self.snapshot()) {
            log::error!("Failed to save tournament state: {}", e);
        }
    }

    // === Clock controls ===

    pub fn start(&mut self, now: Instant) -> Transition {
        self.emit(ClockEvent::Click);
        let transition = self.engine.start(now);
        self.after_control("start", transition)
    }

    pub fn pause(&mut self) -> Transition {
        self.emit(ClockEvent::Click);
        let transition = self.engine.pause();
        self.after_control("pause", transition)
    }

    pub fn resume(&mut self, now: Instant) -> Transition {
        self.emit(ClockEvent::Click);
        let transition = self.engine.resume(now);
        self.after_control("resume", transition)
    }

    /// Play/pause toggle: pause if running, resume if paused, start otherwise
    pub fn toggle(&mut self, now: Instant) -> Transition {
        match self.engine.status() {
            CountdownStatus::Running => self.pause(),
            CountdownStatus::Paused => self.resume(now),
            CountdownStatus::Idle | CountdownStatus::Complete => self.start(now),
        }
    }

    fn after_control(&mut self, action: &str, transition: Transition) -> Transition {
        match transition {
            Transition::Applied => {
                log::debug!(
                    "Clock {} at {}",
                    action,
                    display::format_clock(self.engine.remaining_secs())
                );
                self.persist();
            }
            Transition::Ignored(reason) => log::debug!("Clock {} ignored: {}", action, reason),
        }
        transition
    }

    /// Reset the clock to the current level's full duration, paused
    pub fn reset_timer(&mut self) {
        self.pending_advance = None;
        self.reset_engine(self.current_duration());
        self.persist();
    }

    /// Adjust remaining time by a signed number of seconds
    pub fn add_time(&mut self, delta_secs: i64, now: Instant) {
        let completed = self.engine.add_time(delta_secs);
        let remaining = self.engine.remaining_secs();
        if !display::is_final_countdown(remaining) {
            self.final_countdown_sent = false;
        }
        if !self.engine.is_complete() {
            self.pending_advance = None;
        }
        self.emit(ClockEvent::TimeChanged {
            remaining_secs: remaining,
        });

        if completed {
            self.on_countdown_complete(now);
        } else {
            self.persist();
        }
    }

    /// Drive the clock to `now`.
    ///
    /// Runs the tick and, on completion, the whole alert/advance/restart
    /// sequence before returning. Also fires a delayed auto-advance whose
    /// deadline has passed.
    pub fn poll(&mut self, now: Instant) -> TickOutcome {
        let outcome = self.engine.tick(now);
        match outcome {
            TickOutcome::Ticked { remaining_secs } => {
                self.emit(ClockEvent::Tick { remaining_secs });
                self.check_final_countdown(remaining_secs);
                self.persist();
            }
            TickOutcome::Completed => {
                self.emit(ClockEvent::Tick { remaining_secs: 0 });
                self.on_countdown_complete(now);
            }
            TickOutcome::Idle | TickOutcome::Stale | TickOutcome::Pending => {}
        }

        if let Some(deadline) = self.pending_advance
            && now >= deadline
        {
            self.pending_advance = None;
            self.advance_to_next_level(now);
        }

        outcome
    }

    // === Level progression ===

    /// Move to the next level and start its countdown.
    ///
    /// No-op on the final level.
    pub fn advance_to_next_level(&mut self, now: Instant) -> Transition {
        let Some(next) = self.next_level().cloned() else {
            log::debug!(
                "Advance ignored: level {} is the final level",
                self.current_level_id
            );
            return Transition::Ignored(IgnoreReason::FinalLevel);
        };

        self.current_level_id = next.id;
        self.alert_active = false;
        self.pending_advance = None;
        self.reset_engine(next.duration_secs);
        if let Transition::Ignored(reason) = self.engine.start(now) {
            log::warn!("Level {} did not start: {}", next.id, reason);
        }

        log::info!("Advanced to {}", display::describe_level(&next));
        self.emit(ClockEvent::LevelAdvanced { level: next });
        self.persist();
        Transition::Applied
    }

    fn on_countdown_complete(&mut self, now: Instant) {
        self.alert_active = true;
        let next = self.next_level().cloned();
        log::info!("Level {} complete", self.current_level_id);
        self.emit(ClockEvent::LevelCompleted {
            level_id: self.current_level_id,
            next: next.clone(),
        });

        if next.is_none() {
            log::info!("Final level finished; clock stays complete until reset");
            self.persist();
        } else if self.config.auto_advance_delay.is_zero() {
            self.advance_to_next_level(now);
        } else {
            self.pending_advance = Some(now + self.config.auto_advance_delay);
            self.persist();
        }
    }

    fn check_final_countdown(&mut self, remaining_secs: u32) {
        if !self.final_countdown_sent && display::is_final_countdown(remaining_secs) {
            self.final_countdown_sent = true;
            self.emit(ClockEvent::FinalCountdown {
                level_id: self.current_level_id,
                remaining_secs,
            });
        }
    }

    /// Replace the active structure with a copy of a preset; the clock is left paused
    pub fn update_blind_structure(&mut self, key: &str) -> Transition {
        self.emit(ClockEvent::Click);
        let Some(structure) = catalog::preset(key) else {
            log::warn!("Unknown blind structure '{}'", key);
            return Transition::Ignored(IgnoreReason::UnknownPreset);
        };

        log::info!("Switching to blind structure '{}'", structure.name);
        self.settings.blind_structure = structure;
        self.rewind_to_first_level();
        self.persist();
        Transition::Applied
    }

    /// Back to the first level, paused.
    ///
    /// With `clear_persisted`, settings and counters return to defaults and
    /// the saved snapshot is erased.
    pub fn reset_tournament(&mut self, clear_persisted: bool) {
        if clear_persisted {
            self.settings = TournamentSettings::with_preset(&self.config.default_preset);
            self.buy_ins = 0;
            self.re_buys = 0;
            self.panel_open = false;
        }
        self.rewind_to_first_level();

        log::info!(
            "Tournament reset to the first level (settings cleared: {})",
            clear_persisted
        );
        self.emit(ClockEvent::TournamentReset {
            cleared: clear_persisted,
        });

        if clear_persisted {
            if let Err(e) = self.store.clear() {
                log::error!("Failed to clear saved tournament: {}", e);
            }
        } else {
            self.persist();
        }
    }

    /// Silence the alert without touching the clock
    pub fn dismiss_alert(&mut self) -> Transition {
        if !self.alert_active {
            return Transition::Ignored(IgnoreReason::NoAlert);
        }
        self.alert_active = false;
        self.persist();
        Transition::Applied
    }

    // === Catalog editing ===

    /// Insert a level into the active structure. Returns the id it was stored under.
    pub fn add_blind_level(&mut self, level: BlindLevel) -> LevelId {
        let id = self.settings.blind_structure.insert(level.sanitized());
        log::info!("Added blind level {}", id);
        self.persist();
        id
    }

    /// Remove a level. Refuses the only level and the current level.
    pub fn remove_blind_level(&mut self, id: LevelId) -> Transition {
        let structure = &self.settings.blind_structure;
        let refusal = if structure.level(id).is_none() {
            Some(IgnoreReason::UnknownLevel)
        } else if structure.len() <= 1 {
            Some(IgnoreReason::SoleLevel)
        } else if id == self.current_level_id {
            Some(IgnoreReason::CurrentLevel)
        } else {
            None
        };

        if let Some(reason) = refusal {
            log::debug!("Removing level {} ignored: {}", id, reason);
            return Transition::Ignored(reason);
        }

        self.settings.blind_structure.remove(id);
        log::info!("Removed blind level {}", id);
        self.persist();
        Transition::Applied
    }

    /// Edit one field of a level.
    ///
    /// A new duration on the current level resets an idle or paused clock to it.
    pub fn update_blind_level(&mut self, id: LevelId, field: LevelField, value: u64) -> Transition {
        let Some(level) = self.settings.blind_structure.level_mut(id) else {
            log::debug!("Updating level {} ignored: no such level", id);
            return Transition::Ignored(IgnoreReason::UnknownLevel);
        };
        level.set_field(field, value);
        let duration = level.duration_secs;

        let clock_idle = matches!(
            self.engine.status(),
            CountdownStatus::Idle | CountdownStatus::Paused
        );
        if id == self.current_level_id && field == LevelField::Duration && clock_idle {
            self.reset_engine(duration);
        }

        log::debug!("Level {} {} set to {}", id, field, value);
        self.persist();
        Transition::Applied
    }

    // === Buy-ins ===

    pub fn add_buy_in(&mut self) -> u32 {
        self.buy_ins = self.buy_ins.saturating_add(1);
        self.emit(ClockEvent::BuyInAdded {
            buy_ins: self.buy_ins,
        });
        self.persist();
        self.buy_ins
    }

    pub fn remove_buy_in(&mut self) -> Transition {
        if self.buy_ins == 0 {
            return Transition::Ignored(IgnoreReason::CounterAtZero);
        }
        self.buy_ins -= 1;
        self.persist();
        Transition::Applied
    }

    pub fn add_re_buy(&mut self) -> u32 {
        self.re_buys = self.re_buys.saturating_add(1);
        self.emit(ClockEvent::ReBuyAdded {
            re_buys: self.re_buys,
        });
        self.persist();
        self.re_buys
    }

    pub fn remove_re_buy(&mut self) -> Transition {
        if self.re_buys == 0 {
            return Transition::Ignored(IgnoreReason::CounterAtZero);
        }
        self.re_buys -= 1;
        self.persist();
        Transition::Applied
    }

    // === Settings ===

    /// Open or close the organizer panel. Returns the new state.
    pub fn toggle_panel(&mut self) -> bool {
        self.emit(ClockEvent::Click);
        self.panel_open = !self.panel_open;
        self.persist();
        self.panel_open
    }

    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.emit(ClockEvent::Click);
        self.settings.apply(patch);
        self.persist();
    }

    /// Update the payout configuration. Unbalanced percentages are logged, not corrected.
    pub fn update_prize_distribution(&mut self, patch: DistributionPatch) {
        self.emit(ClockEvent::Click);
        self.settings.prize_distribution.apply(patch);
        if let Some(warning) = self.settings.prize_distribution.check() {
            log::warn!("{}", warning);
        }
        self.persist();
    }

    // === Internals ===

    fn current_duration(&self) -> u32 {
        self.current_level()
            .map_or(MIN_LEVEL_DURATION_SECS, |level| level.duration_secs)
    }

    fn reset_engine(&mut self, duration: u32) {
        self.engine.reset(Some(duration));
        self.final_countdown_sent = false;
        self.emit(ClockEvent::TimeChanged {
            remaining_secs: duration,
        });
    }

    fn rewind_to_first_level(&mut self) {
        let first = self
            .settings
            .blind_structure
            .first_level()
            .map(|level| (level.id, level.duration_secs));
        if let Some((id, duration)) = first {
            self.current_level_id = id;
            self.reset_engine(duration);
        }
        self.alert_active = false;
        self.pending_advance = None;
    }

    fn emit(&self, event: ClockEvent) {
        self.sink.notify(&event);
    }
}
