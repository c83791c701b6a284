//! Clock actor: owns the tournament and drives it from a tick interval.

use super::messages::{ClockCommand, ClockError, ClockMessage, ClockResponse, ClockResult};
use crate::tournament::{Tournament, TournamentSnapshot, TournamentView};
use tokio::{
    sync::{mpsc, oneshot},
    time::{Duration, Instant, MissedTickBehavior, interval_at},
};

/// Clock actor handle for sending messages
#[derive(Clone)]
pub struct ClockHandle {
    sender: mpsc::Sender<ClockMessage>,
}

impl ClockHandle {
    pub fn new(sender: mpsc::Sender<ClockMessage>) -> Self {
        Self { sender }
    }

    /// Send a raw message to the clock
    pub async fn send(&self, message: ClockMessage) -> ClockResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| ClockError::Closed)
    }

    /// Run an operator command and wait for its outcome
    pub async fn execute(&self, command: ClockCommand) -> ClockResult<ClockResponse> {
        let (response, rx) = oneshot::channel();
        self.send(ClockMessage::Command { command, response })
            .await?;
        rx.await.map_err(|_| ClockError::Closed)
    }

    pub async fn view(&self) -> ClockResult<TournamentView> {
        let (response, rx) = oneshot::channel();
        self.send(ClockMessage::GetView { response }).await?;
        rx.await.map_err(|_| ClockError::Closed)
    }

    pub async fn snapshot(&self) -> ClockResult<TournamentSnapshot> {
        let (response, rx) = oneshot::channel();
        self.send(ClockMessage::GetSnapshot { response }).await?;
        rx.await.map_err(|_| ClockError::Closed)
    }

    pub async fn tick(&self) -> ClockResult<()> {
        self.send(ClockMessage::Tick).await
    }

    pub async fn shutdown(&self) -> ClockResult<()> {
        self.send(ClockMessage::Shutdown).await
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Actor serializing every command and tick against one tournament
pub struct ClockActor {
    tournament: Tournament,

    /// Message inbox
    inbox: mpsc::Receiver<ClockMessage>,

    tick_interval: Duration,

    is_closed: bool,
}

impl ClockActor {
    /// Create a new clock actor and its handle
    pub fn new(tournament: Tournament) -> (Self, ClockHandle) {
        let capacity = tournament.config().inbox_capacity.max(1);
        let tick_interval = tournament
            .config()
            .tick_interval
            .max(Duration::from_millis(1));
        let (sender, inbox) = mpsc::channel(capacity);

        let actor = Self {
            tournament,
            inbox,
            tick_interval,
            is_closed: false,
        };

        (actor, ClockHandle::new(sender))
    }

    /// Spawn the actor on the current runtime
    pub fn spawn(tournament: Tournament) -> ClockHandle {
        let (actor, handle) = Self::new(tournament);
        tokio::spawn(actor.run());
        handle
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        log::info!(
            "Clock '{}' starting at level {}",
            self.tournament.settings().title,
            self.tournament.current_level_id()
        );

        let mut tick_interval = interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        tick_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                message = self.inbox.recv() => {
                    match message {
                        Some(message) => self.handle_message(message),
                        None => break,
                    }

                    if self.is_closed {
                        break;
                    }
                }

                _ = tick_interval.tick() => {
                    self.tournament.poll(Instant::now());
                }
            }
        }

        self.tournament.persist();
        log::info!("Clock '{}' stopped", self.tournament.settings().title);
    }

    fn handle_message(&mut self, message: ClockMessage) {
        match message {
            ClockMessage::Command { command, response } => {
                let result = self.execute(command);
                let _ = response.send(result);
            }

            ClockMessage::GetView { response } => {
                let _ = response.send(self.tournament.view());
            }

            ClockMessage::GetSnapshot { response } => {
                let _ = response.send(self.tournament.snapshot());
            }

            ClockMessage::Tick => {
                self.tournament.poll(Instant::now());
            }

            ClockMessage::Shutdown => {
                self.is_closed = true;
            }
        }
    }

    fn execute(&mut self, command: ClockCommand) -> ClockResponse {
        let now = Instant::now();
        let tournament = &mut self.tournament;

        match command {
            ClockCommand::Start => tournament.start(now).into(),
            ClockCommand::Pause => tournament.pause().into(),
            ClockCommand::Resume => tournament.resume(now).into(),
            ClockCommand::Toggle => tournament.toggle(now).into(),
            ClockCommand::ResetTimer => {
                tournament.reset_timer();
                ClockResponse::Applied
            }
            ClockCommand::AddTime(delta_secs) => {
                tournament.add_time(delta_secs, now);
                ClockResponse::Applied
            }
            ClockCommand::NextLevel => tournament.advance_to_next_level(now).into(),
            ClockCommand::AddBuyIn => {
                tournament.add_buy_in();
                ClockResponse::Applied
            }
            ClockCommand::RemoveBuyIn => tournament.remove_buy_in().into(),
            ClockCommand::AddReBuy => {
                tournament.add_re_buy();
                ClockResponse::Applied
            }
            ClockCommand::RemoveReBuy => tournament.remove_re_buy().into(),
            ClockCommand::SelectStructure(key) => tournament.update_blind_structure(&key).into(),
            ClockCommand::AddLevel(level) => {
                ClockResponse::LevelAdded(tournament.add_blind_level(level))
            }
            ClockCommand::RemoveLevel(id) => tournament.remove_blind_level(id).into(),
            ClockCommand::UpdateLevel { id, field, value } => {
                tournament.update_blind_level(id, field, value).into()
            }
            ClockCommand::ResetTournament { clear_persisted } => {
                tournament.reset_tournament(clear_persisted);
                ClockResponse::Applied
            }
            ClockCommand::DismissAlert => tournament.dismiss_alert().into(),
            ClockCommand::TogglePanel => {
                tournament.toggle_panel();
                ClockResponse::Applied
            }
            ClockCommand::UpdateSettings(patch) => {
                tournament.update_settings(patch);
                ClockResponse::Applied
            }
            ClockCommand::UpdatePrizeDistribution(patch) => {
                tournament.update_prize_distribution(patch);
                ClockResponse::Applied
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::{BlindLevel, BlindStructure},
        clock::ClockConfig,
        countdown::CountdownStatus,
        notify::NullSink,
        storage::MemoryStore,
        tournament::TournamentSettings,
        transition::IgnoreReason,
    };
    use std::sync::Arc;

    fn short_tournament(config: ClockConfig) -> (Tournament, Arc<MemoryStore>) {
        let settings = TournamentSettings {
            blind_structure: BlindStructure::new(
                "Short",
                vec![BlindLevel::new(1, 10, 20, 5), BlindLevel::new(2, 20, 40, 7)],
            ),
            ..TournamentSettings::default()
        };
        let store = Arc::new(MemoryStore::new());
        let tournament =
            Tournament::with_settings(config, settings, store.clone(), Arc::new(NullSink));
        (tournament, store)
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_counts_down_while_running() {
        let (tournament, _) = short_tournament(ClockConfig::default());
        let handle = ClockActor::spawn(tournament);

        assert_eq!(
            handle.execute(ClockCommand::Start).await.unwrap(),
            ClockResponse::Applied
        );
        tokio::time::sleep(Duration::from_millis(3500)).await;

        let view = handle.view().await.unwrap();
        assert_eq!(view.countdown.remaining_secs, 2);
        assert_eq!(view.countdown.status, CountdownStatus::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_advances_to_next_level() {
        let (tournament, _) = short_tournament(ClockConfig::default());
        let handle = ClockActor::spawn(tournament);

        handle.execute(ClockCommand::Start).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5500)).await;

        let view = handle.view().await.unwrap();
        assert_eq!(view.current_level.map(|level| level.id), Some(2));
        assert_eq!(view.countdown.status, CountdownStatus::Running);
        assert_eq!(view.countdown.remaining_secs, 7);
        assert!(!view.alert_active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_advance_holds_alert() {
        let config = ClockConfig::default().with_auto_advance_delay(Duration::from_secs(3));
        let (tournament, _) = short_tournament(config);
        let handle = ClockActor::spawn(tournament);

        handle.execute(ClockCommand::Start).await.unwrap();
        tokio::time::sleep(Duration::from_millis(6500)).await;

        let view = handle.view().await.unwrap();
        assert_eq!(view.current_level.map(|level| level.id), Some(1));
        assert!(view.alert_active);
        assert!(view.advance_pending);

        tokio::time::sleep(Duration::from_secs(2)).await;
        let view = handle.view().await.unwrap();
        assert_eq!(view.current_level.map(|level| level.id), Some(2));
        assert!(!view.advance_pending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_freezes_remaining_time() {
        let (tournament, _) = short_tournament(ClockConfig::default());
        let handle = ClockActor::spawn(tournament);

        handle.execute(ClockCommand::Start).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1100)).await;
        handle.execute(ClockCommand::Pause).await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;

        let view = handle.view().await.unwrap();
        assert_eq!(view.countdown.remaining_secs, 4);
        assert_eq!(view.countdown.status, CountdownStatus::Paused);
    }

    #[tokio::test]
    async fn test_ignored_command_reports_reason() {
        let (tournament, _) = short_tournament(ClockConfig::default());
        let handle = ClockActor::spawn(tournament);

        assert_eq!(
            handle.execute(ClockCommand::RemoveBuyIn).await.unwrap(),
            ClockResponse::Ignored(IgnoreReason::CounterAtZero)
        );
        assert_eq!(
            handle
                .execute(ClockCommand::AddLevel(BlindLevel::new(0, 50, 100, 600)))
                .await
                .unwrap(),
            ClockResponse::LevelAdded(3)
        );
    }

    #[tokio::test]
    async fn test_shutdown_saves_and_closes() {
        let (tournament, store) = short_tournament(ClockConfig::default());
        let (actor, handle) = ClockActor::new(tournament);
        let task = tokio::spawn(actor.run());

        handle.execute(ClockCommand::AddBuyIn).await.unwrap();
        handle.shutdown().await.unwrap();
        task.await.unwrap();

        assert_eq!(store.snapshot().map(|s| s.buy_ins), Some(1));
        assert_eq!(handle.view().await, Err(ClockError::Closed));
    }
}
