//! Preview session: one match game owned by a tokio task.
//!
//! The task is the only place the controller lives. Host commands arrive on
//! an mpsc channel, a `tokio::time::interval` drives the controller clock, and
//! every change is published as a fresh snapshot on a watch channel. Score
//! notifications fan out on a broadcast channel.

use match3_core::{GameAction, GameEvent, GameSnapshot, MatchGame};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Buffered score notifications per subscriber
const SCORE_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Preview session has shut down")]
    SessionClosed,
}

/// Messages sent from the host to the session task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Forward a controller action
    Action(GameAction),
    /// Stop the task
    Shutdown,
}

/// Host-side handle to a running preview session.
pub struct PreviewHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<GameSnapshot>,
    scores: broadcast::Sender<u32>,
    task: JoinHandle<()>,
}

impl PreviewHandle {
    fn send(&self, command: Command) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .map_err(|_| SessionError::SessionClosed)
    }

    pub fn apply(&self, action: GameAction) -> Result<(), SessionError> {
        self.send(Command::Action(action))
    }

    pub fn start(&self) -> Result<(), SessionError> {
        self.apply(GameAction::Start)
    }

    pub fn reset(&self) -> Result<(), SessionError> {
        self.apply(GameAction::Reset)
    }

    pub fn select_cell(&self, row: usize, col: usize) -> Result<(), SessionError> {
        self.apply(GameAction::SelectCell { row, col })
    }

    pub fn force_check_matches(&self) -> Result<(), SessionError> {
        self.apply(GameAction::ForceCheckMatches)
    }

    /// Latest published state
    pub fn snapshot(&self) -> GameSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that wakes on every published change
    pub fn watch(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshots.clone()
    }

    /// Subscribe to `onScoreChange` notifications
    pub fn subscribe_scores(&self) -> broadcast::Receiver<u32> {
        self.scores.subscribe()
    }

    /// Stop the session and wait for the task to finish
    pub async fn shutdown(self) -> Result<(), SessionError> {
        // Already-stopped sessions still join cleanly
        let _ = self.send(Command::Shutdown);
        self.task.await.map_err(|_| SessionError::SessionClosed)
    }
}

/// Spawn a session task that owns `game` and ticks it every `tick_period`.
pub fn spawn(mut game: MatchGame, tick_period: Duration) -> PreviewHandle {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(game.snapshot());
    let (score_tx, _) = broadcast::channel(SCORE_CHANNEL_CAPACITY);

    let listener_tx = score_tx.clone();
    game.set_score_listener(move |score| {
        // No subscribers is fine
        let _ = listener_tx.send(score);
    });

    let task = tokio::spawn(run(game, command_rx, snapshot_tx, tick_period));

    PreviewHandle {
        commands: command_tx,
        snapshots: snapshot_rx,
        scores: score_tx,
        task,
    }
}

async fn run(
    mut game: MatchGame,
    mut commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<GameSnapshot>,
    tick_period: Duration,
) {
    let mut ticker = tokio::time::interval(tick_period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_tick = Instant::now();

    info!(
        difficulty = game.customizations().difficulty.as_str(),
        grid_size = game.grid_size(),
        "preview session running"
    );

    loop {
        let events = tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                let elapsed = now.duration_since(last_tick);
                last_tick = now;
                game.tick(elapsed)
            }
            command = commands.recv() => match command {
                Some(Command::Action(action)) => {
                    debug!(?action, "host action");
                    game.apply_action(action)
                }
                Some(Command::Shutdown) | None => break,
            },
        };

        publish(&game, &snapshots, &events);
    }

    info!(score = game.score(), "preview session stopped");
}

fn publish(game: &MatchGame, snapshots: &watch::Sender<GameSnapshot>, events: &[GameEvent]) {
    if events.is_empty() {
        return;
    }

    for event in events {
        match event {
            GameEvent::ScoreChanged { score, gained } => info!(score, gained, "score changed"),
            other => debug!(event = ?other, "game event"),
        }
    }

    snapshots.send_replace(game.snapshot());
}
