//! Core game state machine.
//!
//! `MatchGame` owns the grid exclusively and is the only writer. It is driven
//! by discrete host actions (clicks, start, reset, manual checks) and by
//! `tick`, which advances a virtual clock for the pending cascade and the
//! periodic auto-scan. The controller never reads a wall clock itself.

use crate::actions::{GameAction, GameEvent, IgnoreReason, ScanTrigger};
use crate::cascade;
use crate::config::{ConfigError, Customizations, EngineConfig};
use crate::grid::{is_adjacent, Grid, GridError, Position, Tile};
use crate::matcher::find_matches;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, trace};

/// Callback invoked with the new total after every cascade step
pub type ScoreListener = Box<dyn FnMut(u32) + Send>;

/// Controller phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No board yet
    Idle,

    /// Board dealt, nothing selected
    Ready,

    /// One cell picked, waiting for the second
    OneSelected { first: Position },

    /// A cascade is scheduled; input is locked until it lands
    Resolving {
        /// Cells that will be cleared
        pending: BTreeSet<Position>,
        /// Time left before the cascade lands
        remaining: Duration,
    },
}

/// Everything a host needs to draw the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub grid: Vec<Vec<Tile>>,
    pub grid_size: usize,
    pub score: u32,
    pub is_animating: bool,
    pub game_started: bool,
    pub phase: GamePhase,
}

/// The match-three controller
pub struct MatchGame<R = StdRng> {
    customizations: Customizations,
    config: EngineConfig,
    phase: GamePhase,
    grid: Option<Grid>,
    score: u32,
    /// Time since the grid last changed, for the auto-scan
    since_scan: Duration,
    rng: R,
    score_listener: Option<ScoreListener>,
}

impl MatchGame<StdRng> {
    /// Create an idle controller seeded from OS entropy
    pub fn new(customizations: Customizations, config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_rng(customizations, config, StdRng::from_entropy())
    }

    /// Create an idle controller with a fixed seed
    pub fn with_seed(
        customizations: Customizations,
        config: EngineConfig,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(customizations, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> MatchGame<R> {
    /// Create an idle controller drawing colors from `rng`
    pub fn with_rng(
        customizations: Customizations,
        config: EngineConfig,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            customizations,
            config,
            phase: GamePhase::Idle,
            grid: None,
            score: 0,
            since_scan: Duration::ZERO,
            rng,
            score_listener: None,
        })
    }

    /// Register the `onScoreChange` callback, replacing any previous one
    pub fn set_score_listener<F>(&mut self, listener: F)
    where
        F: FnMut(u32) + Send + 'static,
    {
        self.score_listener = Some(Box::new(listener));
    }

    // ==================== Observable state ====================

    pub fn customizations(&self) -> &Customizations {
        &self.customizations
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    /// Current board, `None` while idle
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Side length of the board for the configured difficulty
    pub fn grid_size(&self) -> usize {
        self.grid
            .as_ref()
            .map(Grid::size)
            .unwrap_or_else(|| self.customizations.grid_size())
    }

    pub fn is_started(&self) -> bool {
        !matches!(self.phase, GamePhase::Idle)
    }

    /// True while a cascade is in flight and input is locked
    pub fn is_animating(&self) -> bool {
        matches!(self.phase, GamePhase::Resolving { .. })
    }

    /// The pending first pick, if any
    pub fn selection(&self) -> Option<Position> {
        match self.phase {
            GamePhase::OneSelected { first } => Some(first),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            grid: self
                .grid
                .as_ref()
                .map(|grid| grid.rows().to_vec())
                .unwrap_or_default(),
            grid_size: self.grid_size(),
            score: self.score,
            is_animating: self.is_animating(),
            game_started: self.is_started(),
            phase: self.phase.clone(),
        }
    }

    // ==================== Actions ====================

    /// Apply a host action
    pub fn apply_action(&mut self, action: GameAction) -> Vec<GameEvent> {
        match action {
            GameAction::Start => self.start(),
            GameAction::Reset => self.reset(),
            GameAction::SelectCell { row, col } => self.select_cell(row, col),
            GameAction::ForceCheckMatches => self.force_check_matches(),
        }
    }

    /// Deal a fresh random board and zero the score.
    ///
    /// Calling this on a running game deals a new board, dropping any
    /// selection or pending cascade.
    pub fn start(&mut self) -> Vec<GameEvent> {
        let grid = Grid::random(
            self.customizations.grid_size(),
            self.config.color_count,
            &mut self.rng,
        );
        self.begin(grid)
    }

    /// Start with a host-supplied board instead of a random one
    pub fn start_with_grid(&mut self, mut grid: Grid) -> Result<Vec<GameEvent>, GridError> {
        let color_count = self.config.color_count;
        if let Some(tile) = grid.tiles().find(|tile| tile.color >= color_count) {
            return Err(GridError::ColorOutOfRange {
                position: tile.position(),
                color: tile.color,
                color_count,
            });
        }
        grid.clear_selection();
        Ok(self.begin(grid))
    }

    fn begin(&mut self, grid: Grid) -> Vec<GameEvent> {
        let grid_size = grid.size();
        self.grid = Some(grid);
        self.score = 0;
        self.since_scan = Duration::ZERO;
        self.phase = GamePhase::Ready;

        debug!(grid_size, "match game started");
        vec![GameEvent::GameStarted { grid_size }]
    }

    /// Discard board, score and selection
    pub fn reset(&mut self) -> Vec<GameEvent> {
        self.grid = None;
        self.score = 0;
        self.since_scan = Duration::ZERO;
        self.phase = GamePhase::Idle;

        debug!("match game reset");
        vec![GameEvent::GameReset]
    }

    /// Handle a pointer click on `(row, col)`.
    ///
    /// The first click selects a cell. The second click swaps with it when the
    /// two cells share an edge and otherwise just drops the selection. A swap
    /// that makes no match still stands.
    pub fn select_cell(&mut self, row: usize, col: usize) -> Vec<GameEvent> {
        let position = Position::new(row, col);

        let first = match self.phase {
            GamePhase::Idle => return Self::ignore(IgnoreReason::NotStarted),
            GamePhase::Resolving { .. } => return Self::ignore(IgnoreReason::BoardLocked),
            GamePhase::Ready | GamePhase::OneSelected { .. }
                if !self.grid.as_ref().is_some_and(|grid| grid.contains(position)) =>
            {
                return Self::ignore(IgnoreReason::OutOfBounds)
            }
            GamePhase::Ready => None,
            GamePhase::OneSelected { first } => Some(first),
        };

        let Some(grid) = self.grid.as_mut() else {
            return Self::ignore(IgnoreReason::NotStarted);
        };

        // Any accepted click counts as a grid change for the auto-scan
        self.since_scan = Duration::ZERO;

        let Some(first) = first else {
            grid.set_selected(position, true);
            self.phase = GamePhase::OneSelected { first: position };
            return vec![GameEvent::TileSelected { position }];
        };

        grid.clear_selection();
        self.phase = GamePhase::Ready;

        if !is_adjacent(first, position) {
            trace!(%first, second = %position, "selection dropped");
            return vec![GameEvent::SelectionCleared];
        }

        grid.swap_colors(first, position);
        debug!(a = %first, b = %position, "tiles swapped");

        let mut events = vec![GameEvent::TilesSwapped {
            a: first,
            b: position,
        }];
        events.extend(self.check_and_resolve(ScanTrigger::Swap));
        events
    }

    /// Scan now, exactly like the periodic auto-scan
    pub fn force_check_matches(&mut self) -> Vec<GameEvent> {
        self.check_and_resolve(ScanTrigger::Manual)
    }

    /// Shared entry point for post-swap checks, auto-scans and manual checks.
    ///
    /// If the board has matches the controller locks into `Resolving`; the
    /// cascade lands after the configured delay, or right away if that delay
    /// is zero. Returns no events when the board is clean.
    pub fn check_and_resolve(&mut self, trigger: ScanTrigger) -> Vec<GameEvent> {
        match self.phase {
            GamePhase::Idle => return Self::ignore(IgnoreReason::NotStarted),
            GamePhase::Resolving { .. } => return Self::ignore(IgnoreReason::BoardLocked),
            GamePhase::Ready | GamePhase::OneSelected { .. } => {}
        }
        let had_selection = self.selection().is_some();
        let Some(grid) = self.grid.as_mut() else {
            return Self::ignore(IgnoreReason::NotStarted);
        };

        let matches = find_matches(grid);
        if matches.is_empty() {
            return Vec::new();
        }

        let mut events = Vec::new();
        if had_selection {
            grid.clear_selection();
            events.push(GameEvent::SelectionCleared);
        }

        debug!(?trigger, count = matches.len(), "matches found");
        events.push(GameEvent::MatchesFound {
            positions: matches.iter().copied().collect(),
            trigger,
        });

        let delay = self.config.resolve_delay(trigger == ScanTrigger::Swap);
        self.phase = GamePhase::Resolving {
            pending: matches,
            remaining: delay,
        };

        if delay.is_zero() {
            events.extend(self.land_cascade());
        }
        events
    }

    /// Advance the controller clock by `elapsed`.
    ///
    /// Fires every deadline that falls inside the window, in order: a pending
    /// cascade lands when its delay runs out, and while the board is unlocked
    /// an auto-scan runs each time the grid has been still for
    /// `auto_scan_interval`.
    pub fn tick(&mut self, elapsed: Duration) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let mut budget = elapsed;

        loop {
            let due = match &self.phase {
                GamePhase::Idle => break,
                GamePhase::Resolving { remaining, .. } => *remaining,
                GamePhase::Ready | GamePhase::OneSelected { .. } => self
                    .config
                    .auto_scan_interval
                    .saturating_sub(self.since_scan),
            };

            if budget < due {
                match &mut self.phase {
                    GamePhase::Resolving { remaining, .. } => *remaining -= budget,
                    _ => self.since_scan += budget,
                }
                break;
            }
            budget -= due;

            if self.is_animating() {
                events.extend(self.land_cascade());
            } else {
                self.since_scan = Duration::ZERO;
                events.extend(self.check_and_resolve(ScanTrigger::AutoScan));
            }
        }

        events
    }

    /// Clear the pending matches, collapse, refill and score them
    fn land_cascade(&mut self) -> Vec<GameEvent> {
        let pending = match std::mem::replace(&mut self.phase, GamePhase::Ready) {
            GamePhase::Resolving { pending, .. } => pending,
            other => {
                self.phase = other;
                return Vec::new();
            }
        };
        let Some(grid) = self.grid.as_mut() else {
            self.phase = GamePhase::Idle;
            return Vec::new();
        };

        let outcome = cascade::resolve(grid, &pending, self.config.color_count, &mut self.rng);
        let cleared = outcome.cleared.len() as u32;
        let gained = cleared.saturating_mul(self.config.points_per_tile);
        self.score = self.score.saturating_add(gained);
        self.since_scan = Duration::ZERO;

        debug!(cleared, gained, score = self.score, "cascade resolved");
        if let Some(listener) = self.score_listener.as_mut() {
            listener(self.score);
        }

        vec![
            GameEvent::ScoreChanged {
                score: self.score,
                gained,
            },
            GameEvent::CascadeResolved {
                cleared: outcome.cleared.into_iter().collect(),
                score: self.score,
            },
        ]
    }

    fn ignore(reason: IgnoreReason) -> Vec<GameEvent> {
        trace!(?reason, "input ignored");
        vec![GameEvent::Ignored { reason }]
    }
}
