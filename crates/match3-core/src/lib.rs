//! Match-three engine for the game builder's live preview.
//!
//! This crate provides the tile-matching core:
//! - Grid model with positional tiles and color swaps
//! - Run detection over rows and columns
//! - Cascade resolution (clear, gravity, refill)
//! - A controller state machine that owns the grid, locks input while a
//!   cascade is in flight and re-scans the board on a fixed interval
//!
//! # Architecture
//!
//! The controller is clock-agnostic: hosts call [`MatchGame::tick`] with the
//! elapsed time and the controller fires whatever deadlines fall in that
//! window. It can be compiled to:
//! - Native Rust, driven by the tokio runner in `match3-preview`
//! - WebAssembly, driven by a browser `setInterval` (`wasm` feature)
//!
//! # Modules
//!
//! - [`grid`]: Positions, tiles, the grid and the adjacency rule for swaps
//! - [`matcher`]: Run detection
//! - [`cascade`]: Clearing, gravity and refill
//! - [`game`]: Controller state machine
//! - [`config`]: Builder customizations and engine tunables
//! - [`hint`]: Productive swap search

pub mod actions;
pub mod cascade;
pub mod config;
pub mod game;
pub mod grid;
pub mod hint;
pub mod matcher;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{GameAction, GameEvent, IgnoreReason, ScanTrigger};
pub use cascade::{resolve, CascadeOutcome};
pub use config::{ColorScheme, ConfigError, Customizations, Difficulty, EngineConfig, Theme};
pub use game::{GamePhase, GameSnapshot, MatchGame, ScoreListener};
pub use grid::{is_adjacent, Color, Grid, GridError, Position, Tile, EMPTY};
pub use hint::find_swaps;
pub use matcher::find_matches;
