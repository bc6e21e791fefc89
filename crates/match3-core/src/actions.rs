//! Host actions and the events they produce.
//!
//! Every controller entry point returns a list of `GameEvent`s describing what
//! changed, so a host can animate, log or forward them without diffing grids.

use crate::grid::Position;
use serde::{Deserialize, Serialize};

/// Inbound actions a host can send to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameAction {
    /// Deal a fresh board and zero the score
    Start,
    /// Drop the board, score and selection
    Reset,
    /// Pointer click on a cell
    SelectCell { row: usize, col: usize },
    /// Run the match scan now instead of waiting for the timer
    ForceCheckMatches,
}

/// What caused a match scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanTrigger {
    /// Check right after a player swap
    Swap,
    /// Periodic scan from the scheduler
    AutoScan,
    /// Host asked for a scan
    Manual,
}

/// Why an input was dropped. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// No board yet
    NotStarted,
    /// A cascade is in flight
    BoardLocked,
    /// Click coordinates outside the grid
    OutOfBounds,
}

/// Events that occur as a result of actions and timer ticks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh board was dealt
    GameStarted { grid_size: usize },

    /// Board, score and selection were discarded
    GameReset,

    /// First pick of a swap
    TileSelected { position: Position },

    /// The pending pick was dropped (same cell, non-adjacent cell, or a scan)
    SelectionCleared,

    /// Two adjacent colors were exchanged
    TilesSwapped { a: Position, b: Position },

    /// A scan found runs; the board is locked until they are cleared
    MatchesFound {
        positions: Vec<Position>,
        trigger: ScanTrigger,
    },

    /// Total score after a cascade step
    ScoreChanged { score: u32, gained: u32 },

    /// Matched cells were cleared, columns collapsed and refilled
    CascadeResolved { cleared: Vec<Position>, score: u32 },

    /// Input was a no-op
    Ignored { reason: IgnoreReason },
}

impl GameEvent {
    /// New total score if this event changed it
    pub fn score_change(&self) -> Option<u32> {
        match self {
            GameEvent::ScoreChanged { score, .. } => Some(*score),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_json_shape() {
        let action: GameAction =
            serde_json::from_str(r#"{"type": "selectCell", "row": 2, "col": 3}"#).unwrap();
        assert_eq!(action, GameAction::SelectCell { row: 2, col: 3 });

        let action: GameAction = serde_json::from_str(r#"{"type": "forceCheckMatches"}"#).unwrap();
        assert_eq!(action, GameAction::ForceCheckMatches);
    }

    #[test]
    fn test_score_change() {
        let event = GameEvent::ScoreChanged { score: 50, gained: 30 };
        assert_eq!(event.score_change(), Some(50));
        assert_eq!(GameEvent::GameReset.score_change(), None);
    }
}
