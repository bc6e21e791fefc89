//! Cascade resolution: clear matched cells, let tiles fall, refill from the top.
//!
//! One call to [`resolve`] is one discrete cascade step. Refilled colors may
//! line up into new runs; finding those is left to the next scan.

use crate::grid::{Color, Grid, Position, EMPTY};
use rand::Rng;
use std::collections::BTreeSet;

/// Outcome of a single cascade step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeOutcome {
    /// Cells that were cleared
    pub cleared: BTreeSet<Position>,
    /// Cells that received a fresh random color
    pub refilled: Vec<Position>,
}

/// Resolve one match set against the grid.
///
/// 1. Every matched cell is marked `EMPTY`.
/// 2. Each column is compacted downward, keeping the relative order of the
///    surviving tiles.
/// 3. The empty cells left at the top of each column get fresh colors.
///
/// Positions outside the grid are ignored. On return no cell is `EMPTY`.
pub fn resolve<R: Rng + ?Sized>(
    grid: &mut Grid,
    matched: &BTreeSet<Position>,
    color_count: u8,
    rng: &mut R,
) -> CascadeOutcome {
    let cleared: BTreeSet<Position> = matched
        .iter()
        .copied()
        .filter(|position| grid.contains(*position))
        .collect();

    clear_and_collapse(grid, &cleared);
    let refilled = refill(grid, color_count, rng);

    CascadeOutcome { cleared, refilled }
}

/// Mark cells empty and apply gravity column by column
pub fn clear_and_collapse(grid: &mut Grid, cleared: &BTreeSet<Position>) {
    for position in cleared {
        grid.set_color(*position, EMPTY);
    }

    let size = grid.size();
    for col in 0..size {
        let survivors: Vec<Color> = grid
            .column(col)
            .into_iter()
            .filter(|color| *color != EMPTY)
            .collect();
        let gap = size - survivors.len();
        if gap == 0 {
            continue;
        }

        for row in 0..size {
            let color = if row < gap {
                EMPTY
            } else {
                survivors[row - gap]
            };
            grid.set_color(Position::new(row, col), color);
        }
    }
}

/// Give every `EMPTY` cell a random color, returning the refilled positions
pub fn refill<R: Rng + ?Sized>(grid: &mut Grid, color_count: u8, rng: &mut R) -> Vec<Position> {
    let empty: Vec<Position> = grid
        .tiles()
        .filter(|tile| tile.is_empty())
        .map(|tile| tile.position())
        .collect();

    for position in &empty {
        grid.set_color(*position, rng.gen_range(0..color_count));
        grid.set_selected(*position, false);
    }

    empty
}
