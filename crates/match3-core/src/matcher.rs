//! Run detection.
//!
//! A run is a maximal line of equal, non-empty colors along one row or column.
//! Runs of three or more are matches.

use crate::grid::{Color, Grid, Position, EMPTY};
use std::collections::BTreeSet;

/// Shortest run that counts as a match
pub const MIN_RUN: usize = 3;

/// Every cell that belongs to a horizontal or vertical run of at least `MIN_RUN`.
///
/// Rows and columns are scanned independently and the results merged, so a
/// cell that sits in both a horizontal and a vertical run is reported once.
/// Pure query: the grid is not touched.
pub fn find_matches(grid: &Grid) -> BTreeSet<Position> {
    let size = grid.size();
    let mut matches = BTreeSet::new();

    for row in 0..size {
        scan_line(
            (0..size).map(|col| Position::new(row, col)),
            grid,
            &mut matches,
        );
    }

    for col in 0..size {
        scan_line(
            (0..size).map(|row| Position::new(row, col)),
            grid,
            &mut matches,
        );
    }

    matches
}

/// True if the grid holds at least one match
pub fn has_matches(grid: &Grid) -> bool {
    !find_matches(grid).is_empty()
}

/// Walk one line accumulating a run, emitting it on every color break and at the end
fn scan_line<I>(line: I, grid: &Grid, matches: &mut BTreeSet<Position>)
where
    I: Iterator<Item = Position>,
{
    let mut run: Vec<Position> = Vec::new();
    let mut run_color: Option<Color> = None;

    for position in line {
        let color = grid.color_at(position);
        if color.is_some() && color == run_color {
            run.push(position);
            continue;
        }

        flush_run(&run, run_color, matches);
        run.clear();
        run.push(position);
        run_color = color;
    }

    flush_run(&run, run_color, matches);
}

fn flush_run(run: &[Position], color: Option<Color>, matches: &mut BTreeSet<Position>) {
    if run.len() >= MIN_RUN && color.is_some_and(|c| c != EMPTY) {
        matches.extend(run.iter().copied());
    }
}
