//! Grid model for the match-three board.
//!
//! This module provides the positional types the rest of the engine works on:
//! - `Position`: identifies a cell by `(row, col)`
//! - `Tile`: one cell, carrying its color and the selection highlight
//! - `Grid`: the square matrix of tiles
//!
//! A tile's identity is its position. Swaps, gravity and refills only ever move
//! colors between slots, so every `(row, col)` holds exactly one tile for the
//! whole life of a grid.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tile color index in `[0, color_count)`
pub type Color = u8;

/// Sentinel for a cleared cell while a cascade is being resolved
pub const EMPTY: Color = Color::MAX;

/// Errors when building a grid from explicit colors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("Grid must have at least one row")]
    Empty,

    #[error("Row {row} has {len} cells, expected {expected}")]
    NotSquare { row: usize, len: usize, expected: usize },

    #[error("Color {color} at {position} is outside the palette of {color_count}")]
    ColorOutOfRange {
        position: Position,
        color: Color,
        color_count: u8,
    },
}

/// A cell coordinate. Row 0 is the top of the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// Create a new position
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another position
    pub fn distance_to(&self, other: &Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// True if `other` is directly above, below, left or right of this cell
    pub fn is_adjacent_to(&self, other: &Position) -> bool {
        self.distance_to(other) == 1
    }

    /// Right and down neighbours that fall inside a `size x size` board
    pub fn forward_neighbors(&self, size: usize) -> impl Iterator<Item = Position> {
        let right = (self.col + 1 < size).then(|| Position::new(self.row, self.col + 1));
        let down = (self.row + 1 < size).then(|| Position::new(self.row + 1, self.col));
        right.into_iter().chain(down)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Swap legality gate: the two cells must share an edge.
///
/// Diagonal neighbours and a cell paired with itself are rejected. Whether the
/// swap actually produces a match is only known after it is made.
pub fn is_adjacent(a: Position, b: Position) -> bool {
    a.is_adjacent_to(&b)
}

/// A single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub row: usize,
    pub col: usize,
    pub color: Color,
    /// Highlight for the first pick of an in-progress swap
    pub selected: bool,
}

impl Tile {
    pub fn new(position: Position, color: Color) -> Self {
        Self {
            row: position.row,
            col: position.col,
            color,
            selected: false,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }

    pub fn is_empty(&self) -> bool {
        self.color == EMPTY
    }
}

/// Square matrix of tiles, stored row by row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    rows: Vec<Vec<Tile>>,
}

impl Grid {
    /// Fill a `size x size` grid with colors drawn uniformly from `[0, color_count)`.
    ///
    /// No attempt is made to avoid runs at creation; the controller's auto-scan
    /// clears any incidental matches.
    pub fn random<R: Rng + ?Sized>(size: usize, color_count: u8, rng: &mut R) -> Self {
        let rows = (0..size)
            .map(|row| {
                (0..size)
                    .map(|col| Tile::new(Position::new(row, col), rng.gen_range(0..color_count)))
                    .collect()
            })
            .collect();

        Self { size, rows }
    }

    /// Build a grid from explicit colors, validating shape and palette
    pub fn from_colors(colors: Vec<Vec<Color>>, color_count: u8) -> Result<Self, GridError> {
        let size = colors.len();
        if size == 0 {
            return Err(GridError::Empty);
        }

        let mut rows = Vec::with_capacity(size);
        for (row, line) in colors.into_iter().enumerate() {
            if line.len() != size {
                return Err(GridError::NotSquare {
                    row,
                    len: line.len(),
                    expected: size,
                });
            }

            let mut tiles = Vec::with_capacity(size);
            for (col, color) in line.into_iter().enumerate() {
                let position = Position::new(row, col);
                if color >= color_count {
                    return Err(GridError::ColorOutOfRange {
                        position,
                        color,
                        color_count,
                    });
                }
                tiles.push(Tile::new(position, color));
            }
            rows.push(tiles);
        }

        Ok(Self { size, rows })
    }

    /// Side length of the board
    pub fn size(&self) -> usize {
        self.size
    }

    /// Check whether a position lies on the board
    pub fn contains(&self, position: Position) -> bool {
        position.row < self.size && position.col < self.size
    }

    pub fn get(&self, position: Position) -> Option<&Tile> {
        self.rows.get(position.row)?.get(position.col)
    }

    fn get_mut(&mut self, position: Position) -> Option<&mut Tile> {
        self.rows.get_mut(position.row)?.get_mut(position.col)
    }

    /// Color at a position, or `None` off the board
    pub fn color_at(&self, position: Position) -> Option<Color> {
        self.get(position).map(|tile| tile.color)
    }

    pub(crate) fn set_color(&mut self, position: Position, color: Color) {
        if let Some(tile) = self.get_mut(position) {
            tile.color = color;
        }
    }

    /// Rows of tiles, top to bottom
    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.rows
    }

    /// All tiles in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.rows.iter().flatten()
    }

    /// Plain color matrix, mostly useful for tests and debugging
    pub fn colors(&self) -> Vec<Vec<Color>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|tile| tile.color).collect())
            .collect()
    }

    /// Colors of one column, top to bottom
    pub fn column(&self, col: usize) -> Vec<Color> {
        self.rows.iter().filter_map(|row| row.get(col)).map(|tile| tile.color).collect()
    }

    /// Exchange the colors of two cells. Positions stay where they are.
    ///
    /// Returns `false` without touching the grid if either cell is off the board.
    pub fn swap_colors(&mut self, a: Position, b: Position) -> bool {
        let (Some(color_a), Some(color_b)) = (self.color_at(a), self.color_at(b)) else {
            return false;
        };
        self.set_color(a, color_b);
        self.set_color(b, color_a);
        true
    }

    /// Copy of this grid with two colors exchanged
    pub fn with_swap(&self, a: Position, b: Position) -> Grid {
        let mut grid = self.clone();
        grid.swap_colors(a, b);
        grid
    }

    /// Set or clear the selection highlight on one tile
    pub fn set_selected(&mut self, position: Position, selected: bool) {
        if let Some(tile) = self.get_mut(position) {
            tile.selected = selected;
        }
    }

    /// Clear every selection highlight
    pub fn clear_selection(&mut self) {
        for tile in self.rows.iter_mut().flatten() {
            tile.selected = false;
        }
    }

    /// Number of cells currently holding the `EMPTY` sentinel
    pub fn empty_count(&self) -> usize {
        self.tiles().filter(|tile| tile.is_empty()).count()
    }
}
