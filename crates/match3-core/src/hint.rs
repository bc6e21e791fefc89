//! Swap suggestions.
//!
//! Finds adjacent swaps that would produce a match. Hosts use this for a hint
//! button; the preview runner's autoplay picks from it.

use crate::grid::{Grid, Position};
use crate::matcher::has_matches;
use rand::seq::SliceRandom;
use rand::Rng;

/// Every adjacent swap whose result contains a match, in row-major order.
///
/// Each pair is listed once, with the upper or left cell first.
pub fn find_swaps(grid: &Grid) -> Vec<(Position, Position)> {
    let size = grid.size();
    let mut swaps = Vec::new();

    for tile in grid.tiles() {
        let from = tile.position();
        for to in from.forward_neighbors(size) {
            if grid.color_at(from) == grid.color_at(to) {
                continue;
            }
            if has_matches(&grid.with_swap(from, to)) {
                swaps.push((from, to));
            }
        }
    }

    swaps
}

/// A random productive swap, if the board has one
pub fn random_swap<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Option<(Position, Position)> {
    find_swaps(grid).choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_finds_completing_swap() {
        let grid = Grid::from_colors(
            vec![
                vec![0, 0, 1, 2],
                vec![1, 2, 0, 3],
                vec![2, 3, 4, 1],
                vec![3, 1, 2, 4],
            ],
            5,
        )
        .unwrap();

        let swaps = find_swaps(&grid);
        assert!(swaps.contains(&(Position::new(0, 2), Position::new(1, 2))));
        for (a, b) in &swaps {
            assert!(a.is_adjacent_to(b));
            assert!(a < b);
        }
    }

    #[test]
    fn test_dead_board_has_no_swaps() {
        // Rows hold four distinct colors and columns alternate two, so no single swap lines up three
        let grid = Grid::from_colors(
            vec![
                vec![0, 1, 2, 3],
                vec![2, 3, 0, 1],
                vec![0, 1, 2, 3],
                vec![2, 3, 0, 1],
            ],
            5,
        )
        .unwrap();

        assert!(find_swaps(&grid).is_empty());
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_swap(&grid, &mut rng), None);
    }
}
