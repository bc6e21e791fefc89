//! Integration tests for the match-three engine.
//!
//! These tests drive the controller the way a host does: clicks, timer ticks
//! and manual checks, checking the board invariants after each step.

use match3_core::*;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::time::Duration;

const PALETTE: u8 = 5;

fn easy() -> Customizations {
    Customizations::default().with_difficulty(Difficulty::Easy)
}

/// No cell holds a sentinel and every color is in the palette
fn assert_grid_invariant(game: &MatchGame) {
    let Some(grid) = game.grid() else {
        return;
    };
    let size = grid.size();
    assert_eq!(grid.tiles().count(), size * size);
    for (row, line) in grid.rows().iter().enumerate() {
        assert_eq!(line.len(), size);
        for (col, tile) in line.iter().enumerate() {
            assert_eq!(tile.position(), Position::new(row, col));
            assert!(tile.color < PALETTE, "bad color at {}", tile.position());
        }
    }
}

#[test]
fn test_detects_runs_of_three_and_four_in_one_row() {
    let grid = Grid::from_colors(
        vec![
            vec![0, 0, 0, 1, 1, 1, 1],
            vec![2, 3, 4, 2, 3, 4, 2],
            vec![3, 4, 2, 3, 4, 2, 3],
            vec![4, 2, 3, 4, 2, 3, 4],
            vec![2, 3, 4, 2, 3, 4, 2],
            vec![3, 4, 2, 3, 4, 2, 3],
            vec![4, 2, 3, 4, 2, 3, 4],
        ],
        PALETTE,
    )
    .unwrap();

    let matches = find_matches(&grid);
    assert_eq!(matches.len(), 7);
    assert!(matches.iter().all(|p| p.row == 0));
}

#[test]
fn test_adjacency_rule() {
    assert!(is_adjacent(Position::new(2, 2), Position::new(2, 3)));
    assert!(!is_adjacent(Position::new(2, 2), Position::new(3, 3)));
    assert!(!is_adjacent(Position::new(2, 2), Position::new(2, 2)));
}

#[test]
fn test_cascade_refills_every_cell() {
    let mut rng = StdRng::seed_from_u64(99);
    for size in [6, 8, 10] {
        let mut grid = Grid::random(size, PALETTE, &mut rng);
        let matched: BTreeSet<Position> = (0..size)
            .flat_map(|row| (0..size).map(move |col| Position::new(row, col)))
            .filter(|_| rng.gen_bool(0.3))
            .collect();

        resolve(&mut grid, &matched, PALETTE, &mut rng);

        assert_eq!(grid.empty_count(), 0);
        assert_eq!(grid.tiles().filter(|t| t.color < PALETTE).count(), size * size);
    }
}

#[test]
fn test_five_tile_clear_scores_fifty() {
    // An L of five: three across the top and two more down column 0
    let board = Grid::from_colors(
        vec![
            vec![0, 0, 0, 1, 2, 3],
            vec![0, 2, 3, 4, 0, 1],
            vec![0, 3, 4, 0, 1, 2],
            vec![3, 4, 0, 1, 2, 3],
            vec![4, 0, 1, 2, 3, 4],
            vec![1, 1, 2, 3, 4, 0],
        ],
        PALETTE,
    )
    .unwrap();
    assert_eq!(find_matches(&board).len(), 5);

    let mut game = MatchGame::with_seed(easy(), EngineConfig::instant(), 5).unwrap();
    game.start_with_grid(board).unwrap();
    let events = game.force_check_matches();

    assert!(events.contains(&GameEvent::ScoreChanged { score: 50, gained: 50 }));
    assert_eq!(game.score(), 50);
    assert_grid_invariant(&game);
}

#[test]
fn test_seeded_easy_board_end_to_end() {
    let board = Grid::from_colors(
        vec![
            vec![0, 0, 0, 1, 2, 3],
            vec![1, 2, 3, 4, 0, 1],
            vec![2, 3, 4, 0, 1, 2],
            vec![3, 4, 0, 1, 2, 3],
            vec![4, 0, 1, 2, 3, 4],
            vec![0, 1, 2, 3, 4, 0],
        ],
        PALETTE,
    )
    .unwrap();
    let before = board.colors();

    let mut game = MatchGame::with_seed(easy(), EngineConfig::default(), 2024).unwrap();
    let scores = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = std::sync::Arc::clone(&scores);
    game.set_score_listener(move |score| sink.lock().unwrap().push(score));
    game.start_with_grid(board).unwrap();

    // One auto-scan interval plus the clear delay
    let events = game.tick(Duration::from_millis(1300));

    let cleared: Vec<Position> = events
        .iter()
        .find_map(|e| match e {
            GameEvent::CascadeResolved { cleared, .. } => Some(cleared.clone()),
            _ => None,
        })
        .expect("cascade should have landed");
    assert_eq!(
        cleared,
        vec![Position::new(0, 0), Position::new(0, 1), Position::new(0, 2)]
    );
    assert_eq!(game.score(), 30);
    assert_eq!(*scores.lock().unwrap(), vec![30]);

    // Gravity only moved the top of columns 0..3; everything else is untouched
    let after = game.grid().unwrap().colors();
    for row in 1..6 {
        assert_eq!(after[row], before[row]);
    }
    assert_eq!(&after[0][3..], &before[0][3..]);
    assert_grid_invariant(&game);
}

#[test]
fn test_random_play_keeps_invariants() {
    let mut game = MatchGame::with_seed(
        Customizations::default().with_difficulty(Difficulty::Medium),
        EngineConfig::default(),
        17,
    )
    .unwrap();
    game.start();

    let mut rng = StdRng::seed_from_u64(4);
    let mut last_score = 0;
    let mut score_events = 0;

    for _ in 0..2_000 {
        let events = match rng.gen_range(0..10) {
            0..=5 => game.select_cell(rng.gen_range(0..9), rng.gen_range(0..9)),
            6 => game.force_check_matches(),
            _ => game.tick(Duration::from_millis(rng.gen_range(0..700))),
        };

        for event in &events {
            if let Some(score) = event.score_change() {
                assert!(score > last_score);
                last_score = score;
                score_events += 1;
            }
        }

        assert_eq!(game.score(), last_score);
        assert_eq!(game.score() % 10, 0);
        assert_grid_invariant(&game);

        // Selection never survives a lock
        if game.is_animating() {
            assert!(game.selection().is_none());
            assert!(game.grid().unwrap().tiles().all(|t| !t.selected));
        }
    }

    assert!(score_events > 0, "a long random session should clear something");
}

#[test]
fn test_board_settles_after_enough_ticks() {
    let mut game = MatchGame::with_seed(
        Customizations::default().with_difficulty(Difficulty::Hard),
        EngineConfig::default(),
        8,
    )
    .unwrap();
    game.start();

    // Each scan plus clear takes 1.3s; a minute of stillness is plenty
    let mut settled = false;
    for _ in 0..600 {
        game.tick(Duration::from_millis(100));
        if !game.is_animating() && find_matches(game.grid().unwrap()).is_empty() {
            settled = true;
            break;
        }
    }

    assert!(settled, "board should run out of matches");
    assert_eq!(game.phase(), &GamePhase::Ready);
    assert_grid_invariant(&game);
}

#[test]
fn test_actions_from_json() {
    let mut game = MatchGame::with_seed(easy(), EngineConfig::default(), 3).unwrap();

    let action: GameAction = serde_json::from_str(r#"{"type": "start"}"#).unwrap();
    assert_eq!(game.apply_action(action), vec![GameEvent::GameStarted { grid_size: 6 }]);

    let action: GameAction = serde_json::from_str(r#"{"type": "reset"}"#).unwrap();
    assert_eq!(game.apply_action(action), vec![GameEvent::GameReset]);
    assert!(!game.is_started());
}

#[test]
fn test_snapshot_json_for_host() {
    let mut game = MatchGame::with_seed(easy(), EngineConfig::default(), 3).unwrap();
    game.start();
    game.select_cell(0, 0);

    let json = serde_json::to_value(game.snapshot()).unwrap();
    assert_eq!(json["gameStarted"], true);
    assert_eq!(json["isAnimating"], false);
    assert_eq!(json["gridSize"], 6);
    assert_eq!(json["grid"][0][0]["selected"], true);
    assert_eq!(json["grid"].as_array().unwrap().len(), 6);
}

#[test]
fn test_hinted_swap_scores() {
    let mut game = MatchGame::with_seed(easy(), EngineConfig::instant(), 12).unwrap();
    game.start();
    // Clear whatever the deal left behind
    while !game.force_check_matches().is_empty() {}

    let grid = game.grid().unwrap().clone();
    let Some((a, b)) = find_swaps(&grid).first().copied() else {
        return;
    };

    game.select_cell(a.row, a.col);
    let events = game.select_cell(b.row, b.col);
    assert!(events.iter().any(|e| e.score_change().is_some()));
    assert!(game.score() >= 30);
}
