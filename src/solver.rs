//! Move-search strategies over single-tile swaps.
//!
//! Both solvers walk the same adjacent-pair enumeration the legality scan
//! uses, speculatively apply each swap, measure the score delta, and restore
//! the board from a snapshot before trying the next pair. They take the
//! board by `&mut` because of that mutate-then-restore cycle, but the grid
//! and score are exactly as found once they return; only the board's RNG
//! advances.

use log::debug;

use crate::engine::{adjacent_pairs, Board, Swap};

/// Scans every adjacent pair once, measuring each swap with the
/// non-cascading score-only probe, and returns the pair with the strictly
/// greatest positive delta.
///
/// Ties keep the earliest pair in enumeration order, so the result is fully
/// deterministic for a given grid. Returns `None` when no swap scores.
pub fn solve_exhaustive(board: &mut Board) -> Option<Swap> {
    scan_best(board, false).map(|(pair, _)| pair)
}

/// Runs `loops` independent exhaustive scans, each measuring swaps with the
/// full cascading probe so refill randomness affects the deltas, and returns
/// the candidate recommended most often.
///
/// Each iteration contributes one candidate: its best pair, or `None` when
/// no swap scored that round. Tally ties go to the earliest-seen candidate.
/// Cost is linear in `loops`; the caller bounds it.
pub fn solve_simulated(board: &mut Board, loops: u32) -> Option<Swap> {
    assert!(loops >= 1, "the simulated solver needs at least one iteration");
    let mut tally: Vec<(Option<Swap>, u32)> = Vec::new();
    for i in 0..loops {
        let candidate = scan_best(board, true).map(|(pair, _)| pair);
        debug!("simulated iteration {}: candidate {:?}", i, candidate);
        match tally.iter_mut().find(|(seen, _)| *seen == candidate) {
            Some((_, count)) => *count += 1,
            None => tally.push((candidate, 1)),
        }
    }
    let mut best: Option<(Option<Swap>, u32)> = None;
    for (candidate, count) in tally {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((candidate, count));
        }
    }
    best.and_then(|(candidate, _)| candidate)
}

/// One pass over all adjacent pairs: probe, measure, restore, keep the
/// strict maximum positive delta.
fn scan_best(board: &mut Board, cascading: bool) -> Option<(Swap, i32)> {
    let snapshot = board.snapshot();
    let start = board.score();
    let mut best: Option<(Swap, i32)> = None;
    for (a, b) in adjacent_pairs(board.size()) {
        if cascading {
            board.probe(a, b);
        } else {
            board.probe_no_refill(a, b);
        }
        let delta = board.score() - start;
        board.restore(&snapshot);
        if delta > 0 && best.map_or(true, |(_, best_delta)| delta > best_delta) {
            best = Some(((a, b), delta));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Color;
    use crate::utils::board_from_rows;

    // Same fixtures as the engine tests: one board whose only beneficial
    // adjacent swap is ((2, 0), (2, 1)), and one with none at all.
    fn unique_move_board() -> Board {
        board_from_rows(
            &["rrypg", "byrgb", "ypgby", "pgbyp", "gbypg"],
            &Color::ALL,
            7,
        )
        .unwrap()
    }

    fn deadlocked_board() -> Board {
        board_from_rows(
            &["rgbyr", "gbyrg", "byrgb", "yrgby", "rgbyr"],
            &Color::DEFAULT_PALETTE,
            7,
        )
        .unwrap()
    }

    #[test]
    fn test_exhaustive_finds_the_unique_move() {
        let mut board = unique_move_board();
        let grid_before = board.grid().to_vec();
        assert_eq!(solve_exhaustive(&mut board), Some(((2, 0), (2, 1))));
        assert_eq!(board.grid(), grid_before.as_slice());
        assert_eq!(board.score(), 0);
    }

    #[test]
    fn test_exhaustive_returns_none_when_deadlocked() {
        let mut board = deadlocked_board();
        assert_eq!(solve_exhaustive(&mut board), None);
    }

    #[test]
    fn test_exhaustive_recommendation_dominates_every_pair() {
        let mut board = board_from_rows(
            &["rrgby", "gbrgb", "bgbrg", "yrgbr", "byrgy"],
            &Color::DEFAULT_PALETTE,
            3,
        )
        .unwrap();
        let recommended = solve_exhaustive(&mut board).expect("scenario board has a move");

        let snapshot = board.snapshot();
        let mut recommended_delta = 0;
        let mut max_delta = 0;
        for (a, b) in adjacent_pairs(board.size()) {
            board.probe_swap_no_refill(a, b).unwrap();
            let delta = board.score();
            board.restore(&snapshot);
            max_delta = max_delta.max(delta);
            if (a, b) == recommended {
                recommended_delta = delta;
            }
        }
        assert!(recommended_delta > 0);
        assert_eq!(recommended_delta, max_delta);
    }

    #[test]
    fn test_simulated_single_loop_finds_the_unique_move() {
        let mut board = unique_move_board();
        let grid_before = board.grid().to_vec();
        assert_eq!(solve_simulated(&mut board, 1), Some(((2, 0), (2, 1))));
        assert_eq!(board.grid(), grid_before.as_slice());
        assert_eq!(board.score(), 0);
    }

    #[test]
    fn test_simulated_agrees_on_the_unique_move_across_loops() {
        // With a single beneficial pair every iteration votes the same way
        // no matter what the refills draw.
        let mut board = unique_move_board();
        assert_eq!(solve_simulated(&mut board, 5), Some(((2, 0), (2, 1))));
    }

    #[test]
    fn test_simulated_returns_none_when_deadlocked() {
        let mut board = deadlocked_board();
        assert_eq!(solve_simulated(&mut board, 3), None);
    }
}
