//! Dead-end branches grown off the finished solution path.

use crate::board::Board;
use crate::carver::{CarveOutcome, CarveRequest, Carver};
use crate::config::MazeConfig;
use crate::rng::MazeRng;
use crate::types::Coord;

/// Upper bound on branches for a solution of `solution_len` cells.
pub fn branch_target(complexity: f64, solution_len: usize) -> usize {
    (complexity * solution_len as f64 / 4.0) as usize
}

/// Grow branches from random solution cells until the target is met or every
/// cell has been tried. Returns the number of branches carved.
pub fn grow_branches(
    board: &mut Board,
    solution: &mut Vec<Coord>,
    rng: &mut MazeRng,
    origin: Coord,
    config: &MazeConfig,
) -> usize {
    let target = branch_target(config.complexity, solution.len());
    let max_length = config.branch_length();

    let mut pool = solution.clone();
    rng.shuffle(&mut pool);

    let mut grown = 0;
    while grown < target {
        let Some(start) = pool.pop() else {
            break;
        };
        let outcome = Carver::new(board, solution, rng, origin)
            .carve(CarveRequest::incidental(start, max_length));
        if let CarveOutcome::Carved { .. } = outcome {
            grown += 1;
        }
    }

    log::debug!("grew {grown} of {target} branches");
    grown
}
