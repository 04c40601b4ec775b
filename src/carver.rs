//! Path carving: randomized depth-first walk with lookahead and rollback.
//!
//! One carve walks from a node cell to random wall neighbors two steps away,
//! marking the link and destination cells as it goes. Every attempt runs
//! against a snapshot of the board and the solution list; an attempt that
//! falls short of its minimum length is rolled back. Solution carves retry
//! with a minimum one shorter each time until they reach their floor, then
//! fall back to a guided walk; incidental carves report
//! `CarveOutcome::Failed` and leave the choice to the caller.

use crate::board::Board;
use crate::rng::MazeRng;
use crate::types::{Coord, Mark};
use std::collections::HashSet;

/// Lookahead used while carving the solution path.
pub const SOLUTION_LOOKAHEAD: usize = 3;

/// Lookahead used for branches and fill.
pub const INCIDENTAL_LOOKAHEAD: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarveRole {
    Solution,
    Incidental,
}

impl CarveRole {
    pub fn mark(self) -> Mark {
        match self {
            CarveRole::Solution => Mark::Solution,
            CarveRole::Incidental => Mark::Aisle,
        }
    }

    pub fn lookahead_depth(self) -> usize {
        match self {
            CarveRole::Solution => SOLUTION_LOOKAHEAD,
            CarveRole::Incidental => INCIDENTAL_LOOKAHEAD,
        }
    }
}

/// Parameters of one carve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarveRequest {
    pub start: Coord,
    pub role: CarveRole,
    /// Treat every carved cell as impassable. When false, the walk may open
    /// a link into carved territory once, without extending into it.
    pub avoid_visited: bool,
    /// Cap on newly carved node cells. Always at least 1.
    pub max_length: usize,
    pub min_length: usize,
}

impl CarveRequest {
    /// A solution segment: accept anything down to three quarters of `max_length`.
    pub fn solution(start: Coord, max_length: usize) -> Self {
        let max_length = max_length.max(1);
        Self {
            start,
            role: CarveRole::Solution,
            avoid_visited: true,
            max_length,
            min_length: max_length * 3 / 4,
        }
    }

    /// A branch: accept anything down to 40% of `max_length`, never less than one cell.
    pub fn incidental(start: Coord, max_length: usize) -> Self {
        let max_length = max_length.max(1);
        Self {
            start,
            role: CarveRole::Incidental,
            avoid_visited: true,
            max_length,
            min_length: (max_length * 2 / 5).max(1),
        }
    }

    pub fn with_limits(mut self, max_length: usize, min_length: usize) -> Self {
        self.max_length = max_length.max(1);
        self.min_length = min_length;
        self
    }

    pub fn avoiding_visited(mut self, avoid_visited: bool) -> Self {
        self.avoid_visited = avoid_visited;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarveOutcome {
    Carved {
        /// Last node cell reached.
        end: Coord,
        /// Node cells newly carved.
        length: usize,
        /// Minimum that was finally met, lower than requested after retries.
        min_length: usize,
    },
    Failed,
}

impl CarveOutcome {
    pub fn end(&self) -> Option<Coord> {
        match *self {
            CarveOutcome::Carved { end, .. } => Some(end),
            CarveOutcome::Failed => None,
        }
    }

    pub fn length(&self) -> usize {
        match *self {
            CarveOutcome::Carved { length, .. } => length,
            CarveOutcome::Failed => 0,
        }
    }
}

impl From<SolutionPath> for CarveOutcome {
    fn from(path: SolutionPath) -> Self {
        CarveOutcome::Carved {
            end: path.end,
            length: path.length,
            min_length: path.min_length,
        }
    }
}

/// A finished solution carve. Solution carves always produce one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolutionPath {
    pub end: Coord,
    pub length: usize,
    /// Minimum that was finally met.
    pub min_length: usize,
}

/// Board and solution list as they were before an attempt.
#[derive(Debug, Clone)]
pub struct Snapshot {
    board: Board,
    solution: Vec<Coord>,
}

/// Carves paths on a borrowed board.
///
/// `origin` is the maze's border start point: a carve starting there first
/// marks it `Start` and steps one cell inward, outside the length budget.
pub struct Carver<'a> {
    board: &'a mut Board,
    solution: &'a mut Vec<Coord>,
    rng: &'a mut MazeRng,
    origin: Coord,
}

impl<'a> Carver<'a> {
    pub fn new(
        board: &'a mut Board,
        solution: &'a mut Vec<Coord>,
        rng: &'a mut MazeRng,
        origin: Coord,
    ) -> Self {
        Self {
            board,
            solution,
            rng,
            origin,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            solution: self.solution.clone(),
        }
    }

    pub fn rollback(&mut self, snapshot: Snapshot) {
        *self.board = snapshot.board;
        *self.solution = snapshot.solution;
    }

    pub fn carve(&mut self, request: CarveRequest) -> CarveOutcome {
        if request.role == CarveRole::Solution {
            return self.carve_solution(request, 0).into();
        }

        let snapshot = self.snapshot();
        let (end, length) = self.attempt(&request, None);
        if length >= request.min_length {
            return CarveOutcome::Carved {
                end,
                length,
                min_length: request.min_length,
            };
        }
        self.rollback(snapshot);
        CarveOutcome::Failed
    }

    /// Carve a solution segment, lowering the minimum by one per failed
    /// attempt but never below `floor`.
    ///
    /// Once the minimum sits at the floor and a free walk still misses it,
    /// one guided walk runs: each step only moves to a cell with room for
    /// the cells still owed. The guided walk reaches `floor` whenever a
    /// simple path of that many wall node cells leaves the start.
    pub fn carve_solution(&mut self, request: CarveRequest, floor: usize) -> SolutionPath {
        let floor = floor.min(request.min_length);
        let mut min_length = request.min_length;
        loop {
            let snapshot = self.snapshot();
            let (end, length) = self.attempt(&request, None);
            if length >= min_length {
                return SolutionPath {
                    end,
                    length,
                    min_length,
                };
            }
            self.rollback(snapshot);

            if min_length > floor {
                log::debug!(
                    "solution from {:?} reached {} of {}, retrying with minimum {}",
                    request.start,
                    length,
                    min_length,
                    min_length - 1
                );
                min_length -= 1;
                continue;
            }

            let (end, length) = self.attempt(&request, Some(floor));
            if length < floor {
                log::warn!(
                    "solution from {:?} has no room for {} cells, stopped at {}",
                    request.start,
                    floor,
                    length
                );
            }
            return SolutionPath {
                end,
                length,
                min_length: floor.min(length),
            };
        }
    }

    /// One walk. Returns the final node cell and the number of node cells carved.
    ///
    /// With `guide`, the lookahead shrinks to the cells still owed toward
    /// that length instead of the role's fixed depth.
    fn attempt(&mut self, request: &CarveRequest, guide: Option<usize>) -> (Coord, usize) {
        let mark = request.role.mark();

        let mut current = request.start;
        if current == self.origin && self.board.is_border(current) {
            self.board.set(current, Mark::Start);
            current = self.board.step_inward(current);
        }

        let mut local: HashSet<Coord> = HashSet::new();
        let mut forbid_carved = request.avoid_visited;
        let mut length = 0;

        while length < request.max_length {
            if self.board.get(current) == Mark::Wall {
                self.board.set(current, mark);
                length += 1;
                if request.role == CarveRole::Solution {
                    self.solution.push(current);
                }
                if length == request.max_length {
                    break;
                }
            }
            local.insert(current);

            let depth = match guide {
                Some(floor) => floor.saturating_sub(length).max(1),
                None => request.role.lookahead_depth(),
            };
            let board: &Board = self.board;
            let candidates: Vec<Coord> = board
                .node_neighbors(current)
                .into_iter()
                .filter(|next| !local.contains(next))
                .filter(|&next| !forbid_carved || board.get(next) == Mark::Wall)
                .filter(|&next| has_onward_path(board, next, depth - 1, &local, forbid_carved))
                .collect();

            let Some(next) = self.rng.choose(&candidates) else {
                break;
            };

            let link = Board::link_between(current, next);
            if self.board.get(link) == Mark::Wall {
                self.board.set(link, mark);
            }

            if self.board.get(next) == Mark::Wall {
                current = next;
            } else {
                // Joined existing territory; only fresh cells from here on.
                forbid_carved = true;
            }
        }

        (current, length)
    }
}

/// Whether a walk of `depth` further steps exists from `at` without touching
/// `blocked` cells (or carved cells when `forbid_carved`). Never mutates.
pub fn has_onward_path(
    board: &Board,
    at: Coord,
    depth: usize,
    blocked: &HashSet<Coord>,
    forbid_carved: bool,
) -> bool {
    fn walk(
        board: &Board,
        at: Coord,
        depth: usize,
        blocked: &HashSet<Coord>,
        forbid_carved: bool,
        trail: &mut Vec<Coord>,
    ) -> bool {
        if depth == 0 {
            return true;
        }
        trail.push(at);
        let found = board.node_neighbors(at).into_iter().any(|next| {
            !blocked.contains(&next)
                && !trail.contains(&next)
                && (!forbid_carved || board.get(next) == Mark::Wall)
                && walk(board, next, depth - 1, blocked, forbid_carved, trail)
        });
        trail.pop();
        found
    }

    walk(board, at, depth, blocked, forbid_carved, &mut Vec::with_capacity(depth))
}
