//! Waypoint sequencing for the solution path.
//!
//! The solution is carved one segment per waypoint. The total length target
//! is split evenly over the waypoints still ahead, recomputed after each
//! segment so a short segment leaves more budget for the next ones.

use crate::board::Board;
use crate::carver::{has_onward_path, CarveRequest, Carver, SOLUTION_LOOKAHEAD};
use crate::config::MazeConfig;
use crate::rng::MazeRng;
use crate::types::{Coord, Mark};
use std::collections::{BTreeMap, HashSet};

/// Shortest segment that still leaves a plain solution cell for the key
/// besides its own end.
pub const KEY_SEGMENT_FLOOR: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waypoint {
    Portal,
    Key,
    End,
}

/// What a carved segment ends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    Portal,
    End,
}

/// One carved segment of the plan. `index` is the position of its waypoint
/// in the full plan, keys included, and drives the budget split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg {
    pub index: usize,
    pub stop: Stop,
    pub carries_key: bool,
}

impl Leg {
    /// Fewest cells this segment may carve.
    pub fn floor(&self) -> usize {
        if self.carries_key {
            KEY_SEGMENT_FLOOR
        } else {
            1
        }
    }
}

/// Summary of one carved segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub stop: Stop,
    pub carries_key: bool,
    pub start: Coord,
    pub end: Coord,
    pub length: usize,
    pub budget: usize,
    pub min_length: usize,
}

/// Everything the solution pass produces besides the board itself.
#[derive(Debug, Clone, Default)]
pub struct Route {
    pub end: Coord,
    pub portals: BTreeMap<Coord, Coord>,
    pub keys: Vec<Coord>,
    pub segments: Vec<Segment>,
}

/// `num_portals` portals with the key shuffled among them, then the end.
pub fn plan_waypoints(num_portals: usize, has_key: bool, rng: &mut MazeRng) -> Vec<Waypoint> {
    let mut waypoints = vec![Waypoint::Portal; num_portals];
    if has_key {
        waypoints.push(Waypoint::Key);
        rng.shuffle(&mut waypoints);
    }
    waypoints.push(Waypoint::End);
    waypoints
}

/// Fold each key into the segment that follows it.
pub fn plan_legs(waypoints: &[Waypoint]) -> Vec<Leg> {
    let mut legs = Vec::with_capacity(waypoints.len());
    let mut key_pending = false;
    for (index, waypoint) in waypoints.iter().enumerate() {
        let stop = match waypoint {
            Waypoint::Key => {
                key_pending = true;
                continue;
            }
            Waypoint::Portal => Stop::Portal,
            Waypoint::End => Stop::End,
        };
        legs.push(Leg {
            index,
            stop,
            carries_key: std::mem::take(&mut key_pending),
        });
    }
    legs
}

/// Even share of the remaining length for the waypoint at `index`.
#[inline]
pub fn segment_budget(target: usize, carved_so_far: usize, index: usize, total: usize) -> usize {
    target.saturating_sub(carved_so_far) / (total - index)
}

/// Carve the solution path from `origin` through every waypoint.
pub fn carve_route(
    board: &mut Board,
    solution: &mut Vec<Coord>,
    rng: &mut MazeRng,
    origin: Coord,
    config: &MazeConfig,
) -> Route {
    let waypoints = plan_waypoints(config.num_portals, config.has_key, rng);
    let legs = plan_legs(&waypoints);
    let target = config.solution_target();
    let total = waypoints.len();

    let mut route = Route::default();
    let mut cursor = origin;
    let mut carved_so_far = 0;

    for (position, leg) in legs.iter().enumerate() {
        let floor = leg.floor();
        let budget = segment_budget(target, carved_so_far, leg.index, total).max(floor);
        // A segment after a portal already holds its exit cell.
        let first = if cursor == origin { solution.len() } else { solution.len() - 1 };
        let request = CarveRequest::solution(cursor, budget);
        let request = request.with_limits(request.max_length, request.min_length.max(floor));
        let path = Carver::new(board, solution, rng, origin).carve_solution(request, floor);
        carved_so_far += path.length;
        route.segments.push(Segment {
            stop: leg.stop,
            carries_key: leg.carries_key,
            start: cursor,
            end: path.end,
            length: path.length,
            budget: request.max_length,
            min_length: path.min_length,
        });

        let end_mark = match leg.stop {
            Stop::Portal => Mark::PortalSolution,
            Stop::End => Mark::End,
        };
        board.set(path.end, end_mark);

        if leg.carries_key {
            let board_view: &Board = board;
            let cells: &[Coord] = solution;
            let spot = place_key(board_view, &cells[first..], path.length, path.end)
                .or_else(|| place_key(board_view, cells, 0, path.end));
            match spot {
                Some(key) => {
                    board.set(key, Mark::Key);
                    route.keys.push(key);
                }
                None => log::warn!("solution path too short to hold a key"),
            }
        }

        match leg.stop {
            Stop::End => route.end = path.end,
            Stop::Portal => {
                let room = legs.get(position + 1).map_or(1, Leg::floor);
                match pick_portal_exit(board, rng, room) {
                    Some(exit) => {
                        board.set(exit, Mark::Portal);
                        route.portals.insert(path.end, exit);
                        route.portals.insert(exit, path.end);
                        solution.push(exit);
                        cursor = exit;
                    }
                    None => {
                        log::warn!("no room for a portal exit, continuing from {:?}", path.end);
                        board.set(path.end, Mark::Solution);
                        cursor = path.end;
                    }
                }
            }
        }
    }

    route
}

/// Uniform choice among wall node cells with room for a full lookahead
/// walk, or failing that, for the `room` cells the next segment needs.
fn pick_portal_exit(board: &Board, rng: &mut MazeRng, room: usize) -> Option<Coord> {
    let none = HashSet::new();
    let walls: Vec<Coord> = board.node_cells().filter(|&c| board.get(c) == Mark::Wall).collect();
    for depth in [SOLUTION_LOOKAHEAD, room] {
        let candidates: Vec<Coord> = walls
            .iter()
            .copied()
            .filter(|&c| has_onward_path(board, c, depth, &none, true))
            .collect();
        if let Some(exit) = rng.choose(&candidates) {
            return Some(exit);
        }
    }
    None
}

/// Roughly `length / 2` cells before `end`, falling back to the nearest
/// earlier plain solution cell.
fn place_key(board: &Board, cells: &[Coord], length: usize, end: Coord) -> Option<Coord> {
    let last = cells.len().checked_sub(1)?;
    let from = last.saturating_sub(length / 2);
    cells[..=from]
        .iter()
        .rev()
        .copied()
        .find(|&c| c != end && board.get(c) == Mark::Solution)
}
