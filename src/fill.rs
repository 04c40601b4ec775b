//! Connectivity fill: carve every room the solution and branches missed.
//!
//! The sweep visits node cells in row-major order and starts an aisle at
//! each one still walled in. Those aisles may open one link into carved
//! territory, so most of them join the existing maze on their own; any
//! region left sealed off is bridged afterwards by `connect_islands`.

use crate::board::Board;
use crate::carver::{CarveOutcome, CarveRequest, Carver};
use crate::config::MazeConfig;
use crate::rng::MazeRng;
use crate::types::{Coord, Mark};
use std::collections::{BTreeMap, VecDeque};

/// Sweep all node cells and carve from each wall one. Returns the number of
/// carves started. Each carve claims at least its own start cell, so the
/// sweep makes at most one call per node cell.
pub fn fill_remaining(
    board: &mut Board,
    solution: &mut Vec<Coord>,
    rng: &mut MazeRng,
    origin: Coord,
    config: &MazeConfig,
) -> usize {
    let max_length = config.solution_target();
    let nodes: Vec<Coord> = board.node_cells().collect();
    let mut carves = 0;

    for node in nodes {
        if board.get(node) != Mark::Wall {
            continue;
        }
        let request = CarveRequest::incidental(node, max_length)
            .avoiding_visited(false)
            .with_limits(max_length, 1);
        let outcome = Carver::new(board, solution, rng, origin).carve(request);
        if outcome == CarveOutcome::Failed {
            log::debug!("fill carve from {node:?} failed, opening the cell alone");
            board.set(node, Mark::Aisle);
        }
        carves += 1;
    }

    carves
}

/// Open links until every carved cell is reachable from `start`, walking
/// passages and portal jumps. Returns the number of links opened.
pub fn connect_islands(board: &mut Board, start: Coord, portals: &BTreeMap<Coord, Coord>) -> usize {
    let rows = board.rows();
    let columns = board.columns();
    let mut reached = vec![false; rows * columns];
    let mut queue = VecDeque::new();
    let mut bridges = 0;

    reached[start.0 * columns + start.1] = true;
    queue.push_back(start);

    loop {
        while let Some((row, col)) = queue.pop_front() {
            let mut next = Vec::with_capacity(5);
            if row > 0 {
                next.push((row - 1, col));
            }
            if row + 1 < rows {
                next.push((row + 1, col));
            }
            if col > 0 {
                next.push((row, col - 1));
            }
            if col + 1 < columns {
                next.push((row, col + 1));
            }
            if let Some(&exit) = portals.get(&(row, col)) {
                next.push(exit);
            }
            for cell in next {
                let idx = cell.0 * columns + cell.1;
                if !reached[idx] && board.get(cell).is_carved() {
                    reached[idx] = true;
                    queue.push_back(cell);
                }
            }
        }

        let bridge = board.node_cells().find_map(|node| {
            if !reached[node.0 * columns + node.1] {
                return None;
            }
            board
                .node_neighbors(node)
                .into_iter()
                .find(|&n| !reached[n.0 * columns + n.1])
                .map(|n| (node, n))
        });
        let Some((from, to)) = bridge else {
            break;
        };

        let link = Board::link_between(from, to);
        board.set(link, Mark::Aisle);
        if board.get(to) == Mark::Wall {
            board.set(to, Mark::Aisle);
        }
        reached[link.0 * columns + link.1] = true;
        reached[to.0 * columns + to.1] = true;
        queue.push_back(to);
        bridges += 1;
    }

    if bridges > 0 {
        log::debug!("bridged {bridges} isolated regions");
    }
    bridges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_nodes_carved(board: &Board) -> bool {
        board.node_cells().all(|c| board.get(c).is_carved())
    }

    #[test]
    fn test_fill_carves_every_node() {
        let config = MazeConfig::new(11, 13, 0.5, 0, false).unwrap();
        let mut board = Board::new(config.rows, config.columns);
        let mut solution = Vec::new();
        let mut rng = MazeRng::from_seed(2);
        let carves = fill_remaining(&mut board, &mut solution, &mut rng, (0, 1), &config);
        assert!(carves >= 1);
        assert!(all_nodes_carved(&board));
        assert!(solution.is_empty());
    }

    #[test]
    fn test_fill_skips_carved_nodes() {
        let config = MazeConfig::new(5, 5, 0.5, 0, false).unwrap();
        let mut board = Board::new(5, 5);
        for node in [(1, 1), (1, 3), (3, 1), (3, 3)] {
            board.set(node, Mark::Solution);
        }
        let before = board.clone();
        let mut solution = Vec::new();
        let mut rng = MazeRng::from_seed(2);
        assert_eq!(fill_remaining(&mut board, &mut solution, &mut rng, (0, 1), &config), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_connect_islands_bridges_sealed_room() {
        // Start at (0, 1) leading into (1, 1); (1, 3) carved but sealed off.
        let mut board = Board::new(3, 5);
        board.set((0, 1), Mark::Start);
        board.set((1, 1), Mark::Solution);
        board.set((1, 3), Mark::Aisle);
        let bridges = connect_islands(&mut board, (0, 1), &BTreeMap::new());
        assert_eq!(bridges, 1);
        assert_eq!(board.get((1, 2)), Mark::Aisle);
    }

    #[test]
    fn test_connect_islands_follows_portals() {
        let mut board = Board::new(3, 5);
        board.set((0, 1), Mark::Start);
        board.set((1, 1), Mark::PortalSolution);
        board.set((1, 3), Mark::Portal);
        let mut portals = BTreeMap::new();
        portals.insert((1, 1), (1, 3));
        portals.insert((1, 3), (1, 1));
        assert_eq!(connect_islands(&mut board, (0, 1), &portals), 0);
        assert_eq!(board.get((1, 2)), Mark::Wall);
    }

    #[test]
    fn test_connected_board_needs_no_bridges() {
        let mut board = Board::new(3, 5);
        for cell in [(0, 1), (1, 1), (1, 2), (1, 3)] {
            board.set(cell, Mark::Aisle);
        }
        assert_eq!(connect_islands(&mut board, (0, 1), &BTreeMap::new()), 0);
    }
}
