//! Maze generation: solution route, branches, fill, in that order.

use crate::board::Board;
use crate::branches::grow_branches;
use crate::config::{MazeConfig, Preset};
use crate::error::ConfigError;
use crate::fill::{connect_islands, fill_remaining};
use crate::planner::{carve_route, Segment};
use crate::rng::MazeRng;
use crate::types::{mark_table, Coord, MarkEntry};
use serde::Serialize;
use std::collections::BTreeMap;

/// Counters from one generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MazeStats {
    pub branches: usize,
    pub fill_carves: usize,
    pub bridges: usize,
}

/// A finished maze. Immutable once generated.
#[derive(Debug, Clone)]
pub struct Maze {
    config: MazeConfig,
    board: Board,
    start: Coord,
    end: Coord,
    solution: Vec<Coord>,
    portals: BTreeMap<Coord, Coord>,
    keys: Vec<Coord>,
    segments: Vec<Segment>,
    stats: MazeStats,
}

/// Serializable view of a maze for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct MazeSnapshot {
    pub rows: usize,
    pub columns: usize,
    /// Mark weights, row-major.
    pub cells: Vec<u8>,
    pub marks: Vec<MarkEntry>,
    pub start: Coord,
    pub end: Coord,
    pub solution: Vec<Coord>,
    /// Each pair listed once, lower coordinate first.
    pub portals: Vec<(Coord, Coord)>,
    pub keys: Vec<Coord>,
    pub stats: MazeStats,
}

impl Maze {
    /// Generate from OS entropy.
    pub fn new(config: MazeConfig) -> Result<Self, ConfigError> {
        Self::generate(config, &mut MazeRng::new())
    }

    /// Generate reproducibly from a seed.
    pub fn with_seed(config: MazeConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::generate(config, &mut MazeRng::from_seed(seed))
    }

    /// Presets are always valid, so this cannot fail.
    pub fn from_preset(preset: Preset, rng: &mut MazeRng) -> Self {
        Self::build(preset.config(), rng)
    }

    /// Validate `config` and run every generation stage with `rng`.
    pub fn generate(config: MazeConfig, rng: &mut MazeRng) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, rng))
    }

    fn build(config: MazeConfig, rng: &mut MazeRng) -> Self {
        let mut board = Board::new(config.rows, config.columns);
        let start = pick_start(config.rows, config.columns, rng);
        let mut solution = Vec::new();

        let route = carve_route(&mut board, &mut solution, rng, start, &config);
        let branches = grow_branches(&mut board, &mut solution, rng, start, &config);
        let fill_carves = fill_remaining(&mut board, &mut solution, rng, start, &config);
        let bridges = connect_islands(&mut board, start, &route.portals);

        let stats = MazeStats {
            branches,
            fill_carves,
            bridges,
        };
        log::info!(
            "generated {}x{} maze: solution {} cells, {} portal pairs, {} keys, {:?}",
            config.rows,
            config.columns,
            solution.len(),
            route.portals.len() / 2,
            route.keys.len(),
            stats
        );

        Self {
            config,
            board,
            start,
            end: route.end,
            solution,
            portals: route.portals,
            keys: route.keys,
            segments: route.segments,
            stats,
        }
    }

    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn end(&self) -> Coord {
        self.end
    }

    /// Solution node cells in walking order, portal exits included.
    pub fn solution(&self) -> &[Coord] {
        &self.solution
    }

    /// Both directions of every portal pair.
    pub fn portals(&self) -> &BTreeMap<Coord, Coord> {
        &self.portals
    }

    pub fn keys(&self) -> &[Coord] {
        &self.keys
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn stats(&self) -> MazeStats {
        self.stats
    }

    pub fn snapshot(&self) -> MazeSnapshot {
        MazeSnapshot {
            rows: self.board.rows(),
            columns: self.board.columns(),
            cells: self.board.weights(),
            marks: mark_table(),
            start: self.start,
            end: self.end,
            solution: self.solution.clone(),
            portals: self
                .portals
                .iter()
                .filter(|(a, b)| a < b)
                .map(|(&a, &b)| (a, b))
                .collect(),
            keys: self.keys.clone(),
            stats: self.stats,
        }
    }
}

/// A random border cell next to a node cell: pick a side, then an odd index along it.
pub fn pick_start(rows: usize, columns: usize, rng: &mut MazeRng) -> Coord {
    let col = rng.gen_range((columns - 1) / 2) * 2 + 1;
    let row = rng.gen_range((rows - 1) / 2) * 2 + 1;
    match rng.gen_range(4) {
        0 => (0, col),
        1 => (rows - 1, col),
        2 => (row, 0),
        _ => (row, columns - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branches::branch_target;
    use crate::planner::KEY_SEGMENT_FLOOR;
    use crate::types::Mark;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn assert_solution_walk(maze: &Maze) {
        let board = maze.board();
        let solution = maze.solution();
        assert_eq!(solution.first(), Some(&board.step_inward(maze.start())));
        assert_eq!(solution.last(), Some(&maze.end()));
        for pair in solution.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if maze.portals().get(&a) == Some(&b) {
                continue;
            }
            let dist = a.0.abs_diff(b.0) + a.1.abs_diff(b.1);
            assert_eq!(dist, 2, "{a:?} -> {b:?} is not a single step");
            assert!(board.get(Board::link_between(a, b)).is_carved());
        }
        let unique: HashSet<&Coord> = solution.iter().collect();
        assert_eq!(unique.len(), solution.len());
    }

    fn assert_maze_invariants(maze: &Maze) {
        let config = maze.config();
        let board = maze.board();
        assert_eq!((board.rows(), board.columns()), (config.rows, config.columns));
        assert!(board.rows() % 2 == 1 && board.columns() % 2 == 1);

        assert!(board.node_cells().all(|c| board.get(c).is_carved()));
        assert_eq!(board.count(Mark::Start), 1);
        assert_eq!(board.count(Mark::End), 1);
        assert_eq!(board.get(maze.start()), Mark::Start);
        assert_eq!(board.get(maze.end()), Mark::End);
        assert!(board.is_border(maze.start()));

        assert_eq!(maze.portals().len(), 2 * config.num_portals);
        for (&a, &b) in maze.portals() {
            assert_eq!(maze.portals().get(&b), Some(&a));
            assert!(board.get(a).is_portal() && board.get(b).is_portal());
        }

        assert_eq!(maze.keys().len(), usize::from(config.has_key));
        for key in maze.keys() {
            assert!(maze.solution().contains(key));
            assert_eq!(board.get(*key), Mark::Key);
        }

        for segment in maze.segments() {
            assert!(segment.length >= segment.min_length);
            if segment.carries_key {
                assert!(segment.length >= KEY_SEGMENT_FLOOR);
            }
        }

        assert!(maze.stats().branches <= branch_target(config.complexity, maze.solution().len()));
        assert_solution_walk(maze);
    }

    #[test]
    fn test_small_maze_scenario() {
        let config = MazeConfig::new(5, 5, 0.5, 0, false).unwrap();
        for seed in 0..25 {
            let maze = Maze::with_seed(config.clone(), seed).unwrap();
            assert_ne!(maze.start(), maze.end());
            assert!(maze.board().is_border(maze.start()));
            assert!(!maze.solution().is_empty());
            assert_maze_invariants(&maze);
        }
    }

    #[test]
    fn test_two_portal_pairs() {
        let config = MazeConfig::new(31, 41, 0.6, 2, false).unwrap();
        let maze = Maze::with_seed(config, 12).unwrap();
        assert_eq!(maze.portals().len(), 4);
        let marked = maze.board().cells().iter().filter(|m| m.is_portal()).count();
        assert_eq!(marked, 4);
        assert_eq!(maze.snapshot().portals.len(), 2);
        assert_maze_invariants(&maze);
    }

    #[test]
    fn test_small_boards_keep_key_and_portals() {
        for rows in [7, 9, 11] {
            for columns in [7, 9, 11, 15] {
                for complexity in [0.5, 0.9] {
                    for num_portals in 0..=3 {
                        let config = MazeConfig {
                            rows,
                            columns,
                            complexity,
                            num_portals,
                            has_key: true,
                        };
                        if let Err(err) = config.validate() {
                            assert!(matches!(err, ConfigError::TooCrowded { .. }));
                            continue;
                        }
                        for seed in 0..20 {
                            let maze = Maze::with_seed(config.clone(), seed).unwrap();
                            assert_eq!(maze.keys().len(), 1, "{config:?} seed {seed}");
                            assert_eq!(maze.portals().len(), 2 * num_portals, "{config:?} seed {seed}");
                            assert_maze_invariants(&maze);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_crowded_board_produces_no_maze() {
        let config = MazeConfig {
            rows: 7,
            columns: 7,
            complexity: 0.5,
            num_portals: 2,
            has_key: true,
        };
        assert!(matches!(Maze::with_seed(config, 1), Err(ConfigError::TooCrowded { .. })));
    }

    #[test]
    fn test_even_rows_produce_no_maze() {
        let config = MazeConfig {
            rows: 4,
            columns: 5,
            complexity: 0.5,
            num_portals: 0,
            has_key: false,
        };
        assert_eq!(Maze::with_seed(config, 1).unwrap_err(), ConfigError::InvalidRows(4));
    }

    #[test]
    fn test_complexity_out_of_range() {
        let config = MazeConfig {
            complexity: 1.2,
            ..MazeConfig::default()
        };
        assert!(matches!(Maze::with_seed(config, 1), Err(ConfigError::InvalidComplexity(_))));
    }

    #[test]
    fn test_presets_generate() {
        for preset in [Preset::Easy, Preset::Median, Preset::Hard] {
            let maze = Maze::from_preset(preset, &mut MazeRng::from_seed(3));
            assert_maze_invariants(&maze);
        }
    }

    #[test]
    fn test_same_seed_same_board() {
        let config = Preset::Hard.config();
        let a = Maze::with_seed(config.clone(), 99).unwrap();
        let b = Maze::with_seed(config, 99).unwrap();
        assert_eq!(a.board(), b.board());
        assert_eq!(a.solution(), b.solution());
        assert_eq!(a.portals(), b.portals());
        assert_eq!(a.keys(), b.keys());
    }

    #[test]
    fn test_every_cell_reachable() {
        let maze = Maze::with_seed(Preset::Median.config(), 4).unwrap();
        let mut board = maze.board().clone();
        assert_eq!(connect_islands(&mut board, maze.start(), maze.portals()), 0);
    }

    #[test]
    fn test_pick_start_on_border() {
        let mut rng = MazeRng::from_seed(6);
        for _ in 0..200 {
            let (row, col) = pick_start(7, 9, &mut rng);
            let board = Board::new(7, 9);
            assert!(board.is_border((row, col)));
            assert!(board.is_node(board.step_inward((row, col))));
        }
    }

    #[test]
    fn test_snapshot_serializes() {
        let maze = Maze::with_seed(Preset::Easy.config(), 10).unwrap();
        let snapshot = maze.snapshot();
        assert_eq!(snapshot.cells.len(), 31 * 41);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["rows"], 31);
        assert_eq!(json["marks"][7]["name"], "wall");
        assert_eq!(json["keys"].as_array().map(|k| k.len()), Some(1));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn generated_mazes_hold_invariants(
            half_rows in 1usize..12,
            half_columns in 2usize..12,
            complexity in 0.05f64..0.95,
            num_portals in 0usize..3,
            has_key in any::<bool>(),
            seed in any::<u64>(),
        ) {
            let config = MazeConfig {
                rows: half_rows * 2 + 1,
                columns: half_columns * 2 + 1,
                complexity,
                num_portals,
                has_key,
            };
            prop_assume!(config.validate().is_ok());
            let maze = Maze::with_seed(config, seed).expect("validated config");
            assert_maze_invariants(&maze);
            prop_assert_eq!(maze.portals().len(), 2 * num_portals);
            prop_assert_eq!(maze.keys().len(), usize::from(has_key));
            let mut check = maze.board().clone();
            prop_assert_eq!(connect_islands(&mut check, maze.start(), maze.portals()), 0);
        }
    }
}
