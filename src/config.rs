//! Maze parameters: named presets and validated explicit configurations.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Rooms reserved per portal pair: the entry, the exit, and free space
/// around the exit for the next segment to leave it.
pub const ROOMS_PER_PORTAL: usize = 8;

/// Named difficulty presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Easy,
    Median,
    Hard,
}

impl Preset {
    pub fn config(self) -> MazeConfig {
        match self {
            Preset::Easy => MazeConfig {
                rows: 31,
                columns: 41,
                complexity: 0.6,
                num_portals: 0,
                has_key: true,
            },
            Preset::Median => MazeConfig {
                rows: 41,
                columns: 61,
                complexity: 0.65,
                num_portals: 1,
                has_key: false,
            },
            Preset::Hard => MazeConfig {
                rows: 61,
                columns: 81,
                complexity: 0.8,
                num_portals: 1,
                has_key: true,
            },
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Preset::Easy),
            "median" => Ok(Preset::Median),
            "hard" => Ok(Preset::Hard),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }
}

/// Parameters of a single generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MazeConfig {
    /// Board height, odd.
    pub rows: usize,
    /// Board width, odd.
    pub columns: usize,
    /// Scales solution length, branch count and branch length. In (0, 1).
    pub complexity: f64,
    /// Teleport pairs the solution must pass through.
    pub num_portals: usize,
    /// Whether a key is dropped on the solution path.
    pub has_key: bool,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Preset::Easy.config()
    }
}

impl From<Preset> for MazeConfig {
    fn from(preset: Preset) -> Self {
        preset.config()
    }
}

impl MazeConfig {
    /// Build and validate an explicit configuration.
    pub fn new(
        rows: usize,
        columns: usize,
        complexity: f64,
        num_portals: usize,
        has_key: bool,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            rows,
            columns,
            complexity,
            num_portals,
            has_key,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.rows % 2 == 0 {
            return Err(ConfigError::InvalidRows(self.rows));
        }
        if self.columns == 0 || self.columns % 2 == 0 {
            return Err(ConfigError::InvalidColumns(self.columns));
        }
        if self.rows < 3 || self.columns < 3 {
            return Err(ConfigError::TooSmall {
                rows: self.rows,
                columns: self.columns,
            });
        }
        // NaN fails both comparisons
        if !(self.complexity > 0.0 && self.complexity < 1.0) {
            return Err(ConfigError::InvalidComplexity(self.complexity));
        }
        let rooms = self.rooms();
        let needed = self.min_rooms();
        if rooms < needed {
            return Err(ConfigError::TooCrowded {
                rows: self.rows,
                columns: self.columns,
                rooms,
                needed,
            });
        }
        Ok(())
    }

    /// Node cells on the board.
    pub fn rooms(&self) -> usize {
        (self.rows / 2) * (self.columns / 2)
    }

    /// Rooms the solution route needs: the end, a plain cell for the key,
    /// and `ROOMS_PER_PORTAL` for each portal pair.
    pub fn min_rooms(&self) -> usize {
        1 + usize::from(self.has_key) + ROOMS_PER_PORTAL * self.num_portals
    }

    /// Total number of solution node cells to aim for across all segments.
    pub fn solution_target(&self) -> usize {
        (self.complexity * (self.rows * self.columns) as f64 / 8.0) as usize
    }

    /// Default length cap for branches.
    pub fn branch_length(&self) -> usize {
        (self.solution_target() as f64 * self.complexity / 3.0) as usize
    }
}
