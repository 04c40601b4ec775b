//! Core data types shared by every generation stage.
//!
//! Coordinates are `(row, col)` pairs. Rows and columns are both odd, so the
//! grid doubles up: cells with two odd coordinates are rooms ("node cells"),
//! cells with exactly one odd coordinate are the walls/passages between two
//! rooms ("link cells"), and cells with two even coordinates are never carved.

use serde::{Deserialize, Serialize};

/// A `(row, col)` position on the board.
pub type Coord = (usize, usize);

/// State of a single cell.
///
/// `Wall` is the only uncarved mark; everything else is carved with a role.
/// The discriminant is the rendering weight handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Mark {
    Aisle = 0,
    Solution = 1,
    Key = 2,
    Portal = 3,
    PortalSolution = 4,
    Start = 5,
    End = 6,
    Wall = 7,
}

impl Mark {
    /// Every mark, ordered by weight.
    pub const ALL: [Mark; 8] = [
        Mark::Aisle,
        Mark::Solution,
        Mark::Key,
        Mark::Portal,
        Mark::PortalSolution,
        Mark::Start,
        Mark::End,
        Mark::Wall,
    ];

    #[inline(always)]
    pub fn weight(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Mark::Aisle => "aisle",
            Mark::Solution => "solution",
            Mark::Key => "key",
            Mark::Portal => "portal",
            Mark::PortalSolution => "portal_solution",
            Mark::Start => "start",
            Mark::End => "end",
            Mark::Wall => "wall",
        }
    }

    #[inline(always)]
    pub fn is_carved(self) -> bool {
        self != Mark::Wall
    }

    /// Either side of a teleport pair.
    #[inline(always)]
    pub fn is_portal(self) -> bool {
        matches!(self, Mark::Portal | Mark::PortalSolution)
    }
}

/// One row of the mark table as exposed to a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkEntry {
    pub name: &'static str,
    pub weight: u8,
}

/// The symbol → weight lookup used by rendering layers to pick colors.
pub fn mark_table() -> Vec<MarkEntry> {
    Mark::ALL
        .iter()
        .map(|&mark| MarkEntry {
            name: mark.name(),
            weight: mark.weight(),
        })
        .collect()
}
