#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Wumpus Hunt kernel.
//!
//! This crate defines the data surface that connects the generation,
//! pathfinding, and replay systems to the authoritative grid and to the
//! adapters that drive them. Systems exchange plain values (coordinates,
//! cell kinds, paths, step results) and report failures through the error
//! enums defined here. Nothing in this crate performs I/O or holds state
//! between calls.

use std::{error::Error, fmt};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Wumpus Hunt.";

/// Score deduction applied when the agent springs a trap.
pub const TRAP_PENALTY: u32 = 100;

/// Location of a single grid cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }

    /// Computes the Chebyshev distance between two cell coordinates.
    ///
    /// Used by the generator to keep hazards out of the safety zone around
    /// the agent's spawn cell.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.row
            .abs_diff(other.row)
            .max(self.column.abs_diff(other.column))
    }
}

/// Lethal inhabitants a grid cell may hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hazard {
    /// The wumpus blocks pathing outright and kills on contact.
    Wumpus,
    /// A pit is open to traversal but kills the agent on arrival.
    Pit,
}

/// Contents of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Nothing occupies the cell.
    Empty,
    /// The agent currently stands here. Exactly one per grid.
    Agent,
    /// The gold the agent hunts. Exactly one per grid.
    Goal,
    /// A lethal hazard occupies the cell.
    Hazard(Hazard),
    /// Impassable terrain.
    Obstacle,
    /// Springs on entry, costing the agent points.
    Trap,
    /// One endpoint of a teleport pair. An unpaired teleport is inert.
    Teleport,
    /// A cell the agent already vacated.
    Trail,
}

impl CellKind {
    /// Reports whether a pathfinder may route through the cell.
    ///
    /// Only obstacles and the wumpus block traversal. Pits remain passable
    /// even though arrival is lethal; the distinction between hard-blocking
    /// and soft-hazard cells is load-bearing for both pathfinders.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Obstacle | Self::Hazard(Hazard::Wumpus))
    }
}

/// Ordered sequence of cells the agent will enter, ending at the goal.
///
/// The agent's starting cell is not part of the path, so each element
/// corresponds to exactly one replay step. Consecutive elements are
/// 4-adjacent except immediately after a paired teleport cell, where the
/// following element continues from the paired exit; the jump itself is
/// synthesized by the replay driver rather than stored. An empty path means
/// no route exists; callers must check `start == goal` before searching.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path {
    cells: Vec<CellCoord>,
}

impl Path {
    /// Creates a path from the provided cell sequence.
    #[must_use]
    pub fn from_cells(cells: Vec<CellCoord>) -> Self {
        Self { cells }
    }

    /// Creates the empty path, denoting that no route was found.
    #[must_use]
    pub const fn empty() -> Self {
        Self { cells: Vec::new() }
    }

    /// Reports whether the path contains no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells in the path, which equals the number of replay steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Cells composing the path in traversal order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Final cell of the path, if any.
    #[must_use]
    pub fn last(&self) -> Option<CellCoord> {
        self.cells.last().copied()
    }

    /// Consumes the path, yielding the underlying cells.
    #[must_use]
    pub fn into_vec(self) -> Vec<CellCoord> {
        self.cells
    }
}

/// Requested entity counts driving procedural grid generation.
///
/// Counts are upper bounds: a saturated grid yields fewer placements than
/// requested rather than failing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Number of wumpuses to place.
    pub wumpus_count: u32,
    /// Number of pits to place.
    pub pit_count: u32,
    /// Number of obstacles to place.
    pub obstacle_count: u32,
    /// Number of traps to place.
    pub trap_count: u32,
    /// Number of teleport cells to place. Odd counts leave one cell unpaired.
    pub teleport_count: u32,
}

impl DifficultyProfile {
    /// One wumpus, five pits, a single obstacle.
    pub const EASY: Self = Self::new(1, 5, 1, 0, 0);
    /// Two wumpuses, eight pits, three obstacles, one trap.
    pub const MEDIUM: Self = Self::new(2, 8, 3, 1, 0);
    /// Three wumpuses, ten pits, five obstacles, two traps, one teleport.
    pub const HARD: Self = Self::new(3, 10, 5, 2, 1);
    /// Four wumpuses, twelve pits, seven obstacles, three traps, one pair.
    pub const EXPERT: Self = Self::new(4, 12, 7, 3, 2);

    /// Creates a profile with explicit counts for every category.
    #[must_use]
    pub const fn new(
        wumpus_count: u32,
        pit_count: u32,
        obstacle_count: u32,
        trap_count: u32,
        teleport_count: u32,
    ) -> Self {
        Self {
            wumpus_count,
            pit_count,
            obstacle_count,
            trap_count,
            teleport_count,
        }
    }
}

/// Outcome of a single replay step, reported to the caller for rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepResult {
    /// The agent advanced onto an uneventful cell.
    Moved(CellCoord),
    /// The agent reached the goal and collected the gold.
    CollectedGoal,
    /// The agent entered a lethal cell.
    Died(Hazard),
    /// The agent sprang a trap and incurred the given score penalty.
    Trapped(u32),
    /// The agent entered a paired teleport cell; the jump to `to` follows as
    /// a separately observable step.
    Teleported {
        /// Teleport cell the agent stepped onto.
        from: CellCoord,
        /// Paired destination the agent will emerge from.
        to: CellCoord,
    },
}

/// Lifecycle of a replay session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReplayStatus {
    /// The driver holds a path but has not stepped yet.
    Idle,
    /// The agent is underway.
    Stepping,
    /// Terminal: the agent collected the gold.
    Won,
    /// Terminal: the agent died.
    Dead,
}

impl ReplayStatus {
    /// Reports whether the replay reached a terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Dead)
    }
}

/// Failures raised by bounds-checked grid access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridError {
    /// The coordinate lies outside the grid. Programmer error; fail fast.
    OutOfBounds {
        /// Offending coordinate.
        cell: CellCoord,
        /// Side length of the grid that rejected it.
        size: u32,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { cell, size } => write!(
                formatter,
                "cell ({}, {}) lies outside the {size}x{size} grid",
                cell.row(),
                cell.column()
            ),
        }
    }
}

impl Error for GridError {}

/// Failures raised by the replay driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayError {
    /// `step` was called in a state that cannot advance: a terminal replay
    /// or an exhausted path.
    InvalidState(ReplayStatus),
    /// A path element fell outside the grid.
    Grid(GridError),
}

impl fmt::Display for ReplayError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState(status) => {
                write!(formatter, "replay cannot step from the {status:?} state")
            }
            Self::Grid(error) => write!(formatter, "replay left the grid: {error}"),
        }
    }
}

impl Error for ReplayError {}

impl From<GridError> for ReplayError {
    fn from(error: GridError) -> Self {
        Self::Grid(error)
    }
}
