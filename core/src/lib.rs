#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Signal Control engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative grid, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that systems react to deterministically.

use serde::{Deserialize, Serialize};

/// Direction a cell forwards an incoming signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Forwards toward decreasing row indices.
    Up,
    /// Forwards toward increasing column indices.
    Right,
    /// Forwards toward increasing row indices.
    Down,
    /// Forwards toward decreasing column indices.
    Left,
}

impl Orientation {
    /// All orientations in clockwise order starting from [`Orientation::Up`].
    pub const ALL: [Orientation; 4] = [
        Orientation::Up,
        Orientation::Right,
        Orientation::Down,
        Orientation::Left,
    ];

    /// Orientation reached after a single clockwise quarter turn.
    #[must_use]
    pub const fn rotated_clockwise(self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
        }
    }

    /// Unit step applied to a column/row pair when the signal leaves a cell.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }
}

/// Static role of a grid cell, fixed when the level is loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Unused position that still forwards the signal.
    Empty,
    /// Cell where the signal is injected.
    Start,
    /// Cell the signal must reach.
    Finish,
    /// Plain routing cell.
    Normal,
    /// Cell that absorbs the signal unless activated beforehand.
    Blocking,
    /// Cell that must be visited before reaching the finish.
    Checkpoint,
}

impl CellKind {
    /// Reports whether gameplay policy allows rotating cells of this kind.
    #[must_use]
    pub const fn is_rotatable(self) -> bool {
        !matches!(self, Self::Start | Self::Finish)
    }

    /// Initial activity flag assigned when a cell takes on this kind.
    ///
    /// Blocking cells wait to be switched on and checkpoints wait for the
    /// signal to pass through them.
    #[must_use]
    pub const fn starts_active(self) -> bool {
        !matches!(self, Self::Blocking | Self::Checkpoint)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Neighbouring coordinate one step along `orientation`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// Upper bounds are the grid's concern.
    #[must_use]
    pub fn step(self, orientation: Orientation) -> Option<CellCoord> {
        let (dx, dy) = orientation.offset();
        let column = u32::try_from(i64::from(self.column) + dx).ok()?;
        let row = u32::try_from(i64::from(self.row) + dy).ok()?;
        Some(CellCoord::new(column, row))
    }
}

/// Largest number of cells a grid may hold.
pub const MAX_GRID_CELLS: usize = 1 << 20;

/// Number of columns and rows spanned by a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    columns: u32,
    rows: u32,
}

impl GridDimensions {
    /// Creates a new dimension descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the dimensions enclose at least one cell.
    #[must_use]
    pub const fn has_area(&self) -> bool {
        self.columns > 0 && self.rows > 0
    }

    /// Reports whether the coordinate lies within the dimensions.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Total number of cells, or `None` when it does not fit in `usize`.
    #[must_use]
    pub fn cell_count(&self) -> Option<usize> {
        let columns = usize::try_from(self.columns).ok()?;
        let rows = usize::try_from(self.rows).ok()?;
        columns.checked_mul(rows)
    }

    /// Reports whether the dimensions stay within [`MAX_GRID_CELLS`].
    #[must_use]
    pub fn within_cell_limit(&self) -> bool {
        self.cell_count().is_some_and(|count| count <= MAX_GRID_CELLS)
    }
}

/// Terminal state reached by a single signal trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraceOutcome {
    /// The signal reached the finish with every checkpoint active.
    Completed,
    /// The grid lacks a start or a finish cell, so no trace was attempted.
    MissingEndpoints,
    /// The signal stepped outside the grid after leaving `from`.
    ExitedGrid {
        /// Last cell visited before the signal left the grid.
        from: CellCoord,
    },
    /// An inactive blocking cell absorbed the signal.
    Absorbed {
        /// Blocking cell that stopped the trace.
        at: CellCoord,
    },
    /// The finish was reached but some checkpoints were never visited.
    CheckpointsUnvisited {
        /// Number of checkpoints left inactive.
        missing: usize,
    },
    /// The signal entered a cell it had already visited and would cycle forever.
    Looped {
        /// First cell visited twice.
        at: CellCoord,
    },
}

impl TraceOutcome {
    /// Reports whether the outcome counts as a solved level.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Reason a cell-addressed command could not be carried out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellRejection {
    /// The addressed cell lies outside the grid.
    OutOfBounds,
}

/// Commands that express all permissible grid mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Assigns a new kind to the addressed cell.
    SetCellKind {
        /// Cell receiving the new kind.
        cell: CellCoord,
        /// Kind to assign.
        kind: CellKind,
    },
    /// Overwrites the orientation of the addressed cell.
    SetOrientation {
        /// Cell receiving the new orientation.
        cell: CellCoord,
        /// Orientation to assign.
        orientation: Orientation,
    },
    /// Rotates the addressed cell a quarter turn clockwise.
    RotateCell {
        /// Cell to rotate.
        cell: CellCoord,
    },
    /// Flips the activity flag of a blocking cell.
    ToggleCell {
        /// Cell to toggle.
        cell: CellCoord,
    },
    /// Runs a single signal trace from start to finish.
    Simulate,
    /// Clears runtime flags so another attempt can be made.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a cell took on a new kind.
    CellKindChanged {
        /// Cell that changed.
        cell: CellCoord,
        /// Kind now assigned to the cell.
        kind: CellKind,
    },
    /// Confirms that a cell now faces a new orientation.
    CellRotated {
        /// Cell that changed.
        cell: CellCoord,
        /// Orientation now assigned to the cell.
        orientation: Orientation,
    },
    /// Confirms that a blocking cell flipped its activity flag.
    CellToggled {
        /// Cell that changed.
        cell: CellCoord,
        /// Activity flag after the toggle.
        active: bool,
    },
    /// Reports the result of a signal trace.
    SignalTraced {
        /// Terminal state of the trace.
        outcome: TraceOutcome,
        /// Number of cells the signal passed through.
        visited: usize,
    },
    /// Confirms that runtime flags were cleared.
    GridReset,
    /// Reports that a cell-addressed command was ignored.
    CellCommandRejected {
        /// Cell named by the rejected command.
        cell: CellCoord,
        /// Specific reason the command failed.
        reason: CellRejection,
    },
}

/// Placement of a single non-default cell within a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPlacement {
    /// Column of the placed cell.
    pub column: u32,
    /// Row of the placed cell.
    pub row: u32,
    /// Kind assigned to the cell.
    pub kind: CellKind,
    /// Orientation assigned to the cell.
    pub orientation: Orientation,
}

impl CellPlacement {
    /// Creates a new placement descriptor.
    #[must_use]
    pub const fn new(column: u32, row: u32, kind: CellKind, orientation: Orientation) -> Self {
        Self {
            column,
            row,
            kind,
            orientation,
        }
    }

    /// Coordinate addressed by the placement.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        CellCoord::new(self.column, self.row)
    }
}

/// Hint shown when a level does not provide its own.
pub const DEFAULT_HINT: &str = "Rotate the cells to build a path from start to finish.";

/// Complete description of a playable level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    /// Number of columns in the level grid.
    pub columns: u32,
    /// Number of rows in the level grid.
    pub rows: u32,
    /// Number of rotations the player may spend.
    pub action_limit: u32,
    /// Cells that differ from the default Normal/Right cell.
    pub cells: Vec<CellPlacement>,
    /// Introductory text shown on tutorial levels.
    #[serde(default)]
    pub tutorial: Option<String>,
    /// Hint text offered on request.
    #[serde(default = "default_hint")]
    pub hint: String,
}

impl LevelDescriptor {
    /// Dimensions of the level grid.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        GridDimensions::new(self.columns, self.rows)
    }

    /// Reports whether the level is flagged as a tutorial.
    #[must_use]
    pub const fn is_tutorial(&self) -> bool {
        self.tutorial.is_some()
    }
}

fn default_hint() -> String {
    DEFAULT_HINT.to_owned()
}
