use std::collections::BTreeSet;

use glam::Vec2;
use log::{debug, warn};
use signal_control_core::{
    CellCoord, CellKind, GridDimensions, LevelDescriptor, Orientation, TraceOutcome,
};
use thiserror::Error;

use crate::Cell;

/// Errors raised while constructing a grid.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum GridError {
    /// Grids must contain at least one cell.
    #[error("grid must span at least one cell (received {columns}x{rows})")]
    EmptyDimensions {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// The grid would hold more than `MAX_GRID_CELLS` cells.
    #[error("grid of {columns}x{rows} exceeds the cell limit")]
    TooLarge {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// Cell length must be positive and finite to map coordinates onto cells.
    #[error("cell length must be positive and finite (received {cell_length})")]
    InvalidCellLength {
        /// Provided cell length that failed validation.
        cell_length: f32,
    },
}

/// Result of a single signal trace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceReport {
    outcome: TraceOutcome,
    path: Vec<CellCoord>,
}

impl TraceReport {
    /// Terminal state reached by the trace.
    #[must_use]
    pub const fn outcome(&self) -> TraceOutcome {
        self.outcome
    }

    /// Cells the signal passed through, in visiting order.
    #[must_use]
    pub fn path(&self) -> &[CellCoord] {
        &self.path
    }

    /// Reports whether the trace solved the level.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

/// Dense rectangular collection of cells plus the signal propagation algorithm.
///
/// Start, finish and checkpoints are tracked as indices into the cell array so
/// that no reference ever aliases the storage the grid owns.
#[derive(Clone, Debug)]
pub struct Grid {
    dimensions: GridDimensions,
    origin: Vec2,
    cell_length: f32,
    cells: Vec<Cell>,
    start: Option<usize>,
    finish: Option<usize>,
    checkpoints: BTreeSet<usize>,
}

impl Grid {
    /// Creates a grid of default Normal cells facing right.
    ///
    /// `origin` and `cell_length` only matter for [`Grid::cell_at_coordinate`].
    pub fn new(
        dimensions: GridDimensions,
        origin: Vec2,
        cell_length: f32,
    ) -> Result<Self, GridError> {
        if !dimensions.has_area() {
            return Err(GridError::EmptyDimensions {
                columns: dimensions.columns(),
                rows: dimensions.rows(),
            });
        }
        let cell_count = match dimensions.cell_count() {
            Some(count) if dimensions.within_cell_limit() => count,
            _ => {
                return Err(GridError::TooLarge {
                    columns: dimensions.columns(),
                    rows: dimensions.rows(),
                })
            }
        };
        if !cell_length.is_finite() || cell_length <= 0.0 {
            return Err(GridError::InvalidCellLength { cell_length });
        }

        let mut cells = Vec::with_capacity(cell_count);
        for row in 0..dimensions.rows() {
            for column in 0..dimensions.columns() {
                cells.push(Cell::new(CellCoord::new(column, row)));
            }
        }

        Ok(Self {
            dimensions,
            origin,
            cell_length,
            cells,
            start: None,
            finish: None,
            checkpoints: BTreeSet::new(),
        })
    }

    /// Builds a grid and applies every placement listed by the level.
    ///
    /// Placements outside the level dimensions are skipped.
    pub fn from_level(
        level: &LevelDescriptor,
        origin: Vec2,
        cell_length: f32,
    ) -> Result<Self, GridError> {
        let mut grid = Self::new(level.dimensions(), origin, cell_length)?;
        for placement in &level.cells {
            let cell = placement.cell();
            if !grid.set_cell_kind(cell, placement.kind) {
                warn!(
                    "skipping {:?} placement at ({}, {}) outside {}x{} grid",
                    placement.kind,
                    cell.column(),
                    cell.row(),
                    level.columns,
                    level.rows
                );
                continue;
            }
            let _ = grid.set_orientation(cell, placement.orientation);
        }
        Ok(grid)
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.dimensions.columns()
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.dimensions.rows()
    }

    /// Side length of a single square cell in world units.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// World-space position of the grid's upper-left corner.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Total width of the grid in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns() as f32 * self.cell_length
    }

    /// Total height of the grid in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows() as f32 * self.cell_length
    }

    /// Every cell in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell currently tracked as the start, if any.
    #[must_use]
    pub fn start(&self) -> Option<CellCoord> {
        self.start.map(|index| self.cells[index].coord())
    }

    /// Cell currently tracked as the finish, if any.
    #[must_use]
    pub fn finish(&self) -> Option<CellCoord> {
        self.finish.map(|index| self.cells[index].coord())
    }

    /// Tracked checkpoints in row-major order.
    pub fn checkpoints(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.checkpoints
            .iter()
            .map(move |&index| self.cells[index].coord())
    }

    /// Looks up the cell at the provided coordinate.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<&Cell> {
        self.index(cell).map(|index| &self.cells[index])
    }

    /// Mutable access to the cell at the provided coordinate.
    ///
    /// Kind changes must go through [`Grid::set_cell_kind`]; the cell itself
    /// only exposes rotation, toggling and reset.
    #[must_use]
    pub fn cell_mut(&mut self, cell: CellCoord) -> Option<&mut Cell> {
        let index = self.index(cell)?;
        Some(&mut self.cells[index])
    }

    /// Maps a world-space point onto the cell underneath it.
    ///
    /// Points outside `[origin, origin + dimension * cell_length)` on either
    /// axis resolve to `None`.
    #[must_use]
    pub fn cell_at_coordinate(&self, point: Vec2) -> Option<&Cell> {
        if !point.is_finite() {
            return None;
        }
        let max = self.origin + Vec2::new(self.width(), self.height());
        if point.x < self.origin.x || point.y < self.origin.y || point.x >= max.x || point.y >= max.y
        {
            return None;
        }

        let local = ((point - self.origin) / self.cell_length).floor();
        self.cell(CellCoord::new(local.x as u32, local.y as u32))
    }

    /// Assigns a kind to the addressed cell and refreshes start, finish and
    /// checkpoint bookkeeping.
    ///
    /// Returns `false` without side effects when the cell is out of bounds.
    pub fn set_cell_kind(&mut self, cell: CellCoord, kind: CellKind) -> bool {
        let Some(index) = self.index(cell) else {
            return false;
        };

        self.cells[index].assign_kind(kind);

        if self.start == Some(index) && kind != CellKind::Start {
            self.start = None;
        }
        if self.finish == Some(index) && kind != CellKind::Finish {
            self.finish = None;
        }
        if kind != CellKind::Checkpoint {
            let _ = self.checkpoints.remove(&index);
        }

        match kind {
            CellKind::Start => self.start = Some(index),
            CellKind::Finish => self.finish = Some(index),
            CellKind::Checkpoint => {
                let _ = self.checkpoints.insert(index);
            }
            CellKind::Empty | CellKind::Normal | CellKind::Blocking => {}
        }
        true
    }

    /// Overwrites the orientation of the addressed cell.
    pub fn set_orientation(&mut self, cell: CellCoord, orientation: Orientation) -> bool {
        match self.cell_mut(cell) {
            Some(target) => {
                target.assign_orientation(orientation);
                true
            }
            None => false,
        }
    }

    /// Rotates the addressed cell clockwise, returning its new orientation.
    pub fn rotate_cell(&mut self, cell: CellCoord) -> Option<Orientation> {
        let target = self.cell_mut(cell)?;
        target.rotate_orientation();
        Some(target.orientation())
    }

    /// Toggles the addressed cell, returning whether a flip happened.
    pub fn toggle_cell(&mut self, cell: CellCoord) -> Option<bool> {
        self.cell_mut(cell).map(Cell::toggle_active)
    }

    /// Runs a trace and reports whether it solved the level.
    pub fn simulate(&mut self) -> bool {
        self.trace().is_success()
    }

    /// Walks the signal from the start cell until it terminates.
    ///
    /// Signal flags and checkpoint activation are cleared first, so every
    /// checkpoint has to be earned by this trace. Routing depends only on the
    /// cell being left, which makes the first revisited cell the entry of a
    /// cycle; the walk therefore never exceeds one step per cell.
    pub fn trace(&mut self) -> TraceReport {
        let (Some(start), Some(finish)) = (self.start, self.finish) else {
            debug!("signal trace skipped: start or finish missing");
            return TraceReport {
                outcome: TraceOutcome::MissingEndpoints,
                path: Vec::new(),
            };
        };

        for cell in &mut self.cells {
            cell.clear_trace_state();
        }

        let mut visited = vec![false; self.cells.len()];
        let mut path = Vec::new();
        let mut current = start;

        let outcome = loop {
            let coord = self.cells[current].coord();
            if visited[current] {
                break TraceOutcome::Looped { at: coord };
            }
            visited[current] = true;
            path.push(coord);
            self.cells[current].mark_signal();

            if current == finish {
                let missing = self.inactive_checkpoints();
                break if missing == 0 {
                    TraceOutcome::Completed
                } else {
                    TraceOutcome::CheckpointsUnvisited { missing }
                };
            }

            let cell = &self.cells[current];
            if !cell.passes_signal() {
                break TraceOutcome::Absorbed { at: coord };
            }

            match coord
                .step(cell.orientation())
                .and_then(|next| self.index(next))
            {
                Some(next) => current = next,
                None => break TraceOutcome::ExitedGrid { from: coord },
            }
        };

        debug!(
            "signal trace finished with {outcome:?} after {} cells",
            path.len()
        );
        TraceReport { outcome, path }
    }

    /// Clears runtime state on every cell so another attempt can start.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.reset_for_new_attempt();
            cell.clear_trace_state();
        }
    }

    fn inactive_checkpoints(&self) -> usize {
        self.checkpoints
            .iter()
            .filter(|&&index| !self.cells[index].is_active())
            .count()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.dimensions.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.dimensions.columns()).ok()?;
        Some(row * width + column)
    }
}
