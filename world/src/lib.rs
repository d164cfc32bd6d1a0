#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state management for Signal Control.

mod cell;
mod grid;

pub use cell::Cell;
pub use grid::{Grid, GridError, TraceReport};

use signal_control_core::{CellCoord, CellRejection, Command, Event};

/// Applies the provided command to the grid, mutating state deterministically.
pub fn apply(grid: &mut Grid, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetCellKind { cell, kind } => {
            if grid.set_cell_kind(cell, kind) {
                out_events.push(Event::CellKindChanged { cell, kind });
            } else {
                out_events.push(out_of_bounds(cell));
            }
        }
        Command::SetOrientation { cell, orientation } => {
            if grid.set_orientation(cell, orientation) {
                out_events.push(Event::CellRotated { cell, orientation });
            } else {
                out_events.push(out_of_bounds(cell));
            }
        }
        Command::RotateCell { cell } => match grid.rotate_cell(cell) {
            Some(orientation) => out_events.push(Event::CellRotated { cell, orientation }),
            None => out_events.push(out_of_bounds(cell)),
        },
        Command::ToggleCell { cell } => match grid.toggle_cell(cell) {
            Some(true) => {
                let active = grid.cell(cell).is_some_and(Cell::is_active);
                out_events.push(Event::CellToggled { cell, active });
            }
            Some(false) => {}
            None => out_events.push(out_of_bounds(cell)),
        },
        Command::Simulate => {
            let report = grid.trace();
            out_events.push(Event::SignalTraced {
                outcome: report.outcome(),
                visited: report.path().len(),
            });
        }
        Command::Reset => {
            grid.reset();
            out_events.push(Event::GridReset);
        }
    }
}

fn out_of_bounds(cell: CellCoord) -> Event {
    Event::CellCommandRejected {
        cell,
        reason: CellRejection::OutOfBounds,
    }
}

/// Query functions that provide read-only access to the grid state.
pub mod query {
    use signal_control_core::{CellCoord, CellKind, Orientation};

    use super::Grid;

    /// Captures a read-only view of every cell for presentation purposes.
    #[must_use]
    pub fn grid_view(grid: &Grid) -> GridView {
        let cells = grid
            .cells()
            .iter()
            .map(|cell| CellSnapshot {
                coord: cell.coord(),
                kind: cell.kind(),
                orientation: cell.orientation(),
                active: cell.is_active(),
                signal: cell.has_signal(),
            })
            .collect();
        GridView {
            columns: grid.columns(),
            rows: grid.rows(),
            cells,
        }
    }

    /// Cells flagged as carrying the signal after the most recent trace.
    #[must_use]
    pub fn signal_cells(grid: &Grid) -> Vec<CellCoord> {
        grid.cells()
            .iter()
            .filter(|cell| cell.has_signal())
            .map(|cell| cell.coord())
            .collect()
    }

    /// Read-only snapshot describing all cells within the grid.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct GridView {
        columns: u32,
        rows: u32,
        cells: Vec<CellSnapshot>,
    }

    impl GridView {
        /// Number of columns captured by the view.
        #[must_use]
        pub const fn columns(&self) -> u32 {
            self.columns
        }

        /// Number of rows captured by the view.
        #[must_use]
        pub const fn rows(&self) -> u32 {
            self.rows
        }

        /// Iterator over the captured cells in row-major order.
        pub fn iter(&self) -> impl Iterator<Item = &CellSnapshot> {
            self.cells.iter()
        }

        /// Iterator over the cells of a single row.
        pub fn row(&self, row: u32) -> impl Iterator<Item = &CellSnapshot> {
            self.cells.iter().filter(move |cell| cell.coord.row() == row)
        }
    }

    /// Immutable representation of a single cell's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CellSnapshot {
        /// Position of the cell.
        pub coord: CellCoord,
        /// Static role of the cell.
        pub kind: CellKind,
        /// Direction the cell forwards the signal.
        pub orientation: Orientation,
        /// Activity flag of the cell.
        pub active: bool,
        /// Whether the latest trace passed through the cell.
        pub signal: bool,
    }
}
