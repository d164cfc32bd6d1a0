use std::fmt;

use signal_control_core::{CellKind, Orientation, TraceOutcome};
use signal_control_world::query::{CellSnapshot, GridView};

/// Text presentation of a grid view, one line per row.
///
/// Every cell occupies four columns: a kind glyph and a direction arrow,
/// wrapped in brackets when the latest trace passed through the cell.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Board<'a>(pub(crate) &'a GridView);

impl fmt::Display for Board<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        for row in 0..view.rows() {
            let mut line = String::new();
            for cell in view.row(row) {
                let (open, close) = if cell.signal { ('[', ']') } else { (' ', ' ') };
                line.push(open);
                line.push(kind_glyph(cell));
                line.push(arrow(cell.orientation));
                line.push(close);
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

fn kind_glyph(cell: &CellSnapshot) -> char {
    match (cell.kind, cell.active) {
        (CellKind::Empty, _) => '#',
        (CellKind::Start, _) => 'S',
        (CellKind::Finish, _) => 'F',
        (CellKind::Normal, _) => '.',
        (CellKind::Blocking, true) => 'B',
        (CellKind::Blocking, false) => 'b',
        (CellKind::Checkpoint, true) => 'C',
        (CellKind::Checkpoint, false) => 'c',
    }
}

fn arrow(orientation: Orientation) -> char {
    match orientation {
        Orientation::Up => '^',
        Orientation::Right => '>',
        Orientation::Down => 'v',
        Orientation::Left => '<',
    }
}

/// Human readable summary of a trace outcome.
pub(crate) fn describe(outcome: TraceOutcome) -> String {
    match outcome {
        TraceOutcome::Completed => "signal reached the finish".to_owned(),
        TraceOutcome::MissingEndpoints => "level has no start or no finish".to_owned(),
        TraceOutcome::ExitedGrid { from } => format!(
            "signal left the grid after cell {},{}",
            from.column(),
            from.row()
        ),
        TraceOutcome::Absorbed { at } => format!(
            "signal was absorbed by the blocker at {},{}",
            at.column(),
            at.row()
        ),
        TraceOutcome::CheckpointsUnvisited { missing } => {
            format!("signal reached the finish but skipped {missing} checkpoint(s)")
        }
        TraceOutcome::Looped { at } => format!(
            "signal entered a loop at cell {},{}",
            at.column(),
            at.row()
        ),
    }
}
