use signal_control_core::{CellCoord, CellKind, Orientation};

/// Single addressable grid position together with its routing configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    coord: CellCoord,
    kind: CellKind,
    orientation: Orientation,
    active: bool,
    signal_present: bool,
}

impl Cell {
    /// Creates a default Normal cell facing right.
    #[must_use]
    pub(crate) const fn new(coord: CellCoord) -> Self {
        Self {
            coord,
            kind: CellKind::Normal,
            orientation: Orientation::Right,
            active: true,
            signal_present: false,
        }
    }

    /// Fixed position of the cell within its grid.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Static role of the cell.
    #[must_use]
    pub const fn kind(&self) -> CellKind {
        self.kind
    }

    /// Direction the cell forwards the signal.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Activity flag. Meaningful for blocking cells and checkpoints only.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the most recent trace passed through this cell.
    #[must_use]
    pub const fn has_signal(&self) -> bool {
        self.signal_present
    }

    /// Whether gameplay policy allows rotating this cell.
    #[must_use]
    pub const fn is_rotatable(&self) -> bool {
        self.kind.is_rotatable()
    }

    /// Whether the signal may leave this cell.
    pub(crate) const fn passes_signal(&self) -> bool {
        !matches!(self.kind, CellKind::Blocking) || self.active
    }

    /// Advances the orientation a quarter turn clockwise.
    ///
    /// Start and finish cells are rotated too; refusing those is up to the caller.
    pub fn rotate_orientation(&mut self) {
        self.orientation = self.orientation.rotated_clockwise();
    }

    /// Flips the activity flag of a blocking cell.
    ///
    /// Returns `true` when the flag changed. Other kinds are left untouched.
    pub fn toggle_active(&mut self) -> bool {
        if self.kind != CellKind::Blocking {
            return false;
        }
        self.active = !self.active;
        true
    }

    /// Clears trace state ahead of another attempt.
    ///
    /// Blocking cells fall back to inactive. Checkpoint activation is cleared by
    /// the grid, not here.
    pub fn reset_for_new_attempt(&mut self) {
        self.signal_present = false;
        if self.kind == CellKind::Blocking {
            self.active = false;
        }
    }

    pub(crate) fn assign_kind(&mut self, kind: CellKind) {
        self.kind = kind;
        self.active = kind.starts_active();
    }

    pub(crate) fn assign_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    pub(crate) fn mark_signal(&mut self) {
        self.signal_present = true;
        if self.kind == CellKind::Checkpoint {
            self.active = true;
        }
    }

    pub(crate) fn clear_trace_state(&mut self) {
        self.signal_present = false;
        if self.kind == CellKind::Checkpoint {
            self.active = false;
        }
    }
}
