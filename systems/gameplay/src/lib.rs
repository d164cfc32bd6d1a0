#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure gameplay system that enforces the turn policy around the signal grid.
//!
//! The grid itself rotates any cell and never counts moves. This system decides
//! which player interactions turn into commands: start and finish cells cannot
//! be rotated, every rotation spends one action, and running out of actions
//! launches the signal automatically.

use log::{debug, info};
use signal_control_core::{CellCoord, CellKind, Command, Event};

/// Progress of a single level attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// The player may rotate cells or launch the signal.
    Planning,
    /// A simulate command was issued and its result is pending.
    Simulating,
    /// The most recent trace solved the level.
    Won,
    /// The most recent trace failed.
    Lost,
}

/// Input snapshot distilled from adapter-provided interaction data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameplayInput {
    /// Cell the player clicked this frame, if any.
    pub clicked_cell: Option<CellCoord>,
    /// Indicates whether the player asked to launch the signal this frame.
    pub simulate: bool,
}

impl GameplayInput {
    /// Input describing a click on the provided cell.
    #[must_use]
    pub const fn click(cell: CellCoord) -> Self {
        Self {
            clicked_cell: Some(cell),
            simulate: false,
        }
    }

    /// Input describing a request to launch the signal.
    #[must_use]
    pub const fn launch() -> Self {
        Self {
            clicked_cell: None,
            simulate: true,
        }
    }
}

/// Gameplay system that translates player input into grid commands.
#[derive(Clone, Debug)]
pub struct Gameplay {
    action_limit: u32,
    remaining_actions: u32,
    status: GameStatus,
}

impl Gameplay {
    /// Creates a gameplay system with a fresh action budget.
    #[must_use]
    pub const fn new(action_limit: u32) -> Self {
        Self {
            action_limit,
            remaining_actions: action_limit,
            status: GameStatus::Planning,
        }
    }

    /// Starts a new attempt with the provided action budget.
    pub fn restart(&mut self, action_limit: u32) {
        self.action_limit = action_limit;
        self.remaining_actions = action_limit;
        self.status = GameStatus::Planning;
    }

    /// Budget the current attempt started with.
    #[must_use]
    pub const fn action_limit(&self) -> u32 {
        self.action_limit
    }

    /// Rotations the player may still spend.
    #[must_use]
    pub const fn remaining_actions(&self) -> u32 {
        self.remaining_actions
    }

    /// Progress of the current attempt.
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Consumes world events and player input to emit grid commands.
    ///
    /// The `kind_at` closure should report the kind of the cell at the
    /// provided coordinate, or `None` when the coordinate is outside the grid.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        input: GameplayInput,
        mut kind_at: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(CellCoord) -> Option<CellKind>,
    {
        for event in events {
            match event {
                Event::SignalTraced { outcome, visited } => {
                    self.status = if outcome.is_success() {
                        GameStatus::Won
                    } else {
                        GameStatus::Lost
                    };
                    info!("signal trace settled as {outcome:?} after {visited} cells");
                }
                Event::GridReset => self.status = GameStatus::Planning,
                _ => {}
            }
        }

        if self.status != GameStatus::Planning {
            return;
        }

        // Launching is free, even with an empty budget.
        if input.simulate {
            self.launch(out);
            return;
        }

        let Some(cell) = input.clicked_cell else {
            return;
        };
        if self.remaining_actions == 0 {
            return;
        }
        match kind_at(cell) {
            Some(kind) if kind.is_rotatable() => {}
            Some(kind) => {
                debug!("ignoring click on fixed {kind:?} cell");
                return;
            }
            None => return,
        }

        out.push(Command::RotateCell { cell });
        self.remaining_actions -= 1;
        if self.remaining_actions == 0 {
            debug!("action budget exhausted, launching the signal");
            self.launch(out);
        }
    }

    fn launch(&mut self, out: &mut Vec<Command>) {
        out.push(Command::Simulate);
        self.status = GameStatus::Simulating;
    }
}
