use anyhow::{anyhow, Context, Result};
use glam::Vec2;
use log::{debug, warn};
use signal_control_core::{CellCoord, Command, Event, LevelDescriptor, TraceOutcome};
use signal_control_system_gameplay::{GameStatus, Gameplay, GameplayInput};
use signal_control_world::{self as world, query, Cell, Grid};

use crate::config::CliConfig;

/// Scripted player interactions applied to a level, in this order.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Moves {
    /// Blocking cells activated before the attempt begins.
    pub(crate) toggles: Vec<CellCoord>,
    /// Cells rotated through the gameplay turn policy.
    pub(crate) rotations: Vec<CellCoord>,
    /// World-space points resolved to cells and rotated like `rotations`.
    pub(crate) clicks: Vec<Vec2>,
}

/// Result of a scripted attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SessionReport {
    /// How the signal trace ended.
    pub(crate) outcome: TraceOutcome,
    /// Final gameplay status.
    pub(crate) status: GameStatus,
    /// Rotations left unspent.
    pub(crate) remaining_actions: u32,
}

/// One level attempt driven by the gameplay system against a grid.
#[derive(Debug)]
pub(crate) struct Session {
    grid: Grid,
    gameplay: Gameplay,
    events: Vec<Event>,
    last_outcome: Option<TraceOutcome>,
}

impl Session {
    /// Builds the level grid using the configured geometry.
    pub(crate) fn new(level: &LevelDescriptor, config: &CliConfig) -> Result<Self> {
        let grid = Grid::from_level(level, config.origin(), config.cell_length)
            .context("failed to build the level grid")?;
        Ok(Self {
            grid,
            gameplay: Gameplay::new(level.action_limit),
            events: Vec::new(),
            last_outcome: None,
        })
    }

    /// Applies the moves, launches the signal if the budget has not already
    /// done so, and reports the settled attempt.
    pub(crate) fn play(&mut self, moves: &Moves) -> Result<SessionReport> {
        for &cell in &moves.toggles {
            self.apply(Command::ToggleCell { cell });
        }

        for &cell in &moves.rotations {
            self.step(GameplayInput::click(cell));
        }

        for &point in &moves.clicks {
            match self.grid.cell_at_coordinate(point).map(Cell::coord) {
                Some(cell) => self.step(GameplayInput::click(cell)),
                None => warn!("click at ({}, {}) misses the grid", point.x, point.y),
            }
        }

        if self.gameplay.status() == GameStatus::Planning {
            self.step(GameplayInput::launch());
        }
        // Let the gameplay system observe the trace result.
        self.step(GameplayInput::default());

        let outcome = self
            .last_outcome
            .ok_or_else(|| anyhow!("the signal was never launched"))?;
        Ok(SessionReport {
            outcome,
            status: self.gameplay.status(),
            remaining_actions: self.gameplay.remaining_actions(),
        })
    }

    /// Read-only view of the grid for presentation.
    pub(crate) fn view(&self) -> query::GridView {
        query::grid_view(&self.grid)
    }

    fn step(&mut self, input: GameplayInput) {
        let mut commands = Vec::new();
        let grid = &self.grid;
        self.gameplay.handle(
            &self.events,
            input,
            |cell| grid.cell(cell).map(Cell::kind),
            &mut commands,
        );
        self.events.clear();
        for command in commands {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: Command) {
        let first_new = self.events.len();
        world::apply(&mut self.grid, command, &mut self.events);
        for event in &self.events[first_new..] {
            match event {
                Event::SignalTraced { outcome, .. } => self.last_outcome = Some(*outcome),
                Event::CellCommandRejected { cell, reason } => warn!(
                    "command on cell {},{} rejected: {reason:?}",
                    cell.column(),
                    cell.row()
                ),
                Event::CellToggled { cell, active } => {
                    debug!("cell {},{} active: {active}", cell.column(), cell.row());
                }
                _ => {}
            }
        }
    }
}
