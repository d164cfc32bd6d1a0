use glam::Vec2;
use signal_control_core::{
    CellCoord, CellKind, CellPlacement, GridDimensions, LevelDescriptor, Orientation,
    TraceOutcome, DEFAULT_HINT,
};
use signal_control_world::Grid;

fn grid_with(columns: u32, rows: u32, placements: &[CellPlacement]) -> Grid {
    let level = LevelDescriptor {
        columns,
        rows,
        action_limit: 5,
        cells: placements.to_vec(),
        tutorial: None,
        hint: DEFAULT_HINT.to_owned(),
    };
    Grid::from_level(&level, Vec2::ZERO, 70.0).expect("level grid")
}

fn place(column: u32, row: u32, kind: CellKind, orientation: Orientation) -> CellPlacement {
    CellPlacement::new(column, row, kind, orientation)
}

#[test]
fn start_pointing_at_adjacent_finish_succeeds() {
    let mut grid = grid_with(
        2,
        1,
        &[
            place(0, 0, CellKind::Start, Orientation::Right),
            place(1, 0, CellKind::Finish, Orientation::Left),
        ],
    );

    assert!(grid.simulate(), "signal should reach the adjacent finish");
}

#[test]
fn start_pointing_off_grid_fails() {
    let mut grid = grid_with(
        2,
        1,
        &[
            place(0, 0, CellKind::Start, Orientation::Left),
            place(1, 0, CellKind::Finish, Orientation::Left),
        ],
    );

    let report = grid.trace();
    assert_eq!(
        report.outcome(),
        TraceOutcome::ExitedGrid {
            from: CellCoord::new(0, 0)
        }
    );
    assert!(!grid.simulate());
}

#[test]
fn checkpoint_on_route_is_activated() {
    let mut grid = grid_with(
        3,
        1,
        &[
            place(0, 0, CellKind::Start, Orientation::Right),
            place(1, 0, CellKind::Checkpoint, Orientation::Right),
            place(2, 0, CellKind::Finish, Orientation::Left),
        ],
    );

    assert!(grid.simulate());
    let checkpoint = grid.cell(CellCoord::new(1, 0)).expect("checkpoint cell");
    assert!(checkpoint.is_active(), "visited checkpoint must be active");
    assert!(checkpoint.has_signal());
}

#[test]
fn checkpoint_facing_away_from_finish_fails() {
    let mut grid = grid_with(
        3,
        1,
        &[
            place(0, 0, CellKind::Start, Orientation::Right),
            place(1, 0, CellKind::Checkpoint, Orientation::Left),
            place(2, 0, CellKind::Finish, Orientation::Left),
        ],
    );

    let report = grid.trace();
    assert_eq!(
        report.outcome(),
        TraceOutcome::Looped {
            at: CellCoord::new(0, 0)
        },
        "checkpoint sends the signal back into the start"
    );
    assert!(!grid.simulate());
}

#[test]
fn reaching_finish_without_every_checkpoint_fails() {
    let mut grid = grid_with(
        3,
        2,
        &[
            place(0, 0, CellKind::Start, Orientation::Right),
            place(2, 0, CellKind::Finish, Orientation::Left),
            place(1, 1, CellKind::Checkpoint, Orientation::Up),
        ],
    );

    let report = grid.trace();
    assert_eq!(
        report.outcome(),
        TraceOutcome::CheckpointsUnvisited { missing: 1 }
    );
    assert!(
        grid.cell(CellCoord::new(2, 0))
            .expect("finish cell")
            .has_signal(),
        "finish is still geometrically reached"
    );
}

#[test]
fn inactive_blocker_absorbs_the_signal() {
    let mut grid = grid_with(
        4,
        1,
        &[
            place(0, 0, CellKind::Start, Orientation::Right),
            place(1, 0, CellKind::Blocking, Orientation::Right),
            place(3, 0, CellKind::Finish, Orientation::Left),
        ],
    );

    let report = grid.trace();
    assert_eq!(
        report.outcome(),
        TraceOutcome::Absorbed {
            at: CellCoord::new(1, 0)
        }
    );
    assert!(grid.cell(CellCoord::new(1, 0)).expect("blocker").has_signal());
    assert!(!grid.cell(CellCoord::new(2, 0)).expect("beyond").has_signal());
    assert!(!grid.cell(CellCoord::new(3, 0)).expect("finish").has_signal());
}

#[test]
fn activated_blocker_forwards_the_signal() {
    let mut grid = grid_with(
        3,
        1,
        &[
            place(0, 0, CellKind::Start, Orientation::Right),
            place(1, 0, CellKind::Blocking, Orientation::Right),
            place(2, 0, CellKind::Finish, Orientation::Left),
        ],
    );

    assert_eq!(grid.toggle_cell(CellCoord::new(1, 0)), Some(true));
    assert!(grid.simulate());
}

#[test]
fn reset_deactivates_blockers_between_attempts() {
    let mut grid = grid_with(
        3,
        1,
        &[
            place(0, 0, CellKind::Start, Orientation::Right),
            place(1, 0, CellKind::Blocking, Orientation::Right),
            place(2, 0, CellKind::Finish, Orientation::Left),
        ],
    );

    let _ = grid.toggle_cell(CellCoord::new(1, 0));
    assert!(grid.simulate());

    grid.reset();
    assert!(!grid.simulate(), "blocker must be re-activated after a reset");
}

#[test]
fn corridor_bending_through_rotated_cells_succeeds() {
    // S > > v
    // . . . v
    // . . . F
    let mut grid = grid_with(
        4,
        3,
        &[
            place(0, 0, CellKind::Start, Orientation::Right),
            place(3, 0, CellKind::Normal, Orientation::Down),
            place(3, 1, CellKind::Normal, Orientation::Down),
            place(3, 2, CellKind::Finish, Orientation::Left),
        ],
    );

    let report = grid.trace();
    assert!(report.is_success());
    assert_eq!(
        report.path(),
        &[
            CellCoord::new(0, 0),
            CellCoord::new(1, 0),
            CellCoord::new(2, 0),
            CellCoord::new(3, 0),
            CellCoord::new(3, 1),
            CellCoord::new(3, 2),
        ]
    );
}

#[test]
fn rotating_the_right_column_solves_the_tutorial_level() {
    // Tutorial layout: the signal runs along the top row and leaves the grid
    // until the right-hand column is turned downward.
    let mut grid = grid_with(
        4,
        4,
        &[
            place(0, 0, CellKind::Start, Orientation::Right),
            place(3, 3, CellKind::Finish, Orientation::Left),
            place(1, 1, CellKind::Normal, Orientation::Right),
        ],
    );
    assert!(!grid.simulate());

    for row in 0..3 {
        assert_eq!(
            grid.rotate_cell(CellCoord::new(3, row)),
            Some(Orientation::Down)
        );
    }
    assert!(grid.simulate());
}

#[test]
fn placements_outside_the_level_are_skipped() {
    let grid = grid_with(
        2,
        1,
        &[
            place(0, 0, CellKind::Start, Orientation::Right),
            place(5, 0, CellKind::Finish, Orientation::Left),
        ],
    );

    assert_eq!(grid.start(), Some(CellCoord::new(0, 0)));
    assert_eq!(grid.finish(), None);
}

#[test]
fn new_grid_defaults_to_right_facing_normal_cells() {
    let grid = Grid::new(GridDimensions::new(3, 3), Vec2::ZERO, 70.0).expect("valid grid");

    assert!(grid.cells().iter().all(|cell| {
        cell.kind() == CellKind::Normal && cell.orientation() == Orientation::Right
    }));
    assert_eq!(grid.width(), 210.0);
    assert_eq!(grid.height(), 210.0);
}
