use glam::Vec2;
use signal_control_core::{CellCoord, CellKind, Command, Event, TraceOutcome};
use signal_control_system_gameplay::{GameStatus, Gameplay, GameplayInput};
use signal_control_system_levels::LevelCatalog;
use signal_control_world::{self as world, Grid};

fn normal_everywhere(_: CellCoord) -> Option<CellKind> {
    Some(CellKind::Normal)
}

#[test]
fn click_emits_rotation_and_spends_an_action() {
    let mut gameplay = Gameplay::new(3);
    let mut commands = Vec::new();

    gameplay.handle(
        &[],
        GameplayInput::click(CellCoord::new(1, 1)),
        normal_everywhere,
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::RotateCell {
            cell: CellCoord::new(1, 1)
        }]
    );
    assert_eq!(gameplay.remaining_actions(), 2);
    assert_eq!(gameplay.status(), GameStatus::Planning);
}

#[test]
fn start_and_finish_cells_cannot_be_rotated() {
    let mut gameplay = Gameplay::new(3);
    let mut commands = Vec::new();

    for kind in [CellKind::Start, CellKind::Finish] {
        gameplay.handle(
            &[],
            GameplayInput::click(CellCoord::new(0, 0)),
            |_| Some(kind),
            &mut commands,
        );
    }

    assert!(commands.is_empty(), "fixed cells must not emit commands");
    assert_eq!(gameplay.remaining_actions(), 3, "no action is spent");
}

#[test]
fn clicks_outside_the_grid_are_ignored() {
    let mut gameplay = Gameplay::new(1);
    let mut commands = Vec::new();

    gameplay.handle(
        &[],
        GameplayInput::click(CellCoord::new(9, 9)),
        |_| None,
        &mut commands,
    );

    assert!(commands.is_empty());
    assert_eq!(gameplay.remaining_actions(), 1);
}

#[test]
fn last_action_launches_the_signal() {
    let mut gameplay = Gameplay::new(1);
    let mut commands = Vec::new();

    gameplay.handle(
        &[],
        GameplayInput::click(CellCoord::new(2, 0)),
        normal_everywhere,
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![
            Command::RotateCell {
                cell: CellCoord::new(2, 0)
            },
            Command::Simulate,
        ]
    );
    assert_eq!(gameplay.status(), GameStatus::Simulating);
}

#[test]
fn launch_is_allowed_with_an_empty_budget() {
    let mut gameplay = Gameplay::new(0);
    let mut commands = Vec::new();

    gameplay.handle(&[], GameplayInput::launch(), normal_everywhere, &mut commands);

    assert_eq!(commands, vec![Command::Simulate]);
    assert_eq!(gameplay.status(), GameStatus::Simulating);
}

#[test]
fn input_is_ignored_while_the_signal_is_running() {
    let mut gameplay = Gameplay::new(4);
    let mut commands = Vec::new();

    gameplay.handle(&[], GameplayInput::launch(), normal_everywhere, &mut commands);
    commands.clear();

    gameplay.handle(
        &[],
        GameplayInput::click(CellCoord::new(0, 1)),
        normal_everywhere,
        &mut commands,
    );

    assert!(commands.is_empty());
    assert_eq!(gameplay.remaining_actions(), 4);
}

#[test]
fn trace_events_settle_the_attempt() {
    let mut gameplay = Gameplay::new(2);
    let mut commands = Vec::new();

    gameplay.handle(&[], GameplayInput::launch(), normal_everywhere, &mut commands);
    gameplay.handle(
        &[Event::SignalTraced {
            outcome: TraceOutcome::Absorbed {
                at: CellCoord::new(1, 0),
            },
            visited: 2,
        }],
        GameplayInput::default(),
        normal_everywhere,
        &mut commands,
    );
    assert_eq!(gameplay.status(), GameStatus::Lost);

    gameplay.handle(
        &[Event::GridReset],
        GameplayInput::default(),
        normal_everywhere,
        &mut commands,
    );
    assert_eq!(gameplay.status(), GameStatus::Planning);

    gameplay.restart(6);
    assert_eq!(gameplay.remaining_actions(), 6);
    assert_eq!(gameplay.action_limit(), 6);
}

#[test]
fn tutorial_is_won_by_turning_the_right_column() {
    let catalog = LevelCatalog::builtin();
    let level = catalog.current().expect("tutorial level");
    let mut grid = Grid::from_level(level, Vec2::ZERO, 70.0).expect("grid builds");
    let mut gameplay = Gameplay::new(level.action_limit);
    let mut events = Vec::new();

    let clicks = [
        CellCoord::new(0, 0),
        CellCoord::new(3, 0),
        CellCoord::new(3, 1),
        CellCoord::new(3, 2),
    ];
    for cell in clicks {
        let mut commands = Vec::new();
        gameplay.handle(
            &events,
            GameplayInput::click(cell),
            |cell| grid.cell(cell).map(|cell| cell.kind()),
            &mut commands,
        );
        events.clear();
        for command in commands {
            world::apply(&mut grid, command, &mut events);
        }
    }

    let mut commands = Vec::new();
    gameplay.handle(&events, GameplayInput::launch(), |_| None, &mut commands);
    events.clear();
    for command in commands {
        world::apply(&mut grid, command, &mut events);
    }
    gameplay.handle(&events, GameplayInput::default(), |_| None, &mut Vec::new());

    assert_eq!(gameplay.status(), GameStatus::Won);
    assert_eq!(gameplay.remaining_actions(), 2, "start click is free");
}
