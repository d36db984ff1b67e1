use breachline_core::{Command, Coord, Owner, ScanAxis, ScanLine, StationaryKind, UnitKind};
use breachline_system_line_scan::LineScanner;
use breachline_world::{self as world, query, World};

fn world_with(cells: &[Coord], kind: UnitKind, owner: Owner) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    for &cell in cells {
        world::apply(&mut world, Command::PlaceUnit { kind, owner, cell }, &mut events);
    }
    assert_eq!(events.len(), cells.len(), "every fixture unit should be placed");
    world
}

fn enemy_walls(cells: &[Coord]) -> World {
    world_with(cells, StationaryKind::Filter.into(), Owner::Opponent)
}

fn right_flank_line() -> ScanLine {
    ScanLine::new(
        Coord::new(16, 23),
        Coord::new(23, 16),
        ScanAxis::DecreasingDiagonal,
    )
}

fn left_flank_line() -> ScanLine {
    ScanLine::new(
        Coord::new(4, 16),
        Coord::new(11, 23),
        ScanAxis::IncreasingDiagonal,
    )
}

fn midline() -> ScanLine {
    ScanLine::new(Coord::new(5, 16), Coord::new(16, 16), ScanAxis::Horizontal)
}

#[test]
fn decreasing_diagonal_detects_seven_walls() {
    let cells: Vec<Coord> = (0..7).map(|i| Coord::new(16 + i, 23 - i)).collect();
    assert_eq!(
        cells,
        vec![
            Coord::new(16, 23),
            Coord::new(17, 22),
            Coord::new(18, 21),
            Coord::new(19, 20),
            Coord::new(20, 19),
            Coord::new(21, 18),
            Coord::new(22, 17),
        ]
    );
    let world = enemy_walls(&cells);

    let survey = LineScanner::new().survey(&world, right_flank_line());

    assert_eq!(survey.visited, 8);
    assert_eq!(survey.hits, 7);
    assert!(survey.detected());
}

#[test]
fn diagonal_threshold_is_exclusive() {
    let six: Vec<Coord> = (0..6).map(|i| Coord::new(4 + i, 16 + i)).collect();
    let seven: Vec<Coord> = (0..7).map(|i| Coord::new(4 + i, 16 + i)).collect();
    let scanner = LineScanner::new();

    assert!(!scanner.scan(&enemy_walls(&six), left_flank_line()));
    assert!(scanner.scan(&enemy_walls(&seven), left_flank_line()));
}

#[test]
fn decreasing_diagonal_threshold_is_exclusive() {
    let six: Vec<Coord> = (0..6).map(|i| Coord::new(16 + i, 23 - i)).collect();
    let scanner = LineScanner::new();

    assert!(!scanner.scan(&enemy_walls(&six), right_flank_line()));
}

#[test]
fn horizontal_threshold_is_exclusive() {
    let eight: Vec<Coord> = (5..13).map(|x| Coord::new(x, 16)).collect();
    let nine: Vec<Coord> = (5..14).map(|x| Coord::new(x, 16)).collect();
    let scanner = LineScanner::new();

    assert!(!scanner.scan(&enemy_walls(&eight), midline()));
    assert!(scanner.scan(&enemy_walls(&nine), midline()));
}

#[test]
fn units_of_either_player_count() {
    let cells: Vec<Coord> = (5..10).map(|x| Coord::new(x, 16)).collect();
    let mut world = enemy_walls(&cells);
    let mut events = Vec::new();
    for x in 10..14 {
        let cell = Coord::new(x, 16);
        world::apply(
            &mut world,
            Command::PlaceUnit {
                kind: StationaryKind::Destructor.into(),
                owner: Owner::Defender,
                cell,
            },
            &mut events,
        );
    }

    let survey = LineScanner::new().survey(&world, midline());
    assert_eq!(survey.hits, 9);
    assert!(survey.detected());
}

#[test]
fn scanning_is_idempotent_and_read_only() {
    let cells: Vec<Coord> = (0..7).map(|i| Coord::new(16 + i, 22 - i)).collect();
    let world = enemy_walls(&cells);
    let line = ScanLine::new(
        Coord::new(16, 22),
        Coord::new(23, 15),
        ScanAxis::DecreasingDiagonal,
    );
    let before = query::units(&world);

    let scanner = LineScanner::new();
    let first = scanner.survey(&world, line);
    let second = scanner.survey(&world, line);

    assert_eq!(first, second);
    assert!(first.detected());
    assert_eq!(before, query::units(&world));
}

#[test]
fn empty_board_never_detects() {
    let world = World::new();
    let scanner = LineScanner::new();

    for line in [right_flank_line(), left_flank_line(), midline()] {
        let survey = scanner.survey(&world, line);
        assert_eq!(survey.hits, 0);
        assert!(!survey.detected());
    }
}

#[test]
fn lines_at_the_integer_limit_are_empty() {
    let world = World::new();
    let line = ScanLine::new(
        Coord::new(i32::MAX - 1, 5),
        Coord::new(i32::MAX, 5),
        ScanAxis::Horizontal,
    );

    let survey = LineScanner::new().survey(&world, line);

    assert_eq!(survey.visited, 2);
    assert_eq!(survey.hits, 0);
}

#[test]
fn overlong_lines_only_sample_arena_columns() {
    let nine: Vec<Coord> = (5..14).map(|x| Coord::new(x, 16)).collect();
    let world = enemy_walls(&nine);
    let line = ScanLine::new(
        Coord::new(-1_000_000_000, 16),
        Coord::new(1_000_000_000, 16),
        ScanAxis::Horizontal,
    );

    let survey = LineScanner::new().survey(&world, line);

    assert_eq!(survey.visited, 2_000_000_001);
    assert_eq!(survey.hits, 9);
    assert!(survey.detected());
}

#[test]
fn full_width_diagonal_saturates_visit_count() {
    let world = World::new();
    let line = ScanLine::new(
        Coord::new(i32::MIN, i32::MAX),
        Coord::new(i32::MAX, i32::MIN),
        ScanAxis::DecreasingDiagonal,
    );

    let survey = LineScanner::new().survey(&world, line);

    assert_eq!(survey.visited, u32::MAX);
    assert_eq!(survey.hits, 0);
}
