#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that infers opponent wall formations by sampling occupancy along a line.

use breachline_core::{Board, Coord, ScanLine, ARENA_SIZE};
use tracing::{debug, warn};

/// Occupancy counts gathered along a single scan line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineSurvey {
    /// Number of cells the walk visited, including cells outside the arena.
    pub visited: u32,
    /// Number of visited cells holding at least one unit.
    pub hits: u32,
    /// Hit count the line must exceed to signal a formation.
    pub threshold: u32,
}

impl LineSurvey {
    /// Reports whether the line holds enough units to count as a formation.
    #[must_use]
    pub const fn detected(&self) -> bool {
        self.hits > self.threshold
    }
}

/// Stateless detector that walks scan lines across a read-only board.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineScanner;

impl LineScanner {
    /// Creates a new line scanner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Reports whether the line holds more units than its axis threshold.
    #[must_use]
    pub fn scan<B>(&self, board: &B, line: ScanLine) -> bool
    where
        B: Board + ?Sized,
    {
        self.survey(board, line).detected()
    }

    /// Walks the line one column at a time and counts occupied cells.
    ///
    /// Lines given right-to-left are walked from their left end instead. A
    /// terminus that does not lie on the axis through the origin is reported
    /// as a contract violation; the walk then follows the origin's axis until
    /// it passes the terminus column. Cells outside the arena count as empty.
    /// Columns outside the arena's bounding square are counted as visited but
    /// never queried.
    #[must_use]
    pub fn survey<B>(&self, board: &B, line: ScanLine) -> LineSurvey
    where
        B: Board + ?Sized,
    {
        let line = normalize(line);
        let row_step = i64::from(line.axis.row_step());
        let first = i64::from(line.origin.x());
        let last = i64::from(line.terminus.x());
        let total = last - first + 1;

        let mut inside = 0;
        let mut hits = 0;
        for column in first.max(0)..=last.min(i64::from(ARENA_SIZE) - 1) {
            let row = i64::from(line.origin.y()) + (column - first) * row_step;
            let (Ok(x), Ok(y)) = (i32::try_from(column), i32::try_from(row)) else {
                continue;
            };
            let cell = Coord::new(x, y);
            if !board.in_bounds(cell) {
                continue;
            }
            inside += 1;
            if board.is_occupied(cell) {
                hits += 1;
            }
        }

        let visited = u32::try_from(total).unwrap_or(u32::MAX);
        let outside = total - inside;
        if outside > 0 {
            warn!(
                origin = %line.origin,
                terminus = %line.terminus,
                outside,
                "scan line leaves the arena; outside cells count as empty"
            );
        }

        let survey = LineSurvey {
            visited,
            hits,
            threshold: line.axis.threshold(),
        };
        debug!(
            origin = %line.origin,
            terminus = %line.terminus,
            axis = ?line.axis,
            hits,
            detected = survey.detected(),
            "line scanned"
        );
        survey
    }
}

fn normalize(mut line: ScanLine) -> ScanLine {
    if line.origin.x() > line.terminus.x() {
        debug!(
            origin = %line.origin,
            terminus = %line.terminus,
            "scan endpoints given right-to-left; walking from the left end"
        );
        std::mem::swap(&mut line.origin, &mut line.terminus);
    }

    if !line.is_aligned() {
        warn!(
            origin = %line.origin,
            terminus = %line.terminus,
            axis = ?line.axis,
            "scan terminus is off the scan axis; sampling the origin's axis"
        );
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use breachline_core::{Coord, Owner, ScanAxis, StationaryKind, UnitId};
    use std::collections::HashSet;

    #[derive(Default)]
    struct Cells(HashSet<Coord>);

    impl Board for Cells {
        fn in_bounds(&self, cell: Coord) -> bool {
            (0..28).contains(&cell.x()) && (0..28).contains(&cell.y())
        }

        fn unit_count(&self, cell: Coord) -> usize {
            usize::from(self.0.contains(&cell))
        }

        fn contains_stationary(&self, cell: Coord) -> bool {
            self.0.contains(&cell)
        }

        fn structure_at(&self, cell: Coord) -> Option<(StationaryKind, Owner)> {
            self.0
                .contains(&cell)
                .then_some((StationaryKind::Filter, Owner::Opponent))
        }

        fn path_to_edge(&self, _start: Coord) -> Vec<Coord> {
            Vec::new()
        }

        fn attackers(&self, _cell: Coord, _victim: Owner) -> Vec<UnitId> {
            Vec::new()
        }

        fn turn_number(&self) -> u32 {
            0
        }
    }

    #[test]
    fn reversed_endpoints_walk_the_same_cells() {
        let board = Cells((5..=16).map(|x| Coord::new(x, 15)).collect());
        let forward = ScanLine::new(Coord::new(5, 15), Coord::new(16, 15), ScanAxis::Horizontal);
        let backward = ScanLine::new(Coord::new(16, 15), Coord::new(5, 15), ScanAxis::Horizontal);

        let scanner = LineScanner::new();
        assert_eq!(scanner.survey(&board, forward), scanner.survey(&board, backward));
        assert_eq!(scanner.survey(&board, backward).visited, 12);
    }

    #[test]
    fn misaligned_horizontal_samples_the_origin_row() {
        let board = Cells((5..=16).map(|x| Coord::new(x, 15)).collect());
        let skewed = ScanLine::new(Coord::new(5, 15), Coord::new(16, 16), ScanAxis::Horizontal);

        let survey = LineScanner::new().survey(&board, skewed);
        assert_eq!(survey.hits, 12);
        assert!(survey.detected());
    }

    #[test]
    fn cells_outside_the_board_count_as_empty() {
        let board = Cells((0..4).map(|x| Coord::new(x, 27 - x)).collect());
        let line = ScanLine::new(
            Coord::new(-3, 30),
            Coord::new(3, 24),
            ScanAxis::DecreasingDiagonal,
        );

        let survey = LineScanner::new().survey(&board, line);
        assert_eq!(survey.visited, 7);
        assert_eq!(survey.hits, 4);
        assert!(!survey.detected());
    }
}
