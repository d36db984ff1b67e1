#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that ranks candidate spawn cells by the turret fire their paths cross.

use breachline_core::{Board, Coord, Owner};
use thiserror::Error;
use tracing::{debug, warn};

/// Reasons a least-damage selection cannot produce a spawn cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathRiskError {
    /// The caller supplied no candidate cells.
    #[error("least-damage selection requires at least one candidate spawn cell")]
    NoCandidates,
}

/// Danger estimate computed for a single candidate spawn cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RiskAssessment {
    /// Candidate spawn cell.
    pub cell: Coord,
    /// Sum over the path of attacker count times per-attacker damage.
    pub danger: u64,
    /// Number of cells on the simulated path, including the spawn cell.
    pub path_len: usize,
}

impl RiskAssessment {
    /// Reports whether the engine produced a path for the candidate.
    #[must_use]
    pub const fn has_path(&self) -> bool {
        self.path_len > 0
    }

    fn precedes(&self, other: &Self) -> bool {
        if self.has_path() != other.has_path() {
            return self.has_path();
        }

        self.danger < other.danger
    }
}

/// Evaluator that blends attacker counts with engine-simulated paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathRiskEvaluator {
    damage_per_attacker: u32,
    victim: Owner,
}

impl PathRiskEvaluator {
    /// Creates an evaluator for the defender's mobile units.
    ///
    /// `damage_per_attacker` is the damage of the reference turret type; every
    /// attacker reaching a path cell contributes it once.
    #[must_use]
    pub const fn new(damage_per_attacker: u32) -> Self {
        Self {
            damage_per_attacker,
            victim: Owner::Defender,
        }
    }

    /// Damage contributed by each attacker reaching a path cell.
    #[must_use]
    pub const fn damage_per_attacker(&self) -> u32 {
        self.damage_per_attacker
    }

    /// Scores the path a unit spawned at `cell` would take.
    #[must_use]
    pub fn assess_cell<B>(&self, board: &B, cell: Coord) -> RiskAssessment
    where
        B: Board + ?Sized,
    {
        let path = board.path_to_edge(cell);
        let damage = u64::from(self.damage_per_attacker);
        let danger = path
            .iter()
            .map(|&step| board.attackers(step, self.victim).len() as u64 * damage)
            .sum();

        RiskAssessment {
            cell,
            danger,
            path_len: path.len(),
        }
    }

    /// Scores every candidate, preserving input order.
    #[must_use]
    pub fn assess<B>(&self, board: &B, candidates: &[Coord]) -> Vec<RiskAssessment>
    where
        B: Board + ?Sized,
    {
        candidates
            .iter()
            .map(|&cell| self.assess_cell(board, cell))
            .collect()
    }

    /// Returns the candidate whose path crosses the least turret fire.
    ///
    /// Ties resolve to the earliest candidate. A candidate the engine cannot
    /// route from has an empty path and therefore a danger of zero, yet it
    /// still ranks behind every routable candidate, however dangerous. When
    /// no candidate is routable the first one is returned.
    pub fn choose_least_damage<B>(
        &self,
        board: &B,
        candidates: &[Coord],
    ) -> Result<Coord, PathRiskError>
    where
        B: Board + ?Sized,
    {
        if candidates.is_empty() {
            return Err(PathRiskError::NoCandidates);
        }

        let assessments = self.assess(board, candidates);
        for assessment in assessments.iter().filter(|a| !a.has_path()) {
            warn!(cell = %assessment.cell, "no path from candidate spawn cell");
        }

        let mut best: Option<&RiskAssessment> = None;
        for assessment in &assessments {
            debug!(cell = %assessment.cell, danger = assessment.danger, "candidate scored");
            match best {
                Some(existing) if !assessment.precedes(existing) => {}
                _ => best = Some(assessment),
            }
        }

        best.map(|assessment| assessment.cell)
            .ok_or(PathRiskError::NoCandidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use breachline_core::{StationaryKind, UnitId};
    use std::collections::HashMap;

    #[derive(Default)]
    struct Scripted {
        paths: HashMap<Coord, Vec<Coord>>,
        attackers: HashMap<Coord, usize>,
    }

    impl Scripted {
        fn path(mut self, start: Coord, cells: &[Coord]) -> Self {
            let _ = self.paths.insert(start, cells.to_vec());
            self
        }

        fn threat(mut self, cell: Coord, attackers: usize) -> Self {
            let _ = self.attackers.insert(cell, attackers);
            self
        }
    }

    impl Board for Scripted {
        fn in_bounds(&self, _cell: Coord) -> bool {
            true
        }

        fn unit_count(&self, _cell: Coord) -> usize {
            0
        }

        fn contains_stationary(&self, _cell: Coord) -> bool {
            false
        }

        fn structure_at(&self, _cell: Coord) -> Option<(StationaryKind, Owner)> {
            None
        }

        fn path_to_edge(&self, start: Coord) -> Vec<Coord> {
            self.paths.get(&start).cloned().unwrap_or_default()
        }

        fn attackers(&self, cell: Coord, victim: Owner) -> Vec<UnitId> {
            assert_eq!(victim, Owner::Defender);
            let count = self.attackers.get(&cell).copied().unwrap_or(0);
            (0..count as u32).map(UnitId::new).collect()
        }

        fn turn_number(&self) -> u32 {
            0
        }
    }

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn danger_sums_attackers_times_damage() {
        let board = Scripted::default()
            .path(c(13, 0), &[c(13, 0), c(13, 1), c(13, 2)])
            .threat(c(13, 1), 2)
            .threat(c(13, 2), 1);

        let assessment = PathRiskEvaluator::new(4).assess_cell(&board, c(13, 0));
        assert_eq!(assessment.danger, 12);
        assert_eq!(assessment.path_len, 3);
    }

    #[test]
    fn zero_attacker_path_wins() {
        let board = Scripted::default()
            .path(c(13, 0), &[c(13, 0), c(13, 1)])
            .path(c(14, 0), &[c(14, 0), c(14, 1)])
            .threat(c(13, 1), 1);

        let evaluator = PathRiskEvaluator::new(4);
        assert_eq!(
            evaluator.choose_least_damage(&board, &[c(13, 0), c(14, 0)]),
            Ok(c(14, 0))
        );
    }

    #[test]
    fn ties_resolve_to_first_candidate() {
        let board = Scripted::default()
            .path(c(13, 0), &[c(13, 0), c(13, 1)])
            .path(c(14, 0), &[c(14, 0), c(14, 1)])
            .threat(c(13, 1), 1)
            .threat(c(14, 1), 1);

        let evaluator = PathRiskEvaluator::new(4);
        assert_eq!(
            evaluator.choose_least_damage(&board, &[c(14, 0), c(13, 0)]),
            Ok(c(14, 0))
        );
        assert_eq!(
            evaluator.choose_least_damage(&board, &[c(13, 0), c(14, 0)]),
            Ok(c(13, 0))
        );
    }

    #[test]
    fn unroutable_candidates_rank_last() {
        let board = Scripted::default()
            .path(c(14, 0), &[c(14, 0), c(14, 1)])
            .threat(c(14, 1), 3);

        let evaluator = PathRiskEvaluator::new(4);
        let stranded = evaluator.assess_cell(&board, c(13, 0));
        assert_eq!(stranded.danger, 0);
        assert!(!stranded.has_path());
        assert_eq!(evaluator.assess_cell(&board, c(14, 0)).danger, 12);

        assert_eq!(
            evaluator.choose_least_damage(&board, &[c(13, 0), c(14, 0)]),
            Ok(c(14, 0))
        );
        assert_eq!(evaluator.choose_least_damage(&board, &[c(13, 0)]), Ok(c(13, 0)));
        assert_eq!(
            evaluator.choose_least_damage(&board, &[c(13, 0), c(12, 0)]),
            Ok(c(13, 0))
        );
    }

    #[test]
    fn empty_candidates_are_rejected() {
        let evaluator = PathRiskEvaluator::new(4);
        assert_eq!(
            evaluator.choose_least_damage(&Scripted::default(), &[]),
            Err(PathRiskError::NoCandidates)
        );
    }
}
