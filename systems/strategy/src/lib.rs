#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn orchestration that wires formation scans, breach tracking, reactive
//! defence, and least-damage spawning into one configurable strategy.

mod config;

use std::fmt;

use breachline_core::{
    Board, BreachHistory, Coord, Event, Orders, Owner, Placement, StationaryKind, ARENA_SIZE,
};
use breachline_system_breach_tracker::BreachTracker;
use breachline_system_line_scan::LineScanner;
use breachline_system_path_risk::{PathRiskError, PathRiskEvaluator};
use breachline_system_reactive_defense::ReactiveDefensePlanner;
use tracing::{debug, info, warn};

pub use config::{
    Action, Condition, FormationWatch, Step, StrategyConfig, StrategyConfigError, Wave,
};

/// Result of evaluating a single strategy step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step's condition did not hold.
    Skipped,
    /// The step ran; the placement aggregates every request it issued.
    Placed(Placement),
    /// The step could not pick a spawn cell.
    Failed(PathRiskError),
}

/// Outcome of one step, tagged with its position in the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepRecord {
    /// Zero-based index of the step.
    pub index: usize,
    /// Label of the step, or a positional fallback.
    pub label: String,
    /// What happened when the step was evaluated.
    pub outcome: StepOutcome,
}

/// Summary of everything the strategy did during one turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnReport {
    /// Turn number reported by the board.
    pub turn: u32,
    /// Names of the formation watches that fired, in declaration order.
    pub formations: Vec<String>,
    /// One record per configured step, in execution order.
    pub steps: Vec<StepRecord>,
}

impl TurnReport {
    /// Total placement over every step that ran.
    #[must_use]
    pub fn total(&self) -> Placement {
        let mut total = Placement::default();
        for record in &self.steps {
            if let StepOutcome::Placed(placement) = record.outcome {
                total.absorb(placement);
            }
        }
        total
    }

    /// Looks up the record of the first step carrying the label.
    #[must_use]
    pub fn step(&self, label: &str) -> Option<&StepRecord> {
        self.steps.iter().find(|record| record.label == label)
    }
}

impl fmt::Display for TurnReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "turn {}", self.turn)?;
        if self.formations.is_empty() {
            writeln!(f, "formations: none")?;
        } else {
            writeln!(f, "formations: {}", self.formations.join(", "))?;
        }
        for record in &self.steps {
            write!(f, "  {:>2} {:<24} ", record.index, record.label)?;
            match record.outcome {
                StepOutcome::Skipped => writeln!(f, "skipped")?,
                StepOutcome::Placed(placement) => {
                    writeln!(f, "placed {}/{}", placement.placed, placement.requested)?;
                }
                StepOutcome::Failed(error) => writeln!(f, "failed: {error}")?,
            }
        }
        let total = self.total();
        write!(f, "total placed {}/{}", total.placed, total.requested)
    }
}

/// Stateful per-session strategy driven by engine callbacks.
#[derive(Debug)]
pub struct Strategy {
    config: StrategyConfig,
    history: BreachHistory,
    scanner: LineScanner,
    tracker: BreachTracker,
    evaluator: PathRiskEvaluator,
}

impl Default for Strategy {
    fn default() -> Self {
        Self::starter()
    }
}

impl Strategy {
    /// Validates the table and creates a strategy with an empty breach history.
    pub fn new(config: StrategyConfig) -> Result<Self, StrategyConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    /// Strategy driven by [`StrategyConfig::starter`].
    #[must_use]
    pub fn starter() -> Self {
        Self::from_valid(StrategyConfig::starter())
    }

    fn from_valid(config: StrategyConfig) -> Self {
        let evaluator = PathRiskEvaluator::new(config.turret_damage);
        Self {
            config,
            history: BreachHistory::new(),
            scanner: LineScanner::new(),
            tracker: BreachTracker::new(),
            evaluator,
        }
    }

    /// Table driving the strategy.
    #[must_use]
    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Breaches recorded since the session started.
    #[must_use]
    pub fn history(&self) -> &BreachHistory {
        &self.history
    }

    /// Clears per-session state at the start of a game.
    pub fn on_game_start(&mut self) {
        self.history.reset();
        info!(
            watches = self.config.watches.len(),
            steps = self.config.steps.len(),
            "strategy ready"
        );
    }

    /// Records the defender-side breaches contained in an action frame.
    pub fn on_action_frame(&mut self, events: &[Event]) -> usize {
        self.tracker.record(events, &mut self.history)
    }

    /// Scans the board and executes every step whose condition holds.
    pub fn on_turn<E>(&mut self, engine: &mut E) -> TurnReport
    where
        E: Board + Orders + ?Sized,
    {
        let turn = engine.turn_number();
        let formations: Vec<String> = self
            .config
            .watches
            .iter()
            .filter(|watch| self.scanner.scan(&*engine, watch.line))
            .map(|watch| watch.name.clone())
            .collect();
        if !formations.is_empty() {
            info!(turn, ?formations, "opponent formations detected");
        }

        let mut steps = Vec::with_capacity(self.config.steps.len());
        for (index, step) in self.config.steps.iter().enumerate() {
            let label = step
                .label
                .clone()
                .unwrap_or_else(|| format!("step {index}"));
            let outcome = if holds(&step.when, &*engine, &formations) {
                self.run(&step.action, engine)
            } else {
                StepOutcome::Skipped
            };
            debug!(turn, index, %label, ?outcome, "strategy step evaluated");
            steps.push(StepRecord {
                index,
                label,
                outcome,
            });
        }

        let report = TurnReport {
            turn,
            formations,
            steps,
        };
        let total = report.total();
        info!(turn, placed = total.placed, requested = total.requested, "turn submitted");
        report
    }

    fn run<E>(&self, action: &Action, engine: &mut E) -> StepOutcome
    where
        E: Board + Orders + ?Sized,
    {
        match action {
            Action::Build {
                structure,
                cells,
                skip_occupied: false,
            } => StepOutcome::Placed(engine.attempt_build(*structure, cells, 1)),
            Action::Build {
                structure,
                cells,
                skip_occupied: true,
            } => {
                let open: Vec<Coord> = cells
                    .iter()
                    .copied()
                    .filter(|&cell| !engine.contains_stationary(cell))
                    .collect();
                if open.len() < cells.len() {
                    debug!(dropped = cells.len() - open.len(), "occupied build cells dropped");
                }
                StepOutcome::Placed(engine.attempt_build(*structure, &open, 1))
            }
            Action::Spawn { unit, cells, count } => {
                StepOutcome::Placed(engine.attempt_spawn(*unit, cells, *count))
            }
            Action::SpawnLeastDamage { candidates, waves } => {
                match self.evaluator.choose_least_damage(&*engine, candidates) {
                    Ok(cell) => {
                        debug!(%cell, "least-damage spawn cell chosen");
                        let mut total = Placement::default();
                        for wave in waves {
                            total.absorb(engine.attempt_spawn(wave.unit, &[cell], wave.count));
                        }
                        StepOutcome::Placed(total)
                    }
                    Err(error) => {
                        warn!(%error, "least-damage spawn skipped");
                        StepOutcome::Failed(error)
                    }
                }
            }
            Action::ReactiveDefense { structure } => {
                let planner = ReactiveDefensePlanner::new(*structure);
                let orders = planner.plan(&self.history);
                StepOutcome::Placed(planner.execute(&orders, engine))
            }
        }
    }
}

fn holds<E>(condition: &Condition, engine: &E, formations: &[String]) -> bool
where
    E: Board + Orders + ?Sized,
{
    match condition {
        Condition::Always => true,
        Condition::Formation { any_of } => any_of.iter().any(|name| formations.contains(name)),
        Condition::Affordable { unit, multiple } => {
            engine.resource_balance(unit.resource()) >= multiple * engine.unit_cost(*unit)
        }
        Condition::TurnCadence { after, every } => {
            let turn = engine.turn_number();
            *every > 0 && turn > *after && turn % every == 0
        }
        Condition::EnemyCount {
            structure,
            xs,
            ys,
            at_least,
        } => enemy_count(engine, *structure, xs, ys) >= *at_least,
        Condition::Not { condition } => !holds(condition, engine, formations),
    }
}

fn enemy_count<B>(board: &B, structure: Option<StationaryKind>, xs: &[i32], ys: &[i32]) -> u32
where
    B: Board + ?Sized,
{
    let mut count = 0_u32;
    for y in (0..ARENA_SIZE).filter(|y| ys.is_empty() || ys.contains(y)) {
        for x in (0..ARENA_SIZE).filter(|x| xs.is_empty() || xs.contains(x)) {
            let cell = Coord::new(x, y);
            if !board.in_bounds(cell) {
                continue;
            }
            match board.structure_at(cell) {
                Some((kind, Owner::Opponent)) if structure.map_or(true, |wanted| wanted == kind) => {
                    count = count.saturating_add(1);
                }
                _ => {}
            }
        }
    }
    count
}
