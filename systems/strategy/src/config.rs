//! Declarative strategy tables injected into the orchestrator.

use std::collections::HashSet;

use breachline_core::{Coord, MobileKind, ScanAxis, ScanLine, StationaryKind, UnitKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_TURRET_DAMAGE: u32 = 4;

/// Errors raised while loading or validating a strategy table.
#[derive(Debug, Error)]
pub enum StrategyConfigError {
    /// The TOML document could not be parsed.
    #[error("could not parse strategy table: {0}")]
    Parse(#[from] toml::de::Error),
    /// The table could not be rendered as TOML.
    #[error("could not render strategy table: {0}")]
    Render(#[from] toml::ser::Error),
    /// Two formation watches share a name.
    #[error("formation `{0}` is declared more than once")]
    DuplicateFormation(String),
    /// A step condition names a formation no watch declares.
    #[error("step {step} references unknown formation `{name}`")]
    UnknownFormation {
        /// Zero-based index of the offending step.
        step: usize,
        /// Formation name that could not be resolved.
        name: String,
    },
    /// A turn cadence condition repeats every zero turns.
    #[error("step {step} uses a turn cadence of zero")]
    ZeroCadence {
        /// Zero-based index of the offending step.
        step: usize,
    },
    /// A least-damage spawn step lists no candidate cells.
    #[error("step {step} has no candidate spawn cells")]
    EmptyCandidates {
        /// Zero-based index of the offending step.
        step: usize,
    },
}

/// Complete strategy table: formation watches plus ordered deployment steps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrategyConfig {
    /// Damage of the reference turret used to score spawn paths.
    #[serde(default = "default_turret_damage")]
    pub turret_damage: u32,
    /// Named scan lines evaluated at the start of every turn.
    #[serde(default, rename = "watch")]
    pub watches: Vec<FormationWatch>,
    /// Deployment steps executed in order every turn.
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

fn default_turret_damage() -> u32 {
    DEFAULT_TURRET_DAMAGE
}

/// Scan line whose detection gates strategy steps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormationWatch {
    /// Name referenced by step conditions.
    pub name: String,
    /// Line sampled by the scanner.
    pub line: ScanLine,
}

/// Single deployment step of the strategy table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Human-readable name shown in turn reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Condition gating the step.
    #[serde(default)]
    pub when: Condition,
    /// Deployment performed when the condition holds.
    #[serde(flatten)]
    pub action: Action,
}

/// Gate evaluated against the board and the detected formations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "if", rename_all = "kebab-case")]
pub enum Condition {
    /// Holds every turn.
    #[default]
    Always,
    /// Holds when at least one of the named formations was detected.
    Formation {
        /// Formation names, any of which satisfies the condition.
        any_of: Vec<String>,
    },
    /// Holds when the unit's resource covers `multiple` copies of it.
    Affordable {
        /// Unit whose price is checked.
        unit: UnitKind,
        /// Number of copies that must be affordable.
        multiple: f32,
    },
    /// Holds on turns after `after` that are a multiple of `every`.
    TurnCadence {
        /// Last turn on which the cadence never fires.
        after: u32,
        /// Period of the cadence, in turns.
        every: u32,
    },
    /// Holds when the opponent has at least `at_least` matching structures.
    ///
    /// Empty coordinate lists match every column or row.
    EnemyCount {
        /// Structure type to count; any structure when omitted.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        structure: Option<StationaryKind>,
        /// Columns to inspect.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        xs: Vec<i32>,
        /// Rows to inspect.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        ys: Vec<i32>,
        /// Minimum number of matching structures.
        at_least: u32,
    },
    /// Holds when the wrapped condition does not.
    Not {
        /// Condition to negate.
        condition: Box<Condition>,
    },
}

/// Deployment carried out by a step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    /// Builds one structure on each listed cell, in order, while affordable.
    Build {
        /// Structure to build.
        structure: StationaryKind,
        /// Cells to build on.
        cells: Vec<Coord>,
        /// Drops cells that already hold a structure before requesting the build.
        #[serde(default, skip_serializing_if = "is_false")]
        skip_occupied: bool,
    },
    /// Spawns up to `count` mobile units on each listed cell.
    Spawn {
        /// Unit to spawn.
        unit: MobileKind,
        /// Cells to spawn on.
        cells: Vec<Coord>,
        /// Maximum number of units per cell.
        #[serde(default = "default_count")]
        count: u32,
    },
    /// Spawns every wave on the candidate whose path crosses the least turret fire.
    SpawnLeastDamage {
        /// Candidate spawn cells, in tie-break order.
        candidates: Vec<Coord>,
        /// Units spawned on the chosen cell, in order.
        waves: Vec<Wave>,
    },
    /// Walls off every recorded breach.
    ReactiveDefense {
        /// Structure built around breaches.
        #[serde(default = "default_reactive_structure")]
        structure: StationaryKind,
    },
}

fn default_count() -> u32 {
    1
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn default_reactive_structure() -> StationaryKind {
    StationaryKind::Destructor
}

/// Group of identical mobile units spawned together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Wave {
    /// Unit to spawn.
    pub unit: MobileKind,
    /// Maximum number of units to spawn.
    pub count: u32,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::starter()
    }
}

impl StrategyConfig {
    /// Parses and validates a TOML strategy table.
    pub fn from_toml_str(contents: &str) -> Result<Self, StrategyConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the table as TOML.
    pub fn to_toml_string(&self) -> Result<String, StrategyConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks cross-references and numeric ranges the type system cannot express.
    pub fn validate(&self) -> Result<(), StrategyConfigError> {
        let mut names = HashSet::new();
        for watch in &self.watches {
            if !names.insert(watch.name.as_str()) {
                return Err(StrategyConfigError::DuplicateFormation(watch.name.clone()));
            }
        }

        for (index, step) in self.steps.iter().enumerate() {
            validate_condition(&step.when, index, &names)?;
            if let Action::SpawnLeastDamage { candidates, .. } = &step.action {
                if candidates.is_empty() {
                    return Err(StrategyConfigError::EmptyCandidates { step: index });
                }
            }
        }

        Ok(())
    }

    /// Hand-authored opening table.
    ///
    /// Watches both flanks for diagonal walls and the midline for horizontal
    /// walls, reinforces the matching corner, keeps a fixed base of filters,
    /// turrets and encryptors, rebuilds around breaches, and launches an EMP
    /// push every fourth turn after turn 7 with scramblers in between.
    #[must_use]
    pub fn starter() -> Self {
        let right = ["right-flank-outer", "right-flank-inner"];
        let left = ["left-flank-outer", "left-flank-inner"];
        let midline = ["midline-back", "midline-front"];
        let right_corner = cells(&[[26, 12], [25, 12], [25, 11], [24, 13], [24, 11]]);
        let left_corner = cells(&[[1, 12], [2, 12], [2, 11], [3, 13], [3, 11]]);
        let scramblers = cells(&[[5, 8], [22, 8], [11, 2]]);
        let attack = Condition::TurnCadence { after: 7, every: 4 };

        let mut steps = vec![
            build("right corner", when_any(&right), StationaryKind::Destructor, right_corner.clone()),
            build("left corner", when_any(&left), StationaryKind::Destructor, left_corner.clone()),
            build("midline right corner", when_any(&midline), StationaryKind::Destructor, right_corner),
            build("midline left corner", when_any(&midline), StationaryKind::Destructor, left_corner),
            spawn("right rush", when_any(&right), MobileKind::Ping, cells(&[[15, 1]]), 1000),
            spawn("left rush", when_any(&left), MobileKind::Ping, cells(&[[12, 1]]), 1000),
            build(
                "corner walls",
                Condition::Always,
                StationaryKind::Filter,
                cells(&[
                    [0, 13], [1, 13], [2, 13], [3, 12], [4, 13], [5, 12],
                    [27, 13], [26, 13], [25, 13], [24, 12], [23, 13], [22, 12],
                ]),
            ),
            build(
                "core turrets",
                Condition::Always,
                StationaryKind::Destructor,
                cells(&[[8, 8], [19, 8], [11, 7], [16, 7]]),
            ),
        ];

        for cell in [[6, 11], [21, 11], [7, 10], [20, 10]] {
            steps.push(build(
                &format!("funnel wall [{}, {}]", cell[0], cell[1]),
                affordable(StationaryKind::Filter.into(), 1.0),
                StationaryKind::Filter,
                cells(&[cell]),
            ));
        }

        steps.extend([
            Step {
                label: Some("breach response".to_owned()),
                when: Condition::Always,
                action: Action::ReactiveDefense {
                    structure: StationaryKind::Destructor,
                },
            },
            spawn("screen", Condition::Always, MobileKind::Scrambler, scramblers.clone(), 1),
            build(
                "inner walls",
                Condition::Always,
                StationaryKind::Filter,
                cells(&[[8, 9], [19, 9], [9, 9], [18, 9]]),
            ),
            build(
                "inner turrets",
                Condition::Always,
                StationaryKind::Destructor,
                cells(&[
                    [9, 8], [10, 8], [18, 8], [17, 8], [9, 7], [10, 7], [18, 7], [17, 7],
                ]),
            ),
            build(
                "encryptor chain",
                affordable(StationaryKind::Encryptor.into(), 7.0),
                StationaryKind::Encryptor,
                cells(&[
                    [4, 11], [5, 10], [6, 9], [7, 8], [8, 7], [9, 6], [10, 5], [11, 4],
                    [4, 12], [3, 13], [5, 11], [6, 10], [7, 9], [10, 6], [11, 6], [11, 5],
                    [12, 6],
                ]),
            ),
            build(
                "right battery",
                Condition::Always,
                StationaryKind::Destructor,
                cells(&[
                    [18, 11], [19, 11], [20, 11], [18, 11], [19, 10], [20, 10], [15, 5],
                    [16, 5], [17, 5],
                ]),
            ),
            build(
                "battery walls",
                Condition::Always,
                StationaryKind::Filter,
                cells(&[[16, 6], [17, 6], [18, 6]]),
            ),
            build(
                "battery rear",
                Condition::Always,
                StationaryKind::Destructor,
                cells(&[[15, 4], [16, 4], [17, 4]]),
            ),
            Step {
                label: Some("emp push".to_owned()),
                when: attack.clone(),
                action: Action::SpawnLeastDamage {
                    candidates: cells(&[[4, 9], [23, 9]]),
                    waves: vec![
                        Wave {
                            unit: MobileKind::Emp,
                            count: 5,
                        },
                        Wave {
                            unit: MobileKind::Ping,
                            count: 1000,
                        },
                    ],
                },
            },
            spawn(
                "off-turn screen",
                Condition::Not {
                    condition: Box::new(attack),
                },
                MobileKind::Scrambler,
                scramblers,
                1,
            ),
        ]);

        Self {
            turret_damage: DEFAULT_TURRET_DAMAGE,
            watches: vec![
                watch("right-flank-outer", [16, 23], [23, 16], ScanAxis::DecreasingDiagonal),
                watch("right-flank-inner", [16, 22], [23, 15], ScanAxis::DecreasingDiagonal),
                watch("left-flank-outer", [4, 16], [11, 23], ScanAxis::IncreasingDiagonal),
                watch("left-flank-inner", [4, 15], [11, 22], ScanAxis::IncreasingDiagonal),
                watch("midline-back", [5, 16], [16, 16], ScanAxis::Horizontal),
                watch("midline-front", [5, 15], [16, 15], ScanAxis::Horizontal),
            ],
            steps,
        }
    }
}

fn validate_condition(
    condition: &Condition,
    step: usize,
    names: &HashSet<&str>,
) -> Result<(), StrategyConfigError> {
    match condition {
        Condition::Always | Condition::Affordable { .. } | Condition::EnemyCount { .. } => Ok(()),
        Condition::Formation { any_of } => {
            match any_of.iter().find(|name| !names.contains(name.as_str())) {
                Some(name) => Err(StrategyConfigError::UnknownFormation {
                    step,
                    name: name.clone(),
                }),
                None => Ok(()),
            }
        }
        Condition::TurnCadence { every, .. } => {
            if *every == 0 {
                Err(StrategyConfigError::ZeroCadence { step })
            } else {
                Ok(())
            }
        }
        Condition::Not { condition } => validate_condition(condition, step, names),
    }
}

fn cells(pairs: &[[i32; 2]]) -> Vec<Coord> {
    pairs.iter().copied().map(Coord::from).collect()
}

fn watch(name: &str, origin: [i32; 2], terminus: [i32; 2], axis: ScanAxis) -> FormationWatch {
    FormationWatch {
        name: name.to_owned(),
        line: ScanLine::new(origin.into(), terminus.into(), axis),
    }
}

fn when_any(names: &[&str]) -> Condition {
    Condition::Formation {
        any_of: names.iter().map(|name| (*name).to_owned()).collect(),
    }
}

fn affordable(unit: UnitKind, multiple: f32) -> Condition {
    Condition::Affordable { unit, multiple }
}

fn build(label: &str, when: Condition, structure: StationaryKind, cells: Vec<Coord>) -> Step {
    Step {
        label: Some(label.to_owned()),
        when,
        action: Action::Build {
            structure,
            cells,
            skip_occupied: false,
        },
    }
}

fn spawn(label: &str, when: Condition, unit: MobileKind, cells: Vec<Coord>, count: u32) -> Step {
    Step {
        label: Some(label.to_owned()),
        when,
        action: Action::Spawn { unit, cells, count },
    }
}
