//! Bot dynamics
//!
//! Each step reads the wall signature around the bot, fires the one rule
//! matching `(state, signature)`, moves the bot, records the visit and checks
//! for termination. Checks run in a fixed order: coverage, stall, step
//! ceiling.

mod bot;
mod event;

pub use bot::Bot;
pub use event::{StepEvent, Termination};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::grid::{Grid, Position};
use crate::machine::{RuleTable, State};
use crate::SimulationError;

/// Run parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Start cell; drawn uniformly from the free cells when unset
    pub start: Option<Position>,

    /// Step ceiling; unlimited when unset
    pub max_steps: Option<usize>,

    /// Seed for the start-cell draw; entropy when unset
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// Start at a fixed cell, no step ceiling
    pub fn from_start(start: Position) -> Self {
        Self {
            start: Some(start),
            ..Self::default()
        }
    }

    /// Random start drawn from a seeded generator
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Set the step ceiling
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}

/// What the previous step left behind, for stall detection
#[derive(Debug, Clone, PartialEq, Eq)]
struct StepRecord {
    rule: String,
    state: State,
    position: Position,
}

/// Totals of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Events emitted, the terminal one included
    pub steps: usize,

    /// Final event
    pub last: Option<StepEvent>,

    /// Why the run ended
    pub termination: Option<Termination>,
}

/// Steps a bot over a grid according to a rule table
#[derive(Debug)]
pub struct Simulator {
    grid: Grid,
    rules: RuleTable,
    bot: Bot,
    previous: Option<StepRecord>,
    steps: usize,
    max_steps: Option<usize>,
    finished: Option<Termination>,
}

impl Simulator {
    /// Place the bot and mark its start cell visited
    ///
    /// `rules` is checked with [`RuleTable::validate`] first, so a table put
    /// together with bare `add_rule` calls cannot overlap at run time.
    pub fn new(
        mut grid: Grid,
        rules: RuleTable,
        config: SimulationConfig,
    ) -> Result<Self, SimulationError> {
        rules.validate()?;

        let start = match config.start {
            Some(pos) => {
                if !grid.contains(pos) {
                    return Err(SimulationError::InvalidStart(format!(
                        "{} is outside the {}x{} grid",
                        pos,
                        grid.rows(),
                        grid.cols()
                    )));
                }
                if grid.is_wall(pos) {
                    return Err(SimulationError::InvalidStart(format!("{} is a wall", pos)));
                }
                pos
            }
            None => {
                let mut rng = match config.seed {
                    Some(seed) => ChaCha8Rng::seed_from_u64(seed),
                    None => ChaCha8Rng::from_entropy(),
                };
                grid.random_free_cell(&mut rng).ok_or_else(|| {
                    SimulationError::InvalidStart("grid has no free cell".to_string())
                })?
            }
        };

        grid.mark_visited(start);
        tracing::info!(
            %start,
            remaining = grid.remaining_unvisited(),
            rules = rules.len(),
            "bot placed"
        );

        Ok(Self {
            grid,
            rules,
            bot: Bot::initial(start),
            previous: None,
            steps: 0,
            max_steps: config.max_steps,
            finished: None,
        })
    }

    /// Grid with the current visited marks
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Rule table being executed
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Current bot configuration
    pub fn bot(&self) -> Bot {
        self.bot
    }

    /// Completed steps
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Termination reason once the run has ended
    pub fn termination(&self) -> Option<Termination> {
        self.finished
    }

    /// Execute one step
    ///
    /// Rule faults end the run and are returned as errors; the bot is left
    /// where it was. Once the run has ended every call returns
    /// [`SimulationError::Finished`].
    pub fn step(&mut self) -> Result<StepEvent, SimulationError> {
        if let Some(reason) = self.finished {
            return Err(SimulationError::Finished(reason));
        }

        match self.advance() {
            Ok(event) => Ok(event),
            Err(err) => {
                self.finished = err.termination();
                tracing::warn!(step = self.steps + 1, error = %err, "run aborted");
                Err(err)
            }
        }
    }

    fn advance(&mut self) -> Result<StepEvent, SimulationError> {
        // 1. Read the wall signature
        let position = self.bot.position();
        let state = self.bot.state();
        let neighborhood = self.grid.neighborhood(position);

        // 2. Find the rule
        let rule = self.rules.lookup(state, neighborhood)?;

        // 3. Resolve the move
        let target = match rule.action.direction() {
            Some(direction) => {
                let target = position.offset(direction.delta());
                if self.grid.is_wall(target) {
                    return Err(SimulationError::BlockedMove {
                        rule: rule.literal().to_string(),
                        direction,
                        state,
                        position,
                    });
                }
                target
            }
            None => position,
        };

        // 4. Commit
        self.bot.apply(rule, target);
        self.grid.mark_visited(target);
        self.steps += 1;

        let record = StepRecord {
            rule: rule.literal().to_string(),
            state: self.bot.state(),
            position: target,
        };
        let remaining = self.grid.remaining_unvisited();

        // 5. Termination, coverage first
        let termination = if remaining == 0 {
            Some(Termination::CoverageComplete)
        } else if self.previous.as_ref() == Some(&record) {
            Some(Termination::Stalled)
        } else if self.max_steps.is_some_and(|max| self.steps >= max) {
            Some(Termination::StepLimitReached)
        } else {
            None
        };

        tracing::debug!(
            step = self.steps,
            %neighborhood,
            rule = %record.rule,
            action = %rule.action,
            %target,
            state = record.state,
            remaining,
            "step"
        );

        let event = StepEvent {
            step: self.steps,
            position: target,
            state: record.state,
            remaining,
            rule: Some(record.rule.clone()),
            termination,
        };

        self.previous = Some(record);
        if let Some(reason) = termination {
            tracing::info!(steps = self.steps, %reason, "run finished");
            self.finished = Some(reason);
        }

        Ok(event)
    }

    /// Drive the run to its end
    pub fn run(&mut self) -> RunSummary {
        let mut steps = 0;
        let mut last = None;
        for event in self.by_ref() {
            steps += 1;
            last = Some(event);
        }
        RunSummary {
            steps,
            termination: self.finished,
            last,
        }
    }
}

/// Events until (and including) the terminal one
///
/// A rule fault becomes a final event at the bot's unchanged position,
/// carrying the fault as its termination.
impl Iterator for Simulator {
    type Item = StepEvent;

    fn next(&mut self) -> Option<StepEvent> {
        if self.finished.is_some() {
            return None;
        }

        match self.step() {
            Ok(event) => Some(event),
            Err(err) => {
                let rule = match &err {
                    SimulationError::BlockedMove { rule, .. } => Some(rule.clone()),
                    _ => None,
                };
                Some(StepEvent {
                    step: self.steps + 1,
                    position: self.bot.position(),
                    state: self.bot.state(),
                    remaining: self.grid.remaining_unvisited(),
                    rule,
                    termination: err.termination(),
                })
            }
        }
    }
}
