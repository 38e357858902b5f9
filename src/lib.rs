//! # PicoBot rule engine
//!
//! A bot lives on a free cell of a walled grid. At every step a rule table
//! maps `(state, neighborhood)` to `(action, next state)`, and the run ends
//! when every free cell has been visited, when the bot stalls, when a step
//! ceiling is reached, or when the rule table breaks down.
//!
//! ## Core pieces
//!
//! 1. **Pattern expansion**: `N*W*` style wildcard patterns expand to the
//!    concrete wall signatures they match
//! 2. **Rule table**: rules grouped per state, validated for overlaps once
//! 3. **Step function**: deterministic move/transition/visit bookkeeping
//! 4. **Termination**: coverage, stall, step ceiling and fatal rule errors
//!
//! ## Usage Example
//!
//! ```
//! use picobot::{Action, Direction, Grid, Position, RuleTable, SimulationConfig, Simulator, Termination};
//!
//! let grid = Grid::build(&[vec![0, 0, 0]]).unwrap();
//! let rules = RuleTable::builder()
//!     .rule(0, "NX*S", Action::Move(Direction::East), 0)
//!     .build()
//!     .unwrap();
//!
//! let config = SimulationConfig::from_start(Position::new(1, 1));
//! let mut sim = Simulator::new(grid, rules, config).unwrap();
//! let summary = sim.run();
//! assert_eq!(summary.termination, Some(Termination::CoverageComplete));
//! assert_eq!(summary.steps, 2);
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

pub mod grid;      // Bordered grid environment
pub mod machine;   // Wildcard patterns and the rule table
pub mod simulator; // Bot dynamics and termination
pub mod io;        // Grid/rule/start text loaders
pub mod render;    // Console frames

pub use grid::{Cell, Grid, Position};
pub use machine::{
    Action, Direction, Neighborhood, PatternSet, Rule, RuleTable, RuleTableBuilder, State,
    WildcardPattern,
};
pub use simulator::{Bot, RunSummary, SimulationConfig, Simulator, StepEvent, Termination};

use thiserror::Error;

/// Errors raised while building or running a PicoBot program
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// Rule pattern is not exactly four position-appropriate symbols
    #[error("malformed pattern '{pattern}': {reason}")]
    MalformedPattern {
        /// Pattern text as written in the rule
        pattern: String,
        /// What is wrong with it
        reason: String,
    },

    /// Rule action is not one of N, E, W, S, X
    #[error("malformed action '{0}': expected one of N, E, W, S, X")]
    MalformedAction(String),

    /// Two rules of the same state match a common neighborhood
    #[error("repeat rules {first} and {second} in state {state}")]
    Conflict {
        /// State both rules belong to
        state: State,
        /// Literal pattern of the earlier rule
        first: String,
        /// Literal pattern of the later rule
        second: String,
    },

    /// Grid matrix is empty, ragged, or holds values other than 0/1
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// Requested start cell is out of bounds or a wall, or no free cell exists
    #[error("invalid start: {0}")]
    InvalidStart(String),

    /// No rule covers the current (state, neighborhood) pair
    #[error("no rule for state {state} and neighborhood {neighborhood}")]
    NoMatchingRule {
        /// Bot state at the failing step
        state: State,
        /// Neighborhood seen at the failing step
        neighborhood: Neighborhood,
    },

    /// A rule tried to move the bot into a wall
    #[error("rule {rule} cannot move to the {direction} from {position} in state {state}")]
    BlockedMove {
        /// Literal pattern of the rule that fired
        rule: String,
        /// Direction of the attempted move
        direction: Direction,
        /// Bot state at the failing step
        state: State,
        /// Bot position at the failing step
        position: Position,
    },

    /// The run already reached a terminal condition
    #[error("simulation already finished: {0}")]
    Finished(Termination),
}

impl SimulationError {
    /// Termination reason for errors that end a run mid-flight
    ///
    /// Load-time errors return `None`: they never reach the step loop.
    pub fn termination(&self) -> Option<Termination> {
        match self {
            SimulationError::NoMatchingRule {
                state,
                neighborhood,
            } => Some(Termination::NoMatchingRule {
                state: *state,
                neighborhood: *neighborhood,
            }),
            SimulationError::BlockedMove { direction, .. } => Some(Termination::BlockedMove {
                direction: *direction,
            }),
            _ => None,
        }
    }
}
