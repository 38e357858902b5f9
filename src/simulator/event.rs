//! Per-step records handed to the presentation layer

use std::fmt;

use serde::Serialize;

use crate::grid::Position;
use crate::machine::{Direction, Neighborhood, State};

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Termination {
    /// Every free cell has been visited
    CoverageComplete,

    /// Same rule fired twice in a row leaving bot and state unchanged
    Stalled,

    /// Configured step ceiling reached
    StepLimitReached,

    /// A rule tried to move into a wall
    BlockedMove {
        /// Direction of the attempted move
        direction: Direction,
    },

    /// No rule for the current state and neighborhood
    NoMatchingRule {
        /// State at the failing step
        state: State,
        /// Neighborhood at the failing step
        neighborhood: Neighborhood,
    },
}

impl Termination {
    /// True for the rule-table failures
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            Termination::BlockedMove { .. } | Termination::NoMatchingRule { .. }
        )
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::CoverageComplete => f.write_str("Coverage reached!"),
            Termination::Stalled => f.write_str("Bot stopped!"),
            Termination::StepLimitReached => f.write_str("Max. steps reached!"),
            Termination::BlockedMove { direction } => {
                write!(f, "Error: cannot move to the {}!", direction)
            }
            Termination::NoMatchingRule {
                state,
                neighborhood,
            } => write!(
                f,
                "Error: no rule for state {} and neighborhood {}!",
                state, neighborhood
            ),
        }
    }
}

/// Outcome of one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepEvent {
    /// 1-based step number
    pub step: usize,

    /// Bot cell after the step
    pub position: Position,

    /// Bot state after the step
    pub state: State,

    /// Free cells still unvisited
    pub remaining: usize,

    /// Literal pattern of the rule that fired (`None` when none could)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,

    /// Set on the last event of a run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination: Option<Termination>,
}

impl StepEvent {
    /// Whether this event ends the run
    pub fn is_terminal(&self) -> bool {
        self.termination.is_some()
    }
}

impl fmt::Display for StepEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bot at: {}, cells left: {}",
            self.position, self.remaining
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_line() {
        let event = StepEvent {
            step: 4,
            position: Position::new(2, 5),
            state: 1,
            remaining: 12,
            rule: Some("NX*S".to_string()),
            termination: None,
        };
        assert_eq!(event.to_string(), "bot at: (2, 5), cells left: 12");
        assert!(!event.is_terminal());
    }

    #[test]
    fn test_event_json() {
        let event = StepEvent {
            step: 1,
            position: Position::new(1, 1),
            state: 0,
            remaining: 0,
            rule: None,
            termination: Some(Termination::BlockedMove {
                direction: Direction::North,
            }),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"step":1,"position":{"row":1,"col":1},"state":0,"remaining":0,"termination":{"reason":"blocked_move","direction":"north"}}"#
        );
    }
}
