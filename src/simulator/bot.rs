//! Bot configuration: where it stands and which state it is in

use crate::grid::Position;
use crate::machine::{Rule, State, START_STATE};

/// Current bot configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bot {
    /// Current cell
    position: Position,

    /// Current state id
    state: State,
}

impl Bot {
    /// Bot at `position` in the start state
    pub fn initial(position: Position) -> Self {
        Self {
            position,
            state: START_STATE,
        }
    }

    /// Current cell
    pub fn position(&self) -> Position {
        self.position
    }

    /// Current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Move to `position` and take the rule's next state
    pub(crate) fn apply(&mut self, rule: &Rule, position: Position) {
        self.position = position;
        self.state = rule.next_state;
    }
}
