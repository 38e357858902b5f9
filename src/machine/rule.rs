//! Single rule: (state, pattern) → (action, next state)

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{PatternSet, State, WildcardPattern};
use crate::SimulationError;

/// One rule of a PicoBot program
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// State this rule belongs to
    pub state: State,

    /// Pattern as declared (normalized)
    pub pattern: WildcardPattern,

    /// Concrete neighborhoods the pattern matches
    pub matches: PatternSet,

    /// What the bot does when the rule fires
    pub action: Action,

    /// State after the rule fires
    pub next_state: State,
}

impl Rule {
    /// Literal pattern text
    pub fn literal(&self) -> &str {
        self.pattern.literal()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {} {}",
            self.state, self.pattern, self.action, self.next_state
        )
    }
}

/// Compass direction of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Row - 1
    North,
    /// Col + 1
    East,
    /// Col - 1
    West,
    /// Row + 1
    South,
}

impl Direction {
    /// (row, col) offset of a single move
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
            Direction::South => (1, 0),
        }
    }

    /// Rule-file letter
    pub fn letter(&self) -> char {
        match self {
            Direction::North => 'N',
            Direction::East => 'E',
            Direction::West => 'W',
            Direction::South => 'S',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::West => "west",
            Direction::South => "south",
        };
        f.write_str(name)
    }
}

/// Bot action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move one cell
    Move(Direction),

    /// Stay put (`X`)
    Stay,
}

impl Action {
    /// Parse an action letter, case-insensitively
    pub fn parse(text: &str) -> Result<Self, SimulationError> {
        match text.trim().to_ascii_uppercase().as_str() {
            "N" => Ok(Action::Move(Direction::North)),
            "E" => Ok(Action::Move(Direction::East)),
            "W" => Ok(Action::Move(Direction::West)),
            "S" => Ok(Action::Move(Direction::South)),
            "X" => Ok(Action::Stay),
            _ => Err(SimulationError::MalformedAction(text.to_string())),
        }
    }

    /// Direction moved, if any
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Action::Move(dir) => Some(*dir),
            Action::Stay => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move(dir) => write!(f, "{}", dir.letter()),
            Action::Stay => f.write_str("X"),
        }
    }
}
