//! Text formats for grids, rule files and start coordinates
//!
//! Grid files hold whitespace-separated rows of `0` (free) and `1` (wall).
//! Rule files hold one rule per line:
//!
//! ```text
//! # state pattern -> action next_state
//! 0 x*** -> N 0
//! 0 N*** -> X 1
//! ```
//!
//! Blank lines and `#` comments are skipped; anything after the fifth field
//! is ignored.

use thiserror::Error;

use crate::grid::{Grid, Position};
use crate::machine::{Action, RuleTable, State, WildcardPattern};
use crate::SimulationError;

/// Errors raised while reading the text inputs
#[derive(Error, Debug)]
pub enum LoadError {
    /// Grid line could not be parsed
    #[error("grid line {line}: {message}")]
    Grid {
        /// 1-based line number
        line: usize,
        /// Problem description
        message: String,
    },

    /// Rule line could not be parsed
    #[error("rule line {line}: {message}")]
    Rule {
        /// 1-based line number
        line: usize,
        /// Problem description
        message: String,
    },

    /// Start coordinate is not `row, col`
    #[error("start '{0}' is not of the form \"row, col\"")]
    Start(String),

    /// Parsed input violates an engine invariant
    #[error(transparent)]
    Invalid(#[from] SimulationError),
}

/// Parse a grid file into a bordered grid
pub fn parse_grid(text: &str) -> Result<Grid, LoadError> {
    let mut rows = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|token| match token {
                "0" => Ok(0u8),
                "1" => Ok(1u8),
                other => Err(LoadError::Grid {
                    line: idx + 1,
                    message: format!("expected 0 or 1, found '{}'", other),
                }),
            })
            .collect::<Result<Vec<u8>, LoadError>>()?;
        rows.push(row);
    }
    Ok(Grid::build(&rows)?)
}

/// Parse a rule file into a validated rule table
pub fn parse_rules(text: &str) -> Result<RuleTable, LoadError> {
    let mut builder = RuleTable::builder();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let rule_error = |message: String| LoadError::Rule {
            line: idx + 1,
            message,
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 5 {
            return Err(rule_error(format!(
                "expected 'state pattern -> action next_state', found {} fields",
                fields.len()
            )));
        }
        let state: State = fields[0]
            .parse()
            .map_err(|_| rule_error(format!("invalid state '{}'", fields[0])))?;
        let action = Action::parse(fields[3]).map_err(|err| rule_error(err.to_string()))?;
        let next_state: State = fields[4]
            .parse()
            .map_err(|_| rule_error(format!("invalid next state '{}'", fields[4])))?;

        // Pattern errors surface from the builder; check here for the line number
        WildcardPattern::parse(fields[1])
            .map_err(|err| rule_error(err.to_string()))?;

        builder = builder.rule(state, fields[1], action, next_state);
    }
    Ok(builder.build()?)
}

/// Parse a 1-based `"row, col"` start coordinate
pub fn parse_start(text: &str) -> Result<Position, LoadError> {
    let mut parts = text.split(',').map(str::trim);
    let (Some(row), Some(col), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(LoadError::Start(text.to_string()));
    };
    let row: usize = row
        .parse()
        .map_err(|_| LoadError::Start(text.to_string()))?;
    let col: usize = col
        .parse()
        .map_err(|_| LoadError::Start(text.to_string()))?;
    Ok(Position::new(row, col))
}
