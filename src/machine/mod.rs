//! PicoBot program representation
//!
//! A program is a rule table partitioned by state:
//! - Wildcard patterns over the N, E, W, S wall signature
//! - One action (move or stay) and one next state per rule
//! - Within a state, no two rules may match the same neighborhood

mod pattern;
mod rule;

pub use pattern::{
    expand, Neighborhood, PatternSet, WildcardPattern, BLANK, NEIGHBORHOOD_COUNT,
    POSITION_LETTERS, WILDCARD,
};
pub use rule::{Action, Direction, Rule};

use crate::SimulationError;
use std::collections::{BTreeMap, BTreeSet};

/// Bot state id
pub type State = u32;

/// Canonical start state
pub const START_STATE: State = 0;

/// Rules grouped by state, in insertion order
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: BTreeMap<State, Vec<Rule>>,
}

impl RuleTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Create fluent builder
    pub fn builder() -> RuleTableBuilder {
        RuleTableBuilder::new()
    }

    /// Expand `pattern` and append the rule to its state's list
    pub fn add_rule(
        &mut self,
        state: State,
        pattern: &str,
        action: Action,
        next_state: State,
    ) -> Result<&Rule, SimulationError> {
        let pattern = WildcardPattern::parse(pattern)?;
        let matches = pattern.pattern_set();
        let list = self.rules.entry(state).or_default();
        list.push(Rule {
            state,
            pattern,
            matches,
            action,
            next_state,
        });
        Ok(&list[list.len() - 1])
    }

    /// Check that no two rules of a state overlap
    ///
    /// Reports the first conflicting pair in insertion order.
    pub fn validate(&self) -> Result<(), SimulationError> {
        for (&state, list) in &self.rules {
            for (i, a) in list.iter().enumerate() {
                for b in &list[i + 1..] {
                    if !a.matches.is_disjoint(&b.matches) {
                        return Err(SimulationError::Conflict {
                            state,
                            first: a.literal().to_string(),
                            second: b.literal().to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// First rule of `state` matching `neighborhood`
    pub fn lookup(&self, state: State, neighborhood: Neighborhood) -> Result<&Rule, SimulationError> {
        self.rules
            .get(&state)
            .and_then(|list| list.iter().find(|rule| rule.matches.contains(neighborhood)))
            .ok_or(SimulationError::NoMatchingRule {
                state,
                neighborhood,
            })
    }

    /// Rules of one state, in insertion order
    pub fn rules(&self, state: State) -> &[Rule] {
        self.rules.get(&state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// States that have at least one rule, ascending
    pub fn states(&self) -> impl Iterator<Item = State> + '_ {
        self.rules.keys().copied()
    }

    /// Neighborhoods of `state` that no rule covers
    pub fn uncovered(&self, state: State) -> PatternSet {
        self.rules(state)
            .iter()
            .fold(PatternSet::empty(), |acc, rule| acc.union(&rule.matches))
            .complement()
    }

    /// Next-state ids that no rule is declared for
    pub fn dangling_states(&self) -> BTreeSet<State> {
        self.rules
            .values()
            .flatten()
            .map(|rule| rule.next_state)
            .filter(|next| !self.rules.contains_key(next))
            .collect()
    }

    /// Total number of rules
    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// True when no rule is declared
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Builder for rule tables (fluent API)
#[derive(Debug, Default)]
pub struct RuleTableBuilder {
    rules: Vec<(State, String, Action, State)>,
}

impl RuleTableBuilder {
    /// Create new builder
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a rule
    pub fn rule(mut self, state: State, pattern: &str, action: Action, next_state: State) -> Self {
        self.rules
            .push((state, pattern.to_string(), action, next_state));
        self
    }

    /// Build and validate the table
    pub fn build(self) -> Result<RuleTable, SimulationError> {
        let mut table = RuleTable::new();
        for (state, pattern, action, next_state) in self.rules {
            table.add_rule(state, &pattern, action, next_state)?;
        }
        table.validate()?;

        for state in table.dangling_states() {
            tracing::warn!(state, "rules transition into a state that has no rules");
        }

        Ok(table)
    }
}
