//! Wall signatures and wildcard patterns over them
//!
//! Positions are always ordered North, East, West, South. A concrete
//! neighborhood holds one wall bit per position; a wildcard pattern fixes
//! some positions and leaves the rest free.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::SimulationError;

/// Direction letter for each position, in N, E, W, S order
pub const POSITION_LETTERS: [char; 4] = ['N', 'E', 'W', 'S'];

/// Marker for a position whose neighbor is not a wall
pub const BLANK: char = 'X';

/// Marker for a position that matches either wall or blank
pub const WILDCARD: char = '*';

/// Number of distinct concrete neighborhoods (2^4)
pub const NEIGHBORHOOD_COUNT: usize = 16;

/// Bit for position `i` (0 = North ... 3 = South)
const fn position_bit(i: usize) -> u8 {
    1 << (3 - i)
}

/// Concrete wall signature around a cell
///
/// Bit layout: N = 8, E = 4, W = 2, S = 1. Displayed as e.g. `NXWS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Neighborhood(u8);

impl Neighborhood {
    /// Build from the 4-bit wall mask (higher bits ignored)
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0b1111)
    }

    /// Build from the four wall flags in N, E, W, S order
    pub fn from_walls(walls: [bool; 4]) -> Self {
        let mut bits = 0;
        for (i, wall) in walls.into_iter().enumerate() {
            if wall {
                bits |= position_bit(i);
            }
        }
        Self(bits)
    }

    /// Raw 4-bit mask
    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Whether position `i` (0 = North ... 3 = South) is a wall
    pub fn is_wall(&self, i: usize) -> bool {
        self.0 & position_bit(i) != 0
    }

    /// All 16 concrete neighborhoods in ascending bit order
    pub fn all() -> impl Iterator<Item = Neighborhood> {
        (0..NEIGHBORHOOD_COUNT as u8).map(Neighborhood)
    }
}

impl fmt::Display for Neighborhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, letter) in POSITION_LETTERS.iter().enumerate() {
            let c = if self.is_wall(i) { *letter } else { BLANK };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl From<Neighborhood> for String {
    fn from(n: Neighborhood) -> Self {
        n.to_string()
    }
}

impl TryFrom<String> for Neighborhood {
    type Error = SimulationError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        let pattern = WildcardPattern::parse(&text)?;
        if pattern.wildcards() != 0 {
            return Err(SimulationError::MalformedPattern {
                pattern: text,
                reason: "concrete neighborhood cannot contain wildcards".to_string(),
            });
        }
        Ok(Neighborhood(pattern.fixed_walls))
    }
}

/// Set of concrete neighborhoods, one bit per neighborhood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct PatternSet(u16);

impl PatternSet {
    /// Empty set
    pub fn empty() -> Self {
        Self(0)
    }

    /// Set containing all 16 neighborhoods
    pub fn full() -> Self {
        Self(u16::MAX)
    }

    /// Add a neighborhood
    pub fn insert(&mut self, n: Neighborhood) {
        self.0 |= 1 << n.bits();
    }

    /// Membership test
    pub fn contains(&self, n: Neighborhood) -> bool {
        self.0 & (1 << n.bits()) != 0
    }

    /// Neighborhoods in both sets
    pub fn intersection(&self, other: &PatternSet) -> PatternSet {
        PatternSet(self.0 & other.0)
    }

    /// Neighborhoods in either set
    pub fn union(&self, other: &PatternSet) -> PatternSet {
        PatternSet(self.0 | other.0)
    }

    /// Neighborhoods not in this set
    pub fn complement(&self) -> PatternSet {
        PatternSet(!self.0)
    }

    /// True when no neighborhood is shared
    pub fn is_disjoint(&self, other: &PatternSet) -> bool {
        self.intersection(other).is_empty()
    }

    /// True when the set holds nothing
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of neighborhoods held
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in ascending bit order
    pub fn iter(&self) -> impl Iterator<Item = Neighborhood> + '_ {
        Neighborhood::all().filter(move |n| self.contains(*n))
    }
}

impl FromIterator<Neighborhood> for PatternSet {
    fn from_iter<I: IntoIterator<Item = Neighborhood>>(iter: I) -> Self {
        let mut set = PatternSet::empty();
        for n in iter {
            set.insert(n);
        }
        set
    }
}

/// Rule pattern with optional wildcards, e.g. `N*W*`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WildcardPattern {
    /// Normalized (uppercase) pattern text
    literal: String,
    /// Positions that are wildcards
    wildcard_mask: u8,
    /// Wall bits of the fixed positions
    fixed_walls: u8,
}

impl WildcardPattern {
    /// Parse a pattern, case-insensitively
    ///
    /// Position `i` accepts only its own direction letter, `X` or `*`.
    pub fn parse(text: &str) -> Result<Self, SimulationError> {
        let literal = text.trim().to_ascii_uppercase();
        let symbols: Vec<char> = literal.chars().collect();
        if symbols.len() != 4 {
            return Err(SimulationError::MalformedPattern {
                pattern: text.to_string(),
                reason: format!("expected 4 symbols, found {}", symbols.len()),
            });
        }

        let mut wildcard_mask = 0;
        let mut fixed_walls = 0;
        for (i, &symbol) in symbols.iter().enumerate() {
            let letter = POSITION_LETTERS[i];
            match symbol {
                WILDCARD => wildcard_mask |= position_bit(i),
                BLANK => {}
                s if s == letter => fixed_walls |= position_bit(i),
                other => {
                    return Err(SimulationError::MalformedPattern {
                        pattern: text.to_string(),
                        reason: format!(
                            "symbol '{}' at position {} must be {}, {} or {}",
                            other,
                            i + 1,
                            letter,
                            BLANK,
                            WILDCARD
                        ),
                    })
                }
            }
        }

        Ok(Self {
            literal,
            wildcard_mask,
            fixed_walls,
        })
    }

    /// Normalized pattern text
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Number of wildcard positions
    pub fn wildcards(&self) -> u32 {
        self.wildcard_mask.count_ones()
    }

    /// Whether a concrete neighborhood agrees on every fixed position
    pub fn matches(&self, n: Neighborhood) -> bool {
        n.bits() & !self.wildcard_mask & 0b1111 == self.fixed_walls
    }

    /// Every concrete neighborhood this pattern matches (2^k of them)
    pub fn expand(&self) -> BTreeSet<Neighborhood> {
        // Walk every subset of the wildcard positions
        let mut out = BTreeSet::new();
        let mut subset: u8 = 0;
        loop {
            out.insert(Neighborhood::from_bits(self.fixed_walls | subset));
            if subset == self.wildcard_mask {
                break;
            }
            subset = subset.wrapping_sub(self.wildcard_mask) & self.wildcard_mask;
        }
        out
    }

    /// Expansion as a bit set
    pub fn pattern_set(&self) -> PatternSet {
        self.expand().into_iter().collect()
    }
}

impl fmt::Display for WildcardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal)
    }
}

/// Parse and expand in one go, returning the concrete patterns as strings
pub fn expand(pattern: &str) -> Result<BTreeSet<String>, SimulationError> {
    let pattern = WildcardPattern::parse(pattern)?;
    Ok(pattern.expand().into_iter().map(|n| n.to_string()).collect())
}
