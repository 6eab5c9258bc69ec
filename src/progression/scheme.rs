//! Set×rep schemes and the cycle a lifter moves through on failure

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separators accepted between the set and rep counts of a label
const SEPARATORS: [char; 4] = ['x', 'X', '×', '*'];

/// Conditions raised while resolving schemes against a cycle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressionError {
    #[error("unknown scheme {0:?}")]
    UnknownScheme(String),

    #[error("scheme cycle is empty")]
    EmptyCycle,

    #[error("scheme {0} appears more than once in the cycle")]
    DuplicateScheme(Scheme),
}

/// A canonical set×rep target, e.g. 3×15
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Scheme {
    pub sets: u32,
    pub reps: u32,
}

impl Scheme {
    pub const fn new(sets: u32, reps: u32) -> Self {
        Self { sets, reps }
    }

    /// Parse a label such as "3x15", "3 x 15", "3X15" or "3×15".
    ///
    /// Whitespace is ignored and both counts must be positive.
    pub fn parse(label: &str) -> Result<Self, ProgressionError> {
        let unknown = || ProgressionError::UnknownScheme(label.to_string());

        let compact: String = label.chars().filter(|c| !c.is_whitespace()).collect();
        let (sets, reps) = compact.split_once(SEPARATORS).ok_or_else(unknown)?;

        let sets: u32 = sets.parse().map_err(|_| unknown())?;
        let reps: u32 = reps.parse().map_err(|_| unknown())?;
        if sets == 0 || reps == 0 {
            return Err(unknown());
        }

        Ok(Self { sets, reps })
    }

    /// Canonical label, always written with `×`
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.sets, self.reps)
    }
}

impl FromStr for Scheme {
    type Err = ProgressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Scheme {
    type Error = ProgressionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Scheme> for String {
    fn from(scheme: Scheme) -> Self {
        scheme.label()
    }
}

/// Default ladder: high reps, then medium, then heavy
pub const DEFAULT_CYCLE: [Scheme; 3] = [Scheme::new(3, 15), Scheme::new(3, 10), Scheme::new(3, 5)];

/// Ordered, non-empty list of distinct schemes.
///
/// Failing a scheme moves to the next entry; failing the last one wraps
/// back to the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeCycle {
    schemes: Vec<Scheme>,
}

impl SchemeCycle {
    pub fn new(schemes: Vec<Scheme>) -> Result<Self, ProgressionError> {
        if schemes.is_empty() {
            return Err(ProgressionError::EmptyCycle);
        }
        for (i, scheme) in schemes.iter().enumerate() {
            if schemes[..i].contains(scheme) {
                return Err(ProgressionError::DuplicateScheme(*scheme));
            }
        }
        Ok(Self { schemes })
    }

    /// Build a cycle from labels in any accepted spelling
    pub fn from_labels<I, S>(labels: I) -> Result<Self, ProgressionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let schemes = labels
            .into_iter()
            .map(|label| Scheme::parse(label.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(schemes)
    }

    pub fn schemes(&self) -> &[Scheme] {
        &self.schemes
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    /// Entry the cycle starts from and wraps back to
    pub fn first(&self) -> Scheme {
        self.schemes[0]
    }

    pub fn get(&self, index: usize) -> Option<Scheme> {
        self.schemes.get(index).copied()
    }

    pub fn labels(&self) -> Vec<String> {
        self.schemes.iter().map(Scheme::label).collect()
    }

    /// Position of `label` in the cycle after normalization
    pub fn index_in_cycle(&self, label: &str) -> Result<usize, ProgressionError> {
        let scheme = Scheme::parse(label)?;
        self.schemes
            .iter()
            .position(|s| *s == scheme)
            .ok_or_else(|| ProgressionError::UnknownScheme(label.to_string()))
    }

    /// Canonical (sets, reps) for a label that belongs to this cycle
    pub fn canonical_scheme_of(&self, label: &str) -> Result<Scheme, ProgressionError> {
        self.index_in_cycle(label).map(|i| self.schemes[i])
    }

    /// Index that follows `index`, and whether the step wrapped around
    pub fn next_after(&self, index: usize) -> (usize, bool) {
        let next = index + 1;
        if next >= self.schemes.len() {
            (0, true)
        } else {
            (next, false)
        }
    }
}

impl Default for SchemeCycle {
    fn default() -> Self {
        Self {
            schemes: DEFAULT_CYCLE.to_vec(),
        }
    }
}
