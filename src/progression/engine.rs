//! Next-session suggestion from the last logged attempt
//!
//! Success keeps the scheme and adds weight. Failure moves one step down the
//! cycle, wrapping to the first scheme after the last one.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::scheme::{ProgressionError, Scheme, SchemeCycle};
use crate::db::WorkoutRecord;

/// Weight suggested when an exercise has no history
pub const DEFAULT_BASELINE_WEIGHT: f64 = 20.0;

/// What happens to the weight when a failed attempt moves to the next scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightPolicy {
    /// Carry the weight into the next scheme unchanged
    Hold,
    /// Drop one increment when wrapping back to the first scheme, hold otherwise
    #[default]
    DeloadOnWrap,
}

/// Which rule produced a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionBasis {
    /// No history: starting scheme at the baseline weight
    Start,
    /// Last attempt succeeded: same scheme, heavier
    Progress,
    /// Last attempt failed: next scheme, same weight
    Advance,
    /// Last attempt failed at the end of the cycle: first scheme, lighter
    Deload,
    /// Last scheme was not recognised: fallback scheme, same weight
    Fallback,
}

impl SuggestionBasis {
    pub fn describe(&self) -> &'static str {
        match self {
            SuggestionBasis::Start => "no history yet, starting out",
            SuggestionBasis::Progress => "last session hit target, adding weight",
            SuggestionBasis::Advance => "last session missed target, moving to next scheme",
            SuggestionBasis::Deload => "missed target at end of cycle, restarting lighter",
            SuggestionBasis::Fallback => "last scheme not recognised, using default scheme",
        }
    }
}

/// Next workout to present as defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub weight: f64,
    pub sets: u32,
    pub target_reps: u32,
    pub scheme: String,
    pub basis: SuggestionBasis,
}

impl Suggestion {
    fn new(weight: f64, scheme: Scheme, basis: SuggestionBasis) -> Self {
        Self {
            weight: weight.max(0.0),
            sets: scheme.sets,
            target_reps: scheme.reps,
            scheme: scheme.label(),
            basis,
        }
    }
}

/// Stateless progression rule over a fixed cycle
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionEngine {
    cycle: SchemeCycle,
    baseline_weight: f64,
    policy: WeightPolicy,
    fallback: Scheme,
}

impl ProgressionEngine {
    /// Engine with the default baseline, policy and fallback (first entry)
    pub fn new(cycle: SchemeCycle) -> Self {
        let fallback = cycle.first();
        Self {
            cycle,
            baseline_weight: DEFAULT_BASELINE_WEIGHT,
            policy: WeightPolicy::default(),
            fallback,
        }
    }

    pub fn with_baseline_weight(mut self, weight: f64) -> Self {
        self.baseline_weight = weight.max(0.0);
        self
    }

    pub fn with_policy(mut self, policy: WeightPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Scheme used when a record's scheme is not in the cycle; must be a cycle entry
    pub fn with_fallback(mut self, label: &str) -> Result<Self, ProgressionError> {
        self.fallback = self.cycle.canonical_scheme_of(label)?;
        Ok(self)
    }

    pub fn cycle(&self) -> &SchemeCycle {
        &self.cycle
    }

    pub fn baseline_weight(&self) -> f64 {
        self.baseline_weight
    }

    pub fn policy(&self) -> WeightPolicy {
        self.policy
    }

    pub fn fallback(&self) -> Scheme {
        self.fallback
    }

    /// Suggest the next session.
    ///
    /// `starting_scheme` is only consulted when `last` is `None`. Unknown
    /// labels never fail: they resolve to the first entry (no history) or
    /// the fallback scheme (history).
    pub fn suggest_next(
        &self,
        last: Option<&WorkoutRecord>,
        increment: f64,
        starting_scheme: Option<&str>,
    ) -> Suggestion {
        let Some(last) = last else {
            return self.starting_suggestion(starting_scheme);
        };

        let weight = last.weight.max(0.0);
        let index = match self.cycle.index_in_cycle(&last.scheme) {
            Ok(index) => index,
            Err(err) => {
                warn!(exercise = %last.exercise, %err, fallback = %self.fallback, "Falling back to default scheme");
                return Suggestion::new(weight, self.fallback, SuggestionBasis::Fallback);
            }
        };
        let current = self.cycle.schemes()[index];

        if last.success {
            debug!(exercise = %last.exercise, scheme = %current, "Progressing weight");
            return Suggestion::new(weight + increment, current, SuggestionBasis::Progress);
        }

        let (next, wrapped) = self.cycle.next_after(index);
        let scheme = self.cycle.schemes()[next];
        debug!(exercise = %last.exercise, from = %current, to = %scheme, wrapped, "Advancing scheme");

        match (wrapped, self.policy) {
            (true, WeightPolicy::DeloadOnWrap) => {
                Suggestion::new(weight - increment, scheme, SuggestionBasis::Deload)
            }
            _ => Suggestion::new(weight, scheme, SuggestionBasis::Advance),
        }
    }

    fn starting_suggestion(&self, starting_scheme: Option<&str>) -> Suggestion {
        let scheme = match starting_scheme.map(|label| self.cycle.canonical_scheme_of(label)) {
            Some(Ok(scheme)) => scheme,
            Some(Err(err)) => {
                warn!(%err, "Ignoring starting scheme outside the cycle");
                self.cycle.first()
            }
            None => self.cycle.first(),
        };
        Suggestion::new(self.baseline_weight, scheme, SuggestionBasis::Start)
    }
}

impl Default for ProgressionEngine {
    fn default() -> Self {
        Self::new(SchemeCycle::default())
    }
}
