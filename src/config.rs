//! Progression settings loaded from an optional JSON file

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::exercises::DEFAULT_INCREMENT;
use crate::progression::engine::DEFAULT_BASELINE_WEIGHT;
use crate::progression::scheme::DEFAULT_CYCLE;
use crate::progression::{IncrementTable, Progression, ProgressionEngine, SchemeCycle, WeightPolicy};

/// File-level settings; every field is optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgressionConfig {
    pub cycle: Vec<String>,
    pub baseline_weight: f64,
    pub default_increment: f64,
    /// Merged over the built-in lift table
    pub increments: BTreeMap<String, f64>,
    pub weight_policy: WeightPolicy,
    /// Defaults to the first cycle entry
    pub fallback_scheme: Option<String>,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            cycle: DEFAULT_CYCLE.iter().map(|s| s.label()).collect(),
            baseline_weight: DEFAULT_BASELINE_WEIGHT,
            default_increment: DEFAULT_INCREMENT,
            increments: BTreeMap::new(),
            weight_policy: WeightPolicy::default(),
            fallback_scheme: None,
        }
    }
}

impl ProgressionConfig {
    /// Read settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        info!(path = %path.display(), "Loaded progression config");
        Ok(config)
    }

    /// Read settings from `path` if given, built-in defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate and build the read-only progression model
    pub fn build(&self) -> Result<Progression> {
        ensure!(
            self.baseline_weight.is_finite() && self.baseline_weight >= 0.0,
            "baseline_weight must be a non-negative number"
        );
        ensure!(
            self.default_increment.is_finite() && self.default_increment >= 0.0,
            "default_increment must be a non-negative number"
        );

        let cycle = SchemeCycle::from_labels(&self.cycle).context("Invalid scheme cycle")?;
        let mut engine = ProgressionEngine::new(cycle)
            .with_baseline_weight(self.baseline_weight)
            .with_policy(self.weight_policy);
        if let Some(fallback) = &self.fallback_scheme {
            engine = engine
                .with_fallback(fallback)
                .context("fallback_scheme must be one of the cycle entries")?;
        }

        let mut increments = IncrementTable::with_known_lifts(self.default_increment);
        for (exercise, step) in &self.increments {
            ensure!(
                step.is_finite() && *step >= 0.0,
                "increment for {exercise} must be a non-negative number"
            );
            increments.set(exercise, *step);
        }

        Ok(Progression::new(engine, increments))
    }

    /// Settings as the engine will actually apply them
    pub fn effective(progression: &Progression) -> Self {
        let engine = progression.engine();
        Self {
            cycle: engine.cycle().labels(),
            baseline_weight: engine.baseline_weight(),
            default_increment: progression.increments().default_increment(),
            increments: progression.increments().overrides().clone(),
            weight_policy: engine.policy(),
            fallback_scheme: Some(engine.fallback().label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_builds() {
        let progression = ProgressionConfig::default().build().unwrap();
        let engine = progression.engine();
        assert_eq!(engine.cycle().labels(), vec!["3×15", "3×10", "3×5"]);
        assert_eq!(engine.baseline_weight(), 20.0);
        assert_eq!(engine.policy(), WeightPolicy::DeloadOnWrap);
        assert_eq!(progression.increment_for("Squat"), 5.0);
        assert_eq!(progression.increment_for("Curl"), 2.5);
    }

    #[test]
    fn test_load_partial_file() {
        let file = write_config(
            r#"{
                "cycle": ["3x15", "3x10", "5x5"],
                "weight_policy": "hold",
                "increments": { "Curl": 1.0 }
            }"#,
        );
        let config = ProgressionConfig::load(file.path()).unwrap();
        assert_eq!(config.baseline_weight, 20.0);
        assert_eq!(config.weight_policy, WeightPolicy::Hold);

        let progression = config.build().unwrap();
        assert_eq!(progression.engine().cycle().labels(), vec!["3×15", "3×10", "5×5"]);
        assert_eq!(progression.increment_for("curl"), 1.0);
        assert_eq!(progression.increment_for("Deadlift"), 5.0);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ProgressionConfig::load(Path::new("/nonexistent/liftlog.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let file = write_config(r#"{ "cycles": ["3x15"] }"#);
        assert!(ProgressionConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_or_default() {
        assert_eq!(ProgressionConfig::load_or_default(None).unwrap(), ProgressionConfig::default());
    }

    #[test]
    fn test_invalid_settings() {
        let mut config = ProgressionConfig {
            cycle: vec![],
            ..Default::default()
        };
        assert!(config.build().is_err());

        config.cycle = vec!["3x15".into(), "3 x 15".into()];
        assert!(config.build().is_err());

        config.cycle = vec!["3x15".into(), "3x10".into()];
        config.fallback_scheme = Some("5x5".into());
        assert!(config.build().is_err());

        config.fallback_scheme = None;
        config.baseline_weight = -1.0;
        assert!(config.build().is_err());

        config.baseline_weight = 20.0;
        config.increments.insert("Squat".into(), -5.0);
        assert!(config.build().is_err());
    }

    #[test]
    fn test_fallback_scheme() {
        let config = ProgressionConfig {
            fallback_scheme: Some("3 x 10".into()),
            ..Default::default()
        };
        let progression = config.build().unwrap();
        assert_eq!(progression.engine().fallback().label(), "3×10");
    }

    #[test]
    fn test_effective_round_trips() {
        let progression = ProgressionConfig::default().build().unwrap();
        let effective = ProgressionConfig::effective(&progression);
        assert_eq!(effective.fallback_scheme.as_deref(), Some("3×15"));
        assert_eq!(effective.increments.get("squat"), Some(&5.0));

        let json = serde_json::to_string(&effective).unwrap();
        let parsed: ProgressionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.build().unwrap().engine(), progression.engine());
    }
}
