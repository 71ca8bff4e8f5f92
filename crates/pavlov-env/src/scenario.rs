//! Named prediction scenarios and their time series
//!
//! A harness queries the agent with the same `(event, environment)` pairs
//! after every learn cycle and keeps one series per scenario, so the learning
//! curve of each can be plotted afterwards.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use pavlov_agent::Respondent;
use pavlov_core::{EnvironmentState, EventId, FunctionApproximator, Result};

/// A single scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Event to predict
    pub event: EventId,
    /// Environment to predict in, `None` for the agent's current one
    pub environment: Option<EnvironmentState>,
}

/// Ordered, named scenarios
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioSet {
    scenarios: IndexMap<String, Scenario>,
}

impl ScenarioSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scenario, replacing any scenario of the same name
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        event: EventId,
        environment: Option<EnvironmentState>,
    ) {
        self.scenarios
            .insert(name.into(), Scenario { event, environment });
    }

    /// Builder form of [`insert`](Self::insert)
    #[must_use]
    pub fn with(
        mut self,
        name: impl Into<String>,
        event: EventId,
        environment: Option<EnvironmentState>,
    ) -> Self {
        self.insert(name, event, environment);
        self
    }

    /// Look up a scenario
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.get(name)
    }

    /// Scenarios in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scenario)> {
        self.scenarios.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of scenarios
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Check if there are no scenarios
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Predict every scenario against `agent`
    pub fn predict<F: FunctionApproximator>(
        &self,
        agent: &Respondent<F>,
    ) -> Result<IndexMap<String, f64>> {
        self.iter()
            .map(|(name, scenario)| {
                let predicted =
                    agent.predict(scenario.event, scenario.environment.as_ref(), None)?;
                Ok((name.to_string(), predicted))
            })
            .collect()
    }
}

/// Per-scenario prediction series of one experiment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionLog {
    /// Run identifier
    pub id: Uuid,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the last sample was taken
    pub updated_at: Option<DateTime<Utc>>,
    /// One series per scenario, in scenario order
    pub series: IndexMap<String, Vec<f64>>,
}

impl Default for PredictionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionLog {
    /// Start an empty log
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            updated_at: None,
            series: IndexMap::new(),
        }
    }

    /// Append one prediction per scenario
    ///
    /// Nothing is appended if any prediction fails.
    pub fn record<F: FunctionApproximator>(
        &mut self,
        scenarios: &ScenarioSet,
        agent: &Respondent<F>,
    ) -> Result<()> {
        let predictions = scenarios.predict(agent)?;
        for (name, predicted) in predictions {
            self.series.entry(name).or_default().push(predicted);
        }
        self.updated_at = Some(Utc::now());
        Ok(())
    }

    /// Series for one scenario
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(Vec::as_slice)
    }

    /// Number of samples in the longest series
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write as pretty JSON
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_order_and_replaces() {
        let mut set = ScenarioSet::new()
            .with("b", EventId(1), None)
            .with("a", EventId(0), None);
        set.insert("b", EventId(2), Some(EnvironmentState::from([("x", 0.5)])));

        let names: Vec<_> = set.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(set.get("b").map(|s| s.event), Some(EventId(2)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_empty_log_serializes() {
        let log = PredictionLog::new();
        assert_eq!(log.len(), 0);
        let value: serde_json::Value = serde_json::from_str(&log.to_json().unwrap()).unwrap();
        assert!(value["series"].as_object().unwrap().is_empty());
        assert!(value["updated_at"].is_null());
    }
}
