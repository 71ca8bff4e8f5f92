//! Agent configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::{ApproximatorConfig, EncodingMode, PavlovError, Result};

/// Default training passes per learn cycle
pub const DEFAULT_EPOCHS: usize = 2000;
/// Default hidden layer width
pub const DEFAULT_HIDDEN_WIDTH: usize = 150;
/// Default gradient step
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Configuration for a respondent agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Number of past events encoded as features
    pub sequence_memory: usize,
    /// Hidden layer width of the approximator
    pub hidden_width: usize,
    /// Approximator learning rate
    pub learning_rate: f64,
    /// Training passes per learn cycle
    pub epochs: usize,
    /// Event encoding mode
    pub encoding: EncodingMode,
    /// Seed for approximator initialisation
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            sequence_memory: 0,
            hidden_width: DEFAULT_HIDDEN_WIDTH,
            learning_rate: DEFAULT_LEARNING_RATE,
            epochs: DEFAULT_EPOCHS,
            encoding: EncodingMode::Scalar,
            seed: None,
        }
    }
}

impl AgentConfig {
    /// Parse a configuration from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PavlovError::Configuration(format!("invalid agent config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        debug!(path = %path.display(), ?config, "loaded agent config");
        Ok(config)
    }

    /// Check that every parameter is usable
    pub fn validate(&self) -> Result<()> {
        if self.hidden_width == 0 {
            return Err(PavlovError::Configuration(
                "hidden_width must be at least 1".to_string(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(PavlovError::Configuration(format!(
                "learning_rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        if self.epochs == 0 {
            return Err(PavlovError::Configuration(
                "epochs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Approximator parameters for a given input width
    #[must_use]
    pub fn approximator(&self, input_width: usize) -> ApproximatorConfig {
        ApproximatorConfig {
            input_width,
            hidden_width: self.hidden_width,
            learning_rate: self.learning_rate,
            seed: self.seed,
        }
    }
}
