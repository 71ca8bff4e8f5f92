//! Interface to the trainable outcome predictor

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Construction parameters handed to a [`FunctionApproximator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproximatorConfig {
    /// Length of each feature row
    pub input_width: usize,
    /// Hidden layer width
    pub hidden_width: usize,
    /// Gradient step size
    pub learning_rate: f64,
    /// Seed for weight initialisation
    pub seed: Option<u64>,
}

/// Trainable mapping from a feature row to a scalar outcome
///
/// Errors are opaque to the agent and surfaced unchanged.
pub trait FunctionApproximator: Send {
    /// Build an untrained approximator
    fn construct(config: &ApproximatorConfig) -> anyhow::Result<Self>
    where
        Self: Sized;

    /// Expected row width
    fn input_width(&self) -> usize;

    /// Fit `features` (`1 × input_width`) towards `target` (length 1)
    fn train(&mut self, features: &Array2<f64>, target: &Array1<f64>, epochs: usize) -> anyhow::Result<()>;

    /// Predict outcomes for `features`, returning a `1 × 1` matrix
    fn predict(&self, features: &Array2<f64>) -> anyhow::Result<Array2<f64>>;
}
