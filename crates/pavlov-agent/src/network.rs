//! Backpropagation network used as the default outcome predictor
//!
//! A single hidden layer perceptron, sigmoid on both layers, trained by
//! per-row gradient descent on squared error. Pure ndarray, no external
//! backend.

use anyhow::{ensure, Result};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use pavlov_core::{ApproximatorConfig, FunctionApproximator};

/// Learned parameters of a [`Backpropagation`] network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkWeights {
    /// Input to hidden weights, `input_width × hidden_width`
    pub hidden: Array2<f64>,
    /// Hidden biases
    pub hidden_bias: Array1<f64>,
    /// Hidden to output weights
    pub output: Array1<f64>,
    /// Output bias
    pub output_bias: f64,
}

/// `input_width → hidden_width → 1` sigmoid network
#[derive(Debug, Clone)]
pub struct Backpropagation {
    config: ApproximatorConfig,
    weights: NetworkWeights,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl Backpropagation {
    /// Create a network with Xavier-uniform initial weights
    pub fn new(config: ApproximatorConfig) -> Result<Self> {
        ensure!(config.input_width > 0, "input width must be at least 1");
        ensure!(config.hidden_width > 0, "hidden width must be at least 1");

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let hidden = Self::xavier_init(config.input_width, config.hidden_width, &mut rng);
        let output = Self::xavier_init(config.hidden_width, 1, &mut rng).remove_axis(Axis(1));

        let weights = NetworkWeights {
            hidden,
            hidden_bias: Array1::zeros(config.hidden_width),
            output,
            output_bias: 0.0,
        };

        Ok(Self { config, weights })
    }

    fn xavier_init(in_dim: usize, out_dim: usize, rng: &mut StdRng) -> Array2<f64> {
        let limit = (6.0 / (in_dim + out_dim) as f64).sqrt();
        let dist = Uniform::new(-limit, limit);
        Array2::from_shape_fn((in_dim, out_dim), |_| dist.sample(rng))
    }

    /// Current parameters
    #[must_use]
    pub fn weights(&self) -> &NetworkWeights {
        &self.weights
    }

    /// Replace every parameter, keeping the configured shape
    pub fn set_weights(&mut self, weights: NetworkWeights) -> Result<()> {
        let shape = (self.config.input_width, self.config.hidden_width);
        ensure!(
            weights.hidden.dim() == shape
                && weights.hidden_bias.len() == shape.1
                && weights.output.len() == shape.1,
            "weights do not fit a {}x{} network",
            shape.0,
            shape.1
        );
        self.weights = weights;
        Ok(())
    }

    fn check_width(&self, features: &Array2<f64>) -> Result<()> {
        ensure!(
            features.ncols() == self.config.input_width,
            "shape mismatch: expected {} features per row, got {}",
            self.config.input_width,
            features.ncols()
        );
        Ok(())
    }

    fn forward_row(&self, row: &ArrayView1<f64>) -> (Array1<f64>, f64) {
        let w = &self.weights;
        let hidden = (row.dot(&w.hidden) + &w.hidden_bias).mapv(sigmoid);
        let output = sigmoid(hidden.dot(&w.output) + w.output_bias);
        (hidden, output)
    }

    fn step(&mut self, row: &ArrayView1<f64>, target: f64) {
        let (hidden, output) = self.forward_row(row);
        let lr = self.config.learning_rate;

        let delta_out = (output - target) * output * (1.0 - output);
        let delta_hidden = &self.weights.output * delta_out * &hidden.mapv(|h| h * (1.0 - h));

        let w = &mut self.weights;
        w.output.scaled_add(-lr * delta_out, &hidden);
        w.output_bias -= lr * delta_out;

        let row_col = row.view().insert_axis(Axis(1));
        let grad_hidden = row_col.dot(&delta_hidden.view().insert_axis(Axis(0)));
        w.hidden.scaled_add(-lr, &grad_hidden);
        w.hidden_bias.scaled_add(-lr, &delta_hidden);
    }

    /// Mean squared error over a batch
    pub fn loss(&self, features: &Array2<f64>, target: &Array1<f64>) -> Result<f64> {
        let predicted = self.predict(features)?;
        ensure!(target.len() == predicted.nrows(), "target length mismatch");
        let sum: f64 = predicted
            .column(0)
            .iter()
            .zip(target)
            .map(|(p, t)| (p - t).powi(2))
            .sum();
        Ok(sum / target.len() as f64)
    }
}

impl FunctionApproximator for Backpropagation {
    fn construct(config: &ApproximatorConfig) -> Result<Self> {
        Self::new(config.clone())
    }

    fn input_width(&self) -> usize {
        self.config.input_width
    }

    fn train(&mut self, features: &Array2<f64>, target: &Array1<f64>, epochs: usize) -> Result<()> {
        self.check_width(features)?;
        ensure!(
            features.nrows() > 0 && target.len() == features.nrows(),
            "shape mismatch: {} feature rows but {} targets",
            features.nrows(),
            target.len()
        );

        for _ in 0..epochs {
            for (row, &t) in features.outer_iter().zip(target) {
                self.step(&row, t);
            }
        }
        Ok(())
    }

    fn predict(&self, features: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_width(features)?;
        let outputs: Array1<f64> = features
            .outer_iter()
            .map(|row| self.forward_row(&row).1)
            .collect();
        Ok(outputs.insert_axis(Axis(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    fn config(input_width: usize) -> ApproximatorConfig {
        ApproximatorConfig {
            input_width,
            hidden_width: 8,
            learning_rate: 0.5,
            seed: Some(0),
        }
    }

    #[test]
    fn test_predict_shape() {
        let net = Backpropagation::new(config(3)).unwrap();
        let out = net.predict(&arr2(&[[0.1, 0.2, 0.3]])).unwrap();
        assert_eq!(out.dim(), (1, 1));
        assert!(out[[0, 0]] > 0.0 && out[[0, 0]] < 1.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let mut net = Backpropagation::new(config(2)).unwrap();
        assert!(net.predict(&arr2(&[[0.1, 0.2, 0.3]])).is_err());
        assert!(net.train(&arr2(&[[0.1, 0.2, 0.3]]), &arr1(&[0.5]), 1).is_err());
        assert!(net.train(&arr2(&[[0.1, 0.2]]), &arr1(&[0.5, 0.1]), 1).is_err());
    }

    #[test]
    fn test_seeded_init_is_deterministic() {
        let a = Backpropagation::new(config(4)).unwrap();
        let b = Backpropagation::new(config(4)).unwrap();
        assert_eq!(a.weights(), b.weights());
    }

    #[test]
    fn test_training_reduces_loss() {
        let mut net = Backpropagation::new(config(1)).unwrap();
        let features = arr2(&[[0.0], [1.0]]);
        let target = arr1(&[0.1, 0.9]);

        let before = net.loss(&features, &target).unwrap();
        net.train(&features, &target, 2000).unwrap();
        let after = net.loss(&features, &target).unwrap();

        assert!(after < before);
        assert!(after < 0.01, "loss after training: {after}");
    }

    #[test]
    fn test_set_weights_checks_shape() {
        let mut net = Backpropagation::new(config(2)).unwrap();
        let other = Backpropagation::new(config(3)).unwrap();
        assert!(net.set_weights(other.weights().clone()).is_err());

        let same = Backpropagation::new(ApproximatorConfig {
            seed: Some(9),
            ..config(2)
        })
        .unwrap();
        net.set_weights(same.weights().clone()).unwrap();
        assert_eq!(net.weights(), same.weights());
    }
}
