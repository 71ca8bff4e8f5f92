//! Feature encoding of (event, history window, environment)
//!
//! A feature vector is laid out as
//!
//! ```text
//! [ event slots | history slot 0 (most recent) | ... | history slot k-1 | environment values ]
//! ```
//!
//! where the width of each event slot depends on the [`FeatureEncoder`]
//! variant: one scalar in `[0, 1]` for [`ScalarEncoder`], one binary slot per
//! catalog event for [`OneHotEncoder`]. Environment values follow in
//! canonical key order.

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::{
    EnvironmentSchema, EnvironmentState, EventCatalog, EventId, HistoryBuffer, PavlovError, Result,
};

/// Which encoder an agent is built with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingMode {
    /// One normalised scalar per event slot
    #[default]
    Scalar,
    /// One binary slot per catalog event, per event slot
    #[serde(alias = "verbose")]
    OneHot,
}

impl EncodingMode {
    /// Build the encoder for this mode
    #[must_use]
    pub fn encoder(self, catalog: &EventCatalog) -> Box<dyn FeatureEncoder> {
        match self {
            Self::Scalar => Box::new(ScalarEncoder),
            Self::OneHot => Box::new(OneHotEncoder::new(catalog.len())),
        }
    }
}

/// Encodes a single event into feature slots
pub trait FeatureEncoder: Send + Sync + Debug {
    /// Mode this encoder implements
    fn mode(&self) -> EncodingMode;

    /// Number of slots one event occupies
    fn slots_per_event(&self) -> usize;

    /// Append the encoding of `event` to `out`
    fn push_event(&self, catalog: &EventCatalog, event: EventId, out: &mut Vec<f64>) -> Result<()>;
}

/// Encodes an event as its normalised catalog position
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarEncoder;

impl FeatureEncoder for ScalarEncoder {
    fn mode(&self) -> EncodingMode {
        EncodingMode::Scalar
    }

    fn slots_per_event(&self) -> usize {
        1
    }

    fn push_event(&self, catalog: &EventCatalog, event: EventId, out: &mut Vec<f64>) -> Result<()> {
        out.push(catalog.scalar(event)?);
        Ok(())
    }
}

/// Encodes an event as a one-hot vector over the catalog
#[derive(Debug, Clone, Copy)]
pub struct OneHotEncoder {
    width: usize,
}

impl OneHotEncoder {
    /// Create an encoder for a catalog of `width` events
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self { width }
    }
}

impl FeatureEncoder for OneHotEncoder {
    fn mode(&self) -> EncodingMode {
        EncodingMode::OneHot
    }

    fn slots_per_event(&self) -> usize {
        self.width
    }

    fn push_event(&self, catalog: &EventCatalog, event: EventId, out: &mut Vec<f64>) -> Result<()> {
        let position = catalog.position(event)?;
        if position >= self.width {
            return Err(PavlovError::UnknownEvent(format!(
                "{event} outside a one-hot width of {}",
                self.width
            )));
        }
        let start = out.len();
        out.resize(start + self.width, 0.0);
        out[start + position] = 1.0;
        Ok(())
    }
}

/// Encoded input for the function approximator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub Vec<f64>);

impl FeatureVector {
    /// Features as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of features
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no features
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Features as a single-row `1 × n` matrix
    #[must_use]
    pub fn to_row(&self) -> Array2<f64> {
        Array1::from(self.0.clone()).insert_axis(Axis(0))
    }
}

impl From<FeatureVector> for Vec<f64> {
    fn from(features: FeatureVector) -> Self {
        features.0
    }
}

/// Full input encoder: event encoder, history window and environment schema
#[derive(Debug)]
pub struct InputEncoder {
    encoder: Box<dyn FeatureEncoder>,
    sequence_memory: usize,
    schema: EnvironmentSchema,
}

impl InputEncoder {
    /// Create an input encoder
    #[must_use]
    pub fn new(
        mode: EncodingMode,
        catalog: &EventCatalog,
        sequence_memory: usize,
        schema: EnvironmentSchema,
    ) -> Self {
        Self {
            encoder: mode.encoder(catalog),
            sequence_memory,
            schema,
        }
    }

    /// Encoding mode in use
    #[must_use]
    pub fn mode(&self) -> EncodingMode {
        self.encoder.mode()
    }

    /// Number of historical events encoded
    #[must_use]
    pub fn sequence_memory(&self) -> usize {
        self.sequence_memory
    }

    /// Canonical environment schema
    #[must_use]
    pub fn schema(&self) -> &EnvironmentSchema {
        &self.schema
    }

    /// Length of every feature vector this encoder produces
    #[must_use]
    pub fn input_width(&self) -> usize {
        self.encoder.slots_per_event() * (self.sequence_memory + 1) + self.schema.len()
    }

    /// Encode an event against an environment and history
    ///
    /// Pure: neither the environment nor the history is modified. History
    /// slots with no recorded event are filled with `event` itself.
    pub fn encode(
        &self,
        catalog: &EventCatalog,
        event: EventId,
        environment: &EnvironmentState,
        history: &HistoryBuffer,
    ) -> Result<FeatureVector> {
        let mut data = Vec::with_capacity(self.input_width());

        self.encoder.push_event(catalog, event, &mut data)?;
        for past in history.window(self.sequence_memory, event) {
            self.encoder.push_event(catalog, past, &mut data)?;
        }
        data.extend(self.schema.values(environment)?);

        Ok(FeatureVector(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Event;
    use proptest::prelude::*;

    fn catalog(n: usize) -> EventCatalog {
        let actions = (0..n)
            .map(|i| Event::new(format!("event_{i}"), |env| (0.0, env)))
            .collect();
        EventCatalog::new(actions, vec![]).unwrap()
    }

    fn environment() -> EnvironmentState {
        EnvironmentState::from([("a", 0.1), ("z", 0.9)])
    }

    fn encoder(mode: EncodingMode, sequence_memory: usize) -> (EventCatalog, InputEncoder) {
        let catalog = catalog(2);
        let schema = EnvironmentSchema::from_environment(&environment());
        let encoder = InputEncoder::new(mode, &catalog, sequence_memory, schema);
        (catalog, encoder)
    }

    #[test]
    fn test_scalar_layout() {
        let (catalog, encoder) = encoder(EncodingMode::Scalar, 1);
        let history = HistoryBuffer::new();
        assert_eq!(encoder.input_width(), 4);

        let low = encoder.encode(&catalog, EventId(0), &environment(), &history).unwrap();
        assert_eq!(low.as_slice(), &[0.0, 0.0, 0.1, 0.9]);

        let high = encoder.encode(&catalog, EventId(1), &environment(), &history).unwrap();
        assert_eq!(high.as_slice(), &[1.0, 1.0, 0.1, 0.9]);

        let moved = EnvironmentState::from([("a", 0.2), ("z", 0.8)]);
        let low = encoder.encode(&catalog, EventId(0), &moved, &history).unwrap();
        assert_eq!(low.as_slice(), &[0.0, 0.0, 0.2, 0.8]);
    }

    #[test]
    fn test_one_hot_layout() {
        let (catalog, encoder) = encoder(EncodingMode::OneHot, 2);
        assert_eq!(encoder.input_width(), 2 * 3 + 2);

        let history: HistoryBuffer = [EventId(1)].into_iter().collect();
        let features = encoder.encode(&catalog, EventId(0), &environment(), &history).unwrap();
        assert_eq!(
            features.as_slice(),
            &[1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.1, 0.9]
        );
    }

    #[test]
    fn test_encode_errors() {
        let (catalog, encoder) = encoder(EncodingMode::Scalar, 1);
        let history = HistoryBuffer::new();

        let unknown = encoder.encode(&catalog, EventId(5), &environment(), &history);
        assert!(matches!(unknown, Err(PavlovError::UnknownEvent(_))));

        let wrong_keys = EnvironmentState::from([("c", 1.0)]);
        let schema = encoder.encode(&catalog, EventId(0), &wrong_keys, &history);
        assert!(matches!(schema, Err(PavlovError::EnvironmentSchema { .. })));

        let too_high = EnvironmentState::from([("a", 0.1), ("z", 1.2)]);
        let range = encoder.encode(&catalog, EventId(0), &too_high, &history);
        assert!(matches!(range, Err(PavlovError::EnvironmentRange { .. })));
    }

    #[test]
    fn test_one_hot_rejects_larger_catalog() {
        let small = catalog(1);
        let large = catalog(4);
        let encoder = InputEncoder::new(
            EncodingMode::OneHot,
            &small,
            0,
            EnvironmentSchema::default(),
        );

        let result = encoder.encode(&large, EventId(3), &EnvironmentState::new(), &HistoryBuffer::new());
        assert!(matches!(result, Err(PavlovError::UnknownEvent(_))));

        let ok = encoder.encode(&large, EventId(0), &EnvironmentState::new(), &HistoryBuffer::new());
        assert_eq!(ok.unwrap().as_slice(), &[1.0]);
    }

    #[test]
    fn test_to_row() {
        let row = FeatureVector(vec![0.5, 1.0]).to_row();
        assert_eq!(row.shape(), &[1, 2]);
        assert_eq!(row[[0, 1]], 1.0);
    }

    #[test]
    fn test_mode_aliases() {
        let mode: EncodingMode = serde_json::from_str("\"verbose\"").unwrap();
        assert_eq!(mode, EncodingMode::OneHot);
        let mode: EncodingMode = serde_json::from_str("\"scalar\"").unwrap();
        assert_eq!(mode, EncodingMode::Scalar);
    }

    proptest! {
        #[test]
        fn empty_history_repeats_query_event(n in 1usize..8, k in 0usize..5, pick in 0usize..8) {
            let catalog = catalog(n);
            let event = EventId(pick % n);
            let schema = EnvironmentSchema::default();
            let env = EnvironmentState::new();

            for mode in [EncodingMode::Scalar, EncodingMode::OneHot] {
                let encoder = InputEncoder::new(mode, &catalog, k, schema.clone());
                let empty = encoder.encode(&catalog, event, &env, &HistoryBuffer::new()).unwrap();
                let filled: HistoryBuffer = std::iter::repeat(event).take(k).collect();
                let repeated = encoder.encode(&catalog, event, &env, &filled).unwrap();
                prop_assert_eq!(empty.len(), encoder.input_width());
                prop_assert_eq!(empty, repeated);
            }
        }

        #[test]
        fn scalar_encoding_spans_unit_interval(n in 2usize..32) {
            let catalog = catalog(n);
            prop_assert_eq!(catalog.scalar(EventId(0)).unwrap(), 0.0);
            prop_assert_eq!(catalog.scalar(EventId(n - 1)).unwrap(), 1.0);
            for i in 0..n {
                let expected = i as f64 / (n - 1) as f64;
                prop_assert!((catalog.scalar(EventId(i)).unwrap() - expected).abs() < 1e-12);
            }
        }
    }
}
