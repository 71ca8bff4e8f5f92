//! Core types for conditioned learning agents
//!
//! This crate provides the model-independent half of a respondent agent:
//! the event catalog, validated environment state, the event history and
//! the feature encoders that turn all three into approximator input.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod approximator;
pub mod config;
pub mod encoding;
pub mod environment;
pub mod error;
pub mod event;
pub mod history;

// Re-export core traits and types
pub use approximator::{ApproximatorConfig, FunctionApproximator};
pub use config::AgentConfig;
pub use encoding::{
    EncodingMode, FeatureEncoder, FeatureVector, InputEncoder, OneHotEncoder, ScalarEncoder,
};
pub use environment::{validate_bounds, EnvironmentSchema, EnvironmentState, MAX_VARIABLE};
pub use error::{PavlovError, Result};
pub use event::{normalised_map, normalised_positions, Effect, Event, EventCatalog, EventId};
pub use history::HistoryBuffer;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AgentConfig, EncodingMode, EnvironmentState, Event, EventCatalog, EventId,
        FunctionApproximator, HistoryBuffer, PavlovError, Result,
    };
}
