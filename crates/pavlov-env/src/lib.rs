//! Conditioning experiments for respondent agents
//!
//! This crate provides:
//! - Ready-made event sets (fixed outcomes, salivation, learned helplessness)
//! - Named prediction scenarios and their recorded time series
//! - A session driver for scripted, sampled and self-directed learning

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod basic;
pub mod helplessness;
pub mod salivation;
pub mod scenario;
pub mod session;

pub use scenario::{PredictionLog, Scenario, ScenarioSet};
pub use session::Session;

// Re-export core types
pub use pavlov_core::{EnvironmentState, Event, EventId};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{PredictionLog, ScenarioSet, Session};
    pub use pavlov_agent::prelude::*;
}
