//! Respondent agents for conditioned learning experiments
//!
//! This crate provides:
//! - The [`Respondent`] learn / predict / decide control loop
//! - A backpropagation network implementing the approximator interface
//! - Schedules for annealing exploration noise

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod network;
pub mod respondent;
pub mod schedule;

// Re-export agents
pub use network::{Backpropagation, NetworkWeights};
pub use respondent::{Respondent, RespondentMetrics};

// Re-export schedules
pub use schedule::{ConstantSchedule, ExponentialSchedule, LinearSchedule, Schedule};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{Backpropagation, Respondent, Schedule};
    pub use pavlov_core::prelude::*;
}
