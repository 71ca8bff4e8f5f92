//! Minimal events with fixed outcomes

use pavlov_core::{EnvironmentState, Event};

/// Outcome of [`low_action`]
pub const LOW_OUTCOME: f64 = 0.1;
/// Outcome of [`middle_action`]
pub const MIDDLE_OUTCOME: f64 = 0.5;
/// Outcome of [`high_action`]
pub const HIGH_OUTCOME: f64 = 0.9;

/// Action with a low outcome
#[must_use]
pub fn low_action() -> Event {
    Event::new("low", |env| (LOW_OUTCOME, env))
}

/// Action with a medium outcome
#[must_use]
pub fn middle_action() -> Event {
    Event::new("middle", |env| (MIDDLE_OUTCOME, env))
}

/// Action with a high outcome
#[must_use]
pub fn high_action() -> Event {
    Event::new("high", |env| (HIGH_OUTCOME, env))
}

/// Stimulus raising every environment variable by 0.1
#[must_use]
pub fn environment_stimulus() -> Event {
    Event::new("environment_stimulus", |mut env: EnvironmentState| {
        for value in env.values_mut() {
            *value += 0.1;
        }
        (0.1, env)
    })
}
