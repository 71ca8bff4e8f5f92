//! Classical conditioning: a bell announcing food
//!
//! The agent can salivate, rest or eat. Eating after salivating is worth
//! more than eating cold. Bells are stimuli; one of them brings food.

use pavlov_core::{EnvironmentState, Event};

/// Whether food is available
pub const FOOD_PRESENT: &str = "food_present";
/// Whether the agent is salivating
pub const SALIVATION_LEVEL: &str = "salivation_level";

/// Start salivating
#[must_use]
pub fn salivate() -> Event {
    Event::new("salivate", |mut env: EnvironmentState| {
        env.set(SALIVATION_LEVEL, 1.0);
        (0.0, env)
    })
}

/// Sit and rest
#[must_use]
pub fn rest() -> Event {
    Event::new("rest", |env| (0.1, env))
}

/// Eat whatever food there is
#[must_use]
pub fn eat() -> Event {
    Event::new("eat", |mut env: EnvironmentState| {
        env.set(FOOD_PRESENT, 0.0);
        if env.value(SALIVATION_LEVEL) != 0.0 {
            env.set(SALIVATION_LEVEL, 0.0);
            (1.0, env)
        } else {
            (0.5, env)
        }
    })
}

/// Bell rung together with food
#[must_use]
pub fn bell_with_food() -> Event {
    Event::new("bell_with_food", |mut env: EnvironmentState| {
        env.set(FOOD_PRESENT, 1.0);
        (0.0, env)
    })
}

/// Bell rung with nothing following
#[must_use]
pub fn bell_without_food() -> Event {
    Event::new("bell_without_food", |env| (0.0, env))
}

/// `salivate`, `rest`, `eat`
#[must_use]
pub fn actions() -> Vec<Event> {
    vec![salivate(), rest(), eat()]
}

/// `bell_without_food`, `bell_with_food`
#[must_use]
pub fn stimuli() -> Vec<Event> {
    vec![bell_without_food(), bell_with_food()]
}

/// No food, not salivating
#[must_use]
pub fn starting_environment() -> EnvironmentState {
    EnvironmentState::from([(FOOD_PRESENT, 0.0), (SALIVATION_LEVEL, 0.0)])
}
