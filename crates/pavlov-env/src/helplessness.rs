//! Operant conditioning: escape from shocks, and learned helplessness
//!
//! A shock puts the agent in danger. Running escapes danger while the gate
//! is open; with the gate closed nothing helps and resting is the least bad
//! option.

use pavlov_core::{EnvironmentState, Event, EventId};

use crate::ScenarioSet;

/// Whether the agent is being shocked
pub const IN_DANGER: &str = "in_danger";
/// Whether escape is blocked
pub const GATE_CLOSED: &str = "gate_closed";

/// Lie down and rest
#[must_use]
pub fn rest() -> Event {
    Event::new("rest", |env: EnvironmentState| {
        let outcome = if env.value(IN_DANGER) != 0.0 { 0.1 } else { 0.6 };
        (outcome, env)
    })
}

/// Try to escape
#[must_use]
pub fn run() -> Event {
    Event::new("run", |mut env: EnvironmentState| {
        if env.value(IN_DANGER) == 0.0 {
            return (0.1, env);
        }
        if env.value(GATE_CLOSED) != 0.0 {
            (0.0, env)
        } else {
            env.set(IN_DANGER, 0.0);
            (0.5, env)
        }
    })
}

/// Electric shock
#[must_use]
pub fn shock() -> Event {
    Event::new("shock", |mut env: EnvironmentState| {
        env.set(IN_DANGER, 1.0);
        (0.0, env)
    })
}

/// `rest`, `run`
#[must_use]
pub fn actions() -> Vec<Event> {
    vec![rest(), run()]
}

/// `shock`
#[must_use]
pub fn stimuli() -> Vec<Event> {
    vec![shock()]
}

/// Safe, gate open
#[must_use]
pub fn normal() -> EnvironmentState {
    EnvironmentState::from([(IN_DANGER, 0.0), (GATE_CLOSED, 0.0)])
}

/// Shocked, gate open
#[must_use]
pub fn in_danger_gate_open() -> EnvironmentState {
    EnvironmentState::from([(IN_DANGER, 1.0), (GATE_CLOSED, 0.0)])
}

/// Shocked, gate closed
#[must_use]
pub fn in_danger_gate_closed() -> EnvironmentState {
    EnvironmentState::from([(IN_DANGER, 1.0), (GATE_CLOSED, 1.0)])
}

/// Scenarios for every action under every condition
///
/// `W` marks the better action for a condition, `L` the worse one.
#[must_use]
pub fn scenarios(rest: EventId, run: EventId) -> ScenarioSet {
    ScenarioSet::new()
        .with("1.W Rest - No danger", rest, Some(normal()))
        .with("1.L Run - No danger", run, Some(normal()))
        .with("2.W Run - Danger, gate open", run, Some(in_danger_gate_open()))
        .with("2.L Rest - Danger, gate open", rest, Some(in_danger_gate_open()))
        .with("3.W Rest - Danger, gate closed", rest, Some(in_danger_gate_closed()))
        .with("3.L Run - Danger, gate closed", run, Some(in_danger_gate_closed()))
}
