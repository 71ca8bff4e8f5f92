//! Experiment driver: feeds events to an agent cycle by cycle

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use pavlov_agent::{Respondent, Schedule};
use pavlov_core::{EventId, FunctionApproximator, PavlovError, Result};

use crate::{PredictionLog, ScenarioSet};

/// Drives learn cycles on one agent, optionally sampling scenarios after each
pub struct Session<'a, F> {
    agent: &'a mut Respondent<F>,
    recorder: Option<(&'a ScenarioSet, &'a mut PredictionLog)>,
    cycles: usize,
}

impl<'a, F: FunctionApproximator> Session<'a, F> {
    /// Start a session
    pub fn new(agent: &'a mut Respondent<F>) -> Self {
        Self {
            agent,
            recorder: None,
            cycles: 0,
        }
    }

    /// Record `scenarios` into `log` after every cycle
    #[must_use]
    pub fn recording(mut self, scenarios: &'a ScenarioSet, log: &'a mut PredictionLog) -> Self {
        self.recorder = Some((scenarios, log));
        self
    }

    /// Agent under training
    pub fn agent(&mut self) -> &mut Respondent<F> {
        &mut *self.agent
    }

    /// Learn cycles run so far
    #[must_use]
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    /// Learn from one event
    ///
    /// The learn cycle is committed before scenarios are recorded. An error
    /// from recording therefore leaves the cycle counted and the agent
    /// updated, with no sample appended to the log.
    pub fn step(&mut self, event: EventId) -> Result<f64> {
        let outcome = self.agent.learn(event)?;
        self.cycles += 1;
        if let Some((scenarios, log)) = &mut self.recorder {
            log.record(scenarios, &*self.agent)?;
        }
        Ok(outcome)
    }

    /// Learn from `events` in order, `reps` times over
    pub fn repeat(&mut self, events: &[EventId], reps: usize) -> Result<()> {
        for _ in 0..reps {
            for &event in events {
                self.step(event)?;
            }
        }
        Ok(())
    }

    /// Learn from `cycles` events drawn uniformly from `events`
    pub fn sample<R: Rng + ?Sized>(
        &mut self,
        events: &[EventId],
        cycles: usize,
        rng: &mut R,
    ) -> Result<()> {
        for _ in 0..cycles {
            let event = *events.choose(rng).ok_or_else(|| {
                PavlovError::Configuration("no events to sample from".to_string())
            })?;
            self.step(event)?;
        }
        Ok(())
    }

    /// Let the agent choose its own actions for `cycles` cycles
    ///
    /// Exploration noise for cycle `t` is `noise.noise(t)`. Stops early if
    /// the agent has no actions. Returns the number of cycles run.
    pub fn explore<S, R>(&mut self, cycles: usize, noise: &S, rng: &mut R) -> Result<usize>
    where
        S: Schedule + ?Sized,
        R: Rng + ?Sized,
    {
        for t in 0..cycles {
            let Some(action) = self.agent.decide(None, noise.noise(t), rng)? else {
                debug!(cycle = t, "no actions to explore");
                return Ok(t);
            };
            self.step(action)?;
        }
        Ok(cycles)
    }
}
