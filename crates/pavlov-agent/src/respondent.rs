//! The respondent: an agent that learns outcomes of events and picks actions
//!
//! Each cycle has two phases. `predict` and `decide` only evaluate and never
//! touch agent state. `learn` commits: it trains on the pre-event encoding,
//! then replaces the environment with the effect's result and appends the
//! event to the history. If training fails nothing is committed.

use ndarray::Array1;
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use pavlov_core::{
    validate_bounds, AgentConfig, EncodingMode, EnvironmentSchema, EnvironmentState, Event,
    EventCatalog, EventId, FeatureVector, FunctionApproximator, HistoryBuffer, InputEncoder,
    PavlovError, Result,
};

use crate::network::Backpropagation;

/// Counters for committed learn cycles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RespondentMetrics {
    /// Successful learn cycles
    pub learn_cycles: usize,
    /// Training epochs run across all cycles
    pub total_epochs: usize,
    /// Sum of every learned outcome
    pub cumulative_outcome: f64,
    /// Outcome of the most recent cycle
    pub last_outcome: Option<f64>,
}

/// Conditioned learning agent
pub struct Respondent<F = Backpropagation> {
    config: AgentConfig,
    catalog: EventCatalog,
    encoder: InputEncoder,
    environment: EnvironmentState,
    history: HistoryBuffer,
    approximator: F,
    metrics: RespondentMetrics,
}

impl<F: FunctionApproximator> Respondent<F> {
    /// Create an agent
    ///
    /// The key set of `environment` (empty when `None`) becomes the
    /// canonical schema for the agent's lifetime.
    pub fn new(
        config: AgentConfig,
        actions: Vec<Event>,
        stimuli: Vec<Event>,
        environment: Option<EnvironmentState>,
    ) -> Result<Self> {
        config.validate()?;

        let catalog = EventCatalog::new(actions, stimuli)?;
        let environment = environment.unwrap_or_default();
        let schema = EnvironmentSchema::from_environment(&environment);
        let encoder = InputEncoder::new(config.encoding, &catalog, config.sequence_memory, schema);

        let approximator = F::construct(&config.approximator(encoder.input_width()))
            .map_err(PavlovError::Approximator)?;

        info!(
            actions = catalog.num_actions(),
            stimuli = catalog.num_stimuli(),
            variables = environment.len(),
            input_width = encoder.input_width(),
            encoding = ?config.encoding,
            "created respondent"
        );

        Ok(Self {
            config,
            catalog,
            encoder,
            environment,
            history: HistoryBuffer::new(),
            approximator,
            metrics: RespondentMetrics::default(),
        })
    }

    /// Agent configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Event catalog
    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    /// Resolve an event by name
    pub fn event(&self, name: &str) -> Result<EventId> {
        self.catalog.id(name)
    }

    /// Action ids in canonical order
    pub fn actions(&self) -> Vec<EventId> {
        self.catalog.actions().collect()
    }

    /// Stimulus ids in canonical order
    pub fn stimuli(&self) -> Vec<EventId> {
        self.catalog.stimuli().collect()
    }

    /// Check if `event` is an action
    pub fn is_action(&self, event: EventId) -> bool {
        self.catalog.is_action(event)
    }

    /// Encoding mode in use
    pub fn encoding(&self) -> EncodingMode {
        self.encoder.mode()
    }

    /// Length of every feature vector
    pub fn input_width(&self) -> usize {
        self.encoder.input_width()
    }

    /// Current environment
    pub fn environment(&self) -> &EnvironmentState {
        &self.environment
    }

    /// Replace the environment between learn cycles
    pub fn set_environment(&mut self, environment: EnvironmentState) -> Result<()> {
        let normalized = self.encoder.schema().normalize(&environment)?;
        validate_bounds(&normalized)?;
        self.environment = normalized;
        Ok(())
    }

    /// Event history, oldest first
    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Underlying approximator
    pub fn approximator(&self) -> &F {
        &self.approximator
    }

    /// Learning counters
    pub fn metrics(&self) -> &RespondentMetrics {
        &self.metrics
    }

    /// Encode an event for the approximator
    ///
    /// `environment` and `history` default to the agent's own.
    pub fn input_data(
        &self,
        event: EventId,
        environment: Option<&EnvironmentState>,
        history: Option<&HistoryBuffer>,
    ) -> Result<FeatureVector> {
        self.encoder.encode(
            &self.catalog,
            event,
            environment.unwrap_or(&self.environment),
            history.unwrap_or(&self.history),
        )
    }

    /// Predicted outcome of `event`
    pub fn predict(
        &self,
        event: EventId,
        environment: Option<&EnvironmentState>,
        history: Option<&HistoryBuffer>,
    ) -> Result<f64> {
        let features = self.input_data(event, environment, history)?;
        let predicted = self
            .approximator
            .predict(&features.to_row())
            .map_err(PavlovError::Approximator)?;

        predicted.get((0, 0)).copied().ok_or_else(|| {
            PavlovError::Approximator(anyhow::anyhow!(
                "expected a 1x1 prediction, got {:?}",
                predicted.dim()
            ))
        })
    }

    /// Learn from `event` using the configured number of epochs
    pub fn learn(&mut self, event: EventId) -> Result<f64> {
        self.learn_for(event, self.config.epochs)
    }

    /// Learn from `event`, returning its outcome
    ///
    /// Training uses the environment and history as they were before the
    /// event. State is only updated once training has succeeded.
    pub fn learn_for(&mut self, event: EventId, epochs: usize) -> Result<f64> {
        let pre_state = self.environment.clone();
        let (outcome, post_state) = self.catalog.get(event)?.apply(pre_state.clone());

        let features = self
            .encoder
            .encode(&self.catalog, event, &pre_state, &self.history)?;
        let target = Array1::from(vec![outcome]);

        if let Err(e) = self.approximator.train(&features.to_row(), &target, epochs) {
            warn!(event = %event, error = %e, "training failed, state unchanged");
            return Err(PavlovError::Approximator(e));
        }

        self.environment = post_state;
        self.history.push(event);

        self.metrics.learn_cycles += 1;
        self.metrics.total_epochs += epochs;
        self.metrics.cumulative_outcome += outcome;
        self.metrics.last_outcome = Some(outcome);

        debug!(
            event = self.catalog.get(event).map(Event::name).unwrap_or_default(),
            outcome,
            epochs,
            "learned"
        );

        Ok(outcome)
    }

    /// Pick the action with the highest predicted outcome
    ///
    /// Each prediction is perturbed by `exploration_noise * U(0, 1)`. A later
    /// action must strictly beat the current best, so ties go to the action
    /// that comes first. Stimuli are never returned. `None` only when there
    /// are no actions.
    pub fn decide<R: Rng + ?Sized>(
        &self,
        environment: Option<&EnvironmentState>,
        exploration_noise: f64,
        rng: &mut R,
    ) -> Result<Option<EventId>> {
        if !exploration_noise.is_finite() || exploration_noise < 0.0 {
            return Err(PavlovError::Configuration(format!(
                "exploration noise must be a non-negative number, got {exploration_noise}"
            )));
        }

        let unit = Uniform::new(0.0, 1.0);
        let mut best: Option<(EventId, f64)> = None;

        for action in self.catalog.actions() {
            let predicted = self.predict(action, environment, None)?;
            let score = if exploration_noise > 0.0 {
                predicted + exploration_noise * unit.sample(rng)
            } else {
                predicted
            };

            debug!(
                event = self.catalog.get(action).map(Event::name).unwrap_or_default(),
                predicted,
                score,
                "evaluated action"
            );

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((action, score));
            }
        }

        Ok(best.map(|(action, _)| action))
    }

    /// [`decide`](Self::decide) without exploration noise
    pub fn decide_greedy(&self, environment: Option<&EnvironmentState>) -> Result<Option<EventId>> {
        self.decide(environment, 0.0, &mut rand::rngs::mock::StepRng::new(0, 0))
    }
}
