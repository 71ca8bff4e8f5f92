//! Example: learned helplessness
//!
//! The agent is shocked at random and learns that running escapes. Then the
//! gate is closed and running stops helping. Prints the prediction log as
//! JSON; set `RUST_LOG=debug` to follow every cycle.

use pavlov_agent::Respondent;
use pavlov_core::{AgentConfig, EncodingMode, Event, EventId};
use pavlov_env::helplessness::{self, GATE_CLOSED};
use pavlov_env::{PredictionLog, Session};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

fn action_name(agent: &Respondent, choice: Option<EventId>) -> &str {
    choice
        .and_then(|id| agent.catalog().get(id).ok())
        .map_or("nothing", Event::name)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AgentConfig {
        hidden_width: 8,
        learning_rate: 0.5,
        epochs: 2,
        encoding: EncodingMode::OneHot,
        seed: Some(42),
        ..AgentConfig::default()
    };
    let mut dog: Respondent = Respondent::new(
        config,
        helplessness::actions(),
        helplessness::stimuli(),
        Some(helplessness::normal()),
    )?;

    let rest = dog.event("rest")?;
    let run = dog.event("run")?;
    let shock = dog.event("shock")?;
    let scenarios = helplessness::scenarios(rest, run);
    let mut log = PredictionLog::new();
    let mut rng = StdRng::seed_from_u64(7);

    {
        let mut session = Session::new(&mut dog).recording(&scenarios, &mut log);
        session.sample(&[rest, run, shock], 3000, &mut rng)?;
    }
    let choice = dog.decide_greedy(Some(&helplessness::in_danger_gate_open()))?;
    println!("gate open, in danger: {}", action_name(&dog, choice));

    let mut closed = dog.environment().clone();
    closed.set(GATE_CLOSED, 1.0);
    dog.set_environment(closed)?;
    {
        let mut session = Session::new(&mut dog).recording(&scenarios, &mut log);
        session.sample(&[rest, run, shock], 3000, &mut rng)?;
    }
    let choice = dog.decide_greedy(Some(&helplessness::in_danger_gate_closed()))?;
    println!("gate closed, in danger: {}", action_name(&dog, choice));

    let metrics = dog.metrics();
    println!(
        "\n{} cycles, mean outcome {:.3}",
        metrics.learn_cycles,
        metrics.cumulative_outcome / metrics.learn_cycles as f64
    );
    println!("{}", log.to_json()?);

    Ok(())
}
