//! Events, their identities and the event catalog

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::{EnvironmentState, PavlovError, Result};

/// Effect of an event: takes an environment snapshot and returns the
/// outcome together with the resulting environment
pub type Effect = Arc<dyn Fn(EnvironmentState) -> (f64, EnvironmentState) + Send + Sync>;

/// Identity of an event inside an [`EventCatalog`]
///
/// Identities are positions in the catalog, assigned once at construction.
/// Two events are the same event if and only if they have the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub usize);

impl EventId {
    /// Position of the event in the catalog
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named event with its effect function
#[derive(Clone)]
pub struct Event {
    name: String,
    effect: Effect,
}

impl Event {
    /// Create a new event
    pub fn new<F>(name: impl Into<String>, effect: F) -> Self
    where
        F: Fn(EnvironmentState) -> (f64, EnvironmentState) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            effect: Arc::new(effect),
        }
    }

    /// Event name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the effect function on an environment snapshot
    #[must_use]
    pub fn apply(&self, environment: EnvironmentState) -> (f64, EnvironmentState) {
        (self.effect)(environment)
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Spread `len` positions evenly over `[0, 1]`
///
/// A single position maps to `1.0`.
#[must_use]
pub fn normalised_positions(len: usize) -> Vec<f64> {
    match len {
        0 => Vec::new(),
        1 => vec![1.0],
        n => (0..n).map(|i| i as f64 / (n - 1) as f64).collect(),
    }
}

/// Map each item to its normalised position, keeping insertion order
///
/// A repeated item keeps its first slot but takes the value of its last
/// occurrence.
pub fn normalised_map<K>(items: &[K]) -> IndexMap<K, f64>
where
    K: Hash + Eq + Clone,
{
    let mut map = IndexMap::with_capacity(items.len());
    for (item, value) in items.iter().zip(normalised_positions(items.len())) {
        map.insert(item.clone(), value);
    }
    map
}

/// Fixed, ordered set of every event an agent knows about
///
/// Actions come first, then stimuli, each in the order supplied. This order
/// is the canonical ordering for encoding and for `decide` tie-breaks.
#[derive(Debug, Clone)]
pub struct EventCatalog {
    events: Vec<Event>,
    num_actions: usize,
    by_name: IndexMap<String, EventId>,
    scalars: Vec<f64>,
}

impl EventCatalog {
    /// Build a catalog from `actions ++ stimuli`
    pub fn new(actions: Vec<Event>, stimuli: Vec<Event>) -> Result<Self> {
        let num_actions = actions.len();
        let events: Vec<Event> = actions.into_iter().chain(stimuli).collect();

        let mut by_name = IndexMap::with_capacity(events.len());
        for (i, event) in events.iter().enumerate() {
            if by_name.insert(event.name.clone(), EventId(i)).is_some() {
                return Err(PavlovError::Configuration(format!(
                    "duplicate event name: {}",
                    event.name
                )));
            }
        }

        let scalars = normalised_positions(events.len());

        Ok(Self {
            events,
            num_actions,
            by_name,
            scalars,
        })
    }

    /// Total number of events
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the catalog holds no events
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of actions
    #[must_use]
    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// Number of stimuli
    #[must_use]
    pub fn num_stimuli(&self) -> usize {
        self.events.len() - self.num_actions
    }

    /// Resolve an event by name
    pub fn id(&self, name: &str) -> Result<EventId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| PavlovError::UnknownEvent(name.to_string()))
    }

    /// Look up an event by id
    pub fn get(&self, id: EventId) -> Result<&Event> {
        self.events
            .get(id.0)
            .ok_or_else(|| PavlovError::UnknownEvent(id.to_string()))
    }

    /// Check if `id` is a configured action
    #[must_use]
    pub fn is_action(&self, id: EventId) -> bool {
        id.0 < self.num_actions
    }

    /// All event ids in canonical order
    pub fn ids(&self) -> impl Iterator<Item = EventId> {
        (0..self.events.len()).map(EventId)
    }

    /// Action ids in canonical order
    pub fn actions(&self) -> impl Iterator<Item = EventId> {
        (0..self.num_actions).map(EventId)
    }

    /// Stimulus ids in canonical order
    pub fn stimuli(&self) -> impl Iterator<Item = EventId> {
        (self.num_actions..self.events.len()).map(EventId)
    }

    /// Scalar encoding of an event, `i / (n - 1)`
    pub fn scalar(&self, id: EventId) -> Result<f64> {
        self.scalars
            .get(id.0)
            .copied()
            .ok_or_else(|| PavlovError::UnknownEvent(id.to_string()))
    }

    /// One-hot position of an event
    pub fn position(&self, id: EventId) -> Result<usize> {
        self.get(id)?;
        Ok(id.0)
    }

    /// Event name to scalar encoding, in canonical order
    #[must_use]
    pub fn scalar_encoding(&self) -> IndexMap<String, f64> {
        let names: Vec<String> = self.by_name.keys().cloned().collect();
        normalised_map(&names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn constant(name: &str, outcome: f64) -> Event {
        Event::new(name, move |env| (outcome, env))
    }

    #[test]
    fn test_normalised_map() {
        let empty: [&str; 0] = [];
        assert!(normalised_map(&empty).is_empty());
        assert_eq!(normalised_map(&["a"])["a"], 1.0);

        let two = normalised_map(&["a", "b"]);
        assert_eq!(two["a"], 0.0);
        assert_eq!(two["b"], 1.0);

        let four = normalised_map(&["a", "b", "c", "d"]);
        assert_eq!(four.keys().copied().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
        assert_relative_eq!(four["b"], 1.0 / 3.0);
        assert_relative_eq!(four["c"], 2.0 / 3.0);
        assert_eq!(four["d"], 1.0);
    }

    #[test]
    fn test_catalog_orders_actions_before_stimuli() {
        let catalog = EventCatalog::new(
            vec![constant("low", 0.1), constant("middle", 0.5)],
            vec![constant("stimulus", 0.1)],
        )
        .unwrap();

        let encoding = catalog.scalar_encoding();
        assert_eq!(
            encoding.into_iter().collect::<Vec<_>>(),
            vec![
                ("low".to_string(), 0.0),
                ("middle".to_string(), 0.5),
                ("stimulus".to_string(), 1.0),
            ]
        );

        assert_eq!(catalog.num_actions(), 2);
        assert_eq!(catalog.num_stimuli(), 1);
        assert_eq!(catalog.actions().collect::<Vec<_>>(), vec![EventId(0), EventId(1)]);
        assert_eq!(catalog.stimuli().collect::<Vec<_>>(), vec![EventId(2)]);
        assert!(catalog.is_action(EventId(1)));
        assert!(!catalog.is_action(EventId(2)));
    }

    #[test]
    fn test_catalog_lookups() {
        let catalog = EventCatalog::new(vec![constant("only", 0.3)], vec![]).unwrap();

        assert_eq!(catalog.scalar(EventId(0)).unwrap(), 1.0);
        assert_eq!(catalog.id("only").unwrap(), EventId(0));
        assert!(matches!(catalog.id("missing"), Err(PavlovError::UnknownEvent(_))));
        assert!(matches!(catalog.get(EventId(4)), Err(PavlovError::UnknownEvent(_))));
        assert!(matches!(catalog.position(EventId(1)), Err(PavlovError::UnknownEvent(_))));

        assert_eq!(catalog.scalar_encoding()["only"], 1.0);

        let (outcome, _) = catalog.get(EventId(0)).unwrap().apply(EnvironmentState::new());
        assert_eq!(outcome, 0.3);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = EventCatalog::new(vec![constant("same", 0.1)], vec![constant("same", 0.2)]);
        assert!(matches!(result, Err(PavlovError::Configuration(_))));
    }
}
