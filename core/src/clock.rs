use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A vector clock: one logical counter per host.
///
/// Captures the causal partial order between events across hosts. Keys are
/// host ids; a host absent from the map is at count zero. Iteration is in
/// host-id order, so every walk over a clock is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorClock(BTreeMap<String, u64>);

impl VectorClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock with a single component, as carried by synthetic start events.
    pub fn single(host: impl Into<String>, time: u64) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(host.into(), time);
        Self(entries)
    }

    /// The component for `host`, or `None` when the clock has no entry for it.
    pub fn get(&self, host: &str) -> Option<u64> {
        self.0.get(host).copied()
    }

    pub fn set(&mut self, host: impl Into<String>, time: u64) {
        self.0.insert(host.into(), time);
    }

    /// Components in host-id order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.0.iter().map(|(host, time)| (host.as_str(), *time))
    }

    /// Advance this host's component by one and return the new value.
    pub fn increment(&mut self, host: &str) -> u64 {
        let counter = self.0.entry(host.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }

    /// Componentwise maximum, the standard receive-side clock merge.
    pub fn merge(&mut self, other: &VectorClock) {
        for (host, time) in &other.0 {
            let counter = self.0.entry(host.clone()).or_insert(0);
            if *time > *counter {
                *counter = *time;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
