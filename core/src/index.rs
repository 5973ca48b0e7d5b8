use crate::event::Event;
use std::collections::{BTreeMap, HashMap};

/// Per-host, time-ordered store of a trace's events.
///
/// Hosts are remembered in first-appearance order; that order is the stable
/// host walk used by edge generation and serialization. Within a host,
/// events are keyed by their own clock component, so the map keeps each
/// timeline ordered and range lookups need no separate sorted list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventIndex {
    timelines: HashMap<String, BTreeMap<u64, Event>>,
    appearance: Vec<String>,
}

impl EventIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event, rejecting a second event for the same `(host, time)`
    /// slot. On rejection the event is handed back to the caller.
    pub fn insert(&mut self, event: Event) -> Result<(), Event> {
        if !self.timelines.contains_key(&event.host) {
            self.appearance.push(event.host.clone());
        }
        let timeline = self.timelines.entry(event.host.clone()).or_default();
        if timeline.contains_key(&event.time) {
            return Err(event);
        }
        timeline.insert(event.time, event);
        Ok(())
    }

    /// Exact lookup.
    pub fn get(&self, host: &str, time: u64) -> Option<&Event> {
        self.timelines.get(host)?.get(&time)
    }

    /// The event on `host` with the smallest time `>= time`, if any.
    pub fn next_at_or_after(&self, host: &str, time: u64) -> Option<&Event> {
        self.timelines
            .get(host)?
            .range(time..)
            .next()
            .map(|(_, event)| event)
    }

    /// Hosts in first-appearance order.
    pub fn hosts(&self) -> impl Iterator<Item = &str> + '_ {
        self.appearance.iter().map(String::as_str)
    }

    pub fn host_count(&self) -> usize {
        self.appearance.len()
    }

    /// Events of one host in ascending time order.
    pub fn events_of(&self, host: &str) -> impl Iterator<Item = &Event> + '_ {
        self.timelines
            .get(host)
            .into_iter()
            .flat_map(|timeline| timeline.values())
    }

    /// Number of events recorded for `host`.
    pub fn count_of(&self, host: &str) -> usize {
        self.timelines.get(host).map_or(0, BTreeMap::len)
    }

    /// All events, hosts in first-appearance order, times ascending.
    pub fn events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.appearance.iter().flat_map(|host| self.events_of(host))
    }

    /// Total number of events across all hosts.
    pub fn len(&self) -> usize {
        self.timelines.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.values().all(BTreeMap::is_empty)
    }

    /// Give every known host its synthetic time-0 start event. Hosts that
    /// already carry one keep it.
    pub(crate) fn inject_start_events(&mut self) {
        for host in &self.appearance {
            if let Some(timeline) = self.timelines.get_mut(host) {
                timeline.entry(0).or_insert_with(|| Event::start(host));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::VectorClock;

    fn event(host: &str, time: u64) -> Event {
        Event {
            host: host.to_string(),
            time,
            clock: VectorClock::single(host, time),
            label: format!("{host} e{time}"),
            line: None,
        }
    }

    #[test]
    fn insert_and_exact_get() {
        let mut index = EventIndex::new();
        index.insert(event("a", 1)).unwrap();
        index.insert(event("a", 2)).unwrap();

        assert_eq!(index.get("a", 1).unwrap().label, "a e1");
        assert!(index.get("a", 3).is_none());
        assert!(index.get("b", 1).is_none());
    }

    #[test]
    fn duplicate_slot_is_rejected_and_original_kept() {
        let mut index = EventIndex::new();
        index.insert(event("a", 1)).unwrap();

        let mut dup = event("a", 1);
        dup.label = "imposter".to_string();
        let rejected = index.insert(dup).unwrap_err();

        assert_eq!(rejected.label, "imposter");
        assert_eq!(index.get("a", 1).unwrap().label, "a e1");
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn next_at_or_after_skips_gaps() {
        let mut index = EventIndex::new();
        index.insert(event("a", 2)).unwrap();
        index.insert(event("a", 10)).unwrap();

        assert_eq!(index.next_at_or_after("a", 1).unwrap().time, 2);
        assert_eq!(index.next_at_or_after("a", 2).unwrap().time, 2);
        assert_eq!(index.next_at_or_after("a", 3).unwrap().time, 10);
        assert!(index.next_at_or_after("a", 11).is_none());
    }

    #[test]
    fn hosts_keep_first_appearance_order() {
        let mut index = EventIndex::new();
        index.insert(event("q", 1)).unwrap();
        index.insert(event("a", 1)).unwrap();
        index.insert(event("q", 2)).unwrap();
        index.insert(event("m", 1)).unwrap();

        let hosts: Vec<&str> = index.hosts().collect();
        assert_eq!(hosts, vec!["q", "a", "m"]);
    }

    #[test]
    fn events_iterate_host_then_time() {
        let mut index = EventIndex::new();
        index.insert(event("b", 2)).unwrap();
        index.insert(event("a", 1)).unwrap();
        index.insert(event("b", 1)).unwrap();

        let order: Vec<String> = index.events().map(|e| e.id().to_string()).collect();
        assert_eq!(order, vec!["b:1", "b:2", "a:1"]);
    }

    #[test]
    fn start_injection_is_idempotent() {
        let mut index = EventIndex::new();
        index.insert(event("a", 1)).unwrap();

        index.inject_start_events();
        index.inject_start_events();

        assert_eq!(index.count_of("a"), 2);
        assert!(index.get("a", 0).unwrap().is_start());
    }
}
