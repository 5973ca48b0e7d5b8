use crate::clock::VectorClock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an event within a trace: the producing host plus the event's
/// own component of its vector clock. Rendered as `host:time`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId {
    pub host: String,
    pub time: u64,
}

impl EventId {
    pub fn new(host: impl Into<String>, time: u64) -> Self {
        Self {
            host: host.into(),
            time,
        }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.time)
    }
}

/// One logged occurrence on one host.
///
/// `time` is the event's own entry in `clock` (`clock[host]`); parsed events
/// always have `time >= 1`, while `time == 0` marks the synthetic start event
/// injected per host before edge generation. The label and input line are
/// opaque payload for the rendering layer and are never interpreted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub host: String,
    pub time: u64,
    pub clock: VectorClock,
    pub label: String,
    pub line: Option<usize>,
}

impl Event {
    /// The synthetic start event for a host: time 0, clock `{host: 0}`.
    pub fn start(host: &str) -> Self {
        Self {
            host: host.to_string(),
            time: 0,
            clock: VectorClock::single(host, 0),
            label: start_label(host),
            line: None,
        }
    }

    pub fn is_start(&self) -> bool {
        self.time == 0
    }

    pub fn id(&self) -> EventId {
        EventId::new(self.host.clone(), self.time)
    }
}

/// Display label for a host's start node. Host ids shaped like `proc[tid]`
/// show just the bracketed segment, matching the id convention of the
/// instrumentation that produces these logs; anything else shows the full id.
fn start_label(host: &str) -> String {
    let inner = match (host.find('['), host.rfind(']')) {
        (Some(open), Some(close)) if open < close => &host[open + 1..close],
        _ => host,
    };
    format!("Host: {inner}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_event_has_reserved_time_zero() {
        let event = Event::start("alpha");
        assert!(event.is_start());
        assert_eq!(event.time, 0);
        assert_eq!(event.clock.get("alpha"), Some(0));
        assert_eq!(event.line, None);
    }

    #[test]
    fn start_label_extracts_bracketed_segment() {
        assert_eq!(Event::start("worker[3]").label, "Host: 3");
        assert_eq!(Event::start("10.0.0.1[srv]").label, "Host: srv");
        assert_eq!(Event::start("plain").label, "Host: plain");
        assert_eq!(Event::start("odd]brackets[").label, "Host: odd]brackets[");
    }

    #[test]
    fn event_id_renders_host_and_time() {
        let id = EventId::new("node-1", 7);
        assert_eq!(id.to_string(), "node-1:7");
    }
}
