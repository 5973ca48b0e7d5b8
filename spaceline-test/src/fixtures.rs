use spaceline_core::VectorClock;
use std::collections::BTreeMap;

/// Scripted network of hosts emitting wire-format trace lines with
/// consistent vector clocks. Each `local`/`send`/`recv` call ticks the
/// host's own component and appends one `(logText, stampLine)` pair.
pub struct SimNet {
    clocks: BTreeMap<String, VectorClock>,
    lines: Vec<String>,
}

impl SimNet {
    pub fn new(hosts: &[&str]) -> Self {
        let clocks = hosts
            .iter()
            .map(|host| (host.to_string(), VectorClock::new()))
            .collect();
        Self {
            clocks,
            lines: Vec::new(),
        }
    }

    /// Record a purely local event on `host`.
    pub fn local(&mut self, host: &str, log: &str) {
        self.tick_and_emit(host, log);
    }

    /// Record a send on `host`; returns the clock snapshot the message carries.
    pub fn send(&mut self, host: &str, log: &str) -> VectorClock {
        self.tick_and_emit(host, log);
        self.clocks[host].clone()
    }

    /// Record a receive on `host`, merging the carried clock before ticking.
    pub fn recv(&mut self, host: &str, log: &str, carried: &VectorClock) {
        let clock = self.clocks.get_mut(host).expect("unknown host");
        clock.merge(carried);
        self.tick_and_emit(host, log);
    }

    /// Terminate with the blank-line sentinel and hand back the trace.
    pub fn finish(mut self) -> Vec<String> {
        self.lines.push(String::new());
        self.lines
    }

    fn tick_and_emit(&mut self, host: &str, log: &str) {
        let clock = self.clocks.get_mut(host).expect("unknown host");
        clock.increment(host);
        let stamp = serde_json::to_string(clock).expect("clock serializes");
        self.lines.push(log.to_string());
        self.lines.push(format!("{host} {stamp}"));
    }
}

/// A scripted trace with its expected graph shape.
pub struct TraceFixture {
    pub name: &'static str,
    pub lines: Vec<String>,
    pub hosts: usize,
    pub events: usize,
    pub message_edges: usize,
}

/// Two hosts exchanging a request and a reply.
pub fn ping_pong() -> TraceFixture {
    let mut net = SimNet::new(&["pinger", "ponger"]);
    let ping = net.send("pinger", "send ping");
    net.recv("ponger", "recv ping", &ping);
    let pong = net.send("ponger", "send pong");
    net.recv("pinger", "recv pong", &pong);

    TraceFixture {
        name: "ping_pong",
        lines: net.finish(),
        hosts: 2,
        events: 4,
        message_edges: 2,
    }
}

/// A message relayed a -> b -> c. The relay's clock already covers the
/// origin, so c gets exactly one direct cross-host parent.
pub fn relay_chain() -> TraceFixture {
    let mut net = SimNet::new(&["origin", "relay", "sink"]);
    let first = net.send("origin", "emit");
    net.recv("relay", "forwarding", &first);
    let second = net.send("relay", "forward");
    net.recv("sink", "deliver", &second);

    TraceFixture {
        name: "relay_chain",
        lines: net.finish(),
        hosts: 3,
        events: 4,
        message_edges: 2,
    }
}

/// One broadcaster, two independent receivers.
pub fn fan_out() -> TraceFixture {
    let mut net = SimNet::new(&["hub", "spoke-a", "spoke-b"]);
    let msg = net.send("hub", "broadcast");
    net.recv("spoke-a", "accepted", &msg);
    net.recv("spoke-b", "accepted", &msg);

    TraceFixture {
        name: "fan_out",
        lines: net.finish(),
        hosts: 3,
        events: 3,
        message_edges: 2,
    }
}

/// Two causally unrelated senders collected by one host; both stay direct
/// parents because neither clock covers the other.
pub fn concurrent_senders() -> TraceFixture {
    let mut net = SimNet::new(&["left", "right", "collector"]);
    let from_left = net.send("left", "offer");
    let from_right = net.send("right", "offer");
    net.recv("collector", "take left", &from_left);
    net.recv("collector", "take right", &from_right);

    TraceFixture {
        name: "concurrent_senders",
        lines: net.finish(),
        hosts: 3,
        events: 4,
        message_edges: 2,
    }
}

/// A longer mixed workload touching every edge rule at once.
pub fn busy_cluster() -> TraceFixture {
    let mut net = SimNet::new(&["api", "db", "cache"]);
    net.local("api", "boot");
    let query = net.send("api", "query users");
    net.recv("db", "run query", &query);
    let rows = net.send("db", "rows ready");
    net.recv("cache", "fill from db", &rows);
    net.recv("api", "got rows", &rows);
    let evict = net.send("api", "evict stale");
    net.recv("cache", "evicted", &evict);
    net.local("db", "vacuum");

    TraceFixture {
        name: "busy_cluster",
        lines: net.finish(),
        hosts: 3,
        events: 9,
        message_edges: 4,
    }
}

/// Every fixture, for property-style sweeps.
pub fn all() -> Vec<TraceFixture> {
    vec![
        ping_pong(),
        relay_chain(),
        fan_out(),
        concurrent_senders(),
        busy_cluster(),
    ]
}
