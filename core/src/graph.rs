use crate::error::{Error, StateError};
use crate::event::{Event, EventId};
use crate::index::EventIndex;
use crate::parse::parse_lines;
use crate::view::GraphView;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// How one event causes another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Consecutive events on the same host.
    ProcessOrder,
    /// Minimal cross-host causality derived from the vector clocks.
    Message,
}

/// Builder phases. Operations are valid in exactly one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuilderState {
    Empty,
    Parsed,
    EdgesGenerated,
}

/// Space-time causality graph reconstructed from a vector-clock trace.
///
/// One-shot pipeline: [`parse_log`](Self::parse_log), then
/// [`generate_edges`](Self::generate_edges), then read-only access through
/// [`view`](Self::view), [`stats`](Self::stats) and the edge iterator.
/// Out-of-order calls return [`StateError`] and leave the graph untouched.
pub struct SpaceTimeGraph {
    index: EventIndex,
    graph: DiGraph<EventId, EdgeKind>,
    nodes: HashMap<EventId, NodeIndex>,
    state: BuilderState,
}

impl SpaceTimeGraph {
    pub fn new() -> Self {
        Self {
            index: EventIndex::new(),
            graph: DiGraph::new(),
            nodes: HashMap::new(),
            state: BuilderState::Empty,
        }
    }

    /// Parse alternating `(logText, stampLine)` pairs into the event index.
    pub fn parse_log<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<(), Error> {
        if self.state != BuilderState::Empty {
            return Err(StateError::AlreadyParsed.into());
        }
        self.index = parse_lines(lines)?;
        self.state = BuilderState::Parsed;
        Ok(())
    }

    /// Inject per-host start events and compute the causal edge set: one
    /// process-order edge between consecutive events of a host, plus the
    /// minimal cross-host message edges implied by the vector clocks.
    pub fn generate_edges(&mut self) -> Result<(), StateError> {
        match self.state {
            BuilderState::Empty => return Err(StateError::NotParsed),
            BuilderState::EdgesGenerated => return Err(StateError::EdgesAlreadyGenerated),
            BuilderState::Parsed => {}
        }

        self.index.inject_start_events();

        for event in self.index.events() {
            let id = event.id();
            let node = self.graph.add_node(id.clone());
            self.nodes.insert(id, node);
        }

        let planned = plan_edges(&self.index);
        for (source, target, kind) in planned {
            if let (Some(&a), Some(&b)) = (self.nodes.get(&source), self.nodes.get(&target)) {
                self.graph.add_edge(a, b, kind);
            }
        }

        self.state = BuilderState::EdgesGenerated;
        tracing::debug!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "generated causal edges"
        );
        Ok(())
    }

    /// Serializable node/edge/host listing with `hidden` hosts removed.
    pub fn view(&self, hidden: &HashSet<String>) -> Result<GraphView, StateError> {
        if self.state != BuilderState::EdgesGenerated {
            return Err(StateError::EdgesNotGenerated);
        }
        Ok(GraphView::build(self, hidden))
    }

    /// Counts over the generated graph.
    pub fn stats(&self) -> Result<GraphStats, StateError> {
        if self.state != BuilderState::EdgesGenerated {
            return Err(StateError::EdgesNotGenerated);
        }
        let start_events = self.index
            .hosts()
            .filter(|host| self.index.get(host, 0).is_some())
            .count();
        let process_edges = self.edges()
            .filter(|(_, _, kind)| *kind == EdgeKind::ProcessOrder)
            .count();
        let message_edges = self.graph.edge_count() - process_edges;
        Ok(GraphStats {
            hosts: self.index.host_count(),
            events: self.index.len() - start_events,
            start_events,
            edges: self.graph.edge_count(),
            process_edges,
            message_edges,
            is_acyclic: !is_cyclic_directed(&self.graph),
        })
    }

    /// The parsed (and, after edge generation, start-augmented) event index.
    pub fn index(&self) -> &EventIndex {
        &self.index
    }

    /// All edges in generation order.
    pub fn edges(&self) -> impl Iterator<Item = (&EventId, &EventId, EdgeKind)> + '_ {
        self.graph.edge_references().map(|edge| {
            (
                &self.graph[edge.source()],
                &self.graph[edge.target()],
                *edge.weight(),
            )
        })
    }
}

impl Default for SpaceTimeGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk every host timeline and decide the full edge list.
///
/// `accounted` tracks, per host walk, the highest time per host already
/// reachable through the edges emitted so far; only clock entries above it
/// can name a new direct predecessor. Candidates that another candidate's
/// clock already covers are transitively implied and dropped.
fn plan_edges(index: &EventIndex) -> Vec<(EventId, EventId, EdgeKind)> {
    let mut planned = Vec::new();
    let hosts: Vec<String> = index.hosts().map(str::to_string).collect();

    for host in &hosts {
        let mut accounted: BTreeMap<&str, u64> = BTreeMap::new();
        let mut prev: Option<&Event> = None;
        let mut cur = index.get(host, 0);

        while let Some(event) = cur {
            if let Some(prev) = prev {
                planned.push((prev.id(), event.id(), EdgeKind::ProcessOrder));
            }
            accounted.insert(&event.host, event.time);

            let mut candidates: Vec<&Event> = Vec::new();
            for (other, time) in event.clock.entries() {
                let newly_seen = accounted.get(other).map_or(true, |&seen| seen < time);
                if !newly_seen {
                    continue;
                }
                accounted.insert(other, time);
                match index.get(other, time) {
                    Some(candidate) => candidates.push(candidate),
                    None => tracing::warn!(
                        host = other,
                        time,
                        at = %event.id(),
                        "clock references an event missing from the trace"
                    ),
                }
            }

            let mut dominated: HashSet<EventId> = HashSet::new();
            for candidate in &candidates {
                for (other, time) in candidate.clock.entries() {
                    if other != candidate.host {
                        dominated.insert(EventId::new(other, time));
                    }
                }
            }
            for candidate in &candidates {
                if !dominated.contains(&candidate.id()) {
                    planned.push((candidate.id(), event.id(), EdgeKind::Message));
                }
            }

            prev = Some(event);
            cur = event
                .time
                .checked_add(1)
                .and_then(|next| index.next_at_or_after(host, next));
        }
    }

    planned
}

/// Summary counts for a generated graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub hosts: usize,
    pub events: usize,
    pub start_events: usize,
    pub edges: usize,
    pub process_edges: usize,
    pub message_edges: usize,
    pub is_acyclic: bool,
}
