use crate::event::EventId;
use crate::graph::SpaceTimeGraph;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

/// One visible event in the serialized graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeView {
    pub name: String,
    pub group: String,
    #[serde(rename = "startNode", default, skip_serializing_if = "is_false")]
    pub start_node: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

/// Directed edge as a pair of indices into [`GraphView::nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeView {
    pub source: usize,
    pub target: usize,
}

/// The external node/edge/host listing consumed by rendering layers.
///
/// Node indices are dense and zero-based, assigned in host-then-time order
/// over the visible hosts; they are a serialization detail, not identity.
/// `hosts` is ordered by descending event count, first appearance breaking
/// ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphView {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    pub hosts: Vec<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl GraphView {
    pub(crate) fn build(graph: &SpaceTimeGraph, hidden: &HashSet<String>) -> Self {
        let index = graph.index();
        let visible: Vec<&str> = index
            .hosts()
            .filter(|host| !hidden.contains(*host))
            .collect();

        let mut nodes = Vec::new();
        let mut slots: HashMap<EventId, usize> = HashMap::new();
        for host in &visible {
            for event in index.events_of(host) {
                slots.insert(event.id(), nodes.len());
                nodes.push(NodeView {
                    name: event.label.clone(),
                    group: event.host.clone(),
                    start_node: event.is_start(),
                    line: event.line,
                });
            }
        }

        let edges = graph
            .edges()
            .filter_map(|(source, target, _)| {
                match (slots.get(source), slots.get(target)) {
                    (Some(&source), Some(&target)) => Some(EdgeView { source, target }),
                    _ => None,
                }
            })
            .collect();

        let mut hosts: Vec<String> = visible.iter().map(|host| host.to_string()).collect();
        hosts.sort_by_key(|host| Reverse(index.count_of(host)));

        Self {
            nodes,
            edges,
            hosts,
        }
    }
}
