use spaceline_core::{EdgeKind, EventId, SpaceTimeGraph};
use spaceline_test::fixtures;
use std::collections::{HashMap, HashSet};

fn build(lines: &[String]) -> SpaceTimeGraph {
    let mut graph = SpaceTimeGraph::new();
    graph.parse_log(lines).unwrap();
    graph.generate_edges().unwrap();
    graph
}

#[test]
fn every_edge_satisfies_the_causal_rules() {
    for fixture in fixtures::all() {
        let graph = build(&fixture.lines);
        let index = graph.index();
        let name = fixture.name;

        for (source, target, kind) in graph.edges() {
            let target_event = index.get(&target.host, target.time).unwrap();
            match kind {
                EdgeKind::ProcessOrder => {
                    assert_eq!(source.host, target.host, "{name}");
                    let next = index
                        .next_at_or_after(&source.host, source.time + 1)
                        .unwrap();
                    assert_eq!(
                        next.time, target.time,
                        "{name}: {source} -> {target} skips an event"
                    );
                }
                EdgeKind::Message => {
                    assert_ne!(source.host, target.host, "{name}");
                    assert_eq!(
                        target_event.clock.get(&source.host),
                        Some(source.time),
                        "{name}: {source} not in clock of {target}"
                    );
                }
            }
        }
    }
}

#[test]
fn message_edges_are_minimal() {
    for fixture in fixtures::all() {
        let graph = build(&fixture.lines);
        let index = graph.index();
        let name = fixture.name;

        let mut incoming: HashMap<EventId, Vec<EventId>> = HashMap::new();
        for (source, target, kind) in graph.edges() {
            if kind == EdgeKind::Message {
                incoming
                    .entry(target.clone())
                    .or_default()
                    .push(source.clone());
            }
        }

        for (target, sources) in &incoming {
            for a in sources {
                for c in sources {
                    if a == c {
                        continue;
                    }
                    let c_event = index.get(&c.host, c.time).unwrap();
                    let covered = c_event.clock.get(&a.host).map_or(false, |t| t >= a.time);
                    assert!(!covered, "{name}: edge {a} -> {target} is implied by {c}");
                }
            }
        }
    }
}

#[test]
fn generation_is_deterministic() {
    for fixture in fixtures::all() {
        let first = build(&fixture.lines);
        let second = build(&fixture.lines);
        let name = fixture.name;

        let a = serde_json::to_string(&first.view(&HashSet::new()).unwrap()).unwrap();
        let b = serde_json::to_string(&second.view(&HashSet::new()).unwrap()).unwrap();
        assert_eq!(a, b, "{name}");
    }
}

#[test]
fn view_indices_stay_dense_and_in_range() {
    for fixture in fixtures::all() {
        let graph = build(&fixture.lines);
        let view = graph.view(&HashSet::new()).unwrap();
        let stats = graph.stats().unwrap();
        let name = fixture.name;

        let visible = stats.events + stats.start_events;
        assert_eq!(view.nodes.len(), visible, "{name}");
        for edge in &view.edges {
            assert!(edge.source < view.nodes.len(), "{name}");
            assert!(edge.target < view.nodes.len(), "{name}");
            assert_ne!(edge.source, edge.target, "{name}");
        }
    }
}

#[test]
fn causal_graphs_are_acyclic() {
    for fixture in fixtures::all() {
        let graph = build(&fixture.lines);
        assert!(graph.stats().unwrap().is_acyclic, "{}", fixture.name);
    }
}

#[test]
fn start_nodes_have_no_incoming_edges() {
    for fixture in fixtures::all() {
        let graph = build(&fixture.lines);
        let name = fixture.name;
        for (source, target, _) in graph.edges() {
            assert_ne!(target.time, 0, "{name}: edge {source} -> {target}");
        }
    }
}

#[test]
fn every_event_has_exactly_one_process_parent() {
    for fixture in fixtures::all() {
        let graph = build(&fixture.lines);
        let name = fixture.name;

        let mut process_parents: HashMap<EventId, usize> = HashMap::new();
        for (_, target, kind) in graph.edges() {
            if kind == EdgeKind::ProcessOrder {
                *process_parents.entry(target.clone()).or_insert(0) += 1;
            }
        }

        for event in graph.index().events() {
            let expected = usize::from(!event.is_start());
            assert_eq!(
                process_parents.get(&event.id()).copied().unwrap_or(0),
                expected,
                "{name}: {}",
                event.id()
            );
        }
    }
}

#[test]
fn hiding_any_host_preserves_the_relative_order_of_the_rest() {
    for fixture in fixtures::all() {
        let graph = build(&fixture.lines);
        let full = graph.view(&HashSet::new()).unwrap();
        let name = fixture.name;

        let hosts: Vec<String> = graph.index().hosts().map(str::to_string).collect();
        for host in hosts {
            let hidden: HashSet<String> = [host.clone()].into_iter().collect();
            let trimmed = graph.view(&hidden).unwrap();

            let expected: Vec<(&str, &str)> = full.nodes
                .iter()
                .filter(|n| n.group != host)
                .map(|n| (n.group.as_str(), n.name.as_str()))
                .collect();
            let actual: Vec<(&str, &str)> = trimmed
                .nodes
                .iter()
                .map(|n| (n.group.as_str(), n.name.as_str()))
                .collect();
            assert_eq!(expected, actual, "{name}: hiding {host}");
        }
    }
}
