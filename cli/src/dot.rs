use spaceline_core::GraphView;

/// Render a graph view as a GraphViz digraph.
///
/// Process-order edges are solid, cross-host message edges dashed. Start
/// nodes get a distinct shape so each host's timeline origin is visible.
pub fn render(view: &GraphView) -> String {
    let mut result = String::new();

    result.push_str("digraph spacetime {\n");
    result.push_str("  rankdir=TB;\n");
    result.push_str("  node [shape=box, fontname=\"monospace\"];\n");

    for (index, node) in view.nodes.iter().enumerate() {
        if node.start_node {
            result.push_str(&format!(
                "  n{} [label=\"{}\", shape=doublecircle];\n",
                index,
                escape(&node.name)
            ));
        } else {
            result.push_str(&format!(
                "  n{} [label=\"{}: {}\"];\n",
                index,
                escape(&node.group),
                escape(&node.name)
            ));
        }
    }

    for edge in &view.edges {
        let cross_host = view.nodes[edge.source].group != view.nodes[edge.target].group;
        let style = if cross_host { " [style=dashed]" } else { "" };
        result.push_str(&format!("  n{} -> n{}{};\n", edge.source, edge.target, style));
    }

    result.push_str("}\n");
    result
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
