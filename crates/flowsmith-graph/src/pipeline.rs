//! Turning an editor graph into something the engine can walk.

use flowsmith_types::{ExecutionError, Node, NodeKind, NodeType, PipelineGraph};
use std::collections::HashSet;

/// Node-level checks: unique ids and complete decision/repeat configuration
pub fn validate_nodes(nodes: &[Node]) -> Result<(), ExecutionError> {
    let mut seen = HashSet::new();
    for node in nodes {
        if node.id.trim().is_empty() {
            return Err(ExecutionError::validation("node id must not be empty"));
        }
        if !seen.insert(node.id.as_str()) {
            return Err(
                ExecutionError::validation(format!("duplicate node id '{}'", node.id)).at(node),
            );
        }

        match &node.kind {
            NodeKind::Decision { config } => {
                if config.condition_prompt.trim().is_empty() {
                    return Err(missing_config(node, "condition prompt"));
                }
                if config.route_on_true.trim().is_empty() {
                    return Err(missing_config(node, "true route"));
                }
                if config.route_on_false.trim().is_empty() {
                    return Err(missing_config(node, "false route"));
                }
            }
            NodeKind::Repeat { config } => {
                if config.condition_prompt.trim().is_empty() {
                    return Err(missing_config(node, "condition prompt"));
                }
            }
            NodeKind::Source | NodeKind::Transform { .. } | NodeKind::Sink => {}
        }
    }
    Ok(())
}

fn missing_config(node: &Node, what: &str) -> ExecutionError {
    ExecutionError::validation(format!("{} node is missing its {}", node.node_type(), what)).at(node)
}

/// Full pipeline checks: node checks plus exactly one source and one sink
pub fn validate(graph: &PipelineGraph) -> Result<(), ExecutionError> {
    validate_nodes(&graph.nodes)?;
    single_node(graph, NodeType::Source)?;
    single_node(graph, NodeType::Sink)?;
    Ok(())
}

fn single_node(graph: &PipelineGraph, node_type: NodeType) -> Result<&Node, ExecutionError> {
    let mut matches = graph.nodes_of(node_type);
    let first = matches.next().ok_or_else(|| {
        ExecutionError::validation(format!("pipeline requires a {} node", node_type))
    })?;
    if let Some(extra) = matches.next() {
        return Err(ExecutionError::validation(format!(
            "only one {} node is allowed",
            node_type
        ))
        .at(extra));
    }
    Ok(first)
}

/// Ordered main path: from the source, follow the first non-branch edge out of
/// each node until none is left. A decision without such an edge continues
/// where its two routes meet again. The sink must be on the path.
pub fn resolve_path(graph: &PipelineGraph) -> Result<Vec<&Node>, ExecutionError> {
    let source = single_node(graph, NodeType::Source)?;
    let sink = single_node(graph, NodeType::Sink)?;

    let mut path = vec![source];
    let mut on_path = HashSet::from([source.id.as_str()]);
    let mut current = source;

    // A dangling edge or a decision whose routes never meet ends the path
    while let Some(next) = successor(graph, current, &mut Vec::new()) {
        if !on_path.insert(next.id.as_str()) {
            return Err(ExecutionError::validation(format!(
                "pipeline edges form a cycle through '{}'",
                next.id
            ))
            .at(next));
        }
        path.push(next);
        current = next;
    }

    if !on_path.contains(sink.id.as_str()) {
        return Err(ExecutionError::validation("pipeline is not fully connected").at(sink));
    }
    Ok(path)
}

/// First node reachable from both routes of `decision`, following each
/// route's plain edges
pub fn join_point<'g>(graph: &'g PipelineGraph, decision: &Node) -> Option<&'g Node> {
    find_join(graph, decision, &mut Vec::new())
}

/// Nodes a decision runs after picking `target_id`: the route's chain, up to
/// the node where both routes meet. Just the target when the decision keeps
/// its own plain edge.
pub fn route_segment<'g>(
    graph: &'g PipelineGraph,
    decision: &Node,
    target_id: &str,
) -> Vec<&'g Node> {
    if graph.next_edge(&decision.id).is_some() {
        return graph.node(target_id).into_iter().collect();
    }

    let join = join_point(graph, decision);
    let mut resolving = vec![decision.id.clone()];
    chain(graph, target_id, &mut resolving)
        .into_iter()
        .take_while(|node| join.map_or(true, |join| join.id != node.id))
        .collect()
}

fn successor<'g>(
    graph: &'g PipelineGraph,
    node: &Node,
    resolving: &mut Vec<String>,
) -> Option<&'g Node> {
    match graph.next_edge(&node.id) {
        Some(edge) => graph.node(&edge.target),
        None => find_join(graph, node, resolving),
    }
}

/// `resolving` holds the decisions being joined further up, so routes that
/// loop back into them end instead of recursing forever
fn find_join<'g>(
    graph: &'g PipelineGraph,
    decision: &Node,
    resolving: &mut Vec<String>,
) -> Option<&'g Node> {
    let NodeKind::Decision { config } = &decision.kind else {
        return None;
    };
    if resolving.contains(&decision.id) {
        return None;
    }

    resolving.push(decision.id.clone());
    let on_true = chain(graph, &config.route_on_true, resolving);
    let on_false = chain(graph, &config.route_on_false, resolving);
    resolving.pop();

    on_true
        .into_iter()
        .find(|node| on_false.iter().any(|other| other.id == node.id))
}

fn chain<'g>(graph: &'g PipelineGraph, start: &str, resolving: &mut Vec<String>) -> Vec<&'g Node> {
    let mut nodes: Vec<&Node> = Vec::new();
    let mut current = graph.node(start);

    while let Some(node) = current {
        if nodes.iter().any(|seen| seen.id == node.id) {
            break;
        }
        nodes.push(node);
        current = successor(graph, node, resolving);
    }
    nodes
}

/// Explicit run input if given, else the source node's own text
pub fn initial_value(graph: &PipelineGraph, input: Option<&str>) -> Result<String, ExecutionError> {
    let source = single_node(graph, NodeType::Source)?;
    let value = input.unwrap_or(&source.prompt);
    if value.trim().is_empty() {
        return Err(ExecutionError::validation("start node has no value").at(source));
    }
    Ok(value.to_string())
}
