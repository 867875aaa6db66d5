//! Adjacency-list codec
//!
//! One line per source node: `id: target[relation] target2[relation2]`.
//! Isolated nodes emit a bare `id:` line. Labels, types, and properties
//! are not representable in this format.

use crate::GraphCodec;
use graphlift_model::{Edge, Error, Node, PropertyGraph, Result};
use std::collections::BTreeSet;
use std::fmt::Write;

const FORMAT: &str = "adjacency";

pub struct AdjacencyCodec;

impl GraphCodec for AdjacencyCodec {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn encode(&self, graph: &PropertyGraph) -> Result<String> {
        for node in &graph.nodes {
            check_field(&node.id)?;
        }
        for edge in &graph.edges {
            check_field(&edge.source)?;
            check_field(&edge.target)?;
            check_field(&edge.relation)?;
        }

        let mut out = String::new();
        for node in &graph.nodes {
            let _ = write!(out, "{}:", node.id);
            for edge in graph.edges.iter().filter(|e| e.source == node.id) {
                let _ = write!(out, " {}[{}]", edge.target, edge.relation);
            }
            out.push('\n');
        }
        // edges whose source was never declared as a node
        let declared: BTreeSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        let orphans: BTreeSet<&str> = graph
            .edges
            .iter()
            .map(|e| e.source.as_str())
            .filter(|s| !declared.contains(s))
            .collect();
        for source in orphans {
            let _ = write!(out, "{}:", source);
            for edge in graph.edges.iter().filter(|e| e.source == source) {
                let _ = write!(out, " {}[{}]", edge.target, edge.relation);
            }
            out.push('\n');
        }
        Ok(out)
    }

    fn decode(&self, input: &str) -> Result<PropertyGraph> {
        let mut graph = PropertyGraph::new();
        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut ensure = |graph: &mut PropertyGraph, id: &str| {
            if seen.insert(id.to_string()) {
                graph.add_node(Node::new(id, id));
            }
        };

        for (lineno, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (source, targets) = line.split_once(':').ok_or_else(|| {
                Error::parse_at(FORMAT, lineno + 1, "expected `id: targets...`")
            })?;
            let source = source.trim();
            if source.is_empty() {
                return Err(Error::parse_at(FORMAT, lineno + 1, "empty node id"));
            }
            ensure(&mut graph, source);
            for entry in targets.split_whitespace() {
                let (target, relation) = entry
                    .strip_suffix(']')
                    .and_then(|e| e.split_once('['))
                    .ok_or_else(|| {
                        Error::parse_at(
                            FORMAT,
                            lineno + 1,
                            format!("expected `target[relation]`, got {:?}", entry),
                        )
                    })?;
                ensure(&mut graph, target);
                graph.add_edge(Edge::new(source, target, relation));
            }
        }
        Ok(graph)
    }
}

fn check_field(field: &str) -> Result<()> {
    if field.contains([' ', ':', '[', ']', '\n', '\t']) {
        return Err(Error::encoding(format!(
            "{:?} cannot appear in an adjacency list",
            field
        )));
    }
    Ok(())
}
