//! Tab-separated edge list codec
//!
//! `source<TAB>target<TAB>relation` per line. Nodes are inferred from the
//! endpoints on decode; isolated nodes do not survive this format.

use crate::GraphCodec;
use graphlift_model::{Edge, Error, Node, PropertyGraph, Result};
use std::collections::BTreeSet;
use std::fmt::Write;

const FORMAT: &str = "edgelist";

pub struct EdgeListCodec;

impl GraphCodec for EdgeListCodec {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn encode(&self, graph: &PropertyGraph) -> Result<String> {
        let mut out = String::new();
        for edge in &graph.edges {
            for field in [&edge.source, &edge.target, &edge.relation] {
                if field.contains(['\t', '\n']) {
                    return Err(Error::encoding(format!(
                        "{:?} cannot appear in an edge list",
                        field
                    )));
                }
            }
            let _ = writeln!(out, "{}\t{}\t{}", edge.source, edge.target, edge.relation);
        }
        Ok(out)
    }

    fn decode(&self, input: &str) -> Result<PropertyGraph> {
        let mut graph = PropertyGraph::new();
        let mut seen: BTreeSet<String> = BTreeSet::new();
        for (lineno, line) in input.lines().enumerate() {
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split('\t');
            let (source, target, relation) =
                match (fields.next(), fields.next(), fields.next(), fields.next()) {
                    (Some(s), Some(t), Some(r), None) => (s, t, r),
                    _ => {
                        return Err(Error::parse_at(
                            FORMAT,
                            lineno + 1,
                            "expected `source<TAB>target<TAB>relation`",
                        ))
                    }
                };
            for id in [source, target] {
                if seen.insert(id.to_string()) {
                    graph.add_node(Node::new(id, id));
                }
            }
            graph.add_edge(Edge::new(source, target, relation));
        }
        Ok(graph)
    }
}
