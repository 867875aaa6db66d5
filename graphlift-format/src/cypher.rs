//! Cypher script export
//!
//! One `CREATE` per node, then one `MATCH ... CREATE` per edge so the
//! script is order-independent over node ids. Export only.

use crate::GraphCodec;
use graphlift_model::{PropertyGraph, Result, ScalarValue};
use std::fmt::Write;

const FORMAT: &str = "cypher";

pub struct CypherCodec;

impl GraphCodec for CypherCodec {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn encode(&self, graph: &PropertyGraph) -> Result<String> {
        let mut out = String::new();
        for node in &graph.nodes {
            out.push_str("CREATE (");
            if let Some(node_type) = &node.node_type {
                out.push(':');
                out.push_str(&identifier(node_type));
            }
            let _ = write!(
                out,
                " {{id: {}, label: {}",
                quote(&node.id),
                quote(node.display_label())
            );
            for (key, value) in &node.properties {
                let _ = write!(out, ", {}: {}", identifier(key), render_value(value));
            }
            out.push_str("});\n");
        }
        for edge in &graph.edges {
            let _ = write!(
                out,
                "MATCH (a {{id: {}}}), (b {{id: {}}}) CREATE (a)-[:{}",
                quote(&edge.source),
                quote(&edge.target),
                identifier(&edge.relation)
            );
            if !edge.properties.is_empty() {
                out.push_str(" {");
                let mut first = true;
                for (key, value) in &edge.properties {
                    if !first {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{}: {}", identifier(key), render_value(value));
                    first = false;
                }
                out.push('}');
            }
            out.push_str("]->(b);\n");
        }
        Ok(out)
    }
}

fn render_value(value: &ScalarValue) -> String {
    match value {
        ScalarValue::Boolean(b) => b.to_string(),
        ScalarValue::Integer(i) => i.to_string(),
        ScalarValue::Float(f) => f.to_string(),
        ScalarValue::Date(d) => format!("date('{}')", d.format("%Y-%m-%d")),
        ScalarValue::String(s) => quote(s),
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// Backtick-quote anything that is not a plain identifier
fn identifier(s: &str) -> String {
    let plain = !s.is_empty()
        && s.chars().next().map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        s.to_string()
    } else {
        format!("`{}`", s.replace('`', "``"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphlift_model::{Edge, Node};

    #[test]
    fn test_export_script() {
        let mut graph = PropertyGraph::new();
        graph.add_node(
            Node::new("p1", "Zhang San")
                .with_type("Person")
                .with_property("age", ScalarValue::Integer(30)),
        );
        graph.add_node(Node::new("c1", "O'Reilly"));
        graph.add_edge(
            Edge::new("p1", "c1", "works at")
                .with_property("since", ScalarValue::Integer(2020)),
        );

        let out = CypherCodec.encode(&graph).unwrap();
        assert!(out.contains("CREATE (:Person {id: 'p1', label: 'Zhang San', age: 30});"));
        assert!(out.contains("CREATE ( {id: 'c1', label: 'O\\'Reilly'});"));
        assert!(out.contains(
            "MATCH (a {id: 'p1'}), (b {id: 'c1'}) CREATE (a)-[:`works at` {since: 2020}]->(b);"
        ));
    }

    #[test]
    fn test_decode_is_unsupported() {
        assert!(CypherCodec.decode("CREATE ()").is_err());
    }
}
