//! GraphML export
//!
//! Emits node label/type and per-property `<key>` declarations plus an
//! edge relation key. Export only.

use crate::GraphCodec;
use graphlift_model::{PropertyGraph, Result, ScalarValue};
use std::collections::BTreeMap;
use std::fmt::Write;

const FORMAT: &str = "graphml";

pub struct GraphmlCodec;

impl GraphCodec for GraphmlCodec {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn encode(&self, graph: &PropertyGraph) -> Result<String> {
        let mut property_types: BTreeMap<&str, &'static str> = BTreeMap::new();
        for node in &graph.nodes {
            for (key, value) in &node.properties {
                property_types.entry(key).or_insert(attr_type(value));
            }
        }

        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str("<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">\n");
        out.push_str("  <key id=\"label\" for=\"node\" attr.name=\"label\" attr.type=\"string\"/>\n");
        out.push_str("  <key id=\"type\" for=\"node\" attr.name=\"type\" attr.type=\"string\"/>\n");
        out.push_str(
            "  <key id=\"relation\" for=\"edge\" attr.name=\"relation\" attr.type=\"string\"/>\n",
        );
        for (key, attr_type) in &property_types {
            let _ = writeln!(
                out,
                "  <key id=\"prop_{0}\" for=\"node\" attr.name=\"{0}\" attr.type=\"{1}\"/>",
                escape(key),
                attr_type
            );
        }
        out.push_str("  <graph id=\"G\" edgedefault=\"directed\">\n");

        for node in &graph.nodes {
            let _ = writeln!(out, "    <node id=\"{}\">", escape(&node.id));
            let _ = writeln!(
                out,
                "      <data key=\"label\">{}</data>",
                escape(node.display_label())
            );
            if let Some(node_type) = &node.node_type {
                let _ = writeln!(
                    out,
                    "      <data key=\"type\">{}</data>",
                    escape(node_type)
                );
            }
            for (key, value) in &node.properties {
                let _ = writeln!(
                    out,
                    "      <data key=\"prop_{}\">{}</data>",
                    escape(key),
                    escape(&value.lexical())
                );
            }
            out.push_str("    </node>\n");
        }
        for edge in &graph.edges {
            let _ = writeln!(
                out,
                "    <edge source=\"{}\" target=\"{}\">",
                escape(&edge.source),
                escape(&edge.target)
            );
            let _ = writeln!(
                out,
                "      <data key=\"relation\">{}</data>",
                escape(&edge.relation)
            );
            out.push_str("    </edge>\n");
        }
        out.push_str("  </graph>\n</graphml>\n");
        Ok(out)
    }
}

fn attr_type(value: &ScalarValue) -> &'static str {
    match value {
        ScalarValue::Boolean(_) => "boolean",
        ScalarValue::Integer(_) => "long",
        ScalarValue::Float(_) => "double",
        ScalarValue::Date(_) | ScalarValue::String(_) => "string",
    }
}

fn escape(s: &str) -> String {
    quick_xml::escape::escape(s).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphlift_model::{Edge, Node};

    #[test]
    fn test_export_structure() {
        let mut graph = PropertyGraph::new();
        graph.add_node(
            Node::new("p1", "Zhang San")
                .with_type("Person")
                .with_property("age", ScalarValue::Integer(30)),
        );
        graph.add_node(Node::new("c1", "Tech & Co"));
        graph.add_edge(Edge::new("p1", "c1", "worksAt"));

        let out = GraphmlCodec.encode(&graph).unwrap();
        assert!(out.contains("<key id=\"prop_age\" for=\"node\" attr.name=\"age\" attr.type=\"long\"/>"));
        assert!(out.contains("<node id=\"p1\">"));
        assert!(out.contains("<data key=\"label\">Zhang San</data>"));
        assert!(out.contains("<data key=\"type\">Person</data>"));
        assert!(out.contains("<data key=\"prop_age\">30</data>"));
        assert!(out.contains("<data key=\"label\">Tech &amp; Co</data>"));
        assert!(out.contains("<edge source=\"p1\" target=\"c1\">"));
        assert!(out.contains("<data key=\"relation\">worksAt</data>"));
    }

    #[test]
    fn test_decode_is_unsupported() {
        assert!(GraphmlCodec.decode("<graphml/>").is_err());
    }
}
