//! GEXF export
//!
//! Nodes carry their label and a `type` attvalue; edges carry the relation
//! as their label. Export only.

use crate::GraphCodec;
use graphlift_model::{PropertyGraph, Result};
use std::fmt::Write;

const FORMAT: &str = "gexf";

pub struct GexfCodec;

impl GraphCodec for GexfCodec {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn encode(&self, graph: &PropertyGraph) -> Result<String> {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str("<gexf xmlns=\"http://gexf.net/1.3\" version=\"1.3\">\n");
        out.push_str("  <graph defaultedgetype=\"directed\">\n");
        out.push_str("    <attributes class=\"node\">\n");
        out.push_str("      <attribute id=\"0\" title=\"type\" type=\"string\"/>\n");
        out.push_str("    </attributes>\n");

        out.push_str("    <nodes>\n");
        for node in &graph.nodes {
            match &node.node_type {
                Some(node_type) => {
                    let _ = writeln!(
                        out,
                        "      <node id=\"{}\" label=\"{}\">",
                        escape(&node.id),
                        escape(node.display_label())
                    );
                    out.push_str("        <attvalues>\n");
                    let _ = writeln!(
                        out,
                        "          <attvalue for=\"0\" value=\"{}\"/>",
                        escape(node_type)
                    );
                    out.push_str("        </attvalues>\n");
                    out.push_str("      </node>\n");
                }
                None => {
                    let _ = writeln!(
                        out,
                        "      <node id=\"{}\" label=\"{}\"/>",
                        escape(&node.id),
                        escape(node.display_label())
                    );
                }
            }
        }
        out.push_str("    </nodes>\n");

        out.push_str("    <edges>\n");
        for (i, edge) in graph.edges.iter().enumerate() {
            let _ = writeln!(
                out,
                "      <edge id=\"{}\" source=\"{}\" target=\"{}\" label=\"{}\"/>",
                i,
                escape(&edge.source),
                escape(&edge.target),
                escape(&edge.relation)
            );
        }
        out.push_str("    </edges>\n");
        out.push_str("  </graph>\n</gexf>\n");
        Ok(out)
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
        graph.add_node(Node::new("p1", "Zhang San").with_type("Person"));
        graph.add_node(Node::new("c1", "Tech Co"));
        graph.add_edge(Edge::new("p1", "c1", "worksAt"));

        let out = GexfCodec.encode(&graph).unwrap();
        assert!(out.contains("<node id=\"p1\" label=\"Zhang San\">"));
        assert!(out.contains("<attvalue for=\"0\" value=\"Person\"/>"));
        assert!(out.contains("<node id=\"c1\" label=\"Tech Co\"/>"));
        assert!(out.contains(
            "<edge id=\"0\" source=\"p1\" target=\"c1\" label=\"worksAt\"/>"
        ));
    }

    #[test]
    fn test_decode_is_unsupported() {
        assert!(GexfCodec.decode("<gexf/>").is_err());
    }
}
