//! Property graph to triple model encoding

use crate::IdentifierRegistry;
use graphlift_model::{PropertyGraph, Result, Term, TripleSet};
use graphlift_vocab::{rdf, rdfs, reify};

/// Encodes a property graph into the canonical triple model
///
/// The registry is borrowed mutably so node URIs minted here stay visible
/// to a later decode in the same conversion.
pub struct GraphEncoder<'a> {
    registry: &'a mut IdentifierRegistry,
    edge_counter: usize,
}

impl<'a> GraphEncoder<'a> {
    pub fn new(registry: &'a mut IdentifierRegistry) -> Self {
        Self {
            registry,
            edge_counter: 0,
        }
    }

    /// Encode a graph into a triple set
    ///
    /// Per node: one `rdf:type` triple when a type tag is present, one
    /// `rdfs:label` triple always (label falls back to the node id), and
    /// one typed-literal triple per property. Plain edges become a single
    /// relation triple; edges carrying properties are reified onto a blank
    /// subject with `hasSource`/`hasTarget` endpoints and a `_Edge` class.
    pub fn encode(&mut self, graph: &PropertyGraph) -> Result<TripleSet> {
        let mut set = TripleSet::with_base(self.registry.base_uri());
        set.prefixes = self.registry.prefixes();

        let rdf_type = Term::iri(rdf::TYPE);
        let rdfs_label = Term::iri(rdfs::LABEL);

        for node in &graph.nodes {
            let subject = Term::Iri(self.registry.uri_for(&node.id)?);
            if let Some(node_type) = &node.node_type {
                set.add(
                    subject.clone(),
                    rdf_type.clone(),
                    Term::iri(self.registry.resource_uri(node_type)),
                );
            }
            set.add(
                subject.clone(),
                rdfs_label.clone(),
                Term::string(node.display_label()),
            );
            for (key, value) in &node.properties {
                set.add(
                    subject.clone(),
                    Term::iri(self.registry.resource_uri(key)),
                    value.to_term(),
                );
            }
        }

        for edge in &graph.edges {
            if !graph.contains_node(&edge.source) || !graph.contains_node(&edge.target) {
                tracing::warn!(
                    source = %edge.source,
                    target = %edge.target,
                    relation = %edge.relation,
                    "edge endpoint not declared as a node"
                );
            }
            let source = Term::Iri(self.registry.uri_for(&edge.source)?);
            let target = Term::Iri(self.registry.uri_for(&edge.target)?);

            if edge.properties.is_empty() {
                set.add(
                    source,
                    Term::iri(self.registry.resource_uri(&edge.relation)),
                    target,
                );
            } else {
                let statement = Term::blank(format!("e{}", self.edge_counter));
                self.edge_counter += 1;
                let class_uri = format!(
                    "{}{}",
                    self.registry.resource_uri(&edge.relation),
                    reify::EDGE_CLASS_SUFFIX
                );
                set.add(statement.clone(), rdf_type.clone(), Term::iri(class_uri));
                set.add(
                    statement.clone(),
                    Term::iri(self.registry.resource_uri(reify::SOURCE)),
                    source,
                );
                set.add(
                    statement.clone(),
                    Term::iri(self.registry.resource_uri(reify::TARGET)),
                    target,
                );
                for (key, value) in &edge.properties {
                    set.add(
                        statement.clone(),
                        Term::iri(self.registry.resource_uri(key)),
                        value.to_term(),
                    );
                }
            }
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            triples = set.len(),
            "encoded property graph"
        );
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphlift_model::{Edge, Node, ScalarValue};

    fn registry() -> IdentifierRegistry {
        IdentifierRegistry::new("http://example.org/kg/").unwrap()
    }

    fn sample_graph() -> PropertyGraph {
        let mut graph = PropertyGraph::new();
        graph.add_node(
            Node::new("p1", "Zhang San")
                .with_type("Person")
                .with_property("age", ScalarValue::Integer(30)),
        );
        graph.add_node(Node::new("c1", "Tech Co").with_type("Company"));
        graph.add_edge(Edge::new("p1", "c1", "worksAt"));
        graph
    }

    #[test]
    fn test_sample_graph_triple_count() {
        let mut registry = registry();
        let set = GraphEncoder::new(&mut registry)
            .encode(&sample_graph())
            .unwrap();
        // type + label + age for p1, type + label for c1, one edge
        assert_eq!(set.len(), 6);
    }

    #[test]
    fn test_node_triples() {
        let mut registry = registry();
        let set = GraphEncoder::new(&mut registry)
            .encode(&sample_graph())
            .unwrap();
        let p1 = Term::iri("http://example.org/kg/p1");
        assert!(set.contains(&graphlift_model::Triple::new(
            p1.clone(),
            Term::iri(rdf::TYPE),
            Term::iri("http://example.org/kg/Person"),
        )));
        assert!(set.contains(&graphlift_model::Triple::new(
            p1.clone(),
            Term::iri(rdfs::LABEL),
            Term::string("Zhang San"),
        )));
        assert!(set.contains(&graphlift_model::Triple::new(
            p1,
            Term::iri("http://example.org/kg/age"),
            Term::integer(30),
        )));
    }

    #[test]
    fn test_plain_edge_triple() {
        let mut registry = registry();
        let set = GraphEncoder::new(&mut registry)
            .encode(&sample_graph())
            .unwrap();
        assert!(set.contains(&graphlift_model::Triple::new(
            Term::iri("http://example.org/kg/p1"),
            Term::iri("http://example.org/kg/worksAt"),
            Term::iri("http://example.org/kg/c1"),
        )));
    }

    #[test]
    fn test_label_falls_back_to_id() {
        let mut graph = PropertyGraph::new();
        graph.add_node(Node::new("n1", ""));
        let mut registry = registry();
        let set = GraphEncoder::new(&mut registry).encode(&graph).unwrap();
        assert!(set.contains(&graphlift_model::Triple::new(
            Term::iri("http://example.org/kg/n1"),
            Term::iri(rdfs::LABEL),
            Term::string("n1"),
        )));
    }

    #[test]
    fn test_reified_edge() {
        let mut graph = PropertyGraph::new();
        graph.add_node(Node::new("p1", "P"));
        graph.add_node(Node::new("c1", "C"));
        graph.add_edge(
            Edge::new("p1", "c1", "worksAt").with_property("since", ScalarValue::Integer(2020)),
        );
        let mut registry = registry();
        let set = GraphEncoder::new(&mut registry).encode(&graph).unwrap();

        let statement = Term::blank("e0");
        assert!(set.contains(&graphlift_model::Triple::new(
            statement.clone(),
            Term::iri(rdf::TYPE),
            Term::iri("http://example.org/kg/worksAt_Edge"),
        )));
        assert!(set.contains(&graphlift_model::Triple::new(
            statement.clone(),
            Term::iri("http://example.org/kg/hasSource"),
            Term::iri("http://example.org/kg/p1"),
        )));
        assert!(set.contains(&graphlift_model::Triple::new(
            statement.clone(),
            Term::iri("http://example.org/kg/hasTarget"),
            Term::iri("http://example.org/kg/c1"),
        )));
        assert!(set.contains(&graphlift_model::Triple::new(
            statement,
            Term::iri("http://example.org/kg/since"),
            Term::integer(2020),
        )));
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let mut graph = PropertyGraph::new();
        graph.add_node(Node::new("a", "A"));
        graph.add_node(Node::new("b", "B"));
        graph.add_edge(Edge::new("a", "b", "knows"));
        graph.add_edge(Edge::new("a", "b", "knows"));
        let mut registry = registry();
        let set = GraphEncoder::new(&mut registry).encode(&graph).unwrap();
        assert_eq!(
            set.matching(None, Some(&Term::iri("http://example.org/kg/knows")), None)
                .count(),
            1
        );
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let graph = sample_graph();
        let mut r1 = registry();
        let mut r2 = registry();
        let a = GraphEncoder::new(&mut r1).encode(&graph).unwrap();
        let b = GraphEncoder::new(&mut r2).encode(&graph).unwrap();
        assert_eq!(a, b);
    }
}
