//! Triple model to property graph decoding

use crate::IdentifierRegistry;
use graphlift_model::{
    local_name, Edge, Error, Node, PropertyGraph, Result, ScalarValue, Term, Triple, TripleSet,
};
use graphlift_vocab::{rdf, rdfs, reify};
use std::collections::HashMap;

/// Decodes the canonical triple model back into a property graph
///
/// Subjects carrying both `hasSource` and `hasTarget` endpoints unfold into
/// reified edges; every other subject becomes a node. Works on models from
/// any source, not just this crate's encoder: foreign URIs fall back to
/// their percent-decoded last path segment for keys and labels.
pub struct GraphDecoder<'a> {
    registry: &'a IdentifierRegistry,
}

impl<'a> GraphDecoder<'a> {
    pub fn new(registry: &'a IdentifierRegistry) -> Self {
        Self { registry }
    }

    pub fn decode(&self, set: &TripleSet) -> Result<PropertyGraph> {
        let mut graph = PropertyGraph::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut edges: Vec<Edge> = Vec::new();

        for (subject, triples) in set.group_by_subject() {
            if is_reified_subject(subject, &triples) {
                edges.push(self.decode_reified(subject, &triples)?);
            } else {
                self.decode_node(subject, &triples, &mut graph, &mut index, &mut edges);
            }
        }

        for edge in &edges {
            ensure_node(&mut graph, &mut index, &edge.source);
            ensure_node(&mut graph, &mut index, &edge.target);
        }
        graph.edges = edges;

        tracing::debug!(
            triples = set.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "decoded triple model"
        );
        Ok(graph)
    }

    fn decode_reified(&self, subject: &Term, triples: &[&Triple]) -> Result<Edge> {
        let mut source = None;
        let mut target = None;
        let mut relation = None;
        let mut properties = Vec::new();

        for triple in triples {
            let pred = match triple.p.as_iri() {
                Some(p) => p,
                None => continue,
            };
            if pred == rdf::TYPE {
                if let Some(class_iri) = triple.o.as_iri() {
                    let class = self.registry.key_or_local(class_iri);
                    let rel = class
                        .strip_suffix(reify::EDGE_CLASS_SUFFIX)
                        .unwrap_or(&class);
                    relation = Some(rel.to_string());
                }
            } else if local_name(pred) == reify::SOURCE {
                source = endpoint_key(self.registry, &triple.o).or(source);
            } else if local_name(pred) == reify::TARGET {
                target = endpoint_key(self.registry, &triple.o).or(target);
            } else if let Some(value) = ScalarValue::from_term(&triple.o) {
                if pred != rdfs::LABEL {
                    properties.push((self.registry.key_or_local(pred), value));
                }
            }
        }

        let (source, target) = match (source, target) {
            (Some(s), Some(t)) => (s, t),
            _ => {
                return Err(Error::encoding(format!(
                    "reified edge {} is missing an endpoint",
                    subject
                )))
            }
        };
        let relation = relation.ok_or_else(|| {
            Error::encoding(format!("reified edge {} has no relation class", subject))
        })?;

        let mut edge = Edge::new(source, target, relation);
        for (key, value) in properties {
            edge.properties.insert(key, value);
        }
        Ok(edge)
    }

    fn decode_node(
        &self,
        subject: &Term,
        triples: &[&Triple],
        graph: &mut PropertyGraph,
        index: &mut HashMap<String, usize>,
        edges: &mut Vec<Edge>,
    ) {
        let key = match subject {
            Term::Iri(iri) => self.registry.key_or_local(iri),
            Term::Blank(id) => id.as_str().to_string(),
            Term::Literal { .. } => return,
        };
        let pos = ensure_node(graph, index, &key);

        for triple in triples {
            let pred = match triple.p.as_iri() {
                Some(p) => p,
                None => continue,
            };
            if pred == rdf::TYPE {
                if let Some(type_iri) = triple.o.as_iri() {
                    let node = &mut graph.nodes[pos];
                    let type_name = self.registry.key_or_local(type_iri);
                    match &node.node_type {
                        // First type in model order wins; the rest are dropped.
                        Some(kept) => tracing::warn!(
                            node = %key,
                            kept = %kept,
                            dropped = %type_name,
                            "subject has multiple types"
                        ),
                        None => node.node_type = Some(type_name),
                    }
                }
            } else if pred == rdfs::LABEL {
                if let Some((value, _)) = triple.o.as_literal() {
                    graph.nodes[pos].label = value.lexical();
                }
            } else if let Some(value) = ScalarValue::from_term(&triple.o) {
                graph.nodes[pos]
                    .properties
                    .insert(self.registry.key_or_local(pred), value);
            } else if let Some(target) = endpoint_key(self.registry, &triple.o) {
                edges.push(Edge::new(
                    key.clone(),
                    target,
                    self.registry.key_or_local(pred),
                ));
            }
        }
    }
}

/// A subject is a reified edge when it is a blank node carrying both
/// endpoint predicates with entity objects
///
/// The encoder only reifies onto blank subjects, so an IRI node whose
/// properties or relations happen to be named `hasSource`/`hasTarget`
/// stays a node. Literal endpoint objects are properties, not endpoints.
fn is_reified_subject(subject: &Term, triples: &[&Triple]) -> bool {
    if !subject.is_blank() {
        return false;
    }
    let endpoint = |name: &str| {
        triples.iter().any(|t| {
            t.p.as_iri().map_or(false, |p| local_name(p) == name)
                && (t.o.is_iri() || t.o.is_blank())
        })
    };
    endpoint(reify::SOURCE) && endpoint(reify::TARGET)
}

fn endpoint_key(registry: &IdentifierRegistry, term: &Term) -> Option<String> {
    match term {
        Term::Iri(iri) => Some(registry.key_or_local(iri)),
        Term::Blank(id) => Some(id.as_str().to_string()),
        Term::Literal { .. } => None,
    }
}

fn ensure_node(graph: &mut PropertyGraph, index: &mut HashMap<String, usize>, key: &str) -> usize {
    if let Some(pos) = index.get(key) {
        return *pos;
    }
    let pos = graph.nodes.len();
    graph.add_node(Node::new(key, key));
    index.insert(key.to_string(), pos);
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphEncoder;
    use graphlift_model::ScalarValue;

    fn registry() -> IdentifierRegistry {
        IdentifierRegistry::new("http://example.org/kg/").unwrap()
    }

    fn round_trip(graph: &PropertyGraph) -> PropertyGraph {
        let mut registry = registry();
        let set = GraphEncoder::new(&mut registry).encode(graph).unwrap();
        GraphDecoder::new(&registry).decode(&set).unwrap()
    }

    #[test]
    fn test_round_trip_nodes_and_edge() {
        let mut graph = PropertyGraph::new();
        graph.add_node(
            Node::new("p1", "Zhang San")
                .with_type("Person")
                .with_property("age", ScalarValue::Integer(30)),
        );
        graph.add_node(Node::new("c1", "Tech Co").with_type("Company"));
        graph.add_edge(Edge::new("p1", "c1", "worksAt"));

        let mut decoded = round_trip(&graph);
        let mut expected = graph.clone();
        decoded.canonicalize();
        expected.canonicalize();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_round_trip_reified_edge() {
        let mut graph = PropertyGraph::new();
        graph.add_node(Node::new("p1", "P"));
        graph.add_node(Node::new("c1", "C"));
        graph.add_edge(
            Edge::new("p1", "c1", "worksAt")
                .with_property("since", ScalarValue::Integer(2020))
                .with_property("role", ScalarValue::String("engineer".to_string())),
        );

        let mut decoded = round_trip(&graph);
        let mut expected = graph.clone();
        decoded.canonicalize();
        expected.canonicalize();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_spaced_keys_round_trip() {
        let mut graph = PropertyGraph::new();
        graph.add_node(Node::new("Zhang San", "Zhang San").with_type("Person"));
        graph.add_node(Node::new("Tech Co", "Tech Co"));
        graph.add_edge(Edge::new("Zhang San", "Tech Co", "works at"));

        let mut decoded = round_trip(&graph);
        let mut expected = graph.clone();
        decoded.canonicalize();
        expected.canonicalize();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_multi_type_first_wins() {
        let mut set = TripleSet::new();
        let subject = Term::iri("http://example.org/kg/p1");
        set.add(
            subject.clone(),
            Term::iri(rdf::TYPE),
            Term::iri("http://example.org/kg/Author"),
        );
        set.add(
            subject,
            Term::iri(rdf::TYPE),
            Term::iri("http://example.org/kg/Person"),
        );
        let registry = registry();
        let graph = GraphDecoder::new(&registry).decode(&set).unwrap();
        // BTreeSet order puts Author first.
        assert_eq!(graph.node("p1").unwrap().node_type.as_deref(), Some("Author"));
    }

    #[test]
    fn test_foreign_uri_label_fallback() {
        let mut set = TripleSet::new();
        set.add(
            Term::iri("http://other.org/data/Zhang%20San"),
            Term::iri("http://other.org/data/knows"),
            Term::iri("http://other.org/data/Li%20Si"),
        );
        let registry = registry();
        let graph = GraphDecoder::new(&registry).decode(&set).unwrap();
        assert!(graph.contains_node("Zhang San"));
        assert!(graph.contains_node("Li Si"));
        assert_eq!(graph.edges[0].relation, "knows");
    }

    #[test]
    fn test_partial_endpoint_subjects_decode_as_nodes() {
        let mut set = TripleSet::new();
        let statement = Term::blank("e0");
        set.add(
            statement.clone(),
            Term::iri("http://example.org/kg/hasSource"),
            Term::iri("http://example.org/kg/p1"),
        );
        set.add(
            statement,
            Term::iri(rdf::TYPE),
            Term::iri("http://example.org/kg/worksAt_Edge"),
        );
        // hasSource alone is a plain node subject, not a reified edge
        let registry = registry();
        let graph = GraphDecoder::new(&registry).decode(&set).unwrap();
        assert!(graph.contains_node("e0"));

        // A literal hasTarget object is a property, not an endpoint.
        let mut set = TripleSet::new();
        let statement = Term::blank("e1");
        set.add(
            statement.clone(),
            Term::iri("http://example.org/kg/hasSource"),
            Term::iri("http://example.org/kg/p1"),
        );
        set.add(
            statement,
            Term::iri("http://example.org/kg/hasTarget"),
            Term::string("not a node"),
        );
        let graph = GraphDecoder::new(&registry).decode(&set).unwrap();
        let node = graph.node("e1").unwrap();
        assert_eq!(
            node.properties.get("hasTarget"),
            Some(&ScalarValue::String("not a node".to_string()))
        );
        assert_eq!(graph.edges, vec![Edge::new("e1", "p1", "hasSource")]);
    }

    #[test]
    fn test_reified_without_relation_class_is_error() {
        let mut set = TripleSet::new();
        let statement = Term::blank("e0");
        set.add(
            statement.clone(),
            Term::iri("http://example.org/kg/hasSource"),
            Term::iri("http://example.org/kg/p1"),
        );
        set.add(
            statement,
            Term::iri("http://example.org/kg/hasTarget"),
            Term::iri("http://example.org/kg/c1"),
        );
        let registry = registry();
        let result = GraphDecoder::new(&registry).decode(&set);
        assert!(matches!(result, Err(Error::Encoding(_))));
    }

    #[test]
    fn test_node_properties_named_like_endpoints() {
        let mut graph = PropertyGraph::new();
        graph.add_node(
            Node::new("valve", "Valve")
                .with_property("hasSource", ScalarValue::String("river".to_string()))
                .with_property("hasTarget", ScalarValue::String("tank".to_string())),
        );

        let mut decoded = round_trip(&graph);
        let mut expected = graph.clone();
        decoded.canonicalize();
        expected.canonicalize();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_plain_edges_named_like_endpoints() {
        let mut graph = PropertyGraph::new();
        graph.add_node(Node::new("a", "A").with_type("Pipe"));
        graph.add_node(Node::new("b", "B"));
        graph.add_node(Node::new("c", "C"));
        graph.add_edge(Edge::new("a", "b", "hasSource"));
        graph.add_edge(Edge::new("a", "c", "hasTarget"));

        let mut decoded = round_trip(&graph);
        let mut expected = graph.clone();
        decoded.canonicalize();
        expected.canonicalize();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_isolated_label_only_subject() {
        let mut set = TripleSet::new();
        set.add(
            Term::iri("http://example.org/kg/n1"),
            Term::iri(rdfs::LABEL),
            Term::string("Lonely"),
        );
        let registry = registry();
        let graph = GraphDecoder::new(&registry).decode(&set).unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.node("n1").unwrap().label, "Lonely");
        assert!(graph.edges.is_empty());
    }
}
