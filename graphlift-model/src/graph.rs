//! Labeled property-graph model
//!
//! The graph side of the conversion boundary: nodes with a label, an
//! optional type tag, and a scalar property map; typed directed edges with
//! an optional property map. The serde shape mirrors the external JSON
//! input (`{"nodes": [...], "edges": [...]}`).

use crate::{Datatype, LiteralValue, Term};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A scalar property value
///
/// Property maps are loosely typed at the source; this enum is the explicit
/// tagged-value representation the encoder assigns from value shape and the
/// decoder reconstructs from literal datatypes.
///
/// The untagged serde representation keeps the JSON natural: booleans,
/// numbers, and strings map directly, and date-shaped strings
/// (`YYYY-MM-DD`) deserialize as dates - the same shape rule
/// `from_lexical` applies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// Boolean value
    Boolean(bool),
    /// Integer value (i64 range)
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Calendar date
    Date(NaiveDate),
    /// String value
    String(String),
}

impl ScalarValue {
    /// Infer a scalar from the shape of a lexical form
    ///
    /// Booleans, integers, floats, and ISO dates are recognized; everything
    /// else is a string. Types are determined purely from value shape.
    pub fn from_lexical(lexical: &str) -> Self {
        match lexical {
            "true" => return ScalarValue::Boolean(true),
            "false" => return ScalarValue::Boolean(false),
            _ => {}
        }
        if let Ok(i) = lexical.parse::<i64>() {
            return ScalarValue::Integer(i);
        }
        if let Ok(f) = lexical.parse::<f64>() {
            return ScalarValue::Float(f);
        }
        if let Ok(d) = NaiveDate::parse_from_str(lexical, "%Y-%m-%d") {
            return ScalarValue::Date(d);
        }
        ScalarValue::String(lexical.to_string())
    }

    /// Lexical form of this value
    pub fn lexical(&self) -> String {
        match self {
            ScalarValue::Boolean(b) => b.to_string(),
            ScalarValue::Integer(i) => i.to_string(),
            ScalarValue::Float(f) => f.to_string(),
            ScalarValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            ScalarValue::String(s) => s.clone(),
        }
    }

    /// Convert to an RDF literal term with the matching XSD datatype
    pub fn to_term(&self) -> Term {
        match self {
            ScalarValue::Boolean(b) => Term::boolean(*b),
            ScalarValue::Integer(i) => Term::integer(*i),
            ScalarValue::Float(f) => Term::float(*f),
            ScalarValue::Date(d) => Term::date(*d),
            ScalarValue::String(s) => Term::string(s),
        }
    }

    /// Reconstruct a scalar from a literal term
    ///
    /// Returns `None` for IRI and blank terms. The literal's datatype, not
    /// the lexical shape, determines the scalar kind.
    pub fn from_term(term: &Term) -> Option<Self> {
        let (value, _) = term.as_literal()?;
        Some(match value {
            LiteralValue::Boolean(b) => ScalarValue::Boolean(*b),
            LiteralValue::Integer(i) => ScalarValue::Integer(*i),
            LiteralValue::Float(f) => ScalarValue::Float(*f),
            LiteralValue::Date(d) => ScalarValue::Date(*d),
            LiteralValue::String(s) => ScalarValue::String(s.to_string()),
        })
    }

    /// The XSD datatype this scalar kind maps to
    pub fn datatype(&self) -> Datatype {
        match self {
            ScalarValue::Boolean(_) => Datatype::xsd_boolean(),
            ScalarValue::Integer(_) => Datatype::xsd_integer(),
            ScalarValue::Float(_) => Datatype::xsd_double(),
            ScalarValue::Date(_) => Datatype::xsd_date(),
            ScalarValue::String(_) => Datatype::xsd_string(),
        }
    }
}

/// A graph node
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Opaque key, unique within a graph instance
    pub id: String,
    /// Display label; falls back to the id when empty
    #[serde(default)]
    pub label: String,
    /// Primary type tag (zero or one)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    /// Scalar property map
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, ScalarValue>,
}

impl Node {
    /// Create a node with a label and no type or properties
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            node_type: None,
            properties: BTreeMap::new(),
        }
    }

    /// Set the type tag
    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    /// Add a property
    pub fn with_property(mut self, key: impl Into<String>, value: ScalarValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Display label, falling back to the id
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

/// A typed directed edge
///
/// Parallel edges over the same (source, target) pair are allowed only when
/// their relation names differ; duplicate identical edges collapse to one
/// triple on the RDF side (set semantics), the single documented lossy
/// point of the round trip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node id
    pub source: String,
    /// Target node id
    pub target: String,
    /// Relation name
    pub relation: String,
    /// Optional property map (forces reification on the RDF side)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, ScalarValue>,
}

impl Edge {
    /// Create a plain edge
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation: relation.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Add a property
    pub fn with_property(mut self, key: impl Into<String>, value: ScalarValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}

/// A labeled property graph
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyGraph {
    /// Graph nodes; ids unique within the sequence
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Directed edges between node ids
    #[serde(default, alias = "links")]
    pub edges: Vec<Edge>,
}

impl PropertyGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node
    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Add an edge
    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Check whether a node id exists
    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Sort nodes by id and edges by (source, relation, target)
    ///
    /// Round-trip equality is defined up to node/edge ordering; comparing
    /// two canonicalized graphs makes that order-insensitive. Duplicate
    /// edges are kept.
    pub fn canonicalize(&mut self) {
        self.nodes.sort_by(|a, b| a.id.cmp(&b.id));
        self.edges.sort_by(|a, b| {
            (&a.source, &a.relation, &a.target).cmp(&(&b.source, &b.relation, &b.target))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lexical_shapes() {
        assert_eq!(ScalarValue::from_lexical("true"), ScalarValue::Boolean(true));
        assert_eq!(ScalarValue::from_lexical("30"), ScalarValue::Integer(30));
        assert_eq!(ScalarValue::from_lexical("3.5"), ScalarValue::Float(3.5));
        assert_eq!(
            ScalarValue::from_lexical("2000-01-01"),
            ScalarValue::Date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
        );
        assert_eq!(
            ScalarValue::from_lexical("Zhang San"),
            ScalarValue::String("Zhang San".to_string())
        );
    }

    #[test]
    fn test_scalar_term_round_trip() {
        for value in [
            ScalarValue::Boolean(false),
            ScalarValue::Integer(-7),
            ScalarValue::Float(2.25),
            ScalarValue::Date(NaiveDate::from_ymd_opt(2026, 8, 27).unwrap()),
            ScalarValue::String("hello".to_string()),
        ] {
            let term = value.to_term();
            assert_eq!(ScalarValue::from_term(&term), Some(value));
        }
    }

    #[test]
    fn test_scalar_from_term_rejects_iri() {
        assert_eq!(ScalarValue::from_term(&Term::iri("http://example.org/x")), None);
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{
            "nodes": [
                {"id": "p1", "label": "Zhang San", "type": "Person", "properties": {"age": 30}},
                {"id": "c1", "label": "Tech Co", "type": "Company"}
            ],
            "edges": [
                {"source": "p1", "target": "c1", "relation": "worksAt"}
            ]
        }"#;
        let graph: PropertyGraph = serde_json::from_str(json).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(
            graph.node("p1").unwrap().properties.get("age"),
            Some(&ScalarValue::Integer(30))
        );
        assert_eq!(graph.node("c1").unwrap().node_type.as_deref(), Some("Company"));
    }

    #[test]
    fn test_links_alias() {
        let json = r#"{"nodes": [], "links": [{"source": "a", "target": "b", "relation": "knows"}]}"#;
        let graph: PropertyGraph = serde_json::from_str(json).unwrap();
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_canonicalize_orders() {
        let mut graph = PropertyGraph::new();
        graph.add_node(Node::new("b", "B"));
        graph.add_node(Node::new("a", "A"));
        graph.add_edge(Edge::new("b", "a", "z"));
        graph.add_edge(Edge::new("a", "b", "y"));
        graph.canonicalize();
        assert_eq!(graph.nodes[0].id, "a");
        assert_eq!(graph.edges[0].relation, "y");
    }

    #[test]
    fn test_display_label_fallback() {
        let node = Node::new("p1", "");
        assert_eq!(node.display_label(), "p1");
    }
}
