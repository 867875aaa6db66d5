//! Serialization codecs for the triple and property-graph models
//!
//! Every format is a codec behind one of two traits: [`RdfCodec`] reads
//! and writes the canonical [`TripleSet`], [`GraphCodec`] the
//! [`PropertyGraph`]. The [`FormatRegistry`] maps format names to codecs
//! and is the only extension point; converters route purely by name.

use graphlift_model::{Error, PropertyGraph, Result, TripleSet};
use std::collections::BTreeMap;

mod adjacency;
mod cypher;
mod edgelist;
mod gexf;
mod graph_json;
mod graphml;
mod jsonld;
mod n3;
mod ntriples;
mod rdfxml;
mod turtle;

pub use adjacency::AdjacencyCodec;
pub use cypher::CypherCodec;
pub use edgelist::EdgeListCodec;
pub use gexf::GexfCodec;
pub use graph_json::GraphJsonCodec;
pub use graphml::GraphmlCodec;
pub use jsonld::JsonLdCodec;
pub use n3::N3Codec;
pub use ntriples::NTriplesCodec;
pub use rdfxml::RdfXmlCodec;
pub use turtle::TurtleCodec;

/// Which model a format serializes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatFamily {
    /// Serializes the RDF triple model
    Rdf,
    /// Serializes the property graph
    Graph,
}

/// A codec over the RDF triple model
///
/// All RDF formats are bidirectional.
pub trait RdfCodec: Send + Sync {
    /// Format name used for registry lookup
    fn name(&self) -> &'static str;

    fn encode(&self, set: &TripleSet) -> Result<String>;

    fn decode(&self, input: &str) -> Result<TripleSet>;
}

/// A codec over the property graph
///
/// Export-oriented formats override only `encode`; the default `decode`
/// refuses with `UnsupportedFormat`.
pub trait GraphCodec: Send + Sync {
    /// Format name used for registry lookup
    fn name(&self) -> &'static str;

    fn encode(&self, graph: &PropertyGraph) -> Result<String>;

    fn decode(&self, _input: &str) -> Result<PropertyGraph> {
        Err(Error::unsupported_format(format!(
            "{} is encode-only",
            self.name()
        )))
    }
}

/// Name-to-codec registry for both format families
pub struct FormatRegistry {
    rdf: BTreeMap<&'static str, Box<dyn RdfCodec>>,
    graph: BTreeMap<&'static str, Box<dyn GraphCodec>>,
}

impl FormatRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            rdf: BTreeMap::new(),
            graph: BTreeMap::new(),
        }
    }

    /// Registry with every built-in codec
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_rdf(Box::new(TurtleCodec));
        registry.register_rdf(Box::new(NTriplesCodec));
        registry.register_rdf(Box::new(N3Codec));
        registry.register_rdf(Box::new(RdfXmlCodec));
        registry.register_rdf(Box::new(JsonLdCodec));
        registry.register_graph(Box::new(GraphJsonCodec));
        registry.register_graph(Box::new(AdjacencyCodec));
        registry.register_graph(Box::new(EdgeListCodec));
        registry.register_graph(Box::new(GraphmlCodec));
        registry.register_graph(Box::new(GexfCodec));
        registry.register_graph(Box::new(CypherCodec));
        registry
    }

    /// Register an RDF codec under its own name
    pub fn register_rdf(&mut self, codec: Box<dyn RdfCodec>) {
        self.rdf.insert(codec.name(), codec);
    }

    /// Register a graph codec under its own name
    pub fn register_graph(&mut self, codec: Box<dyn GraphCodec>) {
        self.graph.insert(codec.name(), codec);
    }

    /// Which family a format name belongs to, if registered
    pub fn family(&self, name: &str) -> Option<FormatFamily> {
        if self.rdf.contains_key(name) {
            Some(FormatFamily::Rdf)
        } else if self.graph.contains_key(name) {
            Some(FormatFamily::Graph)
        } else {
            None
        }
    }

    /// Look up an RDF codec by name
    pub fn rdf(&self, name: &str) -> Result<&dyn RdfCodec> {
        self.rdf
            .get(name)
            .map(Box::as_ref)
            .ok_or_else(|| Error::unsupported_format(name))
    }

    /// Look up a graph codec by name
    pub fn graph(&self, name: &str) -> Result<&dyn GraphCodec> {
        self.graph
            .get(name)
            .map(Box::as_ref)
            .ok_or_else(|| Error::unsupported_format(name))
    }

    /// All registered format names
    pub fn names(&self) -> Vec<&'static str> {
        self.rdf.keys().chain(self.graph.keys()).copied().collect()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
