//! Conversion facade
//!
//! [`Converter`] is the single entry point callers use: it routes between
//! any two registered formats, crossing the graph/RDF boundary at most
//! once, and reports [`ConversionStats`] for every result. The converter
//! is stateless across calls; each conversion builds its own identifier
//! registry.

mod extract;

pub use extract::{facts_to_graph, ExtractionVocabulary, Fact, FactObject};
pub use graphlift_format::{FormatFamily, FormatRegistry, GraphCodec, RdfCodec};
pub use graphlift_model::{
    ConversionStats, Edge, Error, Node, PropertyGraph, Result, ScalarValue, TripleSet,
};

use graphlift_convert::{GraphDecoder, GraphEncoder, IdentifierRegistry};

/// The result of a conversion: serialized output plus summary counts
#[derive(Clone, Debug)]
pub struct Conversion {
    pub output: String,
    pub stats: ConversionStats,
}

/// Format-to-format converter rooted at a base URI
pub struct Converter {
    base_uri: String,
    formats: FormatRegistry,
}

impl Converter {
    /// Create a converter; fails on an invalid base URI
    pub fn new(base_uri: impl Into<String>) -> Result<Self> {
        let base_uri = base_uri.into();
        // validate eagerly so every later conversion can assume a good base
        IdentifierRegistry::new(base_uri.clone())?;
        Ok(Self {
            base_uri,
            formats: FormatRegistry::with_defaults(),
        })
    }

    /// Replace the format registry, e.g. to add custom codecs
    pub fn with_formats(mut self, formats: FormatRegistry) -> Self {
        self.formats = formats;
        self
    }

    /// The registered format names
    pub fn formats(&self) -> Vec<&'static str> {
        self.formats.names()
    }

    /// Convert `input` from `source` format to `target` format
    ///
    /// Same-family conversions never cross the graph/RDF boundary;
    /// cross-family conversions cross it exactly once.
    pub fn convert(&self, input: &str, source: &str, target: &str) -> Result<Conversion> {
        let source_family = self
            .formats
            .family(source)
            .ok_or_else(|| Error::unsupported_format(source))?;
        let target_family = self
            .formats
            .family(target)
            .ok_or_else(|| Error::unsupported_format(target))?;
        tracing::info!(source, target, "converting");

        let conversion = match (source_family, target_family) {
            (FormatFamily::Rdf, FormatFamily::Rdf) => {
                let set = self.formats.rdf(source)?.decode(input)?;
                Conversion {
                    output: self.formats.rdf(target)?.encode(&set)?,
                    stats: ConversionStats::from_parts(Some(&set), None),
                }
            }
            (FormatFamily::Graph, FormatFamily::Graph) => {
                let graph = self.formats.graph(source)?.decode(input)?;
                Conversion {
                    output: self.formats.graph(target)?.encode(&graph)?,
                    stats: ConversionStats::from_parts(None, Some(&graph)),
                }
            }
            (FormatFamily::Graph, FormatFamily::Rdf) => {
                let graph = self.formats.graph(source)?.decode(input)?;
                let set = self.graph_to_triples(&graph)?;
                Conversion {
                    output: self.formats.rdf(target)?.encode(&set)?,
                    stats: ConversionStats::from_parts(Some(&set), Some(&graph)),
                }
            }
            (FormatFamily::Rdf, FormatFamily::Graph) => {
                let set = self.formats.rdf(source)?.decode(input)?;
                let graph = self.triples_to_graph(&set)?;
                Conversion {
                    output: self.formats.graph(target)?.encode(&graph)?,
                    stats: ConversionStats::from_parts(Some(&set), Some(&graph)),
                }
            }
        };
        tracing::debug!(
            triples = conversion.stats.total_triples,
            nodes = conversion.stats.total_nodes,
            edges = conversion.stats.total_edges,
            "conversion complete"
        );
        Ok(conversion)
    }

    /// Encode a property graph into the canonical triple model
    pub fn graph_to_triples(&self, graph: &PropertyGraph) -> Result<TripleSet> {
        let mut registry = IdentifierRegistry::new(self.base_uri.clone())?;
        GraphEncoder::new(&mut registry).encode(graph)
    }

    /// Decode the canonical triple model into a property graph
    pub fn triples_to_graph(&self, set: &TripleSet) -> Result<PropertyGraph> {
        let registry = IdentifierRegistry::new(self.base_uri.clone())?;
        GraphDecoder::new(&registry).decode(set)
    }

    /// Union several RDF documents of one format into a single model
    pub fn merge(&self, inputs: &[&str], format: &str) -> Result<TripleSet> {
        let codec = self.formats.rdf(format)?;
        let mut merged = TripleSet::new();
        for input in inputs {
            merged.merge(codec.decode(input)?);
        }
        tracing::debug!(
            documents = inputs.len(),
            triples = merged.len(),
            "merged models"
        );
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_base_uri_rejected() {
        assert!(matches!(
            Converter::new("not a uri"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let converter = Converter::new("http://example.org/kg/").unwrap();
        assert!(matches!(
            converter.convert("{}", "json", "parquet"),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_merge_unions_documents() {
        let converter = Converter::new("http://example.org/kg/").unwrap();
        let a = "<http://e/a> <http://e/p> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer> .";
        let b = "<http://e/b> <http://e/p> \"2\"^^<http://www.w3.org/2001/XMLSchema#integer> .";
        let merged = converter.merge(&[a, b, a], "ntriples").unwrap();
        assert_eq!(merged.len(), 2);
    }
}
