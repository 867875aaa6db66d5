//! Conversion summary statistics

use crate::{local_name, PropertyGraph, Term, TripleSet};
use graphlift_vocab::{rdf, reify};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Summary counts reported alongside every conversion result
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Triples in the RDF model (0 when no model was materialized)
    pub total_triples: usize,
    /// Nodes in the property graph
    pub total_nodes: usize,
    /// Edges in the property graph, or relation triples for conversions
    /// that never left the RDF model
    pub total_edges: usize,
    /// Distinct node types
    pub distinct_types: usize,
    /// Distinct edge relations
    pub distinct_relations: usize,
}

impl ConversionStats {
    /// Compute stats from whichever representations a conversion produced
    ///
    /// Graph-derived counts prefer the property graph when present; for
    /// RDF-to-RDF conversions that never cross the boundary, node, type,
    /// and relation counts are derived from the model itself.
    pub fn from_parts(triples: Option<&TripleSet>, graph: Option<&PropertyGraph>) -> Self {
        let total_triples = triples.map_or(0, TripleSet::len);
        match graph {
            Some(g) => {
                let types: BTreeSet<&str> = g
                    .nodes
                    .iter()
                    .filter_map(|n| n.node_type.as_deref())
                    .collect();
                let relations: BTreeSet<&str> =
                    g.edges.iter().map(|e| e.relation.as_str()).collect();
                ConversionStats {
                    total_triples,
                    total_nodes: g.node_count(),
                    total_edges: g.edge_count(),
                    distinct_types: types.len(),
                    distinct_relations: relations.len(),
                }
            }
            None => match triples {
                Some(set) => Self::from_model(set),
                None => ConversionStats::default(),
            },
        }
    }

    fn from_model(set: &TripleSet) -> Self {
        let rdf_type = Term::iri(rdf::TYPE);
        let subjects: BTreeSet<&Term> = set.iter().map(|t| &t.s).collect();
        let types: BTreeSet<&Term> = set
            .matching(None, Some(&rdf_type), None)
            .map(|t| &t.o)
            .collect();
        // Entity-to-entity triples, minus typing and reification plumbing.
        let mut total_edges = 0;
        let mut relations: BTreeSet<&str> = BTreeSet::new();
        for triple in set.iter() {
            if !triple.o.is_iri() && !triple.o.is_blank() {
                continue;
            }
            let pred = match triple.p.as_iri() {
                Some(p) => p,
                None => continue,
            };
            if pred == rdf::TYPE {
                continue;
            }
            let local = local_name(pred);
            if local == reify::SOURCE || local == reify::TARGET {
                continue;
            }
            total_edges += 1;
            relations.insert(pred);
        }
        ConversionStats {
            total_triples: set.len(),
            total_nodes: subjects.len(),
            total_edges,
            distinct_types: types.len(),
            distinct_relations: relations.len(),
        }
    }
}
