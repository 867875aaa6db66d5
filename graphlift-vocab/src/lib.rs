//! RDF vocabulary constants and namespace defaults for Graphlift
//!
//! This crate is the single home for well-known IRIs and the default
//! namespace prefix table shared by the conversion engine and the codecs.
//!
//! # Organization
//!
//! - `rdf` - RDF vocabulary (http://www.w3.org/1999/02/22-rdf-syntax-ns#)
//! - `rdfs` - RDFS vocabulary (http://www.w3.org/2000/01/rdf-schema#)
//! - `xsd` - XSD datatype vocabulary (http://www.w3.org/2001/XMLSchema#)
//! - `reify` - local names used by the edge-reification scheme

use std::collections::BTreeMap;

/// RDF vocabulary constants
pub mod rdf {
    /// RDF namespace stem
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    /// rdf:first IRI (RDF list head)
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";

    /// rdf:rest IRI (RDF list tail)
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";

    /// rdf:nil IRI (RDF list terminator)
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
}

/// RDFS vocabulary constants
pub mod rdfs {
    /// RDFS namespace stem
    pub const NS: &str = "http://www.w3.org/2000/01/rdf-schema#";

    /// rdfs:label IRI
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

    /// rdfs:comment IRI
    pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
}

/// XSD vocabulary constants
pub mod xsd {
    /// XSD namespace stem
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";

    /// xsd:string IRI
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

    /// xsd:integer IRI
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

    /// xsd:long IRI
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";

    /// xsd:int IRI
    pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";

    /// xsd:decimal IRI
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";

    /// xsd:float IRI
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";

    /// xsd:double IRI
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";

    /// xsd:boolean IRI
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

    /// xsd:date IRI
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";

    /// xsd:dateTime IRI
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

    /// Normalize integer-family datatypes to xsd:integer
    ///
    /// int, long, etc. all map to the same i64 storage, so they collapse
    /// to xsd:integer when a literal is reconstructed.
    #[inline]
    pub fn normalize_integer_family(datatype_iri: &str) -> &str {
        match datatype_iri {
            LONG | INT => INTEGER,
            _ => datatype_iri,
        }
    }

    /// Normalize float-family datatypes to xsd:double
    #[inline]
    pub fn normalize_float_family(datatype_iri: &str) -> &str {
        match datatype_iri {
            FLOAT | DECIMAL => DOUBLE,
            _ => datatype_iri,
        }
    }
}

/// Local names used by the edge-reification scheme
///
/// A property-carrying edge is reified as a blank subject with a class IRI
/// of `base + relation + EDGE_CLASS_SUFFIX` and endpoint links through the
/// `SOURCE` / `TARGET` predicates (minted in the session base namespace).
pub mod reify {
    /// Local name of the reified-edge source predicate
    pub const SOURCE: &str = "hasSource";

    /// Local name of the reified-edge target predicate
    pub const TARGET: &str = "hasTarget";

    /// Suffix appended to a relation name to form the reified-edge class
    pub const EDGE_CLASS_SUFFIX: &str = "_Edge";
}

/// Baseline prefix table (prefix -> namespace stem) bound on every session.
///
/// The session base URI is bound separately under the `kg` prefix by the
/// identifier registry.
pub fn default_prefixes() -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    map.insert("rdf".to_string(), rdf::NS.to_string());
    map.insert("rdfs".to_string(), rdfs::NS.to_string());
    map.insert("xsd".to_string(), xsd::NS.to_string());
    map.insert("foaf".to_string(), "http://xmlns.com/foaf/0.1/".to_string());
    map.insert("schema".to_string(), "http://schema.org/".to_string());
    map
}
