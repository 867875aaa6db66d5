//! A single RDF triple

use crate::Term;
use serde::{Deserialize, Serialize};

/// An RDF triple (subject, predicate, object)
///
/// The predicate is always `Term::Iri`; the constructors do not enforce
/// this statically, but the encoder and the codecs only ever produce IRIs
/// in that position.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    /// Subject term (IRI or blank node)
    pub s: Term,
    /// Predicate term (IRI)
    pub p: Term,
    /// Object term (IRI, blank node, or literal)
    pub o: Term,
}

impl Triple {
    /// Create a new triple
    pub fn new(s: Term, p: Term, o: Term) -> Self {
        Self { s, p, o }
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} .", self.s, self.p, self.o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spo_ordering() {
        let a = Triple::new(
            Term::iri("http://example.org/a"),
            Term::iri("http://example.org/p"),
            Term::string("x"),
        );
        let b = Triple::new(
            Term::iri("http://example.org/b"),
            Term::iri("http://example.org/p"),
            Term::string("x"),
        );
        assert!(a < b);
    }

    #[test]
    fn test_display() {
        let t = Triple::new(
            Term::iri("http://example.org/a"),
            Term::iri("http://example.org/p"),
            Term::integer(1),
        );
        assert_eq!(
            t.to_string(),
            "<http://example.org/a> <http://example.org/p> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer> ."
        );
    }
}
