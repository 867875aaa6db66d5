//! RDF literal datatype representation
//!
//! Datatypes are always explicit in this model; there is no "untyped"
//! literal. Plain strings carry `xsd:string`.

use graphlift_vocab::xsd;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// RDF literal datatype, stored as an expanded IRI
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Datatype(Arc<str>);

impl Datatype {
    /// Create a datatype from an expanded IRI
    ///
    /// Integer- and float-family XSD types are normalized to `xsd:integer`
    /// and `xsd:double` so literals reconstruct to a single scalar kind.
    pub fn from_iri(iri: impl AsRef<str>) -> Self {
        let iri = xsd::normalize_float_family(xsd::normalize_integer_family(iri.as_ref()));
        Datatype(Arc::from(iri))
    }

    /// xsd:string - default for plain string literals
    pub fn xsd_string() -> Self {
        Datatype(Arc::from(xsd::STRING))
    }

    /// xsd:integer
    pub fn xsd_integer() -> Self {
        Datatype(Arc::from(xsd::INTEGER))
    }

    /// xsd:double
    pub fn xsd_double() -> Self {
        Datatype(Arc::from(xsd::DOUBLE))
    }

    /// xsd:boolean
    pub fn xsd_boolean() -> Self {
        Datatype(Arc::from(xsd::BOOLEAN))
    }

    /// xsd:date
    pub fn xsd_date() -> Self {
        Datatype(Arc::from(xsd::DATE))
    }

    /// Get the IRI representation of this datatype
    pub fn as_iri(&self) -> &str {
        &self.0
    }

    /// Check if this is the xsd:string datatype
    pub fn is_xsd_string(&self) -> bool {
        self.0.as_ref() == xsd::STRING
    }

    /// Check if this is a numeric type (integer or double)
    pub fn is_numeric(&self) -> bool {
        matches!(self.0.as_ref(), xsd::INTEGER | xsd::DOUBLE | xsd::DECIMAL)
    }
}

impl std::fmt::Display for Datatype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(Datatype::xsd_string().as_iri(), xsd::STRING);
        assert_eq!(Datatype::xsd_integer().as_iri(), xsd::INTEGER);
        assert_eq!(Datatype::xsd_double().as_iri(), xsd::DOUBLE);
        assert_eq!(Datatype::xsd_boolean().as_iri(), xsd::BOOLEAN);
        assert_eq!(Datatype::xsd_date().as_iri(), xsd::DATE);
    }

    #[test]
    fn test_from_iri_normalizes_integer_family() {
        assert_eq!(Datatype::from_iri(xsd::LONG), Datatype::xsd_integer());
        assert_eq!(Datatype::from_iri(xsd::INT), Datatype::xsd_integer());
    }

    #[test]
    fn test_is_checks() {
        assert!(Datatype::xsd_string().is_xsd_string());
        assert!(!Datatype::xsd_integer().is_xsd_string());
        assert!(Datatype::xsd_integer().is_numeric());
        assert!(Datatype::xsd_double().is_numeric());
        assert!(!Datatype::xsd_date().is_numeric());
    }
}
