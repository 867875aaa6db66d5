//! RDF term types: IRI, blank node, and typed literal
//!
//! Terms are the building blocks of triples. IRIs are always stored
//! expanded, never prefixed; compaction is a codec concern.

use crate::Datatype;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Blank node identifier
///
/// Blank node IDs are stable within one triple set but have no global
/// meaning. The label does NOT include the `_:` prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlankId(Arc<str>);

impl BlankId {
    /// Create a blank node ID from a label (without `_:`)
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(Arc::from(label.as_ref()))
    }

    /// Get the label (without `_:` prefix)
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlankId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// Literal value storage
///
/// One variant per supported scalar kind. `Float` uses bit-pattern
/// comparison so the type has a total order and can live in a `BTreeSet`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum LiteralValue {
    /// String value (UTF-8)
    String(Arc<str>),
    /// Integer value (i64 range)
    Integer(i64),
    /// Floating point value (f64)
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// Calendar date (xsd:date)
    Date(NaiveDate),
}

impl LiteralValue {
    /// Create a string literal value
    pub fn string(s: impl AsRef<str>) -> Self {
        LiteralValue::String(Arc::from(s.as_ref()))
    }

    /// Get the lexical representation of this value
    pub fn lexical(&self) -> String {
        match self {
            LiteralValue::String(s) => s.to_string(),
            LiteralValue::Integer(i) => i.to_string(),
            LiteralValue::Float(d) => {
                if d.is_nan() {
                    "NaN".to_string()
                } else if d.is_infinite() {
                    if d.is_sign_positive() {
                        "INF".to_string()
                    } else {
                        "-INF".to_string()
                    }
                } else {
                    d.to_string()
                }
            }
            LiteralValue::Boolean(b) => b.to_string(),
            LiteralValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    /// Parse a lexical form according to an explicit datatype
    ///
    /// Returns `None` when the lexical form does not conform to the
    /// datatype's grammar. Unrecognized datatypes fall back to `String`.
    pub fn from_lexical_typed(lexical: &str, datatype: &Datatype) -> Option<Self> {
        use graphlift_vocab::xsd;
        match datatype.as_iri() {
            xsd::INTEGER | xsd::LONG | xsd::INT => {
                lexical.parse::<i64>().ok().map(LiteralValue::Integer)
            }
            xsd::DOUBLE | xsd::FLOAT | xsd::DECIMAL => {
                lexical.parse::<f64>().ok().map(LiteralValue::Float)
            }
            xsd::BOOLEAN => match lexical {
                "true" | "1" => Some(LiteralValue::Boolean(true)),
                "false" | "0" => Some(LiteralValue::Boolean(false)),
                _ => None,
            },
            xsd::DATE => NaiveDate::parse_from_str(lexical, "%Y-%m-%d")
                .ok()
                .map(LiteralValue::Date),
            _ => Some(LiteralValue::string(lexical)),
        }
    }
}

impl PartialEq for LiteralValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LiteralValue::String(a), LiteralValue::String(b)) => a == b,
            (LiteralValue::Integer(a), LiteralValue::Integer(b)) => a == b,
            (LiteralValue::Float(a), LiteralValue::Float(b)) => a.to_bits() == b.to_bits(),
            (LiteralValue::Boolean(a), LiteralValue::Boolean(b)) => a == b,
            (LiteralValue::Date(a), LiteralValue::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for LiteralValue {}

impl Hash for LiteralValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            LiteralValue::String(s) => s.hash(state),
            LiteralValue::Integer(i) => i.hash(state),
            LiteralValue::Float(d) => d.to_bits().hash(state),
            LiteralValue::Boolean(b) => b.hash(state),
            LiteralValue::Date(d) => d.hash(state),
        }
    }
}

impl PartialOrd for LiteralValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LiteralValue {
    fn cmp(&self, other: &Self) -> Ordering {
        let type_ord = |v: &LiteralValue| -> u8 {
            match v {
                LiteralValue::String(_) => 0,
                LiteralValue::Integer(_) => 1,
                LiteralValue::Float(_) => 2,
                LiteralValue::Boolean(_) => 3,
                LiteralValue::Date(_) => 4,
            }
        };

        match type_ord(self).cmp(&type_ord(other)) {
            Ordering::Equal => {}
            ord => return ord,
        }

        match (self, other) {
            (LiteralValue::String(a), LiteralValue::String(b)) => a.cmp(b),
            (LiteralValue::Integer(a), LiteralValue::Integer(b)) => a.cmp(b),
            (LiteralValue::Float(a), LiteralValue::Float(b)) => a
                .partial_cmp(b)
                .unwrap_or_else(|| a.to_bits().cmp(&b.to_bits())),
            (LiteralValue::Boolean(a), LiteralValue::Boolean(b)) => a.cmp(b),
            (LiteralValue::Date(a), LiteralValue::Date(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// An RDF term (subject, predicate, or object position)
///
/// # Invariants
///
/// - `Term::Iri` always contains an expanded IRI, never a prefixed form.
/// - The predicate position of a triple can only be `Term::Iri`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Term {
    /// Full expanded IRI (e.g. "http://example.org/kg/p1")
    Iri(Arc<str>),

    /// Blank node with stable identifier
    Blank(BlankId),

    /// Literal value with explicit datatype
    Literal {
        value: LiteralValue,
        datatype: Datatype,
    },
}

impl Term {
    /// Create an IRI term from an expanded IRI string
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Term::Iri(Arc::from(iri.as_ref()))
    }

    /// Create a blank node term
    pub fn blank(label: impl AsRef<str>) -> Self {
        Term::Blank(BlankId::new(label))
    }

    /// Create a plain string literal (xsd:string)
    pub fn string(value: impl AsRef<str>) -> Self {
        Term::Literal {
            value: LiteralValue::string(value),
            datatype: Datatype::xsd_string(),
        }
    }

    /// Create an integer literal (xsd:integer)
    pub fn integer(value: i64) -> Self {
        Term::Literal {
            value: LiteralValue::Integer(value),
            datatype: Datatype::xsd_integer(),
        }
    }

    /// Create a double literal (xsd:double)
    pub fn float(value: f64) -> Self {
        Term::Literal {
            value: LiteralValue::Float(value),
            datatype: Datatype::xsd_double(),
        }
    }

    /// Create a boolean literal (xsd:boolean)
    pub fn boolean(value: bool) -> Self {
        Term::Literal {
            value: LiteralValue::Boolean(value),
            datatype: Datatype::xsd_boolean(),
        }
    }

    /// Create a date literal (xsd:date)
    pub fn date(value: NaiveDate) -> Self {
        Term::Literal {
            value: LiteralValue::Date(value),
            datatype: Datatype::xsd_date(),
        }
    }

    /// Create a literal from a lexical form and explicit datatype
    ///
    /// Fails with `None` when the lexical form violates the datatype.
    pub fn typed(lexical: &str, datatype: Datatype) -> Option<Self> {
        let value = LiteralValue::from_lexical_typed(lexical, &datatype)?;
        Some(Term::Literal { value, datatype })
    }

    /// Check if this is an IRI term
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    /// Check if this is a blank node
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank(_))
    }

    /// Check if this is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }

    /// Try to get as IRI string
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Try to get as blank node ID
    pub fn as_blank(&self) -> Option<&BlankId> {
        match self {
            Term::Blank(id) => Some(id),
            _ => None,
        }
    }

    /// Try to get literal components
    pub fn as_literal(&self) -> Option<(&LiteralValue, &Datatype)> {
        match self {
            Term::Literal { value, datatype } => Some((value, datatype)),
            _ => None,
        }
    }
}

/// Last path segment of an IRI (after the final `/` or `#`)
pub fn local_name(iri: &str) -> &str {
    match iri.rfind(['/', '#']) {
        Some(pos) => &iri[pos + 1..],
        None => iri,
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Term::Iri(a), Term::Iri(b)) => a == b,
            (Term::Blank(a), Term::Blank(b)) => a == b,
            (
                Term::Literal {
                    value: v1,
                    datatype: d1,
                },
                Term::Literal {
                    value: v2,
                    datatype: d2,
                },
            ) => v1 == v2 && d1 == d2,
            _ => false,
        }
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Term::Iri(iri) => iri.hash(state),
            Term::Blank(id) => id.hash(state),
            Term::Literal { value, datatype } => {
                value.hash(state);
                datatype.hash(state);
            }
        }
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        // Type ordering: Blank < Iri < Literal
        let type_ord = |t: &Term| -> u8 {
            match t {
                Term::Blank(_) => 0,
                Term::Iri(_) => 1,
                Term::Literal { .. } => 2,
            }
        };

        match type_ord(self).cmp(&type_ord(other)) {
            Ordering::Equal => {}
            ord => return ord,
        }

        match (self, other) {
            (Term::Iri(a), Term::Iri(b)) => a.cmp(b),
            (Term::Blank(a), Term::Blank(b)) => a.cmp(b),
            (
                Term::Literal {
                    value: v1,
                    datatype: d1,
                },
                Term::Literal {
                    value: v2,
                    datatype: d2,
                },
            ) => (d1, v1).cmp(&(d2, v2)),
            _ => Ordering::Equal,
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::Blank(id) => write!(f, "{}", id),
            Term::Literal { value, datatype } => {
                write!(f, "\"{}\"", value.lexical())?;
                if !datatype.is_xsd_string() {
                    write!(f, "^^<{}>", datatype.as_iri())
                } else {
                    Ok(())
                }
            }
        }
    }
}
