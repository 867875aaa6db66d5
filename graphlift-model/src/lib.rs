//! Core data model for graph/RDF conversion
//!
//! Two representations and the vocabulary between them:
//!
//! - [`TripleSet`]: the canonical RDF model every format codec reads from
//!   or writes into, built from [`Triple`]s over [`Term`]s.
//! - [`PropertyGraph`]: the labeled property-graph model with [`Node`]s,
//!   [`Edge`]s, and [`ScalarValue`] property maps.
//!
//! [`ConversionStats`] summarizes either side; [`Error`] is the crate-wide
//! error type.

mod dataset;
mod datatype;
mod error;
mod graph;
mod stats;
mod term;
mod triple;

pub use dataset::{SubjectGroups, TripleSet};
pub use datatype::Datatype;
pub use error::{Error, Result};
pub use graph::{Edge, Node, PropertyGraph, ScalarValue};
pub use stats::ConversionStats;
pub use term::{local_name, BlankId, LiteralValue, Term};
pub use triple::Triple;
