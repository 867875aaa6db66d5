//! Conversion between the property-graph and triple models
//!
//! [`IdentifierRegistry`] owns the key/URI mapping; [`GraphEncoder`] and
//! [`GraphDecoder`] carry graphs across the model boundary in either
//! direction. Format codecs never touch this crate; they only see the
//! models it produces.

mod decode;
mod encode;
mod registry;

pub use decode::GraphDecoder;
pub use encode::GraphEncoder;
pub use registry::{sanitize, IdentifierRegistry};
