//! Graph JSON codec - the canonical external property-graph shape

use crate::GraphCodec;
use graphlift_model::{Error, PropertyGraph, Result};

const FORMAT: &str = "json";

pub struct GraphJsonCodec;

impl GraphCodec for GraphJsonCodec {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn encode(&self, graph: &PropertyGraph) -> Result<String> {
        Ok(serde_json::to_string_pretty(graph)?)
    }

    fn decode(&self, input: &str) -> Result<PropertyGraph> {
        serde_json::from_str(input)
            .map_err(|e| Error::parse_at(FORMAT, e.line(), e.to_string()))
    }
}
