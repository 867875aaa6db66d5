//! Notation3 codec
//!
//! For the feature set this crate models (no rules, no quoted graphs) the
//! N3 serialization coincides with Turtle, so the codec shares the Turtle
//! grammar and differs only in its registered name.

use crate::{turtle, RdfCodec};
use graphlift_model::{Result, TripleSet};

const FORMAT: &str = "n3";

pub struct N3Codec;

impl RdfCodec for N3Codec {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn encode(&self, set: &TripleSet) -> Result<String> {
        turtle::encode(set)
    }

    fn decode(&self, input: &str) -> Result<TripleSet> {
        turtle::decode(input, FORMAT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TurtleCodec;
    use graphlift_model::{Error, Term};

    #[test]
    fn test_matches_turtle_output() {
        let mut set = TripleSet::new();
        set.add_prefix("ex", "http://example.org/");
        set.add(
            Term::iri("http://example.org/a"),
            Term::iri("http://example.org/p"),
            Term::string("v"),
        );
        assert_eq!(
            N3Codec.encode(&set).unwrap(),
            TurtleCodec.encode(&set).unwrap()
        );
    }

    #[test]
    fn test_errors_carry_own_format_name() {
        match N3Codec.decode("ex:a ex:b ex:c .") {
            Err(Error::Parse { format, .. }) => assert_eq!(format, "n3"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
