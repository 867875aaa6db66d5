//! JSON-LD codec
//!
//! Emits a flat `{"@context": ..., "@graph": [...]}` document with one
//! node object per subject. Scalar literals use native JSON values; dates
//! and other non-native datatypes use `{"@value", "@type"}` objects. The
//! decoder expands compact IRIs against the document's `@context` and
//! recurses into nested node objects.

use crate::RdfCodec;
use graphlift_model::{Datatype, Error, LiteralValue, Result, Term, TripleSet};
use graphlift_vocab::rdf;
use serde_json::map::Entry;
use serde_json::{json, Map, Value};

const FORMAT: &str = "jsonld";

pub struct JsonLdCodec;

impl RdfCodec for JsonLdCodec {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn encode(&self, set: &TripleSet) -> Result<String> {
        let mut graph = Vec::new();
        for (subject, triples) in set.group_by_subject() {
            let mut node = Map::new();
            node.insert("@id".to_string(), Value::String(subject_id(subject, set)?));

            let mut types = Vec::new();
            for triple in triples {
                let pred = triple.p.as_iri().ok_or_else(|| {
                    Error::encoding("predicate is not an IRI")
                })?;
                if pred == rdf::TYPE {
                    if let Some(iri) = triple.o.as_iri() {
                        types.push(Value::String(compact(iri, set)));
                    }
                    continue;
                }
                let value = object_value(&triple.o, set);
                match node.entry(compact(pred, set)) {
                    Entry::Vacant(slot) => {
                        slot.insert(value);
                    }
                    Entry::Occupied(mut slot) => match slot.get_mut() {
                        Value::Array(values) => values.push(value),
                        existing => {
                            let first = existing.take();
                            *existing = Value::Array(vec![first, value]);
                        }
                    },
                }
            }
            if !types.is_empty() {
                let value = if types.len() == 1 {
                    types.remove(0)
                } else {
                    Value::Array(types)
                };
                node.insert("@type".to_string(), value);
            }
            graph.push(Value::Object(node));
        }

        let mut doc = Map::new();
        if !set.prefixes.is_empty() {
            let context: Map<String, Value> = set
                .prefixes
                .iter()
                .map(|(p, ns)| (p.clone(), Value::String(ns.clone())))
                .collect();
            doc.insert("@context".to_string(), Value::Object(context));
        }
        doc.insert("@graph".to_string(), Value::Array(graph));
        Ok(serde_json::to_string_pretty(&Value::Object(doc))?)
    }

    fn decode(&self, input: &str) -> Result<TripleSet> {
        let doc: Value = serde_json::from_str(input)
            .map_err(|e| Error::parse_at(FORMAT, e.line(), e.to_string()))?;
        let mut decoder = Decoder {
            set: TripleSet::new(),
            blank_counter: 0,
        };
        if let Some(context) = doc.get("@context").and_then(Value::as_object) {
            for (prefix, namespace) in context {
                if let Some(ns) = namespace.as_str() {
                    decoder.set.add_prefix(prefix, ns);
                }
            }
        }
        match doc.get("@graph") {
            Some(Value::Array(nodes)) => {
                for node in nodes {
                    let object = node.as_object().ok_or_else(|| {
                        Error::parse(FORMAT, "@graph entries must be node objects")
                    })?;
                    decoder.node_object(object)?;
                }
            }
            None if doc.is_object() => {
                // a single top-level node object
                if let Some(object) = doc.as_object() {
                    if object.contains_key("@id") {
                        decoder.node_object(object)?;
                    }
                }
            }
            _ => return Err(Error::parse(FORMAT, "@graph must be an array")),
        }
        Ok(decoder.set)
    }
}

fn subject_id(term: &Term, set: &TripleSet) -> Result<String> {
    match term {
        Term::Iri(iri) => Ok(compact(iri, set)),
        Term::Blank(id) => Ok(format!("_:{}", id.as_str())),
        Term::Literal { .. } => Err(Error::encoding("literal subject in triple model")),
    }
}

fn object_value(term: &Term, set: &TripleSet) -> Value {
    match term {
        Term::Iri(iri) => json!({ "@id": compact(iri, set) }),
        Term::Blank(id) => json!({ "@id": format!("_:{}", id.as_str()) }),
        Term::Literal { value, datatype } => match value {
            LiteralValue::String(s) => Value::String(s.to_string()),
            LiteralValue::Integer(i) => json!(i),
            LiteralValue::Boolean(b) => json!(b),
            LiteralValue::Float(f) if f.is_finite() => json!(f),
            _ => json!({
                "@value": value.lexical(),
                "@type": compact(datatype.as_iri(), set),
            }),
        },
    }
}

fn compact(iri: &str, set: &TripleSet) -> String {
    for (prefix, namespace) in &set.prefixes {
        if let Some(local) = iri.strip_prefix(namespace.as_str()) {
            if !local.is_empty() && !local.contains([':', '/', '#']) {
                return format!("{}:{}", prefix, local);
            }
        }
    }
    iri.to_string()
}

struct Decoder {
    set: TripleSet,
    blank_counter: usize,
}

impl Decoder {
    /// Process one node object, returning its subject term
    fn node_object(&mut self, object: &Map<String, Value>) -> Result<Term> {
        let subject = match object.get("@id").and_then(Value::as_str) {
            Some(id) => self.expand_id(id),
            None => {
                let term = Term::blank(format!("b{}", self.blank_counter));
                self.blank_counter += 1;
                term
            }
        };

        for (key, value) in object {
            if key == "@id" || key == "@context" {
                continue;
            }
            if key == "@type" {
                for type_value in as_slice(value) {
                    if let Some(iri) = type_value.as_str() {
                        self.set.add(
                            subject.clone(),
                            Term::iri(rdf::TYPE),
                            self.expand_id(iri),
                        );
                    }
                }
                continue;
            }
            let predicate = Term::iri(self.expand(key));
            for item in as_slice(value) {
                let object_term = self.value_term(item)?;
                self.set
                    .add(subject.clone(), predicate.clone(), object_term);
            }
        }
        Ok(subject)
    }

    fn value_term(&mut self, value: &Value) -> Result<Term> {
        match value {
            Value::String(s) => Ok(Term::string(s)),
            Value::Bool(b) => Ok(Term::boolean(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Term::integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Term::float(f))
                } else {
                    Err(Error::parse(FORMAT, format!("unrepresentable number {}", n)))
                }
            }
            Value::Object(object) => {
                if let Some(lexical) = object.get("@value") {
                    return self.typed_value(lexical, object.get("@type"));
                }
                if object.len() == 1 {
                    if let Some(id) = object.get("@id").and_then(Value::as_str) {
                        return Ok(self.expand_id(id));
                    }
                }
                // nested node object: emit its triples, link to its subject
                self.node_object(object)
            }
            other => Err(Error::parse(
                FORMAT,
                format!("unsupported value {}", other),
            )),
        }
    }

    fn typed_value(&self, lexical: &Value, datatype: Option<&Value>) -> Result<Term> {
        let lexical = match lexical {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => {
                return Err(Error::parse(
                    FORMAT,
                    format!("unsupported @value {}", other),
                ))
            }
        };
        let datatype = match datatype.and_then(Value::as_str) {
            Some(iri) => Datatype::from_iri(self.expand(iri)),
            None => Datatype::xsd_string(),
        };
        Term::typed(&lexical, datatype.clone()).ok_or_else(|| {
            Error::parse(FORMAT, format!("{:?} is not a valid {}", lexical, datatype))
        })
    }

    fn expand_id(&self, id: &str) -> Term {
        if let Some(label) = id.strip_prefix("_:") {
            return Term::blank(label);
        }
        Term::iri(self.expand(id))
    }

    /// Expand a compact IRI against the context; full IRIs pass through
    fn expand(&self, iri: &str) -> String {
        if let Some(colon) = iri.find(':') {
            let (prefix, local) = (&iri[..colon], &iri[colon + 1..]);
            if !local.starts_with("//") {
                if let Some(namespace) = self.set.prefixes.get(prefix) {
                    return format!("{}{}", namespace, local);
                }
            }
        }
        iri.to_string()
    }
}

fn as_slice(value: &Value) -> &[Value] {
    match value {
        Value::Array(values) => values,
        other => std::slice::from_ref(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use graphlift_model::Triple;
    use graphlift_vocab::{rdfs, xsd};

    fn sample_set() -> TripleSet {
        let mut set = TripleSet::new();
        set.add_prefix("kg", "http://example.org/kg/");
        set.add_prefix("rdfs", "http://www.w3.org/2000/01/rdf-schema#");
        set.add_prefix("xsd", xsd::NS);
        set.add(
            Term::iri("http://example.org/kg/p1"),
            Term::iri(rdf::TYPE),
            Term::iri("http://example.org/kg/Person"),
        );
        set.add(
            Term::iri("http://example.org/kg/p1"),
            Term::iri(rdfs::LABEL),
            Term::string("Zhang San"),
        );
        set.add(
            Term::iri("http://example.org/kg/p1"),
            Term::iri("http://example.org/kg/age"),
            Term::integer(30),
        );
        set.add(
            Term::iri("http://example.org/kg/p1"),
            Term::iri("http://example.org/kg/born"),
            Term::date(NaiveDate::from_ymd_opt(1996, 5, 1).unwrap()),
        );
        set.add(
            Term::iri("http://example.org/kg/p1"),
            Term::iri("http://example.org/kg/worksAt"),
            Term::iri("http://example.org/kg/c1"),
        );
        set
    }

    #[test]
    fn test_encode_shape() {
        let out = JsonLdCodec.encode(&sample_set()).unwrap();
        let doc: Value = serde_json::from_str(&out).unwrap();
        assert!(doc.get("@context").is_some());
        let graph = doc["@graph"].as_array().unwrap();
        let node = graph
            .iter()
            .find(|n| n["@id"] == "kg:p1")
            .expect("kg:p1 node");
        assert_eq!(node["@type"], "kg:Person");
        assert_eq!(node["rdfs:label"], "Zhang San");
        assert_eq!(node["kg:age"], 30);
        assert_eq!(node["kg:worksAt"]["@id"], "kg:c1");
        assert_eq!(node["kg:born"]["@value"], "1996-05-01");
        assert_eq!(node["kg:born"]["@type"], "xsd:date");
    }

    #[test]
    fn test_round_trip() {
        let set = sample_set();
        let out = JsonLdCodec.encode(&set).unwrap();
        let back = JsonLdCodec.decode(&out).unwrap();
        assert_eq!(back.len(), set.len());
        for triple in set.iter() {
            assert!(back.contains(triple), "missing {}", triple);
        }
    }

    #[test]
    fn test_decode_expanded_and_nested() {
        let input = r#"{
            "@graph": [
                {
                    "@id": "http://example.org/a",
                    "http://example.org/knows": {
                        "@id": "http://example.org/b",
                        "http://example.org/name": "Bee"
                    }
                }
            ]
        }"#;
        let set = JsonLdCodec.decode(input).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Triple::new(
            Term::iri("http://example.org/a"),
            Term::iri("http://example.org/knows"),
            Term::iri("http://example.org/b"),
        )));
        assert!(set.contains(&Triple::new(
            Term::iri("http://example.org/b"),
            Term::iri("http://example.org/name"),
            Term::string("Bee"),
        )));
    }

    #[test]
    fn test_decode_type_array() {
        let input = r#"{
            "@context": {"ex": "http://example.org/"},
            "@graph": [{"@id": "ex:a", "@type": ["ex:Person", "ex:Author"]}]
        }"#;
        let set = JsonLdCodec.decode(input).unwrap();
        assert_eq!(set.matching(None, Some(&Term::iri(rdf::TYPE)), None).count(), 2);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        match JsonLdCodec.decode("{\"@graph\": [") {
            Err(Error::Parse { format, .. }) => assert_eq!(format, "jsonld"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
