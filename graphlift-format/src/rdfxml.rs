//! RDF/XML codec
//!
//! The writer emits `rdf:Description` blocks with property elements; the
//! reader is an event loop over the same subset:
//! - `<rdf:Description rdf:about="..."/>` and `rdf:nodeID` subjects
//! - property elements with `rdf:resource` / `rdf:nodeID` objects
//! - text content with optional `rdf:datatype` (typed literals)
//!
//! Not a general-purpose RDF/XML parser; scoped to what the writer and
//! common exports produce.

use crate::RdfCodec;
use graphlift_model::{local_name, Datatype, Error, Result, Term, TripleSet};
use graphlift_vocab::rdf;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::fmt::Write;

const FORMAT: &str = "rdfxml";

pub struct RdfXmlCodec;

impl RdfCodec for RdfXmlCodec {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn encode(&self, set: &TripleSet) -> Result<String> {
        encode(set)
    }

    fn decode(&self, input: &str) -> Result<TripleSet> {
        decode(input)
    }
}

fn encode(set: &TripleSet) -> Result<String> {
    // namespace -> prefix, seeded from the model's table, extended with
    // generated ns1/ns2/... bindings for predicate namespaces it lacks
    let mut ns_to_prefix: HashMap<String, String> = set
        .prefixes
        .iter()
        .map(|(p, ns)| (ns.clone(), p.clone()))
        .collect();
    ns_to_prefix.insert(rdf::NS.to_string(), "rdf".to_string());
    let mut generated = 0usize;

    let mut qnames: HashMap<&str, (String, String)> = HashMap::new();
    for triple in set.iter() {
        let pred = triple.p.as_iri().ok_or_else(|| {
            Error::encoding("predicate is not an IRI")
        })?;
        if qnames.contains_key(pred) {
            continue;
        }
        let local = local_name(pred);
        if local.is_empty() || !is_ncname(local) {
            return Err(Error::encoding(format!(
                "predicate <{}> has no XML-serializable local name",
                pred
            )));
        }
        let namespace = &pred[..pred.len() - local.len()];
        let prefix = match ns_to_prefix.get(namespace) {
            Some(p) => p.clone(),
            None => {
                generated += 1;
                let p = format!("ns{}", generated);
                ns_to_prefix.insert(namespace.to_string(), p.clone());
                p
            }
        };
        qnames.insert(pred, (prefix, local.to_string()));
    }

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<rdf:RDF");
    let mut bindings: Vec<(&String, &String)> =
        ns_to_prefix.iter().map(|(ns, p)| (p, ns)).collect();
    bindings.sort();
    for (prefix, namespace) in bindings {
        let _ = write!(out, "\n    xmlns:{}=\"{}\"", prefix, namespace);
    }
    out.push_str(">\n");

    for (subject, triples) in set.group_by_subject() {
        match subject {
            Term::Iri(iri) => {
                let _ = writeln!(
                    out,
                    "  <rdf:Description rdf:about=\"{}\">",
                    escape_xml(iri)
                );
            }
            Term::Blank(id) => {
                let _ = writeln!(
                    out,
                    "  <rdf:Description rdf:nodeID=\"{}\">",
                    escape_xml(id.as_str())
                );
            }
            Term::Literal { .. } => {
                return Err(Error::encoding("literal subject in triple model"))
            }
        }
        for triple in triples {
            let pred = triple.p.as_iri().unwrap_or_default();
            let (prefix, local) = &qnames[pred];
            match &triple.o {
                Term::Iri(iri) => {
                    let _ = writeln!(
                        out,
                        "    <{}:{} rdf:resource=\"{}\"/>",
                        prefix,
                        local,
                        escape_xml(iri)
                    );
                }
                Term::Blank(id) => {
                    let _ = writeln!(
                        out,
                        "    <{}:{} rdf:nodeID=\"{}\"/>",
                        prefix,
                        local,
                        escape_xml(id.as_str())
                    );
                }
                Term::Literal { value, datatype } => {
                    if datatype.is_xsd_string() {
                        let _ = writeln!(
                            out,
                            "    <{}:{}>{}</{}:{}>",
                            prefix,
                            local,
                            escape_xml(&value.lexical()),
                            prefix,
                            local
                        );
                    } else {
                        let _ = writeln!(
                            out,
                            "    <{}:{} rdf:datatype=\"{}\">{}</{}:{}>",
                            prefix,
                            local,
                            escape_xml(datatype.as_iri()),
                            escape_xml(&value.lexical()),
                            prefix,
                            local
                        );
                    }
                }
            }
        }
        out.push_str("  </rdf:Description>\n");
    }
    out.push_str("</rdf:RDF>\n");
    Ok(out)
}

fn decode(input: &str) -> Result<TripleSet> {
    let mut reader = Reader::from_str(input);
    let mut set = TripleSet::new();

    let mut namespaces: HashMap<String, String> = HashMap::new();
    let mut current_subject: Option<Term> = None;
    let mut current_predicate: Option<Term> = None;
    let mut current_object: Option<Term> = None;
    let mut current_datatype: Option<Datatype> = None;
    let mut text_buf = String::new();
    let mut in_property = false;

    loop {
        let position = reader.buffer_position() as usize;
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let (prefix, element_local) = split_qname(e.name().as_ref());
                collect_namespaces(e, &mut namespaces);

                if element_local == "RDF" {
                    // root element, namespaces collected above
                } else if element_local == "Description" && prefix_is_rdf(&prefix, &namespaces) {
                    current_subject = subject_term(e, &namespaces);
                } else if current_subject.is_some() {
                    current_predicate = Some(Term::iri(resolve_qname(
                        &prefix,
                        &element_local,
                        &namespaces,
                        position,
                    )?));
                    current_object = object_term(e, &namespaces);
                    current_datatype = extract_rdf_attr(e, "datatype", &namespaces)
                        .map(Datatype::from_iri);
                    text_buf.clear();
                    in_property = true;
                }
            }
            Ok(Event::Empty(ref e)) => {
                let (prefix, element_local) = split_qname(e.name().as_ref());
                collect_namespaces(e, &mut namespaces);

                if element_local == "Description" && prefix_is_rdf(&prefix, &namespaces) {
                    continue;
                }
                if let Some(subject) = &current_subject {
                    let pred = Term::iri(resolve_qname(
                        &prefix,
                        &element_local,
                        &namespaces,
                        position,
                    )?);
                    // A bare empty property element is an empty literal.
                    let object = object_term(e, &namespaces)
                        .unwrap_or_else(|| Term::string(""));
                    set.add(subject.clone(), pred, object);
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_property {
                    match e.unescape() {
                        Ok(unescaped) => text_buf.push_str(&unescaped),
                        Err(err) => {
                            return Err(Error::parse_at(FORMAT, position, err.to_string()))
                        }
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let (prefix, element_local) = split_qname(e.name().as_ref());
                if element_local == "Description" && prefix_is_rdf(&prefix, &namespaces) {
                    current_subject = None;
                } else if in_property {
                    if let (Some(subject), Some(pred)) = (&current_subject, &current_predicate) {
                        let object = match current_object.take() {
                            Some(object) => object,
                            None => match &current_datatype {
                                // Non-string XSD types collapse surrounding
                                // whitespace; strings keep it verbatim.
                                Some(datatype) if !datatype.is_xsd_string() => {
                                    let lexical = text_buf.trim();
                                    Term::typed(lexical, datatype.clone()).ok_or_else(|| {
                                        Error::parse_at(
                                            FORMAT,
                                            position,
                                            format!(
                                                "{:?} is not a valid {}",
                                                lexical, datatype
                                            ),
                                        )
                                    })?
                                }
                                _ => {
                                    // Whitespace-only content is formatting.
                                    if text_buf.trim().is_empty() {
                                        Term::string("")
                                    } else {
                                        Term::string(text_buf.as_str())
                                    }
                                }
                            },
                        };
                        set.add(subject.clone(), pred.clone(), object);
                    }
                    current_predicate = None;
                    current_object = None;
                    current_datatype = None;
                    text_buf.clear();
                    in_property = false;
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(Error::parse_at(FORMAT, position, err.to_string())),
            _ => {}
        }
    }

    Ok(set)
}

fn subject_term(e: &quick_xml::events::BytesStart, namespaces: &HashMap<String, String>) -> Option<Term> {
    if let Some(about) = extract_rdf_attr(e, "about", namespaces) {
        return Some(Term::iri(about));
    }
    extract_rdf_attr(e, "nodeID", namespaces).map(Term::blank)
}

fn object_term(e: &quick_xml::events::BytesStart, namespaces: &HashMap<String, String>) -> Option<Term> {
    if let Some(resource) = extract_rdf_attr(e, "resource", namespaces) {
        return Some(Term::iri(resource));
    }
    extract_rdf_attr(e, "nodeID", namespaces).map(Term::blank)
}

/// Split a qualified XML name (e.g. b"rdf:Description") into (prefix, local)
fn split_qname(name: &[u8]) -> (String, String) {
    let name_str = String::from_utf8_lossy(name);
    if let Some(pos) = name_str.find(':') {
        (name_str[..pos].to_string(), name_str[pos + 1..].to_string())
    } else {
        (String::new(), name_str.to_string())
    }
}

fn prefix_is_rdf(prefix: &str, namespaces: &HashMap<String, String>) -> bool {
    namespaces.get(prefix).is_some_and(|ns| ns == rdf::NS)
}

/// Collect xmlns: declarations from an element's attributes
fn collect_namespaces(e: &quick_xml::events::BytesStart, namespaces: &mut HashMap<String, String>) {
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.0).to_string();
        if let Some(prefix) = key.strip_prefix("xmlns:") {
            namespaces.insert(
                prefix.to_string(),
                String::from_utf8_lossy(&attr.value).to_string(),
            );
        }
    }
}

/// Extract an attribute from the RDF namespace (`rdf:about`, `rdf:resource`,
/// `rdf:nodeID`, `rdf:datatype`), accepting any prefix bound to it
fn extract_rdf_attr(
    e: &quick_xml::events::BytesStart,
    attr_local: &str,
    namespaces: &HashMap<String, String>,
) -> Option<String> {
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.0).to_string();
        let (aprefix, alocal) = match key.find(':') {
            Some(pos) => (&key[..pos], &key[pos + 1..]),
            None => ("", key.as_str()),
        };
        if alocal != attr_local {
            continue;
        }
        if aprefix.is_empty() || prefix_is_rdf(aprefix, namespaces) {
            return Some(String::from_utf8_lossy(&attr.value).to_string());
        }
    }
    None
}

fn resolve_qname(
    prefix: &str,
    local: &str,
    namespaces: &HashMap<String, String>,
    position: usize,
) -> Result<String> {
    if prefix.is_empty() {
        return Err(Error::parse_at(
            FORMAT,
            position,
            format!("unprefixed property element: {}", local),
        ));
    }
    let namespace = namespaces.get(prefix).ok_or_else(|| {
        Error::parse_at(FORMAT, position, format!("unknown namespace prefix: {}", prefix))
    })?;
    Ok(format!("{}{}", namespace, local))
}

fn is_ncname(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .map_or(false, |c| c.is_alphabetic() || c == '_')
        && s.chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn escape_xml(s: &str) -> String {
    quick_xml::escape::escape(s).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphlift_model::Triple;
    use graphlift_vocab::rdfs;

    fn sample_set() -> TripleSet {
        let mut set = TripleSet::new();
        set.add_prefix("kg", "http://example.org/kg/");
        set.add_prefix("rdfs", "http://www.w3.org/2000/01/rdf-schema#");
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
            Term::blank("e0"),
            Term::iri("http://example.org/kg/hasSource"),
            Term::iri("http://example.org/kg/p1"),
        );
        set
    }

    #[test]
    fn test_encode_structure() {
        let out = RdfXmlCodec.encode(&sample_set()).unwrap();
        assert!(out.starts_with("<?xml version=\"1.0\""));
        assert!(out.contains("xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\""));
        assert!(out.contains("<rdf:Description rdf:about=\"http://example.org/kg/p1\">"));
        assert!(out.contains("<rdf:Description rdf:nodeID=\"e0\">"));
        assert!(out.contains("<rdfs:label>Zhang San</rdfs:label>"));
        assert!(out.contains(
            "rdf:datatype=\"http://www.w3.org/2001/XMLSchema#integer\">30</kg:age>"
        ));
    }

    #[test]
    fn test_round_trip() {
        let set = sample_set();
        let out = RdfXmlCodec.encode(&set).unwrap();
        let back = RdfXmlCodec.decode(&out).unwrap();
        assert_eq!(back.len(), set.len());
        for triple in set.iter() {
            assert!(back.contains(triple), "missing {}", triple);
        }
    }

    #[test]
    fn test_decode_handwritten() {
        let input = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
    xmlns:ex="http://example.org/">
  <rdf:Description rdf:about="http://example.org/a">
    <ex:knows rdf:resource="http://example.org/b"/>
    <ex:name>Alice</ex:name>
  </rdf:Description>
</rdf:RDF>"#;
        let set = RdfXmlCodec.decode(input).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Triple::new(
            Term::iri("http://example.org/a"),
            Term::iri("http://example.org/knows"),
            Term::iri("http://example.org/b"),
        )));
        assert!(set.contains(&Triple::new(
            Term::iri("http://example.org/a"),
            Term::iri("http://example.org/name"),
            Term::string("Alice"),
        )));
    }

    #[test]
    fn test_string_whitespace_survives_round_trip() {
        let mut set = TripleSet::new();
        set.add(
            Term::iri("http://example.org/a"),
            Term::iri("http://example.org/note"),
            Term::string("  padded  "),
        );
        let out = RdfXmlCodec.encode(&set).unwrap();
        let back = RdfXmlCodec.decode(&out).unwrap();
        assert!(back.contains(&Triple::new(
            Term::iri("http://example.org/a"),
            Term::iri("http://example.org/note"),
            Term::string("  padded  "),
        )));
    }

    #[test]
    fn test_empty_property_element_is_empty_literal() {
        let input = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
    xmlns:ex="http://example.org/">
  <rdf:Description rdf:about="http://example.org/a">
    <ex:name/>
    <ex:note></ex:note>
  </rdf:Description>
</rdf:RDF>"#;
        let set = RdfXmlCodec.decode(input).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Triple::new(
            Term::iri("http://example.org/a"),
            Term::iri("http://example.org/name"),
            Term::string(""),
        )));
        assert!(set.contains(&Triple::new(
            Term::iri("http://example.org/a"),
            Term::iri("http://example.org/note"),
            Term::string(""),
        )));
    }

    #[test]
    fn test_malformed_xml_is_parse_error() {
        let input = "<rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\"><rdf:Description";
        assert!(matches!(
            RdfXmlCodec.decode(input),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_unserializable_predicate_is_encoding_error() {
        let mut set = TripleSet::new();
        set.add(
            Term::iri("http://example.org/a"),
            Term::iri("http://example.org/has%20space"),
            Term::string("v"),
        );
        assert!(matches!(
            RdfXmlCodec.encode(&set),
            Err(Error::Encoding(_))
        ));
    }
}
