//! N-Triples codec
//!
//! One triple per line, everything expanded. The simplest of the RDF
//! formats and the one the others are tested against.

use crate::RdfCodec;
use graphlift_model::{Datatype, Error, Result, Term, TripleSet};
use std::fmt::Write;

const FORMAT: &str = "ntriples";

pub struct NTriplesCodec;

impl RdfCodec for NTriplesCodec {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn encode(&self, set: &TripleSet) -> Result<String> {
        let mut out = String::new();
        for triple in set.iter() {
            write_term(&mut out, &triple.s);
            out.push(' ');
            write_term(&mut out, &triple.p);
            out.push(' ');
            write_term(&mut out, &triple.o);
            out.push_str(" .\n");
        }
        Ok(out)
    }

    fn decode(&self, input: &str) -> Result<TripleSet> {
        let mut set = TripleSet::new();
        for (lineno, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (s, p, o) = parse_line(line)
                .map_err(|msg| Error::parse_at(FORMAT, lineno + 1, msg))?;
            set.add(s, p, o);
        }
        Ok(set)
    }
}

fn write_term(out: &mut String, term: &Term) {
    match term {
        Term::Iri(iri) => {
            let _ = write!(out, "<{}>", iri);
        }
        Term::Blank(id) => {
            let _ = write!(out, "_:{}", id.as_str());
        }
        Term::Literal { value, datatype } => {
            out.push('"');
            out.push_str(&escape(&value.lexical()));
            out.push('"');
            if !datatype.is_xsd_string() {
                let _ = write!(out, "^^<{}>", datatype.as_iri());
            }
        }
    }
}

pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn unescape(s: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') | Some('U') => {
                return Err("unicode escapes are not supported".to_string())
            }
            Some(other) => return Err(format!("unknown escape \\{}", other)),
            None => return Err("dangling escape at end of literal".to_string()),
        }
    }
    Ok(out)
}

fn parse_line(line: &str) -> std::result::Result<(Term, Term, Term), String> {
    let mut cursor = Cursor { input: line, pos: 0 };
    let s = cursor.term()?;
    cursor.skip_ws();
    let p = cursor.term()?;
    cursor.skip_ws();
    let o = cursor.term()?;
    cursor.skip_ws();
    if !cursor.rest().starts_with('.') {
        return Err("expected terminating '.'".to_string());
    }
    Ok((s, p, o))
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_ws(&mut self) {
        while self.rest().starts_with([' ', '\t']) {
            self.pos += 1;
        }
    }

    fn term(&mut self) -> std::result::Result<Term, String> {
        let rest = self.rest();
        if let Some(rest) = rest.strip_prefix('<') {
            let end = rest.find('>').ok_or("unterminated IRI")?;
            let iri = &rest[..end];
            self.pos += end + 2;
            Ok(Term::iri(iri))
        } else if let Some(rest) = rest.strip_prefix("_:") {
            let end = rest
                .find(|c: char| c.is_whitespace())
                .unwrap_or(rest.len());
            let label = &rest[..end];
            if label.is_empty() {
                return Err("empty blank node label".to_string());
            }
            self.pos += end + 2;
            Ok(Term::blank(label))
        } else if rest.starts_with('"') {
            self.literal()
        } else {
            Err(format!("unexpected token at {:?}", truncate(rest)))
        }
    }

    fn literal(&mut self) -> std::result::Result<Term, String> {
        // past the opening quote
        let body_start = self.pos + 1;
        let bytes = self.input.as_bytes();
        let mut i = body_start;
        loop {
            if i >= bytes.len() {
                return Err("unterminated string literal".to_string());
            }
            match bytes[i] {
                b'\\' => i += 2,
                b'"' => break,
                _ => i += 1,
            }
        }
        let lexical = unescape(&self.input[body_start..i])?;
        self.pos = i + 1;

        if let Some(rest) = self.rest().strip_prefix("^^<") {
            let end = rest.find('>').ok_or("unterminated datatype IRI")?;
            let datatype = Datatype::from_iri(&rest[..end]);
            self.pos += end + 4;
            Term::typed(&lexical, datatype.clone())
                .ok_or_else(|| format!("{:?} is not a valid {}", lexical, datatype))
        } else if self.rest().starts_with('@') {
            // language tags are dropped; the value survives as a plain string
            let rest = self.rest();
            let end = rest[1..]
                .find(|c: char| c.is_whitespace())
                .map(|n| n + 1)
                .unwrap_or(rest.len());
            self.pos += end;
            Ok(Term::string(lexical))
        } else {
            Ok(Term::string(lexical))
        }
    }
}

fn truncate(s: &str) -> &str {
    let end = s
        .char_indices()
        .nth(20)
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    &s[..end]
}
