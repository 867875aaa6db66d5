//! Turtle codec
//!
//! The encoder writes a `@prefix` header from the model's prefix table,
//! groups triples by subject with `;`/`,` continuations, and compacts IRIs
//! against known prefixes. The decoder is a recursive-descent parser over
//! the Turtle subset the encoder emits plus directives, blank node
//! property lists, and collections.

use crate::{ntriples, RdfCodec};
use graphlift_model::{Datatype, Error, LiteralValue, Result, Term, Triple, TripleSet};
use graphlift_vocab::rdf;
use std::fmt::Write;

const FORMAT: &str = "turtle";

pub struct TurtleCodec;

impl RdfCodec for TurtleCodec {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn encode(&self, set: &TripleSet) -> Result<String> {
        encode(set)
    }

    fn decode(&self, input: &str) -> Result<TripleSet> {
        decode(input, FORMAT)
    }
}

pub(crate) fn encode(set: &TripleSet) -> Result<String> {
    let mut out = String::new();
    for (prefix, namespace) in &set.prefixes {
        let _ = writeln!(out, "@prefix {}: <{}> .", prefix, namespace);
    }
    if !set.prefixes.is_empty() && !set.is_empty() {
        out.push('\n');
    }

    for (subject, triples) in set.group_by_subject() {
        out.push_str(&render_term(subject, set));
        let mut first_pred = true;
        let mut i = 0;
        while i < triples.len() {
            let pred = &triples[i].p;
            if first_pred {
                out.push(' ');
                first_pred = false;
            } else {
                out.push_str(" ;\n    ");
            }
            out.push_str(&render_predicate(pred, set));
            out.push(' ');
            let mut first_obj = true;
            while i < triples.len() && &triples[i].p == pred {
                if !first_obj {
                    out.push_str(", ");
                }
                out.push_str(&render_term(&triples[i].o, set));
                first_obj = false;
                i += 1;
            }
        }
        out.push_str(" .\n");
    }
    Ok(out)
}

fn render_predicate(term: &Term, set: &TripleSet) -> String {
    if term.as_iri() == Some(rdf::TYPE) {
        return "a".to_string();
    }
    render_term(term, set)
}

fn render_term(term: &Term, set: &TripleSet) -> String {
    match term {
        Term::Iri(iri) => compact_iri(iri, set).unwrap_or_else(|| format!("<{}>", iri)),
        Term::Blank(id) => format!("_:{}", id.as_str()),
        Term::Literal { value, datatype } => match value {
            LiteralValue::Integer(i) => i.to_string(),
            LiteralValue::Boolean(b) => b.to_string(),
            _ if datatype.is_xsd_string() => {
                format!("\"{}\"", ntriples::escape(&value.lexical()))
            }
            // Doubles and dates stay typed so they survive a reparse.
            _ => {
                let dt = compact_iri(datatype.as_iri(), set)
                    .unwrap_or_else(|| format!("<{}>", datatype.as_iri()));
                format!("\"{}\"^^{}", ntriples::escape(&value.lexical()), dt)
            }
        },
    }
}

/// Compact an IRI to `prefix:local` when a bound namespace matches and the
/// remainder is a safe local name
fn compact_iri(iri: &str, set: &TripleSet) -> Option<String> {
    for (prefix, namespace) in &set.prefixes {
        if let Some(local) = iri.strip_prefix(namespace.as_str()) {
            if is_safe_local(local) {
                return Some(format!("{}:{}", prefix, local));
            }
        }
    }
    None
}

fn is_safe_local(local: &str) -> bool {
    !local.is_empty()
        && !local.starts_with('-')
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

pub(crate) fn decode(input: &str, format: &'static str) -> Result<TripleSet> {
    let mut parser = Parser {
        input,
        pos: 0,
        format,
        set: TripleSet::new(),
        blank_counter: 0,
    };
    parser.parse()?;
    Ok(parser.set)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    format: &'static str,
    set: TripleSet,
    blank_counter: usize,
}

impl<'a> Parser<'a> {
    fn parse(&mut self) -> Result<()> {
        loop {
            self.skip_ws();
            if self.at_eof() {
                return Ok(());
            }
            if self.eat_keyword("@prefix") || self.eat_keyword("PREFIX") {
                self.prefix_directive()?;
            } else if self.eat_keyword("@base") || self.eat_keyword("BASE") {
                self.base_directive()?;
            } else {
                let subject = self.subject()?;
                self.predicate_object_list(&subject)?;
                self.expect('.')?;
            }
        }
    }

    fn prefix_directive(&mut self) -> Result<()> {
        self.skip_ws();
        let prefix = self.pname_prefix()?;
        self.expect(':')?;
        self.skip_ws();
        let namespace = self.iri_ref()?;
        self.skip_ws();
        // SPARQL-style PREFIX has no terminating dot
        let _ = self.eat('.');
        self.set.add_prefix(prefix, namespace);
        Ok(())
    }

    fn base_directive(&mut self) -> Result<()> {
        self.skip_ws();
        let base = self.iri_ref()?;
        self.skip_ws();
        let _ = self.eat('.');
        self.set.base = Some(base);
        Ok(())
    }

    fn predicate_object_list(&mut self, subject: &Term) -> Result<()> {
        loop {
            self.skip_ws();
            let predicate = self.verb()?;
            loop {
                let object = self.object()?;
                self.set
                    .insert(Triple::new(subject.clone(), predicate.clone(), object));
                self.skip_ws();
                if !self.eat(',') {
                    break;
                }
            }
            self.skip_ws();
            if self.eat(';') {
                self.skip_ws();
                // trailing semicolon before '.' or ']'
                if self.peek() == Some('.') || self.peek() == Some(']') || self.at_eof() {
                    return Ok(());
                }
            } else {
                return Ok(());
            }
        }
    }

    fn verb(&mut self) -> Result<Term> {
        if self.peek() == Some('a') {
            let after = self.input[self.pos + 1..].chars().next();
            if after.map_or(true, |c| c.is_whitespace() || c == '<' || c == '[') {
                self.pos += 1;
                return Ok(Term::iri(rdf::TYPE));
            }
        }
        self.iri_term()
    }

    fn subject(&mut self) -> Result<Term> {
        self.skip_ws();
        match self.peek() {
            Some('[') => self.blank_property_list(),
            Some('(') => self.collection(),
            Some('_') => self.blank_label(),
            _ => self.iri_term(),
        }
    }

    fn object(&mut self) -> Result<Term> {
        self.skip_ws();
        match self.peek() {
            Some('[') => self.blank_property_list(),
            Some('(') => self.collection(),
            Some('_') => self.blank_label(),
            Some('"') | Some('\'') => self.string_literal(),
            Some(c) if c.is_ascii_digit() || c == '+' || c == '-' => self.numeric_literal(),
            Some('t') | Some('f') => {
                if self.eat_keyword("true") {
                    Ok(Term::boolean(true))
                } else if self.eat_keyword("false") {
                    Ok(Term::boolean(false))
                } else {
                    self.iri_term()
                }
            }
            _ => self.iri_term(),
        }
    }

    fn blank_property_list(&mut self) -> Result<Term> {
        self.expect('[')?;
        let term = self.fresh_blank();
        self.skip_ws();
        if self.peek() != Some(']') {
            self.predicate_object_list(&term)?;
            self.skip_ws();
        }
        self.expect(']')?;
        Ok(term)
    }

    fn collection(&mut self) -> Result<Term> {
        self.expect('(')?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(')') {
                self.pos += 1;
                break;
            }
            if self.at_eof() {
                return Err(self.error("unterminated collection"));
            }
            items.push(self.object()?);
        }
        if items.is_empty() {
            return Ok(Term::iri(rdf::NIL));
        }
        let first = Term::iri(rdf::FIRST);
        let rest = Term::iri(rdf::REST);
        let head = self.fresh_blank();
        let mut node = head.clone();
        for (i, item) in items.iter().enumerate() {
            self.set
                .insert(Triple::new(node.clone(), first.clone(), item.clone()));
            let next = if i + 1 == items.len() {
                Term::iri(rdf::NIL)
            } else {
                self.fresh_blank()
            };
            self.set
                .insert(Triple::new(node, rest.clone(), next.clone()));
            node = next;
        }
        Ok(head)
    }

    fn fresh_blank(&mut self) -> Term {
        let term = Term::blank(format!("b{}", self.blank_counter));
        self.blank_counter += 1;
        term
    }

    fn blank_label(&mut self) -> Result<Term> {
        if !self.rest().starts_with("_:") {
            return Err(self.error("expected blank node label"));
        }
        self.pos += 2;
        let start = self.pos;
        while self
            .peek()
            .map_or(false, |c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            self.pos += self.peek().map_or(0, char::len_utf8);
        }
        if self.pos == start {
            return Err(self.error("empty blank node label"));
        }
        Ok(Term::blank(&self.input[start..self.pos]))
    }

    fn iri_term(&mut self) -> Result<Term> {
        if self.peek() == Some('<') {
            let iri = self.iri_ref()?;
            return Ok(Term::iri(self.resolve(&iri)));
        }
        let prefix = self.pname_prefix()?;
        self.expect(':')?;
        let local = self.pname_local();
        let namespace = self
            .set
            .prefixes
            .get(&prefix)
            .cloned()
            .ok_or_else(|| self.error(format!("unknown prefix {:?}", prefix)))?;
        Ok(Term::iri(format!("{}{}", namespace, local)))
    }

    fn iri_ref(&mut self) -> Result<String> {
        self.expect('<')?;
        let start = self.pos;
        let end = self.rest().find('>').ok_or_else(|| {
            self.error("unterminated IRI reference")
        })?;
        self.pos = start + end + 1;
        Ok(self.input[start..start + end].to_string())
    }

    fn resolve(&self, iri: &str) -> String {
        if iri.contains(':') {
            return iri.to_string();
        }
        match &self.set.base {
            Some(base) => format!("{}{}", base, iri),
            None => iri.to_string(),
        }
    }

    fn pname_prefix(&mut self) -> Result<String> {
        let start = self.pos;
        while self
            .peek()
            .map_or(false, |c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
        {
            self.pos += self.peek().map_or(0, char::len_utf8);
        }
        if self.peek() != Some(':') {
            self.pos = start;
            return Err(self.error("expected prefixed name or IRI"));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn pname_local(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .map_or(false, |c| {
                c.is_alphanumeric() || c == '_' || c == '-' || c == '.' || c == '%'
            })
        {
            self.pos += self.peek().map_or(0, char::len_utf8);
        }
        // trailing dots belong to the statement terminator, not the name
        let mut end = self.pos;
        while end > start && self.input.as_bytes()[end - 1] == b'.' {
            end -= 1;
        }
        self.pos = end;
        self.input[start..end].to_string()
    }

    fn string_literal(&mut self) -> Result<Term> {
        let lexical = self.quoted_string()?;
        self.skip_ws_inline();
        if self.rest().starts_with("^^") {
            self.pos += 2;
            let datatype_term = self.iri_term()?;
            let datatype = match datatype_term.as_iri() {
                Some(iri) => Datatype::from_iri(iri),
                None => return Err(self.error("datatype must be an IRI")),
            };
            return Term::typed(&lexical, datatype.clone()).ok_or_else(|| {
                self.error(format!("{:?} is not a valid {}", lexical, datatype))
            });
        }
        if self.peek() == Some('@') {
            // drop the language tag, keep the value
            self.pos += 1;
            while self
                .peek()
                .map_or(false, |c| c.is_ascii_alphanumeric() || c == '-')
            {
                self.pos += 1;
            }
        }
        Ok(Term::string(lexical))
    }

    fn quoted_string(&mut self) -> Result<String> {
        let quote = match self.peek() {
            Some(q @ '"') | Some(q @ '\'') => q,
            _ => return Err(self.error("expected string literal")),
        };
        let long = self.rest().starts_with(&quote.to_string().repeat(3));
        let delim_len = if long { 3 } else { 1 };
        self.pos += delim_len;

        let mut out = String::new();
        loop {
            if self.at_eof() {
                return Err(self.error("unterminated string literal"));
            }
            if long {
                if self.rest().starts_with(&quote.to_string().repeat(3)) {
                    self.pos += 3;
                    return Ok(out);
                }
            } else if self.peek() == Some(quote) {
                self.pos += 1;
                return Ok(out);
            } else if self.peek() == Some('\n') {
                return Err(self.error("unterminated string literal"));
            }
            if self.peek() == Some('\\') {
                self.pos += 1;
                match self.peek() {
                    Some('\\') => out.push('\\'),
                    Some('"') => out.push('"'),
                    Some('\'') => out.push('\''),
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('t') => out.push('\t'),
                    Some(other) => {
                        return Err(self.error(format!("unknown escape \\{}", other)))
                    }
                    None => return Err(self.error("unterminated string literal")),
                }
                self.pos += 1;
            } else if let Some(c) = self.peek() {
                out.push(c);
                self.pos += c.len_utf8();
            }
        }
    }

    fn numeric_literal(&mut self) -> Result<Term> {
        let start = self.pos;
        if matches!(self.peek(), Some('+') | Some('-')) {
            self.pos += 1;
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.pos += 1;
            } else if c == '.' {
                // a dot not followed by a digit terminates the statement
                let next = self.input[self.pos + 1..].chars().next();
                if next.map_or(false, |n| n.is_ascii_digit()) {
                    is_float = true;
                    self.pos += 1;
                } else {
                    break;
                }
            } else if c == 'e' || c == 'E' {
                is_float = true;
                self.pos += 1;
                if matches!(self.peek(), Some('+') | Some('-')) {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
        let text = &self.input[start..self.pos];
        if is_float {
            text.parse::<f64>()
                .map(Term::float)
                .map_err(|_| self.error(format!("invalid numeric literal {:?}", text)))
        } else {
            text.parse::<i64>()
                .map(Term::integer)
                .map_err(|_| self.error(format!("invalid numeric literal {:?}", text)))
        }
    }

    fn skip_ws(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => self.pos += c.len_utf8(),
                Some('#') => {
                    while self.peek().map_or(false, |c| c != '\n') {
                        self.pos += self.peek().map_or(0, char::len_utf8);
                    }
                }
                _ => return,
            }
        }
    }

    fn skip_ws_inline(&mut self) {
        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.pos += ch.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if !self.rest().starts_with(keyword) {
            return false;
        }
        let after = self.input[self.pos + keyword.len()..].chars().next();
        if after.map_or(true, |c| {
            c.is_whitespace() || matches!(c, '<' | ',' | ';' | '.' | ')' | ']')
        }) {
            self.pos += keyword.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, ch: char) -> Result<()> {
        if self.eat(ch) {
            Ok(())
        } else {
            Err(self.error(format!("expected {:?}", ch)))
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::parse_at(self.format, self.pos, message)
    }
}
