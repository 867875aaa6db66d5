//! Canonical triple model - a set of triples plus a namespace table
//!
//! `TripleSet` is the format-neutral representation every codec reads from
//! or writes into. Storage is a `BTreeSet`, which gives both set semantics
//! (idempotent insert) and deterministic SPO iteration order in one
//! structure.

use crate::{Term, Triple};
use std::collections::btree_set;
use std::collections::{BTreeMap, BTreeSet};
use std::iter::Peekable;

/// A set of RDF triples with namespace bindings
///
/// # Design Decisions
///
/// - **Set semantics**: inserting an existing triple is a no-op.
/// - **Deterministic order**: iteration is SPO-lexicographic, so encoders
///   produce stable output without an explicit sort step.
/// - **No deletion**: conversions are build-once; the model only grows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TripleSet {
    triples: BTreeSet<Triple>,
    /// Base IRI, when known (set by the encoder or a parser directive)
    pub base: Option<String>,
    /// Prefix mappings (prefix -> namespace IRI)
    pub prefixes: BTreeMap<String, String>,
}

impl TripleSet {
    /// Create an empty triple set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a triple set with a base IRI
    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            base: Some(base.into()),
            ..Default::default()
        }
    }

    /// Add a prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Insert a triple; returns false if it was already present
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    /// Insert a triple by components
    pub fn add(&mut self, s: Term, p: Term, o: Term) -> bool {
        self.insert(Triple::new(s, p, o))
    }

    /// Get the number of triples
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Check if a triple is present
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Iterate over triples in SPO order
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Lazily iterate over triples matching an (s, p, o) pattern
    ///
    /// `None` in any position is a wildcard. This is the only primitive a
    /// query engine needs from the model.
    pub fn matching<'a>(
        &'a self,
        s: Option<&'a Term>,
        p: Option<&'a Term>,
        o: Option<&'a Term>,
    ) -> impl Iterator<Item = &'a Triple> + 'a {
        self.triples.iter().filter(move |t| {
            s.map_or(true, |s| &t.s == s)
                && p.map_or(true, |p| &t.p == p)
                && o.map_or(true, |o| &t.o == o)
        })
    }

    /// Union another model into this one (the data-fusion operation)
    ///
    /// Triples are unioned with set semantics. Prefix tables are unioned
    /// with caller-wins conflict resolution: existing bindings in `self`
    /// are kept.
    pub fn merge(&mut self, other: TripleSet) {
        self.triples.extend(other.triples);
        for (prefix, namespace) in other.prefixes {
            self.prefixes.entry(prefix).or_insert(namespace);
        }
        if self.base.is_none() {
            self.base = other.base;
        }
    }

    /// Iterate over triples grouped by subject
    ///
    /// Groups arrive in subject order; within a group, triples are in PO
    /// order.
    pub fn group_by_subject(&self) -> SubjectGroups<'_> {
        SubjectGroups {
            inner: self.triples.iter().peekable(),
        }
    }

    /// Get all distinct subjects in order
    pub fn subjects(&self) -> Vec<&Term> {
        let mut subjects: Vec<&Term> = self.triples.iter().map(|t| &t.s).collect();
        subjects.dedup();
        subjects
    }
}

impl IntoIterator for TripleSet {
    type Item = Triple;
    type IntoIter = btree_set::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

impl<'a> IntoIterator for &'a TripleSet {
    type Item = &'a Triple;
    type IntoIter = btree_set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

impl FromIterator<Triple> for TripleSet {
    fn from_iter<T: IntoIterator<Item = Triple>>(iter: T) -> Self {
        TripleSet {
            triples: iter.into_iter().collect(),
            base: None,
            prefixes: BTreeMap::new(),
        }
    }
}

impl Extend<Triple> for TripleSet {
    fn extend<T: IntoIterator<Item = Triple>>(&mut self, iter: T) {
        self.triples.extend(iter);
    }
}

/// Iterator over triples grouped by subject
pub struct SubjectGroups<'a> {
    inner: Peekable<btree_set::Iter<'a, Triple>>,
}

impl<'a> Iterator for SubjectGroups<'a> {
    type Item = (&'a Term, Vec<&'a Triple>);

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.inner.next()?;
        let subject = &first.s;
        let mut group = vec![first];
        while self.inner.peek().is_some_and(|t| &t.s == subject) {
            if let Some(t) = self.inner.next() {
                group.push(t);
            }
        }
        Some((subject, group))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_set() -> TripleSet {
        let mut set = TripleSet::new();
        set.add(
            Term::iri("http://example.org/bob"),
            Term::iri("http://example.org/name"),
            Term::string("Bob"),
        );
        set.add(
            Term::iri("http://example.org/alice"),
            Term::iri("http://example.org/name"),
            Term::string("Alice"),
        );
        set.add(
            Term::iri("http://example.org/alice"),
            Term::iri("http://example.org/age"),
            Term::integer(30),
        );
        set
    }

    #[test]
    fn test_set_semantics() {
        let mut set = TripleSet::new();
        let triple = Triple::new(
            Term::iri("http://example.org/s"),
            Term::iri("http://example.org/p"),
            Term::string("o"),
        );
        assert!(set.insert(triple.clone()));
        assert!(!set.insert(triple));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_deterministic_iteration() {
        let set = make_test_set();
        let first = set.iter().next().unwrap();
        assert_eq!(first.s.as_iri(), Some("http://example.org/alice"));
    }

    #[test]
    fn test_matching_wildcards() {
        let set = make_test_set();
        let alice = Term::iri("http://example.org/alice");
        let name = Term::iri("http://example.org/name");

        assert_eq!(set.matching(Some(&alice), None, None).count(), 2);
        assert_eq!(set.matching(None, Some(&name), None).count(), 2);
        assert_eq!(set.matching(Some(&alice), Some(&name), None).count(), 1);
        assert_eq!(set.matching(None, None, None).count(), 3);
    }

    #[test]
    fn test_merge_caller_wins_prefixes() {
        let mut a = TripleSet::new();
        a.add_prefix("ex", "http://example.org/a/");
        let mut b = make_test_set();
        b.add_prefix("ex", "http://example.org/b/");
        b.add_prefix("foaf", "http://xmlns.com/foaf/0.1/");

        a.merge(b);
        assert_eq!(a.len(), 3);
        assert_eq!(
            a.prefixes.get("ex").map(String::as_str),
            Some("http://example.org/a/")
        );
        assert_eq!(
            a.prefixes.get("foaf").map(String::as_str),
            Some("http://xmlns.com/foaf/0.1/")
        );
    }

    #[test]
    fn test_merge_is_union() {
        let mut a = make_test_set();
        let b = make_test_set();
        a.merge(b);
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn test_group_by_subject() {
        let set = make_test_set();
        let groups: Vec<_> = set.group_by_subject().collect();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0.as_iri(), Some("http://example.org/alice"));
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0.as_iri(), Some("http://example.org/bob"));
        assert_eq!(groups[1].1.len(), 1);
    }

    #[test]
    fn test_subjects() {
        let set = make_test_set();
        assert_eq!(set.subjects().len(), 2);
    }
}
