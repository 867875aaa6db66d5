//! Fact-record ingestion
//!
//! Upstream text-extraction pipelines hand over flat subject/predicate/
//! object records rather than a graph. This module folds such records into
//! a property graph so they can enter the normal conversion path.

use graphlift_model::{Edge, Node, PropertyGraph, ScalarValue};
use std::collections::HashMap;

/// One extracted statement
#[derive(Clone, Debug, PartialEq)]
pub struct Fact {
    /// Subject entity label
    pub subject_label: String,
    /// Relation or attribute name
    pub predicate_label: String,
    /// Entity reference or scalar value
    pub object: FactObject,
}

/// The object side of a fact
#[derive(Clone, Debug, PartialEq)]
pub enum FactObject {
    /// Reference to another entity by label
    Entity(String),
    /// Scalar attribute value
    Literal(ScalarValue),
}

impl Fact {
    pub fn entity(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Fact {
            subject_label: subject.into(),
            predicate_label: predicate.into(),
            object: FactObject::Entity(object.into()),
        }
    }

    pub fn literal(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        value: ScalarValue,
    ) -> Self {
        Fact {
            subject_label: subject.into(),
            predicate_label: predicate.into(),
            object: FactObject::Literal(value),
        }
    }
}

/// Defaults applied when fact records leave a slot empty
#[derive(Clone, Debug)]
pub struct ExtractionVocabulary {
    /// Type assigned to every extracted entity
    pub default_type: String,
    /// Relation used when a fact has an empty predicate
    pub default_relation: String,
}

impl Default for ExtractionVocabulary {
    fn default() -> Self {
        Self {
            default_type: "Entity".to_string(),
            default_relation: "relatedTo".to_string(),
        }
    }
}

/// Fold fact records into a property graph
///
/// Entity labels double as node ids. Entity-object facts become edges;
/// literal-object facts become properties on the subject node. Later
/// literal facts for the same predicate overwrite earlier ones.
pub fn facts_to_graph(facts: &[Fact], vocab: &ExtractionVocabulary) -> PropertyGraph {
    let mut graph = PropertyGraph::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut ensure = |graph: &mut PropertyGraph, label: &str| -> usize {
        if let Some(pos) = index.get(label) {
            return *pos;
        }
        let pos = graph.nodes.len();
        graph.add_node(Node::new(label, label).with_type(&vocab.default_type));
        index.insert(label.to_string(), pos);
        pos
    };

    for fact in facts {
        let subject = ensure(&mut graph, &fact.subject_label);
        let predicate = if fact.predicate_label.is_empty() {
            vocab.default_relation.as_str()
        } else {
            fact.predicate_label.as_str()
        };
        match &fact.object {
            FactObject::Entity(label) => {
                ensure(&mut graph, label);
                graph.add_edge(Edge::new(
                    fact.subject_label.clone(),
                    label.clone(),
                    predicate,
                ));
            }
            FactObject::Literal(value) => {
                graph.nodes[subject]
                    .properties
                    .insert(predicate.to_string(), value.clone());
            }
        }
    }
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facts_fold_into_graph() {
        let facts = vec![
            Fact::entity("Zhang San", "worksAt", "Tech Co"),
            Fact::literal("Zhang San", "age", ScalarValue::Integer(30)),
            Fact::entity("Zhang San", "", "Li Si"),
        ];
        let graph = facts_to_graph(&facts, &ExtractionVocabulary::default());

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        let subject = graph.node("Zhang San").unwrap();
        assert_eq!(subject.node_type.as_deref(), Some("Entity"));
        assert_eq!(subject.properties.get("age"), Some(&ScalarValue::Integer(30)));
        assert_eq!(graph.edges[1].relation, "relatedTo");
        assert_eq!(graph.edges[1].target, "Li Si");
    }

    #[test]
    fn test_custom_vocabulary() {
        let vocab = ExtractionVocabulary {
            default_type: "Concept".to_string(),
            default_relation: "linked".to_string(),
        };
        let graph = facts_to_graph(&[Fact::entity("a", "", "b")], &vocab);
        assert_eq!(graph.node("a").unwrap().node_type.as_deref(), Some("Concept"));
        assert_eq!(graph.edges[0].relation, "linked");
    }
}
