/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::expression::Expression;
use shared::terms::{BlankNode, Identifier, Literal, NamedNode, Term};

/// A query variable, stored without its leading `?`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(String);

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Variable(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Variable derived from this one, e.g. `?subject_name` for field `name`.
    pub fn child(&self, suffix: &str) -> Variable {
        Variable(format!("{}_{}", self.0, sanitize(suffix)))
    }
}

// SPARQL variable names allow letters, digits and underscores
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Subject or object position of a triple pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermPattern {
    Variable(Variable),
    Term(Term),
}

impl From<Variable> for TermPattern {
    fn from(variable: Variable) -> Self {
        TermPattern::Variable(variable)
    }
}

impl From<&Variable> for TermPattern {
    fn from(variable: &Variable) -> Self {
        TermPattern::Variable(variable.clone())
    }
}

impl From<Term> for TermPattern {
    fn from(term: Term) -> Self {
        TermPattern::Term(term)
    }
}

impl From<NamedNode> for TermPattern {
    fn from(node: NamedNode) -> Self {
        TermPattern::Term(node.into())
    }
}

impl From<BlankNode> for TermPattern {
    fn from(node: BlankNode) -> Self {
        TermPattern::Term(node.into())
    }
}

impl From<Literal> for TermPattern {
    fn from(literal: Literal) -> Self {
        TermPattern::Term(literal.into())
    }
}

impl From<Identifier> for TermPattern {
    fn from(identifier: Identifier) -> Self {
        TermPattern::Term(identifier.into())
    }
}

/// Predicate position: an IRI, a variable, or the `iri*` path used to walk
/// RDF lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PredicatePattern {
    Iri(NamedNode),
    Variable(Variable),
    ZeroOrMore(NamedNode),
}

impl From<NamedNode> for PredicatePattern {
    fn from(node: NamedNode) -> Self {
        PredicatePattern::Iri(node)
    }
}

impl From<Variable> for PredicatePattern {
    fn from(variable: Variable) -> Self {
        PredicatePattern::Variable(variable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriplePattern {
    pub subject: TermPattern,
    pub predicate: PredicatePattern,
    pub object: TermPattern,
}

impl TriplePattern {
    pub fn new(
        subject: impl Into<TermPattern>,
        predicate: impl Into<PredicatePattern>,
        object: impl Into<TermPattern>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// One fragment of a WHERE clause. Fragments form an owned tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GraphPattern {
    /// Basic graph pattern
    Bgp(Vec<TriplePattern>),
    Filter(Expression),
    /// Inline data; `None` is `UNDEF`
    Values {
        variables: Vec<Variable>,
        rows: Vec<Vec<Option<Term>>>,
    },
    Optional(Vec<GraphPattern>),
    Minus(Vec<GraphPattern>),
    Graph {
        name: TermPattern,
        patterns: Vec<GraphPattern>,
    },
    Service {
        name: NamedNode,
        silent: bool,
        patterns: Vec<GraphPattern>,
    },
    Group(Vec<GraphPattern>),
    /// Each branch is a group of its own
    Union(Vec<Vec<GraphPattern>>),
}

impl GraphPattern {
    pub fn bgp(triples: Vec<TriplePattern>) -> Self {
        GraphPattern::Bgp(triples)
    }

    pub fn triple(
        subject: impl Into<TermPattern>,
        predicate: impl Into<PredicatePattern>,
        object: impl Into<TermPattern>,
    ) -> Self {
        GraphPattern::Bgp(vec![TriplePattern::new(subject, predicate, object)])
    }

    /// One solution binding no variables.
    pub fn seed() -> Self {
        GraphPattern::Values {
            variables: Vec::new(),
            rows: vec![Vec::new()],
        }
    }

    /// No solutions at all.
    pub fn empty() -> Self {
        GraphPattern::Values {
            variables: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// `VALUES ?variable { ... }` over identifiers.
    pub fn values_of(variable: &Variable, identifiers: &[Identifier]) -> Self {
        GraphPattern::Values {
            variables: vec![variable.clone()],
            rows: identifiers
                .iter()
                .map(|identifier| vec![Some(identifier.to_term())])
                .collect(),
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, GraphPattern::Optional(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, GraphPattern::Values { .. })
    }

    pub fn is_filter(&self) -> bool {
        matches!(self, GraphPattern::Filter(_))
    }
}
