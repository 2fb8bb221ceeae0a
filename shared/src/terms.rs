/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::error::TermError;
use crate::ntriples;
use crate::vocab::{rdf, xsd};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A globally identifying term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamedNode {
    iri: String,
}

impl NamedNode {
    /// Creates a named node, validating the IRI syntax.
    pub fn new(iri: impl Into<String>) -> Result<Self, TermError> {
        let iri = iri.into();
        if ntriples::is_valid_iri(&iri) {
            Ok(Self { iri })
        } else {
            Err(TermError::MalformedIri(iri))
        }
    }

    /// Creates a named node from an IRI known to be valid.
    pub fn new_unchecked(iri: impl Into<String>) -> Self {
        Self { iri: iri.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.iri
    }

    pub fn into_string(self) -> String {
        self.iri
    }
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.iri)
    }
}

/// A locally scoped anonymous term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlankNode {
    label: String,
}

impl BlankNode {
    pub fn new(label: impl Into<String>) -> Result<Self, TermError> {
        let label = label.into();
        if ntriples::is_valid_blank_label(&label) {
            Ok(Self { label })
        } else {
            Err(TermError::MalformedBlankNode(label))
        }
    }

    pub fn new_unchecked(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.label)
    }
}

/// A scalar term: lexical form, datatype and optional language tag.
///
/// Simple literals carry `xsd:string`, language-tagged literals carry
/// `rdf:langString`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Literal {
    lexical: String,
    datatype: NamedNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
}

impl Literal {
    pub fn simple(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: NamedNode::new_unchecked(xsd::STRING),
            language: None,
        }
    }

    pub fn typed(lexical: impl Into<String>, datatype: NamedNode) -> Self {
        Self {
            lexical: lexical.into(),
            datatype,
            language: None,
        }
    }

    /// Language tags are stored lowercased.
    pub fn language_tagged(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: NamedNode::new_unchecked(rdf::LANG_STRING),
            language: Some(language.into().to_ascii_lowercase()),
        }
    }

    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), NamedNode::new_unchecked(xsd::INTEGER))
    }

    pub fn double(value: f64) -> Self {
        Self::typed(value.to_string(), NamedNode::new_unchecked(xsd::DOUBLE))
    }

    pub fn boolean(value: bool) -> Self {
        Self::typed(value.to_string(), NamedNode::new_unchecked(xsd::BOOLEAN))
    }

    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    pub fn datatype(&self) -> &NamedNode {
        &self.datatype
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", ntriples::escape_literal(&self.lexical))?;
        if let Some(language) = &self.language {
            write!(f, "@{}", language)
        } else if self.datatype.as_str() != xsd::STRING {
            write!(f, "^^{}", self.datatype)
        } else {
            Ok(())
        }
    }
}

/// Kind of an RDF term, used by `typeIn` filters and kind constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TermKind {
    NamedNode,
    BlankNode,
    Literal,
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TermKind::NamedNode => "NamedNode",
            TermKind::BlankNode => "BlankNode",
            TermKind::Literal => "Literal",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IdentifierKind {
    NamedNode,
    BlankNode,
}

impl From<IdentifierKind> for TermKind {
    fn from(kind: IdentifierKind) -> Self {
        match kind {
            IdentifierKind::NamedNode => TermKind::NamedNode,
            IdentifierKind::BlankNode => TermKind::BlankNode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "termType")]
pub enum Term {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Literal(Literal),
}

impl Term {
    pub fn kind(&self) -> TermKind {
        match self {
            Term::NamedNode(_) => TermKind::NamedNode,
            Term::BlankNode(_) => TermKind::BlankNode,
            Term::Literal(_) => TermKind::Literal,
        }
    }

    pub fn to_identifier(&self) -> Option<Identifier> {
        match self {
            Term::NamedNode(node) => Some(Identifier::NamedNode(node.clone())),
            Term::BlankNode(node) => Some(Identifier::BlankNode(node.clone())),
            Term::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    pub fn as_named_node(&self) -> Option<&NamedNode> {
        match self {
            Term::NamedNode(node) => Some(node),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::NamedNode(node) => node.fmt(f),
            Term::BlankNode(node) => node.fmt(f),
            Term::Literal(literal) => literal.fmt(f),
        }
    }
}

impl From<NamedNode> for Term {
    fn from(node: NamedNode) -> Self {
        Term::NamedNode(node)
    }
}

impl From<BlankNode> for Term {
    fn from(node: BlankNode) -> Self {
        Term::BlankNode(node)
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Term::Literal(literal)
    }
}

impl From<Identifier> for Term {
    fn from(identifier: Identifier) -> Self {
        match identifier {
            Identifier::NamedNode(node) => Term::NamedNode(node),
            Identifier::BlankNode(node) => Term::BlankNode(node),
        }
    }
}

/// Subject-position term: object identity and query key.
///
/// Ordering follows the canonical string form (`<iri>` / `_:label`), so
/// every named node sorts before every blank node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "termType")]
pub enum Identifier {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
}

impl Identifier {
    pub fn kind(&self) -> IdentifierKind {
        match self {
            Identifier::NamedNode(_) => IdentifierKind::NamedNode,
            Identifier::BlankNode(_) => IdentifierKind::BlankNode,
        }
    }

    pub fn is_named_node(&self) -> bool {
        matches!(self, Identifier::NamedNode(_))
    }

    pub fn as_named_node(&self) -> Option<&NamedNode> {
        match self {
            Identifier::NamedNode(node) => Some(node),
            Identifier::BlankNode(_) => None,
        }
    }

    pub fn to_term(&self) -> Term {
        self.clone().into()
    }

    fn canonical_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        let (prefix, body, suffix): (&'static [u8], &str, &'static [u8]) = match self {
            Identifier::NamedNode(node) => (b"<", node.as_str(), b">"),
            Identifier::BlankNode(node) => (b"_:", node.as_str(), b""),
        };
        prefix
            .iter()
            .copied()
            .chain(body.bytes())
            .chain(suffix.iter().copied())
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical_bytes().cmp(other.canonical_bytes())
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::NamedNode(node) => node.fmt(f),
            Identifier::BlankNode(node) => node.fmt(f),
        }
    }
}

impl FromStr for Identifier {
    type Err = TermError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ntriples::parse_identifier(s).ok_or_else(|| TermError::MalformedIdentifier(s.to_string()))
    }
}

impl From<NamedNode> for Identifier {
    fn from(node: NamedNode) -> Self {
        Identifier::NamedNode(node)
    }
}

impl From<BlankNode> for Identifier {
    fn from(node: BlankNode) -> Self {
        Identifier::BlankNode(node)
    }
}

impl TryFrom<Term> for Identifier {
    type Error = Term;

    fn try_from(term: Term) -> Result<Self, Self::Error> {
        match term {
            Term::NamedNode(node) => Ok(Identifier::NamedNode(node)),
            Term::BlankNode(node) => Ok(Identifier::BlankNode(node)),
            literal @ Term::Literal(_) => Err(literal),
        }
    }
}
