/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Read-only views of a dataset rooted at one subject.

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rustc_hash::FxHashSet;
use shared::terms::{Identifier, Literal, NamedNode, Term};
use shared::vocab::{self, xsd};
use shared::Dataset;

/// A subject in a dataset. Borrowing the dataset makes every access pure.
#[derive(Debug, Clone)]
pub struct Resource<'a> {
    dataset: &'a Dataset,
    identifier: Identifier,
}

impl<'a> Resource<'a> {
    pub fn new(dataset: &'a Dataset, identifier: Identifier) -> Self {
        Self {
            dataset,
            identifier,
        }
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// All values of `predicate`. `unique` only records that the caller
    /// expects at most one value; several values are still returned.
    pub fn values(&self, predicate: &NamedNode, unique: bool) -> Values<'a> {
        let mut terms: Vec<Term> = self
            .dataset
            .match_pattern(Some(&self.identifier), Some(predicate), None)
            .map(|triple| triple.object)
            .collect();
        // stable order over an unordered store
        terms.sort_by_cached_key(|term| term.to_string());
        Values {
            dataset: self.dataset,
            subject: self.identifier.clone(),
            predicate: predicate.clone(),
            terms,
            unique,
        }
    }

    /// Shorthand for the first of the unique values of `predicate`.
    pub fn value(&self, predicate: &NamedNode) -> Result<ResourceValue<'a>> {
        self.values(predicate, true).head()
    }

    /// Asserted `rdf:type` values, sorted.
    pub fn types(&self) -> Vec<NamedNode> {
        self.values(&vocab::rdf_type(), false)
            .terms
            .into_iter()
            .filter_map(|term| match term {
                Term::NamedNode(node) => Some(node),
                _ => None,
            })
            .collect()
    }

    pub fn is_instance_of(&self, class: &NamedNode) -> bool {
        let class = Term::NamedNode(class.clone());
        self.dataset
            .match_pattern(Some(&self.identifier), Some(&vocab::rdf_type()), Some(&class))
            .next()
            .is_some()
    }
}

/// The values of one predicate on one subject.
#[derive(Debug, Clone)]
pub struct Values<'a> {
    dataset: &'a Dataset,
    subject: Identifier,
    predicate: NamedNode,
    terms: Vec<Term>,
    unique: bool,
}

impl<'a> Values<'a> {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn iter(&self) -> impl Iterator<Item = ResourceValue<'a>> + '_ {
        self.terms.iter().map(move |term| self.wrap(term.clone()))
    }

    pub fn head(&self) -> Result<ResourceValue<'a>> {
        self.optional_head().ok_or_else(|| Error::MissingValue {
            predicate: self.predicate.clone(),
            subject: self.subject.clone(),
        })
    }

    pub fn optional_head(&self) -> Option<ResourceValue<'a>> {
        self.terms.first().map(|term| self.wrap(term.clone()))
    }

    /// Applies a coercion to every value, failing on the first mismatch.
    pub fn map<T, F>(&self, f: F) -> Result<Vec<T>>
    where
        F: Fn(ResourceValue<'a>) -> Result<T>,
    {
        self.iter().map(f).collect()
    }

    fn wrap(&self, term: Term) -> ResourceValue<'a> {
        ResourceValue {
            dataset: self.dataset,
            subject: self.subject.clone(),
            predicate: self.predicate.clone(),
            term,
        }
    }
}

/// One term reached from a subject through a predicate.
#[derive(Debug, Clone)]
pub struct ResourceValue<'a> {
    dataset: &'a Dataset,
    subject: Identifier,
    predicate: NamedNode,
    term: Term,
}

impl<'a> ResourceValue<'a> {
    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn into_term(self) -> Term {
        self.term
    }

    pub fn predicate(&self) -> &NamedNode {
        &self.predicate
    }

    pub fn subject(&self) -> &Identifier {
        &self.subject
    }

    fn mistyped(&self, expected: &str) -> Error {
        Error::MistypedValue {
            expected: expected.to_string(),
            actual: self.term.clone(),
            predicate: self.predicate.clone(),
            subject: self.subject.clone(),
        }
    }

    pub fn as_iri(&self) -> Result<NamedNode> {
        match &self.term {
            Term::NamedNode(node) => Ok(node.clone()),
            _ => Err(self.mistyped("IRI")),
        }
    }

    pub fn as_identifier(&self) -> Result<Identifier> {
        self.term
            .to_identifier()
            .ok_or_else(|| self.mistyped("identifier"))
    }

    pub fn as_literal(&self) -> Result<Literal> {
        match &self.term {
            Term::Literal(literal) => Ok(literal.clone()),
            _ => Err(self.mistyped("literal")),
        }
    }

    /// Lexical form of any literal.
    pub fn as_string(&self) -> Result<String> {
        self.as_literal().map(|literal| literal.lexical().to_string())
    }

    pub fn as_number(&self) -> Result<f64> {
        match &self.term {
            Term::Literal(literal) if vocab::is_numeric_datatype(literal.datatype()) => literal
                .lexical()
                .trim()
                .parse::<f64>()
                .map_err(|_| self.mistyped("number")),
            _ => Err(self.mistyped("number")),
        }
    }

    pub fn as_integer(&self) -> Result<i64> {
        match &self.term {
            Term::Literal(literal) if vocab::is_numeric_datatype(literal.datatype()) => literal
                .lexical()
                .trim()
                .parse::<i64>()
                .map_err(|_| self.mistyped("integer")),
            _ => Err(self.mistyped("integer")),
        }
    }

    pub fn as_boolean(&self) -> Result<bool> {
        match &self.term {
            Term::Literal(literal) if literal.datatype().as_str() == xsd::BOOLEAN => {
                match literal.lexical().trim() {
                    "true" | "1" => Ok(true),
                    "false" | "0" => Ok(false),
                    _ => Err(self.mistyped("boolean")),
                }
            }
            _ => Err(self.mistyped("boolean")),
        }
    }

    pub fn as_date(&self) -> Result<NaiveDate> {
        match &self.term {
            Term::Literal(literal) if literal.datatype().as_str() == xsd::DATE => {
                NaiveDate::parse_from_str(literal.lexical().trim(), "%Y-%m-%d")
                    .map_err(|_| self.mistyped("xsd:date"))
            }
            _ => Err(self.mistyped("xsd:date")),
        }
    }

    pub fn as_date_time(&self) -> Result<DateTime<FixedOffset>> {
        match &self.term {
            Term::Literal(literal) if literal.datatype().as_str() == xsd::DATE_TIME => {
                DateTime::parse_from_rfc3339(literal.lexical().trim())
                    .map_err(|_| self.mistyped("xsd:dateTime"))
            }
            _ => Err(self.mistyped("xsd:dateTime")),
        }
    }

    /// Nested view for decoding an object-valued property.
    pub fn as_resource(&self) -> Result<Resource<'a>> {
        Ok(Resource::new(self.dataset, self.as_identifier()?))
    }

    /// Walks an `rdf:first`/`rdf:rest` chain into its items, in list order.
    pub fn as_list(&self) -> Result<Vec<ResourceValue<'a>>> {
        let nil = Identifier::NamedNode(vocab::rdf_nil());
        let mut node = self.as_identifier()?;
        let mut visited = FxHashSet::default();
        let mut items = Vec::new();

        while node != nil {
            if !visited.insert(node.clone()) {
                return Err(malformed(&node, "list does not terminate in rdf:nil"));
            }
            let cell = Resource::new(self.dataset, node.clone());
            let first = single(&cell, &vocab::rdf_first())?;
            let rest = single(&cell, &vocab::rdf_rest())?;
            let next = rest
                .to_identifier()
                .ok_or_else(|| malformed(&node, "rdf:rest is a literal"))?;
            items.push(ResourceValue {
                dataset: self.dataset,
                subject: node,
                predicate: vocab::rdf_first(),
                term: first,
            });
            node = next;
        }
        Ok(items)
    }
}

fn malformed(node: &Identifier, reason: &str) -> Error {
    Error::MalformedList {
        node: node.clone(),
        reason: reason.to_string(),
    }
}

// Exactly one value of `predicate` on a list cell
fn single(cell: &Resource<'_>, predicate: &NamedNode) -> Result<Term> {
    let values = cell.values(predicate, true);
    match values.terms() {
        [term] => Ok(term.clone()),
        [] => Err(malformed(cell.identifier(), &format!("missing {}", predicate))),
        _ => Err(malformed(cell.identifier(), &format!("several values for {}", predicate))),
    }
}
