/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::dictionary::Dictionary;
use crate::error::TermError;
use crate::index_manager::{EncodedTriple, UnifiedIndex};
use crate::ntriples;
use crate::terms::{BlankNode, Identifier, NamedNode, Term};
use crate::triple::Triple;
use crate::vocab::{rdf_first, rdf_nil, rdf_rest};

/// An unordered collection of triples, matchable by pattern.
///
/// Match results come back in no particular order; callers that need a
/// stable order sort them.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    dictionary: Dictionary,
    index: UnifiedIndex,
    next_blank: u64,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns the terms, then builds the permutation indexes in parallel.
    pub fn from_triples<I>(triples: I) -> Self
    where
        I: IntoIterator<Item = Triple>,
    {
        let mut dictionary = Dictionary::new();
        let encoded: Vec<EncodedTriple> = triples
            .into_iter()
            .map(|triple| EncodedTriple {
                subject: dictionary.encode_identifier(&triple.subject),
                predicate: dictionary.encode(&Term::NamedNode(triple.predicate)),
                object: dictionary.encode(&triple.object),
            })
            .collect();
        let mut index = UnifiedIndex::new();
        index.build_from_triples(&encoded);
        Self {
            dictionary,
            index,
            next_blank: 0,
        }
    }

    pub fn parse_ntriples(document: &str) -> Result<Self, TermError> {
        Ok(Self::from_triples(ntriples::parse_ntriples(document)?))
    }

    pub fn insert(&mut self, triple: &Triple) -> bool {
        let encoded = EncodedTriple {
            subject: self.dictionary.encode_identifier(&triple.subject),
            predicate: self.dictionary.encode(&Term::NamedNode(triple.predicate.clone())),
            object: self.dictionary.encode(&triple.object),
        };
        self.index.insert(&encoded)
    }

    pub fn remove(&mut self, triple: &Triple) -> bool {
        match self.encode_existing(triple) {
            Some(encoded) => self.index.delete(&encoded),
            None => false,
        }
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.encode_existing(triple)
            .map_or(false, |encoded| self.index.contains(&encoded))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Triple> + '_ {
        self.match_pattern(None, None, None)
    }

    /// Triples matching the pattern; `None` positions are wildcards.
    pub fn match_pattern(
        &self,
        subject: Option<&Identifier>,
        predicate: Option<&NamedNode>,
        object: Option<&Term>,
    ) -> impl Iterator<Item = Triple> + '_ {
        let encoded = self.encode_pattern(subject, predicate, object);
        let matches = match encoded {
            // a bound term the dictionary has never seen matches nothing
            Some((s, p, o)) => self.index.query(s, p, o),
            None => Vec::new(),
        };
        matches.into_iter().filter_map(move |t| {
            self.dictionary
                .decode_triple(t.subject, t.predicate, t.object)
        })
    }

    /// Returns a blank node label not yet used in this dataset.
    pub fn fresh_blank_node(&mut self) -> BlankNode {
        loop {
            let candidate = BlankNode::new_unchecked(format!("l{}", self.next_blank));
            self.next_blank += 1;
            if self.dictionary.lookup(&Term::BlankNode(candidate.clone())).is_none() {
                return candidate;
            }
        }
    }

    /// Writes `items` as an RDF list and returns its head (`rdf:nil` when empty).
    ///
    /// The list is built back to front, each step threading the tail
    /// produced by the previous one.
    pub fn insert_list(&mut self, items: Vec<Term>) -> Identifier {
        let nil = Identifier::NamedNode(rdf_nil());
        items.into_iter().rev().fold(nil, |tail, item| {
            let node = Identifier::BlankNode(self.fresh_blank_node());
            self.insert(&Triple::new(node.clone(), rdf_first(), item));
            self.insert(&Triple::new(node.clone(), rdf_rest(), tail));
            node
        })
    }

    fn encode_existing(&self, triple: &Triple) -> Option<EncodedTriple> {
        let (s, p, o) = self.encode_pattern(
            Some(&triple.subject),
            Some(&triple.predicate),
            Some(&triple.object),
        )?;
        Some(EncodedTriple {
            subject: s?,
            predicate: p?,
            object: o?,
        })
    }

    #[allow(clippy::type_complexity)]
    fn encode_pattern(
        &self,
        subject: Option<&Identifier>,
        predicate: Option<&NamedNode>,
        object: Option<&Term>,
    ) -> Option<(Option<u32>, Option<u32>, Option<u32>)> {
        let s = match subject {
            Some(id) => Some(self.dictionary.lookup(&id.to_term())?),
            None => None,
        };
        let p = match predicate {
            Some(node) => Some(self.dictionary.lookup(&Term::NamedNode(node.clone()))?),
            None => None,
        };
        let o = match object {
            Some(term) => Some(self.dictionary.lookup(term)?),
            None => None,
        };
        Some((s, p, o))
    }
}

impl FromIterator<Triple> for Dataset {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self::from_triples(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terms::Literal;

    fn ex(local: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{}", local))
    }

    fn sample() -> Dataset {
        Dataset::from_triples(vec![
            Triple::new(ex("a"), ex("p"), Literal::simple("x")),
            Triple::new(ex("a"), ex("p"), Literal::simple("y")),
            Triple::new(ex("b"), ex("p"), ex("a")),
            Triple::new(BlankNode::new_unchecked("n"), ex("q"), ex("a")),
        ])
    }

    #[test]
    fn test_match_with_wildcards() {
        let dataset = sample();
        let a = Identifier::NamedNode(ex("a"));
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.match_pattern(Some(&a), Some(&ex("p")), None).count(), 2);
        assert_eq!(dataset.match_pattern(None, None, Some(&a.to_term())).count(), 2);
        assert_eq!(dataset.match_pattern(None, Some(&ex("p")), None).count(), 3);
        assert_eq!(dataset.iter().count(), 4);
    }

    #[test]
    fn test_unknown_term_matches_nothing() {
        let dataset = sample();
        assert_eq!(dataset.match_pattern(None, Some(&ex("missing")), None).count(), 0);
        assert!(!dataset.contains(&Triple::new(ex("zz"), ex("p"), Literal::simple("x"))));
    }

    #[test]
    fn test_duplicate_insert_is_collapsed() {
        let mut dataset = sample();
        let triple = Triple::new(ex("a"), ex("p"), Literal::simple("x"));
        assert!(!dataset.insert(&triple));
        assert!(dataset.remove(&triple));
        assert_eq!(dataset.len(), 3);
    }

    #[test]
    fn test_insert_list_builds_linked_cells() {
        let mut dataset = Dataset::new();
        let head = dataset.insert_list(vec![
            Literal::simple("1").into(),
            Literal::simple("2").into(),
        ]);
        assert!(!head.is_named_node());
        assert_eq!(dataset.len(), 4);
        let rest: Vec<Triple> = dataset
            .match_pattern(Some(&head), Some(&rdf_rest()), None)
            .collect();
        assert_eq!(rest.len(), 1);
        let second = rest[0].object.to_identifier().unwrap();
        let end: Vec<Triple> = dataset
            .match_pattern(Some(&second), Some(&rdf_rest()), None)
            .collect();
        assert_eq!(end[0].object, Term::NamedNode(rdf_nil()));

        assert_eq!(dataset.insert_list(Vec::new()), Identifier::NamedNode(rdf_nil()));
    }
}
