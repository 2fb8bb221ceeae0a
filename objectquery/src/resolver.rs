/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::error::{Error, Result};
use crate::filter::{Filterable, ObjectFilter};
use crate::object_type::ObjectType;
use crate::query::{Query, WhereClause};
use crate::resource::Resource;
use log::{debug, trace, warn};
use rustc_hash::FxHashSet;
use shared::terms::{Identifier, Term};
use shared::vocab;
use shared::Dataset;

/// Resolves queries directly against an in-memory dataset.
///
/// Candidates are gathered per where-clause, deduplicated and sorted by
/// canonical identifier form (except for explicit identifier lists, which
/// keep the caller's order), then decoded, filtered and paginated.
/// Decoding stops once the page is full.
#[derive(Debug, Clone, Copy)]
pub struct DatasetObjectSet<'a> {
    dataset: &'a Dataset,
}

impl<'a> DatasetObjectSet<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Decoded objects for `query`. Several object types make a polymorphic
    /// query: each candidate decodes as the first type that accepts it.
    pub fn resolve<T: Filterable>(&self, object_types: &[ObjectType<T>], query: &Query) -> Result<Vec<T>> {
        Ok(self
            .run(object_types, query)?
            .into_iter()
            .map(|(_, object)| object)
            .collect())
    }

    /// Identifiers of the objects `resolve` would return, in the same order.
    pub fn resolve_identifiers<T: Filterable>(
        &self,
        object_types: &[ObjectType<T>],
        query: &Query,
    ) -> Result<Vec<Identifier>> {
        Ok(self
            .run(object_types, query)?
            .into_iter()
            .map(|(identifier, _)| identifier)
            .collect())
    }

    /// Decodes a single resource.
    pub fn resolve_one<T>(&self, object_types: &[ObjectType<T>], identifier: &Identifier) -> Result<T> {
        decode_polymorphic(self.dataset, object_types, identifier)
    }

    /// Number of objects matching the where-clause and filter of `query`;
    /// its limit and offset are ignored.
    pub fn count<T: Filterable>(&self, object_types: &[ObjectType<T>], query: &Query) -> Result<usize> {
        let unpaged = Query {
            limit: None,
            offset: None,
            ..query.clone()
        };
        Ok(self.run(object_types, &unpaged)?.len())
    }

    fn run<T: Filterable>(&self, object_types: &[ObjectType<T>], query: &Query) -> Result<Vec<(Identifier, T)>> {
        let offset = query.effective_offset();
        let limit = query.effective_limit();
        debug!(
            "Resolving {} for {} object type(s), limit {:?}, offset {}",
            query.where_clause,
            object_types.len(),
            limit,
            offset
        );
        if limit == Some(0) {
            return Ok(Vec::new());
        }

        let candidates = self.candidates(object_types, &query.where_clause)?;
        debug!("{} candidate resource(s)", candidates.len());

        let filter = match query.active_filter() {
            Some(filter) => Some((filter, filterable_types(object_types, filter)?)),
            None => None,
        };
        let mut skipped = 0;
        let mut results = Vec::new();
        for identifier in candidates {
            if limit.map_or(false, |limit| results.len() >= limit) {
                break;
            }
            let (index, object) = decode_indexed(self.dataset, object_types, &identifier)?;
            if let Some((filter, filterable)) = &filter {
                if !filterable[index] || !filter.matches(&object.to_object_value()) {
                    continue;
                }
            }
            if skipped < offset {
                skipped += 1;
                continue;
            }
            results.push((identifier, object));
        }
        Ok(results)
    }

    fn candidates<T>(&self, object_types: &[ObjectType<T>], where_clause: &WhereClause) -> Result<Vec<Identifier>> {
        let mut collector = Candidates::default();
        match where_clause {
            WhereClause::Identifiers(identifiers) => return Ok(identifiers.clone()),
            WhereClause::TripleObjects {
                predicate,
                subject,
                object_kinds,
            } => {
                for triple in self.dataset.match_pattern(subject.as_ref(), Some(predicate), None) {
                    if let Some(kinds) = object_kinds {
                        if !kinds.contains(&triple.object.kind()) {
                            continue;
                        }
                    }
                    let identifier = Identifier::try_from(triple.object).map_err(|term| Error::NonIdentifierTerm {
                        term,
                        predicate: predicate.clone(),
                    })?;
                    collector.push(identifier);
                }
            }
            WhereClause::TripleSubjects {
                predicate,
                object,
                subject_kinds,
            } => {
                for triple in self.dataset.match_pattern(None, Some(predicate), object.as_ref()) {
                    if let Some(kinds) = subject_kinds {
                        if !kinds.contains(&triple.subject.kind()) {
                            continue;
                        }
                    }
                    collector.push(triple.subject);
                }
            }
            WhereClause::ByType { identifier_kind } => {
                let rdf_type = vocab::rdf_type();
                for object_type in object_types {
                    if object_type.discriminators().is_empty() {
                        warn!(
                            "Object type {} has no rdf:type discriminators; a by-type query cannot find its instances",
                            object_type.name()
                        );
                    }
                    for class in object_type.discriminators() {
                        let class = Term::NamedNode(class.clone());
                        for triple in self.dataset.match_pattern(None, Some(&rdf_type), Some(&class)) {
                            if identifier_kind.map_or(true, |kind| triple.subject.kind() == kind) {
                                collector.push(triple.subject);
                            }
                        }
                    }
                }
            }
        }
        Ok(collector.into_sorted())
    }
}

/// Deduplicating accumulator for candidate identifiers.
#[derive(Default)]
struct Candidates {
    seen: FxHashSet<Identifier>,
    ordered: Vec<Identifier>,
}

impl Candidates {
    fn push(&mut self, identifier: Identifier) {
        if self.seen.insert(identifier.clone()) {
            self.ordered.push(identifier);
        }
    }

    fn into_sorted(mut self) -> Vec<Identifier> {
        self.ordered.sort();
        self.ordered
    }
}

/// Which object types declare every field `filter` names. Objects decoded
/// by any other type never match. A single type, or a query where no type
/// qualifies, fails with the first `UnknownField`, as the pattern compiler
/// does.
fn filterable_types<T>(object_types: &[ObjectType<T>], filter: &ObjectFilter) -> Result<Vec<bool>> {
    let mut first_error = None;
    let mut filterable = Vec::with_capacity(object_types.len());
    for object_type in object_types {
        match object_type.shape().check_filter(filter) {
            Ok(()) => filterable.push(true),
            Err(error) => {
                debug!("Object type {} drops out of the filter: {}", object_type.name(), error);
                first_error.get_or_insert(error);
                filterable.push(false);
            }
        }
    }
    match first_error {
        Some(error) if !filterable.contains(&true) => Err(error),
        _ => Ok(filterable),
    }
}

/// Tries each object type in declared order; the first success wins. When
/// every type fails, the first type's error is reported.
pub(crate) fn decode_polymorphic<T>(
    dataset: &Dataset,
    object_types: &[ObjectType<T>],
    identifier: &Identifier,
) -> Result<T> {
    decode_indexed(dataset, object_types, identifier).map(|(_, object)| object)
}

/// Like `decode_polymorphic`, also reporting which type decoded the object.
fn decode_indexed<T>(
    dataset: &Dataset,
    object_types: &[ObjectType<T>],
    identifier: &Identifier,
) -> Result<(usize, T)> {
    let resource = Resource::new(dataset, identifier.clone());
    let mut first_error = None;
    for (index, object_type) in object_types.iter().enumerate() {
        match object_type.decode_resource(&resource) {
            Ok(object) => return Ok((index, object)),
            Err(error) if first_error.is_none() => {
                trace!("{} is not a {}: {}", identifier, object_type.name(), error);
                first_error = Some(error);
            }
            Err(error) => {
                debug!("{} is not a {} either: {}", identifier, object_type.name(), error);
            }
        }
    }
    Err(first_error.unwrap_or_else(|| Error::decode("object", identifier, "no object types to decode with")))
}
