/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::error::Result;
use crate::filter::{Filter, ObjectFilter};
use serde::{Deserialize, Serialize};
use shared::terms::{Identifier, IdentifierKind, NamedNode, Term, TermKind};
use std::fmt;

/// Selection strategy of a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WhereClause {
    /// Exactly these resources, in this order
    Identifiers(Vec<Identifier>),
    /// Objects of `predicate`, optionally from one subject
    #[serde(rename_all = "camelCase")]
    TripleObjects {
        predicate: NamedNode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subject: Option<Identifier>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        object_kinds: Option<Vec<TermKind>>,
    },
    /// Subjects of `predicate`, optionally towards one object
    #[serde(rename_all = "camelCase")]
    TripleSubjects {
        predicate: NamedNode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        object: Option<Term>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subject_kinds: Option<Vec<IdentifierKind>>,
    },
    /// Every resource asserting one of the object types' discriminators
    #[serde(rename_all = "camelCase")]
    ByType {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        identifier_kind: Option<IdentifierKind>,
    },
}

impl Default for WhereClause {
    fn default() -> Self {
        WhereClause::ByType {
            identifier_kind: None,
        }
    }
}

impl fmt::Display for WhereClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WhereClause::Identifiers(identifiers) => write!(f, "identifiers({})", identifiers.len()),
            WhereClause::TripleObjects { predicate, .. } => write!(f, "triple-objects({})", predicate),
            WhereClause::TripleSubjects { predicate, .. } => write!(f, "triple-subjects({})", predicate),
            WhereClause::ByType { .. } => f.write_str("by-type"),
        }
    }
}

/// A declarative object query.
///
/// `limit` and `offset` are signed on purpose: a negative offset clamps to
/// zero and a non-positive limit yields no results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(rename = "where", default)]
    pub where_clause: WhereClause,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<ObjectFilter>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> QueryBuilder {
        QueryBuilder::default()
    }

    pub fn from_json(document: &str) -> Result<Self> {
        Ok(serde_json::from_str(document)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Offset clamped to zero.
    pub fn effective_offset(&self) -> usize {
        self.offset.map_or(0, |offset| offset.max(0) as usize)
    }

    /// `Some(0)` when the limit rules out every result.
    pub fn effective_limit(&self) -> Option<usize> {
        self.limit.map(|limit| limit.max(0) as usize)
    }

    /// A non-empty filter, if any.
    pub fn active_filter(&self) -> Option<&ObjectFilter> {
        self.filter.as_ref().filter(|filter| !filter.is_empty())
    }
}

/// Fluent construction of a [`Query`].
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, n: i64) -> Self {
        self.query.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: i64) -> Self {
        self.query.offset = Some(n);
        self
    }

    pub fn with_identifiers<I>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = Identifier>,
    {
        self.query.where_clause = WhereClause::Identifiers(identifiers.into_iter().collect());
        self
    }

    pub fn with_objects_of(mut self, predicate: NamedNode, subject: Option<Identifier>) -> Self {
        self.query.where_clause = WhereClause::TripleObjects {
            predicate,
            subject,
            object_kinds: None,
        };
        self
    }

    pub fn with_subjects_of(mut self, predicate: NamedNode, object: Option<Term>) -> Self {
        self.query.where_clause = WhereClause::TripleSubjects {
            predicate,
            object,
            subject_kinds: None,
        };
        self
    }

    pub fn by_type(mut self, identifier_kind: Option<IdentifierKind>) -> Self {
        self.query.where_clause = WhereClause::ByType { identifier_kind };
        self
    }

    pub fn where_clause(mut self, where_clause: WhereClause) -> Self {
        self.query.where_clause = where_clause;
        self
    }

    pub fn filter(mut self, filter: ObjectFilter) -> Self {
        self.query.filter = Some(filter);
        self
    }

    /// Adds one field constraint to the query's filter.
    pub fn filter_field(mut self, name: impl Into<String>, filter: Filter) -> Self {
        let object_filter = self.query.filter.take().unwrap_or_default();
        self.query.filter = Some(object_filter.with_field(name, filter));
        self
    }

    pub fn build(self) -> Query {
        self.query
    }
}
