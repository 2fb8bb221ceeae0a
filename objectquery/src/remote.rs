/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Query resolution against a remote SPARQL store.

use crate::error::Result;
use crate::filter::Filterable;
use crate::object_type::{ObjectShape, ObjectType};
use crate::query::{Query, WhereClause};
use crate::resolver::DatasetObjectSet;
use crate::sparql::{ConstructQuery, PatternCompiler, SelectQuery};
use async_trait::async_trait;
use log::debug;
use rustc_hash::FxHashSet;
use shared::terms::Identifier;
use shared::{Dataset, Triple};

/// Transport to a SPARQL endpoint.
///
/// Implementations own serialization and I/O; the queries render to SPARQL
/// text through `Display`. A failed request is reported once, as
/// [`crate::Error::Remote`] or any other error kind, and never retried here.
#[async_trait]
pub trait SparqlClient: Send + Sync {
    /// Bindings of the selected variable, in solution order.
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Identifier>>;

    async fn construct(&self, query: &ConstructQuery) -> Result<Vec<Triple>>;
}

/// Remote counterpart of [`DatasetObjectSet`].
///
/// A query costs two round trips: a SELECT picks the page of identifiers,
/// then a CONSTRUCT fetches their triples, which decode through the
/// in-memory resolver.
///
/// Only IRIs address remote resources. A query naming a blank node, or a
/// page containing one, fails with [`crate::Error::BlankNodeConstant`];
/// restrict by-type queries to `IdentifierKind::NamedNode` on stores with
/// blank-node instances. `resolve_identifiers` pages follow SPARQL order,
/// which puts blank nodes before IRIs, unlike the canonical order of
/// [`DatasetObjectSet`].
pub struct RemoteObjectSet<C> {
    client: C,
    compiler: PatternCompiler,
}

impl<C: SparqlClient> RemoteObjectSet<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            compiler: PatternCompiler::new(),
        }
    }

    pub fn with_subject_variable(mut self, name: impl Into<String>) -> Self {
        self.compiler = self.compiler.with_subject_variable(name);
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn resolve<T: Filterable>(&self, object_types: &[ObjectType<T>], query: &Query) -> Result<Vec<T>> {
        let identifiers = self.resolve_identifiers(object_types, query).await?;
        if identifiers.is_empty() {
            return Ok(Vec::new());
        }

        let construct = self.compiler.construct_query(&shapes(object_types), &identifiers)?;
        debug!("Remote construct: {}", construct);
        let dataset = Dataset::from_triples(self.client.construct(&construct).await?);
        debug!("Fetched {} triple(s) for {} object(s)", dataset.len(), identifiers.len());

        let page = Query {
            where_clause: WhereClause::Identifiers(identifiers),
            ..Query::default()
        };
        DatasetObjectSet::new(&dataset).resolve(object_types, &page)
    }

    /// Identifiers of the requested page, without fetching the objects.
    pub async fn resolve_identifiers<T>(&self, object_types: &[ObjectType<T>], query: &Query) -> Result<Vec<Identifier>> {
        let limit = query.effective_limit();
        if limit == Some(0) {
            return Ok(Vec::new());
        }

        let select = self.compiler.select_query(&shapes(object_types), query)?;
        debug!("Remote select: {}", select);
        let selected = self.client.select(&select).await?;

        match &query.where_clause {
            // the store does not preserve VALUES order, so page here
            WhereClause::Identifiers(requested) => {
                let matched: FxHashSet<&Identifier> = selected.iter().collect();
                Ok(requested
                    .iter()
                    .filter(|identifier| matched.contains(identifier))
                    .skip(query.effective_offset())
                    .take(limit.unwrap_or(usize::MAX))
                    .cloned()
                    .collect())
            }
            _ => Ok(selected),
        }
    }

    /// Matching objects, ignoring the query's limit and offset.
    pub async fn count<T>(&self, object_types: &[ObjectType<T>], query: &Query) -> Result<usize> {
        let unpaged = Query {
            limit: None,
            offset: None,
            ..query.clone()
        };
        Ok(self.resolve_identifiers(object_types, &unpaged).await?.len())
    }
}

fn shapes<T>(object_types: &[ObjectType<T>]) -> Vec<&ObjectShape> {
    object_types.iter().map(|object_type| object_type.shape().as_ref()).collect()
}
