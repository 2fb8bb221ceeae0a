/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Typed object queries over RDF.
//!
//! Queries resolve either against an in-memory [`shared::Dataset`]
//! ([`DatasetObjectSet`]) or, compiled to SPARQL, against a remote store
//! ([`RemoteObjectSet`]). Both return objects decoded by caller-supplied
//! [`ObjectType`]s in a deterministic, paginated order.

pub mod error;
pub mod filter;
pub mod object_type;
pub mod query;
pub mod remote;
pub mod resolver;
pub mod resource;
pub mod sparql;

pub use error::{Error, Result};
pub use filter::{
    BooleanFilter, CardinalityFilter, FieldValue, Filter, Filterable, IdentifierFilter, ObjectFilter, ObjectValue,
    OptionFilter, RangeFilter, RangeValue, StringFilter, TermFilter, UnionFilter,
};
pub use object_type::{Cardinality, FieldKind, ObjectShape, ObjectType, PropertyShape, UnionVariant};
pub use query::{Query, QueryBuilder, WhereClause};
pub use remote::{RemoteObjectSet, SparqlClient};
pub use resolver::DatasetObjectSet;
pub use resource::{Resource, ResourceValue, Values};
