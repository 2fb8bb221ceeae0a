/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use shared::terms::{BlankNode, Identifier, NamedNode, Term};
use shared::TermError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the engine reports. A single error aborts a whole query.
#[derive(Debug, Error)]
pub enum Error {
    /// Term kind or shape does not match what a coercion expected
    #[error("expected {expected} at {subject} {predicate}, found {actual}")]
    MistypedValue {
        expected: String,
        actual: Term,
        predicate: NamedNode,
        subject: Identifier,
    },

    #[error("missing value for {predicate} on {subject}")]
    MissingValue {
        predicate: NamedNode,
        subject: Identifier,
    },

    /// Broken rdf:first/rdf:rest structure
    #[error("malformed RDF list at {node}: {reason}")]
    MalformedList { node: Identifier, reason: String },

    /// A triple-pattern query hit a literal where an identifier was required
    #[error("expected an identifier for {predicate}, found {term}")]
    NonIdentifierTerm { term: Term, predicate: NamedNode },

    #[error("{subject} is not an instance of {expected} (asserted type: {})", asserted(.actual))]
    UnexpectedType {
        subject: Identifier,
        expected: String,
        actual: Option<NamedNode>,
    },

    #[error(transparent)]
    MalformedIdentifier(#[from] TermError),

    /// Type-specific failure reported by a decoder
    #[error("failed to decode {type_name} from {subject}: {message}")]
    Decode {
        type_name: String,
        subject: Identifier,
        message: String,
    },

    #[error("{type_name} has no field '{field}'")]
    UnknownField { type_name: String, field: String },

    /// Filter that the SPARQL backend cannot express exactly
    #[error("filter on '{field}' cannot be compiled to SPARQL: {reason}")]
    UnsupportedFilter { field: String, reason: String },

    #[error("invalid query document: {0}")]
    InvalidQuery(#[from] serde_json::Error),

    /// Transport or store failure from a remote SPARQL endpoint
    #[error("remote store error: {0}")]
    Remote(String),

    /// Blank node used as a constant in a query sent to a remote store
    #[error("blank node {0} cannot be sent to a remote store as a constant")]
    BlankNodeConstant(BlankNode),
}

fn asserted(actual: &Option<NamedNode>) -> String {
    match actual {
        Some(node) => node.to_string(),
        None => "none".to_string(),
    }
}

impl Error {
    pub fn decode(type_name: impl Into<String>, subject: &Identifier, message: impl Into<String>) -> Self {
        Error::Decode {
            type_name: type_name.into(),
            subject: subject.clone(),
            message: message.into(),
        }
    }
}
