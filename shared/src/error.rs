/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use thiserror::Error;

/// Errors raised while constructing terms from caller-supplied text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermError {
    /// Neither `<iri>` nor `_:label`
    #[error("malformed identifier '{0}': expected <iri> or _:label")]
    MalformedIdentifier(String),

    #[error("malformed IRI '{0}'")]
    MalformedIri(String),

    #[error("malformed blank node label '{0}'")]
    MalformedBlankNode(String),

    /// N-Triples document that could not be parsed
    #[error("syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },
}
