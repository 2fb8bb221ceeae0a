/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

pub mod dataset;
pub mod dictionary;
pub mod error;
pub mod index_manager;
pub mod ntriples;
pub mod terms;
pub mod triple;
pub mod vocab;

pub use dataset::Dataset;
pub use error::TermError;
pub use terms::{BlankNode, Identifier, IdentifierKind, Literal, NamedNode, Term, TermKind};
pub use triple::Triple;
