/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Graph-pattern compilation for remote SPARQL stores.

pub mod compiler;
mod display;
pub mod expression;
pub mod optimizer;
pub mod pattern;

pub use compiler::{ConstructQuery, PatternCompiler, SelectQuery};
pub use expression::{ComparisonOperator, Expression, Function};
pub use optimizer::optimize;
pub use pattern::{GraphPattern, PredicatePattern, TermPattern, TriplePattern, Variable};
