/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Structural rewrites over WHERE-clause fragments.
//!
//! The pass is bottom-up: nested lists are rewritten before their parent
//! sees them. Inside every list, groups are spliced into the parent, union
//! branches are deduplicated (a lone remaining branch is spliced too) and
//! adjacent basic graph patterns are merged. The top-level list is then
//! reordered as `VALUES`, other fragments, `FILTER`, deduplicated, and
//! seeded with a single empty solution when it consists of left joins only.
//!
//! Applying [`optimize`] to its own output returns that output unchanged.

use super::pattern::GraphPattern;
use rustc_hash::FxHashSet;

pub fn optimize(patterns: Vec<GraphPattern>) -> Vec<GraphPattern> {
    let rewritten = rewrite_list(patterns);

    let (values, rest): (Vec<_>, Vec<_>) = rewritten.into_iter().partition(GraphPattern::is_values);
    let (filters, others): (Vec<_>, Vec<_>) = rest.into_iter().partition(GraphPattern::is_filter);
    let mut ordered: Vec<GraphPattern> = values.into_iter().chain(others).chain(filters).collect();

    // removing a duplicate can make two triple blocks adjacent, and merging
    // them can create a new duplicate
    loop {
        let next = coalesce(deduplicate(ordered.clone()));
        if next == ordered {
            break;
        }
        ordered = next;
    }

    if !ordered.is_empty() && ordered.iter().all(GraphPattern::is_optional) {
        ordered.insert(0, GraphPattern::seed());
    }
    ordered
}

/// Recursive part of the pass, applied to every nested list.
fn rewrite_list(patterns: Vec<GraphPattern>) -> Vec<GraphPattern> {
    let mut out = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        match pattern {
            GraphPattern::Optional(inner) => out.push(GraphPattern::Optional(rewrite_list(inner))),
            GraphPattern::Minus(inner) => out.push(GraphPattern::Minus(rewrite_list(inner))),
            GraphPattern::Graph { name, patterns } => out.push(GraphPattern::Graph {
                name,
                patterns: rewrite_list(patterns),
            }),
            GraphPattern::Service {
                name,
                silent,
                patterns,
            } => out.push(GraphPattern::Service {
                name,
                silent,
                patterns: rewrite_list(patterns),
            }),
            GraphPattern::Group(inner) => {
                for nested in rewrite_list(inner) {
                    push_coalescing(&mut out, nested);
                }
            }
            GraphPattern::Union(branches) => {
                let mut branches = deduplicate(branches.into_iter().map(rewrite_list).collect());
                if branches.len() == 1 {
                    for nested in branches.remove(0) {
                        push_coalescing(&mut out, nested);
                    }
                } else {
                    out.push(GraphPattern::Union(branches));
                }
            }
            other => push_coalescing(&mut out, other),
        }
    }
    out
}

fn push_coalescing(out: &mut Vec<GraphPattern>, pattern: GraphPattern) {
    match pattern {
        GraphPattern::Bgp(triples) => {
            if let Some(GraphPattern::Bgp(previous)) = out.last_mut() {
                previous.extend(triples);
            } else {
                out.push(GraphPattern::Bgp(triples));
            }
        }
        other => out.push(other),
    }
}

fn coalesce(patterns: Vec<GraphPattern>) -> Vec<GraphPattern> {
    let mut out = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        push_coalescing(&mut out, pattern);
    }
    out
}

/// Keeps the first occurrence of every structurally equal item.
fn deduplicate<T: Clone + Eq + std::hash::Hash>(items: Vec<T>) -> Vec<T> {
    let mut seen = FxHashSet::default();
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}
