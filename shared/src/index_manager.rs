/*
 * Copyright © 2024 Volodymyr Kadzhaia
 * Copyright © 2024 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

/// A triple whose positions are dictionary ids.
#[derive(PartialEq, Debug, Clone, Copy, Eq, PartialOrd, Ord, Hash)]
pub struct EncodedTriple {
    pub subject: u32,
    pub predicate: u32,
    pub object: u32,
}

type Permutation = FxHashMap<u32, FxHashMap<u32, FxHashSet<u32>>>;

/// Three permutation indexes, enough to answer every bound/unbound
/// combination of a triple pattern with one lookup path.
#[derive(Debug, Clone, Default)]
pub struct UnifiedIndex {
    pub spo: Permutation,
    pub pos: Permutation,
    pub osp: Permutation,
}

impl UnifiedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a single triple into all indexes; false if already stored
    pub fn insert(&mut self, triple: &EncodedTriple) -> bool {
        let EncodedTriple { subject: s, predicate: p, object: o } = *triple;
        if self.contains(triple) {
            return false;
        }
        self.spo.entry(s).or_default().entry(p).or_default().insert(o);
        self.pos.entry(p).or_default().entry(o).or_default().insert(s);
        self.osp.entry(o).or_default().entry(s).or_default().insert(p);
        true
    }

    /// Delete a single triple from all indexes
    pub fn delete(&mut self, triple: &EncodedTriple) -> bool {
        if !self.contains(triple) {
            return false;
        }
        let EncodedTriple { subject: s, predicate: p, object: o } = *triple;
        remove_from_index(&mut self.spo, s, p, o);
        remove_from_index(&mut self.pos, p, o, s);
        remove_from_index(&mut self.osp, o, s, p);
        true
    }

    pub fn contains(&self, triple: &EncodedTriple) -> bool {
        self.spo
            .get(&triple.subject)
            .and_then(|pred_map| pred_map.get(&triple.predicate))
            .map_or(false, |objects| objects.contains(&triple.object))
    }

    /// Bulk-build the index from a list of triples
    pub fn build_from_triples(&mut self, triples: &[EncodedTriple]) {
        self.clear();
        if triples.is_empty() {
            return;
        }

        // Build partial indexes in parallel, then merge sequentially
        let num_threads = rayon::current_num_threads();
        let chunk_size = (triples.len() / num_threads).max(10_000);

        let partial_indexes: Vec<UnifiedIndex> = triples
            .par_chunks(chunk_size)
            .map(|chunk| {
                let mut local_index = UnifiedIndex::new();
                for triple in chunk {
                    local_index.insert(triple);
                }
                local_index
            })
            .collect();

        for partial_index in partial_indexes {
            self.merge_from(partial_index);
        }
    }

    /// Query the index
    pub fn query(&self, s: Option<u32>, p: Option<u32>, o: Option<u32>) -> Vec<EncodedTriple> {
        let mut results = Vec::new();
        let mut push = |subject, predicate, object| {
            results.push(EncodedTriple { subject, predicate, object });
        };

        match (s, p, o) {
            // Fully bound
            (Some(ss), Some(pp), Some(oo)) => {
                let triple = EncodedTriple { subject: ss, predicate: pp, object: oo };
                if self.contains(&triple) {
                    push(ss, pp, oo);
                }
            }
            // (S, P, -)
            (Some(ss), Some(pp), None) => {
                if let Some(objects) = self.spo.get(&ss).and_then(|m| m.get(&pp)) {
                    for &obj in objects {
                        push(ss, pp, obj);
                    }
                }
            }
            // (S, -, O)
            (Some(ss), None, Some(oo)) => {
                if let Some(predicates) = self.osp.get(&oo).and_then(|m| m.get(&ss)) {
                    for &pred in predicates {
                        push(ss, pred, oo);
                    }
                }
            }
            // (-, P, O)
            (None, Some(pp), Some(oo)) => {
                if let Some(subjects) = self.pos.get(&pp).and_then(|m| m.get(&oo)) {
                    for &subj in subjects {
                        push(subj, pp, oo);
                    }
                }
            }
            // (S, -, -)
            (Some(ss), None, None) => {
                if let Some(pred_map) = self.spo.get(&ss) {
                    for (&pred, objects) in pred_map {
                        for &obj in objects {
                            push(ss, pred, obj);
                        }
                    }
                }
            }
            // (-, P, -)
            (None, Some(pp), None) => {
                if let Some(obj_map) = self.pos.get(&pp) {
                    for (&obj, subjects) in obj_map {
                        for &subj in subjects {
                            push(subj, pp, obj);
                        }
                    }
                }
            }
            // (-, -, O)
            (None, None, Some(oo)) => {
                if let Some(subj_map) = self.osp.get(&oo) {
                    for (&subj, predicates) in subj_map {
                        for &pred in predicates {
                            push(subj, pred, oo);
                        }
                    }
                }
            }
            // (-, -, -) => all
            (None, None, None) => {
                for (&subj, pred_map) in &self.spo {
                    for (&pred, objects) in pred_map {
                        for &obj in objects {
                            push(subj, pred, obj);
                        }
                    }
                }
            }
        }

        results
    }

    pub fn len(&self) -> usize {
        self.spo
            .values()
            .flat_map(|pred_map| pred_map.values())
            .map(|objects| objects.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.spo.is_empty()
    }

    /// Clear all data in the indexes
    pub fn clear(&mut self) {
        self.spo.clear();
        self.pos.clear();
        self.osp.clear();
    }

    /// Merge another index into this one
    pub fn merge_from(&mut self, other: UnifiedIndex) {
        merge_permutation(&mut self.spo, other.spo);
        merge_permutation(&mut self.pos, other.pos);
        merge_permutation(&mut self.osp, other.osp);
    }
}

fn merge_permutation(target: &mut Permutation, source: Permutation) {
    for (k1, inner) in source {
        let entry = target.entry(k1).or_default();
        for (k2, values) in inner {
            entry.entry(k2).or_default().extend(values);
        }
    }
}

/// Helper function to remove a triple from a nested index structure and clean up empty collections
#[inline]
fn remove_from_index(index: &mut Permutation, key1: u32, key2: u32, value: u32) {
    if let Some(inner_map) = index.get_mut(&key1) {
        if let Some(set) = inner_map.get_mut(&key2) {
            set.remove(&value);
            if set.is_empty() {
                inner_map.remove(&key2);
            }
        }
        if inner_map.is_empty() {
            index.remove(&key1);
        }
    }
}
