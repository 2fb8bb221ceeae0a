/*
 * Copyright © 2024 ladroid
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::terms::{Identifier, Term};
use crate::triple::Triple;
use rustc_hash::FxHashMap;

// Dictionary for encoding and decoding terms
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Dictionary {
    term_to_id: FxHashMap<Term, u32>,
    id_to_term: Vec<Term>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode(&mut self, term: &Term) -> u32 {
        if let Some(&id) = self.term_to_id.get(term) {
            id
        } else {
            let id = self.id_to_term.len() as u32;
            self.term_to_id.insert(term.clone(), id);
            self.id_to_term.push(term.clone());
            id
        }
    }

    /// Id of an already interned term, without interning it.
    pub fn lookup(&self, term: &Term) -> Option<u32> {
        self.term_to_id.get(term).copied()
    }

    pub fn decode(&self, id: u32) -> Option<&Term> {
        self.id_to_term.get(id as usize)
    }

    /// Rebuilds a triple from encoded positions. `None` if an id is unknown
    /// or a term sits in a position it cannot occupy.
    pub fn decode_triple(&self, subject: u32, predicate: u32, object: u32) -> Option<Triple> {
        let subject = self.decode(subject)?.to_identifier()?;
        let predicate = self.decode(predicate)?.as_named_node()?.clone();
        let object = self.decode(object)?.clone();
        Some(Triple {
            subject,
            predicate,
            object,
        })
    }

    pub fn encode_identifier(&mut self, identifier: &Identifier) -> u32 {
        self.encode(&identifier.to_term())
    }

    pub fn len(&self) -> usize {
        self.id_to_term.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_term.is_empty()
    }
}
