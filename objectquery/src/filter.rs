/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Structured filters and their in-memory evaluation.
//!
//! Every filter struct models its keys as optional members: an absent key
//! imposes no constraint, present keys are conjunctive. Evaluation runs
//! over decoded field values, never over raw terms, so the same filter
//! vocabulary serves both the dataset and the SPARQL backends.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::terms::{Identifier, IdentifierKind, NamedNode, Term, TermKind};
use shared::vocab::{self, xsd};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A decoded field, as seen by the filter evaluator.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Term(Term),
    String(String),
    Number(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    /// A field whose presence is not guaranteed
    Option(Option<Box<FieldValue>>),
    /// A multi-valued field
    Set(Vec<FieldValue>),
    Object(ObjectValue),
    /// The active variant of a union-typed field
    Union { tag: String, value: Box<FieldValue> },
}

/// A decoded object: its identifier plus named fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue {
    pub identifier: Identifier,
    pub fields: BTreeMap<String, FieldValue>,
}

impl ObjectValue {
    pub fn new(identifier: Identifier) -> Self {
        Self {
            identifier,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// A field the object does not carry reads as absent.
    pub fn field(&self, name: &str) -> &FieldValue {
        static ABSENT: FieldValue = FieldValue::Option(None);
        self.fields.get(name).unwrap_or(&ABSENT)
    }
}

/// Decoded objects expose their fields to the evaluator through this trait.
pub trait Filterable {
    fn to_object_value(&self) -> ObjectValue;
}

impl Filterable for ObjectValue {
    fn to_object_value(&self) -> ObjectValue {
        self.clone()
    }
}

impl Filterable for Identifier {
    fn to_object_value(&self) -> ObjectValue {
        ObjectValue::new(self.clone())
    }
}

impl FieldValue {
    pub fn union(tag: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        FieldValue::Union {
            tag: tag.into(),
            value: Box::new(value.into()),
        }
    }

    fn as_term(&self) -> Option<&Term> {
        match self {
            FieldValue::Term(term) => Some(term),
            _ => None,
        }
    }

    fn identifier(&self) -> Option<Identifier> {
        match self {
            FieldValue::Term(term) => term.to_identifier(),
            FieldValue::Object(object) => Some(object.identifier.clone()),
            _ => None,
        }
    }

    fn string(&self) -> Option<&str> {
        match self {
            FieldValue::String(value) => Some(value),
            FieldValue::Term(Term::Literal(literal)) => Some(literal.lexical()),
            _ => None,
        }
    }

    fn boolean(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(value) => Some(*value),
            FieldValue::Term(Term::Literal(literal)) if literal.datatype().as_str() == xsd::BOOLEAN => {
                match literal.lexical().trim() {
                    "true" | "1" => Some(true),
                    "false" | "0" => Some(false),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    // Numbers, dates and date-times, including literals of those datatypes
    fn ordered(&self) -> Option<RangeValue> {
        match self {
            FieldValue::Number(value) => Some(RangeValue::Number(*value)),
            FieldValue::Date(value) => Some(RangeValue::Date(*value)),
            FieldValue::DateTime(value) => Some(RangeValue::DateTime(*value)),
            FieldValue::Term(Term::Literal(literal)) => {
                let lexical = literal.lexical().trim();
                let datatype = literal.datatype();
                if vocab::is_numeric_datatype(datatype) {
                    lexical.parse().ok().map(RangeValue::Number)
                } else if datatype.as_str() == xsd::DATE {
                    NaiveDate::parse_from_str(lexical, "%Y-%m-%d").ok().map(RangeValue::Date)
                } else if datatype.as_str() == xsd::DATE_TIME {
                    DateTime::parse_from_rfc3339(lexical).ok().map(RangeValue::DateTime)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl From<Term> for FieldValue {
    fn from(term: Term) -> Self {
        FieldValue::Term(term)
    }
}

impl From<Identifier> for FieldValue {
    fn from(identifier: Identifier) -> Self {
        FieldValue::Term(identifier.into())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<DateTime<FixedOffset>> for FieldValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl From<ObjectValue> for FieldValue {
    fn from(value: ObjectValue) -> Self {
        FieldValue::Object(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        FieldValue::Option(value.map(|inner| Box::new(inner.into())))
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::Set(values.into_iter().map(Into::into).collect())
    }
}

/// A constraint on one field of a decoded object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Filter {
    Term(TermFilter),
    Identifier(IdentifierFilter),
    Range(RangeFilter),
    String(StringFilter),
    Boolean(BooleanFilter),
    Option(OptionFilter),
    Cardinality(CardinalityFilter),
    Object(ObjectFilter),
    Union(UnionFilter),
}

impl Filter {
    /// Evaluates the filter against one decoded field.
    ///
    /// Leaf filters on an optional field require the value to be present.
    /// Leaf filters on a multi-valued field must hold for every value.
    /// A value of the wrong shape never matches.
    pub fn matches(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Filter::Option(filter), _) => filter.matches(value),
            (Filter::Cardinality(filter), _) => filter.matches(value),
            (_, FieldValue::Option(inner)) => inner.as_deref().map_or(false, |inner| self.matches(inner)),
            (_, FieldValue::Set(values)) => values.iter().all(|item| self.matches(item)),
            (Filter::Term(filter), _) => value.as_term().map_or(false, |term| filter.matches(term)),
            (Filter::Identifier(filter), _) => value
                .identifier()
                .map_or(false, |identifier| filter.matches(&identifier)),
            (Filter::Range(filter), _) => value.ordered().map_or(false, |ordered| filter.matches(&ordered)),
            (Filter::String(filter), _) => value.string().map_or(false, |string| filter.matches(string)),
            (Filter::Boolean(filter), _) => value.boolean().map_or(false, |boolean| filter.matches(boolean)),
            (Filter::Object(filter), FieldValue::Object(object)) => filter.matches(object),
            (Filter::Union(filter), FieldValue::Union { tag, value }) => filter.matches(tag, value),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermFilter {
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub in_list: Option<Vec<Term>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype_in: Option<Vec<NamedNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_in: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_in: Option<Vec<TermKind>>,
}

impl TermFilter {
    pub fn matches(&self, term: &Term) -> bool {
        if let Some(terms) = &self.in_list {
            if !terms.contains(term) {
                return false;
            }
        }
        if let Some(datatypes) = &self.datatype_in {
            match term {
                Term::Literal(literal) if datatypes.contains(literal.datatype()) => {}
                _ => return false,
            }
        }
        if let Some(languages) = &self.language_in {
            let language = term.as_literal().and_then(|literal| literal.language());
            match language {
                Some(tag) if languages.iter().any(|candidate| candidate.eq_ignore_ascii_case(tag)) => {}
                _ => return false,
            }
        }
        if let Some(kinds) = &self.type_in {
            if !kinds.contains(&term.kind()) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierFilter {
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub in_list: Option<Vec<Identifier>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<IdentifierKind>,
}

impl IdentifierFilter {
    pub fn matches(&self, identifier: &Identifier) -> bool {
        let listed = self
            .in_list
            .as_ref()
            .map_or(true, |identifiers| identifiers.contains(identifier));
        let kind = self.kind.map_or(true, |kind| identifier.kind() == kind);
        listed && kind
    }
}

/// A bound of a range filter, ordered numerically or chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeValue {
    Number(f64),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

impl PartialOrd for RangeValue {
    /// Values of different categories are incomparable.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (RangeValue::Number(a), RangeValue::Number(b)) => a.partial_cmp(b),
            (RangeValue::Date(a), RangeValue::Date(b)) => a.partial_cmp(b),
            (RangeValue::DateTime(a), RangeValue::DateTime(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_inclusive: Option<RangeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_inclusive: Option<RangeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_exclusive: Option<RangeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_exclusive: Option<RangeValue>,
}

impl RangeFilter {
    pub fn matches(&self, value: &RangeValue) -> bool {
        let check = |bound: &Option<RangeValue>, accept: fn(Ordering) -> bool| {
            bound.map_or(true, |bound| value.partial_cmp(&bound).map_or(false, accept))
        };
        check(&self.min_inclusive, Ordering::is_ge)
            && check(&self.max_inclusive, Ordering::is_le)
            && check(&self.min_exclusive, Ordering::is_gt)
            && check(&self.max_exclusive, Ordering::is_lt)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub in_list: Option<Vec<String>>,
}

impl StringFilter {
    /// Lengths count characters, not bytes.
    pub fn matches(&self, value: &str) -> bool {
        let length = value.chars().count();
        self.min_length.map_or(true, |min| length >= min)
            && self.max_length.map_or(true, |max| length <= max)
            && self
                .in_list
                .as_ref()
                .map_or(true, |values| values.iter().any(|candidate| candidate == value))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<bool>,
}

impl BooleanFilter {
    pub fn matches(&self, value: bool) -> bool {
        self.value.map_or(true, |expected| expected == value)
    }
}

/// Presence constraint on an optional field.
///
/// In JSON, `null` requires the field to be absent. Any object, even `{}`,
/// requires it to be present; a non-empty object is the filter its value
/// must also match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<PresentDocument>", into = "Option<PresentDocument>")]
pub enum OptionFilter {
    Absent,
    Present(Option<Box<Filter>>),
}

#[doc(hidden)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PresentDocument {
    Filter(Box<Filter>),
    Empty(EmptyDocument),
}

/// `{}` and nothing else; a misspelled filter must not pass as "present".
#[doc(hidden)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmptyDocument {}

impl From<Option<PresentDocument>> for OptionFilter {
    fn from(document: Option<PresentDocument>) -> Self {
        match document {
            None => OptionFilter::Absent,
            Some(PresentDocument::Empty(_)) => OptionFilter::Present(None),
            Some(PresentDocument::Filter(filter)) => OptionFilter::Present(Some(filter)),
        }
    }
}

impl From<OptionFilter> for Option<PresentDocument> {
    fn from(filter: OptionFilter) -> Self {
        match filter {
            OptionFilter::Absent => None,
            OptionFilter::Present(None) => Some(PresentDocument::Empty(EmptyDocument::default())),
            OptionFilter::Present(Some(filter)) => Some(PresentDocument::Filter(filter)),
        }
    }
}

impl OptionFilter {
    pub fn present(filter: Filter) -> Self {
        OptionFilter::Present(Some(Box::new(filter)))
    }

    pub fn matches(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (OptionFilter::Absent, FieldValue::Option(inner)) => inner.is_none(),
            (OptionFilter::Absent, _) => false,
            (OptionFilter::Present(constraint), FieldValue::Option(inner)) => match inner {
                Some(inner) => constraint.as_ref().map_or(true, |filter| filter.matches(inner)),
                None => false,
            },
            (OptionFilter::Present(constraint), _) => {
                constraint.as_ref().map_or(true, |filter| filter.matches(value))
            }
        }
    }
}

/// Count bounds for a multi-valued field, with an optional filter every
/// value must satisfy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardinalityFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Box<Filter>>,
}

impl CardinalityFilter {
    pub fn matches(&self, value: &FieldValue) -> bool {
        let items: Vec<&FieldValue> = match value {
            FieldValue::Set(values) => values.iter().collect(),
            FieldValue::Option(inner) => inner.as_deref().into_iter().collect(),
            single => vec![single],
        };
        self.min_count.map_or(true, |min| items.len() >= min)
            && self.max_count.map_or(true, |max| items.len() <= max)
            && self
                .item
                .as_ref()
                .map_or(true, |filter| items.iter().all(|item| filter.matches(item)))
    }
}

/// Per-field constraints on a (possibly nested) object.
///
/// In JSON, every key other than `identifier` names a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<IdentifierFilter>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Filter>,
}

impl ObjectFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identifier(mut self, filter: IdentifierFilter) -> Self {
        self.identifier = Some(filter);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, filter: Filter) -> Self {
        self.fields.insert(name.into(), filter);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.identifier.is_none() && self.fields.is_empty()
    }

    pub fn matches(&self, object: &ObjectValue) -> bool {
        if let Some(filter) = &self.identifier {
            if !filter.matches(&object.identifier) {
                return false;
            }
        }
        self.fields
            .iter()
            .all(|(name, filter)| filter.matches(object.field(name)))
    }
}

/// Constraints keyed by the active variant of a union-typed field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnionFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<BTreeMap<String, Option<Filter>>>,
}

impl UnionFilter {
    /// Without `on` every variant passes. With `on`, the active tag must be
    /// a key; a `null` entry leaves that variant unconstrained.
    pub fn matches(&self, tag: &str, value: &FieldValue) -> bool {
        let Some(on) = &self.on else {
            return true;
        };
        match on.get(tag) {
            Some(Some(filter)) => filter.matches(value),
            Some(None) => true,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::terms::{BlankNode, Literal};

    fn ex(local: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{}", local))
    }

    fn term_value(term: impl Into<Term>) -> FieldValue {
        FieldValue::Term(term.into())
    }

    #[test]
    fn test_term_filter_in_list() {
        let filter = Filter::Term(TermFilter {
            in_list: Some(vec![Literal::simple("x").into()]),
            ..TermFilter::default()
        });
        assert!(filter.matches(&term_value(Literal::simple("x"))));
        assert!(!filter.matches(&term_value(Literal::language_tagged("x", "en"))));
        assert!(!filter.matches(&term_value(Literal::simple("y"))));
    }

    #[test]
    fn test_term_filter_language_and_kind() {
        let filter = TermFilter {
            language_in: Some(vec!["en".to_string()]),
            ..TermFilter::default()
        };
        assert!(filter.matches(&Literal::language_tagged("hello", "en").into()));
        assert!(!filter.matches(&Literal::language_tagged("hallo", "de").into()));
        assert!(!filter.matches(&Literal::simple("hello").into()));

        // stored tags are lower case, requested ones need not be
        let filter = TermFilter {
            language_in: Some(vec!["EN-gb".to_string()]),
            ..TermFilter::default()
        };
        assert!(filter.matches(&Literal::language_tagged("colour", "en-GB").into()));

        let filter = TermFilter {
            type_in: Some(vec![TermKind::BlankNode, TermKind::Literal]),
            ..TermFilter::default()
        };
        assert!(filter.matches(&BlankNode::new_unchecked("b").into()));
        assert!(!filter.matches(&ex("a").into()));
    }

    #[test]
    fn test_term_filter_keys_are_conjunctive() {
        let filter = TermFilter {
            datatype_in: Some(vec![NamedNode::new_unchecked(xsd::INTEGER)]),
            in_list: Some(vec![Literal::integer(1).into(), Literal::simple("1").into()]),
            ..TermFilter::default()
        };
        assert!(filter.matches(&Literal::integer(1).into()));
        assert!(!filter.matches(&Literal::simple("1").into()));
        assert!(TermFilter::default().matches(&ex("anything").into()));
    }

    #[test]
    fn test_range_filter_over_numbers_and_dates() {
        let filter = Filter::Range(RangeFilter {
            min_inclusive: Some(RangeValue::Number(18.0)),
            max_exclusive: Some(RangeValue::Number(65.0)),
            ..RangeFilter::default()
        });
        assert!(filter.matches(&FieldValue::Number(18.0)));
        assert!(filter.matches(&term_value(Literal::integer(40))));
        assert!(!filter.matches(&FieldValue::Number(65.0)));
        assert!(!filter.matches(&FieldValue::String("40".to_string())));

        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let filter = Filter::Range(RangeFilter {
            min_exclusive: Some(RangeValue::Date(day(10))),
            ..RangeFilter::default()
        });
        assert!(filter.matches(&FieldValue::Date(day(11))));
        assert!(!filter.matches(&FieldValue::Date(day(10))));
        // different category
        assert!(!filter.matches(&FieldValue::Number(11.0)));
    }

    #[test]
    fn test_string_filter_counts_characters() {
        let filter = StringFilter {
            min_length: Some(2),
            max_length: Some(3),
            in_list: None,
        };
        assert!(filter.matches("héé"));
        assert!(!filter.matches("a"));
        assert!(!filter.matches("abcd"));
    }

    #[test]
    fn test_option_filter() {
        let absent = Filter::Option(OptionFilter::Absent);
        let present = Filter::Option(OptionFilter::Present(None));
        let none = FieldValue::Option(None);
        let some = FieldValue::from(Some("x"));
        assert!(absent.matches(&none));
        assert!(!absent.matches(&some));
        assert!(present.matches(&some));
        assert!(!present.matches(&none));

        let constrained = Filter::Option(OptionFilter::present(Filter::String(StringFilter {
            in_list: Some(vec!["y".to_string()]),
            ..StringFilter::default()
        })));
        assert!(!constrained.matches(&some));
    }

    #[test]
    fn test_leaf_filter_on_optional_and_many() {
        let filter = Filter::Boolean(BooleanFilter { value: Some(true) });
        assert!(!filter.matches(&FieldValue::Option(None)));
        assert!(filter.matches(&FieldValue::from(Some(true))));
        assert!(filter.matches(&FieldValue::from(vec![true, true])));
        assert!(!filter.matches(&FieldValue::from(vec![true, false])));
    }

    #[test]
    fn test_cardinality_filter() {
        let filter = Filter::Cardinality(CardinalityFilter {
            min_count: Some(1),
            max_count: Some(2),
            item: Some(Box::new(Filter::String(StringFilter {
                min_length: Some(1),
                ..StringFilter::default()
            }))),
        });
        assert!(filter.matches(&FieldValue::from(vec!["a", "b"])));
        assert!(!filter.matches(&FieldValue::from(Vec::<String>::new())));
        assert!(!filter.matches(&FieldValue::from(vec!["a", "b", "c"])));
        assert!(!filter.matches(&FieldValue::from(vec!["a", ""])));
    }

    #[test]
    fn test_object_filter_recurses() {
        let address = ObjectValue::new(Identifier::BlankNode(BlankNode::new_unchecked("addr")))
            .with_field("city", "Leuven");
        let person = ObjectValue::new(Identifier::NamedNode(ex("p")))
            .with_field("address", address)
            .with_field("nickname", None::<String>);

        let city = |name: &str| {
            ObjectFilter::new().with_field(
                "city",
                Filter::String(StringFilter {
                    in_list: Some(vec![name.to_string()]),
                    ..StringFilter::default()
                }),
            )
        };
        let filter = ObjectFilter::new().with_field("address", Filter::Object(city("Leuven")));
        assert!(filter.matches(&person));
        let filter = ObjectFilter::new().with_field("address", Filter::Object(city("Gent")));
        assert!(!filter.matches(&person));

        // unknown fields read as absent
        let filter = ObjectFilter::new().with_field("missing", Filter::Option(OptionFilter::Absent));
        assert!(filter.matches(&person));

        let filter = ObjectFilter::new().with_identifier(IdentifierFilter {
            kind: Some(IdentifierKind::BlankNode),
            in_list: None,
        });
        assert!(!filter.matches(&person));
    }

    #[test]
    fn test_union_filter() {
        let value = FieldValue::union("person", ObjectValue::new(Identifier::NamedNode(ex("p"))));
        let mut on = BTreeMap::new();
        on.insert("person".to_string(), None);
        let filter = Filter::Union(UnionFilter { on: Some(on) });
        assert!(filter.matches(&value));

        let mut on = BTreeMap::new();
        on.insert("organization".to_string(), None);
        let filter = Filter::Union(UnionFilter { on: Some(on) });
        assert!(!filter.matches(&value));

        assert!(Filter::Union(UnionFilter::default()).matches(&value));
    }

    #[test]
    fn test_json_filter_document() {
        let json = serde_json::json!({
            "identifier": {"kind": "NamedNode"},
            "name": {"term": {"languageIn": ["en"]}},
            "age": {"range": {"minInclusive": 18}},
            "born": {"range": {"maxExclusive": "2000-01-01"}},
            "nickname": {"option": null},
            "email": {"option": {}},
            "friends": {"cardinality": {"maxCount": 3}}
        });
        let filter: ObjectFilter = serde_json::from_value(json).unwrap();
        assert_eq!(
            filter.identifier,
            Some(IdentifierFilter {
                in_list: None,
                kind: Some(IdentifierKind::NamedNode),
            })
        );
        assert_eq!(filter.fields.len(), 6);
        assert_eq!(filter.fields["nickname"], Filter::Option(OptionFilter::Absent));
        assert_eq!(filter.fields["email"], Filter::Option(OptionFilter::Present(None)));
        assert_eq!(
            filter.fields["born"],
            Filter::Range(RangeFilter {
                max_exclusive: Some(RangeValue::Date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())),
                ..RangeFilter::default()
            })
        );
        assert_eq!(
            filter.fields["age"],
            Filter::Range(RangeFilter {
                min_inclusive: Some(RangeValue::Number(18.0)),
                ..RangeFilter::default()
            })
        );
    }

    #[test]
    fn test_json_option_rejects_misspelled_filter() {
        let misspelled = serde_json::json!({"age": {"option": {"rnage": {"minInclusive": 18}}}});
        assert!(serde_json::from_value::<ObjectFilter>(misspelled).is_err());

        let present = serde_json::json!({"age": {"option": {"range": {"minInclusive": 18}}}});
        let filter: ObjectFilter = serde_json::from_value(present).unwrap();
        assert!(matches!(&filter.fields["age"], Filter::Option(OptionFilter::Present(Some(_)))));
        assert_eq!(
            serde_json::to_value(Filter::Option(OptionFilter::Present(None))).unwrap(),
            serde_json::json!({"option": {}})
        );
    }
}
