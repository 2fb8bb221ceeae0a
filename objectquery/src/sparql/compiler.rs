/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::expression::{ComparisonOperator, Expression, Function};
use super::optimizer::optimize;
use super::pattern::{GraphPattern, PredicatePattern, TermPattern, TriplePattern, Variable};
use crate::error::{Error, Result};
use crate::filter::{
    Filter, IdentifierFilter, ObjectFilter, OptionFilter, RangeFilter, RangeValue, StringFilter, TermFilter,
};
use crate::object_type::{Cardinality, FieldKind, ObjectShape, PropertyShape, UnionVariant};
use crate::query::{Query, WhereClause};
use log::debug;
use shared::terms::{Identifier, Literal, NamedNode, Term, TermKind};
use shared::vocab::{self, xsd};

/// `SELECT DISTINCT ?subject` over compiled, optimized fragments.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub variable: Variable,
    pub patterns: Vec<GraphPattern>,
    /// Order solutions by the selected variable
    pub order_by: bool,
    pub limit: Option<usize>,
    pub offset: usize,
}

/// Fetches the triples the decoders of some object types read.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructQuery {
    pub template: Vec<TriplePattern>,
    pub patterns: Vec<GraphPattern>,
}

/// Translates queries and filters into graph-pattern fragments.
///
/// Variables are derived from the subject variable by field name:
/// `?subject`, `?subject_name`, `?subject_address_city`, and so on.
#[derive(Debug, Clone)]
pub struct PatternCompiler {
    subject: Variable,
}

impl Default for PatternCompiler {
    fn default() -> Self {
        Self {
            subject: Variable::new("subject"),
        }
    }
}

impl PatternCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subject_variable(mut self, name: impl Into<String>) -> Self {
        self.subject = Variable::new(name);
        self
    }

    pub fn subject(&self) -> &Variable {
        &self.subject
    }

    /// Fragments for the where-clause and filter of `query`, before
    /// optimization.
    pub fn select_patterns(&self, shapes: &[&ObjectShape], query: &Query) -> Result<Vec<GraphPattern>> {
        let mut patterns = self.where_patterns(shapes, &query.where_clause)?;
        if let Some(filter) = query.active_filter() {
            patterns.extend(self.filter_patterns(shapes, filter)?);
        }
        Ok(patterns)
    }

    /// Identifier lists keep the caller's order, so their selection is
    /// neither ordered nor paged here.
    ///
    /// `ORDER BY` follows SPARQL term order, which puts blank nodes before
    /// IRIs. [`crate::DatasetObjectSet`] sorts IRIs first, so pages over
    /// mixed identifiers differ between the two backends.
    pub fn select_query(&self, shapes: &[&ObjectShape], query: &Query) -> Result<SelectQuery> {
        let patterns = optimize(self.select_patterns(shapes, query)?);
        let ordered = !matches!(query.where_clause, WhereClause::Identifiers(_));
        Ok(SelectQuery {
            variable: self.subject.clone(),
            patterns,
            order_by: ordered,
            limit: if ordered { query.effective_limit() } else { None },
            offset: if ordered { query.effective_offset() } else { 0 },
        })
    }

    /// Fails with `BlankNodeConstant` when the where-clause names a blank
    /// node: its label means nothing to the store.
    pub fn where_patterns(&self, shapes: &[&ObjectShape], where_clause: &WhereClause) -> Result<Vec<GraphPattern>> {
        let subject = &self.subject;
        let patterns = match where_clause {
            WhereClause::Identifiers(identifiers) => vec![values_of(subject, identifiers)?],
            WhereClause::TripleObjects {
                predicate,
                subject: source,
                object_kinds,
            } => {
                let source = match source {
                    Some(identifier) => constant(identifier.to_term())?,
                    None => TermPattern::from(subject.child("source")),
                };
                let mut patterns = vec![GraphPattern::triple(source, predicate.clone(), subject)];
                if let Some(kinds) = object_kinds {
                    patterns.push(GraphPattern::Filter(kind_test(&Expression::variable(subject), kinds)));
                }
                patterns
            }
            WhereClause::TripleSubjects {
                predicate,
                object,
                subject_kinds,
            } => {
                let target = match object {
                    Some(term) => constant(term.clone())?,
                    None => TermPattern::from(subject.child("target")),
                };
                let mut patterns = vec![GraphPattern::triple(subject, predicate.clone(), target)];
                if let Some(kinds) = subject_kinds {
                    let kinds: Vec<TermKind> = kinds.iter().copied().map(TermKind::from).collect();
                    patterns.push(GraphPattern::Filter(kind_test(&Expression::variable(subject), &kinds)));
                }
                patterns
            }
            WhereClause::ByType { identifier_kind } => {
                let mut classes: Vec<&NamedNode> = Vec::new();
                for class in shapes.iter().flat_map(|shape| shape.discriminators.iter()) {
                    if !classes.contains(&class) {
                        classes.push(class);
                    }
                }
                let mut patterns = if classes.is_empty() {
                    vec![GraphPattern::empty()]
                } else {
                    type_constraint(subject, classes)
                };
                if let Some(kind) = identifier_kind {
                    let kinds = [TermKind::from(*kind)];
                    patterns.push(GraphPattern::Filter(kind_test(&Expression::variable(subject), &kinds)));
                }
                patterns
            }
        };
        Ok(patterns)
    }

    /// Fragments enforcing `filter` on the subject variable.
    ///
    /// With several shapes, each shape contributes one UNION branch
    /// restricted to its own discriminators; shapes that lack a filtered
    /// field drop out.
    pub fn filter_patterns(&self, shapes: &[&ObjectShape], filter: &ObjectFilter) -> Result<Vec<GraphPattern>> {
        match shapes {
            [] => Ok(Vec::new()),
            [shape] => self.object_filter(shape, filter, &self.subject),
            _ => {
                let mut branches = Vec::new();
                let mut first_error = None;
                for shape in shapes {
                    if let Err(error) = shape.check_filter(filter) {
                        debug!("Shape {} drops out of the filter: {}", shape.name, error);
                        first_error.get_or_insert(error);
                        continue;
                    }
                    let mut branch = type_constraint(&self.subject, shape.discriminators.iter().collect());
                    branch.extend(self.object_filter(shape, filter, &self.subject)?);
                    branches.push(branch);
                }
                match first_error {
                    Some(error) if branches.is_empty() => Err(error),
                    _ => Ok(vec![GraphPattern::Union(branches)]),
                }
            }
        }
    }

    fn object_filter(&self, shape: &ObjectShape, filter: &ObjectFilter, subject: &Variable) -> Result<Vec<GraphPattern>> {
        let mut out = Vec::new();
        if let Some(identifier_filter) = &filter.identifier {
            let conditions = identifier_conditions(identifier_filter, Expression::variable(subject));
            if !conditions.is_empty() {
                out.push(GraphPattern::Filter(Expression::and(conditions)));
            }
        }
        for (name, field_filter) in &filter.fields {
            let property = shape.property(name)?;
            let value = subject.child(name);
            self.field_filter(property, field_filter, subject, &value, &mut out)?;
        }
        Ok(out)
    }

    fn field_filter(
        &self,
        property: &PropertyShape,
        filter: &Filter,
        subject: &Variable,
        value: &Variable,
        out: &mut Vec<GraphPattern>,
    ) -> Result<()> {
        let path = value_path(subject, property, value);
        match filter {
            Filter::Option(OptionFilter::Absent) => out.push(GraphPattern::Minus(vec![GraphPattern::Bgp(path)])),
            Filter::Option(OptionFilter::Present(None)) => out.push(GraphPattern::Bgp(path)),
            Filter::Option(OptionFilter::Present(Some(inner))) => {
                self.field_filter(property, inner, subject, value, out)?
            }
            Filter::Cardinality(_) => {
                return Err(unsupported(&property.name, "value counts have no pattern translation"))
            }
            Filter::Object(object_filter) => {
                let FieldKind::Object(shape) = &property.kind else {
                    return Err(unsupported(&property.name, "not an object-valued field"));
                };
                if is_multi_valued(property) {
                    return Err(unsupported(&property.name, "object filters need a single-valued field"));
                }
                out.push(GraphPattern::Bgp(path));
                out.extend(self.object_filter(shape, object_filter, value)?);
            }
            Filter::Union(union_filter) => {
                let FieldKind::Union(variants) = &property.kind else {
                    return Err(unsupported(&property.name, "not a union-valued field"));
                };
                if is_multi_valued(property) {
                    return Err(unsupported(&property.name, "union filters need a single-valued field"));
                }
                out.push(GraphPattern::Bgp(path));
                if let Some(on) = &union_filter.on {
                    let mut branches = Vec::with_capacity(on.len());
                    for (tag, variant_filter) in on {
                        let variant = variants.iter().find(|variant| &variant.tag == tag).ok_or_else(|| {
                            Error::UnknownField {
                                type_name: property.name.clone(),
                                field: tag.clone(),
                            }
                        })?;
                        let mut branch = variant_test(variant, value);
                        if let Some(variant_filter) = variant_filter {
                            branch.extend(self.variant_filter(variant, variant_filter, value)?);
                        }
                        branches.push(branch);
                    }
                    out.push(if branches.is_empty() {
                        GraphPattern::empty()
                    } else {
                        GraphPattern::Union(branches)
                    });
                }
            }
            leaf => {
                let condition = leaf_condition(&property.name, leaf, value)?;
                if is_multi_valued(property) {
                    // every value must satisfy the condition
                    out.push(GraphPattern::Minus(vec![
                        GraphPattern::Bgp(path),
                        GraphPattern::Filter(condition.not()),
                    ]));
                } else {
                    out.push(GraphPattern::Bgp(path));
                    out.push(GraphPattern::Filter(condition));
                }
            }
        }
        Ok(())
    }

    fn variant_filter(&self, variant: &UnionVariant, filter: &Filter, value: &Variable) -> Result<Vec<GraphPattern>> {
        match (&variant.kind, filter) {
            (FieldKind::Object(shape), Filter::Object(object_filter)) => self.object_filter(shape, object_filter, value),
            (_, Filter::Term(_) | Filter::Identifier(_) | Filter::Range(_) | Filter::String(_) | Filter::Boolean(_)) => {
                Ok(vec![GraphPattern::Filter(leaf_condition(&variant.tag, filter, value)?)])
            }
            _ => Err(unsupported(&variant.tag, "filter does not fit the variant")),
        }
    }

    /// CONSTRUCT fetching everything the shapes describe for `identifiers`,
    /// which must all be IRIs.
    pub fn construct_query(&self, shapes: &[&ObjectShape], identifiers: &[Identifier]) -> Result<ConstructQuery> {
        let mut template = Vec::new();
        let branches: Vec<Vec<GraphPattern>> = shapes
            .iter()
            .map(|shape| construct_shape(shape, &self.subject, &self.subject, &mut template))
            .collect();

        let mut patterns = vec![values_of(&self.subject, identifiers)?];
        match branches.len() {
            0 => {}
            1 => patterns.extend(branches.into_iter().flatten()),
            _ => patterns.push(GraphPattern::Union(branches)),
        }
        Ok(ConstructQuery {
            template,
            patterns: optimize(patterns),
        })
    }
}

/// A fixed term of a pattern. Blank nodes are rejected: in a pattern a
/// blank node acts as a variable, and `VALUES` does not admit them.
fn constant(term: Term) -> Result<TermPattern> {
    match term {
        Term::BlankNode(node) => Err(Error::BlankNodeConstant(node)),
        term => Ok(TermPattern::Term(term)),
    }
}

fn values_of(variable: &Variable, identifiers: &[Identifier]) -> Result<GraphPattern> {
    if let Some(Identifier::BlankNode(node)) = identifiers.iter().find(|identifier| !identifier.is_named_node()) {
        return Err(Error::BlankNodeConstant(node.clone()));
    }
    Ok(GraphPattern::values_of(variable, identifiers))
}

fn unsupported(field: &str, reason: &str) -> Error {
    Error::UnsupportedFilter {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn is_multi_valued(property: &PropertyShape) -> bool {
    property.cardinality == Cardinality::Many || matches!(property.kind, FieldKind::List(_))
}

/// Triples from `subject` to the field's values; list items are reached
/// through `rdf:rest*/rdf:first`.
fn value_path(subject: &Variable, property: &PropertyShape, value: &Variable) -> Vec<TriplePattern> {
    match property.kind {
        FieldKind::List(_) => {
            let head = value.child("list");
            let cell = value.child("cell");
            vec![
                TriplePattern::new(subject, property.predicate.clone(), &head),
                TriplePattern::new(&head, PredicatePattern::ZeroOrMore(vocab::rdf_rest()), &cell),
                TriplePattern::new(&cell, vocab::rdf_first(), value),
            ]
        }
        _ => vec![TriplePattern::new(subject, property.predicate.clone(), value)],
    }
}

/// `?variable rdf:type` one of `classes`.
fn type_constraint(variable: &Variable, classes: Vec<&NamedNode>) -> Vec<GraphPattern> {
    let mut branches: Vec<Vec<GraphPattern>> = classes
        .into_iter()
        .map(|class| vec![GraphPattern::triple(variable, vocab::rdf_type(), class.clone())])
        .collect();
    match branches.len() {
        0 => Vec::new(),
        1 => branches.remove(0),
        _ => vec![GraphPattern::Union(branches)],
    }
}

fn variant_test(variant: &UnionVariant, value: &Variable) -> Vec<GraphPattern> {
    let is_literal = Expression::call(Function::IsLiteral, Expression::variable(value));
    match &variant.kind {
        FieldKind::Object(shape) => type_constraint(value, shape.discriminators.iter().collect()),
        FieldKind::Literal => vec![GraphPattern::Filter(is_literal)],
        FieldKind::Identifier | FieldKind::List(_) => vec![GraphPattern::Filter(is_literal.not())],
        FieldKind::Term | FieldKind::Union(_) => Vec::new(),
    }
}

fn kind_test(value: &Expression, kinds: &[TermKind]) -> Expression {
    Expression::or(
        kinds
            .iter()
            .map(|kind| {
                let function = match kind {
                    TermKind::NamedNode => Function::IsIri,
                    TermKind::BlankNode => Function::IsBlank,
                    TermKind::Literal => Function::IsLiteral,
                };
                Expression::call(function, value.clone())
            })
            .collect(),
    )
}

fn leaf_condition(field: &str, filter: &Filter, value: &Variable) -> Result<Expression> {
    let value = Expression::variable(value);
    let conditions = match filter {
        Filter::Term(filter) => term_conditions(filter, value),
        Filter::Identifier(filter) => identifier_conditions(filter, value),
        Filter::Range(filter) => range_conditions(filter, value),
        Filter::String(filter) => string_conditions(filter, value),
        Filter::Boolean(filter) => filter
            .value
            .map(|expected| value.compare(ComparisonOperator::Equal, Expression::term(Literal::boolean(expected))))
            .into_iter()
            .collect(),
        _ => return Err(unsupported(field, "not a value constraint")),
    };
    Ok(Expression::and(conditions))
}

fn terms<T: Clone + Into<Term>>(items: &[T]) -> Vec<Expression> {
    items.iter().cloned().map(Expression::term).collect()
}

fn term_conditions(filter: &TermFilter, value: Expression) -> Vec<Expression> {
    let mut conditions = Vec::new();
    if let Some(list) = &filter.in_list {
        conditions.push(value.clone().is_in(terms(list)));
    }
    if let Some(datatypes) = &filter.datatype_in {
        conditions.push(Expression::call(Function::Datatype, value.clone()).is_in(terms(datatypes)));
    }
    if let Some(languages) = &filter.language_in {
        // tags compare case-insensitively
        let tags = languages
            .iter()
            .map(|tag| Expression::term(Literal::simple(tag.to_ascii_lowercase())))
            .collect();
        let lang = Expression::call(Function::LCase, Expression::call(Function::Lang, value.clone()));
        conditions.push(lang.is_in(tags));
    }
    if let Some(kinds) = &filter.type_in {
        conditions.push(kind_test(&value, kinds));
    }
    conditions
}

fn identifier_conditions(filter: &IdentifierFilter, value: Expression) -> Vec<Expression> {
    let mut conditions = Vec::new();
    if let Some(list) = &filter.in_list {
        conditions.push(value.clone().is_in(terms(list)));
    }
    if let Some(kind) = filter.kind {
        conditions.push(kind_test(&value, &[TermKind::from(kind)]));
    }
    conditions
}

fn range_conditions(filter: &RangeFilter, value: Expression) -> Vec<Expression> {
    [
        (filter.min_inclusive, ComparisonOperator::GreaterOrEqual),
        (filter.max_inclusive, ComparisonOperator::LessOrEqual),
        (filter.min_exclusive, ComparisonOperator::Greater),
        (filter.max_exclusive, ComparisonOperator::Less),
    ]
    .into_iter()
    .filter_map(|(bound, operator)| bound.map(|bound| value.clone().compare(operator, Expression::term(range_literal(bound)))))
    .collect()
}

fn range_literal(bound: RangeValue) -> Literal {
    match bound {
        RangeValue::Number(number) if number.fract() == 0.0 && number.abs() < 1e15 => Literal::integer(number as i64),
        RangeValue::Number(number) => Literal::double(number),
        RangeValue::Date(date) => Literal::typed(date.format("%Y-%m-%d").to_string(), NamedNode::new_unchecked(xsd::DATE)),
        RangeValue::DateTime(date_time) => {
            Literal::typed(date_time.to_rfc3339(), NamedNode::new_unchecked(xsd::DATE_TIME))
        }
    }
}

fn string_conditions(filter: &StringFilter, value: Expression) -> Vec<Expression> {
    let length = || Expression::call(Function::StrLen, Expression::call(Function::Str, value.clone()));
    let mut conditions = Vec::new();
    if let Some(min) = filter.min_length {
        conditions.push(length().compare(ComparisonOperator::GreaterOrEqual, Expression::term(Literal::integer(min as i64))));
    }
    if let Some(max) = filter.max_length {
        conditions.push(length().compare(ComparisonOperator::LessOrEqual, Expression::term(Literal::integer(max as i64))));
    }
    if let Some(list) = &filter.in_list {
        let strings = list.iter().map(|item| Expression::term(Literal::simple(item.as_str()))).collect();
        conditions.push(Expression::call(Function::Str, value.clone()).is_in(strings));
    }
    conditions
}

/// Template triples and WHERE fragments for one shape. Field variables are
/// named after `scope`, which differs from `subject` inside union variants.
fn construct_shape(
    shape: &ObjectShape,
    subject: &Variable,
    scope: &Variable,
    template: &mut Vec<TriplePattern>,
) -> Vec<GraphPattern> {
    let mut patterns = Vec::new();
    // asserted types, read by the type check before decoding
    let types = TriplePattern::new(subject, vocab::rdf_type(), scope.child("type"));
    push_unique(template, types.clone());
    patterns.push(GraphPattern::Optional(vec![GraphPattern::Bgp(vec![types])]));

    if shape.properties.is_empty() {
        // no declared layout: fetch every outgoing triple
        let any = TriplePattern::new(subject, scope.child("predicate"), scope.child("object"));
        push_unique(template, any.clone());
        patterns.push(GraphPattern::Optional(vec![GraphPattern::Bgp(vec![any])]));
        return patterns;
    }

    for property in &shape.properties {
        let value = scope.child(&property.name);
        let link = TriplePattern::new(subject, property.predicate.clone(), &value);
        push_unique(template, link.clone());
        let mut inner = vec![GraphPattern::Bgp(vec![link])];
        inner.extend(construct_kind(&property.kind, &value, &value, template));
        match property.cardinality {
            Cardinality::Required => patterns.extend(inner),
            Cardinality::Optional | Cardinality::Many => patterns.push(GraphPattern::Optional(inner)),
        }
    }
    patterns
}

fn construct_kind(
    kind: &FieldKind,
    value: &Variable,
    scope: &Variable,
    template: &mut Vec<TriplePattern>,
) -> Vec<GraphPattern> {
    match kind {
        FieldKind::Term | FieldKind::Literal | FieldKind::Identifier => Vec::new(),
        FieldKind::Object(shape) => construct_shape(shape, value, scope, template),
        FieldKind::Union(variants) => variants
            .iter()
            .map(|variant| construct_kind(&variant.kind, value, &scope.child(&variant.tag), template))
            .filter(|nested| !nested.is_empty())
            .map(GraphPattern::Optional)
            .collect(),
        FieldKind::List(item_kind) => {
            let cell = scope.child("cell");
            let item = scope.child("item");
            let rest = scope.child("rest");
            let first = TriplePattern::new(&cell, vocab::rdf_first(), &item);
            let next = TriplePattern::new(&cell, vocab::rdf_rest(), &rest);
            push_unique(template, first.clone());
            push_unique(template, next.clone());
            let mut inner = vec![GraphPattern::Bgp(vec![
                TriplePattern::new(value, PredicatePattern::ZeroOrMore(vocab::rdf_rest()), &cell),
                first,
                next,
            ])];
            inner.extend(construct_kind(item_kind, &item, &item, template));
            vec![GraphPattern::Optional(inner)]
        }
    }
}

fn push_unique(template: &mut Vec<TriplePattern>, triple: TriplePattern) {
    if !template.contains(&triple) {
        template.push(triple);
    }
}
