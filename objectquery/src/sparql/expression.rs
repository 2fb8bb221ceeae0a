/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::pattern::Variable;
use shared::terms::{Literal, Term};

/// FILTER expressions the compiler emits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    Variable(Variable),
    Term(Term),
    In(Box<Expression>, Vec<Expression>),
    Or(Vec<Expression>),
    And(Vec<Expression>),
    Not(Box<Expression>),
    Comparison(ComparisonOperator, Box<Expression>, Box<Expression>),
    Function(Function, Vec<Expression>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Equal,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl ComparisonOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::Less => "<",
            ComparisonOperator::LessOrEqual => "<=",
            ComparisonOperator::Greater => ">",
            ComparisonOperator::GreaterOrEqual => ">=",
        }
    }
}

/// Built-in functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Datatype,
    Lang,
    LCase,
    Str,
    StrLen,
    IsIri,
    IsBlank,
    IsLiteral,
}

impl Function {
    pub fn name(self) -> &'static str {
        match self {
            Function::Datatype => "DATATYPE",
            Function::Lang => "LANG",
            Function::LCase => "LCASE",
            Function::Str => "STR",
            Function::StrLen => "STRLEN",
            Function::IsIri => "isIRI",
            Function::IsBlank => "isBlank",
            Function::IsLiteral => "isLiteral",
        }
    }
}

impl Expression {
    pub fn variable(variable: &Variable) -> Self {
        Expression::Variable(variable.clone())
    }

    pub fn term(term: impl Into<Term>) -> Self {
        Expression::Term(term.into())
    }

    pub fn call(function: Function, argument: Expression) -> Self {
        Expression::Function(function, vec![argument])
    }

    pub fn is_in(self, list: Vec<Expression>) -> Self {
        Expression::In(Box::new(self), list)
    }

    pub fn compare(self, operator: ComparisonOperator, other: Expression) -> Self {
        Expression::Comparison(operator, Box::new(self), Box::new(other))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Expression::Not(Box::new(self))
    }

    /// Conjunction; a single operand stands alone and none is `true`.
    pub fn and(mut operands: Vec<Expression>) -> Self {
        match operands.len() {
            0 => Expression::Term(Literal::boolean(true).into()),
            1 => operands.remove(0),
            _ => Expression::And(operands),
        }
    }

    /// Disjunction; a single operand stands alone and none is `false`.
    pub fn or(mut operands: Vec<Expression>) -> Self {
        match operands.len() {
            0 => Expression::Term(Literal::boolean(false).into()),
            1 => operands.remove(0),
            _ => Expression::Or(operands),
        }
    }
}
