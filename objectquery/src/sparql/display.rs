/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! SPARQL 1.1 text rendering.

use super::compiler::{ConstructQuery, SelectQuery};
use super::expression::Expression;
use super::pattern::{GraphPattern, PredicatePattern, TermPattern, TriplePattern, Variable};
use std::fmt::{self, Display, Formatter};

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.as_str())
    }
}

impl Display for TermPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TermPattern::Variable(variable) => variable.fmt(f),
            TermPattern::Term(term) => term.fmt(f),
        }
    }
}

impl Display for PredicatePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PredicatePattern::Iri(iri) => iri.fmt(f),
            PredicatePattern::Variable(variable) => variable.fmt(f),
            PredicatePattern::ZeroOrMore(iri) => write!(f, "{}*", iri),
        }
    }
}

impl Display for TriplePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

fn write_separated<T: Display>(f: &mut Formatter<'_>, items: &[T], separator: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        item.fmt(f)?;
    }
    Ok(())
}

fn write_block(f: &mut Formatter<'_>, patterns: &[GraphPattern]) -> fmt::Result {
    if patterns.is_empty() {
        return f.write_str("{ }");
    }
    f.write_str("{ ")?;
    write_separated(f, patterns, " ")?;
    f.write_str(" }")
}

impl Display for GraphPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GraphPattern::Bgp(triples) => write_separated(f, triples, " "),
            GraphPattern::Filter(expression) => write!(f, "FILTER({})", expression),
            GraphPattern::Values { variables, rows } => {
                f.write_str("VALUES (")?;
                write_separated(f, variables, " ")?;
                f.write_str(") {")?;
                for row in rows {
                    f.write_str(" (")?;
                    for (i, value) in row.iter().enumerate() {
                        if i > 0 {
                            f.write_str(" ")?;
                        }
                        match value {
                            Some(term) => term.fmt(f)?,
                            None => f.write_str("UNDEF")?,
                        }
                    }
                    f.write_str(")")?;
                }
                f.write_str(" }")
            }
            GraphPattern::Optional(patterns) => {
                f.write_str("OPTIONAL ")?;
                write_block(f, patterns)
            }
            GraphPattern::Minus(patterns) => {
                f.write_str("MINUS ")?;
                write_block(f, patterns)
            }
            GraphPattern::Graph { name, patterns } => {
                write!(f, "GRAPH {} ", name)?;
                write_block(f, patterns)
            }
            GraphPattern::Service {
                name,
                silent,
                patterns,
            } => {
                f.write_str("SERVICE ")?;
                if *silent {
                    f.write_str("SILENT ")?;
                }
                write!(f, "{} ", name)?;
                write_block(f, patterns)
            }
            GraphPattern::Group(patterns) => write_block(f, patterns),
            GraphPattern::Union(branches) => {
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" UNION ")?;
                    }
                    write_block(f, branch)?;
                }
                Ok(())
            }
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Variable(variable) => variable.fmt(f),
            Expression::Term(term) => term.fmt(f),
            Expression::In(needle, list) => {
                write!(f, "{} IN (", needle)?;
                write_separated(f, list, ", ")?;
                f.write_str(")")
            }
            Expression::Or(operands) => {
                f.write_str("(")?;
                write_separated(f, operands, " || ")?;
                f.write_str(")")
            }
            Expression::And(operands) => {
                f.write_str("(")?;
                write_separated(f, operands, " && ")?;
                f.write_str(")")
            }
            Expression::Not(inner) => write!(f, "!({})", inner),
            Expression::Comparison(operator, left, right) => {
                write!(f, "({} {} {})", left, operator.symbol(), right)
            }
            Expression::Function(function, arguments) => {
                write!(f, "{}(", function.name())?;
                write_separated(f, arguments, ", ")?;
                f.write_str(")")
            }
        }
    }
}

impl Display for SelectQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT DISTINCT {} WHERE ", self.variable)?;
        write_block(f, &self.patterns)?;
        if self.order_by {
            write!(f, " ORDER BY {}", self.variable)?;
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {}", limit)?;
        }
        if self.offset > 0 {
            write!(f, " OFFSET {}", self.offset)?;
        }
        Ok(())
    }
}

impl Display for ConstructQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("CONSTRUCT { ")?;
        write_separated(f, &self.template, " ")?;
        f.write_str(" } WHERE ")?;
        write_block(f, &self.patterns)
    }
}
