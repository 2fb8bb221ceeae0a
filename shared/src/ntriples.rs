/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! nom parsers for the N-Triples term syntax and documents.

use crate::error::TermError;
use crate::terms::{BlankNode, Identifier, Literal, NamedNode, Term};
use crate::triple::Triple;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{alpha1, alphanumeric1, char, satisfy, space0, space1},
    combinator::{all_consuming, map, opt, recognize, rest, verify},
    error::{Error as NomError, ErrorKind},
    multi::many0,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

fn is_scheme_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')
}

fn is_iri_char(c: char) -> bool {
    !c.is_whitespace()
        && !c.is_control()
        && !matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
}

fn is_blank_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

// Parser for an IRI scheme like http or urn
fn scheme(input: &str) -> IResult<&str, &str> {
    recognize(pair(satisfy(|c| c.is_ascii_alphabetic()), take_while(is_scheme_char)))(input)
}

fn absolute_iri(input: &str) -> IResult<&str, &str> {
    recognize(tuple((scheme, char(':'), take_while(is_iri_char))))(input)
}

/// Absolute IRI: `scheme ":" rest` with no whitespace or delimiter characters.
pub fn is_valid_iri(iri: &str) -> bool {
    all_consuming(absolute_iri)(iri).is_ok()
}

pub fn is_valid_blank_label(label: &str) -> bool {
    !label.is_empty() && label.chars().all(is_blank_char)
}

pub fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

// Parser for a URI within angle brackets
pub fn iri_ref(input: &str) -> IResult<&str, NamedNode> {
    map(
        verify(
            delimited(char('<'), take_while(|c| c != '>'), char('>')),
            is_valid_iri,
        ),
        |iri: &str| NamedNode::new_unchecked(iri),
    )(input)
}

pub fn blank_node(input: &str) -> IResult<&str, BlankNode> {
    map(preceded(tag("_:"), take_while1(is_blank_char)), |label: &str| {
        BlankNode::new_unchecked(label)
    })(input)
}

// Quoted lexical form with N-Triples escapes
fn quoted_string(input: &str) -> IResult<&str, String> {
    let fail = || nom::Err::Error(NomError::new(input, ErrorKind::Escaped));
    let (body, _) = char('"')(input)?;
    let mut out = String::new();
    let mut chars = body.char_indices();
    loop {
        match chars.next() {
            None => return Err(fail()),
            Some((i, '"')) => return Ok((&body[i + 1..], out)),
            Some((_, '\\')) => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, 't')) => out.push('\t'),
                Some((_, '"')) => out.push('"'),
                Some((_, '\\')) => out.push('\\'),
                Some((_, 'b')) => out.push('\u{8}'),
                Some((_, 'f')) => out.push('\u{c}'),
                Some((_, '\'')) => out.push('\''),
                Some((j, marker @ ('u' | 'U'))) => {
                    let width = if marker == 'u' { 4 } else { 8 };
                    let decoded = body
                        .get(j + 1..j + 1 + width)
                        .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                        .and_then(char::from_u32)
                        .ok_or_else(fail)?;
                    out.push(decoded);
                    for _ in 0..width {
                        chars.next();
                    }
                }
                _ => return Err(fail()),
            },
            Some((_, c)) => out.push(c),
        }
    }
}

fn language_tag(input: &str) -> IResult<&str, &str> {
    recognize(pair(alpha1, many0(pair(char('-'), alphanumeric1))))(input)
}

enum LiteralSuffix<'a> {
    Language(&'a str),
    Datatype(NamedNode),
}

pub fn literal(input: &str) -> IResult<&str, Literal> {
    let (input, lexical) = quoted_string(input)?;
    let (input, suffix) = opt(alt((
        map(preceded(char('@'), language_tag), LiteralSuffix::Language),
        map(preceded(tag("^^"), iri_ref), LiteralSuffix::Datatype),
    )))(input)?;
    let literal = match suffix {
        Some(LiteralSuffix::Language(language)) => Literal::language_tagged(lexical, language),
        Some(LiteralSuffix::Datatype(datatype)) => Literal::typed(lexical, datatype),
        None => Literal::simple(lexical),
    };
    Ok((input, literal))
}

pub fn identifier(input: &str) -> IResult<&str, Identifier> {
    alt((
        map(iri_ref, Identifier::NamedNode),
        map(blank_node, Identifier::BlankNode),
    ))(input)
}

pub fn term(input: &str) -> IResult<&str, Term> {
    alt((
        map(iri_ref, Term::NamedNode),
        map(blank_node, Term::BlankNode),
        map(literal, Term::Literal),
    ))(input)
}

pub fn parse_identifier(text: &str) -> Option<Identifier> {
    all_consuming(identifier)(text).ok().map(|(_, id)| id)
}

pub fn parse_term(text: &str) -> Result<Term, TermError> {
    all_consuming(term)(text)
        .map(|(_, term)| term)
        .map_err(|err| TermError::Syntax {
            line: 1,
            message: describe(err),
        })
}

fn comment(input: &str) -> IResult<&str, &str> {
    preceded(char('#'), rest)(input)
}

pub fn parse_triple_line(input: &str) -> IResult<&str, Triple> {
    let (input, (subject, _, predicate, _, object, _, _, _, _)) = tuple((
        identifier,
        space1,
        iri_ref,
        space1,
        term,
        space0,
        char('.'),
        space0,
        opt(comment),
    ))(input)?;
    Ok((input, Triple::new(subject, predicate, object)))
}

fn describe(err: nom::Err<NomError<&str>>) -> String {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let near: String = e.input.chars().take(24).collect();
            format!("unexpected input near '{}' ({:?})", near, e.code)
        }
        nom::Err::Incomplete(_) => "incomplete input".to_string(),
    }
}

/// Parses an N-Triples document; blank lines and `#` comments are skipped.
pub fn parse_ntriples(document: &str) -> Result<Vec<Triple>, TermError> {
    let mut triples = Vec::new();
    for (idx, line) in document.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let (_, triple) = all_consuming(parse_triple_line)(trimmed).map_err(|err| TermError::Syntax {
            line: idx + 1,
            message: describe(err),
        })?;
        triples.push(triple);
    }
    Ok(triples)
}
