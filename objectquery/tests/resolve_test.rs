/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

extern crate objectquery;
use objectquery::{
    CardinalityFilter, Cardinality, DatasetObjectSet, Error, FieldKind, FieldValue, Filter, Filterable,
    ObjectType, ObjectValue, OptionFilter, PropertyShape, Query, RangeFilter, RangeValue, Resource, StringFilter,
    TermFilter, WhereClause,
};
use shared::terms::{BlankNode, Identifier, IdentifierKind, Literal, NamedNode, TermKind};
use shared::vocab;
use shared::{Dataset, Triple};

#[derive(Debug, Clone, PartialEq)]
struct Person {
    id: Identifier,
    name: String,
    age: Option<i64>,
    knows: Vec<Identifier>,
}

impl Filterable for Person {
    fn to_object_value(&self) -> ObjectValue {
        ObjectValue::new(self.id.clone())
            .with_field("name", self.name.as_str())
            .with_field("age", self.age)
            .with_field("knows", self.knows.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Agent {
    Person(Person),
    Organization(Identifier, String),
}

impl Filterable for Agent {
    fn to_object_value(&self) -> ObjectValue {
        match self {
            Agent::Person(person) => person.to_object_value(),
            Agent::Organization(id, label) => ObjectValue::new(id.clone()).with_field("label", label.as_str()),
        }
    }
}

fn ex(local: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.org/{}", local))
}

fn id(local: &str) -> Identifier {
    Identifier::NamedNode(ex(local))
}

fn person_type() -> ObjectType<Person> {
    ObjectType::new("Person", |resource: &Resource<'_>| {
        Ok(Person {
            id: resource.identifier().clone(),
            name: resource.value(&ex("name"))?.as_string()?,
            age: resource
                .values(&ex("age"), true)
                .optional_head()
                .map(|value| value.as_integer())
                .transpose()?,
            knows: resource.values(&ex("knows"), false).map(|value| value.as_identifier())?,
        })
    })
    .with_discriminator(ex("Person"))
    .with_property(PropertyShape::new("name", ex("name"), Cardinality::Required, FieldKind::Literal))
    .with_property(PropertyShape::new("age", ex("age"), Cardinality::Optional, FieldKind::Literal))
    .with_property(PropertyShape::new("knows", ex("knows"), Cardinality::Many, FieldKind::Identifier))
}

fn organization_type() -> ObjectType<Agent> {
    ObjectType::new("Organization", |resource: &Resource<'_>| {
        let label = resource.value(&ex("label"))?.as_string()?;
        Ok(Agent::Organization(resource.identifier().clone(), label))
    })
    .with_discriminator(ex("Organization"))
}

fn identifier_type(class: &str) -> ObjectType<Identifier> {
    ObjectType::new(class.to_string(), |resource: &Resource<'_>| Ok(resource.identifier().clone()))
        .with_discriminator(ex(class))
}

fn setup_people() -> Dataset {
    let person = |local: &str, name: &str, age: i64| {
        vec![
            Triple::new(ex(local), vocab::rdf_type(), ex("Person")),
            Triple::new(ex(local), ex("name"), Literal::simple(name)),
            Triple::new(ex(local), ex("age"), Literal::integer(age)),
        ]
    };
    let mut triples: Vec<Triple> = Vec::new();
    triples.extend(person("dave", "Dave", 52));
    triples.extend(person("alice", "Alice", 31));
    triples.extend(person("carol", "Carol", 17));
    triples.extend(person("bob", "Bob", 45));
    triples.push(Triple::new(ex("alice"), ex("knows"), ex("bob")));
    triples.push(Triple::new(ex("alice"), ex("knows"), ex("carol")));
    triples.push(Triple::new(ex("bob"), ex("knows"), ex("alice")));
    triples.push(Triple::new(ex("acme"), vocab::rdf_type(), ex("Organization")));
    triples.push(Triple::new(ex("acme"), ex("label"), Literal::simple("ACME")));
    Dataset::from_triples(triples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_type_page_follows_identifier_order() {
        let dataset = Dataset::from_triples(vec![
            Triple::new(ex("a"), vocab::rdf_type(), ex("T")),
            Triple::new(ex("b"), vocab::rdf_type(), ex("T")),
            Triple::new(ex("c"), vocab::rdf_type(), ex("U")),
        ]);
        let objects = DatasetObjectSet::new(&dataset);
        let query = Query::builder().limit(1).offset(1).build();
        assert_eq!(objects.resolve(&[identifier_type("T")], &query).unwrap(), vec![id("b")]);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let dataset = setup_people();
        let objects = DatasetObjectSet::new(&dataset);
        let types = [person_type()];
        let queries = vec![
            Query::new(),
            Query::builder().with_objects_of(ex("knows"), None).build(),
            Query::builder().with_subjects_of(ex("knows"), None).build(),
        ];
        for query in queries {
            let first = objects.resolve(&types, &query).unwrap();
            let second = objects.resolve(&types, &query).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_pagination_slices_the_full_list() {
        let dataset = setup_people();
        let objects = DatasetObjectSet::new(&dataset);
        let types = [person_type()];
        let full = objects.resolve_identifiers(&types, &Query::new()).unwrap();
        assert_eq!(full, vec![id("alice"), id("bob"), id("carol"), id("dave")]);

        for offset in 0..=full.len() + 1 {
            for limit in 1..=full.len() + 1 {
                let query = Query::builder().offset(offset as i64).limit(limit as i64).build();
                let start = offset.min(full.len());
                let end = (offset + limit).min(full.len());
                assert_eq!(objects.resolve_identifiers(&types, &query).unwrap(), full[start..end].to_vec());
            }
        }
    }

    #[test]
    fn test_negative_offset_and_zero_limit() {
        let dataset = setup_people();
        let objects = DatasetObjectSet::new(&dataset);
        let types = [person_type()];
        let query = Query::builder().offset(-5).limit(1).build();
        assert_eq!(objects.resolve_identifiers(&types, &query).unwrap(), vec![id("alice")]);
        let query = Query::builder().limit(-1).build();
        assert!(objects.resolve(&types, &query).unwrap().is_empty());
    }

    #[test]
    fn test_identifier_list_keeps_caller_order() {
        let dataset = setup_people();
        let objects = DatasetObjectSet::new(&dataset);
        let query = Query::builder().with_identifiers(vec![id("bob"), id("alice"), id("bob")]).build();
        let names: Vec<String> = objects
            .resolve(&[person_type()], &query)
            .unwrap()
            .into_iter()
            .map(|person| person.name)
            .collect();
        assert_eq!(names, vec!["Bob", "Alice", "Bob"]);
    }

    #[test]
    fn test_triple_subjects_deduplicated() {
        let dataset = setup_people();
        let objects = DatasetObjectSet::new(&dataset);
        // alice knows two people but appears once
        let query = Query::builder().with_subjects_of(ex("knows"), None).build();
        assert_eq!(
            objects.resolve_identifiers(&[person_type()], &query).unwrap(),
            vec![id("alice"), id("bob")]
        );
        let query = Query::builder()
            .with_subjects_of(ex("knows"), Some(ex("carol").into()))
            .build();
        assert_eq!(objects.resolve_identifiers(&[person_type()], &query).unwrap(), vec![id("alice")]);
    }

    #[test]
    fn test_triple_subjects_with_fixed_object() {
        let dataset = Dataset::from_triples(vec![
            Triple::new(ex("r"), ex("p"), ex("o1")),
            Triple::new(ex("r"), ex("p"), ex("o2")),
            Triple::new(ex("s"), ex("p"), ex("o2")),
        ]);
        let objects = DatasetObjectSet::new(&dataset);
        let types = [identifier_type("T").without_type_check()];

        let query = Query::builder().with_subjects_of(ex("p"), Some(ex("o1").into())).build();
        assert_eq!(objects.resolve(&types, &query).unwrap(), vec![id("r")]);
        let query = Query::builder().with_subjects_of(ex("p"), None).build();
        assert_eq!(objects.resolve(&types, &query).unwrap(), vec![id("r"), id("s")]);
    }

    #[test]
    fn test_by_type_returns_each_resource_once() {
        let dataset = Dataset::from_triples(vec![
            Triple::new(ex("r"), vocab::rdf_type(), ex("T1")),
            Triple::new(ex("r"), vocab::rdf_type(), ex("T2")),
            Triple::new(ex("s"), vocab::rdf_type(), ex("T1")),
        ]);
        let objects = DatasetObjectSet::new(&dataset);

        let either = identifier_type("T1").with_discriminator(ex("T2"));
        assert_eq!(objects.resolve(&[either], &Query::new()).unwrap(), vec![id("r"), id("s")]);

        let polymorphic = [identifier_type("T1"), identifier_type("T2")];
        assert_eq!(objects.resolve(&polymorphic, &Query::new()).unwrap(), vec![id("r"), id("s")]);
        assert_eq!(objects.count(&polymorphic, &Query::new()).unwrap(), 2);
    }

    #[test]
    fn test_by_type_dedup_precedes_pagination() {
        let dataset = Dataset::from_triples(vec![
            Triple::new(ex("a"), vocab::rdf_type(), ex("T1")),
            Triple::new(ex("a"), vocab::rdf_type(), ex("T2")),
            Triple::new(ex("b"), vocab::rdf_type(), ex("T1")),
            Triple::new(ex("c"), vocab::rdf_type(), ex("T2")),
            Triple::new(ex("d"), vocab::rdf_type(), ex("T1")),
            Triple::new(ex("d"), vocab::rdf_type(), ex("T2")),
        ]);
        let objects = DatasetObjectSet::new(&dataset);
        let types = [identifier_type("T1"), identifier_type("T2")];

        let page = Query::builder().offset(1).limit(2).build();
        assert_eq!(objects.resolve(&types, &page).unwrap(), vec![id("b"), id("c")]);
        let tail = Query::builder().offset(3).limit(2).build();
        assert_eq!(objects.resolve(&types, &tail).unwrap(), vec![id("d")]);
    }

    #[test]
    fn test_filter_on_undeclared_field_fails() {
        let dataset = setup_people();
        let objects = DatasetObjectSet::new(&dataset);
        for option in [OptionFilter::Absent, OptionFilter::Present(None)] {
            let query = Query::builder().filter_field("nmae", Filter::Option(option)).build();
            match objects.resolve(&[person_type()], &query) {
                Err(Error::UnknownField { type_name, field }) => {
                    assert_eq!(type_name, "Person");
                    assert_eq!(field, "nmae");
                }
                other => panic!("expected UnknownField, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_polymorphic_filter_skips_types_without_the_field() {
        let mut dataset = setup_people();
        dataset.insert(&Triple::new(ex("zed"), vocab::rdf_type(), ex("Person")));
        dataset.insert(&Triple::new(ex("zed"), ex("name"), Literal::simple("Zed")));
        let objects = DatasetObjectSet::new(&dataset);
        let types = vec![person_type().map(Agent::Person), organization_type()];

        // acme has no age, but Organization does not declare one either
        let query = Query::builder()
            .filter_field("age", Filter::Option(OptionFilter::Absent))
            .build();
        assert_eq!(objects.resolve_identifiers(&types, &query).unwrap(), vec![id("zed")]);

        let query = Query::builder()
            .filter_field("label", Filter::Option(OptionFilter::Present(None)))
            .build();
        assert!(matches!(
            objects.resolve(&types, &query),
            Err(Error::UnknownField { type_name, .. }) if type_name == "Person"
        ));
    }

    #[test]
    fn test_triple_objects_reject_literals() {
        let dataset = setup_people();
        let objects = DatasetObjectSet::new(&dataset);
        let query = Query::builder().with_objects_of(ex("name"), Some(id("alice"))).build();
        match objects.resolve(&[person_type()], &query) {
            Err(Error::NonIdentifierTerm { predicate, .. }) => assert_eq!(predicate, ex("name")),
            other => panic!("expected NonIdentifierTerm, got {:?}", other),
        }

        let query = Query::builder()
            .where_clause(WhereClause::TripleObjects {
                predicate: ex("knows"),
                subject: Some(id("alice")),
                object_kinds: Some(vec![TermKind::NamedNode]),
            })
            .build();
        assert_eq!(
            objects.resolve_identifiers(&[person_type()], &query).unwrap(),
            vec![id("bob"), id("carol")]
        );
    }

    #[test]
    fn test_by_type_kind_restriction_and_blank_nodes() {
        let dataset = Dataset::from_triples(vec![
            Triple::new(ex("a"), vocab::rdf_type(), ex("T")),
            Triple::new(BlankNode::new_unchecked("b0"), vocab::rdf_type(), ex("T")),
        ]);
        let objects = DatasetObjectSet::new(&dataset);
        let types = [identifier_type("T")];
        assert_eq!(objects.count(&types, &Query::new()).unwrap(), 2);
        let named = Query::builder().by_type(Some(IdentifierKind::NamedNode)).build();
        assert_eq!(objects.resolve(&types, &named).unwrap(), vec![id("a")]);
        let blank = Query::builder().by_type(Some(IdentifierKind::BlankNode)).build();
        assert_eq!(
            objects.resolve(&types, &blank).unwrap(),
            vec![Identifier::BlankNode(BlankNode::new_unchecked("b0"))]
        );
    }

    #[test]
    fn test_decode_failure_aborts_the_query() {
        let mut dataset = setup_people();
        dataset.insert(&Triple::new(ex("eve"), vocab::rdf_type(), ex("Person")));
        let objects = DatasetObjectSet::new(&dataset);
        // eve sorts after dave and has no name
        match objects.resolve(&[person_type()], &Query::new()) {
            Err(Error::MissingValue { predicate, subject }) => {
                assert_eq!(predicate, ex("name"));
                assert_eq!(subject, id("eve"));
            }
            other => panic!("expected MissingValue, got {:?}", other),
        }
        // a page that ends before eve is still served
        let query = Query::builder().limit(2).build();
        assert_eq!(objects.resolve(&[person_type()], &query).unwrap().len(), 2);
    }

    #[test]
    fn test_polymorphic_resolution() {
        let dataset = setup_people();
        let objects = DatasetObjectSet::new(&dataset);
        let types = vec![person_type().map(Agent::Person), organization_type()];

        let agents = objects.resolve(&types, &Query::new()).unwrap();
        assert_eq!(agents.len(), 5);
        assert_eq!(agents[0], Agent::Organization(id("acme"), "ACME".to_string()));
        assert!(matches!(&agents[1], Agent::Person(person) if person.name == "Alice"));

        // neither type accepts a resource without a type: the first error wins
        let query = Query::builder().with_identifiers(vec![id("nobody")]).build();
        match objects.resolve(&types, &query) {
            Err(Error::UnexpectedType { expected, .. }) => assert_eq!(expected, "Person"),
            other => panic!("expected UnexpectedType, got {:?}", other),
        }
    }

    #[test]
    fn test_filters_apply_before_pagination() {
        let dataset = setup_people();
        let objects = DatasetObjectSet::new(&dataset);
        let adults = Query::builder().filter_field(
            "age",
            Filter::Range(RangeFilter {
                min_inclusive: Some(RangeValue::Number(18.0)),
                ..RangeFilter::default()
            }),
        );
        let found = objects
            .resolve_identifiers(&[person_type()], &adults.clone().build())
            .unwrap();
        assert_eq!(found, vec![id("alice"), id("bob"), id("dave")]);

        let second_adult = objects
            .resolve_identifiers(&[person_type()], &adults.offset(1).limit(1).build())
            .unwrap();
        assert_eq!(second_adult, vec![id("bob")]);
    }

    #[test]
    fn test_cardinality_and_string_filters() {
        let dataset = setup_people();
        let objects = DatasetObjectSet::new(&dataset);
        let query = Query::builder()
            .filter_field(
                "knows",
                Filter::Cardinality(CardinalityFilter {
                    min_count: Some(2),
                    ..CardinalityFilter::default()
                }),
            )
            .build();
        assert_eq!(objects.resolve_identifiers(&[person_type()], &query).unwrap(), vec![id("alice")]);

        let query = Query::builder()
            .filter_field(
                "name",
                Filter::String(StringFilter {
                    in_list: Some(vec!["Carol".to_string(), "Dave".to_string()]),
                    ..StringFilter::default()
                }),
            )
            .build();
        assert_eq!(objects.count(&[person_type()], &query).unwrap(), 2);
    }

    #[test]
    fn test_json_query_document() {
        let dataset = setup_people();
        let objects = DatasetObjectSet::new(&dataset);
        let query = Query::from_json(
            r#"{
                "limit": 5,
                "where": {"byType": {"identifierKind": "NamedNode"}},
                "filter": {
                    "age": {"option": {"range": {"maxExclusive": 50}}},
                    "knows": {"identifier": {"in": [{"termType": "NamedNode", "iri": "http://example.org/alice"}]}}
                }
            }"#,
        )
        .unwrap();
        // bob knows only alice; carol and dave know nobody, which holds vacuously
        assert_eq!(
            objects.resolve_identifiers(&[person_type()], &query).unwrap(),
            vec![id("bob"), id("carol")]
        );
    }

    #[test]
    fn test_term_filter_on_raw_terms() {
        let dataset = Dataset::from_triples(vec![
            Triple::new(ex("x"), vocab::rdf_type(), ex("Note")),
            Triple::new(ex("x"), ex("text"), Literal::simple("x")),
            Triple::new(ex("y"), vocab::rdf_type(), ex("Note")),
            Triple::new(ex("y"), ex("text"), Literal::language_tagged("x", "en")),
            Triple::new(ex("z"), vocab::rdf_type(), ex("Note")),
            Triple::new(ex("z"), ex("text"), Literal::simple("y")),
        ]);
        let note_type = ObjectType::new("Note", |resource: &Resource<'_>| {
            let text = resource.value(&ex("text"))?.into_term();
            Ok(ObjectValue::new(resource.identifier().clone()).with_field("text", FieldValue::Term(text)))
        })
        .with_discriminator(ex("Note"))
        .with_property(PropertyShape::new("text", ex("text"), Cardinality::Required, FieldKind::Term));
        let objects = DatasetObjectSet::new(&dataset);

        let only_plain_x = Query::builder()
            .filter_field(
                "text",
                Filter::Term(TermFilter {
                    in_list: Some(vec![Literal::simple("x").into()]),
                    ..TermFilter::default()
                }),
            )
            .build();
        assert_eq!(objects.resolve_identifiers(&[note_type.clone()], &only_plain_x).unwrap(), vec![id("x")]);

        let english = Query::builder()
            .filter_field(
                "text",
                Filter::Term(TermFilter {
                    language_in: Some(vec!["en".to_string()]),
                    ..TermFilter::default()
                }),
            )
            .build();
        assert_eq!(objects.resolve_identifiers(&[note_type], &english).unwrap(), vec![id("y")]);
    }

    #[test]
    fn test_resolve_from_ntriples_document() {
        let document = r#"
<http://example.org/a> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.org/Person> .
<http://example.org/a> <http://example.org/name> "Ann" .
_:b1 <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.org/Person> .
_:b1 <http://example.org/name> "Anonymous"@en .
"#;
        let dataset = Dataset::parse_ntriples(document).unwrap();
        let objects = DatasetObjectSet::new(&dataset);
        let people = objects.resolve(&[person_type()], &Query::new()).unwrap();
        let names: Vec<&str> = people.iter().map(|person| person.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Anonymous"]);
        assert_eq!(
            objects.resolve_one(&[person_type()], &"_:b1".parse().unwrap()).unwrap().name,
            "Anonymous"
        );
    }
}
