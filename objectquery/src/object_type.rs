/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::error::{Error, Result};
use crate::filter::{CardinalityFilter, Filter, ObjectFilter, OptionFilter, UnionFilter};
use crate::resource::Resource;
use shared::terms::NamedNode;
use std::fmt::{self, Debug};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Exactly one value is guaranteed
    Required,
    /// Zero or one value
    Optional,
    /// Any number of values
    Many,
}

/// What the values of a property decode to.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Any term
    Term,
    Literal,
    Identifier,
    Object(Arc<ObjectShape>),
    Union(Vec<UnionVariant>),
    /// An RDF list whose items have the inner kind
    List(Box<FieldKind>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionVariant {
    pub tag: String,
    pub kind: FieldKind,
}

impl UnionVariant {
    pub fn new(tag: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            tag: tag.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyShape {
    pub name: String,
    pub predicate: NamedNode,
    pub cardinality: Cardinality,
    pub kind: FieldKind,
}

impl PropertyShape {
    pub fn new(name: impl Into<String>, predicate: NamedNode, cardinality: Cardinality, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            predicate,
            cardinality,
            kind,
        }
    }
}

/// Field layout of a queryable type: its `rdf:type` discriminators and the
/// predicate behind each field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectShape {
    pub name: String,
    pub discriminators: Vec<NamedNode>,
    pub properties: Vec<PropertyShape>,
}

impl ObjectShape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_discriminator(mut self, class: NamedNode) -> Self {
        self.discriminators.push(class);
        self
    }

    pub fn with_property(mut self, property: PropertyShape) -> Self {
        self.properties.push(property);
        self
    }

    pub fn property(&self, name: &str) -> Result<&PropertyShape> {
        self.properties
            .iter()
            .find(|property| property.name == name)
            .ok_or_else(|| Error::UnknownField {
                type_name: self.name.clone(),
                field: name.to_string(),
            })
    }

    /// Fails with `UnknownField` when `filter` names a field, nested field
    /// or union tag this shape does not declare. Both backends drop a shape
    /// of a polymorphic query on this error.
    pub fn check_filter(&self, filter: &ObjectFilter) -> Result<()> {
        for (name, field_filter) in &filter.fields {
            let property = self.property(name)?;
            property.kind.check_filter(&property.name, field_filter)?;
        }
        Ok(())
    }
}

impl FieldKind {
    fn check_filter(&self, field: &str, filter: &Filter) -> Result<()> {
        match (filter, self) {
            (Filter::Option(OptionFilter::Present(Some(inner))), _) => self.check_filter(field, inner),
            (Filter::Cardinality(CardinalityFilter { item: Some(item), .. }), _) => self.check_filter(field, item),
            (_, FieldKind::List(item_kind)) => item_kind.check_filter(field, filter),
            (Filter::Object(object_filter), FieldKind::Object(shape)) => shape.check_filter(object_filter),
            (Filter::Union(UnionFilter { on: Some(on) }), FieldKind::Union(variants)) => {
                for (tag, variant_filter) in on {
                    let variant = variants.iter().find(|variant| &variant.tag == tag).ok_or_else(|| {
                        Error::UnknownField {
                            type_name: field.to_string(),
                            field: tag.clone(),
                        }
                    })?;
                    if let Some(variant_filter) = variant_filter {
                        variant.kind.check_filter(tag, variant_filter)?;
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

pub type DecodeFn<T> = Arc<dyn Fn(&Resource<'_>) -> Result<T> + Send + Sync>;

/// A queryable type: a decoder plus the shape it decodes.
pub struct ObjectType<T> {
    shape: Arc<ObjectShape>,
    decode: DecodeFn<T>,
    check_type: bool,
}

impl<T> Clone for ObjectType<T> {
    fn clone(&self) -> Self {
        Self {
            shape: Arc::clone(&self.shape),
            decode: Arc::clone(&self.decode),
            check_type: self.check_type,
        }
    }
}

impl<T> Debug for ObjectType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectType")
            .field("name", &self.shape.name)
            .field("discriminators", &self.shape.discriminators)
            .field("check_type", &self.check_type)
            .finish()
    }
}

impl<T: 'static> ObjectType<T> {
    pub fn new<F>(name: impl Into<String>, decode: F) -> Self
    where
        F: Fn(&Resource<'_>) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            shape: Arc::new(ObjectShape::new(name)),
            decode: Arc::new(decode),
            check_type: true,
        }
    }

    pub fn with_shape(mut self, shape: Arc<ObjectShape>) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_discriminator(mut self, class: NamedNode) -> Self {
        Arc::make_mut(&mut self.shape).discriminators.push(class);
        self
    }

    pub fn with_property(mut self, property: PropertyShape) -> Self {
        Arc::make_mut(&mut self.shape).properties.push(property);
        self
    }

    /// Decode resources regardless of their asserted `rdf:type`.
    pub fn without_type_check(mut self) -> Self {
        self.check_type = false;
        self
    }

    /// Lifts this type into a wider result type, e.g. one arm of a union enum.
    pub fn map<U, F>(self, f: F) -> ObjectType<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let decode = self.decode;
        ObjectType {
            shape: self.shape,
            decode: Arc::new(move |resource: &Resource<'_>| decode(resource).map(&f)),
            check_type: self.check_type,
        }
    }
}

impl<T> ObjectType<T> {
    pub fn name(&self) -> &str {
        &self.shape.name
    }

    pub fn discriminators(&self) -> &[NamedNode] {
        &self.shape.discriminators
    }

    pub fn shape(&self) -> &Arc<ObjectShape> {
        &self.shape
    }

    /// Checks the asserted type, then runs the decoder.
    pub fn decode_resource(&self, resource: &Resource<'_>) -> Result<T> {
        if self.check_type && !self.shape.discriminators.is_empty() {
            let asserted = self
                .shape
                .discriminators
                .iter()
                .any(|class| resource.is_instance_of(class));
            if !asserted {
                return Err(Error::UnexpectedType {
                    subject: resource.identifier().clone(),
                    expected: self.shape.name.clone(),
                    actual: resource.types().into_iter().next(),
                });
            }
        }
        (self.decode)(resource)
    }
}
