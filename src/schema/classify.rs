//! Field classification and wire-name resolution

use super::types::{FieldDescriptor, FieldType, Schema, SchemaKind};

static NULL: FieldType = FieldType::Null;

/// How many related records a relation field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Many,
}

/// What a field means for query building
#[derive(Debug, Clone, Copy)]
pub enum Classification {
    /// Primitive or unrecognized value, requested by name
    Scalar,
    /// Reference to other addressable records
    Relation {
        target: &'static Schema,
        cardinality: Cardinality,
    },
    /// Uploaded file record
    Media(&'static Schema),
    /// Embedded sub-structure
    Component(&'static Schema),
}

impl Classification {
    pub fn is_scalar(&self) -> bool {
        matches!(self, Classification::Scalar)
    }

    /// Whether values of this field are records with their own identifier
    pub fn is_addressable(&self) -> bool {
        matches!(
            self,
            Classification::Relation { .. } | Classification::Media(_)
        )
    }

    /// Target schema, unless scalar
    pub fn target(&self) -> Option<&'static Schema> {
        match *self {
            Classification::Scalar => None,
            Classification::Relation { target, .. }
            | Classification::Media(target)
            | Classification::Component(target) => Some(target),
        }
    }
}

/// Peel one level of optional/union and one level of container.
///
/// Returns the underlying type and whether a container was unwrapped.
pub fn unwrap_type(field_type: &FieldType) -> (&FieldType, bool) {
    let candidate = match field_type {
        FieldType::Optional(inner) => inner.as_ref(),
        FieldType::Union(alternatives) => alternatives
            .iter()
            .find(|alt| !matches!(alt, FieldType::Null))
            .unwrap_or(&NULL),
        other => other,
    };

    match candidate {
        FieldType::List(element) => (element.as_ref(), true),
        other => (other, false),
    }
}

/// Classify a declared type
pub fn classify(field_type: &FieldType) -> Classification {
    let (underlying, in_container) = unwrap_type(field_type);

    let FieldType::Record(target) = underlying else {
        return Classification::Scalar;
    };
    let schema = target();

    match schema.kind() {
        SchemaKind::Media => Classification::Media(schema),
        SchemaKind::Component => Classification::Component(schema),
        SchemaKind::Document => Classification::Relation {
            target: schema,
            cardinality: if in_container {
                Cardinality::Many
            } else {
                Cardinality::Single
            },
        },
    }
}

/// Classify a field, honouring its explicit relation flag.
///
/// The flag promotes a component-typed field to a relation. It never turns a
/// non-schema type into one.
pub fn classify_field(descriptor: &FieldDescriptor) -> Classification {
    match classify(&descriptor.field_type) {
        Classification::Component(target) if descriptor.relation => {
            let (_, in_container) = unwrap_type(&descriptor.field_type);
            Classification::Relation {
                target,
                cardinality: if in_container {
                    Cardinality::Many
                } else {
                    Cardinality::Single
                },
            }
        }
        other => other,
    }
}

/// Wire name of a field: its alias when set and non-empty, else the declared name
pub fn resolve_name<'a>(declared_name: &'a str, descriptor: &'a FieldDescriptor) -> &'a str {
    match descriptor.alias.as_deref() {
        Some(alias) if !alias.is_empty() => alias,
        _ => declared_name,
    }
}
