//! Schema module
//!
//! Declarative record schemas and the query-building engine on top of them.
//!
//! # Features
//!
//! - **Static Declarations**: Ordered field tables built once via a builder
//! - **Classification**: Scalar, relation, media and component fields
//! - **Populate Trees**: Nested `fields`/`populate` directives with cycle protection
//! - **Projection**: Write bodies with related records replaced by identifiers

mod classify;
mod populate;
mod project;
mod types;

pub use classify::{
    classify, classify_field, resolve_name, unwrap_type, Cardinality, Classification,
};
pub use populate::{build, populate_to_value, PopulateMap, PopulateQuery, PopulateTree};
pub use project::{project, project_value};
pub use types::{
    kebab_case, FieldDescriptor, FieldType, Record, Schema, SchemaBuilder, SchemaKind,
    SchemaRef, DOCUMENT_ID, IDENTIFIER, RESERVED_FIELDS,
};
