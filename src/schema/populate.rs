//! Populate structure builder
//!
//! Walks a schema depth-first and produces the scalar field list plus the
//! nested `populate` directive the API needs to expand relations, media and
//! components in one request.
//!
//! ```text
//! Article { id, title, category: Category }
//! Category { id, name, icon: Media }
//!
//! fields   = ["id", "title"]
//! populate = { category: { fields: ["id", "name"], populate: { icon: true } } }
//! ```
//!
//! Recursion stops where a schema reappears on the current path, so cyclic
//! schema graphs still give a finite tree. Schemas reached through different
//! branches (diamonds) are expanded in each branch.

use super::classify::{classify_field, Classification};
use super::types::Schema;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Nested populate directives keyed by wire name, in declaration order
pub type PopulateMap = IndexMap<String, PopulateTree>;

/// One node of the populate directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopulateTree {
    /// Include the entry with its default shape (`true` on the wire)
    All,
    /// Include the entry restricted to `fields`, expanding `populate`
    Nested {
        fields: Vec<String>,
        populate: PopulateMap,
    },
}

impl PopulateTree {
    /// Collapse an empty expansion into [`PopulateTree::All`]
    fn from_parts(fields: Vec<String>, populate: PopulateMap) -> Self {
        if fields.is_empty() && populate.is_empty() {
            PopulateTree::All
        } else {
            PopulateTree::Nested { fields, populate }
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, PopulateTree::All)
    }

    /// Number of nested levels below this node
    pub fn depth(&self) -> usize {
        match self {
            PopulateTree::All => 0,
            PopulateTree::Nested { populate, .. } => {
                1 + populate.values().map(PopulateTree::depth).max().unwrap_or(0)
            }
        }
    }

    /// JSON form: `true` or `{fields?, populate?}` with empty parts omitted
    pub fn to_value(&self) -> Value {
        match self {
            PopulateTree::All => Value::Bool(true),
            PopulateTree::Nested { fields, populate } => {
                let mut node = Map::new();
                if !fields.is_empty() {
                    node.insert(
                        "fields".to_string(),
                        Value::Array(fields.iter().cloned().map(Value::String).collect()),
                    );
                }
                if !populate.is_empty() {
                    node.insert("populate".to_string(), populate_to_value(populate));
                }
                Value::Object(node)
            }
        }
    }
}

impl Serialize for PopulateTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// JSON form of a populate map
pub fn populate_to_value(populate: &PopulateMap) -> Value {
    Value::Object(
        populate
            .iter()
            .map(|(name, tree)| (name.clone(), tree.to_value()))
            .collect(),
    )
}

/// Top-level result of a build: scalar fields and populate directives
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulateQuery {
    /// Scalar wire names of the root schema
    pub fields: Vec<String>,
    /// Directives for relations, media and components of the root schema
    pub populate: PopulateMap,
}

impl PopulateQuery {
    /// Whether anything has to be populated
    pub fn has_populate(&self) -> bool {
        !self.populate.is_empty()
    }

    /// JSON form of the populate map
    pub fn populate_value(&self) -> Value {
        populate_to_value(&self.populate)
    }
}

/// Build the fields list and populate tree for a schema
pub fn build(schema: &'static Schema) -> PopulateQuery {
    let mut builder = PopulateBuilder::default();
    let (fields, populate) = builder.scan(schema);
    PopulateQuery { fields, populate }
}

/// Per-call builder state: the schemas currently being expanded
#[derive(Debug, Default)]
struct PopulateBuilder {
    path: Vec<&'static Schema>,
}

impl PopulateBuilder {
    fn scan(&mut self, schema: &'static Schema) -> (Vec<String>, PopulateMap) {
        if self.path.iter().any(|s| std::ptr::eq(*s, schema)) {
            return (Vec::new(), PopulateMap::new());
        }

        self.path.push(schema);

        let mut fields = Vec::new();
        let mut populate = PopulateMap::new();

        for descriptor in schema.fields() {
            let wire_name = descriptor.wire_name().to_string();
            match classify_field(descriptor) {
                Classification::Scalar => fields.push(wire_name),
                Classification::Media(_) | Classification::Component(_) => {
                    populate.insert(wire_name, PopulateTree::All);
                }
                Classification::Relation { target, .. } => {
                    let (nested_fields, nested_populate) = self.scan(target);
                    populate.insert(
                        wire_name,
                        PopulateTree::from_parts(nested_fields, nested_populate),
                    );
                }
            }
        }

        self.path.pop();

        (fields, populate)
    }
}
