//! Schema declaration types
//!
//! A [`Schema`] is an ordered, immutable table of [`FieldDescriptor`]s built
//! once through [`SchemaBuilder`]. Relation targets are stored as
//! [`SchemaRef`] function pointers, so schemas may reference each other in
//! cycles without any of them being built first.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Lazily resolved reference to a statically declared schema
pub type SchemaRef = fn() -> &'static Schema;

/// Wire name of the numeric identifier carried by every addressable record
pub const IDENTIFIER: &str = "id";

/// Wire name of the string document identifier
pub const DOCUMENT_ID: &str = "documentId";

/// Field names the API manages itself and rejects in write bodies
pub const RESERVED_FIELDS: &[&str] = &[
    "id",
    "documentId",
    "createdAt",
    "updatedAt",
    "publishedAt",
    "createdBy",
    "updatedBy",
    "publishedBy",
];

/// What sort of structure a schema describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    /// An addressable content entry with its own identifier
    Document,
    /// An embeddable sub-structure without an identifier of its own
    Component,
    /// An uploaded file record
    Media,
}

impl SchemaKind {
    /// Whether records of this kind carry their own identifier
    pub fn is_addressable(self) -> bool {
        !matches!(self, SchemaKind::Component)
    }
}

/// Declared type of a field
#[derive(Clone)]
pub enum FieldType {
    Text,
    Integer,
    Float,
    Boolean,
    DateTime,
    Date,
    Json,
    /// The null type; only meaningful as a union alternative
    Null,
    Optional(Box<FieldType>),
    List(Box<FieldType>),
    Union(Vec<FieldType>),
    /// A record-like type described by another schema
    Record(SchemaRef),
    /// Any other type the classifier does not know about
    Opaque(String),
}

impl FieldType {
    /// `T | null`
    pub fn optional(inner: FieldType) -> Self {
        FieldType::Optional(Box::new(inner))
    }

    /// `list<T>`
    pub fn list(inner: FieldType) -> Self {
        FieldType::List(Box::new(inner))
    }

    /// A single related record
    pub fn record(target: SchemaRef) -> Self {
        FieldType::Record(target)
    }

    /// An optional related record
    pub fn optional_record(target: SchemaRef) -> Self {
        Self::optional(FieldType::Record(target))
    }

    /// A list of related records
    pub fn records(target: SchemaRef) -> Self {
        Self::list(FieldType::Record(target))
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Text => write!(f, "Text"),
            FieldType::Integer => write!(f, "Integer"),
            FieldType::Float => write!(f, "Float"),
            FieldType::Boolean => write!(f, "Boolean"),
            FieldType::DateTime => write!(f, "DateTime"),
            FieldType::Date => write!(f, "Date"),
            FieldType::Json => write!(f, "Json"),
            FieldType::Null => write!(f, "Null"),
            FieldType::Optional(inner) => write!(f, "Optional({inner:?})"),
            FieldType::List(inner) => write!(f, "List({inner:?})"),
            FieldType::Union(alternatives) => f.debug_tuple("Union").field(alternatives).finish(),
            // Only the name: printing the target's fields would loop on cycles
            FieldType::Record(target) => write!(f, "Record({})", target().name()),
            FieldType::Opaque(name) => write!(f, "Opaque({name})"),
        }
    }
}

/// One declared field of a schema
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Declared (Rust-side) field name
    pub name: String,
    /// Declared type, possibly wrapped
    pub field_type: FieldType,
    /// Name used on the wire, when it differs from the declared name
    pub alias: Option<String>,
    /// Part of the natural key used by upserts
    pub unique: bool,
    /// Explicitly marked as a relation
    pub relation: bool,
    /// Maintained by the server; never written by the client
    pub managed: bool,
}

impl FieldDescriptor {
    /// Create a plain field descriptor
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            alias: None,
            unique: false,
            relation: false,
            managed: false,
        }
    }

    /// Set the wire alias
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Mark as unique
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Mark as relation
    #[must_use]
    pub fn relation(mut self) -> Self {
        self.relation = true;
        self
    }

    /// Mark as server-managed
    #[must_use]
    pub fn managed(mut self) -> Self {
        self.managed = true;
        self
    }

    /// Name to use in queries and bodies
    pub fn wire_name(&self) -> &str {
        super::classify::resolve_name(&self.name, self)
    }
}

/// Static description of a record type
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    kind: SchemaKind,
    fields: Vec<FieldDescriptor>,
    plural_api_id: String,
    single_api_id: String,
}

impl Schema {
    /// Start declaring an addressable document schema
    pub fn document(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name, SchemaKind::Document)
    }

    /// Start declaring a component schema
    pub fn component(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name, SchemaKind::Component)
    }

    /// Start declaring a media schema
    pub fn media(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name, SchemaKind::Media)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    /// Field descriptors in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// API identifier of the collection (e.g. `blog-posts`)
    pub fn plural_api_id(&self) -> &str {
        &self.plural_api_id
    }

    /// API identifier of the single type (e.g. `blog-post`)
    pub fn single_api_id(&self) -> &str {
        &self.single_api_id
    }

    /// Look up a field by declared name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a field by wire name
    pub fn field_by_wire_name(&self, wire_name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.wire_name() == wire_name)
    }

    /// Unique fields that the client is allowed to write
    pub fn unique_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.unique && !f.managed)
    }
}

/// Builder for [`Schema`]
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    kind: SchemaKind,
    fields: Vec<FieldDescriptor>,
    naming: fn(&str) -> String,
    plural_api_id: Option<String>,
    single_api_id: Option<String>,
}

impl SchemaBuilder {
    fn new(name: impl Into<String>, kind: SchemaKind) -> Self {
        Self {
            name: name.into(),
            kind,
            fields: Vec::new(),
            naming: kebab_case,
            plural_api_id: None,
            single_api_id: None,
        }
    }

    /// Add a field
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldDescriptor::new(name, field_type));
        self
    }

    /// Add a fully configured field
    #[must_use]
    pub fn descriptor(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// Add the standard fields every stored document carries
    #[must_use]
    pub fn document_fields(mut self) -> Self {
        self.fields.extend([
            FieldDescriptor::new("id", FieldType::optional(FieldType::Integer))
                .unique()
                .managed(),
            FieldDescriptor::new("document_id", FieldType::optional(FieldType::Text))
                .alias(DOCUMENT_ID)
                .unique()
                .managed(),
            FieldDescriptor::new("created_at", FieldType::optional(FieldType::DateTime))
                .alias("createdAt")
                .managed(),
            FieldDescriptor::new("updated_at", FieldType::optional(FieldType::DateTime))
                .alias("updatedAt")
                .managed(),
            FieldDescriptor::new("published_at", FieldType::optional(FieldType::DateTime))
                .alias("publishedAt")
                .managed(),
        ]);
        self
    }

    /// Add the optional `locale` field of localized documents
    #[must_use]
    pub fn locale(self) -> Self {
        self.field("locale", FieldType::optional(FieldType::Text))
    }

    /// Naming convention used to derive API identifiers from the schema name
    #[must_use]
    pub fn naming(mut self, naming: fn(&str) -> String) -> Self {
        self.naming = naming;
        self
    }

    /// Explicit collection API identifier
    #[must_use]
    pub fn plural_api_id(mut self, id: impl Into<String>) -> Self {
        self.plural_api_id = Some(id.into());
        self
    }

    /// Explicit single type API identifier
    #[must_use]
    pub fn single_api_id(mut self, id: impl Into<String>) -> Self {
        self.single_api_id = Some(id.into());
        self
    }

    /// Finish the declaration
    pub fn build(self) -> Schema {
        let single = self
            .single_api_id
            .unwrap_or_else(|| (self.naming)(&self.name));
        let plural = self
            .plural_api_id
            .unwrap_or_else(|| format!("{}s", (self.naming)(&self.name)));
        Schema {
            name: self.name,
            kind: self.kind,
            fields: self.fields,
            plural_api_id: plural,
            single_api_id: single,
        }
    }
}

/// Default naming convention: `BlogPost` → `blog-post`
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// A typed record bound to its schema
///
/// The `Serialize` implementation must emit the same wire names as the
/// schema's descriptors (use `#[serde(rename = "...")]` for aliased fields).
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The static schema describing this record
    fn schema() -> &'static Schema;
}
