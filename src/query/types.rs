//! Request parameter types
//!
//! [`DocumentQuery`] collects everything a read request can carry and turns
//! it into flat query parameters.

use super::params::{extend_parameters, QueryParams};
use crate::schema::{populate_to_value, PopulateMap, PopulateQuery};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// What to expand in a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Populate {
    /// Every first-level relation (`populate=*`)
    All,
    /// The named relations with their default shape
    Relations(Vec<String>),
    /// Nested directives built from a schema
    Tree(PopulateMap),
}

impl Populate {
    pub fn to_value(&self) -> Value {
        match self {
            Populate::All => Value::String("*".to_string()),
            Populate::Relations(names) => {
                Value::Array(names.iter().cloned().map(Value::String).collect())
            }
            Populate::Tree(tree) => populate_to_value(tree),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Populate::All => false,
            Populate::Relations(names) => names.is_empty(),
            Populate::Tree(tree) => tree.is_empty(),
        }
    }
}

/// Page selection for list requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// Page number based (first page is 1)
    Page { page: u32, page_size: u32 },
    /// Offset based
    Offset { start: u64, limit: u32 },
}

/// Which entries to return with respect to draft/publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationState {
    /// Published entries only
    Live,
    /// Published and draft entries
    Preview,
}

impl PublicationState {
    pub fn as_str(self) -> &'static str {
        match self {
            PublicationState::Live => "live",
            PublicationState::Preview => "preview",
        }
    }
}

impl std::str::FromStr for PublicationState {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "live" => Ok(PublicationState::Live),
            "preview" => Ok(PublicationState::Preview),
            other => Err(crate::error::Error::invalid_value(
                "publicationState",
                format!("expected 'live' or 'preview', got '{other}'"),
            )),
        }
    }
}

/// Parameters of a single-document or list request
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentQuery {
    pub sort: Vec<String>,
    pub filters: Option<Value>,
    pub populate: Option<Populate>,
    pub fields: Vec<String>,
    pub pagination: Option<Pagination>,
    /// Ask the server to report the total count with the page
    pub with_count: bool,
    pub publication_state: Option<PublicationState>,
    pub locale: Option<String>,
}

impl Default for DocumentQuery {
    fn default() -> Self {
        Self {
            sort: Vec::new(),
            filters: None,
            populate: None,
            fields: Vec::new(),
            pagination: None,
            with_count: true,
            publication_state: None,
            locale: None,
        }
    }
}

impl DocumentQuery {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to the fields and populate tree built from a schema
    pub fn select(query: &PopulateQuery) -> Self {
        let mut q = Self::new();
        q.fields.clone_from(&query.fields);
        if query.has_populate() {
            q.populate = Some(Populate::Tree(query.populate.clone()));
        }
        q
    }

    /// Add a sort key (e.g. `title:asc`)
    #[must_use]
    pub fn sort(mut self, key: impl Into<String>) -> Self {
        self.sort.push(key.into());
        self
    }

    /// Set the filter tree
    #[must_use]
    pub fn filters(mut self, filters: Value) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Set the populate directive
    #[must_use]
    pub fn populate(mut self, populate: Populate) -> Self {
        self.populate = Some(populate);
        self
    }

    /// Set the fields to return
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Select a page by number
    #[must_use]
    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.pagination = Some(Pagination::Page { page, page_size });
        self
    }

    /// Select a page by offset
    #[must_use]
    pub fn offset(mut self, start: u64, limit: u32) -> Self {
        self.pagination = Some(Pagination::Offset { start, limit });
        self
    }

    /// Set whether the total count is requested
    #[must_use]
    pub fn with_count(mut self, with_count: bool) -> Self {
        self.with_count = with_count;
        self
    }

    #[must_use]
    pub fn publication_state(mut self, state: PublicationState) -> Self {
        self.publication_state = Some(state);
        self
    }

    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Flatten into bracketed query parameters
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();

        if !self.sort.is_empty() {
            extend_parameters(&mut params, "sort", &json!(self.sort));
        }
        if let Some(filters) = &self.filters {
            extend_parameters(&mut params, "filters", filters);
        }
        if let Some(populate) = self.populate.as_ref().filter(|p| !p.is_empty()) {
            extend_parameters(&mut params, "populate", &populate.to_value());
        }
        if !self.fields.is_empty() {
            extend_parameters(&mut params, "fields", &json!(self.fields));
        }
        if let Some(pagination) = self.pagination {
            let pagination = match pagination {
                Pagination::Page { page, page_size } => json!({
                    "page": page,
                    "pageSize": page_size,
                    "withCount": self.with_count,
                }),
                Pagination::Offset { start, limit } => json!({
                    "start": start,
                    "limit": limit,
                    "withCount": self.with_count,
                }),
            };
            extend_parameters(&mut params, "pagination", &pagination);
        }
        if let Some(state) = self.publication_state {
            params.insert("publicationState".to_string(), state.as_str().to_string());
        }
        if let Some(locale) = &self.locale {
            params.insert("locale".to_string(), locale.clone());
        }

        params
    }
}
