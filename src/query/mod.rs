//! Query module
//!
//! Request parameters for read operations and their flattening into the
//! bracketed query-string convention of the API.

mod params;
mod types;

pub use params::{extend_parameters, flatten_parameter, QueryParams};
pub use types::{DocumentQuery, Pagination, Populate, PublicationState};
