//! Content API client
//!
//! [`StrapiClient`] wraps the transport with the document routes of the
//! REST API.
//!
//! # Features
//!
//! - **Collection Types**: get, list, fetch-all, create, update, delete
//! - **Single Types**: get, put, delete
//! - **Fetch-All Paging**: sequential offset walk, also available as a stream
//! - **Uploads**: multipart uploads to the media library with MIME guessing
//! - **Custom Routes**: raw GET/POST/PUT/DELETE below the API prefix

mod documents;
mod pagination;
mod upload;

pub use documents::{strip_reserved, StrapiClient};
pub use pagination::OffsetPager;
pub use upload::{guess_mime_type, FilePayload, UploadTarget, UPLOADED_FILES_ROUTE, UPLOAD_ROUTE};
