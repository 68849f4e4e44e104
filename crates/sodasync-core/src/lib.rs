//! sodasync-core - Core SODA document types.
//!
//! Shared types for the sodasync client: documents and pages as the wire
//! carries them, the validated endpoint URL, request credentials, and the
//! error taxonomy.

pub mod credential;
pub mod document;
pub mod error;
pub mod types;

pub use credential::Credential;
pub use document::{Document, Page};
pub use error::Error;
pub use types::EndpointUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
