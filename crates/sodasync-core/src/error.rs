//! Error types for the sodasync library.
//!
//! This module provides a unified error type with explicit variants for
//! transport, decoding, missing-document, conflict, and input validation
//! errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for sodasync operations.
///
/// This error type covers all possible failure modes in the library,
/// with explicit variants to allow callers to handle specific cases.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, HTTP failures,
    /// non-success statuses with no more specific mapping).
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// The response body did not match the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The remote reported a missing document.
    #[error("document not found: {collection}/{id}")]
    NotFound {
        /// The collection that was queried.
        collection: String,
        /// The document id that was not found.
        id: String,
    },

    /// The remote reported a version mismatch on a write.
    #[error("version conflict writing {collection}/{id}")]
    Conflict {
        /// The collection that was written.
        collection: String,
        /// The document id the write targeted.
        id: String,
    },

    /// Input validation errors (invalid endpoint URL, unsaveable document).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// The server answered with a non-success status.
    #[error("{0}")]
    Status(StatusError),
}

/// A non-success HTTP status, with the response body when one was readable.
#[derive(Debug)]
pub struct StatusError {
    /// HTTP status code.
    pub status: u16,
    /// Response body, if present and readable.
    pub message: Option<String>,
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for StatusError {}

impl StatusError {
    /// Create a new status error.
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self { status, message }
    }
}

/// Decoding errors for response bodies.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body does not parse as the expected JSON shape.
    #[error("failed to decode {context}: {source}")]
    Json {
        /// What was being decoded (e.g. "page response").
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A response that must carry a document carried none.
    #[error("{context} contained no document")]
    MissingDocument { context: String },

    /// A single-document response omitted the payload.
    #[error("document '{id}' has no value")]
    MissingValue { id: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid endpoint URL format.
    #[error("invalid endpoint URL '{value}': {reason}")]
    EndpointUrl { value: String, reason: String },

    /// A write was requested for a document that carries no payload.
    #[error("document has no value to save")]
    ValuelessDocument,

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
