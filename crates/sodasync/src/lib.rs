//! sodasync - Paginated document-sync client for SODA document stores.
//!
//! [`SodaClient`] speaks the document-collection API over HTTP: paginated
//! listing, single-document fetch, full-replace update, and insert.
//! [`SyncStore`] owns an observable in-memory cache of one collection and
//! keeps it consistent with the remote store.
//!
//! # Example
//!
//! ```no_run
//! use serde::{Deserialize, Serialize};
//! use sodasync::{Credential, EndpointUrl, SodaClient, SyncStore};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Fruit {
//!     name: String,
//!     count: i64,
//!     #[serde(default, skip_serializing_if = "Option::is_none")]
//!     color: Option<String>,
//! }
//!
//! # async fn example() -> Result<(), sodasync::Error> {
//! let endpoint = EndpointUrl::new("https://db.example.com/ords/admin/soda/latest")?;
//! let client = SodaClient::new(endpoint, Credential::basic("ADMIN", "secret"));
//!
//! let store: SyncStore<Fruit> = SyncStore::new(client, "fruit");
//! store.refresh_all(Some(100)).await?;
//!
//! for document in store.snapshot() {
//!     println!("{}: {:?}", document.id, document.value);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod store;

pub use client::{DocumentStream, SodaClient};
pub use store::SyncStore;

// Re-export the core types so callers need only one crate.
pub use sodasync_core::{Credential, Document, EndpointUrl, Error, Page, Result, error};
