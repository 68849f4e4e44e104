//! Observable in-memory cache of one remote collection.

use futures_util::StreamExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use sodasync_core::error::{DecodeError, InvalidInputError};
use sodasync_core::{Document, Error, Result};

use crate::client::SodaClient;

/// The authoritative, observable in-memory cache of one collection.
///
/// Construct one store per collection at process start and hand it by
/// reference to every consumer; there is no ambient global instance. The
/// cache is an ordered document list published through
/// [`tokio::sync::watch`] channels: presentation layers subscribe via
/// [`items`](Self::items) and [`loading`](Self::loading) and treat the
/// received snapshots as read-only.
///
/// Every cache mutation goes through `send_modify`/`send_replace` and
/// never suspends while half-applied, so observers only ever see
/// consistent states.
pub struct SyncStore<T> {
    client: SodaClient,
    collection: String,
    items: watch::Sender<Vec<Document<T>>>,
    loading: watch::Sender<bool>,
}

impl<T> SyncStore<T> {
    /// Create a store for `collection` with an empty cache.
    pub fn new(client: SodaClient, collection: impl Into<String>) -> Self {
        let (items, _) = watch::channel(Vec::new());
        let (loading, _) = watch::channel(false);

        Self {
            client,
            collection: collection.into(),
            items,
            loading,
        }
    }

    /// Returns the collection this store caches.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Subscribe to the ordered document list.
    pub fn items(&self) -> watch::Receiver<Vec<Document<T>>> {
        self.items.subscribe()
    }

    /// Subscribe to the loading flag.
    pub fn loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Returns true while a refresh or save is in flight.
    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// A point-in-time copy of the ordered document list.
    pub fn snapshot(&self) -> Vec<Document<T>>
    where
        T: Clone,
    {
        self.items.borrow().clone()
    }

    /// Find a cached document by id.
    pub fn document(&self, id: &str) -> Option<Document<T>>
    where
        T: Clone,
    {
        self.items.borrow().iter().find(|doc| doc.id == id).cloned()
    }

    /// Replace the value of the cached document `id` in place, keeping
    /// its position in the list.
    ///
    /// Does nothing when `id` is not cached; never inserts. A
    /// read-modify-write racing a concurrent refresh is dropped rather
    /// than appended out of order.
    pub fn apply_update(&self, id: &str, new_value: T) {
        self.items
            .send_modify(|items| match items.iter_mut().find(|doc| doc.id == id) {
                Some(document) => document.value = Some(new_value),
                None => debug!(id, "apply_update for uncached document, dropped"),
            });
    }

    /// Append a document to the end of the ordered cache.
    pub fn apply_insert(&self, document: Document<T>) {
        self.items.send_modify(|items| items.push(document));
    }

    /// Re-fetch the whole collection into the cache.
    ///
    /// At most one refresh runs at a time: while the loading flag is set
    /// (by a refresh or by a save) further calls return immediately
    /// without effect. Otherwise the cache is cleared up front and
    /// repopulated in arrival order as pages drain, so observers see
    /// documents appear incrementally.
    ///
    /// On a mid-drain failure the cache keeps whatever arrived before
    /// the failure, the loading flag is cleared, and the error is
    /// returned to the caller. Nothing is retried.
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn refresh_all(&self, page_size: Option<u64>) -> Result<()>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let started = self.loading.send_if_modified(|loading| {
            if *loading {
                false
            } else {
                *loading = true;
                true
            }
        });
        if !started {
            debug!("refresh already in flight, skipping");
            return Ok(());
        }

        self.items.send_modify(Vec::clear);

        let mut documents = self.client.list_all::<T>(&self.collection, page_size);
        let result = loop {
            match documents.next().await {
                Some(Ok(document)) => self.items.send_modify(|items| items.push(document)),
                Some(Err(err)) => {
                    warn!(error = %err, "refresh aborted mid-drain");
                    break Err(err);
                }
                None => break Ok(()),
            }
        };

        self.loading.send_replace(false);
        result
    }

    /// Fetch one document's payload from the remote store.
    ///
    /// The cache is not touched; pushing the fetched value into the
    /// cache is the caller's explicit follow-up via
    /// [`apply_update`](Self::apply_update).
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn fetch_one(&self, id: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let document = self.client.fetch_one::<T>(&self.collection, id).await?;
        document
            .value
            .ok_or_else(|| Error::Decode(DecodeError::MissingValue { id: id.to_string() }))
    }

    /// Write a document to the remote store and reconcile the cache.
    ///
    /// A draft (empty id) is inserted and appended to the cache; the
    /// returned document carries the server-assigned id and etag. Any
    /// other document is updated in place and returned unchanged; the
    /// etag is not refreshed from the server. The loading flag is held
    /// for the duration of the remote call; independent saves are
    /// last-writer-wins on the cache.
    #[instrument(skip(self, document), fields(collection = %self.collection, id = %document.id))]
    pub async fn save(&self, document: Document<T>) -> Result<Document<T>>
    where
        T: Clone + Serialize + DeserializeOwned,
    {
        self.loading.send_replace(true);
        let result = self.save_remote(document).await;
        self.loading.send_replace(false);
        result
    }

    async fn save_remote(&self, document: Document<T>) -> Result<Document<T>>
    where
        T: Clone + Serialize + DeserializeOwned,
    {
        if document.is_draft() {
            let value = document.value.ok_or(valueless())?;
            let created = self.client.insert(&self.collection, value).await?;
            self.apply_insert(created.clone());
            Ok(created)
        } else {
            let value = document.value.clone().ok_or(valueless())?;
            self.client
                .update(&self.collection, &document.id, &value)
                .await?;
            self.apply_update(&document.id, value);
            Ok(document)
        }
    }
}

fn valueless() -> Error {
    Error::InvalidInput(InvalidInputError::ValuelessDocument)
}
