//! HTTP client for the SODA document-collection API.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};

use sodasync_core::error::{DecodeError, NetworkError, StatusError};
use sodasync_core::{Credential, Document, EndpointUrl, Error, Page, Result};

/// HTTP client for a SODA document-collection endpoint.
///
/// The client is stateless per call: it builds authenticated requests,
/// decodes responses, and implements the pagination-draining protocol.
/// Cloning is cheap; clones share the underlying connection pool.
///
/// No timeout or retry policy is imposed here; transport failures
/// propagate immediately as [`Error::Network`].
#[derive(Debug, Clone)]
pub struct SodaClient {
    client: reqwest::Client,
    endpoint: EndpointUrl,
    credential: Credential,
}

/// Query parameters for a collection listing.
#[derive(Debug, Serialize)]
struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<u64>,
}

impl SodaClient {
    /// Create a new client for the given endpoint and credential.
    pub fn new(endpoint: EndpointUrl, credential: Credential) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sodasync/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            endpoint,
            credential,
        }
    }

    /// Returns the endpoint URL this client is configured for.
    pub fn endpoint(&self) -> &EndpointUrl {
        &self.endpoint
    }

    /// Fetch one page of a collection listing.
    ///
    /// Parameters left as `None` are omitted from the request, letting
    /// the server defaults apply.
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn list_page<T>(
        &self,
        collection: &str,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Page<T>>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint.collection_url(collection);
        debug!("listing documents");

        let response = self
            .client
            .get(&url)
            .query(&ListQuery { limit, offset })
            .headers(self.auth_headers())
            .send()
            .await
            .map_err(transport_error)?;

        decode_response(response, "page response").await
    }

    /// List every document of a collection as a lazy async stream.
    ///
    /// Pages are fetched strictly in sequence: all items of a page are
    /// yielded, in order, before the next page is requested. The next
    /// request continues from `offset + count` of the page just
    /// received, carrying the page's own limit forward, until the server
    /// reports no further pages.
    ///
    /// The stream is forward-only and not restartable; call `list_all`
    /// again for a fresh drain from offset zero. Dropping the stream
    /// stops any further page requests.
    ///
    /// A `page_size` of `None` lets the server's default page size apply.
    pub fn list_all<T>(&self, collection: &str, page_size: Option<u64>) -> DocumentStream<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let client = self.clone();
        let collection = collection.to_string();

        let stream = async_stream::stream! {
            let mut limit = page_size;
            let mut offset: Option<u64> = None;

            loop {
                let page: Page<T> = match client.list_page(&collection, limit, offset).await {
                    Ok(page) => page,
                    Err(err) => {
                        yield Err(err);
                        break;
                    }
                };

                let has_more = page.has_more;
                let next_offset = page.next_offset();
                let next_limit = page.limit;
                trace!(count = page.count, has_more, "page received");

                for document in page.items {
                    yield Ok(document);
                }

                if !has_more {
                    break;
                }

                offset = Some(next_offset);
                limit = next_limit;
            }
        };

        DocumentStream::new(stream)
    }

    /// Fetch a single document by id.
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn fetch_one<T>(&self, collection: &str, id: &str) -> Result<Document<T>>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint.document_url(collection, id);
        debug!("fetching document");

        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers())
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }

        decode_response(response, "document response").await
    }

    /// Replace a document's body with `payload`.
    ///
    /// The server is not assumed to echo the updated document; success
    /// returns nothing.
    #[instrument(skip(self, payload), fields(endpoint = %self.endpoint))]
    pub async fn update<T>(&self, collection: &str, id: &str, payload: &T) -> Result<()>
    where
        T: Serialize,
    {
        let url = self.endpoint.document_url(collection, id);
        debug!("updating document");

        let response = self
            .client
            .put(&url)
            .headers(self.auth_headers())
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        if status == StatusCode::CONFLICT || status == StatusCode::PRECONDITION_FAILED {
            return Err(Error::Conflict {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        if !status.is_success() {
            return Err(status_error(status, response).await);
        }

        Ok(())
    }

    /// Create a new document from `payload`.
    ///
    /// The server's insert response wraps a metadata-only document in a
    /// single-item page; the caller-supplied payload is reattached so the
    /// returned document is complete, id and etag included.
    #[instrument(skip(self, payload), fields(endpoint = %self.endpoint))]
    pub async fn insert<T>(&self, collection: &str, payload: T) -> Result<Document<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        let url = self.endpoint.collection_url(collection);
        debug!("inserting document");

        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers())
            .json(&payload)
            .send()
            .await
            .map_err(transport_error)?;

        let page: Page<T> = decode_response(response, "insert response").await?;
        let mut document = page.items.into_iter().next().ok_or_else(|| {
            Error::Decode(DecodeError::MissingDocument {
                context: "insert response".to_string(),
            })
        })?;

        document.value = Some(payload);
        Ok(document)
    }

    /// Authorization and content-type headers for every request.
    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&self.credential.header_value())
                .expect("invalid credential characters"),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}

/// A lazy stream of documents produced by [`SodaClient::list_all`].
///
/// Consumers observe items incrementally as pages complete, not only at
/// the end of the drain. Dropping the stream cancels the drain; no
/// further page requests are issued.
pub struct DocumentStream<T> {
    inner: Pin<Box<dyn Stream<Item = Result<Document<T>>> + Send>>,
}

impl<T> DocumentStream<T> {
    /// Create a new stream from an async stream.
    fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Document<T>>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
        }
    }
}

impl<T> Stream for DocumentStream<T> {
    type Item = Result<Document<T>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

/// Map a request-level reqwest failure onto the transport taxonomy.
fn transport_error(err: reqwest::Error) -> Error {
    let network = if err.is_timeout() {
        NetworkError::Timeout { duration_ms: 0 }
    } else if err.is_connect() {
        NetworkError::Connection {
            message: err.to_string(),
        }
    } else {
        NetworkError::Http {
            message: err.to_string(),
        }
    };
    Error::Network(network)
}

/// Decode a response body, mapping non-success statuses and malformed
/// bodies onto the error taxonomy.
async fn decode_response<R>(response: reqwest::Response, context: &str) -> Result<R>
where
    R: DeserializeOwned,
{
    let status = response.status();
    trace!(status = %status, "response received");

    if !status.is_success() {
        return Err(status_error(status, response).await);
    }

    let body = response.text().await.map_err(transport_error)?;

    serde_json::from_str(&body).map_err(|source| {
        Error::Decode(DecodeError::Json {
            context: context.to_string(),
            source,
        })
    })
}

/// Build a status error, attaching the response body when one is readable.
async fn status_error(status: StatusCode, response: reqwest::Response) -> Error {
    let message = response.text().await.ok().filter(|body| !body.is_empty());
    Error::Network(NetworkError::Status(StatusError::new(
        status.as_u16(),
        message,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let endpoint = EndpointUrl::new("https://db.example.com/soda/latest").unwrap();
        let client = SodaClient::new(endpoint.clone(), Credential::basic("ADMIN", "secret"));
        assert_eq!(client.endpoint().as_str(), endpoint.as_str());
    }

    #[test]
    fn list_query_omits_absent_params() {
        let query = serde_json::to_value(ListQuery {
            limit: Some(100),
            offset: None,
        })
        .unwrap();
        assert_eq!(query, serde_json::json!({ "limit": 100 }));
    }
}
