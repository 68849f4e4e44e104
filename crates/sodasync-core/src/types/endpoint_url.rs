//! Endpoint URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated base URL of a SODA document service.
///
/// The base URL points at the service root (for Oracle REST Data Services
/// typically `https://host/ords/<schema>/soda/latest`); collection and
/// document URLs are derived from it.
///
/// URLs must use HTTPS; HTTP is allowed only for localhost, which keeps
/// test servers reachable without weakening production deployments.
///
/// # Example
///
/// ```
/// use sodasync_core::EndpointUrl;
///
/// let endpoint = EndpointUrl::new("https://db.example.com/ords/admin/soda/latest").unwrap();
/// assert_eq!(
///     endpoint.collection_url("fruit"),
///     "https://db.example.com/ords/admin/soda/latest/fruit"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EndpointUrl(Url);

impl EndpointUrl {
    /// Create a new endpoint URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet
    /// requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::EndpointUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        // Normalize: remove trailing slash
        let normalized = if url.path() == "/" {
            let mut u = url.clone();
            u.set_path("");
            u
        } else {
            url
        };

        Ok(Self(normalized))
    }

    /// Returns the listing URL for a collection.
    pub fn collection_url(&self, collection: &str) -> String {
        // The URL crate always adds a trailing slash to root paths,
        // so trim before appending the collection segment
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}/{}", base, collection)
    }

    /// Returns the URL for a single document of a collection.
    pub fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}", self.collection_url(collection), id)
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    /// Returns the URL scheme (e.g., "https", "http").
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        // Must be absolute
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::EndpointUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        let scheme = url.scheme();

        // Must be HTTPS (or HTTP for localhost)
        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "::1");

        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(InvalidInputError::EndpointUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
            }
            .into());
        }

        // Must have a host
        if url.host_str().is_none() {
            return Err(InvalidInputError::EndpointUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EndpointUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for EndpointUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for EndpointUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EndpointUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for EndpointUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_https_url() {
        let endpoint = EndpointUrl::new("https://db.example.com/ords/admin/soda/latest").unwrap();
        assert_eq!(endpoint.host(), Some("db.example.com"));
    }

    #[test]
    fn valid_localhost_http() {
        let endpoint = EndpointUrl::new("http://localhost:8080").unwrap();
        assert_eq!(endpoint.host(), Some("localhost"));
    }

    #[test]
    fn collection_url_construction() {
        let endpoint = EndpointUrl::new("https://db.example.com/ords/admin/soda/latest").unwrap();
        assert_eq!(
            endpoint.collection_url("fruit"),
            "https://db.example.com/ords/admin/soda/latest/fruit"
        );
    }

    #[test]
    fn document_url_construction() {
        let endpoint = EndpointUrl::new("https://db.example.com/soda/latest").unwrap();
        assert_eq!(
            endpoint.document_url("fruit", "0D856B76"),
            "https://db.example.com/soda/latest/fruit/0D856B76"
        );
    }

    #[test]
    fn normalizes_trailing_slash() {
        let endpoint = EndpointUrl::new("https://db.example.com/").unwrap();
        assert_eq!(
            endpoint.collection_url("fruit"),
            "https://db.example.com/fruit"
        );
    }

    #[test]
    fn invalid_http_non_localhost() {
        assert!(EndpointUrl::new("http://db.example.com").is_err());
    }

    #[test]
    fn invalid_relative_url() {
        assert!(EndpointUrl::new("/soda/latest").is_err());
    }
}
