//! Request credential type.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Authorization material for requests against the document API.
///
/// The credential is injected once at client construction and applied to
/// every request. Two schemes are supported: HTTP Basic (identity and
/// secret, framed as `Basic base64("identity:secret")`) and a
/// pre-supplied bearer token.
///
/// # Security
///
/// The secret is never exposed in Debug output to prevent accidental
/// logging.
///
/// # Example
///
/// ```
/// use sodasync_core::Credential;
///
/// let credential = Credential::basic("ADMIN", "secret");
/// assert_eq!(credential.header_value(), "Basic QURNSU46c2VjcmV0");
/// ```
pub struct Credential {
    scheme: Scheme,
}

enum Scheme {
    Basic { identity: String, secret: String },
    Bearer { token: String },
}

impl Credential {
    /// Create an HTTP Basic credential.
    ///
    /// # Arguments
    ///
    /// * `identity` - The account identity (e.g. a database schema user)
    /// * `secret` - The account secret
    pub fn basic(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            scheme: Scheme::Basic {
                identity: identity.into(),
                secret: secret.into(),
            },
        }
    }

    /// Create a bearer-token credential.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            scheme: Scheme::Bearer {
                token: token.into(),
            },
        }
    }

    /// Returns the `Authorization` header value for this credential.
    ///
    /// # Security
    ///
    /// Use this only when constructing requests. Never log or display
    /// this value.
    pub fn header_value(&self) -> String {
        match &self.scheme {
            Scheme::Basic { identity, secret } => {
                let login = BASE64.encode(format!("{identity}:{secret}"));
                format!("Basic {login}")
            }
            Scheme::Bearer { token } => format!("Bearer {token}"),
        }
    }
}

// Intentionally hide the secret in Debug output
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scheme {
            Scheme::Basic { identity, .. } => f
                .debug_struct("Credential")
                .field("scheme", &"Basic")
                .field("identity", identity)
                .field("secret", &"[REDACTED]")
                .finish(),
            Scheme::Bearer { .. } => f
                .debug_struct("Credential")
                .field("scheme", &"Bearer")
                .field("token", &"[REDACTED]")
                .finish(),
        }
    }
}

// Clone is intentionally implemented to allow the credential to be reused
// across requests, but the type is not Copy to keep credential passing
// explicit.
impl Clone for Credential {
    fn clone(&self) -> Self {
        Self {
            scheme: match &self.scheme {
                Scheme::Basic { identity, secret } => Scheme::Basic {
                    identity: identity.clone(),
                    secret: secret.clone(),
                },
                Scheme::Bearer { token } => Scheme::Bearer {
                    token: token.clone(),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_header_framing() {
        let credential = Credential::basic("ADMIN", "secret");
        assert_eq!(credential.header_value(), "Basic QURNSU46c2VjcmV0");
    }

    #[test]
    fn bearer_header_framing() {
        let credential = Credential::bearer("tok-123");
        assert_eq!(credential.header_value(), "Bearer tok-123");
    }

    #[test]
    fn credential_hides_secret_in_debug() {
        let credential = Credential::basic("ADMIN", "secret123");
        let debug = format!("{:?}", credential);
        assert!(debug.contains("ADMIN"));
        assert!(!debug.contains("secret123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn bearer_hides_token_in_debug() {
        let credential = Credential::bearer("tok-123");
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("tok-123"));
        assert!(debug.contains("[REDACTED]"));
    }
}
