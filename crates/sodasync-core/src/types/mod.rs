//! Core endpoint types.
//!
//! These types enforce interface invariants at construction time,
//! ensuring invalid states are unrepresentable.

mod endpoint_url;

pub use endpoint_url::EndpointUrl;
