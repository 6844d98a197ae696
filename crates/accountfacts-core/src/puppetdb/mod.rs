//! External fact-query collaborator: the PuppetDB v4 query API.
//!
//! The core treats PuppetDB as an opaque source of fact fragments; this
//! module owns query construction, the blocking HTTP client with
//! optional mutual TLS, and the opt-in fetch-result cache.

pub mod cache;
pub mod client;
pub mod query;
