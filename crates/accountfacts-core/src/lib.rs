//! Account and group inventory reporting over PuppetDB facts.
//!
//! This crate consumes the flat fact fragments that the accountfacts
//! Facter module reports into PuppetDB, reassembles them into typed
//! user/group records, reconciles primary-group membership across the
//! two record sets, collapses duplicate-by-identity records across
//! machines while keeping provenance, and renders the result as JSON,
//! CSV, or a filterable HTML table.

pub mod config;
pub mod errors;
pub mod models;
pub mod puppetdb;
pub mod render;
pub mod report;
