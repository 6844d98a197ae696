//! Report renderers.
//!
//! JSON and HTML consume the normalized (grouped) records; CSV consumes
//! the denormalized flat rows, since a delimited file cannot represent
//! nested structure.

pub mod csv;
pub mod html;
pub mod json;
