//! Reconstruction and reconciliation engine.
//!
//! Control flow: [`fragments::FragmentIndex`] → [`reconstruct`] →
//! (user records, group records) → [`reconcile`] (group reports only) →
//! [`normalize`] or [`denormalize`] → render.

pub mod denormalize;
pub mod fragments;
pub mod normalize;
pub mod reconcile;
pub mod reconstruct;
