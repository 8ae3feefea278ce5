//! Test helpers shared across crates.
//!
//! This crate provides `figment::Jail` wrappers and the cookbook manifest
//! fixtures used by unit, integration and behavioural tests.

pub mod figment;
pub mod fixtures;
