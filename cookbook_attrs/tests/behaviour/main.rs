//! Behavioural tests for `cookbook_attrs` using `rstest-bdd`.
//!
//! Step implementations live in [`steps`]; [`scenarios`] binds the `.feature`
//! files under `tests/features` to the shared fixtures.

mod fixtures;
mod scenarios;
mod steps;
