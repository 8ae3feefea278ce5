//! Error types produced by the attribute registry.

mod aggregate;
mod constructors;
mod conversions;
mod types;

pub use aggregate::AggregatedErrors;
pub use types::AttrError;
