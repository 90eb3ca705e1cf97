//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive runtime
//! behavior and helpers to resolve config and log paths on disk.

mod load;
mod schema;

pub use load::default_log_path;
pub use schema::*;

#[cfg(test)]
mod tests;
