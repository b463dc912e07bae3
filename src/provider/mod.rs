//! Provider adapter abstraction.
//!
//! Backends are reached through one contract, [`ports::TaskProvider`], and
//! report failures through one taxonomy, [`domain::ProviderError`]. The module
//! follows the crate's hexagonal layout:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - In-process adapters in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
