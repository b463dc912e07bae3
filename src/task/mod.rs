//! Canonical task model for Trackbridge.
//!
//! Every provider adapter translates its backend schema to and from the types
//! in [`domain`]. The model is pure data plus side-effect-free queries; it has
//! no knowledge of adapters, transports, or the registry.
//!
//! - Task, status, priority, and type vocabulary in [`domain`]
//! - Board layout types used for pass-through board listings
//! - Canonical filters and working-context defaults

pub mod domain;

#[cfg(test)]
mod tests;
