//! Trackbridge: one task model over many issue trackers.
//!
//! This crate lets callers work with tasks, statuses and boards without
//! knowing which tracker stores them. Backend adapters translate a canonical
//! model to each tracker's vocabulary and wire format, and a registry keeps
//! the configured adapters by name.
//!
//! # Architecture
//!
//! Trackbridge follows hexagonal architecture principles:
//!
//! - **Domain**: the canonical task model and the provider error taxonomy
//! - **Ports**: the [`provider::ports::TaskProvider`] contract
//! - **Adapters**: the YouTrack adapter over a paced REST client, and an
//!   in-memory backend
//!
//! # Modules
//!
//! - [`task`]: canonical tasks, statuses, filters and boards
//! - [`provider`]: adapter contract, configuration, errors and capabilities
//! - [`rest`]: rate-limited, retrying REST client and call contexts
//! - [`youtrack`]: YouTrack adapter and schema translation
//! - [`registry`]: named adapter registry with start-up health checks
//! - [`telemetry`]: tracing subscriber set-up

pub mod provider;
pub mod registry;
pub mod rest;
pub mod task;
pub mod telemetry;
pub mod youtrack;
