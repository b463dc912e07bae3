//! YouTrack reference adapter.
//!
//! Speaks the YouTrack REST API (`/api/issues`, `/api/agiles`, project
//! custom-field bundles) and translates its vocabulary to the canonical task
//! model in both directions.

mod adapter;
pub mod models;
mod query;
mod settings;
mod translator;

pub use adapter::{MAX_TITLE_LENGTH, YOUTRACK_BACKEND, YouTrackProvider};
pub use query::build_query;
pub use settings::YouTrackSettings;
pub use translator::YouTrackTranslator;

#[cfg(test)]
mod tests;
