//! Port contracts for task-tracker backends.
//!
//! Every backend integration implements [`TaskProvider`]; the registry and
//! callers only ever see the trait object.

mod provider;

#[cfg(test)]
pub use provider::MockTaskProvider;
pub use provider::{SharedProvider, TaskProvider};
