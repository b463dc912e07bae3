//! Built-in adapters that need no remote backend.

pub mod memory;

pub use memory::{InMemoryTaskProvider, MEMORY_BACKEND, MemorySettings};
