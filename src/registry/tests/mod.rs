//! Unit tests for the provider registry.
