//! Unit tests for provider domain types and the in-memory adapter.
