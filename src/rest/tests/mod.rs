//! Unit tests for the REST plumbing that needs no HTTP server.

mod backoff_tests;
