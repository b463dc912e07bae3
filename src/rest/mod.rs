//! Rate-limited, retrying REST client shared by HTTP-backed adapters.
//!
//! Every outbound attempt takes one token from a per-adapter bucket, carries
//! the configured timeout and credentials, and is bounded by the caller's
//! [`CallContext`]. Non-2xx responses become [`HttpError`]s, which are
//! classified into [`ProviderError`](crate::provider::domain::ProviderError)
//! kinds at this boundary.

mod auth;
mod batch;
mod cache;
mod client;
mod context;
mod error;
mod rate_limit;
mod retry;

pub use batch::{BatchAbort, sequential_batch};
pub use cache::TtlCache;
pub use client::RestClient;
pub use context::{CallContext, CallInterrupted};
pub use error::{BackendErrorBody, HttpError, classify_status};
pub use rate_limit::RateLimiter;
pub use retry::{backoff_delay, with_retry};

#[cfg(test)]
mod tests;
