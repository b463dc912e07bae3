//! Token-bucket request pacing.

use super::CallContext;
use crate::provider::domain::{ProviderError, ProviderResult, RateLimitConfig};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter as GovernorRateLimiter};
use std::fmt;
use std::num::NonZeroU32;

/// Token bucket sized by requests per second and burst.
///
/// Waiting for a token honours the caller's deadline and cancellation; a
/// request is never dropped.
pub struct RateLimiter {
    inner: DefaultDirectRateLimiter,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Creates a full bucket.
    ///
    /// # Errors
    ///
    /// Returns a `configuration` error when the rate or burst is zero.
    pub fn new(config: RateLimitConfig) -> ProviderResult<Self> {
        let rate = NonZeroU32::new(config.requests_per_second)
            .ok_or_else(|| ProviderError::configuration("requests per second must be positive"))?;
        let burst = NonZeroU32::new(config.burst)
            .ok_or_else(|| ProviderError::configuration("burst must be positive"))?;
        let quota = Quota::per_second(rate).allow_burst(burst);
        Ok(Self {
            inner: GovernorRateLimiter::direct(quota),
            config,
        })
    }

    /// Waits for one token.
    ///
    /// # Errors
    ///
    /// Returns an `internal` error when the context expires or is cancelled
    /// before a token is available.
    pub async fn acquire(&self, ctx: &CallContext) -> ProviderResult<()> {
        ctx.run("rate limiter wait", async {
            self.inner.until_ready().await;
            Ok(())
        })
        .await
    }

    /// Returns the bucket configuration.
    #[must_use]
    pub const fn config(&self) -> RateLimitConfig {
        self.config
    }
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
