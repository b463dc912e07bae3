//! Paced, retrying JSON client bound to one adapter configuration.

use super::auth::RequestAuth;
use super::error::transport_error;
use super::{CallContext, HttpError, RateLimiter, with_retry};
use crate::provider::domain::{AdapterConfig, ErrorKind, ProviderError, ProviderResult, RetryPolicy};
use reqwest::header::RETRY_AFTER;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// HTTP client for one adapter.
///
/// Owns the pooled `reqwest` client, the token bucket, and the retry policy.
/// The pool is shared safely by concurrent callers.
#[derive(Debug)]
pub struct RestClient {
    provider: String,
    http: RwLock<Option<reqwest::Client>>,
    base: String,
    limiter: RateLimiter,
    retry: RetryPolicy,
    timeout: Duration,
    auth: RequestAuth,
}

impl RestClient {
    /// Builds a client from an adapter configuration.
    ///
    /// # Errors
    ///
    /// Returns a `configuration` error when the configuration is invalid,
    /// has no base URL, or carries unusable credentials.
    pub fn new(config: &AdapterConfig) -> ProviderResult<Self> {
        config.validate()?;
        let base_url = config.connection.base_url.as_deref().ok_or_else(|| {
            ProviderError::configuration(format!(
                "provider '{}' requires connection.base_url",
                config.name
            ))
            .with_context("field", "connection.base_url")
        })?;
        let mut base = base_url.trim_end_matches('/').to_owned();
        if let Some(version) = config
            .connection
            .api_version
            .as_deref()
            .map(|version| version.trim_matches('/'))
            .filter(|version| !version.is_empty())
        {
            base.push('/');
            base.push_str(version);
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| {
                ProviderError::with_cause(
                    ErrorKind::Configuration,
                    "failed to build HTTP client",
                    err,
                )
            })?;

        Ok(Self {
            provider: config.name.clone(),
            http: RwLock::new(Some(http)),
            base,
            limiter: RateLimiter::new(config.rate_limit)?,
            retry: config.retry,
            timeout: config.timeout(),
            auth: RequestAuth::from_config(&config.auth)?,
        })
    }

    /// Returns the absolute URL for `path`.
    ///
    /// # Errors
    ///
    /// Returns an `internal` error when the result is not a valid URL.
    pub fn endpoint(&self, path: &str) -> ProviderResult<Url> {
        let joined = format!("{}/{}", self.base, path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|err| {
            ProviderError::with_cause(ErrorKind::Internal, format!("invalid URL '{joined}'"), err)
        })
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends a GET and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the last attempt.
    pub async fn get_json<T>(
        &self,
        ctx: &CallContext,
        path: &str,
        query: &[(&str, String)],
    ) -> ProviderResult<T>
    where
        T: DeserializeOwned,
    {
        let body = self.execute(ctx, Method::GET, path, query, None).await?;
        decode(path, &body)
    }

    /// Sends a POST with a JSON body and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the last attempt.
    pub async fn post_json<B, T>(
        &self,
        ctx: &CallContext,
        path: &str,
        query: &[(&str, String)],
        payload: &B,
    ) -> ProviderResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let encoded = serde_json::to_value(payload).map_err(|err| {
            ProviderError::with_cause(
                ErrorKind::Internal,
                format!("failed to encode request for {path}"),
                err,
            )
        })?;
        let body = self
            .execute(ctx, Method::POST, path, query, Some(encoded))
            .await?;
        decode(path, &body)
    }

    /// Sends a DELETE, discarding the response body.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the last attempt.
    pub async fn delete(&self, ctx: &CallContext, path: &str) -> ProviderResult<()> {
        self.execute(ctx, Method::DELETE, path, &[], None)
            .await
            .map(|_| ())
    }

    /// Sends one GET without retrying, for health checks.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the single attempt.
    pub async fn probe(&self, ctx: &CallContext, path: &str) -> ProviderResult<()> {
        self.attempt(ctx, &Method::GET, path, &[], None)
            .await
            .map(|_| ())
    }

    /// Drops the connection pool. Later requests fail with `internal`.
    pub fn close(&self) {
        if let Ok(mut http) = self.http.write()
            && http.take().is_some()
        {
            debug!(provider = %self.provider, "closed REST client");
        }
    }

    /// Returns whether [`RestClient::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.http.read().map_or(true, |http| http.is_none())
    }

    async fn execute(
        &self,
        ctx: &CallContext,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        payload: Option<serde_json::Value>,
    ) -> ProviderResult<String> {
        let operation = format!("{method} {path}");
        with_retry(&self.retry, ctx, &operation, || {
            self.attempt(ctx, &method, path, query, payload.as_ref())
        })
        .await
    }

    #[instrument(
        name = "rest.attempt",
        skip(self, ctx, method, query, payload),
        fields(provider = %self.provider, method = %method)
    )]
    async fn attempt(
        &self,
        ctx: &CallContext,
        method: &Method,
        path: &str,
        query: &[(&str, String)],
        payload: Option<&serde_json::Value>,
    ) -> ProviderResult<String> {
        let operation = format!("{method} {path}");
        let http = self.http_client()?;
        let url = self.endpoint(path)?;
        self.limiter.acquire(ctx).await?;

        let mut request = self.auth.apply(http.request(method.clone(), url));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = payload {
            request = request.json(body);
        }

        ctx.run(&operation, async {
            let response = request
                .send()
                .await
                .map_err(|err| transport_error(&operation, err))?;
            let status = response.status();
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok());
            let text = response
                .text()
                .await
                .map_err(|err| transport_error(&operation, err))?;
            debug!(status = status.as_u16(), "received response");
            if status.is_success() {
                Ok(text)
            } else {
                Err(failure(status, &text, retry_after, &operation))
            }
        })
        .await
    }

    fn http_client(&self) -> ProviderResult<reqwest::Client> {
        let guard = self.http.read().map_err(|err| {
            ProviderError::internal(format!("REST client lock poisoned: {err}"))
        })?;
        guard.clone().ok_or_else(|| {
            ProviderError::internal(format!("REST client for '{}' is closed", self.provider))
                .with_context("provider", &self.provider)
        })
    }
}

fn failure(
    status: StatusCode,
    body: &str,
    retry_after: Option<u64>,
    operation: &str,
) -> ProviderError {
    HttpError::from_response(status, body)
        .with_retry_after(retry_after)
        .into_provider_error(operation)
}

fn decode<T: DeserializeOwned>(path: &str, body: &str) -> ProviderResult<T> {
    let source = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(source).map_err(|err| {
        ProviderError::with_cause(
            ErrorKind::Internal,
            format!("unexpected response shape from {path}"),
            err,
        )
    })
}
