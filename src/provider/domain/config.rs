//! Typed adapter and registry configuration.
//!
//! Configuration arrives as TOML or as already-built values. Unknown keys are
//! rejected at every level, including backend settings, which each factory
//! parses into its own typed struct through [`AdapterConfig::settings_as`].

use super::{ErrorKind, ProviderError, ProviderName, ProviderResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

const fn default_true() -> bool {
    true
}

const fn default_timeout_ms() -> u64 {
    30_000
}

/// Where a backend is reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Base URL, `http` or `https`.
    pub base_url: Option<String>,
    /// API version segment inserted between the base URL and request paths.
    pub api_version: Option<String>,
}

/// Credentials attached to every request.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// No credentials.
    #[default]
    None,
    /// Static key sent in a custom header.
    ApiKey {
        /// Key value.
        key: String,
        /// Header carrying the key.
        #[serde(default = "AuthConfig::default_api_key_header")]
        header: String,
    },
    /// Bearer token.
    Bearer {
        /// Token value.
        token: String,
    },
    /// HTTP basic credentials.
    Basic {
        /// User name.
        username: String,
        /// Password.
        password: String,
    },
    /// OAuth 2 client credentials with an already-issued access token.
    #[serde(rename = "oauth2")]
    OAuth2 {
        /// Client identifier.
        client_id: String,
        /// Client secret.
        client_secret: String,
        /// Token endpoint.
        token_url: String,
        /// Issued access token, sent as a bearer token.
        access_token: Option<String>,
    },
}

impl AuthConfig {
    fn default_api_key_header() -> String {
        "X-API-Key".to_owned()
    }

    /// Returns the auth type tag.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ApiKey { .. } => "api_key",
            Self::Bearer { .. } => "bearer",
            Self::Basic { .. } => "basic",
            Self::OAuth2 { .. } => "oauth2",
        }
    }

    fn validate(&self) -> ProviderResult<()> {
        let required: Vec<(&str, &str)> = match self {
            Self::None => Vec::new(),
            Self::ApiKey { key, header } => vec![("key", key.as_str()), ("header", header.as_str())],
            Self::Bearer { token } => vec![("token", token.as_str())],
            Self::Basic { username, password } => {
                vec![("username", username.as_str()), ("password", password.as_str())]
            }
            Self::OAuth2 {
                client_id,
                client_secret,
                token_url,
                ..
            } => vec![
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
                ("token_url", token_url.as_str()),
            ],
        };
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(ProviderError::configuration(format!(
                "{} auth requires a non-empty {field}",
                self.kind_name()
            ))
            .with_context("field", format!("auth.{field}"))),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const REDACTED: &str = "<redacted>";
        match self {
            Self::None => f.write_str("None"),
            Self::ApiKey { header, .. } => f
                .debug_struct("ApiKey")
                .field("key", &REDACTED)
                .field("header", header)
                .finish(),
            Self::Bearer { .. } => f.debug_struct("Bearer").field("token", &REDACTED).finish(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &REDACTED)
                .finish(),
            Self::OAuth2 {
                client_id,
                token_url,
                access_token,
                ..
            } => f
                .debug_struct("OAuth2")
                .field("client_id", client_id)
                .field("client_secret", &REDACTED)
                .field("token_url", token_url)
                .field("access_token", &access_token.as_ref().map(|_| REDACTED))
                .finish(),
        }
    }
}

/// Token-bucket pacing for outbound requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Sustained request rate.
    pub requests_per_second: u32,
    /// Bucket capacity.
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10,
            burst: 10,
        }
    }
}

/// Exponential backoff for retryable failures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    pub initial_delay_ms: u64,
    /// Upper bound on any single delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Growth factor applied per attempt.
    pub backoff_multiplier: f64,
    /// Whether to add up to 25% random jitter.
    pub jitter: bool,
}

impl RetryPolicy {
    /// Returns the delay before the first retry.
    #[must_use]
    pub const fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    /// Returns the delay cap.
    #[must_use]
    pub const fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    /// Returns a policy that never retries.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 500,
            max_delay_ms: 10_000,
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

/// Time-to-live for cached backend metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CachePolicy {
    /// Workflow status lists, in seconds. Zero disables caching.
    pub statuses_ttl_secs: u64,
    /// Board lists, in seconds. Zero disables caching.
    pub boards_ttl_secs: u64,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            statuses_ttl_secs: 300,
            boards_ttl_secs: 300,
        }
    }
}

/// Configuration for one named adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdapterConfig {
    /// Registry name.
    pub name: String,
    /// Backend type tag selecting the factory.
    pub backend: String,
    /// Whether the adapter accepts calls after registration.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Connection details.
    #[serde(default)]
    pub connection: ConnectionConfig,
    /// Credentials.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Request pacing.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Retry behaviour.
    #[serde(default)]
    pub retry: RetryPolicy,
    /// Metadata caching.
    #[serde(default)]
    pub cache: CachePolicy,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Backend-specific settings, parsed by the backend's factory.
    #[serde(default)]
    pub settings: serde_json::Map<String, serde_json::Value>,
}

impl AdapterConfig {
    /// Creates an enabled configuration with default policies.
    #[must_use]
    pub fn new(name: impl Into<String>, backend: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            backend: backend.into(),
            enabled: true,
            connection: ConnectionConfig::default(),
            auth: AuthConfig::default(),
            rate_limit: RateLimitConfig::default(),
            retry: RetryPolicy::default(),
            cache: CachePolicy::default(),
            timeout_ms: default_timeout_ms(),
            settings: serde_json::Map::new(),
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.connection.base_url = Some(base_url.into());
        self
    }

    /// Sets the credentials.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// Sets the rate limit.
    #[must_use]
    pub const fn with_rate_limit(mut self, requests_per_second: u32, burst: u32) -> Self {
        self.rate_limit = RateLimitConfig {
            requests_per_second,
            burst,
        };
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the enabled flag.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Adds one backend setting.
    #[must_use]
    pub fn with_setting(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.settings.insert(key.into(), value);
        self
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parses the validated registry name.
    ///
    /// # Errors
    ///
    /// Returns a `configuration` error when the name is invalid.
    pub fn provider_name(&self) -> ProviderResult<ProviderName> {
        ProviderName::new(self.name.as_str()).map_err(|err| {
            ProviderError::with_cause(
                ErrorKind::Configuration,
                format!("invalid provider name '{}'", self.name),
                err,
            )
        })
    }

    /// Parses the backend settings into a typed struct.
    ///
    /// # Errors
    ///
    /// Returns a `configuration` error when a key is unknown or a value has
    /// the wrong type.
    pub fn settings_as<T: DeserializeOwned>(&self) -> ProviderResult<T> {
        serde_json::from_value(serde_json::Value::Object(self.settings.clone())).map_err(|err| {
            ProviderError::with_cause(
                ErrorKind::Configuration,
                format!("invalid {} settings for provider '{}'", self.backend, self.name),
                err,
            )
            .with_context("provider", &self.name)
        })
    }

    /// Checks the configuration without touching the network.
    ///
    /// # Errors
    ///
    /// Returns a `configuration` error for an invalid name, an empty backend
    /// tag, missing credentials, a non-http(s) base URL, a zero rate, burst
    /// or timeout, or an inconsistent retry policy.
    pub fn validate(&self) -> ProviderResult<()> {
        let name = self.provider_name()?;
        let fail = |message: String, field: &str| {
            Err(ProviderError::configuration(message)
                .with_context("provider", &name)
                .with_context("field", field))
        };

        if self.backend.trim().is_empty() {
            return fail("backend type must not be empty".to_owned(), "backend");
        }
        self.auth
            .validate()
            .map_err(|err| err.with_context("provider", &name))?;
        if let Some(base_url) = &self.connection.base_url {
            match url::Url::parse(base_url) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                Ok(parsed) => {
                    return fail(
                        format!("base URL scheme '{}' is not http or https", parsed.scheme()),
                        "connection.base_url",
                    );
                }
                Err(err) => {
                    return fail(
                        format!("base URL '{base_url}' is invalid: {err}"),
                        "connection.base_url",
                    );
                }
            }
        }
        if self.rate_limit.requests_per_second == 0 {
            return fail(
                "requests per second must be positive".to_owned(),
                "rate_limit.requests_per_second",
            );
        }
        if self.rate_limit.burst == 0 {
            return fail("burst must be positive".to_owned(), "rate_limit.burst");
        }
        if self.timeout_ms == 0 {
            return fail("timeout must be positive".to_owned(), "timeout_ms");
        }
        let multiplier = self.retry.backoff_multiplier;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return fail(
                format!("backoff multiplier {multiplier} must be a finite value of at least 1"),
                "retry.backoff_multiplier",
            );
        }
        if self.retry.initial_delay_ms > self.retry.max_delay_ms {
            return fail(
                "initial retry delay exceeds the maximum delay".to_owned(),
                "retry.initial_delay_ms",
            );
        }
        Ok(())
    }
}

/// Configuration for a whole registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Name of the default adapter.
    pub default: Option<String>,
    /// Adapters to register.
    #[serde(default, rename = "provider")]
    pub providers: Vec<AdapterConfig>,
}

impl RegistryConfig {
    /// Parses a registry configuration from TOML.
    ///
    /// Adapters are written as `[[provider]]` tables.
    ///
    /// # Errors
    ///
    /// Returns a `configuration` error when the document is malformed or
    /// contains unknown keys.
    pub fn from_toml_str(source: &str) -> ProviderResult<Self> {
        toml::from_str(source).map_err(|err| {
            ProviderError::with_cause(
                ErrorKind::Configuration,
                "registry configuration is malformed",
                err,
            )
        })
    }
}
