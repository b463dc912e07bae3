//! Request credentials derived from [`AuthConfig`].

use crate::provider::domain::{AuthConfig, ErrorKind, ProviderError, ProviderResult};
use reqwest::RequestBuilder;
use reqwest::header::{HeaderName, HeaderValue};
use std::fmt;

/// Credentials resolved once per client and attached to every request.
#[derive(Clone)]
pub(crate) enum RequestAuth {
    None,
    Header { name: HeaderName, value: HeaderValue },
    Bearer(String),
    Basic { username: String, password: String },
}

impl RequestAuth {
    /// Resolves credentials.
    ///
    /// OAuth 2 is accepted only with an issued access token; no token
    /// exchange is performed.
    pub(crate) fn from_config(auth: &AuthConfig) -> ProviderResult<Self> {
        match auth {
            AuthConfig::None => Ok(Self::None),
            AuthConfig::ApiKey { key, header } => {
                let name = HeaderName::from_bytes(header.as_bytes()).map_err(|err| {
                    ProviderError::with_cause(
                        ErrorKind::Configuration,
                        format!("api key header '{header}' is not a valid header name"),
                        err,
                    )
                })?;
                let mut value = HeaderValue::from_str(key).map_err(|err| {
                    ProviderError::with_cause(
                        ErrorKind::Configuration,
                        "api key is not a valid header value",
                        err,
                    )
                })?;
                value.set_sensitive(true);
                Ok(Self::Header { name, value })
            }
            AuthConfig::Bearer { token } => Ok(Self::Bearer(token.clone())),
            AuthConfig::Basic { username, password } => Ok(Self::Basic {
                username: username.clone(),
                password: password.clone(),
            }),
            AuthConfig::OAuth2 { access_token, .. } => access_token
                .as_ref()
                .filter(|token| !token.trim().is_empty())
                .map(|token| Self::Bearer(token.clone()))
                .ok_or_else(|| {
                    ProviderError::configuration("oauth2 auth requires an issued access_token")
                        .with_context("field", "auth.access_token")
                }),
        }
    }

    pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::None => request,
            Self::Header { name, value } => request.header(name.clone(), value.clone()),
            Self::Bearer(token) => request.bearer_auth(token),
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
        }
    }
}

impl fmt::Debug for RequestAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "none",
            Self::Header { .. } => "header",
            Self::Bearer(_) => "bearer",
            Self::Basic { .. } => "basic",
        };
        f.write_str(label)
    }
}
