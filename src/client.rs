use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    fetch::{decode, execute, send_with_retry},
    urls::BaseUrl,
    BaseConfig, Error, RawResponse, RequestOptions, Result,
};

/// Binds a base URL and default options.
///
/// Shorthand for [`FetchClient::new`] followed by [`FetchClient::with_config`].
///
/// # Example
///
/// ```no_run
/// use fetch_utils::{create_fetch, BaseConfig, RequestOptions};
///
/// # async fn run() -> fetch_utils::Result<()> {
/// let api = create_fetch(
///     "https://api.example.com/",
///     BaseConfig::new().header("Authorization", "Bearer token"),
/// )?;
/// let user = api.fetch("/users/1", RequestOptions::new()).await?;
/// # Ok(())
/// # }
/// ```
pub fn create_fetch(base_url: &str, config: BaseConfig) -> Result<FetchClient> {
    Ok(FetchClient::new(base_url)?.with_config(config))
}

#[derive(Clone)]
/// Request executor bound to a base URL and a [`BaseConfig`].
pub struct FetchClient {
    http: reqwest::Client,
    base_url: BaseUrl,
    config: BaseConfig,
}

impl fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchClient")
            .field("base_url", &self.base_url.as_str())
            .field("config", &self.config)
            .finish()
    }
}

impl FetchClient {
    /// Creates a client for `base_url`; one trailing slash is dropped.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: BaseUrl::parse(base_url)?,
            config: BaseConfig::default(),
        })
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `FETCH_BASE_URL` — base URL, required
    /// - `FETCH_RETRY` — maximum attempts, optional
    /// - `FETCH_RETRY_DELAY_MS` — delay between attempts, optional
    ///
    /// **Not available on `wasm32` targets.**
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("FETCH_BASE_URL").map_err(|_| {
            Error::Config("missing FETCH_BASE_URL environment variable".to_owned())
        })?;
        if base_url.trim().is_empty() {
            return Err(Error::Config("FETCH_BASE_URL is set but empty".to_owned()));
        }

        let mut config = BaseConfig::default();
        if let Some(retry) = env_number("FETCH_RETRY")? {
            config = config.retry(retry);
        }
        if let Some(delay_ms) = env_number("FETCH_RETRY_DELAY_MS")? {
            config = config.retry_delay(std::time::Duration::from_millis(delay_ms));
        }

        Ok(Self::new(base_url.trim())?.with_config(config))
    }

    /// Replaces the bound defaults.
    pub fn with_config(mut self, config: BaseConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses a preconfigured `reqwest` client (timeouts, proxies, TLS).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn config(&self) -> &BaseConfig {
        &self.config
    }

    /// Resolves `path` against the base URL and performs the request.
    ///
    /// Headers merge key by key with the call's values winning; retry
    /// settings left unset on the call fall back to the bound config.
    pub async fn fetch(&self, path: &str, options: RequestOptions) -> Result<Value> {
        let url = self.base_url.join(path)?;
        execute(&self.http, &url, options.merged_with(&self.config)).await
    }

    /// Like [`FetchClient::fetch`], then decodes the data into `T`.
    pub async fn fetch_as<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        decode(self.fetch(path, options).await?)
    }

    /// Like [`FetchClient::fetch`], but always returns the response envelope.
    pub async fn fetch_raw(&self, path: &str, options: RequestOptions) -> Result<RawResponse> {
        let url = self.base_url.join(path)?;
        send_with_retry(&self.http, &url, options.merged_with(&self.config)).await
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn env_number<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| {
                Error::Config(format!(
                    "{name} must be a non-negative integer, got '{value}'"
                ))
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::{create_fetch, FetchClient};
    use crate::{BaseConfig, Error};

    #[test]
    fn base_url_drops_one_trailing_slash() {
        let client = FetchClient::new("https://api.example.com/").unwrap();
        assert_eq!(client.base_url(), "https://api.example.com");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = FetchClient::new("not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }

    #[test]
    fn debug_redacts_authorization_value() {
        let client = create_fetch(
            "https://api.example.com",
            BaseConfig::new().header("Authorization", "Bearer secret-token"),
        )
        .unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("secret-token"));
    }
}
