use std::time::Duration;

use reqwest::Method;
use serde::Serialize;

use crate::{Headers, QueryParams};

/// Attempts made when the caller does not set `retry`.
pub const DEFAULT_RETRY: u32 = 3;
/// Delay between attempts when the caller does not set `retry_delay`.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::ZERO;
/// Status codes retried when the caller does not set `retry_status_codes`.
pub const DEFAULT_RETRY_STATUS_CODES: [u16; 8] = [408, 409, 425, 429, 500, 502, 503, 504];

/// Request payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    /// Sent verbatim; the caller already encoded it.
    Text(String),
    /// Serialized as JSON text at dispatch.
    Json(serde_json::Value),
}

impl Body {
    /// Builds a JSON body from any serializable value.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_value(value).map(Self::Json)
    }

    pub(crate) fn encode(&self) -> serde_json::Result<String> {
        match self {
            Self::Text(text) => Ok(text.clone()),
            Self::Json(value) => serde_json::to_string(value),
        }
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// Per-call request configuration.
///
/// Every field is optional; unset policy fields fall back to the bound
/// client's [`BaseConfig`] and then to the crate defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestOptions {
    /// Payload. Implies `POST` when no method is given.
    pub body: Option<Body>,
    /// Appended to the URL's query string.
    pub params: QueryParams,
    /// Overlaid on the JSON defaults.
    pub headers: Headers,
    /// Explicit verb; wins over the body-derived default.
    pub method: Option<Method>,
    /// Maximum number of attempts, not additional retries.
    pub retry: Option<u32>,
    pub retry_delay: Option<Duration>,
    pub retry_status_codes: Option<Vec<u16>>,
    /// Return the response envelope instead of bare data.
    pub raw: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `value` into a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> serde_json::Result<Self> {
        self.body = Some(Body::json(value)?);
        Ok(self)
    }

    pub fn params(mut self, params: impl Into<QueryParams>) -> Self {
        self.params = params.into();
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<crate::ParamValue>) -> Self {
        self.params.push(key, value);
        self
    }

    pub fn headers(mut self, headers: impl Into<Headers>) -> Self {
        self.headers = headers.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn retry(mut self, attempts: u32) -> Self {
        self.retry = Some(attempts);
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    pub fn retry_status_codes(mut self, codes: impl Into<Vec<u16>>) -> Self {
        self.retry_status_codes = Some(codes.into());
        self
    }

    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    /// Explicit method, else `POST` with a body, else `GET`.
    pub fn resolved_method(&self) -> Method {
        match (&self.method, &self.body) {
            (Some(method), _) => method.clone(),
            (None, Some(_)) => Method::POST,
            (None, None) => Method::GET,
        }
    }

    /// Fills policy fields the caller left unset from `base`, and merges
    /// headers with the call's own entries taking precedence.
    pub(crate) fn merged_with(mut self, base: &BaseConfig) -> Self {
        self.headers = base.headers.clone().merge(&self.headers);
        self.retry = self.retry.or(base.retry);
        self.retry_delay = self.retry_delay.or(base.retry_delay);
        if self.retry_status_codes.is_none() {
            self.retry_status_codes = base.retry_status_codes.clone();
        }
        self
    }

    pub(crate) fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.retry.unwrap_or(DEFAULT_RETRY).max(1),
            user_specified: self.retry.is_some(),
            delay: self.retry_delay.unwrap_or(DEFAULT_RETRY_DELAY),
            status_codes: self
                .retry_status_codes
                .clone()
                .unwrap_or_else(|| DEFAULT_RETRY_STATUS_CODES.to_vec()),
        }
    }
}

/// Defaults bound to a [`crate::FetchClient`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BaseConfig {
    pub headers: Headers,
    pub retry: Option<u32>,
    pub retry_delay: Option<Duration>,
    pub retry_status_codes: Option<Vec<u16>>,
}

impl BaseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn headers(mut self, headers: impl Into<Headers>) -> Self {
        self.headers = headers.into();
        self
    }

    pub fn retry(mut self, attempts: u32) -> Self {
        self.retry = Some(attempts);
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    pub fn retry_status_codes(mut self, codes: impl Into<Vec<u16>>) -> Self {
        self.retry_status_codes = Some(codes.into());
        self
    }
}

/// Retry settings resolved for one call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    pub attempts: u32,
    /// The caller set `retry` explicitly, opting non-GET methods in.
    pub user_specified: bool,
    pub delay: Duration,
    pub status_codes: Vec<u16>,
}

impl RetryPolicy {
    fn method_eligible(&self, method: &Method) -> bool {
        self.user_specified || *method == Method::GET
    }

    pub fn should_retry_status(&self, method: &Method, status: u16) -> bool {
        self.method_eligible(method) && self.status_codes.contains(&status)
    }

    pub fn should_retry_transport(&self, method: &Method) -> bool {
        self.method_eligible(method)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::Method;
    use serde_json::json;

    use super::{BaseConfig, Body, RequestOptions, DEFAULT_RETRY_STATUS_CODES};

    #[test]
    fn method_follows_body_unless_explicit() {
        assert_eq!(RequestOptions::new().resolved_method(), Method::GET);
        assert_eq!(
            RequestOptions::new().body(json!({"a": 1})).resolved_method(),
            Method::POST
        );
        assert_eq!(
            RequestOptions::new()
                .body("x")
                .method(Method::PUT)
                .resolved_method(),
            Method::PUT
        );
    }

    #[test]
    fn default_policy_is_not_user_specified() {
        let policy = RequestOptions::new().retry_policy();
        assert_eq!(policy.attempts, 3);
        assert!(!policy.user_specified);
        assert_eq!(policy.delay, Duration::ZERO);
        assert_eq!(policy.status_codes, DEFAULT_RETRY_STATUS_CODES.to_vec());
        assert!(policy.should_retry_status(&Method::GET, 503));
        assert!(!policy.should_retry_status(&Method::GET, 404));
        assert!(!policy.should_retry_status(&Method::POST, 503));
        assert!(!policy.should_retry_transport(&Method::POST));
    }

    #[test]
    fn explicit_retry_equal_to_default_still_opts_in() {
        let policy = RequestOptions::new().retry(3).retry_policy();
        assert!(policy.user_specified);
        assert!(policy.should_retry_status(&Method::POST, 500));
        assert!(policy.should_retry_transport(&Method::DELETE));
    }

    #[test]
    fn zero_attempts_is_clamped_to_one() {
        assert_eq!(RequestOptions::new().retry(0).retry_policy().attempts, 1);
    }

    #[test]
    fn call_options_override_base_config() {
        let base = BaseConfig::new()
            .header("Authorization", "Bearer base")
            .retry(5)
            .retry_delay(Duration::from_millis(20))
            .retry_status_codes([503]);
        let merged = RequestOptions::new()
            .header("authorization", "Bearer call")
            .retry(2)
            .merged_with(&base);

        assert_eq!(merged.headers.get("Authorization"), Some("Bearer call"));
        assert_eq!(merged.retry, Some(2));
        assert_eq!(merged.retry_delay, Some(Duration::from_millis(20)));
        assert_eq!(merged.retry_status_codes, Some(vec![503]));
    }

    #[test]
    fn string_body_is_sent_verbatim() {
        let body = Body::from(r#"{"raw":"json"}"#);
        assert_eq!(body.encode().unwrap(), r#"{"raw":"json"}"#);
        let body = Body::json(&json!({"name": "John"})).unwrap();
        assert_eq!(body.encode().unwrap(), r#"{"name":"John"}"#);
    }
}
