use std::time::Duration;

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde_json::Value;

// tokio::time::sleep is only available on non-WASM targets.
#[cfg(not(target_arch = "wasm32"))]
use tokio::time::sleep;

use crate::{
    headers::Headers,
    options::{Body, RetryPolicy},
    response::{parse_body, RawResponse},
    urls::build_url,
    Error, FetchError, RequestOptions, Result,
};

/// Shared by the module-level functions; bound clients own their own.
static DEFAULT_HTTP: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// Performs one logical request against an absolute URL and returns the
/// parsed body.
///
/// Successful bodies that are not JSON come back as a JSON string; an empty
/// body is `null`. With [`RequestOptions::raw`] set, the response envelope
/// is returned as a JSON object instead.
///
/// # Example
///
/// ```no_run
/// use fetch_utils::{fetch, RequestOptions};
///
/// # async fn run() -> fetch_utils::Result<()> {
/// let users = fetch(
///     "https://api.example.com/users",
///     RequestOptions::new().param("page", 1),
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn fetch(url: &str, options: RequestOptions) -> Result<Value> {
    execute(&DEFAULT_HTTP, url, options).await
}

/// Like [`fetch`], then decodes the data into `T`.
pub async fn fetch_as<T: DeserializeOwned>(url: &str, options: RequestOptions) -> Result<T> {
    decode(fetch(url, options).await?)
}

/// Like [`fetch`], but always returns the response envelope.
pub async fn fetch_raw(url: &str, options: RequestOptions) -> Result<RawResponse> {
    send_with_retry(&DEFAULT_HTTP, url, options).await
}

pub(crate) async fn execute(
    http: &reqwest::Client,
    url: &str,
    options: RequestOptions,
) -> Result<Value> {
    let raw = options.raw;
    let response = send_with_retry(http, url, options).await?;
    if raw {
        Ok(serde_json::to_value(&response)?)
    } else {
        Ok(response.data)
    }
}

pub(crate) fn decode<T: DeserializeOwned>(data: Value) -> Result<T> {
    serde_json::from_value(data).map_err(|err| Error::Decode(err.to_string()))
}

pub(crate) async fn send_with_retry(
    http: &reqwest::Client,
    url: &str,
    options: RequestOptions,
) -> Result<RawResponse> {
    let url = build_url(url, &options.params)?;
    let url_text = url.to_string();
    let method = options.resolved_method();
    let headers = Headers::json_defaults()
        .merge(&options.headers)
        .to_header_map()?;
    let body = options.body.as_ref().map(Body::encode).transpose()?;
    let policy = options.retry_policy();

    let mut attempt = 0u32;
    loop {
        attempt += 1;
        let attempts_left = attempt < policy.attempts;

        #[cfg(feature = "tracing")]
        tracing::debug!(%method, url = %url_text, attempt, "dispatching request");

        let mut request = http
            .request(method.clone(), url.clone())
            .headers(headers.clone());
        if let Some(body) = &body {
            request = request.body(body.clone());
        }

        // A body that fails mid-read counts as a transport failure.
        let received = match request.send().await {
            Ok(response) => {
                let status = response.status();
                let final_url = response.url().to_string();
                let response_headers = response.headers().clone();
                response
                    .text()
                    .await
                    .map(|text| (status, final_url, response_headers, text))
            }
            Err(err) => Err(err),
        };

        match received {
            Ok((status, final_url, response_headers, text)) => {
                let data = parse_body(text);
                let status_text = status.canonical_reason().unwrap_or_default();

                if status.is_success() {
                    return Ok(RawResponse {
                        status: status.as_u16(),
                        status_text: status_text.to_owned(),
                        url: final_url,
                        headers: response_headers,
                        data,
                    });
                }

                if attempts_left && policy.should_retry_status(&method, status.as_u16()) {
                    wait_before_retry(&policy, attempt).await;
                    continue;
                }

                let err = FetchError::new(
                    method.as_str(),
                    &url_text,
                    status.as_u16(),
                    status_text,
                    data,
                );
                #[cfg(feature = "tracing")]
                tracing::warn!(status = err.status, "{}", err.message);
                return Err(err.into());
            }
            Err(err) => {
                if attempts_left && policy.should_retry_transport(&method) {
                    wait_before_retry(&policy, attempt).await;
                    continue;
                }
                #[cfg(feature = "tracing")]
                tracing::warn!(%method, url = %url_text, error = %err, "transport failure");
                return Err(Error::Transport(err));
            }
        }
    }
}

/// Waits the fixed retry delay before the next attempt.
///
/// No-op on WASM targets, where `tokio::time::sleep` is not available.
async fn wait_before_retry(policy: &RetryPolicy, attempt: u32) {
    let delay: Duration = policy.delay;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "retrying request after {} ms (attempt {} of {})",
        delay.as_millis(),
        attempt + 1,
        policy.attempts
    );
    #[cfg(not(feature = "tracing"))]
    let _ = attempt;

    #[cfg(not(target_arch = "wasm32"))]
    sleep(delay).await;

    #[cfg(target_arch = "wasm32")]
    let _ = delay;
}
