use std::fmt;

use serde_json::Value;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No response was received: DNS, connect, timeout or a dropped body.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// A response was received with a non-success status.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The request URL could not be parsed.
    #[error("invalid url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// A base URL carries a query or fragment, so paths cannot be joined onto it.
    #[error("invalid base url '{0}': must not have a query or fragment")]
    InvalidBaseUrl(String),
    /// A header name or value is not valid HTTP.
    #[error("invalid header '{0}'")]
    InvalidHeader(String),
    /// A relative path resolved outside the bound base URL.
    #[error("path '{path}' resolves outside of base url '{base}'")]
    PathTraversal { base: String, path: String },
    /// Request body could not be serialized.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
    /// Response data did not match the requested type.
    #[error("decode error: {0}")]
    Decode(String),
    /// Missing or malformed environment configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// Returns the HTTP-level failure, if this error is one.
    pub fn as_fetch(&self) -> Option<&FetchError> {
        match self {
            Self::Fetch(err) => Some(err),
            _ => None,
        }
    }

    /// HTTP status of a received failure response.
    pub fn status(&self) -> Option<u16> {
        self.as_fetch().map(|err| err.status)
    }
}

/// A response was received, but its status indicated failure.
///
/// Only built for responses that actually arrived, and only once the retry
/// policy has been exhausted or denied.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchError {
    /// `"{METHOD} {url}: {status} {status_text}"`.
    pub message: String,
    pub status: u16,
    pub status_text: String,
    pub method: String,
    pub url: String,
    /// Parsed JSON body, or the raw text when it was not JSON.
    pub data: Value,
}

impl FetchError {
    pub(crate) fn new(
        method: &str,
        url: &str,
        status: u16,
        status_text: &str,
        data: Value,
    ) -> Self {
        Self {
            message: format!("{method} {url}: {status} {status_text}"),
            status,
            status_text: status_text.to_owned(),
            method: method.to_owned(),
            url: url.to_owned(),
            data,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FetchError {}

/// Failure generating a one-time password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OtpError {
    #[error("OTP length must be between 4 and 6, got {0}")]
    InvalidLength(usize),
}

/// Failure running a shell command.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// The shell itself could not be started.
    #[error("failed to spawn '{cmd}': {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },
    /// The command ran and exited non-zero. Killed by a signal counts as 1.
    #[error("command '{cmd}' failed with status {status}")]
    Failed {
        cmd: String,
        status: i32,
        stdout: String,
        stderr: String,
        /// Interleaved stdout and stderr, when captured together.
        output: String,
    },
}

impl ShellError {
    /// Exit status of a command that ran, `None` if it never started.
    pub fn status(&self) -> Option<i32> {
        match self {
            Self::Spawn { .. } => None,
            Self::Failed { status, .. } => Some(*status),
        }
    }
}
