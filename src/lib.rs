//! `fetch-utils` is an async JSON fetch helper with a bounded retry policy.
//!
//! Entry points:
//! - [`fetch`], [`fetch_as`], [`fetch_raw`] for one-off requests
//! - [`create_fetch`] / [`FetchClient`] for a client bound to a base URL
//!
//! Small standalone helpers live in [`crypto`] and [`otp`], plus [`fs`],
//! [`path`], [`process`] and [`streams`] on native targets.

mod client;
mod error;
mod fetch;
mod headers;
mod options;
mod params;
mod response;
mod urls;
mod value;

pub mod crypto;
pub mod otp;
pub mod path;

#[cfg(not(target_arch = "wasm32"))]
pub mod fs;
#[cfg(not(target_arch = "wasm32"))]
pub mod process;
#[cfg(not(target_arch = "wasm32"))]
pub mod streams;

pub use client::{create_fetch, FetchClient};
pub use error::{Error, FetchError, OtpError, ShellError};
pub use fetch::{fetch, fetch_as, fetch_raw};
pub use headers::Headers;
pub use options::{
    BaseConfig, Body, RequestOptions, DEFAULT_RETRY, DEFAULT_RETRY_DELAY,
    DEFAULT_RETRY_STATUS_CODES,
};
pub use params::QueryParams;
pub use response::RawResponse;
pub use value::ParamValue;

/// Re-exported so callers can set [`RequestOptions::method`] without a direct
/// `reqwest` dependency.
pub use reqwest::Method;

pub type Result<T> = std::result::Result<T, Error>;
