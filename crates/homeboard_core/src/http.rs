//! Blocking HTTP helpers shared by the remote widgets.
//!
//! # Invariants
//! - One GET per call, fixed timeout, no retry.
//! - Query strings are never logged; they may carry API keys.

use log::{info, warn};
use reqwest::blocking::Client;
use reqwest::Url;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Failure while fetching or decoding a provider response.
#[derive(Debug)]
pub enum FetchError {
    /// No API key configured for the named provider.
    MissingApiKey(&'static str),
    InvalidUrl(String),
    Http(reqwest::Error),
    Status { status: u16, body: String },
    Decode(String),
    /// Provider answered with an error result code.
    Api { code: String, message: String },
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey(provider) => write!(f, "{provider} API key is not configured"),
            Self::InvalidUrl(reason) => write!(f, "invalid request url: {reason}"),
            Self::Http(err) => write!(f, "request failed: {err}"),
            Self::Status { status, body } => write!(f, "provider returned {status}: {body}"),
            Self::Decode(reason) => write!(f, "unexpected response: {reason}"),
            Self::Api { code, message } => write!(f, "provider error {code}: {message}"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

pub(crate) fn blocking_client() -> Result<Client, FetchError> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Builds `base?params` with proper escaping.
pub(crate) fn build_url(base: &str, params: &[(&str, String)]) -> Result<Url, FetchError> {
    Url::parse_with_params(base, params).map_err(|err| FetchError::InvalidUrl(err.to_string()))
}

/// GETs `url` and returns the body of a 2xx response.
pub(crate) fn get_text(client: &Client, url: Url, module: &str) -> Result<String, FetchError> {
    let started = Instant::now();
    let endpoint = format!("{}{}", url.host_str().unwrap_or("-"), url.path());

    let response = client.get(url).send().map_err(|err| {
        warn!(
            "event=http_get module={} status=error endpoint={} duration_ms={} error={}",
            module,
            endpoint,
            started.elapsed().as_millis(),
            err
        );
        FetchError::Http(err)
    })?;

    let status = response.status();
    let body = response.text()?;
    if !status.is_success() {
        warn!(
            "event=http_get module={} status=error endpoint={} http_status={} duration_ms={}",
            module,
            endpoint,
            status.as_u16(),
            started.elapsed().as_millis()
        );
        return Err(FetchError::Status {
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        });
    }

    info!(
        "event=http_get module={} status=ok endpoint={} duration_ms={}",
        module,
        endpoint,
        started.elapsed().as_millis()
    );
    Ok(body)
}
