//! The error taxonomy callers branch on. Transport failures are always
//! classified here and never leak as `reqwest::Error`.

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Which field of an endpoint definition failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointField {
    Path,
    Method,
    Port,
}

impl fmt::Display for EndpointField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointField::Path => write!(f, "Path"),
            EndpointField::Method => write!(f, "Method"),
            EndpointField::Port => write!(f, "Port"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Configuration errors: raised at resolution time, never retried.
    #[error("Unknown endpoint '{0}'.")]
    UnknownEndpoint(String),
    #[error("{field} not defined for version '{version}' in endpoint '{endpoint}'.")]
    EndpointFieldMissing {
        field: EndpointField,
        version: String,
        endpoint: String,
    },
    #[error("Invalid endpoint table: {0}")]
    EndpointTable(String),
    #[error("Missing value for placeholder '{placeholder}' in path '{path}'.")]
    MissingRouteParam { placeholder: String, path: String },
    #[error("Unknown route parameter '{name}' for path '{path}'.")]
    UnknownRouteParam { name: String, path: String },

    // Transport errors, one variant per kind.
    #[error("Failed to connect to TigerGraph: {0}")]
    Connection(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("Too many redirects: {0}")]
    TooManyRedirects(String),
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
    #[error("Failed to decode response: {0}")]
    Decode(String),
    #[error("Request error: {0}")]
    Request(String),

    // Remote API errors: the server answered and said no.
    #[error("HTTP request failed: {status} {reason}: {hint} URL: {url}.")]
    RequestFailed {
        status: u16,
        reason: String,
        hint: &'static str,
        url: String,
    },
    #[error("TigerGraph API Error: {0}")]
    Api(String),

    // Content errors: protocol mismatch, always fatal.
    #[error("Unsupported content type '{content_type}': {status} {reason}. URL: {url}.")]
    UnsupportedContentType {
        content_type: String,
        status: u16,
        reason: String,
        url: String,
    },

    #[error("Invalid parameter format: {0}")]
    Parameter(String),
    #[error("Unexpected response shape: {0}")]
    UnexpectedResponse(String),
}

/// Map a `reqwest::Error` onto the stable taxonomy. The URL is carried in
/// the message so failures are traceable without the transport error.
pub(crate) fn classify_transport(err: reqwest::Error, url: &str) -> Error {
    if err.is_timeout() {
        Error::Timeout(format!("{url}: {err}"))
    } else if err.is_connect() {
        Error::Connection(format!("{url}: {err}"))
    } else if err.is_redirect() {
        Error::TooManyRedirects(format!("{url}: {err}"))
    } else if err.is_builder() {
        Error::InvalidUrl(format!("{url}: {err}"))
    } else if err.is_decode() {
        Error::Decode(format!("{url}: {err}"))
    } else {
        Error::Request(format!("{url}: {err}"))
    }
}

/// Short human phrase for a known status-code class, embedded in
/// [`Error::RequestFailed`] messages.
pub(crate) fn status_hint(status: reqwest::StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "The request was invalid. Check syntax or parameters.",
        401 => "Authentication failed. Check your credentials.",
        403 => "Access denied. Check your permissions.",
        404 => "The requested resource was not found.",
        500 => "The server encountered an internal error.",
        502 => "The server received an invalid upstream response.",
        503 => "The service is temporarily unavailable.",
        504 => "The upstream request timed out.",
        _ => "The request failed.",
    }
}
