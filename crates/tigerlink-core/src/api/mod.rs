//! Request dispatcher: one long-lived HTTP client, auth attachment,
//! bounded retries, and response classification.

pub mod params;

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use tigerlink_common::{Auth, ConnectionConfig};

use crate::endpoints::EndpointRegistry;
use crate::error::{classify_transport, status_hint, Error, Result};

pub use params::{ParamValue, QueryParams};

const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE_MS: u64 = 100;
const RETRY_STATUS: [StatusCode; 3] = [
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// Request body shapes the server accepts.
#[derive(Debug, Clone)]
pub enum Body {
    None,
    Json(Value),
    /// Raw GSQL text, sent as `text/plain`.
    Gsql(String),
}

/// A classified successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    results: Option<Value>,
}

/// Client for the TigerGraph REST surface. Construct once and share; the
/// underlying connection pool is reused across calls and the registry and
/// auth selection are immutable after construction.
pub struct TigerGraphApi {
    config: ConnectionConfig,
    auth: Option<Auth>,
    registry: EndpointRegistry,
    client: reqwest::Client,
}

impl TigerGraphApi {
    pub fn new(config: ConnectionConfig) -> Self {
        Self::with_registry(config, EndpointRegistry::builtin())
    }

    pub fn with_registry(config: ConnectionConfig, registry: EndpointRegistry) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        let auth = Auth::from_config(&config);
        Self {
            config,
            auth,
            registry,
            client,
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Resolve `operation` for the configured server version, dispatch, and
    /// classify the response. Only 502/503/504 are retried; client errors
    /// and envelope errors surface immediately.
    pub async fn request(
        &self,
        operation: &str,
        route: &[(&str, &str)],
        query: &[(String, String)],
        body: Body,
    ) -> Result<Payload> {
        let endpoint = self
            .registry
            .resolve(operation, &self.config.version, route)?;
        let url = format!("{}{}", self.config.base_url(endpoint.port), endpoint.path);

        let mut attempt: u32 = 0;
        loop {
            let mut builder = self.client.request(endpoint.method.as_reqwest(), &url);
            if !query.is_empty() {
                builder = builder.query(query);
            }
            builder = match &body {
                Body::None => builder,
                Body::Json(value) => builder.json(value),
                Body::Gsql(text) => builder
                    .header(CONTENT_TYPE, "text/plain")
                    .body(text.clone()),
            };
            builder = self.attach_auth(builder);

            let response = match builder.send().await {
                Ok(response) => response,
                Err(err) => return Err(classify_transport(err, &url)),
            };

            let status = response.status();
            if RETRY_STATUS.contains(&status) && attempt + 1 < MAX_ATTEMPTS {
                let backoff = Duration::from_millis(BACKOFF_BASE_MS << attempt);
                tracing::warn!(
                    "Retrying {} after status {} (attempt {}/{})",
                    url,
                    status,
                    attempt + 1,
                    MAX_ATTEMPTS
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
                continue;
            }

            return classify_response(response).await;
        }
    }

    fn attach_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some(Auth::UsernamePassword { username, password }) => {
                builder.basic_auth(username, Some(password))
            }
            Some(Auth::Secret(secret)) => builder.basic_auth("__GSQL__secret", Some(secret)),
            Some(Auth::Token(token)) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // ------------------------------ operations ------------------------------

    pub async fn ping(&self) -> Result<String> {
        let payload = self.request("ping", &[], &[], Body::None).await?;
        match payload {
            Payload::Text(text) => Ok(text),
            Payload::Json(Value::String(s)) => Ok(s),
            Payload::Json(value) => value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| Error::UnexpectedResponse(format!("ping returned {value}"))),
        }
    }

    /// Run a GSQL shell command and return the server's text reply.
    pub async fn gsql(&self, command: &str) -> Result<String> {
        let payload = self
            .request("gsql", &[], &[], Body::Gsql(command.to_string()))
            .await?;
        match payload {
            Payload::Text(text) => Ok(text),
            Payload::Json(value) => Err(Error::UnexpectedResponse(format!(
                "gsql expected a text reply, got {value}"
            ))),
        }
    }

    pub async fn get_schema(&self, graph: &str) -> Result<Value> {
        let payload = self
            .request("get_schema", &[("graph", graph)], &[], Body::None)
            .await?;
        expect_json(payload)
    }

    /// Submit interpreted-query text with bound parameters.
    pub async fn run_interpreted_query(
        &self,
        query: &str,
        params: &QueryParams,
    ) -> Result<Value> {
        let payload = self
            .request(
                "interpreted_query",
                &[],
                &params.encode()?,
                Body::Gsql(query.to_string()),
            )
            .await?;
        expect_json(payload)
    }

    /// Run a pre-installed query via GET.
    pub async fn run_installed_query_get(
        &self,
        graph: &str,
        query_name: &str,
        params: &QueryParams,
    ) -> Result<Value> {
        let payload = self
            .request(
                "installed_query_get",
                &[("graph", graph), ("query", query_name)],
                &params.encode()?,
                Body::None,
            )
            .await?;
        expect_json(payload)
    }
}

fn expect_json(payload: Payload) -> Result<Value> {
    match payload {
        Payload::Json(value) => Ok(value),
        Payload::Text(text) => Err(Error::UnexpectedResponse(format!(
            "expected a JSON reply, got text: {text}"
        ))),
    }
}

/// Unwrap the `{error, message, results}` envelope for JSON replies, wrap
/// plain text, and reject every other content type.
async fn classify_response(response: reqwest::Response) -> Result<Payload> {
    let status = response.status();
    let url = response.url().to_string();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    match content_type.as_str() {
        "application/json" => {
            let envelope: Envelope = response
                .json()
                .await
                .map_err(|err| classify_transport(err, &url))?;
            if envelope.error {
                return Err(Error::Api(envelope.message));
            }
            match envelope.results {
                Some(results) => Ok(Payload::Json(results)),
                None => Ok(Payload::Json(json!({ "message": envelope.message }))),
            }
        }
        "text/plain" => {
            let body = response
                .text()
                .await
                .map_err(|err| classify_transport(err, &url))?;
            if status.is_success() {
                Ok(Payload::Text(body))
            } else {
                Err(Error::RequestFailed {
                    status: status.as_u16(),
                    reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                    hint: status_hint(status),
                    url,
                })
            }
        }
        other => Err(Error::UnsupportedContentType {
            content_type: other.to_string(),
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            url,
        }),
    }
}
