//! Client for the remote key-value REST service.
//!
//! Wire protocol:
//! - `POST {base}/set/{key}` with the value as body stores it, answering `{"result":"OK"}`
//! - `GET {base}/get/{key}` answers `{"result": <value or null>}`
//! - failures answer a non-2xx status with `{"error": "..."}`
//!
//! Keys travel percent-encoded in the path. Values are percent-encoded into
//! the request body and decoded again on read so arbitrary text, including
//! the empty string, round-trips. Every request carries
//! `Authorization: Bearer <token>` when a token is configured.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request, StatusCode, Uri};
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::RemoteStoreConfig;
use crate::domain::store::{StateStore, StoreError};

type HttpsClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Longest slice of an unexpected body kept in error messages.
const BODY_PREVIEW_LIMIT: usize = 256;

/// JSON envelope returned by the store for every call.
#[derive(Debug, Deserialize)]
struct StoreReply {
    #[serde(default)]
    result: serde_json::Value,
    #[serde(default)]
    error: Option<String>,
}

/// [`StateStore`] backed by the remote key-value REST service.
pub struct RemoteStateStore {
    client: HttpsClient,
    base_url: String,
    token: Option<SecretString>,
    timeout: Duration,
}

impl RemoteStateStore {
    /// Builds a client from configuration.
    ///
    /// # Errors
    /// Returns [`StoreError::Configuration`] if the base URL is missing or
    /// not an absolute `http`/`https` URL, or if TLS cannot be initialised.
    pub fn new(config: RemoteStoreConfig) -> Result<Self, StoreError> {
        let base_url = normalize_base_url(config.base_url.as_deref())?;

        if config.token.is_none() {
            warn!(base_url = %base_url, "remote store configured without a bearer token");
        }

        let provider = rustls::crypto::CryptoProvider::get_default()
            .cloned()
            .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()));

        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(provider)
            .map_err(|e| StoreError::Configuration(format!("TLS setup failed: {e}")))?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build::<_, Full<Bytes>>(https);

        Ok(Self {
            client,
            base_url,
            token: config.token,
            timeout: Duration::from_millis(config.timeout_ms),
        })
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<StoreReply, StoreError> {
        let uri = format!("{}{path}", self.base_url);

        let mut builder = Request::builder()
            .method(method.clone())
            .uri(&uri)
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()));
        }
        let body = match body {
            Some(text) => {
                builder = builder.header(CONTENT_TYPE, "text/plain; charset=utf-8");
                Bytes::from(text)
            }
            None => Bytes::new(),
        };
        let request = builder
            .body(Full::new(body))
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let exchange = async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| StoreError::Transport(Box::new(e)))?;
            let status = response.status();
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| StoreError::Transport(Box::new(e)))?
                .to_bytes();
            Ok::<_, StoreError>((status, body))
        };

        let (status, body) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))??;

        debug!(%method, %status, path, "store call completed");
        parse_reply(status, &body)
    }
}

#[async_trait]
impl StateStore for RemoteStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let reply = self.call(Method::GET, &get_path(key), None).await?;
        match reply.result {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::String(encoded) => Ok(Some(decode_value(&encoded)?)),
            other => Ok(Some(other.to_string())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let reply = self
            .call(Method::POST, &set_path(key), Some(encode_value(value)))
            .await?;
        if reply.result != serde_json::Value::String("OK".to_owned()) {
            debug!(result = %reply.result, "store acknowledged set with unexpected result");
        }
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "remote"
    }
}

fn normalize_base_url(raw: Option<&str>) -> Result<String, StoreError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or_else(|| {
        StoreError::Configuration("remote store base_url is not set".to_owned())
    })?;

    let uri: Uri = raw
        .parse()
        .map_err(|e| StoreError::Configuration(format!("invalid base_url '{raw}': {e}")))?;

    match uri.scheme_str() {
        Some("http" | "https") => {}
        Some(other) => {
            return Err(StoreError::Configuration(format!(
                "base_url scheme '{other}' is not supported"
            )));
        }
        None => {
            return Err(StoreError::Configuration(format!(
                "base_url '{raw}' must start with http:// or https://"
            )));
        }
    }
    if uri.authority().is_none() {
        return Err(StoreError::Configuration(format!(
            "base_url '{raw}' has no host"
        )));
    }

    Ok(raw.trim_end_matches('/').to_owned())
}

fn get_path(key: &str) -> String {
    format!("/get/{}", urlencoding::encode(key))
}

fn set_path(key: &str) -> String {
    format!("/set/{}", urlencoding::encode(key))
}

fn encode_value(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

fn decode_value(encoded: &str) -> Result<String, StoreError> {
    Ok(urlencoding::decode(encoded)?.into_owned())
}

fn parse_reply(status: StatusCode, body: &[u8]) -> Result<StoreReply, StoreError> {
    let reply = serde_json::from_slice::<StoreReply>(body);

    if !status.is_success() {
        let message = match reply {
            Ok(StoreReply {
                error: Some(error), ..
            }) => error,
            _ => body_preview(body),
        };
        return Err(StoreError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let reply = reply.map_err(|e| StoreError::Malformed(e.to_string()))?;
    if let Some(error) = reply.error {
        return Err(StoreError::Status {
            status: status.as_u16(),
            message: error,
        });
    }
    Ok(reply)
}

fn body_preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    match text.char_indices().nth(BODY_PREVIEW_LIMIT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.into_owned(),
    }
}
