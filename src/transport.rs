//! HTTP transport
//!
//! All device traffic goes through the [`Transport`] trait so polling and
//! invocation logic can be exercised against a scripted transport in tests.
//! [`HttpTransport`] is the real implementation, one [`reqwest::Client`] per
//! device session.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{error::Error, thing::Method};

/// Authentication material attached to every request of a session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Credential {
    #[default]
    None,
    Basic {
        username: String,
        password: String,
    },
    Bearer {
        token: String,
    },
    ApiKey {
        header: String,
        key: String,
    },
}

/// TLS certificate verification policy for a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TlsPolicy {
    #[default]
    Strict,
    /// Accept any certificate. For devices with self-signed certificates on
    /// trusted networks only.
    Disabled,
}

/// One outgoing device request.
#[derive(Clone, Copy, Debug)]
pub struct TransportRequest<'a> {
    pub method: Method,
    pub url: &'a str,
    pub credential: &'a Credential,
    pub body: Option<&'a Value>,
    pub timeout: Duration,
}

/// A completed device response, body unparsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// The seam between protocol logic and the network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one HTTP request. Network failures map onto
    /// [`Error::Connection`], [`Error::Timeout`] or [`Error::Protocol`];
    /// HTTP error statuses are returned as responses, not errors.
    async fn request(&self, request: TransportRequest<'_>) -> Result<TransportResponse, Error>;
}

/// [`Transport`] over a [`reqwest::Client`].
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(tls: TlsPolicy) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder();
        if tls == TlsPolicy::Disabled {
            warn!("TLS certificate verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|err| Error::Connection(err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, request: TransportRequest<'_>) -> Result<TransportResponse, Error> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
        };

        let mut builder = self
            .client
            .request(method, request.url)
            .timeout(request.timeout);

        builder = match request.credential {
            Credential::None => builder,
            Credential::Basic { username, password } => builder.basic_auth(username, Some(password)),
            Credential::Bearer { token } => builder.bearer_auth(token),
            Credential::ApiKey { header, key } => builder.header(header.as_str(), key.as_str()),
        };

        if let Some(body) = request.body {
            builder = builder.json(body);
        }

        debug!(method = %request.method, url = %request.url, "device request");
        let response = builder.send().await.map_err(classify)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(classify)?.to_vec();

        Ok(TransportResponse { status, content_type, body })
    }
}

fn classify(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout(err.to_string())
    } else if err.is_connect() {
        Error::Connection(err.to_string())
    } else {
        Error::Protocol(err.to_string())
    }
}
