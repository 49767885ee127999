//! reqwest-backed transport.
//!
//! Posts the form-encoded envelope and returns the raw body. HTTP status
//! codes are not interpreted here: a non-2xx reply still carries a body the
//! dispatcher can decode (or log raw). Only network failures and timeouts
//! surface as [`TransportError`].

use async_trait::async_trait;
use reqwest::Client;
use std::borrow::Cow;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::ports::{HttpVerb, Transport, TransportRequest};

/// HTTP transport built on a shared `reqwest::Client`.
///
/// The shared client carries the connect timeout it was built with; a
/// request asking for a different connect timeout gets a client of its own.
/// A zero duration means "no limit" for every timeout.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    connect_timeout: Duration,
}

impl ReqwestTransport {
    /// Create a transport whose connections time out after `connect_timeout`.
    pub fn new(connect_timeout: Duration) -> Result<Self, TransportError> {
        Ok(Self {
            client: build_client(connect_timeout)?,
            connect_timeout,
        })
    }

    /// Create a transport using the configured request timeout as connect timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        Self::new(config.request_timeout())
    }

    /// Connect timeout of the shared client.
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Client honouring `connect_timeout`, reusing the shared one when it matches.
    fn client_for(&self, connect_timeout: Duration) -> Result<Cow<'_, Client>, TransportError> {
        if connect_timeout == self.connect_timeout {
            Ok(Cow::Borrowed(&self.client))
        } else {
            Ok(Cow::Owned(build_client(connect_timeout)?))
        }
    }
}

fn build_client(connect_timeout: Duration) -> Result<Client, TransportError> {
    let mut builder = Client::builder();
    if let Some(limit) = bounded(connect_timeout) {
        builder = builder.connect_timeout(limit);
    }

    builder
        .build()
        .map_err(|e| TransportError::RequestFailed(format!("Failed to build HTTP client: {}", e)))
}

/// Zero means wait indefinitely.
fn bounded(duration: Duration) -> Option<Duration> {
    (!duration.is_zero()).then_some(duration)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn perform_request(&self, request: TransportRequest) -> Result<String, TransportError> {
        let url = reqwest::Url::parse(&request.url)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", request.url, e)))?;

        let client = self.client_for(request.connect_timeout)?;
        let mut builder = match request.verb {
            HttpVerb::Post => client.post(url),
        };
        if let Some(read_timeout) = bounded(request.read_timeout) {
            builder = builder.timeout(read_timeout);
        }

        let send = async {
            let response = builder
                .form(&request.form_params)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        TransportError::Timeout(request.read_timeout)
                    } else {
                        TransportError::RequestFailed(e.to_string())
                    }
                })?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| TransportError::RequestFailed(e.to_string()))?;

            if !status.is_success() {
                warn!(
                    service = %request.service_name,
                    url = %request.url,
                    status = status.as_u16(),
                    "Stock gateway returned non-success status"
                );
            }

            Ok::<String, TransportError>(body)
        };

        match bounded(request.timeout) {
            Some(overall) => timeout(overall, send)
                .await
                .map_err(|_| TransportError::Timeout(overall))?,
            None => send.await,
        }
    }
}
