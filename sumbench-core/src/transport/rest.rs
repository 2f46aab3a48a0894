// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! REST adapter: JSON over HTTP/1.1 using reqwest.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{AdapterFactory, TransportAdapter};
use crate::error::{TransportError, TransportResult};
use crate::types::Transport;

#[derive(Serialize)]
struct SumRequest<'a> {
    numbers: &'a [i64],
}

#[derive(Deserialize)]
struct SumResponse {
    result: i64,
}

/// Posts `{"numbers": [...]}` and reads `{"result": n}`.
#[derive(Debug, Clone)]
pub struct RestAdapter {
    client: Client,
    url: Url,
    timeout: Option<Duration>,
}

impl RestAdapter {
    /// Build an adapter for `url`.
    ///
    /// With `pool_connections` off no idle connection is kept, so every call
    /// pays for its own TCP handshake.
    pub fn new(url: Url, timeout: Option<Duration>, pool_connections: bool) -> TransportResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if !pool_connections {
            builder = builder.pool_max_idle_per_host(0);
        }

        let client = builder.build().map_err(|e| TransportError::Unavailable {
            endpoint: url.to_string(),
            reason: format!("cannot build HTTP client: {}", e),
        })?;

        Ok(Self {
            client,
            url,
            timeout,
        })
    }

    fn map_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                after_ms: self.timeout.map(|t| t.as_millis() as u64),
            }
        } else if err.is_decode() {
            TransportError::Malformed {
                reason: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            TransportError::BadStatus {
                status: status.as_u16(),
            }
        } else {
            TransportError::Unavailable {
                endpoint: self.url.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl TransportAdapter for RestAdapter {
    fn transport(&self) -> Transport {
        Transport::Rest
    }

    async fn invoke(&self, numbers: &[i64]) -> TransportResult<i64> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&SumRequest { numbers })
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::BadStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.map_error(e))?;
        let parsed: SumResponse =
            serde_json::from_slice(&body).map_err(|e| TransportError::Malformed {
                reason: e.to_string(),
            })?;

        Ok(parsed.result)
    }
}

/// Builds a [`RestAdapter`]. Construction involves no network I/O.
#[derive(Debug, Clone)]
pub struct RestAdapterFactory {
    url: Url,
    timeout: Option<Duration>,
    pool_connections: bool,
}

impl RestAdapterFactory {
    pub fn new(url: Url, timeout: Option<Duration>, pool_connections: bool) -> Self {
        Self {
            url,
            timeout,
            pool_connections,
        }
    }
}

#[async_trait]
impl AdapterFactory for RestAdapterFactory {
    fn transport(&self) -> Transport {
        Transport::Rest
    }

    async fn connect(&self) -> TransportResult<Arc<dyn TransportAdapter>> {
        let adapter = RestAdapter::new(self.url.clone(), self.timeout, self.pool_connections)?;
        Ok(Arc::new(adapter))
    }
}
