// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! RPC adapter: protobuf over HTTP/2 using a tonic channel.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use prost::Message;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Status};

use super::{AdapterFactory, TransportAdapter};
use crate::config::RpcConfig;
use crate::error::{TransportError, TransportResult};
use crate::proto::process_service_client::ProcessServiceClient;
use crate::proto::ProcessRequest;
use crate::types::{MessageLimit, Transport};

/// Unary `process.ProcessService/Process` caller over an established channel.
#[derive(Debug, Clone)]
pub struct RpcAdapter {
    client: ProcessServiceClient<Channel>,
    endpoint: String,
    limit: MessageLimit,
    call_timeout: Option<Duration>,
}

impl RpcAdapter {
    /// Open a channel to the configured endpoint.
    pub async fn connect(config: &RpcConfig) -> TransportResult<Self> {
        let endpoint = config.endpoint.origin().ascii_serialization();
        let unavailable = |reason: String| TransportError::Unavailable {
            endpoint: endpoint.clone(),
            reason,
        };

        let mut builder =
            Endpoint::from_shared(endpoint.clone()).map_err(|e| unavailable(e.to_string()))?;
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.call_timeout {
            builder = builder.timeout(timeout);
        }

        let channel = builder
            .connect()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let limit = config.max_message;
        let client = ProcessServiceClient::new(channel)
            .max_decoding_message_size(limit.bytes())
            .max_encoding_message_size(limit.bytes());

        tracing::debug!(endpoint = %endpoint, limit = %limit, "RPC channel established");

        Ok(Self {
            client,
            endpoint,
            limit,
            call_timeout: config.call_timeout,
        })
    }

    fn map_status(&self, status: Status, size: usize) -> TransportError {
        match status.code() {
            Code::ResourceExhausted | Code::OutOfRange => TransportError::Oversize {
                size,
                limit: self.limit.bytes(),
            },
            Code::DeadlineExceeded => self.timeout(),
            // A client-side channel timeout surfaces as a cancelled call.
            Code::Cancelled if self.call_timeout.is_some() => self.timeout(),
            Code::Unavailable => TransportError::Unavailable {
                endpoint: self.endpoint.clone(),
                reason: status.message().to_string(),
            },
            code => TransportError::Rejected {
                code: format!("{:?}", code),
                message: status.message().to_string(),
            },
        }
    }

    fn timeout(&self) -> TransportError {
        TransportError::Timeout {
            after_ms: self.call_timeout.map(|t| t.as_millis() as u64),
        }
    }
}

#[async_trait]
impl TransportAdapter for RpcAdapter {
    fn transport(&self) -> Transport {
        Transport::Rpc
    }

    async fn invoke(&self, numbers: &[i64]) -> TransportResult<i64> {
        let request = ProcessRequest {
            numbers: numbers.to_vec(),
        };

        let size = request.encoded_len();
        if size > self.limit.bytes() {
            return Err(TransportError::Oversize {
                size,
                limit: self.limit.bytes(),
            });
        }

        // Channel clones share one HTTP/2 connection.
        let mut client = self.client.clone();
        let response = client
            .process(request)
            .await
            .map_err(|status| self.map_status(status, size))?;

        Ok(response.into_inner().result)
    }
}

/// Builds an [`RpcAdapter`]; the channel handshake happens in `connect`.
#[derive(Debug, Clone)]
pub struct RpcAdapterFactory {
    config: RpcConfig,
}

impl RpcAdapterFactory {
    pub fn new(config: RpcConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl AdapterFactory for RpcAdapterFactory {
    fn transport(&self) -> Transport {
        Transport::Rpc
    }

    async fn connect(&self) -> TransportResult<Arc<dyn TransportAdapter>> {
        let adapter = RpcAdapter::connect(&self.config).await?;
        Ok(Arc::new(adapter))
    }
}
