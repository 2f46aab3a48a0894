// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! RPC sum service: unary `process.ProcessService/Process`.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tower::limit::GlobalConcurrencyLimitLayer;
use tonic::{Request, Response, Status};

use super::{checked_sum, RunningService};
use crate::config::ServicesConfig;
use crate::error::ServiceError;
use crate::proto::process_service_server::{ProcessService, ProcessServiceServer};
use crate::proto::{ProcessRequest, ProcessResponse};
use crate::types::{MessageLimit, WorkerLimit};

#[derive(Debug, Default)]
struct SumHandler;

#[tonic::async_trait]
impl ProcessService for SumHandler {
    async fn process(
        &self,
        request: Request<ProcessRequest>,
    ) -> Result<Response<ProcessResponse>, Status> {
        let numbers = request.into_inner().numbers;
        tracing::debug!(len = numbers.len(), "RPC process");

        let result = checked_sum(&numbers)
            .ok_or_else(|| Status::invalid_argument("sum does not fit in a 64-bit integer"))?;

        Ok(Response::new(ProcessResponse { result }))
    }
}

/// Protobuf sum service with explicit worker and message limits.
#[derive(Debug, Clone, Copy)]
pub struct RpcSumService {
    max_workers: WorkerLimit,
    max_message: MessageLimit,
}

impl RpcSumService {
    pub fn new(max_workers: WorkerLimit, max_message: MessageLimit) -> Self {
        Self {
            max_workers,
            max_message,
        }
    }

    pub fn from_config(config: &ServicesConfig) -> Self {
        Self::new(config.max_workers, config.max_message)
    }

    /// Bind `addr` and serve on a background task.
    pub async fn bind(self, addr: SocketAddr) -> Result<RunningService, ServiceError> {
        self.serve(addr, SumHandler).await
    }

    /// Serve `handler` under this service's worker and message limits.
    ///
    /// The worker limit is shared by every connection.
    pub async fn serve<H: ProcessService>(
        self,
        addr: SocketAddr,
        handler: H,
    ) -> Result<RunningService, ServiceError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServiceError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServiceError::Bind { addr, source })?;

        let limit = self.max_message.bytes();
        let service = ProcessServiceServer::new(handler)
            .max_decoding_message_size(limit)
            .max_encoding_message_size(limit);

        let router = Server::builder()
            .layer(GlobalConcurrencyLimitLayer::new(self.max_workers.value()))
            .add_service(service);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tracing::info!(
            addr = %local_addr,
            max_workers = self.max_workers.value(),
            max_message = %self.max_message,
            "RPC service listening"
        );

        let task = tokio::spawn(async move {
            router
                .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async {
                    let _ = shutdown_rx.await;
                })
                .await
                .map_err(|e| ServiceError::Serve {
                    reason: e.to_string(),
                })
        });

        Ok(RunningService::new("grpc", local_addr, shutdown_tx, task))
    }
}

impl Default for RpcSumService {
    fn default() -> Self {
        Self::new(WorkerLimit::default(), MessageLimit::default())
    }
}
