// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! REST sum service: `POST /process` with `{"numbers": [...]}`.

use std::net::SocketAddr;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::{checked_sum, RunningService};
use crate::config::ServicesConfig;
use crate::error::ServiceError;
use crate::types::{MessageLimit, WorkerLimit};

#[derive(Debug, Deserialize)]
struct ProcessBody {
    #[serde(default)]
    numbers: Vec<i64>,
}

async fn process(Json(body): Json<ProcessBody>) -> Response {
    tracing::debug!(len = body.numbers.len(), "REST process");

    match checked_sum(&body.numbers) {
        Some(result) => Json(json!({ "result": result })).into_response(),
        None => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "sum does not fit in a 64-bit integer" })),
        )
            .into_response(),
    }
}

/// JSON sum service with a bounded worker pool.
#[derive(Debug, Clone, Copy)]
pub struct RestSumService {
    max_workers: WorkerLimit,
    max_body: MessageLimit,
}

impl RestSumService {
    pub fn new(max_workers: WorkerLimit, max_body: MessageLimit) -> Self {
        Self {
            max_workers,
            max_body,
        }
    }

    pub fn from_config(config: &ServicesConfig) -> Self {
        Self::new(config.max_workers, config.max_message)
    }

    /// The service's routes with its limits applied.
    ///
    /// At most `max_workers` requests are handled at once across all
    /// connections; the rest wait for a permit.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/process", post(process))
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(self.max_body.bytes()))
            .layer(GlobalConcurrencyLimitLayer::new(self.max_workers.value()))
            .layer(TraceLayer::new_for_http())
    }

    /// Bind `addr` and serve on a background task.
    pub async fn bind(self, addr: SocketAddr) -> Result<RunningService, ServiceError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServiceError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServiceError::Bind { addr, source })?;

        let app = self.router();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tracing::info!(
            addr = %local_addr,
            max_workers = self.max_workers.value(),
            "REST service listening on http://{}/process",
            local_addr
        );

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .map_err(|e| ServiceError::Serve {
                    reason: e.to_string(),
                })
        });

        Ok(RunningService::new("rest", local_addr, shutdown_tx, task))
    }
}

impl Default for RestSumService {
    fn default() -> Self {
        Self::new(WorkerLimit::default(), MessageLimit::default())
    }
}
