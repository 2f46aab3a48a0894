// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Round trips through both adapters against local servers.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tonic::{Request, Response, Status};
use url::Url;

use sumbench_core::config::RpcConfig;
use sumbench_core::proto::process_service_server::ProcessService;
use sumbench_core::proto::{ProcessRequest, ProcessResponse};
use sumbench_core::{
    MessageLimit, RestAdapter, RestSumService, RpcAdapter, RpcSumService, Transport,
    TransportAdapter, TransportError, WorkerLimit,
};

async fn spawn_mock(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn process_url(addr: SocketAddr) -> Url {
    Url::parse(&format!("http://{}/process", addr)).unwrap()
}

fn rpc_config(addr: SocketAddr, limit: usize) -> RpcConfig {
    RpcConfig {
        endpoint: Url::parse(&format!("http://{}", addr)).unwrap(),
        max_message: MessageLimit::new(limit).unwrap(),
        connect_timeout: Some(Duration::from_secs(2)),
        call_timeout: None,
    }
}

/// Sums after a fixed delay and records how many calls overlap.
#[derive(Clone, Default)]
struct SlowHandler {
    delay: Duration,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl SlowHandler {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }
}

#[tonic::async_trait]
impl ProcessService for SlowHandler {
    async fn process(
        &self,
        request: Request<ProcessRequest>,
    ) -> Result<Response<ProcessResponse>, Status> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let result = request.into_inner().numbers.iter().sum();
        Ok(Response::new(ProcessResponse { result }))
    }
}

fn loopback() -> SocketAddr {
    "127.0.0.1:0".parse().unwrap()
}

/// An address nothing listens on.
async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

#[tokio::test]
async fn rest_adapter_reads_result_field() {
    let router = Router::new().route(
        "/process",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body, json!({ "numbers": [1, 2, 3] }));
            Json(json!({ "result": 42 }))
        }),
    );
    let addr = spawn_mock(router).await;

    let adapter = RestAdapter::new(process_url(addr), Some(Duration::from_secs(5)), false).unwrap();
    assert_eq!(adapter.transport(), Transport::Rest);
    assert_eq!(adapter.invoke(&[1, 2, 3]).await.unwrap(), 42);
}

#[tokio::test]
async fn rest_adapter_maps_bad_status() {
    let router = Router::new().route(
        "/process",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let addr = spawn_mock(router).await;

    let adapter = RestAdapter::new(process_url(addr), None, false).unwrap();
    let err = adapter.invoke(&[1]).await.unwrap_err();
    assert_eq!(err, TransportError::BadStatus { status: 500 });
}

#[tokio::test]
async fn rest_adapter_maps_malformed_body() {
    let router = Router::new().route("/process", post(|| async { Json(json!({ "sum": 6 })) }));
    let addr = spawn_mock(router).await;

    let adapter = RestAdapter::new(process_url(addr), None, false).unwrap();
    let err = adapter.invoke(&[1, 2, 3]).await.unwrap_err();
    assert!(matches!(err, TransportError::Malformed { .. }), "{err:?}");
}

#[tokio::test]
async fn rest_adapter_maps_timeout() {
    let router = Router::new().route(
        "/process",
        post(|| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Json(json!({ "result": 0 }))
        }),
    );
    let addr = spawn_mock(router).await;

    let adapter = RestAdapter::new(process_url(addr), Some(Duration::from_millis(50)), false).unwrap();
    let err = adapter.invoke(&[]).await.unwrap_err();
    assert_eq!(err, TransportError::Timeout { after_ms: Some(50) });
}

#[tokio::test]
async fn rest_adapter_maps_refused_connection() {
    let addr = closed_addr().await;
    let adapter = RestAdapter::new(process_url(addr), None, false).unwrap();
    let err = adapter.invoke(&[1]).await.unwrap_err();
    assert!(matches!(err, TransportError::Unavailable { .. }), "{err:?}");
}

#[tokio::test]
async fn rest_service_sums_and_rejects_overflow() {
    let running = RestSumService::default().bind(loopback()).await.unwrap();
    let adapter = RestAdapter::new(process_url(running.local_addr()), None, true).unwrap();

    assert_eq!(adapter.invoke(&[1, 2, 3]).await.unwrap(), 6);
    assert_eq!(adapter.invoke(&[]).await.unwrap(), 0);

    let err = adapter.invoke(&[i64::MAX, 1]).await.unwrap_err();
    assert_eq!(err, TransportError::BadStatus { status: 422 });

    running.shutdown().await.unwrap();
}

#[tokio::test]
async fn rest_service_treats_missing_numbers_as_empty() {
    let running = RestSumService::default().bind(loopback()).await.unwrap();

    let response = reqwest::Client::new()
        .post(process_url(running.local_addr()))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "result": 0 }));

    running.shutdown().await.unwrap();
}

#[tokio::test]
async fn rpc_adapter_returns_service_sum() {
    let running = RpcSumService::default().bind(loopback()).await.unwrap();

    let adapter = RpcAdapter::connect(&rpc_config(running.local_addr(), 50 * 1024 * 1024))
        .await
        .unwrap();
    assert_eq!(adapter.transport(), Transport::Rpc);
    assert_eq!(adapter.invoke(&[1, 2, 3]).await.unwrap(), 6);

    running.shutdown().await.unwrap();
}

#[tokio::test]
async fn rpc_adapter_rejects_oversize_payload_locally() {
    let running = RpcSumService::default().bind(loopback()).await.unwrap();

    let adapter = RpcAdapter::connect(&rpc_config(running.local_addr(), 16))
        .await
        .unwrap();
    let numbers: Vec<i64> = (0..100).collect();
    let err = adapter.invoke(&numbers).await.unwrap_err();
    assert!(
        matches!(err, TransportError::Oversize { limit: 16, size } if size > 16),
        "{err:?}"
    );

    running.shutdown().await.unwrap();
}

#[tokio::test]
async fn rpc_adapter_maps_server_size_limit() {
    let service = RpcSumService::new(WorkerLimit::default(), MessageLimit::new(64).unwrap());
    let running = service.bind(loopback()).await.unwrap();

    let adapter = RpcAdapter::connect(&rpc_config(running.local_addr(), 1024 * 1024))
        .await
        .unwrap();
    let numbers: Vec<i64> = (0..1000).collect();
    let err = adapter.invoke(&numbers).await.unwrap_err();
    assert!(matches!(err, TransportError::Oversize { .. }), "{err:?}");

    running.shutdown().await.unwrap();
}

#[tokio::test]
async fn rpc_adapter_maps_overflow_to_rejected() {
    let running = RpcSumService::default().bind(loopback()).await.unwrap();

    let adapter = RpcAdapter::connect(&rpc_config(running.local_addr(), 1024))
        .await
        .unwrap();
    let err = adapter.invoke(&[i64::MAX, 1]).await.unwrap_err();
    assert!(
        matches!(&err, TransportError::Rejected { code, .. } if code == "InvalidArgument"),
        "{err:?}"
    );

    running.shutdown().await.unwrap();
}

#[tokio::test]
async fn rpc_connect_failure_is_unavailable() {
    let addr = closed_addr().await;
    let err = RpcAdapter::connect(&rpc_config(addr, 1024)).await.unwrap_err();
    assert!(matches!(err, TransportError::Unavailable { .. }), "{err:?}");
}

#[tokio::test]
async fn rpc_call_timeout_maps_to_timeout() {
    let handler = SlowHandler::new(Duration::from_millis(500));
    let running = RpcSumService::default()
        .serve(loopback(), handler)
        .await
        .unwrap();

    let mut config = rpc_config(running.local_addr(), 1024);
    config.call_timeout = Some(Duration::from_millis(50));
    let adapter = RpcAdapter::connect(&config).await.unwrap();

    let err = adapter.invoke(&[1, 2, 3]).await.unwrap_err();
    assert_eq!(err, TransportError::Timeout { after_ms: Some(50) });

    drop(adapter);
    running.shutdown().await.unwrap();
}

#[tokio::test]
async fn rpc_worker_limit_spans_connections() {
    let handler = SlowHandler::new(Duration::from_millis(100));
    let peak = Arc::clone(&handler.peak);
    let service = RpcSumService::new(WorkerLimit::new(1).unwrap(), MessageLimit::default());
    let running = service.serve(loopback(), handler).await.unwrap();

    // Separate channels, so separate HTTP/2 connections.
    let config = rpc_config(running.local_addr(), 1024);
    let first = RpcAdapter::connect(&config).await.unwrap();
    let second = RpcAdapter::connect(&config).await.unwrap();

    let (a, b) = tokio::join!(first.invoke(&[1, 2]), second.invoke(&[3, 4]));
    assert_eq!(a.unwrap(), 3);
    assert_eq!(b.unwrap(), 7);
    assert_eq!(peak.load(Ordering::SeqCst), 1);

    drop((first, second));
    running.shutdown().await.unwrap();
}
