// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Full runs against the in-process REST and gRPC sum services.

use std::net::SocketAddr;

use sumbench_benchmark::{filter_table, Orchestrator, OutputFormat};
use sumbench_core::{
    factory_for, Config, ConfigLoader, RestSumService, RpcSumService, RunningService, Shape,
    Transport,
};

struct Services {
    rest: RunningService,
    rpc: RunningService,
}

impl Services {
    async fn start() -> Self {
        let loopback: SocketAddr = "127.0.0.1:0".parse().unwrap();
        Self {
            rest: RestSumService::default().bind(loopback).await.unwrap(),
            rpc: RpcSumService::default().bind(loopback).await.unwrap(),
        }
    }

    fn config(&self, shapes: &[Shape], sizes: Option<&[u64]>) -> Config {
        let mut config = ConfigLoader::defaults().unwrap();
        config
            .override_rest_url(&format!("http://{}/process", self.rest.local_addr()))
            .unwrap();
        config
            .override_rpc_endpoint(&format!("http://{}", self.rpc.local_addr()))
            .unwrap();
        config.shapes = filter_table(&config.shapes, Some(shapes), sizes);
        config
    }

    async fn stop(self) {
        self.rest.shutdown().await.unwrap();
        self.rpc.shutdown().await.unwrap();
    }
}

#[tokio::test]
async fn single_against_both_services() {
    let services = Services::start().await;
    let config = services.config(&[Shape::Single], None);

    for transport in Transport::ALL {
        let adapter = factory_for(&config, transport, Shape::Single)
            .connect()
            .await
            .unwrap();
        let payload: Vec<i64> = (0..100).collect();
        assert_eq!(adapter.invoke(&payload).await.unwrap(), 4950);
    }

    let report = Orchestrator::new(config).run().await.unwrap();

    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[0].transport, Transport::Rest);
    assert_eq!(report.results[1].transport, Transport::Rpc);
    for result in &report.results {
        assert_eq!(result.shape, Shape::Single);
        assert_eq!(result.parameter, 1);
        assert_eq!(result.calls, 1);
        assert_eq!(result.failures, 0, "{:?}", result.first_error);
        assert!(result.elapsed_seconds.unwrap() > 0.0);
    }

    services.stop().await;
}

#[tokio::test]
async fn small_table_against_both_services() {
    let services = Services::start().await;
    let config = services.config(
        &[Shape::Repeated, Shape::Concurrent, Shape::Chunked],
        Some(&[1, 20][..]),
    );

    let report = Orchestrator::new(config).run().await.unwrap();

    // repeated twice (plain + sampled), concurrent, chunked; two sizes; two transports
    assert_eq!(report.results.len(), 4 * 2 * 2);
    for result in &report.results {
        assert_eq!(result.failures, 0, "{:?}", result.first_error);
    }

    let chunked: Vec<_> = report
        .results
        .iter()
        .filter(|r| r.shape == Shape::Chunked)
        .collect();
    assert!(chunked.iter().all(|r| r.calls == 1));

    let text = OutputFormat::Text.emitter().render(&report).unwrap();
    assert!(text.contains("concurrent"));
    assert!(!text.contains("N/A"));

    services.stop().await;
}

#[tokio::test]
async fn rest_only_run_against_stopped_services_fails() {
    let services = Services::start().await;
    let config = services.config(&[Shape::Single], None);
    services.stop().await;

    let orchestrator = Orchestrator::new(config).with_transports(&[Transport::Rest]);
    let report = orchestrator.run_all().await.unwrap();
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].failures, 1);
    assert!(report.ensure_measured().is_err());
}

#[tokio::test]
async fn repeated_against_closed_port_reports_no_elapsed() {
    let services = Services::start().await;
    let config = services.config(&[Shape::Repeated], Some(&[5][..]));
    services.stop().await;

    let orchestrator = Orchestrator::new(config).with_transports(&[Transport::Rest]);
    let report = orchestrator.run_all().await.unwrap();

    let sizes: Vec<u64> = report.results.iter().map(|r| r.parameter).collect();
    assert!(sizes.iter().all(|&n| n == 5));
    for result in &report.results {
        assert_eq!(result.calls, 5);
        assert_eq!(result.failures, 5);
        assert_eq!(result.elapsed_seconds, None);
    }

    let csv = OutputFormat::Csv.emitter().render(&report).unwrap();
    let row = csv.lines().nth(1).unwrap();
    let cells: Vec<&str> = row.splitn(9, ',').collect();
    assert_eq!(&cells[..4], &["rest", "repeated", "5", ""]);
}
