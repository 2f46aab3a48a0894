// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `sumbench serve` command - Run the sum services.

use sumbench_core::{Config, Port, RestSumService, RpcSumService, Transport, WorkerLimit};

pub async fn execute(
    config: &Config,
    rest_port: Option<u16>,
    rpc_port: Option<u16>,
    max_workers: Option<usize>,
    only: Option<Transport>,
) -> anyhow::Result<()> {
    let mut services = config.services.clone();
    if let Some(port) = rest_port {
        services.rest_port = Port::new(port)?;
    }
    if let Some(port) = rpc_port {
        services.rpc_port = Port::new(port)?;
    }
    if let Some(workers) = max_workers {
        services.max_workers = WorkerLimit::new(workers)?;
    }

    tracing::info!(
        max_workers = services.max_workers.value(),
        max_message = %services.max_message,
        only = ?only,
        "Starting sum services"
    );

    let mut running = Vec::new();

    if only != Some(Transport::Rpc) {
        let service = RestSumService::from_config(&services)
            .bind(services.rest_addr())
            .await?;
        println!("✓ REST service on http://{}/process", service.local_addr());
        running.push(service);
    }

    if only != Some(Transport::Rest) {
        let service = RpcSumService::from_config(&services)
            .bind(services.rpc_addr())
            .await?;
        println!("✓ gRPC service on {}", service.local_addr());
        running.push(service);
    }

    println!();
    println!("Press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;
    println!();

    for service in running {
        let name = service.name();
        match service.shutdown().await {
            Ok(()) => println!("✓ {} stopped", name),
            Err(e) => tracing::error!(service = name, error = %e, "Service did not stop cleanly"),
        }
    }

    Ok(())
}
