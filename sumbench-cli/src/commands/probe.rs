// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `sumbench probe` command - Send one request and print the sum.

use anyhow::Context;
use sumbench_core::{factory_for, Config, Shape, Transport};

pub async fn execute(config: &Config, transport: Transport, numbers: &[i64]) -> anyhow::Result<()> {
    let target = match transport {
        Transport::Rest => config.rest.url.to_string(),
        Transport::Rpc => config.rpc.endpoint.to_string(),
    };
    tracing::debug!(transport = %transport, target = %target, count = numbers.len(), "Probing");

    let adapter = factory_for(config, transport, Shape::Single)
        .connect()
        .await
        .with_context(|| format!("Cannot reach {} service at {}", transport.label(), target))?;
    let result = adapter
        .invoke(numbers)
        .await
        .with_context(|| format!("{} call to {} failed", transport.label(), target))?;

    println!("Result: {}", result);
    Ok(())
}
