// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `sumbench validate` command - Validate configuration file.

use std::path::Path;
use std::time::Duration;

use sumbench_core::ConfigLoader;

fn timeout(value: Option<Duration>) -> String {
    value
        .map(|d| format!("{}ms", d.as_millis()))
        .unwrap_or_else(|| "none".to_string())
}

pub fn execute(file: &Path) -> anyhow::Result<()> {
    tracing::info!(file = %file.display(), "Validating configuration");

    match ConfigLoader::load_file(file) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!();
            println!("REST Client:");
            println!("  URL:                 {}", config.rest.url);
            println!("  Single Call Timeout: {}", timeout(config.rest.single_call_timeout));
            println!("  Batch Timeout:       {}", timeout(config.rest.batch_timeout));
            println!("  Connection Pooling:  {}", config.rest.pool_connections);
            println!();
            println!("gRPC Client:");
            println!("  Endpoint:            {}", config.rpc.endpoint);
            println!("  Message Limit:       {}", config.rpc.max_message);
            println!("  Connect Timeout:     {}", timeout(config.rpc.connect_timeout));
            println!("  Call Timeout:        {}", timeout(config.rpc.call_timeout));
            println!();
            println!("Services:");
            println!("  REST Address:        {}", config.services.rest_addr());
            println!("  gRPC Address:        {}", config.services.rpc_addr());
            println!("  Max Workers:         {}", config.services.max_workers.value());
            println!("  Message Limit:       {}", config.services.max_message);
            println!();
            println!("Load Table ({} entries, payload {}):", config.shapes.len(), config.harness.payload_len);
            for entry in &config.shapes {
                let chunk = if entry.shape == sumbench_core::Shape::Chunked {
                    format!(", chunk {}", entry.chunk_size)
                } else {
                    String::new()
                };
                let sampled = if entry.sample_resources { ", sampled" } else { "" };
                println!("  - {} {:?}{}{}", entry.shape, entry.parameters, chunk, sampled);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
