// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! CLI tool to run the REST vs gRPC benchmark table and print a report.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use sumbench_benchmark::{filter_table, JsonReporter, Orchestrator, OutputFormat};
use sumbench_core::{ConfigLoader, Shape, Transport};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TransportArg {
    Rest,
    Grpc,
    Both,
}

impl TransportArg {
    fn transports(self) -> &'static [Transport] {
        match self {
            TransportArg::Rest => &[Transport::Rest],
            TransportArg::Grpc => &[Transport::Rpc],
            TransportArg::Both => &Transport::ALL,
        }
    }
}

#[derive(Parser)]
#[command(name = "run_benchmarks")]
#[command(about = "Compare REST/JSON and gRPC latency for a sum-of-numbers call")]
struct Args {
    /// Configuration file (built-in defaults if not specified)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Transports to benchmark
    #[arg(short, long, value_enum, default_value_t = TransportArg::Both)]
    transport: TransportArg,

    /// Shapes to run, comma separated (all if not specified)
    #[arg(short, long, value_delimiter = ',')]
    shapes: Option<Vec<Shape>>,

    /// Parameter list for every selected shape, comma separated
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<u64>>,

    /// Output format: text, csv or json
    #[arg(short, long, default_value = "text")]
    output: OutputFormat,

    /// Also save the JSON report to this directory
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Override the REST endpoint URL
    #[arg(long)]
    rest_url: Option<String>,

    /// Override the gRPC endpoint
    #[arg(long)]
    rpc_endpoint: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = ConfigLoader::load_optional(args.config.as_deref())
        .context("loading benchmark configuration")?;

    if let Some(url) = &args.rest_url {
        config.override_rest_url(url)?;
    }
    if let Some(endpoint) = &args.rpc_endpoint {
        config.override_rpc_endpoint(endpoint)?;
    }

    if let Some(sizes) = &args.sizes {
        if sizes.contains(&0) {
            anyhow::bail!("--sizes values must be at least 1");
        }
    }

    config.shapes = filter_table(
        &config.shapes,
        args.shapes.as_deref(),
        args.sizes.as_deref(),
    );
    if config.shapes.is_empty() {
        anyhow::bail!("no benchmark shapes selected");
    }

    tracing::info!(
        rest = %config.rest.url,
        grpc = %config.rpc.endpoint,
        output = %args.output,
        "sumbench run"
    );

    let orchestrator = Orchestrator::new(config).with_transports(args.transport.transports());
    let report = orchestrator.run_all().await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    args.output.emitter().emit(&report, &mut out)?;
    out.flush()?;

    if let Some(dir) = &args.save_dir {
        let reporter = JsonReporter::new(dir)?;
        let path = reporter.save(&report)?;
        eprintln!("Benchmark report saved to: {}", path.display());
    }

    report.ensure_measured()?;
    Ok(())
}
