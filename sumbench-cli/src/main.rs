// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! sumbench CLI
//!
//! Runs the REST and gRPC sum services, probes them with a single call and
//! validates benchmark configuration files.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use sumbench_core::{ConfigLoader, Transport};

mod commands;

/// sumbench - REST vs gRPC sum services and probes
#[derive(Parser)]
#[command(name = "sumbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (built-in defaults if not specified)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Transport selector for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportArg {
    Rest,
    Grpc,
}

impl From<TransportArg> for Transport {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Rest => Transport::Rest,
            TransportArg::Grpc => Transport::Rpc,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the sum services in the foreground until Ctrl+C
    Serve {
        /// REST service port
        #[arg(long)]
        rest_port: Option<u16>,

        /// gRPC service port
        #[arg(long)]
        rpc_port: Option<u16>,

        /// Requests handled at once per service
        #[arg(long)]
        max_workers: Option<usize>,

        /// Start only one of the services
        #[arg(long, value_enum)]
        only: Option<TransportArg>,
    },

    /// Send one request and print the sum
    Probe {
        /// Transport to call
        #[arg(short, long, value_enum)]
        transport: TransportArg,

        /// Numbers to sum, comma separated
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true, default_value = "1,2,3")]
        numbers: Vec<i64>,
    },

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    // Dispatch to command handlers
    match cli.command {
        Commands::Serve {
            rest_port,
            rpc_port,
            max_workers,
            only,
        } => {
            let config = ConfigLoader::load_optional(cli.config.as_deref())?;
            commands::serve::execute(&config, rest_port, rpc_port, max_workers, only.map(Into::into))
                .await
        }
        Commands::Probe { transport, numbers } => {
            let config = ConfigLoader::load_optional(cli.config.as_deref())?;
            commands::probe::execute(&config, transport.into(), &numbers).await
        }
        Commands::Validate { file } => commands::validate::execute(&file),
    }
}
