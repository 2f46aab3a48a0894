// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! sumbench core library
//!
//! Configuration, error taxonomy and validated types for the REST vs gRPC
//! benchmark, plus the two transport adapters and the in-process sum
//! services they are measured against.

pub mod config;
pub mod error;
pub mod proto;
pub mod service;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use config::{Config, ConfigLoader, HarnessConfig, RestConfig, RpcConfig, ServicesConfig, ShapeEntry};
pub use error::{BenchError, ConfigError, ConfigResult, ServiceError, TransportError, TransportResult};
pub use service::{RestSumService, RpcSumService, RunningService};
pub use transport::{factory_for, AdapterFactory, RestAdapter, RpcAdapter, TransportAdapter};
pub use types::{MessageLimit, Port, Shape, Transport, WorkerLimit};
