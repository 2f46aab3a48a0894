// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Transport adapters.
//!
//! An adapter turns `invoke(numbers)` into one round trip over a concrete
//! wire protocol. Adapters are built by an [`AdapterFactory`] once per
//! benchmark invocation, outside any timer, and dropped when it ends.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::TransportResult;
use crate::types::{Shape, Transport};

pub mod rest;
pub mod rpc;

pub use rest::{RestAdapter, RestAdapterFactory};
pub use rpc::{RpcAdapter, RpcAdapterFactory};

/// One `sum` capability over a concrete transport.
///
/// Implementations must be safe to call from many tasks at once; the
/// concurrent load shape shares a single adapter between all workers.
#[async_trait]
pub trait TransportAdapter: Send + Sync {
    /// The transport this adapter speaks.
    fn transport(&self) -> Transport;

    /// Send `numbers` and return the remote sum.
    async fn invoke(&self, numbers: &[i64]) -> TransportResult<i64>;
}

/// Builds a ready-to-use adapter.
#[async_trait]
pub trait AdapterFactory: Send + Sync {
    fn transport(&self) -> Transport;

    /// Construct the adapter, including any connection setup that must not
    /// be timed.
    async fn connect(&self) -> TransportResult<Arc<dyn TransportAdapter>>;
}

/// Pick the factory for `transport` as configured for `shape`.
///
/// The single-shot shape gets the REST single-call deadline; every batch
/// shape gets the batch deadline (unbounded unless configured).
pub fn factory_for(config: &Config, transport: Transport, shape: Shape) -> Arc<dyn AdapterFactory> {
    match transport {
        Transport::Rest => {
            let timeout = rest_timeout(config, shape);
            Arc::new(RestAdapterFactory::new(
                config.rest.url.clone(),
                timeout,
                config.rest.pool_connections,
            ))
        }
        Transport::Rpc => Arc::new(RpcAdapterFactory::new(config.rpc.clone())),
    }
}

fn rest_timeout(config: &Config, shape: Shape) -> Option<Duration> {
    match shape {
        Shape::Single => config.rest.single_call_timeout,
        Shape::Repeated | Shape::Concurrent | Shape::Chunked => config.rest.batch_timeout,
    }
}
