// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! In-process sum services the harness measures against.
//!
//! Both services are plain values: build one, `bind` it to an address and
//! keep the returned [`RunningService`] to learn the bound port and stop it.

use std::net::SocketAddr;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::ServiceError;

pub mod rest;
pub mod rpc;

pub use rest::RestSumService;
pub use rpc::RpcSumService;

/// Sum `numbers`, or `None` when the result does not fit in an `i64`.
pub fn checked_sum(numbers: &[i64]) -> Option<i64> {
    numbers.iter().try_fold(0i64, |acc, n| acc.checked_add(*n))
}

/// Handle to a service running on a background task.
#[derive(Debug)]
pub struct RunningService {
    name: &'static str,
    local_addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<Result<(), ServiceError>>,
}

impl RunningService {
    pub(crate) fn new(
        name: &'static str,
        local_addr: SocketAddr,
        shutdown_tx: oneshot::Sender<()>,
        task: JoinHandle<Result<(), ServiceError>>,
    ) -> Self {
        Self {
            name,
            local_addr,
            shutdown_tx,
            task,
        }
    }

    /// Address the listener is actually bound to (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stop accepting connections, let in-flight calls finish and wait for
    /// the server task to exit.
    pub async fn shutdown(self) -> Result<(), ServiceError> {
        // The task may already have exited with an error; report that instead.
        let _ = self.shutdown_tx.send(());

        let result = self.task.await.map_err(|e| ServiceError::Serve {
            reason: format!("{} service task failed: {}", self.name, e),
        })?;

        tracing::info!(service = self.name, addr = %self.local_addr, "Service stopped");
        result
    }
}
