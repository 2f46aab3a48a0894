// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! In-memory adapters for exercising the load shapes without a network.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use sumbench_core::{AdapterFactory, Transport, TransportAdapter, TransportError, TransportResult};

/// Counters shared by every adapter a [`MockFactory`] builds.
#[derive(Debug, Default)]
pub struct MockStats {
    pub calls: AtomicU64,
    pub connects: AtomicU64,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub payload_lens: Mutex<Vec<usize>>,
}

impl MockStats {
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn payload_lens(&self) -> Vec<usize> {
        self.payload_lens.lock().unwrap().clone()
    }
}

/// Sums locally, optionally slowly, optionally failing every k-th call.
pub struct MockAdapter {
    transport: Transport,
    delay: Duration,
    fail_every: Option<u64>,
    counter: AtomicU64,
    stats: Arc<MockStats>,
}

#[async_trait]
impl TransportAdapter for MockAdapter {
    fn transport(&self) -> Transport {
        self.transport
    }

    async fn invoke(&self, numbers: &[i64]) -> TransportResult<i64> {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        self.stats.calls.fetch_add(1, Ordering::SeqCst);
        self.stats.payload_lens.lock().unwrap().push(numbers.len());

        let now = self.stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.stats.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(k) = self.fail_every {
            if (count + 1) % k == 0 {
                return Err(TransportError::BadStatus { status: 503 });
            }
        }
        Ok(numbers.iter().sum())
    }
}

/// Builds [`MockAdapter`]s with a fixed behaviour.
pub struct MockFactory {
    pub transport: Transport,
    pub delay: Duration,
    pub fail_every: Option<u64>,
    pub refuse_connect: bool,
    pub stats: Arc<MockStats>,
}

impl MockFactory {
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            delay: Duration::ZERO,
            fail_every: None,
            refuse_connect: false,
            stats: Arc::new(MockStats::default()),
        }
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fail_every(mut self, k: u64) -> Self {
        self.fail_every = Some(k);
        self
    }

    pub fn refuse_connect(mut self) -> Self {
        self.refuse_connect = true;
        self
    }
}

#[async_trait]
impl AdapterFactory for MockFactory {
    fn transport(&self) -> Transport {
        self.transport
    }

    async fn connect(&self) -> TransportResult<Arc<dyn TransportAdapter>> {
        self.stats.connects.fetch_add(1, Ordering::SeqCst);

        if self.refuse_connect {
            return Err(TransportError::Unavailable {
                endpoint: "mock://refused".to_string(),
                reason: "connection refused".to_string(),
            });
        }

        Ok(Arc::new(MockAdapter {
            transport: self.transport,
            delay: self.delay,
            fail_every: self.fail_every,
            counter: AtomicU64::new(0),
            stats: Arc::clone(&self.stats),
        }))
    }
}
