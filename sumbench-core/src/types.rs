// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers for validated inputs.
//!
//! All types validate their invariants at creation time, so a value that
//! reaches the harness or a service is already known to be usable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest accepted message limit: 1 byte
const MIN_MESSAGE_LIMIT: usize = 1;
/// Largest accepted message limit: 1 GiB
const MAX_MESSAGE_LIMIT: usize = 1024 * 1024 * 1024;
/// Default RPC send/receive limit: 50 MiB
pub const DEFAULT_MESSAGE_LIMIT: usize = 50 * 1024 * 1024;
/// Upper bound on the service worker pool.
const MAX_WORKERS: usize = 10_000;

/// Validated network port.
/// Must be in range 1-65535 (0 is reserved).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// Create a new Port with validation.
    pub fn new(port: u16) -> Result<Self, ConfigError> {
        if port == 0 {
            return Err(ConfigError::InvalidFieldValue {
                field: "port",
                value: port.to_string(),
                reason: "Port 0 is reserved and cannot be used".to_string(),
            });
        }
        Ok(Self(port))
    }

    /// Get the inner port value.
    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = ConfigError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Validated message size limit in bytes, applied to both send and receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct MessageLimit(usize);

impl MessageLimit {
    /// Create a new MessageLimit with bounds validation.
    pub fn new(bytes: usize) -> Result<Self, ConfigError> {
        if !(MIN_MESSAGE_LIMIT..=MAX_MESSAGE_LIMIT).contains(&bytes) {
            return Err(ConfigError::InvalidFieldValue {
                field: "max_message_bytes",
                value: bytes.to_string(),
                reason: format!(
                    "Must be between {} and {} bytes",
                    MIN_MESSAGE_LIMIT, MAX_MESSAGE_LIMIT
                ),
            });
        }
        Ok(Self(bytes))
    }

    /// Get the limit in bytes.
    pub fn bytes(&self) -> usize {
        self.0
    }
}

impl Default for MessageLimit {
    fn default() -> Self {
        Self(DEFAULT_MESSAGE_LIMIT)
    }
}

impl fmt::Display for MessageLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mib = self.0 as f64 / (1024.0 * 1024.0);
        if mib >= 1.0 {
            write!(f, "{:.0}MiB", mib)
        } else {
            write!(f, "{}B", self.0)
        }
    }
}

impl TryFrom<usize> for MessageLimit {
    type Error = ConfigError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MessageLimit> for usize {
    fn from(limit: MessageLimit) -> Self {
        limit.0
    }
}

/// Validated worker pool size for the sum services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct WorkerLimit(usize);

impl WorkerLimit {
    /// Create a new WorkerLimit, 1..=10000.
    pub fn new(workers: usize) -> Result<Self, ConfigError> {
        if workers == 0 || workers > MAX_WORKERS {
            return Err(ConfigError::InvalidFieldValue {
                field: "max_workers",
                value: workers.to_string(),
                reason: format!("Must be between 1 and {}", MAX_WORKERS),
            });
        }
        Ok(Self(workers))
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

impl Default for WorkerLimit {
    fn default() -> Self {
        Self(10)
    }
}

impl TryFrom<usize> for WorkerLimit {
    type Error = ConfigError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WorkerLimit> for usize {
    fn from(limit: WorkerLimit) -> Self {
        limit.0
    }
}

/// The transport under measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// JSON over HTTP/1.1
    Rest,
    /// Protobuf over HTTP/2 (gRPC)
    #[serde(rename = "grpc")]
    Rpc,
}

impl Transport {
    /// Both transports in report order.
    pub const ALL: [Transport; 2] = [Transport::Rest, Transport::Rpc];

    /// Human-facing label for console messages.
    pub fn label(&self) -> &'static str {
        match self {
            Transport::Rest => "REST",
            Transport::Rpc => "gRPC",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Rest => write!(f, "rest"),
            Transport::Rpc => write!(f, "grpc"),
        }
    }
}

impl FromStr for Transport {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rest" | "http" => Ok(Transport::Rest),
            "grpc" | "rpc" => Ok(Transport::Rpc),
            other => Err(ConfigError::InvalidFieldValue {
                field: "transport",
                value: other.to_string(),
                reason: "Expected one of: rest, grpc".to_string(),
            }),
        }
    }
}

/// Pattern of issuing calls against a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// One call, one timer.
    Single,
    /// n sequential calls under one timer.
    Repeated,
    /// n calls dispatched at once onto n workers.
    Concurrent,
    /// One payload split into chunks, each call timed on its own.
    Chunked,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Single => write!(f, "single"),
            Shape::Repeated => write!(f, "repeated"),
            Shape::Concurrent => write!(f, "concurrent"),
            Shape::Chunked => write!(f, "chunked"),
        }
    }
}

impl FromStr for Shape {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(Shape::Single),
            "repeated" | "multiple" => Ok(Shape::Repeated),
            "concurrent" => Ok(Shape::Concurrent),
            "chunked" => Ok(Shape::Chunked),
            other => Err(ConfigError::InvalidFieldValue {
                field: "shape",
                value: other.to_string(),
                reason: "Expected one of: single, repeated, concurrent, chunked".to_string(),
            }),
        }
    }
}
