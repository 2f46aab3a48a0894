// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Custom error types for sumbench.
//!
//! Errors are explicit enums. Configuration errors are fatal and abort a run
//! before any measurement; transport errors are recorded per call and never
//! abort a batch.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors - fail fast before measurement starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    Parse { message: String },

    #[error("Invalid URL for {field}: {value} - {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Per-call transport failures.
///
/// None of these are retried: a retry would fold a second round trip into
/// the measured latency.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Call timed out{}", timeout_suffix(.after_ms))]
    Timeout { after_ms: Option<u64> },

    #[error("Unexpected HTTP status: {status}")]
    BadStatus { status: u16 },

    #[error("Malformed response: {reason}")]
    Malformed { reason: String },

    #[error("Endpoint unavailable: {endpoint} - {reason}")]
    Unavailable { endpoint: String, reason: String },

    #[error("Payload of {size} bytes exceeds message limit of {limit} bytes")]
    Oversize { size: usize, limit: usize },

    #[error("Call rejected with status {code}: {message}")]
    Rejected { code: String, message: String },
}

fn timeout_suffix(after_ms: &Option<u64>) -> String {
    after_ms
        .map(|ms| format!(" after {}ms", ms))
        .unwrap_or_default()
}

impl TransportError {
    /// Short stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            TransportError::Timeout { .. } => "timeout",
            TransportError::BadStatus { .. } => "bad_status",
            TransportError::Malformed { .. } => "malformed",
            TransportError::Unavailable { .. } => "unavailable",
            TransportError::Oversize { .. } => "oversize",
            TransportError::Rejected { .. } => "rejected",
        }
    }
}

/// Harness-level errors.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Partial failure: {succeeded} of {attempted} calls succeeded")]
    PartialFailure { succeeded: u64, attempted: u64 },

    #[error("Resource sampler error: {reason}")]
    Sampler { reason: String },

    #[error("No measurement succeeded: all {attempted} combinations failed")]
    NoMeasurements { attempted: usize },
}

/// Errors raised while hosting the sum services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Service terminated: {reason}")]
    Serve { reason: String },
}

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for a single transport call.
pub type TransportResult<T> = Result<T, TransportError>;
