// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! sumbench benchmarking framework
//!
//! Measures the same "sum a list of numbers" call over REST/JSON and
//! gRPC/protobuf under four load shapes:
//!
//! - **Single**: one call, one timer
//! - **Repeated**: n sequential calls under one timer
//! - **Concurrent**: n calls on n workers, timed to the last completion
//! - **Chunked**: one payload split into chunks, per-chunk timers summed
//!
//! Results can be printed as text or CSV, or written out as JSON reports.

pub mod harness;
pub mod metrics;
pub mod orchestrator;
pub mod reporter;
pub mod sampler;

pub use harness::{chunk_ranges, BenchmarkHarness, Measurement};
pub use metrics::{BenchmarkReport, BenchmarkResult, SystemInfo};
pub use orchestrator::{bias_notes, filter_table, Orchestrator};
pub use reporter::{
    CsvEmitter, JsonEmitter, JsonReporter, OutputFormat, ReportEmitter, ReporterError, TextEmitter,
};
pub use sampler::{ResourceDelta, ResourceSampler};
