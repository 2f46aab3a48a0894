// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Report output: console text, CSV and JSON emitters, plus saving JSON
//! reports to timestamped files for later comparison.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::metrics::{BenchmarkReport, BenchmarkResult};

/// CSV header, one column per [`BenchmarkResult`] field.
pub const CSV_HEADER: &str =
    "transport,shape,parameter,elapsed_seconds,cpu_percent,memory_delta_mb,calls,failures,first_error";

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("Report I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown output format '{0}', expected text, csv or json")]
    UnknownFormat(String),
}

/// Writes a report in one output format.
pub trait ReportEmitter {
    fn emit(&self, report: &BenchmarkReport, out: &mut dyn Write) -> Result<(), ReporterError>;

    /// Render to a string.
    fn render(&self, report: &BenchmarkReport) -> Result<String, ReporterError> {
        let mut buf = Vec::new();
        self.emit(report, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Output format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn emitter(&self) -> Box<dyn ReportEmitter> {
        match self {
            OutputFormat::Text => Box::new(TextEmitter),
            OutputFormat::Csv => Box::new(CsvEmitter),
            OutputFormat::Json => Box::new(JsonEmitter),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ReporterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(ReporterError::UnknownFormat(other.to_string())),
        }
    }
}

/// Human-readable console output.
pub struct TextEmitter;

impl TextEmitter {
    /// One line per result, e.g.
    /// `grpc    repeated     n=100      elapsed=0.0421s  cpu=3.10%  mem=+0.12MB  failures=0/100`.
    pub fn format_line(result: &BenchmarkResult) -> String {
        let elapsed = match result.elapsed_seconds {
            Some(secs) if !result.is_total_failure() => format!("{:.4}s", secs),
            _ => "N/A".to_string(),
        };

        let mut line = format!(
            "{:<7} {:<12} n={:<8} elapsed={}",
            result.transport.to_string(),
            result.shape.to_string(),
            result.parameter,
            elapsed
        );

        if let Some(cpu) = result.cpu_percent {
            line.push_str(&format!("  cpu={:.2}%", cpu));
        }
        if let Some(mem) = result.memory_delta_mb {
            line.push_str(&format!("  mem={:+.2}MB", mem));
        }

        line.push_str(&format!("  failures={}/{}", result.failures, result.calls));

        if let Some(error) = &result.first_error {
            line.push_str(&format!("  error: {}", error));
        }
        line
    }
}

impl ReportEmitter for TextEmitter {
    fn emit(&self, report: &BenchmarkReport, out: &mut dyn Write) -> Result<(), ReporterError> {
        let info = &report.system_info;
        writeln!(
            out,
            "{} {} ({})",
            report.benchmark_suite,
            report.version,
            report.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(
            out,
            "System: {} {}, {} x {}, {:.1} GiB RAM, host {}",
            info.os,
            info.os_version,
            info.cpu_cores,
            info.cpu_model,
            info.memory_bytes as f64 / (1024.0 * 1024.0 * 1024.0),
            info.hostname
        )?;

        if !report.notes.is_empty() {
            writeln!(out, "Notes:")?;
            for note in &report.notes {
                writeln!(out, "  - {}", note)?;
            }
        }
        writeln!(out)?;

        for result in &report.results {
            writeln!(out, "{}", Self::format_line(result))?;
        }
        Ok(())
    }
}

/// Comma-separated output with a header row.
pub struct CsvEmitter;

impl CsvEmitter {
    fn row(result: &BenchmarkResult) -> String {
        let optional = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();

        [
            result.transport.to_string(),
            result.shape.to_string(),
            result.parameter.to_string(),
            optional(result.elapsed_seconds),
            optional(result.cpu_percent),
            optional(result.memory_delta_mb),
            result.calls.to_string(),
            result.failures.to_string(),
            csv_field(result.first_error.as_deref().unwrap_or("")),
        ]
        .join(",")
    }
}

impl ReportEmitter for CsvEmitter {
    fn emit(&self, report: &BenchmarkReport, out: &mut dyn Write) -> Result<(), ReporterError> {
        writeln!(out, "{}", CSV_HEADER)?;
        for result in &report.results {
            writeln!(out, "{}", Self::row(result))?;
        }
        Ok(())
    }
}

/// Quote a field when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// The full report as pretty-printed JSON.
pub struct JsonEmitter;

impl ReportEmitter for JsonEmitter {
    fn emit(&self, report: &BenchmarkReport, out: &mut dyn Write) -> Result<(), ReporterError> {
        serde_json::to_writer_pretty(&mut *out, report)?;
        writeln!(out)?;
        Ok(())
    }
}

/// JSON reporter for benchmark results.
pub struct JsonReporter {
    /// Output directory for benchmark data
    output_dir: PathBuf,
}

impl JsonReporter {
    /// Create a new JSON reporter with the specified output directory.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, ReporterError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Save a benchmark report to a JSON file named after its timestamp.
    ///
    /// Returns the path to the created file.
    pub fn save(&self, report: &BenchmarkReport) -> Result<PathBuf, ReporterError> {
        let timestamp = report.timestamp.format("%Y-%m-%dT%H-%M-%S%.3fZ");
        let filename = format!("{}_{}.json", report.benchmark_suite, timestamp);
        let filepath = self.output_dir.join(&filename);

        let file = File::create(&filepath)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, report)?;

        tracing::info!(path = %filepath.display(), "Report saved");
        Ok(filepath)
    }

    /// List all existing benchmark files in the output directory.
    pub fn list_reports(&self) -> Result<Vec<PathBuf>, ReporterError> {
        let mut reports = Vec::new();
        for entry in fs::read_dir(&self.output_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                reports.push(path);
            }
        }
        reports.sort();
        Ok(reports)
    }

    /// Load an existing benchmark report from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<BenchmarkReport, ReporterError> {
        let file = File::open(path)?;
        let report = serde_json::from_reader(file)?;
        Ok(report)
    }
}
