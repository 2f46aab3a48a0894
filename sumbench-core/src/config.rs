// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML configuration parser with strict validation.
//!
//! Every field has a default, so an absent file yields the settings of the
//! stock benchmark driver: REST on :5000, gRPC on :50051, 50 MiB message
//! limits and the five-step load table. Any invalid field is a
//! [`ConfigError`] that stops the run before the first measurement.

use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::{ConfigError, ConfigResult};
use crate::types::{MessageLimit, Port, Shape, WorkerLimit, DEFAULT_MESSAGE_LIMIT};

/// Default chunk length for the chunked shape.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// Raw REST client configuration as parsed from YAML.
#[derive(Debug, Deserialize)]
struct RawRestConfig {
    #[serde(default = "default_rest_url")]
    url: String,
    #[serde(default = "default_single_call_timeout")]
    single_call_timeout_ms: Option<u64>,
    #[serde(default)]
    batch_timeout_ms: Option<u64>,
    #[serde(default)]
    pool_connections: bool,
}

fn default_rest_url() -> String {
    "http://localhost:5000/process".to_string()
}

fn default_single_call_timeout() -> Option<u64> {
    Some(5000)
}

impl Default for RawRestConfig {
    fn default() -> Self {
        Self {
            url: default_rest_url(),
            single_call_timeout_ms: default_single_call_timeout(),
            batch_timeout_ms: None,
            pool_connections: false,
        }
    }
}

/// Raw RPC client configuration.
#[derive(Debug, Deserialize)]
struct RawRpcConfig {
    #[serde(default = "default_rpc_endpoint")]
    endpoint: String,
    #[serde(default = "default_message_bytes")]
    max_message_bytes: usize,
    #[serde(default = "default_connect_timeout")]
    connect_timeout_ms: Option<u64>,
    #[serde(default)]
    call_timeout_ms: Option<u64>,
}

fn default_rpc_endpoint() -> String {
    "http://localhost:50051".to_string()
}

fn default_message_bytes() -> usize {
    DEFAULT_MESSAGE_LIMIT
}

fn default_connect_timeout() -> Option<u64> {
    Some(5000)
}

impl Default for RawRpcConfig {
    fn default() -> Self {
        Self {
            endpoint: default_rpc_endpoint(),
            max_message_bytes: default_message_bytes(),
            connect_timeout_ms: default_connect_timeout(),
            call_timeout_ms: None,
        }
    }
}

/// Raw harness configuration.
#[derive(Debug, Deserialize)]
struct RawHarnessConfig {
    #[serde(default = "default_payload_len")]
    payload_len: usize,
    #[serde(default = "default_true")]
    warm_up_sampler: bool,
}

fn default_payload_len() -> usize {
    100
}

fn default_true() -> bool {
    true
}

impl Default for RawHarnessConfig {
    fn default() -> Self {
        Self {
            payload_len: default_payload_len(),
            warm_up_sampler: true,
        }
    }
}

/// Raw sum service configuration.
#[derive(Debug, Deserialize)]
struct RawServicesConfig {
    #[serde(default = "default_bind_address")]
    bind_address: String,
    #[serde(default = "default_rest_port")]
    rest_port: u16,
    #[serde(default = "default_rpc_port")]
    rpc_port: u16,
    #[serde(default = "default_max_workers")]
    max_workers: usize,
    #[serde(default = "default_message_bytes")]
    max_message_bytes: usize,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_rest_port() -> u16 {
    5000
}

fn default_rpc_port() -> u16 {
    50051
}

fn default_max_workers() -> usize {
    10
}

impl Default for RawServicesConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            rest_port: default_rest_port(),
            rpc_port: default_rpc_port(),
            max_workers: default_max_workers(),
            max_message_bytes: default_message_bytes(),
        }
    }
}

/// Raw entry of the load table.
#[derive(Debug, Deserialize)]
struct RawShapeEntry {
    shape: Shape,
    #[serde(default)]
    parameters: Vec<u64>,
    #[serde(default)]
    chunk_size: Option<usize>,
    #[serde(default)]
    sample_resources: bool,
}

fn default_shapes() -> Vec<RawShapeEntry> {
    let entry = |shape, parameters: &[u64], sample_resources| RawShapeEntry {
        shape,
        parameters: parameters.to_vec(),
        chunk_size: None,
        sample_resources,
    };

    vec![
        entry(Shape::Single, &[1], false),
        entry(Shape::Repeated, &[1, 10, 100, 1000, 10000], false),
        entry(Shape::Concurrent, &[1, 10, 100, 1000, 10000], false),
        entry(Shape::Chunked, &[10, 100, 1000, 10000, 100000], false),
        entry(Shape::Repeated, &[100, 1000, 10000], true),
    ]
}

/// Raw root configuration file.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    rest: RawRestConfig,
    #[serde(default)]
    rpc: RawRpcConfig,
    #[serde(default)]
    harness: RawHarnessConfig,
    #[serde(default)]
    services: RawServicesConfig,
    #[serde(default = "default_shapes")]
    shapes: Vec<RawShapeEntry>,
}

/// Validated REST client configuration.
#[derive(Debug, Clone)]
pub struct RestConfig {
    pub url: Url,
    /// Deadline for the single-shot shape.
    pub single_call_timeout: Option<Duration>,
    /// Deadline for every call of the batch shapes; `None` is unbounded.
    pub batch_timeout: Option<Duration>,
    /// Keep idle connections between calls.
    pub pool_connections: bool,
}

/// Validated RPC client configuration.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub endpoint: Url,
    pub max_message: MessageLimit,
    pub connect_timeout: Option<Duration>,
    /// Per-call deadline; `None` leaves individual call latency unbounded.
    pub call_timeout: Option<Duration>,
}

/// Validated harness configuration.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Length of the `0..n` payload used by the per-call shapes.
    pub payload_len: usize,
    pub warm_up_sampler: bool,
}

/// Validated sum service configuration.
#[derive(Debug, Clone)]
pub struct ServicesConfig {
    pub bind_address: IpAddr,
    pub rest_port: Port,
    pub rpc_port: Port,
    pub max_workers: WorkerLimit,
    pub max_message: MessageLimit,
}

impl ServicesConfig {
    pub fn rest_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.rest_port.value())
    }

    pub fn rpc_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.rpc_port.value())
    }
}

/// One validated row of the load table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeEntry {
    pub shape: Shape,
    /// Count, worker count or total data size, depending on the shape.
    pub parameters: Vec<u64>,
    /// Only meaningful for [`Shape::Chunked`].
    pub chunk_size: usize,
    pub sample_resources: bool,
}

/// Complete validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub rest: RestConfig,
    pub rpc: RpcConfig,
    pub harness: HarnessConfig,
    pub services: ServicesConfig,
    pub shapes: Vec<ShapeEntry>,
}

impl Config {
    /// Replace the REST URL, with the same validation as the file field.
    pub fn override_rest_url(&mut self, url: &str) -> ConfigResult<()> {
        self.rest.url = parse_http_url("rest.url", url)?;
        Ok(())
    }

    /// Replace the RPC endpoint, with the same validation as the file field.
    pub fn override_rpc_endpoint(&mut self, endpoint: &str) -> ConfigResult<()> {
        self.rpc.endpoint = parse_http_url("rpc.endpoint", endpoint)?;
        Ok(())
    }
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// The built-in configuration, equivalent to an empty file.
    pub fn defaults() -> ConfigResult<Config> {
        Self::validate(RawConfig {
            shapes: default_shapes(),
            ..RawConfig::default()
        })
    }

    /// Load from `path` when given, otherwise fall back to [`ConfigLoader::defaults`].
    pub fn load_optional(path: Option<&Path>) -> ConfigResult<Config> {
        match path {
            Some(path) => Self::load_file(path),
            None => Self::defaults(),
        }
    }

    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> ConfigResult<Config> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            context: "reading config file",
            source: e,
        })?;

        Self::load_string(&content)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> ConfigResult<Config> {
        // An empty document deserializes to unit, not to a mapping.
        if content.trim().is_empty() {
            return Self::defaults();
        }

        let raw: RawConfig = serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            message: format!("YAML parse error: {}", e),
        })?;

        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> ConfigResult<Config> {
        let rest = Self::validate_rest(raw.rest)?;
        let rpc = Self::validate_rpc(raw.rpc)?;
        let harness = Self::validate_harness(raw.harness)?;
        let services = Self::validate_services(raw.services)?;

        let mut shapes = Vec::with_capacity(raw.shapes.len());
        for (index, entry) in raw.shapes.into_iter().enumerate() {
            shapes.push(Self::validate_shape(entry, index)?);
        }

        Ok(Config {
            rest,
            rpc,
            harness,
            services,
            shapes,
        })
    }

    fn validate_rest(raw: RawRestConfig) -> ConfigResult<RestConfig> {
        let url = parse_http_url("rest.url", &raw.url)?;

        Ok(RestConfig {
            url,
            single_call_timeout: positive_millis("rest.single_call_timeout_ms", raw.single_call_timeout_ms)?,
            batch_timeout: positive_millis("rest.batch_timeout_ms", raw.batch_timeout_ms)?,
            pool_connections: raw.pool_connections,
        })
    }

    fn validate_rpc(raw: RawRpcConfig) -> ConfigResult<RpcConfig> {
        let endpoint = parse_http_url("rpc.endpoint", &raw.endpoint)?;

        Ok(RpcConfig {
            endpoint,
            max_message: MessageLimit::new(raw.max_message_bytes)?,
            connect_timeout: positive_millis("rpc.connect_timeout_ms", raw.connect_timeout_ms)?,
            call_timeout: positive_millis("rpc.call_timeout_ms", raw.call_timeout_ms)?,
        })
    }

    fn validate_harness(raw: RawHarnessConfig) -> ConfigResult<HarnessConfig> {
        if raw.payload_len == 0 {
            return Err(ConfigError::InvalidFieldValue {
                field: "harness.payload_len",
                value: "0".to_string(),
                reason: "Payload must contain at least one number".to_string(),
            });
        }

        Ok(HarnessConfig {
            payload_len: raw.payload_len,
            warm_up_sampler: raw.warm_up_sampler,
        })
    }

    fn validate_services(raw: RawServicesConfig) -> ConfigResult<ServicesConfig> {
        let bind_address: IpAddr =
            raw.bind_address
                .parse()
                .map_err(|_| ConfigError::InvalidFieldValue {
                    field: "services.bind_address",
                    value: raw.bind_address.clone(),
                    reason: "Must be an IPv4 or IPv6 address".to_string(),
                })?;

        let rest_port = Port::new(raw.rest_port)?;
        let rpc_port = Port::new(raw.rpc_port)?;

        if rest_port == rpc_port {
            return Err(ConfigError::InvalidFieldValue {
                field: "services.rpc_port",
                value: rpc_port.to_string(),
                reason: format!("Port {} is already used by the REST service", rest_port),
            });
        }

        Ok(ServicesConfig {
            bind_address,
            rest_port,
            rpc_port,
            max_workers: WorkerLimit::new(raw.max_workers)?,
            max_message: MessageLimit::new(raw.max_message_bytes)?,
        })
    }

    fn validate_shape(raw: RawShapeEntry, index: usize) -> ConfigResult<ShapeEntry> {
        let parameters = match raw.shape {
            // A single call has no parameter to vary.
            Shape::Single => vec![1],
            _ if raw.parameters.is_empty() => {
                return Err(ConfigError::InvalidFieldValue {
                    field: "shapes.parameters",
                    value: format!("[] in shape at index {}", index),
                    reason: format!("Shape '{}' needs at least one parameter", raw.shape),
                });
            }
            _ => raw.parameters,
        };

        if let Some(zero) = parameters.iter().find(|p| **p == 0) {
            return Err(ConfigError::InvalidFieldValue {
                field: "shapes.parameters",
                value: format!("{} in shape at index {}", zero, index),
                reason: "Parameters must be at least 1".to_string(),
            });
        }

        let chunk_size = raw.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE);
        if chunk_size == 0 {
            return Err(ConfigError::InvalidFieldValue {
                field: "shapes.chunk_size",
                value: format!("0 in shape at index {}", index),
                reason: "Chunk size must be at least 1".to_string(),
            });
        }

        Ok(ShapeEntry {
            shape: raw.shape,
            parameters,
            chunk_size,
            sample_resources: raw.sample_resources,
        })
    }
}

fn parse_http_url(field: &'static str, value: &str) -> ConfigResult<Url> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ConfigError::InvalidUrl {
                field,
                value: value.to_string(),
                reason: format!("Unsupported scheme '{}', expected http or https", other),
            })
        }
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: "URL has no host".to_string(),
        });
    }

    Ok(url)
}

fn positive_millis(field: &'static str, value: Option<u64>) -> ConfigResult<Option<Duration>> {
    match value {
        Some(0) => Err(ConfigError::InvalidFieldValue {
            field,
            value: "0".to_string(),
            reason: "Timeout must be greater than 0 (omit it for no deadline)".to_string(),
        }),
        Some(ms) => Ok(Some(Duration::from_millis(ms))),
        None => Ok(None),
    }
}
