//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `ROUTER_*` environment variables.
//! A setting that resolves to its type's zero value (`0`, `0.0`, `""`) is treated as
//! unset and replaced by the default.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_COLLECTION_NAME, DEFAULT_EMBEDDING_TIMEOUT, DEFAULT_MODEL, DEFAULT_SCORE_THRESHOLD,
    DEFAULT_TOP_K,
};
use crate::routing::RoutingConfig;

/// Default RPC port (JSON routing API).
pub const DEFAULT_RPC_PORT: u16 = 50051;

/// Default HTTP port (health surface).
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default embedding service URL used when `ROUTER_EMBEDDING_URL` is not set.
pub const DEFAULT_EMBEDDING_URL: &str = "http://localhost:50052";

pub const DEFAULT_QDRANT_HOST: &str = "localhost";

/// Qdrant gRPC port.
pub const DEFAULT_QDRANT_PORT: u16 = 6334;

/// Process configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `ROUTER_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address both servers bind to. Default: `0.0.0.0`.
    pub bind_addr: IpAddr,

    /// Port of the routing API. Default: `50051`.
    pub rpc_port: u16,

    /// Port of the `/health` + `/ready` surface. Default: `8080`.
    pub http_port: u16,

    /// Base URL of the embedding service.
    pub embedding_url: String,

    /// Per-call embedding timeout. Default: 500ms.
    pub embedding_timeout: Duration,

    pub qdrant_host: String,

    pub qdrant_port: u16,

    /// Collection holding the route utterances. Default: `llm_routes`.
    pub collection: String,

    /// Model reported for the `default` route.
    pub default_model: String,

    /// Minimum top-match score required to pick a route. Default: `0.5`.
    pub score_threshold: f32,

    /// Number of matches requested from the index. Default: `3`.
    pub top_k: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            rpc_port: DEFAULT_RPC_PORT,
            http_port: DEFAULT_HTTP_PORT,
            embedding_url: DEFAULT_EMBEDDING_URL.to_string(),
            embedding_timeout: DEFAULT_EMBEDDING_TIMEOUT,
            qdrant_host: DEFAULT_QDRANT_HOST.to_string(),
            qdrant_port: DEFAULT_QDRANT_PORT,
            collection: DEFAULT_COLLECTION_NAME.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl Config {
    const ENV_BIND_ADDR: &'static str = "ROUTER_BIND_ADDR";
    const ENV_RPC_PORT: &'static str = "ROUTER_RPC_PORT";
    const ENV_HTTP_PORT: &'static str = "ROUTER_HTTP_PORT";
    const ENV_EMBEDDING_URL: &'static str = "ROUTER_EMBEDDING_URL";
    const ENV_EMBEDDING_TIMEOUT_MS: &'static str = "ROUTER_EMBEDDING_TIMEOUT_MS";
    const ENV_QDRANT_HOST: &'static str = "ROUTER_QDRANT_HOST";
    const ENV_QDRANT_PORT: &'static str = "ROUTER_QDRANT_PORT";
    const ENV_COLLECTION: &'static str = "ROUTER_COLLECTION";
    const ENV_DEFAULT_MODEL: &'static str = "ROUTER_DEFAULT_MODEL";
    const ENV_SCORE_THRESHOLD: &'static str = "ROUTER_SCORE_THRESHOLD";
    const ENV_TOP_K: &'static str = "ROUTER_TOP_K";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let rpc_port = Self::parse_port_from_env(Self::ENV_RPC_PORT, defaults.rpc_port)?;
        let http_port = Self::parse_port_from_env(Self::ENV_HTTP_PORT, defaults.http_port)?;
        let embedding_url =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_URL, defaults.embedding_url);
        let embedding_timeout = Self::parse_number_from_env::<u64>(
            Self::ENV_EMBEDDING_TIMEOUT_MS,
        )?
        .filter(|ms| *ms != 0)
        .map(Duration::from_millis)
        .unwrap_or(defaults.embedding_timeout);
        let qdrant_host = Self::parse_string_from_env(Self::ENV_QDRANT_HOST, defaults.qdrant_host);
        let qdrant_port = Self::parse_port_from_env(Self::ENV_QDRANT_PORT, defaults.qdrant_port)?;
        let collection = Self::parse_string_from_env(Self::ENV_COLLECTION, defaults.collection);
        let default_model =
            Self::parse_string_from_env(Self::ENV_DEFAULT_MODEL, defaults.default_model);
        let score_threshold = Self::parse_number_from_env::<f32>(Self::ENV_SCORE_THRESHOLD)?
            .filter(|t| *t != 0.0)
            .unwrap_or(defaults.score_threshold);
        let top_k = Self::parse_number_from_env::<u64>(Self::ENV_TOP_K)?
            .filter(|k| *k != 0)
            .unwrap_or(defaults.top_k);

        Ok(Self {
            bind_addr,
            rpc_port,
            http_port,
            embedding_url,
            embedding_timeout,
            qdrant_host,
            qdrant_port,
            collection,
            default_model,
            score_threshold,
            top_k,
        })
    }

    /// Validates cross-field invariants (does not contact any service).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc_port == self.http_port {
            return Err(ConfigError::PortConflict {
                port: self.rpc_port,
            });
        }

        if !self.score_threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold {
                value: self.score_threshold,
            });
        }

        if !(self.embedding_url.starts_with("http://")
            || self.embedding_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidUrl {
                name: Self::ENV_EMBEDDING_URL,
                value: self.embedding_url.clone(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{rpc_port}"`.
    pub fn rpc_socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.rpc_port)
    }

    /// Returns `"{bind_addr}:{http_port}"`.
    pub fn http_socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.http_port)
    }

    /// Qdrant gRPC endpoint built from host and port.
    pub fn qdrant_url(&self) -> String {
        format!("http://{}:{}", self.qdrant_host, self.qdrant_port)
    }

    /// Pipeline settings derived from this configuration.
    pub fn routing_config(&self) -> RoutingConfig {
        RoutingConfig::default()
            .collection_name(&self.collection)
            .default_model(&self.default_model)
            .score_threshold(self.score_threshold)
            .top_k(self.top_k)
            .embedding_timeout(self.embedding_timeout)
    }

    fn parse_port_from_env(var_name: &'static str, default: u16) -> Result<u16, ConfigError> {
        match env::var(var_name) {
            Ok(value) => {
                let port: u16 = value.trim().parse().map_err(|e| ConfigError::PortParseError {
                    name: var_name,
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Ok(default);
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_number_from_env<T: FromStr>(var_name: &'static str) -> Result<Option<T>, ConfigError> {
        match env::var(var_name) {
            Ok(value) if value.trim().is_empty() => Ok(None),
            Ok(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                }),
            Err(_) => Ok(None),
        }
    }
}
