//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port string could not be parsed as a number in 0..=65535.
    #[error("failed to parse {name}='{value}': {source}")]
    PortParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// A numeric setting could not be parsed.
    #[error("invalid numeric value for {name}: '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    /// The routing API and the health surface were given the same port.
    #[error("rpc and http servers cannot share port {port}")]
    PortConflict { port: u16 },

    /// Score threshold is NaN or infinite.
    #[error("score threshold must be finite, got {value}")]
    InvalidThreshold { value: f32 },

    /// A URL setting is missing its `http://` or `https://` scheme.
    #[error("{name} must be an http(s) URL, got '{value}'")]
    InvalidUrl { name: &'static str, value: String },
}
