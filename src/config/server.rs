//! HTTP listener settings for the prediction gateway

use serde::{Deserialize, Serialize};

/// Default request body cap, in bytes
pub const DEFAULT_BODY_LIMIT: usize = 16 * 1024;

/// Where and how the gateway listens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface address, `0.0.0.0` for all interfaces
    pub host: String,

    pub port: u16,

    /// Answer CORS preflights for any origin
    pub permissive_cors: bool,

    /// Emit a span per HTTP request
    pub trace_requests: bool,

    /// Largest accepted request body, in bytes
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            permissive_cors: true,
            trace_requests: true,
            body_limit_bytes: DEFAULT_BODY_LIMIT,
        }
    }
}

impl ServerConfig {
    /// `host:port` for the listener
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
