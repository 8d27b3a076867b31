//! Service configuration
//!
//! Values come from `QR_*` environment variables. Missing or unparsable
//! values fall back to the defaults below; the library itself never reads
//! the environment.

use std::net::SocketAddr;
use std::str::FromStr;

use tracing::warn;

use crate::models::ECLevel;
use crate::render::{DEFAULT_BORDER, DEFAULT_SCALE};

/// Listen address when `QR_BIND_ADDR` is unset
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5050";
/// Request body cap when `QR_MAX_BODY_BYTES` is unset
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024;

/// Settings for the HTTP service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address (`QR_BIND_ADDR`)
    pub bind_addr: SocketAddr,
    /// Error correction level for generated symbols (`QR_EC_LEVEL`)
    pub ec_level: ECLevel,
    /// Pixels per module (`QR_MODULE_SCALE`, at least 1)
    pub module_scale: u32,
    /// Quiet-zone modules (`QR_BORDER`)
    pub border: u32,
    /// Largest accepted request body in bytes (`QR_MAX_BODY_BYTES`)
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5050)),
            ec_level: ECLevel::M,
            module_scale: DEFAULT_SCALE,
            border: DEFAULT_BORDER,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            bind_addr: parse_var(&lookup, "QR_BIND_ADDR", defaults.bind_addr),
            ec_level: parse_var(&lookup, "QR_EC_LEVEL", defaults.ec_level),
            module_scale: parse_var(&lookup, "QR_MODULE_SCALE", defaults.module_scale).max(1),
            border: parse_var(&lookup, "QR_BORDER", defaults.border),
            max_body_bytes: parse_var(&lookup, "QR_MAX_BODY_BYTES", defaults.max_body_bytes),
        }
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(raw) = lookup(name) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(variable = name, value = %raw, "ignoring unparsable setting");
            default
        }
    }
}
