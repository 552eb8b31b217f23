//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use fogmove_circuits::{CircuitParams, HASH_ROUNDS, MAP_WIDTH, MAX_HASH_ROUNDS, MAX_POINT_NUM};

pub const BIND_ADDR_VAR: &str = "FOGMOVE_BIND_ADDR";
pub const KEYS_DIR_VAR: &str = "FOGMOVE_KEYS_DIR";
pub const MAP_WIDTH_VAR: &str = "FOGMOVE_MAP_WIDTH";
pub const MAX_POINTS_VAR: &str = "FOGMOVE_MAX_POINTS";
pub const HASH_ROUNDS_VAR: &str = "FOGMOVE_HASH_ROUNDS";

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_KEYS_DIR: &str = "keys";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub keys_dir: PathBuf,
    /// Map width used when a request does not name one
    pub map_width: u32,
    /// Shape of the reveal circuit the server proves for
    pub circuit: CircuitParams,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            keys_dir: PathBuf::from(DEFAULT_KEYS_DIR),
            map_width: MAP_WIDTH,
            circuit: CircuitParams::default(),
        }
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}

fn require_range(
    var: &'static str,
    value: usize,
    min: usize,
    max: usize,
) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: format!("must be between {} and {}", min, max),
        });
    }
    Ok(())
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from any variable source; unset variables take their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = parse_var(&lookup, BIND_ADDR_VAR, defaults.bind_addr)?;
        let keys_dir = lookup(KEYS_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or(defaults.keys_dir);

        let map_width: u32 = parse_var(&lookup, MAP_WIDTH_VAR, MAP_WIDTH)?;
        require_range(MAP_WIDTH_VAR, map_width as usize, 1, u32::MAX as usize)?;

        let max_points = parse_var(&lookup, MAX_POINTS_VAR, MAX_POINT_NUM)?;
        require_range(MAX_POINTS_VAR, max_points, 1, MAX_POINT_NUM)?;

        let hash_rounds = parse_var(&lookup, HASH_ROUNDS_VAR, HASH_ROUNDS)?;
        require_range(HASH_ROUNDS_VAR, hash_rounds, 1, MAX_HASH_ROUNDS)?;

        Ok(Self {
            bind_addr,
            keys_dir,
            map_width,
            circuit: CircuitParams::new(max_points, hash_rounds),
        })
    }
}
