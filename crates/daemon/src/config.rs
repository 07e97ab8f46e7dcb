//! Daemon configuration from `DEPLOYQ_*` environment variables

use anyhow::{Context, Result};
use deployq_api_rpc::server::{RpcServerConfig, DEFAULT_RPC_HOST, DEFAULT_RPC_PORT};
use deployq_core::application::desk::constants::{DEFAULT_COMMAND_PREFIX, DEFAULT_IDLE_TIMEOUT};
use deployq_core::application::DeskConfig;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_RPC_HOST: &str = "DEPLOYQ_RPC_HOST";
pub const ENV_RPC_PORT: &str = "DEPLOYQ_RPC_PORT";
pub const ENV_IDLE_TIMEOUT_SECS: &str = "DEPLOYQ_IDLE_TIMEOUT_SECS";
pub const ENV_COMMAND_PREFIX: &str = "DEPLOYQ_COMMAND_PREFIX";
pub const ENV_LOG_FORMAT: &str = "DEPLOYQ_LOG_FORMAT";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub rpc: RpcServerConfig,
    pub desk: DeskConfig,
    pub log_format: LogFormat,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key -> value source (tests pass a map)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup(ENV_RPC_HOST).unwrap_or_else(|| DEFAULT_RPC_HOST.to_string());
        let port = parse_or(&lookup, ENV_RPC_PORT, DEFAULT_RPC_PORT)?;

        let idle_timeout = match parse::<u64>(&lookup, ENV_IDLE_TIMEOUT_SECS)? {
            Some(0) => anyhow::bail!("{ENV_IDLE_TIMEOUT_SECS} must be greater than zero"),
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_IDLE_TIMEOUT,
        };

        let command_prefix = lookup(ENV_COMMAND_PREFIX)
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string());

        let log_format = match lookup(ENV_LOG_FORMAT).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            rpc: RpcServerConfig { host, port },
            desk: DeskConfig {
                idle_timeout,
                command_prefix,
            },
            log_format,
        })
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("Invalid {key}: {raw:?}"))
        })
        .transpose()
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    Ok(parse(lookup, key)?.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<DaemonConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DaemonConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.rpc.host, DEFAULT_RPC_HOST);
        assert_eq!(config.rpc.port, DEFAULT_RPC_PORT);
        assert_eq!(config.desk.idle_timeout, Duration::from_secs(1800));
        assert_eq!(config.desk.command_prefix, "deploy");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            (ENV_RPC_PORT, "9999"),
            (ENV_IDLE_TIMEOUT_SECS, "60"),
            (ENV_COMMAND_PREFIX, "ship"),
            (ENV_LOG_FORMAT, "json"),
        ])
        .unwrap();

        assert_eq!(config.rpc.port, 9999);
        assert_eq!(config.desk.idle_timeout, Duration::from_secs(60));
        assert_eq!(config.desk.command_prefix, "ship");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let err = config_from(&[(ENV_RPC_PORT, "not-a-port")]).unwrap_err();
        assert!(err.to_string().contains(ENV_RPC_PORT));

        assert!(config_from(&[(ENV_IDLE_TIMEOUT_SECS, "0")]).is_err());
    }
}
