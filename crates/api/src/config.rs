//! Runtime configuration, read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use haulnet_infra::InfraConfig;

pub const BIND_ADDR_ENV: &str = "HAULNET_BIND_ADDR";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const SSE_KEEPALIVE_ENV: &str = "HAULNET_SSE_KEEPALIVE_SECS";
pub const RETRY_LIMIT_ENV: &str = "HAULNET_ACCEPT_RETRY_LIMIT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEV_JWT_SECRET: &str = "dev-secret";
const DEFAULT_KEEPALIVE_SECS: u64 = 15;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: {message}")]
    Invalid { var: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub sse_keepalive: Duration,
    pub infra: InfraConfig,
}

impl ApiConfig {
    /// Defaults suitable for tests: ephemeral port, given secret.
    pub fn for_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            jwt_secret: jwt_secret.into(),
            sse_keepalive: Duration::from_secs(DEFAULT_KEEPALIVE_SECS),
            infra: InfraConfig::default(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup(BIND_ADDR_ENV)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: BIND_ADDR_ENV,
                message: e.to_string(),
            })?;

        let jwt_secret = match lookup(JWT_SECRET_ENV).filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                DEV_JWT_SECRET.to_string()
            }
        };

        let sse_keepalive = Duration::from_secs(parse_number(&lookup, SSE_KEEPALIVE_ENV, DEFAULT_KEEPALIVE_SECS)?);
        let accept_retry_limit =
            parse_number(&lookup, RETRY_LIMIT_ENV, InfraConfig::DEFAULT_RETRY_LIMIT as u64)? as usize;

        Ok(Self {
            bind_addr,
            jwt_secret,
            sse_keepalive,
            infra: InfraConfig { accept_retry_limit },
        })
    }
}

fn parse_number(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(0) => Err(ConfigError::Invalid {
                var,
                message: "must be greater than zero".to_string(),
            }),
            Ok(n) => Ok(n),
            Err(e) => Err(ConfigError::Invalid {
                var,
                message: e.to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(cfg.sse_keepalive, Duration::from_secs(15));
        assert_eq!(cfg.infra, InfraConfig::default());
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = ApiConfig::from_lookup(lookup(&[
            (BIND_ADDR_ENV, "127.0.0.1:9000"),
            (JWT_SECRET_ENV, "s3cret"),
            (SSE_KEEPALIVE_ENV, "5"),
            (RETRY_LIMIT_ENV, "3"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.jwt_secret, "s3cret");
        assert_eq!(cfg.sse_keepalive, Duration::from_secs(5));
        assert_eq!(cfg.infra.accept_retry_limit, 3);
    }

    #[test]
    fn bad_values_name_the_variable() {
        let err = ApiConfig::from_lookup(lookup(&[(SSE_KEEPALIVE_ENV, "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: SSE_KEEPALIVE_ENV, .. }));

        let err = ApiConfig::from_lookup(lookup(&[(BIND_ADDR_ENV, "nowhere")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: BIND_ADDR_ENV, .. }));
    }
}
