use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::ConfigError;
use crate::address::NameserverAddr;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Bare IPv4 or IPv6 literal; hostnames are rejected.
    #[serde(default = "default_nameserver")]
    pub nameserver: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            nameserver: default_nameserver(),
            port: default_port(),
            query_timeout_ms: default_query_timeout_ms(),
        }
    }
}

impl UpstreamConfig {
    pub fn dial_target(&self) -> Result<NameserverAddr, ConfigError> {
        NameserverAddr::new(&self.nameserver, self.port)
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

fn default_nameserver() -> String {
    "1.1.1.1".to_string()
}

fn default_port() -> u16 {
    53
}

fn default_query_timeout_ms() -> u64 {
    10_000
}
