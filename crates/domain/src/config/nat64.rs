use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::ConfigError;
use crate::nat64::{Nat64Prefix, Nat64Synthesizer};

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingMode {
    /// Prefix text followed by the dotted quad.
    #[default]
    Textual,

    /// Bit-level embedding per RFC 6052.
    Rfc6052,
}

impl EmbeddingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Textual => "textual",
            Self::Rfc6052 => "rfc6052",
        }
    }
}

impl fmt::Display for EmbeddingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbeddingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "textual" => Ok(Self::Textual),
            "rfc6052" => Ok(Self::Rfc6052),
            _ => Err(format!("Unknown embedding mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Nat64Config {
    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default)]
    pub embedding: EmbeddingMode,

    /// TTL of synthesized AAAA records, in seconds.
    #[serde(default = "default_ttl")]
    pub ttl: u32,
}

impl Default for Nat64Config {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            embedding: EmbeddingMode::default(),
            ttl: default_ttl(),
        }
    }
}

impl Nat64Config {
    pub fn synthesizer(&self) -> Result<Nat64Synthesizer, ConfigError> {
        let prefix = Nat64Prefix::parse(&self.prefix, self.embedding)
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        Ok(Nat64Synthesizer::new(prefix, self.ttl))
    }
}

fn default_prefix() -> String {
    "64:ff9b::".to_string()
}

fn default_ttl() -> u32 {
    3600
}
