//! NAT64 address synthesis.
//!
//! Two embeddings are supported:
//!
//! - `Textual`: the prefix text is concatenated with the dotted-quad IPv4
//!   address and the result must parse as an IPv6 literal
//!   (`64:ff9b::` + `93.184.216.34` → `64:ff9b::93.184.216.34`). Candidates
//!   that do not parse are dropped without an error.
//! - `Rfc6052`: the 32 IPv4 bits are packed after a prefix of length 32, 40,
//!   48, 56, 64 or 96, skipping bits 64..71 (RFC 6052 §2.2).

use crate::config::EmbeddingMode;
use crate::{DomainError, QueryName, SynthesizedRecord};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

const RFC6052_PREFIX_LENGTHS: [u8; 6] = [32, 40, 48, 56, 64, 96];
const RFC6052_DEFAULT_LENGTH: u8 = 96;
const RFC6052_RESERVED_OCTET: usize = 8;

/// Documentation address (RFC 5737) used to check a prefix at startup.
const PROBE_ADDRESS: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nat64Prefix {
    Textual(Arc<str>),
    Rfc6052 { network: Ipv6Addr, length: u8 },
}

impl Nat64Prefix {
    /// Textual prefixes are accepted as-is; problems surface per record.
    pub fn parse(text: &str, mode: EmbeddingMode) -> Result<Self, DomainError> {
        match mode {
            EmbeddingMode::Textual => Ok(Nat64Prefix::Textual(text.into())),
            EmbeddingMode::Rfc6052 => Self::parse_rfc6052(text),
        }
    }

    fn parse_rfc6052(text: &str) -> Result<Self, DomainError> {
        let (addr_part, length) = match text.split_once('/') {
            Some((addr, len)) => {
                let length = len.parse::<u8>().map_err(|_| {
                    DomainError::InvalidNat64Prefix(format!("Invalid prefix length in '{}'", text))
                })?;
                (addr, length)
            }
            None => (text, RFC6052_DEFAULT_LENGTH),
        };

        if !RFC6052_PREFIX_LENGTHS.contains(&length) {
            return Err(DomainError::InvalidNat64Prefix(format!(
                "Prefix length /{} is not one of 32, 40, 48, 56, 64, 96",
                length
            )));
        }

        let network: Ipv6Addr = addr_part
            .parse()
            .map_err(|e| DomainError::InvalidNat64Prefix(format!("{}: {}", text, e)))?;

        let host_bits = u128::from(network) & (u128::MAX >> length);
        if host_bits != 0 {
            return Err(DomainError::InvalidNat64Prefix(format!(
                "{} has bits set beyond /{}",
                network, length
            )));
        }

        if network.octets()[RFC6052_RESERVED_OCTET] != 0 {
            return Err(DomainError::InvalidNat64Prefix(format!(
                "{} has bits 64..71 set, they must be zero",
                network
            )));
        }

        Ok(Nat64Prefix::Rfc6052 { network, length })
    }

    /// Returns the synthesized address and the literal it is presented as.
    pub fn embed(&self, ipv4: Ipv4Addr) -> Option<(Ipv6Addr, String)> {
        match self {
            Nat64Prefix::Textual(prefix) => {
                let text = format!("{}{}", prefix, ipv4);
                let address = text.parse::<Ipv6Addr>().ok()?;
                Some((address, text))
            }
            Nat64Prefix::Rfc6052 { network, length } => {
                let mut octets = network.octets();
                let mut index = usize::from(*length / 8);
                for byte in ipv4.octets() {
                    if index == RFC6052_RESERVED_OCTET {
                        index += 1;
                    }
                    octets[index] = byte;
                    index += 1;
                }
                let address = Ipv6Addr::from(octets);
                Some((address, address.to_string()))
            }
        }
    }

    pub fn mode(&self) -> EmbeddingMode {
        match self {
            Nat64Prefix::Textual(_) => EmbeddingMode::Textual,
            Nat64Prefix::Rfc6052 { .. } => EmbeddingMode::Rfc6052,
        }
    }
}

impl fmt::Display for Nat64Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nat64Prefix::Textual(prefix) => write!(f, "{}", prefix),
            Nat64Prefix::Rfc6052 { network, length } => write!(f, "{}/{}", network, length),
        }
    }
}

/// Turns upstream IPv4 answers into AAAA records under one prefix.
#[derive(Debug, Clone)]
pub struct Nat64Synthesizer {
    prefix: Nat64Prefix,
    ttl: u32,
}

impl Nat64Synthesizer {
    pub fn new(prefix: Nat64Prefix, ttl: u32) -> Self {
        Self { prefix, ttl }
    }

    pub fn prefix(&self) -> &Nat64Prefix {
        &self.prefix
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// `None` when the embedding does not yield a valid IPv6 address.
    pub fn synthesize(&self, name: &QueryName, ipv4: Ipv4Addr) -> Option<SynthesizedRecord> {
        let (address, text) = self.prefix.embed(ipv4)?;
        Some(SynthesizedRecord::new(name.clone(), address, text, self.ttl))
    }

    /// Whether the prefix can embed an address at all. A textual prefix that
    /// fails here would silently drop every answer.
    pub fn probe(&self) -> bool {
        self.prefix.embed(PROBE_ADDRESS).is_some()
    }
}
