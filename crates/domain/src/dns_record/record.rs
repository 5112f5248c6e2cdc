use super::RecordType;
use crate::QueryName;
use std::net::Ipv6Addr;

/// An AAAA answer built by embedding an upstream IPv4 address in the
/// NAT64 prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedRecord {
    pub name: QueryName,

    pub address: Ipv6Addr,

    /// Literal the address was accepted from, e.g. `64:ff9b::93.184.216.34`.
    pub text: String,

    pub ttl: u32,
}

impl SynthesizedRecord {
    pub fn new(name: QueryName, address: Ipv6Addr, text: String, ttl: u32) -> Self {
        Self {
            name,
            address,
            text,
            ttl,
        }
    }

    pub fn record_type(&self) -> RecordType {
        RecordType::AAAA
    }
}
