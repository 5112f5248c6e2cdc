//! NAT64 DNS Domain Layer
pub mod address;
pub mod config;
pub mod dns_query;
pub mod dns_record;
pub mod errors;
pub mod nat64;

pub use address::{classify, is_ipv4_literal, is_ipv6_literal, AddressFamily, NameserverAddr};
pub use config::{CliOverrides, Config, ConfigError, EmbeddingMode, LogFormat};
pub use dns_query::{DnsQuery, QueryName};
pub use dns_record::{RecordType, SynthesizedRecord};
pub use errors::DomainError;
pub use nat64::{Nat64Prefix, Nat64Synthesizer};
