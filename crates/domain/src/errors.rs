use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid NAT64 prefix: {0}")]
    InvalidNat64Prefix(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Domain not found (NXDOMAIN)")]
    NxDomain,

    #[error("Upstream answered with {0}")]
    UpstreamRcode(&'static str),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },
}
