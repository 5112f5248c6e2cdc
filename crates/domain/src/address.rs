//! Nameserver address classification.
//!
//! The upstream nameserver is configured as a bare IP literal. Classifying it
//! decides how it is written as a dial target: `host:53` for IPv4 and
//! `[host]:53` for IPv6. Anything that is neither is a configuration error.

use crate::DomainError;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressFamily::V4 => "ipv4",
            AddressFamily::V6 => "ipv6",
        }
    }
}

/// Returns `true` for a bare dotted-quad IPv4 literal such as `1.1.1.1`.
pub fn is_ipv4_literal(host: &str) -> bool {
    host.parse::<Ipv4Addr>().is_ok()
}

/// Returns `true` for a bare IPv6 literal.
///
/// Accepts compressed (`2606:4700::1111`), fully expanded, embedded IPv4
/// tail (`::ffff:192.0.2.1`, `64:ff9b::192.0.2.1`) and link-local with a
/// zone id (`fe80::1%eth0`). Brackets and ports are rejected.
pub fn is_ipv6_literal(host: &str) -> bool {
    let (addr, zone) = split_zone(host);
    let Ok(ip) = addr.parse::<Ipv6Addr>() else {
        return false;
    };
    match zone {
        None => true,
        Some(zone) => is_link_local(&ip) && is_valid_zone(zone),
    }
}

/// IPv4 wins when both would match; no literal matches both today.
pub fn classify(host: &str) -> Option<AddressFamily> {
    if is_ipv4_literal(host) {
        Some(AddressFamily::V4)
    } else if is_ipv6_literal(host) {
        Some(AddressFamily::V6)
    } else {
        None
    }
}

fn split_zone(host: &str) -> (&str, Option<&str>) {
    match host.split_once('%') {
        Some((addr, zone)) => (addr, Some(zone)),
        None => (host, None),
    }
}

fn is_link_local(ip: &Ipv6Addr) -> bool {
    (ip.segments()[0] & 0xffc0) == 0xfe80
}

fn is_valid_zone(zone: &str) -> bool {
    !zone.is_empty()
        && zone
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn resolve_scope_id(zone: &str) -> Result<u32, DomainError> {
    if let Ok(index) = zone.parse::<u32>() {
        return Ok(index);
    }
    interface_index(zone)
}

#[cfg(unix)]
fn interface_index(name: &str) -> Result<u32, DomainError> {
    let c_name = std::ffi::CString::new(name)
        .map_err(|_| DomainError::InvalidIpAddress(format!("Invalid zone id '{}'", name)))?;
    // SAFETY: c_name is a valid NUL-terminated string for the duration of the call.
    let index = unsafe { libc::if_nametoindex(c_name.as_ptr()) };
    if index == 0 {
        return Err(DomainError::InvalidIpAddress(format!(
            "Unknown interface in zone id '{}'",
            name
        )));
    }
    Ok(index)
}

#[cfg(not(unix))]
fn interface_index(name: &str) -> Result<u32, DomainError> {
    Err(DomainError::InvalidIpAddress(format!(
        "Named zone ids are not supported on this platform: '{}'",
        name
    )))
}

/// Normalized dial target for the upstream nameserver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameserverAddr {
    host: Arc<str>,
    family: AddressFamily,
    socket_addr: SocketAddr,
}

impl NameserverAddr {
    pub fn new(host: &str, port: u16) -> Result<Self, DomainError> {
        let family = classify(host).ok_or_else(|| {
            DomainError::InvalidIpAddress(format!("Nameserver parse error {}", host))
        })?;

        let socket_addr = match family {
            AddressFamily::V4 => {
                let ip: Ipv4Addr = host
                    .parse()
                    .map_err(|e| DomainError::InvalidIpAddress(format!("{}: {}", host, e)))?;
                SocketAddr::V4(SocketAddrV4::new(ip, port))
            }
            AddressFamily::V6 => {
                let (addr, zone) = split_zone(host);
                let ip: Ipv6Addr = addr
                    .parse()
                    .map_err(|e| DomainError::InvalidIpAddress(format!("{}: {}", host, e)))?;
                let scope_id = zone.map(resolve_scope_id).transpose()?.unwrap_or(0);
                SocketAddr::V6(SocketAddrV6::new(ip, port, 0, scope_id))
            }
        };

        Ok(Self {
            host: host.into(),
            family,
            socket_addr,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }

    pub fn port(&self) -> u16 {
        self.socket_addr.port()
    }

    pub fn socket_addr(&self) -> SocketAddr {
        self.socket_addr
    }
}

impl fmt::Display for NameserverAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.family {
            AddressFamily::V4 => write!(f, "{}:{}", self.host, self.port()),
            AddressFamily::V6 => write!(f, "[{}]:{}", self.host, self.port()),
        }
    }
}
