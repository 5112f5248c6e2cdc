//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! One ephemeral socket per exchange, connected to the nameserver so that
//! datagrams from any other source are filtered by the kernel and ICMP
//! port-unreachable surfaces as a refused connection.

use nat64_dns_domain::DomainError;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::debug;

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// DNS over UDP transport pinned to a single nameserver
#[derive(Debug, Clone)]
pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    /// Send one query and wait for the reply carrying the same id.
    ///
    /// `timeout` bounds the whole exchange, binding included. Replies with
    /// another id are discarded and the wait continues.
    pub async fn send(&self, message_bytes: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError> {
        tokio::time::timeout(timeout, self.exchange(message_bytes))
            .await
            .map_err(|_| DomainError::QueryTimeout)?
    }

    async fn exchange(&self, message_bytes: &[u8]) -> Result<Vec<u8>, DomainError> {
        let bind_addr = match self.server_addr {
            SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| self.io_error("bind UDP socket", e))?;
        socket
            .connect(self.server_addr)
            .await
            .map_err(|e| self.io_error("connect UDP socket", e))?;

        let bytes_sent = socket
            .send(message_bytes)
            .await
            .map_err(|e| self.io_error("send UDP query", e))?;

        debug!(server = %self.server_addr, bytes_sent = bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        loop {
            let bytes_received = socket
                .recv(&mut recv_buf)
                .await
                .map_err(|e| self.io_error("receive UDP response", e))?;

            match validate_response_id(message_bytes, &recv_buf[..bytes_received], self.server_addr) {
                Ok(()) => {
                    debug!(
                        server = %self.server_addr,
                        bytes_received = bytes_received,
                        "UDP response received"
                    );
                    recv_buf.truncate(bytes_received);
                    return Ok(recv_buf);
                }
                Err(e) => {
                    debug!(server = %self.server_addr, error = %e, "Discarding UDP datagram");
                }
            }
        }
    }

    fn io_error(&self, action: &str, e: io::Error) -> DomainError {
        if e.kind() == io::ErrorKind::ConnectionRefused {
            return DomainError::TransportConnectionRefused {
                server: self.server_addr.to_string(),
            };
        }
        DomainError::IoError(format!("Failed to {} for {}: {}", action, self.server_addr, e))
    }
}

fn validate_response_id(query: &[u8], response: &[u8], server: SocketAddr) -> Result<(), DomainError> {
    if query.len() < 2 || response.len() < 2 {
        return Err(DomainError::InvalidDnsResponse(format!(
            "Message from {} too short to carry an id",
            server
        )));
    }

    let query_id = u16::from_be_bytes([query[0], query[1]]);
    let response_id = u16::from_be_bytes([response[0], response[1]]);
    if query_id != response_id {
        return Err(DomainError::InvalidDnsResponse(format!(
            "ID mismatch from {}: expected {:#06x}, got {:#06x}",
            server, query_id, response_id
        )));
    }

    Ok(())
}

#[cfg(test)]
#[path = "udp_test.rs"]
mod tests;
