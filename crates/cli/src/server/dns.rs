use nat64_dns_infrastructure::dns::DnsServerHandler;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, error, info};

const MAX_DATAGRAM_SIZE: usize = 4096;

/// Binds the listening socket and serves until the task is dropped.
/// A bind failure is returned before any datagram is read.
pub async fn start_dns_server(bind_addr: String, handler: DnsServerHandler) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address '{}': {}", bind_addr, e))?;

    let socket = Arc::new(
        create_udp_socket(socket_addr)
            .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", socket_addr, e))?,
    );

    info!(bind_address = %socket_addr, "DNS server ready");

    run_udp_worker(socket, Arc::new(handler)).await;
    Ok(())
}

async fn run_udp_worker(socket: Arc<UdpSocket>, handler: Arc<DnsServerHandler>) {
    let mut recv_buf = [0u8; MAX_DATAGRAM_SIZE];

    loop {
        let (n, from) = match socket.recv_from(&mut recv_buf).await {
            Ok(received) => received,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                // ICMP errors from earlier sends surface here on some platforms.
                debug!(error = %e, "UDP recv error");
                continue;
            }
        };

        let handler = Arc::clone(&handler);
        let socket = Arc::clone(&socket);
        let query_buf: Arc<[u8]> = Arc::from(&recv_buf[..n]);

        tokio::spawn(async move {
            if let Some(response) = handler.handle_raw_udp(&query_buf).await {
                if let Err(e) = socket.send_to(&response, from).await {
                    error!(client = %from, error = %e, "Failed to send reply");
                }
            }
        });
    }
}

fn create_udp_socket(socket_addr: SocketAddr) -> io::Result<UdpSocket> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;

    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket)
}
