#![allow(dead_code)]
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

/// How the mock nameserver answers every query it receives.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    Answer(Vec<Ipv4Addr>),
    Rcode(u8),
    /// Never replies.
    Silent,
    /// Sends a reply with a flipped id first, then the real one.
    WrongIdFirst(Vec<Ipv4Addr>),
}

pub struct MockDnsServer {
    addr: SocketAddr,
    received: Arc<AtomicUsize>,
    last_query: Arc<Mutex<Vec<u8>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = socket.local_addr()?;
        let received = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&received);
        let last_query = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&last_query);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            counter.fetch_add(1, Ordering::SeqCst);
                            *captured.lock().unwrap() = buf[..len].to_vec();
                            for response in Self::build_mock_responses(&buf[..len], &behavior) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            received,
            last_query,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn received(&self) -> usize {
        self.received.load(Ordering::SeqCst)
    }

    /// Raw bytes of the most recent query, empty before the first one.
    pub fn last_query(&self) -> Vec<u8> {
        self.last_query.lock().unwrap().clone()
    }

    fn build_mock_responses(query: &[u8], behavior: &MockBehavior) -> Vec<Vec<u8>> {
        if query.len() < 12 {
            return vec![];
        }

        match behavior {
            MockBehavior::Answer(addresses) => vec![Self::build_response(query, 0, addresses)],
            MockBehavior::Rcode(rcode) => vec![Self::build_response(query, *rcode, &[])],
            MockBehavior::Silent => vec![],
            MockBehavior::WrongIdFirst(addresses) => {
                let mut decoy = Self::build_response(query, 0, &[Ipv4Addr::new(10, 0, 0, 1)]);
                decoy[0] ^= 0xFF;
                vec![decoy, Self::build_response(query, 0, addresses)]
            }
        }
    }

    fn build_response(query: &[u8], rcode: u8, addresses: &[Ipv4Addr]) -> Vec<u8> {
        let mut response = Vec::with_capacity(512);

        response.extend_from_slice(&query[0..2]);

        response.push(0x81);
        response.push(0x80 | (rcode & 0x0F));

        response.extend_from_slice(&query[4..6]);

        response.extend_from_slice(&(addresses.len() as u16).to_be_bytes());

        response.extend_from_slice(&[0x00, 0x00]);

        response.extend_from_slice(&[0x00, 0x00]);

        if query.len() > 12 {
            response.extend_from_slice(&query[12..]);
        }

        for address in addresses {
            response.extend_from_slice(&[
                0xc0, 0x0c,
                0x00, 0x01,
                0x00, 0x01,
                0x00, 0x00, 0x00, 0x3c,
                0x00, 0x04,
            ]);
            response.extend_from_slice(&address.octets());
        }

        response
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
