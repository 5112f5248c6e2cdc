use nat64_dns_application::ports::UpstreamResolver;
use nat64_dns_domain::{DomainError, QueryName};
use std::net::{Ipv4Addr, UdpSocket};
use std::time::{Duration, Instant};

mod helpers;
use helpers::{query_name, MockBehavior, MockDnsServer, ResolverBuilder};

const TIMEOUT: Duration = Duration::from_secs(2);

#[tokio::test]
async fn test_lookup_returns_a_records_in_order() {
    let addresses = vec![Ipv4Addr::new(192, 0, 2, 1), Ipv4Addr::new(192, 0, 2, 2)];
    let server = MockDnsServer::start(MockBehavior::Answer(addresses.clone()))
        .await
        .unwrap();
    let resolver = ResolverBuilder::pointed_at(server.addr(), TIMEOUT);

    let result = resolver.lookup_ipv4(&query_name("example.com.")).await.unwrap();

    assert_eq!(result, addresses);
    assert_eq!(server.received(), 1);
}

#[tokio::test]
async fn test_lookup_sends_labels_verbatim() {
    let server = MockDnsServer::start(MockBehavior::Answer(vec![Ipv4Addr::new(93, 184, 216, 34)]))
        .await
        .unwrap();
    let resolver = ResolverBuilder::pointed_at(server.addr(), TIMEOUT);
    let labels: [&[u8]; 3] = [b"has space", &[0xC8, b'x'], b"example"];

    let result = resolver
        .lookup_ipv4(&QueryName::from_labels(labels.iter().copied()))
        .await
        .unwrap();

    assert_eq!(result, vec![Ipv4Addr::new(93, 184, 216, 34)]);
    let sent = server.last_query();
    assert!(sent[12..].starts_with(b"\x09has space\x02\xC8x\x07example\x00"));
    // QTYPE A, QCLASS IN
    assert_eq!(&sent[sent.len() - 4..], &[0x00, 0x01, 0x00, 0x01]);
}

#[tokio::test]
async fn test_noerror_without_answers_is_empty_success() {
    let server = MockDnsServer::start(MockBehavior::Answer(vec![])).await.unwrap();
    let resolver = ResolverBuilder::pointed_at(server.addr(), TIMEOUT);

    let result = resolver.lookup_ipv4(&query_name("v6only.example.")).await;

    assert_eq!(result, Ok(vec![]));
}

#[tokio::test]
async fn test_nxdomain_is_an_error() {
    let server = MockDnsServer::start(MockBehavior::Rcode(3)).await.unwrap();
    let resolver = ResolverBuilder::pointed_at(server.addr(), TIMEOUT);

    let result = resolver.lookup_ipv4(&query_name("doesnotexist.example.")).await;

    assert_eq!(result, Err(DomainError::NxDomain));
}

#[tokio::test]
async fn test_servfail_is_an_error() {
    let server = MockDnsServer::start(MockBehavior::Rcode(2)).await.unwrap();
    let resolver = ResolverBuilder::pointed_at(server.addr(), TIMEOUT);

    let result = resolver.lookup_ipv4(&query_name("broken.example.")).await;

    assert_eq!(result, Err(DomainError::UpstreamRcode("SERVFAIL")));
}

#[tokio::test]
async fn test_silent_upstream_times_out_within_bound() {
    let server = MockDnsServer::start(MockBehavior::Silent).await.unwrap();
    let resolver = ResolverBuilder::pointed_at(server.addr(), Duration::from_millis(200));

    let start = Instant::now();
    let result = resolver.lookup_ipv4(&query_name("slow.example.")).await;

    assert_eq!(result, Err(DomainError::QueryTimeout));
    assert!(
        start.elapsed() < Duration::from_secs(2),
        "exchange must stop at the configured bound, took {:?}",
        start.elapsed()
    );
    assert_eq!(server.received(), 1, "no retry after a timeout");
}

#[tokio::test]
async fn test_reply_with_foreign_id_is_ignored() {
    let expected = vec![Ipv4Addr::new(198, 51, 100, 7)];
    let server = MockDnsServer::start(MockBehavior::WrongIdFirst(expected.clone()))
        .await
        .unwrap();
    let resolver = ResolverBuilder::pointed_at(server.addr(), TIMEOUT);

    let result = resolver.lookup_ipv4(&query_name("example.com.")).await.unwrap();

    assert_eq!(result, expected);
}

#[tokio::test]
async fn test_closed_port_fails_without_answers() {
    let addr = {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket.local_addr().unwrap()
    };
    let resolver = ResolverBuilder::pointed_at(addr, Duration::from_millis(300));

    let result = resolver.lookup_ipv4(&query_name("example.com.")).await;

    assert!(
        matches!(
            result,
            Err(DomainError::TransportConnectionRefused { .. }) | Err(DomainError::QueryTimeout)
        ),
        "unexpected result: {:?}",
        result
    );
}

#[tokio::test]
async fn test_upstream_is_the_dial_target() {
    let server = MockDnsServer::start(MockBehavior::Silent).await.unwrap();
    let resolver = ResolverBuilder::pointed_at(server.addr(), TIMEOUT);

    assert_eq!(resolver.upstream(), format!("127.0.0.1:{}", server.addr().port()));
    assert_eq!(resolver.timeout(), TIMEOUT);
}
