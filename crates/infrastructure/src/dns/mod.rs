pub mod forwarding;
pub mod resolver;
pub mod server;
pub mod transport;
pub mod wire_response;

pub use resolver::ForwardingResolver;
pub use server::DnsServerHandler;
