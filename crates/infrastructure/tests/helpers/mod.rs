mod builders;
mod dns_server_mock;

pub use builders::{query_name, QueryBuilder, ResolverBuilder};
pub use dns_server_mock::{MockBehavior, MockDnsServer};
