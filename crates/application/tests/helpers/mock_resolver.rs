#![allow(dead_code)]

use async_trait::async_trait;
use nat64_dns_application::ports::UpstreamResolver;
use nat64_dns_domain::{DomainError, QueryName};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex, RwLock};

#[derive(Clone, Default)]
pub struct MockUpstreamResolver {
    responses: Arc<RwLock<HashMap<String, Vec<Ipv4Addr>>>>,
    error_responses: Arc<RwLock<HashMap<String, DomainError>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockUpstreamResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_response(&self, domain: &str, addresses: &[&str]) {
        let addresses = addresses.iter().map(|a| a.parse().unwrap()).collect();
        self.responses
            .write()
            .unwrap()
            .insert(domain.to_string(), addresses);
    }

    pub fn set_response_error(&self, domain: &str, error: DomainError) {
        self.error_responses
            .write()
            .unwrap()
            .insert(domain.to_string(), error);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl UpstreamResolver for MockUpstreamResolver {
    async fn lookup_ipv4(&self, name: &QueryName) -> Result<Vec<Ipv4Addr>, DomainError> {
        let name = name.as_str();
        self.calls.lock().unwrap().push(name.to_string());

        if let Some(err) = self.error_responses.read().unwrap().get(name).cloned() {
            return Err(err);
        }

        self.responses
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or(DomainError::NxDomain)
    }

    fn upstream(&self) -> String {
        "127.0.0.1:53".to_string()
    }
}
