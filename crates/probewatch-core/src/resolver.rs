//! DNS resolution seam.
//!
//! Validation must see every address a hostname can resolve to, across both
//! address families. The trait exists so tests and embedders can substitute
//! fixed answers for the system resolver.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::io;
use std::net::IpAddr;

/// Resolves a hostname to all of its addresses.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolve `host` for a connection to `port`, returning every answer
    /// the resolver produced (A and AAAA alike). An empty answer set is an
    /// error at the validation layer, not here.
    async fn resolve(&self, host: &str, port: u16) -> io::Result<Vec<IpAddr>>;
}

/// Production resolver backed by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

#[async_trait]
impl Resolver for SystemResolver {
    async fn resolve(&self, host: &str, port: u16) -> io::Result<Vec<IpAddr>> {
        let addrs = tokio::net::lookup_host((host, port)).await?;
        Ok(dedup_answers(addrs.map(|sa| sa.ip()).collect()))
    }
}

/// Drop duplicate answers while keeping the resolver's preference order,
/// which downstream consumers rely on when picking the first address.
fn dedup_answers(ips: Vec<IpAddr>) -> Vec<IpAddr> {
    let mut seen = HashSet::with_capacity(ips.len());
    ips.into_iter().filter(|ip| seen.insert(*ip)).collect()
}

/// Resolver with a fixed answer table, for tests and hermetic embedders.
#[derive(Debug, Default, Clone)]
pub struct StaticResolver {
    answers: HashMap<String, Vec<IpAddr>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the answers for a hostname, replacing any previous entry.
    pub fn insert(mut self, host: impl Into<String>, ips: Vec<IpAddr>) -> Self {
        self.answers.insert(host.into(), ips);
        self
    }
}

#[async_trait]
impl Resolver for StaticResolver {
    async fn resolve(&self, host: &str, _port: u16) -> io::Result<Vec<IpAddr>> {
        match self.answers.get(host) {
            Some(ips) => Ok(ips.clone()),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no address records for {host}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_resolver_returns_registered_answers() {
        let resolver = StaticResolver::new()
            .insert("example.com", vec!["93.184.216.34".parse().unwrap()]);

        let ips = resolver.resolve("example.com", 80).await.unwrap();
        assert_eq!(ips, vec!["93.184.216.34".parse::<IpAddr>().unwrap()]);
    }

    #[tokio::test]
    async fn static_resolver_fails_for_unknown_host() {
        let resolver = StaticResolver::new();
        let err = resolver.resolve("nxdomain.invalid", 80).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn dedup_answers_removes_non_adjacent_duplicates() {
        let a: IpAddr = "93.184.216.34".parse().unwrap();
        let b: IpAddr = "2606:2800:220:1:248:1893:25c8:1946".parse().unwrap();
        assert_eq!(dedup_answers(vec![a, b, a, b, a]), vec![a, b]);
    }

    #[tokio::test]
    async fn system_resolver_handles_localhost() {
        let ips = SystemResolver.resolve("localhost", 80).await.unwrap();
        assert!(ips.iter().all(|ip| ip.is_loopback()));
    }
}
