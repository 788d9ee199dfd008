//! Network infrastructure: TCP sweep used by `_scan-devices`.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::task::JoinSet;

use crate::domain::config::Subnet;

/// How long a single connection attempt may take.
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(800);

/// Concurrent connection attempts.
const PARALLELISM: usize = 64;

/// Whether `host:port` accepts a TCP connection within `timeout`.
pub async fn port_open(host: Ipv4Addr, port: u16, timeout: Duration) -> bool {
    let addr = SocketAddr::from((host, port));
    matches!(
        tokio::time::timeout(timeout, tokio::net::TcpStream::connect(addr)).await,
        Ok(Ok(_))
    )
}

/// Every host of `subnet` with `port` open, in address order.
pub async fn sweep(subnet: &Subnet, port: u16, timeout: Duration) -> Vec<Ipv4Addr> {
    let mut found = Vec::new();
    for batch in subnet.hosts().chunks(PARALLELISM) {
        let mut probes = JoinSet::new();
        for &host in batch {
            probes.spawn(async move { port_open(host, port, timeout).await.then_some(host) });
        }
        while let Some(result) = probes.join_next().await {
            if let Ok(Some(host)) = result {
                found.push(host);
            }
        }
    }
    found.sort_unstable();
    tracing::debug!(count = found.len(), port, "sweep finished");
    found
}
