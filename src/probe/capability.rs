//! Transport capabilities used by the prober.
//!
//! Both capabilities hand back *raw text* rather than structured data: the
//! prober owns the parsing rules, and tests can substitute canned transports
//! without touching the network.

use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::TokioAsyncResolver;
use log::debug;
use reqwest::redirect::Policy;
use reqwest::Client;

/// Fetches raw response header text for a HEAD request against a URL.
#[async_trait]
pub trait HttpProbe: Send + Sync {
    /// Returns the status line plus `name: value` header lines, or `None`
    /// when the request produced no response at all.
    async fn fetch_head(&self, url: &str) -> Option<String>;
}

/// Resolves a hostname to raw lookup text carrying canonical-name evidence.
#[async_trait]
pub trait DnsLookup: Send + Sync {
    /// Returns lookup output for the hostname, or `None` when the name does
    /// not resolve (or has no alias records).
    async fn lookup(&self, hostname: &str) -> Option<String>;
}

/// Production HTTP capability backed by a shared reqwest client.
pub struct ReqwestProbe {
    client: Client,
}

impl ReqwestProbe {
    /// Builds a client with the probing defaults: short connect and total
    /// timeouts, no redirect following (redirect statuses are themselves a
    /// signal), and no certificate validation since unreachable-vs-reachable
    /// is all we measure.
    pub fn new(connect_timeout: Duration, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .redirect(Policy::none())
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpProbe for ReqwestProbe {
    async fn fetch_head(&self, url: &str) -> Option<String> {
        let response = match self.client.head(url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("HEAD {url} failed: {e}");
                return None;
            }
        };

        let mut text = format!("{:?} {}\r\n", response.version(), response.status());
        for (name, value) in response.headers() {
            text.push_str(name.as_str());
            text.push_str(": ");
            text.push_str(value.to_str().unwrap_or(""));
            text.push_str("\r\n");
        }
        Some(text)
    }
}

/// Production DNS capability that renders CNAME chains as nslookup-style
/// `canonical name =` lines.
pub struct HickoryLookup {
    resolver: TokioAsyncResolver,
}

impl HickoryLookup {
    /// Wraps an already-configured resolver.
    pub fn new(resolver: TokioAsyncResolver) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl DnsLookup for HickoryLookup {
    async fn lookup(&self, hostname: &str) -> Option<String> {
        let lookup = match self.resolver.lookup(hostname, RecordType::CNAME).await {
            Ok(lookup) => lookup,
            Err(e) => {
                debug!("CNAME lookup for {hostname} failed: {e}");
                return None;
            }
        };

        let lines: Vec<String> = lookup
            .record_iter()
            .filter_map(|record| {
                let cname = record.data()?.as_cname()?;
                Some(format!("{} canonical name = {}", record.name(), cname.0))
            })
            .collect();

        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }
}
