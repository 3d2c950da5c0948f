//! Per-host probing: one HEAD-equivalent request plus one DNS lookup for a
//! single (hostname, scheme) pair.
//!
//! Transport failures are never fatal here. A probe that gets nothing back
//! still produces a [`ProbeResult`], just one with a zero status and empty
//! fields, and the run carries on.

mod capability;

pub use capability::{DnsLookup, HickoryLookup, HttpProbe, ReqwestProbe};

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use log::debug;

use crate::cdn;

/// URL scheme for a probe attempt. Every host is probed with both, HTTP
/// always first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Plain HTTP on port 80.
    Http,
    /// HTTPS on port 443.
    Https,
}

impl Scheme {
    /// Probe order for a single host.
    pub const BOTH: [Self; 2] = [Self::Http, Self::Https];

    /// The scheme as it appears in a URL.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one host×scheme attempt. Immutable once returned.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    /// Fully qualified `scheme://hostname`.
    pub url: String,
    /// HTTP status, 0 if unobtainable.
    pub status_code: u16,
    /// CDN label, empty only when the probe got no response at all.
    pub cdn: String,
    /// Raw `Server` header value, empty if absent.
    pub server: String,
    /// Wall-clock seconds spent on the HTTP attempt.
    pub response_time: f64,
    /// Whether the status falls in the working range.
    pub is_working: bool,
}

/// The working-host rule: any status in [200, 500). Auth walls and other
/// 4xx responses still prove the host is alive and fronted.
#[must_use]
pub const fn is_working_status(status_code: u16) -> bool {
    status_code >= 200 && status_code < 500
}

/// Probes single hosts using injected transport capabilities.
pub struct HostProber {
    http: Arc<dyn HttpProbe>,
    dns: Arc<dyn DnsLookup>,
}

impl HostProber {
    /// Builds a prober over the given transport capabilities.
    pub fn new(http: Arc<dyn HttpProbe>, dns: Arc<dyn DnsLookup>) -> Self {
        Self { http, dns }
    }

    /// Runs one probe attempt. The timer covers the HTTP call only; the DNS
    /// lookup happens after the clock stops and only when there was a
    /// response worth classifying.
    pub async fn probe(&self, hostname: &str, scheme: Scheme) -> ProbeResult {
        let url = format!("{scheme}://{hostname}");

        let started = Instant::now();
        let response = self.http.fetch_head(&url).await;
        let response_time = started.elapsed().as_secs_f64();

        let Some(response) = response.filter(|text| !text.is_empty()) else {
            debug!("no response text for {url}");
            return ProbeResult {
                url,
                status_code: 0,
                cdn: String::new(),
                server: String::new(),
                response_time,
                is_working: false,
            };
        };

        let status_code = parse_status_code(&response);
        let server = extract_server(&response);

        let dns_text = self.dns.lookup(hostname).await.unwrap_or_default();
        let cdn = cdn::classify(&canonical_lines(&dns_text), &response).to_owned();

        ProbeResult {
            url,
            status_code,
            cdn,
            server,
            response_time,
            is_working: is_working_status(status_code),
        }
    }
}

/// Pulls the numeric status code out of a raw status line. Anything
/// malformed collapses to 0.
fn parse_status_code(response: &str) -> u16 {
    let Some(pos) = response.find("HTTP/") else {
        return 0;
    };
    response[pos..]
        .split_whitespace()
        .nth(1)
        .and_then(|token| token.parse().ok())
        .unwrap_or(0)
}

/// Extracts the `Server` header value with a case-insensitive key match,
/// taking everything up to the line terminator.
fn extract_server(response: &str) -> String {
    response
        .lines()
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            if key.trim().eq_ignore_ascii_case("server") {
                Some(value.trim().to_owned())
            } else {
                None
            }
        })
        .unwrap_or_default()
}

/// Keeps only lines carrying canonical-name evidence, matching what an
/// `nslookup | grep -i canonical` pipeline would yield.
fn canonical_lines(dns_text: &str) -> String {
    dns_text
        .lines()
        .filter(|line| line.to_lowercase().contains("canonical name"))
        .collect::<Vec<_>>()
        .join("\n")
}
