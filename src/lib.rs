//! This crate exposes the internal functionality of the subprobe bulk host
//! checker.
//!
//! subprobe takes a file of hostnames and probes every one of them over both
//! `http` and `https`, classifies the fronting CDN provider from layered
//! signals, and writes a grouped report of the endpoints that answered.
//! It is an operational reconnaissance tool for security and infrastructure
//! audits of large subdomain lists.
//!
//! ## Architecture Overview
//!
//! The run is driven by [`Scanner`](crate::scanner::Scanner):
//!
//! 1. **Input**: the host list is read and cleaned ([`hosts`]).
//! 2. **Sharding**: the list is partitioned once into contiguous shards,
//!    one worker task per shard ([`scanner`]).
//! 3. **Probing**: each worker probes its hosts, HTTP before HTTPS, through
//!    injected transport capabilities ([`probe`]).
//! 4. **Classification**: DNS canonical-name evidence first, HTTP header
//!    markers second, `"Direct"` as the fallback ([`cdn`]).
//! 5. **Aggregation**: once every worker has joined, working results are
//!    grouped by CDN and written out ([`report`]).
//!
//! ## Basic Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use subprobe::probe::{HickoryLookup, HostProber, ReqwestProbe};
//! use subprobe::progress::ProgressTracker;
//! use subprobe::scanner::Scanner;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let hosts = vec!["example.com".to_owned(), "cdn.example.net".to_owned()];
//!
//!     let http = ReqwestProbe::new(Duration::from_secs(2), Duration::from_secs(3))?;
//!     let dns = HickoryLookup::new(subprobe::hosts::get_resolver(&None).await);
//!     let prober = Arc::new(HostProber::new(Arc::new(http), Arc::new(dns)));
//!
//!     let scanner = Scanner::new(hosts, 50, prober);
//!     let progress = Arc::new(ProgressTracker::new(scanner.total_units(), false, false));
//!
//!     let results = scanner.run(progress).await;
//!     println!("{}", subprobe::report::render_sections(&results));
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Per-probe transport failures are absorbed: a host that refuses, times
//! out, or fails DNS still yields a result with a zero status, and the run
//! carries on. Only input errors (missing host file, bad arguments) abort
//! a run.
#![warn(missing_docs)]

pub mod tui;

pub mod input;

pub mod hosts;

pub mod cdn;

pub mod probe;

pub mod progress;

pub mod scanner;

pub mod report;
