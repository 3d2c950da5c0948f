//! Core functionality for actual scanning behaviour.
//!
//! The host list is split once, up front, into contiguous shards and each
//! shard gets its own worker task. Workers share exactly two things: the
//! result vector (one mutex, append only) and the progress counters
//! (atomics). There is no work-stealing and no rebalancing; a slow shard
//! simply finishes last, and the run waits for every worker before
//! aggregation starts.

use std::ops::Range;
use std::sync::{Arc, Mutex};

use futures::future::join_all;
use log::debug;

use crate::probe::{HostProber, ProbeResult, Scheme};
use crate::progress::ProgressTracker;

/// Orchestrates one run over a host list.
pub struct Scanner {
    hosts: Arc<[String]>,
    workers: usize,
    prober: Arc<HostProber>,
}

impl Scanner {
    /// Builds a scanner. A zero worker count is corrected to one.
    #[must_use]
    pub fn new(hosts: Vec<String>, workers: usize, prober: Arc<HostProber>) -> Self {
        Self {
            hosts: Arc::from(hosts),
            workers: workers.max(1),
            prober,
        }
    }

    /// Number of probe units this run will perform (hosts × schemes).
    #[must_use]
    pub fn total_units(&self) -> usize {
        self.hosts.len() * Scheme::BOTH.len()
    }

    /// Runs every probe and returns the full result collection once all
    /// workers have finished. The returned vector holds exactly
    /// [`Self::total_units`] entries; per host HTTP precedes HTTPS, across
    /// hosts the order is whatever task scheduling produced.
    pub async fn run(&self, progress: Arc<ProgressTracker>) -> Vec<ProbeResult> {
        debug!(
            "Starting scan. Workers {}, hosts {}, probes {}",
            self.workers,
            self.hosts.len(),
            self.total_units()
        );

        let results = Arc::new(Mutex::new(Vec::with_capacity(self.total_units())));

        let handles: Vec<_> = shard_bounds(self.hosts.len(), self.workers)
            .into_iter()
            .map(|shard| {
                let hosts = Arc::clone(&self.hosts);
                let prober = Arc::clone(&self.prober);
                let results = Arc::clone(&results);
                let progress = Arc::clone(&progress);

                tokio::spawn(async move {
                    for hostname in &hosts[shard] {
                        for scheme in Scheme::BOTH {
                            let result = prober.probe(hostname, scheme).await;
                            let is_working = result.is_working;

                            results.lock().unwrap().push(result);
                            // Counter update happens outside the result lock.
                            progress.update(is_working);
                        }
                    }
                })
            })
            .collect();

        for joined in join_all(handles).await {
            if let Err(e) = joined {
                debug!("worker task failed: {e}");
            }
        }

        let mut guard = results.lock().unwrap();
        std::mem::take(&mut *guard)
    }
}

/// Partitions `[0, host_count)` into `workers` contiguous shards. Integer
/// division decides the base shard size and the last shard absorbs the
/// remainder; with fewer hosts than workers the surplus shards come out
/// empty.
#[must_use]
pub fn shard_bounds(host_count: usize, workers: usize) -> Vec<Range<usize>> {
    let per_worker = host_count / workers;
    (0..workers)
        .map(|i| {
            let start = i * per_worker;
            let end = if i == workers - 1 {
                host_count
            } else {
                (i + 1) * per_worker
            };
            start..end
        })
        .collect()
}
