//! Command-line entry point: wires the host list, transports, worker pool
//! and report together for one run.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::Colorize;
use log::debug;

use subprobe::cdn;
use subprobe::hosts::{get_resolver, read_hosts_file};
use subprobe::input::{Config, Opts};
use subprobe::probe::{HickoryLookup, HostProber, ReqwestProbe};
use subprobe::progress::ProgressTracker;
use subprobe::report;
use subprobe::scanner::Scanner;
use subprobe::{detail, output, warning};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut opts = Opts::read();
    let config = Config::read(opts.config_path.clone());
    opts.merge(&config);
    debug!("Main() `opts` arguments are {opts:?}");

    let hosts = read_hosts_file(&opts.host_file)
        .await
        .with_context(|| format!("cannot open host file {}", opts.host_file.display()))?;

    if hosts.is_empty() {
        warning!(
            "No hosts found in the input file.",
            opts.greppable,
            opts.accessible
        );
        return Ok(());
    }

    if !opts.no_banner {
        print_banner(&opts, hosts.len());
    }

    let http = ReqwestProbe::new(
        Duration::from_millis(opts.connect_timeout),
        Duration::from_millis(opts.timeout),
    )
    .context("failed to build the HTTP client")?;
    let dns = HickoryLookup::new(get_resolver(&opts.resolver).await);
    let prober = Arc::new(HostProber::new(Arc::new(http), Arc::new(dns)));

    let scanner = Scanner::new(hosts, opts.workers, prober);
    let progress = Arc::new(ProgressTracker::new(
        scanner.total_units(),
        opts.greppable,
        opts.accessible,
    ));

    let started = Instant::now();
    let results = scanner.run(Arc::clone(&progress)).await;
    let total_secs = started.elapsed().as_secs_f64();

    progress.final_summary(total_secs);

    let counts = report::cdn_counts(&results);
    if !counts.is_empty() {
        output!("CDN Distribution:", opts.greppable, opts.accessible);
        for label in cdn::REPORT_ORDER {
            if let Some(count) = counts.get(label) {
                detail!(
                    format!("{label}: {count} hosts"),
                    opts.greppable,
                    opts.accessible
                );
            }
        }
    }

    report::write_report(&opts.output, &results)
        .with_context(|| format!("cannot write report to {}", opts.output.display()))?;

    output!(
        format!(
            "Saved {} working hosts to {}",
            progress.working(),
            opts.output.display()
        ),
        opts.greppable,
        opts.accessible
    );

    Ok(())
}

fn print_banner(opts: &Opts, host_count: usize) {
    output!(
        format!("Subdomains to check: {}", host_count.to_string().bold()),
        opts.greppable,
        opts.accessible
    );
    detail!(
        format!(
            "Workers: {} | Connect timeout: {}ms | Timeout: {}ms",
            opts.workers, opts.connect_timeout, opts.timeout
        ),
        opts.greppable,
        opts.accessible
    );
    detail!(
        "CDN detection: DNS/CNAME + response headers",
        opts.greppable,
        opts.accessible
    );
}
