//! Post-run aggregation: grouping working hosts by CDN and writing the
//! report file.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use chrono::Local;
use itertools::Itertools;

use crate::cdn;
use crate::probe::ProbeResult;

/// Renders the CDN-grouped report body. Groups follow the fixed report
/// order, empty groups are omitted entirely, and results inside a group
/// keep their arrival order from the shared collection.
#[must_use]
pub fn render_sections(results: &[ProbeResult]) -> String {
    let groups: HashMap<&str, Vec<&ProbeResult>> = results
        .iter()
        .filter(|result| result.is_working)
        .map(|result| (result.cdn.as_str(), result))
        .into_group_map();

    let mut out = String::new();
    for label in cdn::REPORT_ORDER {
        let Some(group) = groups.get(label) else {
            continue;
        };
        let _ = writeln!(out, "# CDN: {label}");
        for result in group {
            out.push_str(&format_line(result));
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// One report line: `url [status] [cdn - server] (0.42s)`. The server part
/// only appears when the header was present.
fn format_line(result: &ProbeResult) -> String {
    let mut line = format!("{} [{}] [{}", result.url, result.status_code, result.cdn);
    if !result.server.is_empty() {
        let _ = write!(line, " - {}", result.server);
    }
    let _ = write!(line, "] ({:.2}s)", result.response_time);
    line
}

/// Working-host count per CDN label, for the end-of-run distribution block.
#[must_use]
pub fn cdn_counts(results: &[ProbeResult]) -> HashMap<String, usize> {
    results
        .iter()
        .filter(|result| result.is_working)
        .counts_by(|result| result.cdn.clone())
}

/// Writes the full report: a header comment block with the generation
/// timestamp, then the grouped sections.
pub fn write_report(path: &Path, results: &[ProbeResult]) -> io::Result<()> {
    let mut contents = format!(
        "# Working hosts found on {}\n\
         # Format: URL [STATUS] [CDN] (SERVER) (TIME)\n\
         # CDN Detection: DNS/CNAME + HTTP Headers\n\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    contents.push_str(&render_sections(results));
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(url: &str, status: u16, cdn: &str, server: &str, time: f64) -> ProbeResult {
        ProbeResult {
            url: url.to_owned(),
            status_code: status,
            cdn: cdn.to_owned(),
            server: server.to_owned(),
            response_time: time,
            is_working: crate::probe::is_working_status(status),
        }
    }

    #[test]
    fn line_format_with_and_without_server() {
        let with_server = result("https://a.example.com", 200, "CloudFlare", "cloudflare", 0.417);
        assert_eq!(
            format_line(&with_server),
            "https://a.example.com [200] [CloudFlare - cloudflare] (0.42s)"
        );

        let bare = result("http://b.example.com", 301, "Direct", "", 1.2);
        assert_eq!(format_line(&bare), "http://b.example.com [301] [Direct] (1.20s)");
    }

    #[test]
    fn groups_follow_fixed_order_and_skip_empty_labels() {
        let results = vec![
            result("http://d.example.com", 200, "Direct", "", 0.1),
            result("http://a.example.com", 200, "Akamai", "", 0.1),
            result("http://c.example.com", 200, "CloudFlare", "", 0.1),
        ];

        let body = render_sections(&results);
        let sections: Vec<&str> = body
            .lines()
            .filter(|line| line.starts_with("# CDN:"))
            .collect();

        assert_eq!(sections, ["# CDN: CloudFlare", "# CDN: Akamai", "# CDN: Direct"]);
        assert!(!body.contains("# CDN: Fastly"));
    }

    #[test]
    fn arrival_order_is_kept_within_a_group() {
        let results = vec![
            result("http://z.example.com", 200, "Direct", "", 0.1),
            result("http://a.example.com", 200, "Direct", "", 0.1),
            result("http://m.example.com", 200, "Direct", "", 0.1),
        ];

        let body = render_sections(&results);
        let urls: Vec<&str> = body
            .lines()
            .filter(|line| line.starts_with("http"))
            .map(|line| line.split(' ').next().unwrap())
            .collect();

        assert_eq!(
            urls,
            ["http://z.example.com", "http://a.example.com", "http://m.example.com"]
        );
    }

    #[test]
    fn non_working_results_are_excluded() {
        let results = vec![
            result("http://up.example.com", 200, "Direct", "", 0.1),
            result("http://down.example.com", 0, "", "", 3.0),
            result("http://err.example.com", 503, "Direct", "", 0.2),
        ];

        let body = render_sections(&results);

        assert!(body.contains("http://up.example.com"));
        assert!(!body.contains("down.example.com"));
        assert!(!body.contains("err.example.com"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let results = vec![
            result("http://a.example.com", 200, "Fastly", "", 0.1),
            result("https://a.example.com", 403, "Fastly", "nginx", 0.2),
            result("http://b.example.com", 200, "Direct", "", 0.3),
        ];

        assert_eq!(render_sections(&results), render_sections(&results));
    }

    #[test]
    fn counts_cover_working_results_only() {
        let results = vec![
            result("http://a.example.com", 200, "Fastly", "", 0.1),
            result("https://a.example.com", 200, "Fastly", "", 0.1),
            result("http://b.example.com", 500, "Direct", "", 0.1),
            result("http://c.example.com", 404, "Direct", "", 0.1),
        ];

        let counts = cdn_counts(&results);

        assert_eq!(counts.get("Fastly"), Some(&2));
        assert_eq!(counts.get("Direct"), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn report_file_carries_header_block() {
        let dir = std::env::temp_dir().join("subprobe-report-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("working_hosts.txt");

        let results = vec![result("http://a.example.com", 200, "Direct", "", 0.1)];
        write_report(&path, &results).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# Working hosts found on "));
        assert!(contents.contains("# Format: URL [STATUS] [CDN] (SERVER) (TIME)"));
        assert!(contents.contains("# CDN: Direct"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
