//! CDN fingerprinting from layered signals.
//!
//! Classification is two-phase and DNS-first: canonical-name evidence from a
//! DNS lookup outranks anything found in HTTP response headers. Each phase
//! walks an ordered signature table and the first matching provider wins, so
//! the table order is load-bearing and must not be rearranged.

/// Fallback label for hosts that match no provider signature.
pub const DIRECT: &str = "Direct";

/// A provider and the lowercase substrings that identify it.
struct Signature {
    label: &'static str,
    markers: &'static [&'static str],
}

/// Canonical-name markers, checked against DNS lookup output.
const DNS_SIGNATURES: &[Signature] = &[
    Signature {
        label: "Akamai",
        markers: &["akamaiedge.net", "edgekey.net", "akamai.net"],
    },
    Signature {
        label: "CloudFlare",
        markers: &["cloudflare.net", "cloudflare.com"],
    },
    Signature {
        label: "AWS CloudFront",
        markers: &["cloudfront.net", "amazonaws.com"],
    },
    Signature {
        label: "Fastly",
        markers: &["fastly.com", "fastlylb.net"],
    },
    Signature {
        label: "F5/Volterra",
        markers: &["ves.io", "volterra.io"],
    },
    Signature {
        label: "Azure CDN",
        markers: &["azureedge.net"],
    },
    Signature {
        label: "Google Cloud CDN",
        markers: &["googleapis.com", "googleusercontent.com"],
    },
    Signature {
        label: "BunnyCDN",
        markers: &["bunnycdn.com", "b-cdn.net"],
    },
];

/// Header-oriented markers, checked against raw HTTP response text.
///
/// Some of these are loose on purpose (`azure`, `gws`); they inherit the
/// best-effort behaviour of the signature set and are only consulted when
/// DNS gave no answer.
const HEADER_SIGNATURES: &[Signature] = &[
    Signature {
        label: "CloudFlare",
        markers: &["cf-ray:", "cloudflare"],
    },
    Signature {
        label: "AWS CloudFront",
        markers: &["x-amz-cf-id:", "cloudfront"],
    },
    Signature {
        label: "Akamai",
        markers: &["akamai"],
    },
    Signature {
        label: "Fastly",
        markers: &["fastly"],
    },
    Signature {
        label: "F5/Volterra",
        markers: &["volterra", "volt-adc"],
    },
    Signature {
        label: "Azure CDN",
        markers: &["azure"],
    },
    Signature {
        label: "Google Cloud CDN",
        markers: &["gws", "x-google-cache:"],
    },
];

/// Order in which CDN groups appear in the saved report.
pub const REPORT_ORDER: [&str; 9] = [
    "CloudFlare",
    "AWS CloudFront",
    "Akamai",
    "Fastly",
    "F5/Volterra",
    "Azure CDN",
    "Google Cloud CDN",
    "BunnyCDN",
    DIRECT,
];

fn first_match(table: &'static [Signature], haystack: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|sig| sig.markers.iter().any(|marker| haystack.contains(marker)))
        .map(|sig| sig.label)
}

/// Classifies a host given its DNS canonical-name output and raw HTTP
/// response text. Returns [`DIRECT`] when neither signal matches.
pub fn classify(dns_text: &str, http_text: &str) -> &'static str {
    if let Some(label) = first_match(DNS_SIGNATURES, &dns_text.to_lowercase()) {
        return label;
    }
    first_match(HEADER_SIGNATURES, &http_text.to_lowercase()).unwrap_or(DIRECT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parameterized::parameterized;

    #[parameterized(dns = {
        "app.example.com canonical name = e1234.a.akamaiedge.net.",
        "cdn.example.com canonical name = example.cdn.cloudflare.net.",
        "img.example.com canonical name = d111111abcdef8.cloudfront.net.",
        "www.example.com canonical name = prod.global.fastly.com.",
        "api.example.com canonical name = ingress.ves.io.",
        "static.example.com canonical name = example.azureedge.net.",
        "files.example.com canonical name = storage.googleapis.com.",
        "assets.example.com canonical name = example.b-cdn.net.",
    }, expected = {
        "Akamai",
        "CloudFlare",
        "AWS CloudFront",
        "Fastly",
        "F5/Volterra",
        "Azure CDN",
        "Google Cloud CDN",
        "BunnyCDN",
    })]
    fn classify_from_dns(dns: &str, expected: &str) {
        assert_eq!(classify(dns, ""), expected);
    }

    #[parameterized(response = {
        "HTTP/2 200\r\ncf-ray: 8a1b2c3d4e5f6789-AMS\r\n",
        "HTTP/2 200\r\nx-amz-cf-id: abc123==\r\n",
        "HTTP/1.1 403 Forbidden\r\nserver: AkamaiGHost\r\n",
        "HTTP/2 200\r\nx-served-by: cache-ams21021-FASTLY\r\n",
        "HTTP/2 200\r\nserver: volt-adc\r\n",
        "HTTP/2 200\r\nx-azure-ref: 0a1b2c3\r\n",
        "HTTP/2 200\r\nserver: gws\r\n",
    }, expected = {
        "CloudFlare",
        "AWS CloudFront",
        "Akamai",
        "Fastly",
        "F5/Volterra",
        "Azure CDN",
        "Google Cloud CDN",
    })]
    fn classify_from_headers(response: &str, expected: &str) {
        assert_eq!(classify("", response), expected);
    }

    #[test]
    fn dns_evidence_outranks_headers() {
        // Header says CloudFlare, canonical name says Akamai. DNS wins.
        let dns = "www.example.com canonical name = e5678.b.akamaiedge.net.";
        let response = "HTTP/2 200\r\ncf-ray: 8a1b2c3d4e5f6789-AMS\r\nserver: cloudflare\r\n";
        assert_eq!(classify(dns, response), "Akamai");
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            classify("WWW.EXAMPLE.COM CANONICAL NAME = X.AKAMAIEDGE.NET.", ""),
            "Akamai"
        );
        assert_eq!(classify("", "HTTP/2 200\r\nCF-RAY: abc\r\n"), "CloudFlare");
    }

    #[test]
    fn first_header_match_wins() {
        // Both CloudFlare and CloudFront markers present; CloudFlare sits
        // earlier in the header table.
        let response = "HTTP/2 200\r\ncf-ray: abc\r\nx-amz-cf-id: def\r\n";
        assert_eq!(classify("", response), "CloudFlare");
    }

    #[test]
    fn no_signal_falls_back_to_direct() {
        assert_eq!(classify("", ""), DIRECT);
        assert_eq!(
            classify(
                "www.example.com canonical name = origin.example.com.",
                "HTTP/1.1 200 OK\r\nserver: nginx/1.24.0\r\n"
            ),
            DIRECT
        );
    }

    #[test]
    fn report_order_is_complete_and_unique() {
        for sig in DNS_SIGNATURES {
            assert!(REPORT_ORDER.contains(&sig.label));
        }
        for sig in HEADER_SIGNATURES {
            assert!(REPORT_ORDER.contains(&sig.label));
        }
        let mut seen = std::collections::HashSet::new();
        assert!(REPORT_ORDER.iter().all(|label| seen.insert(label)));
    }
}
