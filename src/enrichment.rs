/// Deterministic mock enrichment.
///
/// There is no third-party lookup here: the firmographic triple is a
/// pure function of (company, email), so the same pair always yields
/// the same result across process restarts. No I/O, no random seed.
use sha2::{Digest, Sha256};

/// Parallel fixed-order tables; the digest bucket indexes both.
const COMPANY_SIZES: [i64; 6] = [25, 120, 450, 2000, 5000, 60];
const INDUSTRIES: [&str; 6] = [
    "Software",
    "E-Commerce",
    "FinTech",
    "Media",
    "Manufacturing",
    "Healthcare",
];

/// Firmographic attributes attached to a lead by the mock enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub company_size: i64,
    pub industry: String,
    pub website: Option<String>,
}

/// Extract the lower-cased domain portion of an email, if any.
fn domain_from_email(email: Option<&str>) -> Option<String> {
    let email = email?;
    let (_, domain) = email.split_once('@')?;
    let domain = domain.trim().to_lowercase();
    if domain.is_empty() {
        None
    } else {
        Some(domain)
    }
}

/// Free consumer mail providers; their domains never count as a
/// company domain.
fn is_free_domain(domain: &str) -> bool {
    matches!(
        domain,
        "gmail.com"
            | "yahoo.com"
            | "outlook.com"
            | "hotmail.com"
            | "icloud.com"
            | "proton.me"
            | "protonmail.com"
    )
}

/// Reduce a sha-256 digest to its value modulo `m`, treating the
/// digest as one big-endian integer.
fn digest_mod(digest: &[u8], m: u64) -> u64 {
    digest.iter().fold(0u64, |acc, &b| (acc * 256 + b as u64) % m)
}

/// Map (company, email) to a synthetic (size, industry, website).
///
/// The bucket is sha-256 of the concatenated strings (absent → empty)
/// modulo 6; the website is `https://` plus the email domain when an
/// email is present.
pub fn mock_enrich(company: Option<&str>, email: Option<&str>) -> Enrichment {
    let seed = format!("{}{}", company.unwrap_or(""), email.unwrap_or(""));
    let digest = Sha256::digest(seed.as_bytes());
    let bucket = digest_mod(digest.as_slice(), 6) as usize;

    Enrichment {
        company_size: COMPANY_SIZES[bucket],
        industry: INDUSTRIES[bucket].to_string(),
        website: domain_from_email(email).map(|d| format!("https://{}", d)),
    }
}

/// The lead's company domain, unless it is a free mail provider.
pub fn company_domain(email: Option<&str>) -> Option<String> {
    domain_from_email(email).filter(|d| !is_free_domain(d))
}

/// A lead counts as B2B when its email carries a non-free domain.
pub fn is_b2b(email: Option<&str>) -> bool {
    company_domain(email).is_some()
}
