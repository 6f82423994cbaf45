/// Field normalizers for raw leads.
///
/// Every function here is total: absent, empty or garbage input never
/// raises and degrades to an absent/empty result. Warning generation
/// (e.g. "phone was present but unparseable") is the pipeline's job,
/// not ours.
use chrono::NaiveDate;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

/// Conservative RFC-light email shape: local part of letters, digits
/// and `._%+-`, one `@`, domain labels of letters/digits/`.-`, TLD of
/// at least two letters. No MX/network verification.
fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$")
            .expect("email regex is valid")
    })
}

/// Trim a raw value, mapping whitespace-only input to `None`.
fn clean_str(value: Option<&str>) -> Option<&str> {
    let s = value?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Title-case: a letter that follows a non-letter starts a new word
/// and is uppercased; every other letter is lowercased.
pub(crate) fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Split a free-text name into title-cased (first, last).
///
/// The first whitespace token becomes the first name; the remaining
/// tokens joined with single spaces become the last name (absent when
/// there is only one token).
pub fn split_name(name: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(s) = clean_str(name) else {
        return (None, None);
    };
    let mut tokens = s.split_whitespace();
    let Some(first) = tokens.next() else {
        return (None, None);
    };
    let rest = tokens.collect::<Vec<_>>().join(" ");
    let last = if rest.is_empty() {
        None
    } else {
        Some(title_case(&rest))
    };
    (Some(title_case(first)), last)
}

/// Trim and lower-case an email; absent stays absent.
pub fn canonical_email(email: Option<&str>) -> Option<String> {
    clean_str(email).map(|s| s.to_lowercase())
}

/// Boolean shape check against the RFC-light pattern.
pub fn validate_email(email: Option<&str>) -> bool {
    match email {
        Some(e) if !e.is_empty() => email_regex().is_match(e),
        _ => false,
    }
}

/// Reduce a raw phone to an E.164-like string, or `""` if unusable.
///
/// Strips everything but digits. A leading `1` on an 11-digit number
/// is dropped; exactly 10 digits is always treated as US and prefixed
/// `+1`; 11–15 digits are prefixed `+` as-is. Anything else yields the
/// empty string. This is a lossy heuristic, not E.164 validation;
/// callers treat `""` as "no usable phone", never as an error.
pub fn normalize_phone(phone: Option<&str>) -> String {
    let Some(raw) = phone else {
        return String::new();
    };
    let mut digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 11 && digits.starts_with('1') {
        digits.remove(0);
    }
    match digits.len() {
        10 => format!("+1{}", digits),
        11..=15 => format!("+{}", digits),
        _ => String::new(),
    }
}

/// Map a raw country to its canonical name via a fixed alias table.
///
/// Unmatched input passes through title-cased (best effort, not an
/// error).
pub fn normalize_country(country: Option<&str>) -> Option<String> {
    let s = clean_str(country)?;
    let canonical = match s.to_lowercase().as_str() {
        "us" | "usa" | "u.s." | "united states" => "United States",
        "uk" | "england" | "gb" | "u.k." | "great britain" => "United Kingdom",
        "de" | "ger" => "Germany",
        "uae" | "u.a.e" => "United Arab Emirates",
        "korea" | "south korea" | "republic of korea" => "South Korea",
        "viet nam" => "Vietnam",
        "ind" => "India",
        _ => return Some(title_case(s)),
    };
    Some(canonical.to_string())
}

// Month-first formats are attempted before day-first ones; the first
// successful parse wins and time-of-day is discarded.
const MONTH_FIRST_DATE: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%m/%d/%y"];
const MONTH_FIRST_DATETIME: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];
const DAY_FIRST_DATE: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%d/%m/%y"];

fn try_formats(s: &str, date_formats: &[&str], datetime_formats: &[&str]) -> Option<NaiveDate> {
    for fmt in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in datetime_formats {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Parse a free-text date, month-first then day-first, rendering the
/// result as `YYYY-MM-DD`. Unparseable input is absent, never an error.
pub fn parse_date(created_at: Option<&str>) -> Option<String> {
    let s = clean_str(created_at)?;
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive().format("%Y-%m-%d").to_string());
    }
    try_formats(s, MONTH_FIRST_DATE, MONTH_FIRST_DATETIME)
        .or_else(|| try_formats(s, DAY_FIRST_DATE, &[]))
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Trim and title-case a source label, then canonicalize known brand
/// spellings ("Linkedin" → "LinkedIn"). Unknown labels pass through
/// title-cased.
pub fn normalize_source(source: Option<&str>) -> Option<String> {
    let s = clean_str(source)?;
    let titled = title_case(s);
    let canonical = match titled.as_str() {
        "Linkedin" => "LinkedIn".to_string(),
        _ => titled,
    };
    Some(canonical)
}

/// Compute the intra-batch deduplication key for a lead.
///
/// Precedence: canonical email, then normalized phone, then a sha-256
/// hash of `name|company` when both are present. A lead with none of
/// these has no key and is never considered a duplicate.
pub fn dedupe_key(
    name: Option<&str>,
    email: Option<&str>,
    phone_norm: &str,
    company: Option<&str>,
) -> Option<String> {
    if let Some(e) = email.filter(|e| !e.is_empty()) {
        return Some(format!("email:{}", e));
    }
    if !phone_norm.is_empty() {
        return Some(format!("phone:{}", phone_norm));
    }
    match (name, company) {
        (Some(n), Some(c)) if !n.is_empty() && !c.is_empty() => {
            let digest = Sha256::digest(format!("{}|{}", n, c).as_bytes());
            Some(hex::encode(digest))
        }
        _ => None,
    }
}
