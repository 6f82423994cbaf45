/// Batch pipeline: normalization + enrichment + scoring over a
/// collection of raw leads, with intra-batch deduplication and
/// aggregate summary statistics.
///
/// Per-record failures do not exist here by construction: every stage
/// is total, so one malformed record can never sink its batch.
use crate::enrichment::mock_enrich;
use crate::models::{BatchSummary, LeadStatus, LeadWarning, NormalizedLead, RawLead, RulesConfig};
use crate::normalizer::{
    canonical_email, dedupe_key, normalize_country, normalize_phone, normalize_source, parse_date,
    split_name, validate_email,
};
use crate::scoring::compute_score;
use std::collections::HashSet;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Normalize a raw lead and append the mock-enrichment fields.
///
/// Total function: never fails. The score is left at 0; warnings for
/// an unparseable phone or date are recorded here because only the
/// caller of the normalizers knows whether raw input was present.
pub fn normalize_and_enrich(raw: &RawLead) -> NormalizedLead {
    let (first_name, last_name) = split_name(raw.name.as_deref());
    let email = canonical_email(raw.email.as_deref());
    let email_valid = validate_email(email.as_deref());
    let phone_norm = normalize_phone(raw.phone.as_deref());
    let country_norm = normalize_country(raw.country.as_deref());
    let created_at_iso = parse_date(raw.created_at.as_deref());
    let source = normalize_source(raw.source.as_deref());

    let mut warnings = Vec::new();
    if raw.phone.as_deref().is_some_and(|p| !p.is_empty()) && phone_norm.is_empty() {
        warnings.push(LeadWarning::UnparseablePhone);
    }
    if raw.created_at.as_deref().is_some_and(|d| !d.is_empty()) && created_at_iso.is_none() {
        warnings.push(LeadWarning::UnparseableDate);
    }

    let enrichment = mock_enrich(raw.company.as_deref(), email.as_deref());

    let status = if email_valid || !phone_norm.is_empty() {
        LeadStatus::Ok
    } else {
        LeadStatus::Dropped
    };

    NormalizedLead {
        name: raw.name.clone(),
        email,
        phone: raw.phone.clone(),
        title: raw.title.clone(),
        company: raw.company.clone(),
        country: raw.country.clone(),
        created_at: raw.created_at.clone(),
        source,
        first_name,
        last_name,
        email_valid,
        phone_norm,
        country_norm,
        created_at_iso,
        company_size: Some(enrichment.company_size),
        industry: Some(enrichment.industry),
        website: enrichment.website,
        status,
        warnings,
        score: 0,
    }
}

/// Normalize, enrich and score a single lead.
pub fn process_one(raw: &RawLead, rules: &RulesConfig) -> NormalizedLead {
    let mut lead = normalize_and_enrich(raw);
    lead.score = compute_score(&lead, rules);
    lead
}

/// Derive the batch summary from an output collection.
pub fn summarize(results: &[NormalizedLead], count_in: usize) -> BatchSummary {
    let count_out = results.len();
    let dropped = results
        .iter()
        .filter(|r| r.status == LeadStatus::Dropped)
        .count();
    let enriched = results.iter().filter(|r| r.is_enriched()).count();
    let (percent_enriched, avg_score) = if count_out == 0 {
        (0.0, 0.0)
    } else {
        (
            round2(enriched as f64 / count_out as f64 * 100.0),
            round2(results.iter().map(|r| r.score).sum::<i64>() as f64 / count_out as f64),
        )
    };

    BatchSummary {
        count_in,
        count_out,
        dropped,
        percent_enriched,
        avg_score,
    }
}

/// Process a batch of raw leads against one rubric snapshot.
///
/// Each record is normalized and enriched independently, then a single
/// left-to-right pass marks duplicates: the first record to produce a
/// dedup key is kept as-is, every later record with the same key is
/// forced to `dropped` and gains `duplicate_in_batch`, but is still
/// scored and still present in the output. Empty input yields empty
/// output and a zeroed summary.
pub fn process_batch(
    leads: &[RawLead],
    rules: &RulesConfig,
) -> (Vec<NormalizedLead>, BatchSummary) {
    let mut results = Vec::with_capacity(leads.len());
    let mut seen: HashSet<String> = HashSet::new();

    for raw in leads {
        let mut lead = normalize_and_enrich(raw);
        let key = dedupe_key(
            lead.name.as_deref(),
            lead.email.as_deref(),
            &lead.phone_norm,
            lead.company.as_deref(),
        );
        if let Some(key) = key {
            if !seen.insert(key) {
                lead.status = LeadStatus::Dropped;
                lead.warnings.push(LeadWarning::DuplicateInBatch);
            }
        }
        lead.score = compute_score(&lead, rules);
        results.push(lead);
    }

    let summary = summarize(&results, leads.len());
    tracing::debug!(
        count_in = summary.count_in,
        dropped = summary.dropped,
        avg_score = summary.avg_score,
        "Batch processed"
    );
    (results, summary)
}

/// Remove dropped records and recompute the summary over the filtered
/// set. `count_in` keeps the original batch size.
pub fn filter_dropped(
    results: Vec<NormalizedLead>,
    count_in: usize,
) -> (Vec<NormalizedLead>, BatchSummary) {
    let total = results.len();
    let kept: Vec<NormalizedLead> = results
        .into_iter()
        .filter(|r| r.status != LeadStatus::Dropped)
        .collect();
    let mut summary = summarize(&kept, count_in);
    summary.dropped = total - kept.len();
    (kept, summary)
}
