/// Scoring engine: deterministic, stateless evaluation of a normalized
/// lead against the rubric.
use crate::models::{NormalizedLead, RulesConfig};

/// Evaluate a lead against the rubric, returning a score clamped to a
/// minimum of 0 (no maximum).
///
/// Keyword matching is cumulative: a title matching several keywords
/// accrues all of them. Band matching is exclusive: the first band in
/// rubric order containing the size wins.
pub fn compute_score(lead: &NormalizedLead, rules: &RulesConfig) -> i64 {
    let mut score: i64 = 0;

    let title = lead.title.as_deref().unwrap_or("").to_lowercase();
    for (keyword, points) in &rules.title_includes {
        if title.contains(&keyword.to_lowercase()) {
            score += points;
        }
    }

    if let Some(size) = lead.company_size {
        if let Some(band) = rules
            .company_size_points
            .iter()
            .find(|b| b.min <= size && size <= b.max)
        {
            score += band.points;
        }
    }

    if let Some(country) = lead.country_norm.as_deref() {
        if let Some(points) = rules.country_boost.get(country) {
            score += points;
        }
    }

    if let Some(source) = lead.source.as_deref() {
        if let Some(points) = rules.source_boost.get(source) {
            score += points;
        }
    }

    if lead.email_valid {
        score += 5;
    }
    if !lead.phone_norm.is_empty() {
        score += 3;
    }

    let company_missing = lead.company.as_deref().map_or(true, |c| c.is_empty());
    if company_missing {
        score += rules.penalties.get("missing_company").copied().unwrap_or(0);
    }

    score.max(0)
}
