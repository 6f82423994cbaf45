use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============ Lead Models ============

/// A raw lead as submitted by a caller or parsed out of a CSV row.
///
/// Every field is free-form text and optional; nothing is validated at
/// this stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLead {
    /// Full name as provided.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address as provided.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone number as provided.
    #[serde(default)]
    pub phone: Option<String>,
    /// Job title as provided.
    #[serde(default)]
    pub title: Option<String>,
    /// Company name as provided.
    #[serde(default)]
    pub company: Option<String>,
    /// Country as provided.
    #[serde(default)]
    pub country: Option<String>,
    /// Creation date as provided (any textual format).
    #[serde(default)]
    pub created_at: Option<String>,
    /// Acquisition source as provided.
    #[serde(default)]
    pub source: Option<String>,
}

/// Processing status of a lead after the pipeline ran over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    /// Lead has a usable contact channel.
    Ok,
    /// No usable email or phone, or duplicate within its batch.
    Dropped,
}

/// Non-fatal conditions recorded while normalizing a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadWarning {
    /// Raw phone was present but did not reduce to an accepted digit count.
    UnparseablePhone,
    /// Raw created_at was present but no date format matched.
    UnparseableDate,
    /// A lead earlier in the same batch produced the same dedup key.
    DuplicateInBatch,
}

/// A lead after normalization, enrichment and scoring.
///
/// Raw fields are preserved verbatim (except `source`, which carries
/// its normalized form); derived fields are appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedLead {
    pub name: Option<String>,
    /// Canonical (trimmed, lower-cased) email.
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub country: Option<String>,
    pub created_at: Option<String>,
    /// Normalized source label.
    pub source: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_valid: bool,
    /// E.164-like phone, or empty string when unparseable.
    pub phone_norm: String,
    pub country_norm: Option<String>,
    /// `YYYY-MM-DD`, or absent when no format matched.
    pub created_at_iso: Option<String>,
    pub company_size: Option<i64>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub status: LeadStatus,
    pub warnings: Vec<LeadWarning>,
    pub score: i64,
}

impl NormalizedLead {
    /// Whether the mock enrichment produced firmographic data.
    pub fn is_enriched(&self) -> bool {
        self.company_size.is_some() && self.industry.is_some()
    }
}

// ============ Batch Models ============

/// Request body for the bulk endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkRequest {
    pub leads: Vec<RawLead>,
}

/// Aggregate statistics for one processed batch.
///
/// Recomputed fresh per batch, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub count_in: usize,
    pub count_out: usize,
    pub dropped: usize,
    /// 100 × enriched / count_out, rounded to 2 decimals.
    pub percent_enriched: f64,
    /// Mean score over count_out, rounded to 2 decimals.
    pub avg_score: f64,
}

/// Response body for the bulk endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct BulkResponse {
    pub results: Vec<NormalizedLead>,
    pub summary: BatchSummary,
}

// ============ Scoring Rubric ============

/// A closed integer interval mapped to a fixed point award.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeBand {
    pub min: i64,
    pub max: i64,
    pub points: i64,
}

/// The configurable point table driving lead scoring.
///
/// Persisted as a single JSON artifact managed by
/// [`crate::rules::RuleStore`]; mutated only via validated replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Case-insensitive substring keywords matched against the title;
    /// every match accrues its points (cumulative).
    pub title_includes: HashMap<String, i64>,
    /// Ordered company-size bands; the first band containing the size
    /// wins and no further bands are checked.
    pub company_size_points: Vec<SizeBand>,
    /// Exact-match boost per canonical country name.
    pub country_boost: HashMap<String, i64>,
    /// Exact-match boost per normalized source label.
    pub source_boost: HashMap<String, i64>,
    /// Named penalties (typically negative), e.g. `missing_company`.
    pub penalties: HashMap<String, i64>,
}

// ============ Salesforce Export ============

/// A scored lead flattened into Salesforce field names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesforceRow {
    #[serde(rename = "FirstName")]
    pub first_name: Option<String>,
    #[serde(rename = "LastName")]
    pub last_name: Option<String>,
    #[serde(rename = "Email")]
    pub email: Option<String>,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Company")]
    pub company: Option<String>,
    #[serde(rename = "Country")]
    pub country: Option<String>,
    #[serde(rename = "LeadSource")]
    pub lead_source: Option<String>,
    #[serde(rename = "CreatedDate__c")]
    pub created_date: Option<String>,
    #[serde(rename = "Website__c")]
    pub website: Option<String>,
    #[serde(rename = "Industry__c")]
    pub industry: Option<String>,
    #[serde(rename = "CompanySize__c")]
    pub company_size: Option<i64>,
    #[serde(rename = "Score__c")]
    pub score: i64,
}
