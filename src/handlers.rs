use crate::config::Config;
use crate::errors::AppError;
use crate::models::{BulkRequest, BulkResponse, NormalizedLead, RawLead, RulesConfig, SalesforceRow};
use crate::pipeline::{filter_dropped, process_batch, process_one};
use crate::rules::RuleStore;
use crate::salesforce::rows_to_csv;
use axum::{
    extract::{Multipart, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Change-aware store for the scoring rubric.
    pub rule_store: Arc<RuleStore>,
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "lead-enrich-api",
            "version": "0.1.0"
        })),
    )
}

/// POST /enrich
///
/// Normalize, enrich and score a single lead.
pub async fn enrich_lead(
    State(state): State<Arc<AppState>>,
    Json(raw): Json<RawLead>,
) -> Result<Json<NormalizedLead>, AppError> {
    let rules = state.rule_store.load()?;
    Ok(Json(process_one(&raw, &rules)))
}

/// POST /bulk
///
/// Process a batch of leads with intra-batch deduplication.
pub async fn bulk_leads(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BulkRequest>,
) -> Result<Json<BulkResponse>, AppError> {
    tracing::info!("POST /bulk - {} leads", req.leads.len());
    let rules = state.rule_store.load()?;
    let (results, summary) = process_batch(&req.leads, &rules);
    Ok(Json(BulkResponse { results, summary }))
}

/// GET /config/rules
pub async fn get_rules(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RulesConfig>, AppError> {
    let rules = state.rule_store.load()?;
    Ok(Json((*rules).clone()))
}

/// PUT /config/rules
///
/// Validated full replace of the rubric; rejects with 422 (prior
/// rubric untouched) when the candidate fails schema validation.
pub async fn put_rules(
    State(state): State<Arc<AppState>>,
    Json(candidate): Json<serde_json::Value>,
) -> Result<Json<RulesConfig>, AppError> {
    let saved = state.rule_store.save(&candidate)?;
    Ok(Json(saved))
}

#[derive(Debug, Deserialize)]
pub struct IngestParams {
    #[serde(default)]
    pub drop_invalid: Option<bool>,
    #[serde(default)]
    pub column_map: Option<String>,
}

/// POST /ingest_csv
///
/// Multipart CSV upload. Rows are coerced into raw leads (optionally
/// through a caller-supplied column map) and run through the batch
/// pipeline; `drop_invalid=true` filters dropped rows out of the
/// response and recomputes the summary over the survivors.
pub async fn ingest_csv(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IngestParams>,
    mut multipart: Multipart,
) -> Result<Json<BulkResponse>, AppError> {
    let mut csv_bytes: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename_ok = field
            .file_name()
            .map(|f| f.to_lowercase().ends_with(".csv"))
            .unwrap_or(false);
        if !filename_ok {
            return Err(AppError::BadRequest("Expected a CSV file".to_string()));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
        csv_bytes = Some(bytes.to_vec());
    }
    let csv_bytes =
        csv_bytes.ok_or_else(|| AppError::BadRequest("Missing 'file' field".to_string()))?;

    let column_map: Option<HashMap<String, String>> = match params.column_map.as_deref() {
        Some(raw) => Some(
            serde_json::from_str(raw)
                .map_err(|_| AppError::BadRequest("column_map must be JSON string".to_string()))?,
        ),
        None => None,
    };

    let leads = crate::ingest::parse_leads(csv_bytes.as_slice(), column_map.as_ref())
        .map_err(|_| AppError::BadRequest("Invalid CSV".to_string()))?;
    tracing::info!("POST /ingest_csv - {} rows", leads.len());

    let rules = state.rule_store.load()?;
    let (results, summary) = process_batch(&leads, &rules);

    let (results, summary) = if params.drop_invalid.unwrap_or(false) {
        filter_dropped(results, summary.count_in)
    } else {
        (results, summary)
    };

    Ok(Json(BulkResponse { results, summary }))
}

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub format: Option<String>,
}

/// POST /salesforce/map
///
/// Run the batch pipeline and flatten the results into Salesforce
/// field names; `format=csv` returns a CSV attachment instead of JSON.
pub async fn salesforce_map(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExportParams>,
    Json(req): Json<BulkRequest>,
) -> Result<Response, AppError> {
    let rules = state.rule_store.load()?;
    let (results, _) = process_batch(&req.leads, &rules);
    let rows: Vec<SalesforceRow> = results.iter().map(SalesforceRow::from_lead).collect();

    if params.format.as_deref() == Some("csv") {
        let body = rows_to_csv(&rows)?;
        let disposition = format!(
            "attachment; filename=salesforce_{}.csv",
            chrono::Utc::now().timestamp()
        );
        return Ok((
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            body,
        )
            .into_response());
    }

    Ok(Json(rows).into_response())
}
