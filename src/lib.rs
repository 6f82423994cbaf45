//! Lead Normalization + Enrichment + Scoring API Library
//!
//! This library provides the core functionality for the lead cleaning
//! service: deterministic field normalizers, a mock enrichment step,
//! a configurable scoring rubric with a change-aware store, the batch
//! pipeline with intra-batch deduplication, and the HTTP handlers.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `enrichment`: Deterministic mock enrichment.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `ingest`: CSV row coercion.
//! - `models`: Core data models.
//! - `normalizer`: Pure field normalizers and dedup keys.
//! - `pipeline`: Batch orchestration and summary statistics.
//! - `rules`: Scoring-rules store with mtime-keyed caching.
//! - `salesforce`: Salesforce export mapping.
//! - `scoring`: Rubric evaluation.

pub mod config;
pub mod enrichment;
pub mod errors;
pub mod handlers;
pub mod ingest;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod rules;
pub mod salesforce;
pub mod scoring;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Build the API routes over shared state.
///
/// This is the surface `main` wraps with the body limit and rate
/// limiter. `/health` is deliberately not here: it gets merged onto
/// the outer router so probes are never rate-limited.
pub fn api_router(state: Arc<handlers::AppState>) -> Router {
    Router::new()
        .route("/enrich", post(handlers::enrich_lead))
        .route("/bulk", post(handlers::bulk_leads))
        .route("/ingest_csv", post(handlers::ingest_csv))
        .route(
            "/config/rules",
            get(handlers::get_rules).put(handlers::put_rules),
        )
        .route("/salesforce/map", post(handlers::salesforce_map))
        .with_state(state)
}

/// Build the full router with `/health` outside the API routes.
///
/// Kept in the library so integration tests can drive the exact same
/// routes in-process without binding a socket.
pub fn router(state: Arc<handlers::AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(api_router(state))
}
