use lead_enrich_api::config::Config;
use lead_enrich_api::handlers::{self, AppState};
use lead_enrich_api::rules::RuleStore;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes logging, configuration and the rule store, then serves
/// the lead pipeline over HTTP with rate limiting, a request body
/// limit, request-id propagation, tracing and permissive CORS.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lead_enrich_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Seed and warm the rule store so a malformed artifact fails fast
    let rule_store = Arc::new(RuleStore::new(&config.rules_path));
    rule_store.ensure_seeded()?;
    let rules = rule_store.load()?;
    tracing::info!(
        "Scoring rules loaded ({} title keywords, {} size bands)",
        rules.title_includes.len(),
        rules.company_size_points.len()
    );

    let app_state = Arc::new(AppState {
        config: config.clone(),
        rule_store,
    });

    // Rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .expect("valid governor configuration"),
    );

    let protected_routes = lead_enrich_api::api_router(app_state).layer(
        ServiceBuilder::new()
            // 5MB max payload covers bulk JSON and CSV uploads
            .layer(RequestBodyLimitLayer::new(5 * 1024 * 1024))
            .layer(GovernorLayer {
                config: governor_conf,
            }),
    );

    // Health check bypasses the rate limiter so probes never see 429
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
