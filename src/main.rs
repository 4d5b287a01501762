use std::sync::{Arc, Mutex};

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use slotbook::config::AppConfig;
use slotbook::db;
use slotbook::handlers;
use slotbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/providers/:id",
            put(handlers::providers::upsert_provider),
        )
        .route("/api/providers/:id", get(handlers::providers::get_provider))
        .route(
            "/api/providers/:id/schedule",
            post(handlers::schedule::create_rule),
        )
        .route(
            "/api/providers/:id/schedule",
            get(handlers::schedule::list_rules),
        )
        .route(
            "/api/providers/:id/schedule/:rule_id",
            delete(handlers::schedule::delete_rule),
        )
        .route(
            "/api/providers/:id/available-dates",
            get(handlers::availability::available_dates),
        )
        .route(
            "/api/providers/:id/available-slots",
            get(handlers::availability::available_slots),
        )
        .route(
            "/api/providers/:id/bookings",
            get(handlers::bookings::provider_bookings),
        )
        .route("/api/bookings", post(handlers::bookings::create_booking))
        .route(
            "/api/bookings/:id/cancel",
            post(handlers::bookings::cancel_booking),
        )
        .route(
            "/api/customers/:id/bookings",
            get(handlers::bookings::customer_bookings),
        )
        .route(
            "/calendar/:provider_id/feed.ics",
            get(handlers::calendar::provider_feed),
        )
        .route(
            "/calendar/appointment/:id",
            get(handlers::calendar::download_ics),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
