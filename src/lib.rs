//! Read-only HTTP API serving canned analytical queries over the
//! `sports_league` MongoDB database.

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

pub use config::Config;
pub use db::LeagueDb;

/// Prefix every aggregation endpoint is mounted under.
pub const AGGREGATION_PREFIX: &str = "/api/aggregation";

/// Build the full application router around a (possibly not yet connected) database.
pub fn app(db: LeagueDb) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(|| async { "Sports League Stats API - v1.0" }))
        .route("/health", get(routes::health::health_check))
        .nest(AGGREGATION_PREFIX, routes::aggregation::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}
