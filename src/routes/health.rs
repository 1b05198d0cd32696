use axum::{extract::State, http::StatusCode, response::Json};

use crate::db::LeagueDb;
use crate::models::HealthResponse;

/// GET /health - Liveness plus whether the database handle is cached.
///
/// Never triggers a connection attempt.
pub async fn health_check(State(db): State<LeagueDb>) -> (StatusCode, Json<HealthResponse>) {
    let database = if db.is_connected() {
        "connected"
    } else {
        "disconnected"
    };

    let response = HealthResponse {
        status: "ok".to_string(),
        database: database.to_string(),
    };

    (StatusCode::OK, Json(response))
}
