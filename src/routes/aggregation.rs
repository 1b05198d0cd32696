use axum::{Router, extract::State, response::Json, routing::get};
use mongodb::bson::{Bson, Document};
use serde_json::Value;

use crate::db::{DbError, LeagueDb, MATCHES, PLAYERS, pipelines};
use crate::error::ApiError;

type AggregationResult = Result<Json<Vec<Value>>, ApiError>;

/// Routes mounted under `/api/aggregation`.
pub fn router() -> Router<LeagueDb> {
    Router::new()
        .route("/total-players", get(total_players))
        .route("/average-age", get(average_age))
        .route("/players-with-team", get(players_with_team))
        .route("/oldest-players", get(oldest_players))
        .route("/total-matches", get(total_matches))
        .route("/wins-per-team", get(wins_per_team))
        .route("/total-score-by-team", get(total_score_by_team))
        .route("/players-more-than-10-matches", get(players_more_than_10_matches))
        .route("/most-scored-player", get(most_scored_player))
        .route("/teams-more-than-10-matches", get(teams_more_than_10_matches))
}

async fn run(
    db: &LeagueDb,
    collection: &str,
    pipeline: Vec<Document>,
    message: &'static str,
) -> Result<Vec<Document>, ApiError> {
    db.aggregate(collection, pipeline)
        .await
        .map_err(|e: DbError| ApiError::new(message, e))
}

/// Documents as relaxed Extended JSON, except that ObjectIds become plain hex strings.
fn to_json(docs: Vec<Document>) -> Vec<Value> {
    docs.into_iter()
        .map(|d| hex_object_ids(Bson::Document(d)).into_relaxed_extjson())
        .collect()
}

fn hex_object_ids(value: Bson) -> Bson {
    match value {
        Bson::ObjectId(id) => Bson::String(id.to_hex()),
        Bson::Document(doc) => Bson::Document(
            doc.into_iter()
                .map(|(key, value)| (key, hex_object_ids(value)))
                .collect(),
        ),
        Bson::Array(items) => Bson::Array(items.into_iter().map(hex_object_ids).collect()),
        other => other,
    }
}

// `$count` emits no document at all for an empty collection.
fn with_zero_count(docs: Vec<Document>, field: &str) -> Vec<Document> {
    if docs.is_empty() {
        let mut zero = Document::new();
        zero.insert(field, 0);
        vec![zero]
    } else {
        docs
    }
}

// GET /api/aggregation/total-players - Count all players
pub async fn total_players(State(db): State<LeagueDb>) -> AggregationResult {
    let docs = run(&db, PLAYERS, pipelines::total_players(), "Error counting players").await?;
    Ok(Json(to_json(with_zero_count(docs, "totalPlayers"))))
}

// GET /api/aggregation/average-age - Mean player age per team
pub async fn average_age(State(db): State<LeagueDb>) -> AggregationResult {
    let docs = run(
        &db,
        PLAYERS,
        pipelines::average_age_by_team(),
        "Error calculating average age",
    )
    .await?;
    Ok(Json(to_json(docs)))
}

// GET /api/aggregation/players-with-team - Name, team and position of every player
pub async fn players_with_team(State(db): State<LeagueDb>) -> AggregationResult {
    let docs = run(
        &db,
        PLAYERS,
        pipelines::players_with_team(),
        "Error retrieving players",
    )
    .await?;
    Ok(Json(to_json(docs)))
}

// GET /api/aggregation/oldest-players - Five oldest players
pub async fn oldest_players(State(db): State<LeagueDb>) -> AggregationResult {
    let docs = run(
        &db,
        PLAYERS,
        pipelines::oldest_players(),
        "Error finding oldest players",
    )
    .await?;
    Ok(Json(to_json(docs)))
}

// GET /api/aggregation/total-matches - Home and away game counts per team
pub async fn total_matches(State(db): State<LeagueDb>) -> AggregationResult {
    let docs = run(&db, MATCHES, pipelines::total_matches(), "Error counting matches").await?;
    Ok(Json(to_json(docs)))
}

// GET /api/aggregation/wins-per-team - Home wins per team
pub async fn wins_per_team(State(db): State<LeagueDb>) -> AggregationResult {
    let docs = run(&db, MATCHES, pipelines::wins_per_team(), "Error counting wins").await?;
    Ok(Json(to_json(docs)))
}

// GET /api/aggregation/total-score-by-team - Summed scores grouped by home team
pub async fn total_score_by_team(State(db): State<LeagueDb>) -> AggregationResult {
    let docs = run(
        &db,
        MATCHES,
        pipelines::total_score_by_team(),
        "Error calculating total score",
    )
    .await?;
    Ok(Json(to_json(docs)))
}

// GET /api/aggregation/players-more-than-10-matches - Players whose team hosted 11+ matches
pub async fn players_more_than_10_matches(State(db): State<LeagueDb>) -> AggregationResult {
    let docs = run(
        &db,
        MATCHES,
        pipelines::players_more_than_10_matches(),
        "Error retrieving players",
    )
    .await?;
    Ok(Json(to_json(docs)))
}

// GET /api/aggregation/most-scored-player - Single top scorer by home score
pub async fn most_scored_player(State(db): State<LeagueDb>) -> AggregationResult {
    let docs = run(
        &db,
        MATCHES,
        pipelines::most_scored_player(),
        "Error finding top scorer",
    )
    .await?;
    Ok(Json(to_json(docs)))
}

// GET /api/aggregation/teams-more-than-10-matches - Team pairings with more than 10 matches
pub async fn teams_more_than_10_matches(State(db): State<LeagueDb>) -> AggregationResult {
    let docs = run(
        &db,
        MATCHES,
        pipelines::teams_more_than_10_matches(),
        "Error counting teams' matches",
    )
    .await?;
    Ok(Json(to_json(docs)))
}
