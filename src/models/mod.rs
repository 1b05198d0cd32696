use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Document in the `players` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub team: String,
    pub position: String,
    pub age: i32,
}

impl Player {
    pub fn new(name: &str, team: &str, position: &str, age: i32) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            team: team.to_string(),
            position: position.to_string(),
            age,
        }
    }
}

/// Document in the `matches` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub home_team: String,
    pub away_team: String,
    pub home_score: i32,
    pub away_score: i32,
}

impl Match {
    pub fn new(home_team: &str, away_team: &str, home_score: i32, away_score: i32) -> Self {
        Self {
            id: None,
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            home_score,
            away_score,
        }
    }
}

/// Error envelope returned by every failing aggregation endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub error: String,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}
