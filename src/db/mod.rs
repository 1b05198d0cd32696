use std::sync::Arc;

use futures::TryStreamExt;
use mongodb::{
    Client, Database,
    bson::{Document, doc},
};
use thiserror::Error;
use tokio::sync::OnceCell;

pub mod pipelines;

pub const PLAYERS: &str = "players";
pub const MATCHES: &str = "matches";

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Failed to connect to MongoDB: {0}")]
    Connect(#[source] mongodb::error::Error),
    #[error("Aggregation failed: {0}")]
    Query(#[source] mongodb::error::Error),
}

/// Lazily connected handle to the league database.
///
/// Nothing touches the network until the first call to [`LeagueDb::database`].
/// A successful connection is cached for the rest of the process and shared
/// by every clone; a failed one is not, so the next caller tries again.
#[derive(Debug, Clone)]
pub struct LeagueDb {
    uri: Arc<str>,
    db_name: Arc<str>,
    handle: Arc<OnceCell<Database>>,
}

impl LeagueDb {
    pub fn new(uri: impl Into<String>, db_name: impl Into<String>) -> Self {
        Self {
            uri: Arc::from(uri.into()),
            db_name: Arc::from(db_name.into()),
            handle: Arc::new(OnceCell::new()),
        }
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    /// Whether a connection has already been established and cached.
    pub fn is_connected(&self) -> bool {
        self.handle.initialized()
    }

    /// Get the cached database handle, connecting on first use.
    pub async fn database(&self) -> Result<&Database, DbError> {
        self.handle.get_or_try_init(|| self.connect()).await
    }

    async fn connect(&self) -> Result<Database, DbError> {
        let client = Client::with_uri_str(&*self.uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            DbError::Connect(e)
        })?;

        // The driver connects lazily; ping so an unreachable server fails here.
        let db = client.database(&self.db_name);
        db.run_command(doc! { "ping": 1 }).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            DbError::Connect(e)
        })?;

        tracing::info!("Connected to MongoDB database {}", self.db_name);
        Ok(db)
    }

    /// Run `pipeline` against `collection` and collect every resulting document.
    pub async fn aggregate(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> Result<Vec<Document>, DbError> {
        let db = self.database().await?;

        let cursor = db
            .collection::<Document>(collection)
            .aggregate(pipeline)
            .await
            .map_err(DbError::Query)?;

        cursor.try_collect().await.map_err(DbError::Query)
    }
}
