use redis::aio::ConnectionManager;

use crate::repository::{CommentRepo, GuideRepo};

/// Entry point for store-backed deployments: one managed connection, one key
/// prefix, repositories handed out on demand.
#[derive(Clone)]
pub struct Platform {
    conn: ConnectionManager,
    prefix: String,
}

impl Platform {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
        }
    }

    /// Connects to the store at `url` and keys everything under `prefix`.
    pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::new(conn, prefix))
    }

    pub fn guides(&self) -> GuideRepo {
        GuideRepo::new(self.conn.clone(), self.prefix.clone())
    }

    pub fn comments(&self) -> CommentRepo {
        CommentRepo::new(self.conn.clone(), self.prefix.clone())
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn connection(&self) -> ConnectionManager {
        self.conn.clone()
    }
}
