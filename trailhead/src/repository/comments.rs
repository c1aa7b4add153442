use chrono::Utc;
use redis::aio::ConnectionManager;

use crate::{
    errors::PlatformError,
    id::new_entity_id,
    keys::KeyContext,
    model::{Comment, validate_comment_text},
    repository::CommentStore,
    runtime::{
        commands::{CommentCreate, CommentDelete},
        run_script, scripts,
    },
};

/// Redis-backed comment repository.
#[derive(Clone)]
pub struct CommentRepo {
    conn: ConnectionManager,
    prefix: String,
}

impl CommentRepo {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
        }
    }

    async fn fetch_many(&mut self, ids: Vec<String>) -> Result<Vec<Comment>, PlatformError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let doc_keys: Vec<String> = {
            let keys = KeyContext::new(&self.prefix);
            ids.iter().map(|id| keys.comment(id)).collect()
        };
        let docs: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&doc_keys)
            .query_async(&mut self.conn)
            .await
            .map_err(PlatformError::StoreRead)?;

        let mut comments = Vec::with_capacity(ids.len());
        for raw in docs.into_iter().flatten() {
            let comment: Comment = serde_json::from_str(&raw)
                .map_err(|err| PlatformError::other(format!("failed to deserialize comment: {err}")))?;
            comments.push(comment);
        }
        // Stored sets are unordered; re-derive chronology from timestamps.
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn list_index(&mut self, index: String) -> Result<Vec<Comment>, PlatformError> {
        let ids: Vec<String> = redis::cmd("SMEMBERS")
            .arg(&index)
            .query_async(&mut self.conn)
            .await
            .map_err(PlatformError::StoreRead)?;
        self.fetch_many(ids).await
    }
}

impl CommentStore for CommentRepo {
    async fn create(
        &mut self,
        guide_id: &str,
        author_id: &str,
        author_name: &str,
        text: &str,
    ) -> Result<String, PlatformError> {
        let text = validate_comment_text(text)?;

        let id = new_entity_id();
        let comment = Comment {
            id: id.clone(),
            guide_id: guide_id.to_string(),
            author_id: author_id.to_string(),
            author_name: author_name.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        };
        let payload_json = serde_json::to_string(&comment)
            .map_err(|err| PlatformError::other(format!("failed to serialize comment: {err}")))?;

        let command = {
            let keys = KeyContext::new(&self.prefix);
            CommentCreate {
                key: keys.comment(&id),
                entity_id: id.clone(),
                payload_json,
                guide_index_key: keys.comments_by_guide(guide_id),
                author_index_key: keys.comments_by_author(author_id),
            }
        };
        run_script(&mut self.conn, &scripts::COMMENT_CREATE, &command).await?;
        Ok(id)
    }

    async fn list_by_guide(&mut self, guide_id: &str) -> Result<Vec<Comment>, PlatformError> {
        let index = KeyContext::new(&self.prefix).comments_by_guide(guide_id);
        self.list_index(index).await
    }

    async fn list_by_author(&mut self, author_id: &str) -> Result<Vec<Comment>, PlatformError> {
        let index = KeyContext::new(&self.prefix).comments_by_author(author_id);
        self.list_index(index).await
    }

    async fn delete(&mut self, id: &str) -> Result<(), PlatformError> {
        let command = {
            let keys = KeyContext::new(&self.prefix);
            CommentDelete {
                key: keys.comment(id),
                entity_id: id.to_string(),
                guide_index_prefix: keys.comments_by_guide_prefix(),
                author_index_prefix: keys.comments_by_author_prefix(),
            }
        };
        run_script(&mut self.conn, &scripts::COMMENT_DELETE, &command).await?;
        Ok(())
    }
}
