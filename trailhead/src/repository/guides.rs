use chrono::Utc;
use redis::aio::ConnectionManager;

use crate::{
    errors::PlatformError,
    id::new_entity_id,
    keys::KeyContext,
    model::{Guide, GuideDraft},
    repository::GuideStore,
    runtime::{
        commands::{GuideCreate, GuideDelete, GuidePatch, LikeToggle},
        run_script, scripts,
    },
};

/// Redis-backed guide repository. Every multi-key mutation goes through one
/// Lua script; reads assemble the document and its liker set.
#[derive(Clone)]
pub struct GuideRepo {
    conn: ConnectionManager,
    prefix: String,
}

impl GuideRepo {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
        }
    }

    /// Fetches documents and liker sets for the given ids, dropping ids whose
    /// document vanished between the index read and this fetch.
    async fn fetch_many(&mut self, ids: Vec<String>) -> Result<Vec<Guide>, PlatformError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let (doc_keys, set_keys): (Vec<String>, Vec<String>) = {
            let keys = KeyContext::new(&self.prefix);
            ids.iter().map(|id| (keys.guide(id), keys.guide_liked_by(id))).unzip()
        };

        let docs: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&doc_keys)
            .query_async(&mut self.conn)
            .await
            .map_err(PlatformError::StoreRead)?;

        let mut pipe = redis::pipe();
        for key in &set_keys {
            pipe.smembers(key);
        }
        let sets: Vec<Vec<String>> = pipe
            .query_async(&mut self.conn)
            .await
            .map_err(PlatformError::StoreRead)?;

        let mut guides = Vec::with_capacity(ids.len());
        for (raw, mut likers) in docs.into_iter().zip(sets) {
            let Some(raw) = raw else { continue };
            let mut guide: Guide = serde_json::from_str(&raw)
                .map_err(|err| PlatformError::other(format!("failed to deserialize guide: {err}")))?;
            likers.sort_unstable();
            guide.liked_by = likers;
            guides.push(guide);
        }
        Ok(guides)
    }
}

impl GuideStore for GuideRepo {
    async fn create(
        &mut self,
        draft: &GuideDraft,
        author_id: &str,
        author_name: &str,
    ) -> Result<String, PlatformError> {
        let draft = draft.normalized();
        draft.validate()?;

        let id = new_entity_id();
        let now = Utc::now();
        let guide = Guide {
            id: id.clone(),
            author_id: author_id.to_string(),
            author_name: author_name.to_string(),
            title: draft.title,
            region: draft.region,
            guide_type: draft.guide_type,
            season: draft.season,
            duration: draft.duration,
            difficulty: draft.difficulty,
            short_description: draft.short_description,
            content: draft.content,
            cover_image_url: draft.cover_image_url,
            likes_count: 0,
            liked_by: Vec::new(),
            created_at: now,
            updated_at: None,
        };
        let payload_json = serde_json::to_string(&guide)
            .map_err(|err| PlatformError::other(format!("failed to serialize guide: {err}")))?;

        let command = {
            let keys = KeyContext::new(&self.prefix);
            GuideCreate {
                key: keys.guide(&id),
                entity_id: id.clone(),
                payload_json,
                created_index_key: keys.guides_by_created(),
                created_score: now.timestamp_millis(),
                likes_index_key: keys.guides_by_likes(),
                author_index_key: keys.guides_by_author(author_id),
            }
        };
        run_script(&mut self.conn, &scripts::GUIDE_CREATE, &command).await?;
        Ok(id)
    }

    async fn get_by_id(&mut self, id: &str) -> Result<Guide, PlatformError> {
        let (doc_key, set_key) = {
            let keys = KeyContext::new(&self.prefix);
            (keys.guide(id), keys.guide_liked_by(id))
        };
        // One MULTI/EXEC so the document and the liker set come from the same
        // point in time.
        let (raw, mut likers): (Option<String>, Vec<String>) = redis::pipe()
            .atomic()
            .get(&doc_key)
            .smembers(&set_key)
            .query_async(&mut self.conn)
            .await
            .map_err(PlatformError::StoreRead)?;

        let raw = raw.ok_or_else(|| PlatformError::not_found(id))?;
        let mut guide: Guide = serde_json::from_str(&raw)
            .map_err(|err| PlatformError::other(format!("failed to deserialize guide: {err}")))?;
        likers.sort_unstable();
        guide.liked_by = likers;
        Ok(guide)
    }

    async fn list_all(&mut self) -> Result<Vec<Guide>, PlatformError> {
        let index = KeyContext::new(&self.prefix).guides_by_created();
        let ids: Vec<String> = redis::cmd("ZREVRANGE")
            .arg(&index)
            .arg(0)
            .arg(-1)
            .query_async(&mut self.conn)
            .await
            .map_err(PlatformError::StoreRead)?;
        self.fetch_many(ids).await
    }

    async fn list_by_author(&mut self, author_id: &str) -> Result<Vec<Guide>, PlatformError> {
        let index = KeyContext::new(&self.prefix).guides_by_author(author_id);
        let ids: Vec<String> = redis::cmd("SMEMBERS")
            .arg(&index)
            .query_async(&mut self.conn)
            .await
            .map_err(PlatformError::StoreRead)?;
        self.fetch_many(ids).await
    }

    async fn list_top_by_likes(&mut self, limit: usize) -> Result<Vec<Guide>, PlatformError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let index = KeyContext::new(&self.prefix).guides_by_likes();
        let ids: Vec<String> = redis::cmd("ZREVRANGE")
            .arg(&index)
            .arg(0)
            .arg((limit - 1) as isize)
            .query_async(&mut self.conn)
            .await
            .map_err(PlatformError::StoreRead)?;
        self.fetch_many(ids).await
    }

    async fn update(&mut self, id: &str, draft: &GuideDraft) -> Result<(), PlatformError> {
        let draft = draft.normalized();
        draft.validate()?;
        let patch_json = serde_json::to_string(&draft)
            .map_err(|err| PlatformError::other(format!("failed to serialize patch: {err}")))?;

        let command = {
            let keys = KeyContext::new(&self.prefix);
            GuidePatch {
                key: keys.guide(id),
                entity_id: id.to_string(),
                patch_json,
                updated_at: Utc::now(),
            }
        };
        run_script(&mut self.conn, &scripts::GUIDE_UPDATE, &command).await?;
        Ok(())
    }

    async fn delete(&mut self, id: &str) -> Result<(), PlatformError> {
        // The per-author index key needs the stored author id.
        let guide = self.get_by_id(id).await?;
        let command = {
            let keys = KeyContext::new(&self.prefix);
            GuideDelete {
                key: keys.guide(id),
                entity_id: id.to_string(),
                liked_by_key: keys.guide_liked_by(id),
                created_index_key: keys.guides_by_created(),
                likes_index_key: keys.guides_by_likes(),
                author_index_key: keys.guides_by_author(&guide.author_id),
                comment_index_key: keys.comments_by_guide(id),
                comment_key_prefix: keys.comment_prefix(),
                comment_author_prefix: keys.comments_by_author_prefix(),
            }
        };
        run_script(&mut self.conn, &scripts::GUIDE_DELETE, &command).await?;
        Ok(())
    }

    async fn toggle_like(&mut self, id: &str, uid: &str, was_liked: bool) -> Result<(), PlatformError> {
        let command = {
            let keys = KeyContext::new(&self.prefix);
            LikeToggle {
                key: keys.guide(id),
                entity_id: id.to_string(),
                uid: uid.to_string(),
                was_liked,
                liked_by_key: keys.guide_liked_by(id),
                likes_index_key: keys.guides_by_likes(),
            }
        };
        run_script(&mut self.conn, &scripts::GUIDE_TOGGLE_LIKE, &command).await?;
        Ok(())
    }
}
