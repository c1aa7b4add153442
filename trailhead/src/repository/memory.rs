//! In-memory doubles for the store contracts. They mirror the script
//! semantics precisely (membership-guarded set mutation, unconditional
//! counter adjustment) so coordinator tests exercise the same invariants the
//! scripts enforce. The comment cascade on guide delete lives in the delete
//! script; with the doubles it is the caller's job, since each double owns
//! one collection. Each double can be armed to fail its next write.

use std::collections::HashMap;

use chrono::Utc;

use crate::{
    errors::PlatformError,
    id::new_entity_id,
    model::{Comment, Guide, GuideDraft, validate_comment_text},
    repository::{CommentStore, GuideStore},
};

#[derive(Default)]
pub struct MemoryGuideStore {
    guides: HashMap<String, Guide>,
    fail_next_write: bool,
    /// Number of `toggle_like` calls that reached this store.
    pub toggle_calls: usize,
}

impl MemoryGuideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the store to fail its next mutating call.
    pub fn fail_next_write(&mut self) {
        self.fail_next_write = true;
    }

    fn take_injected_failure(&mut self) -> Result<(), PlatformError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(PlatformError::other("injected write failure"));
        }
        Ok(())
    }

    /// Direct snapshot access for assertions.
    pub fn stored(&self, id: &str) -> Option<&Guide> {
        self.guides.get(id)
    }
}

impl GuideStore for MemoryGuideStore {
    async fn create(
        &mut self,
        draft: &GuideDraft,
        author_id: &str,
        author_name: &str,
    ) -> Result<String, PlatformError> {
        let draft = draft.normalized();
        draft.validate()?;
        self.take_injected_failure()?;

        let id = new_entity_id();
        self.guides.insert(
            id.clone(),
            Guide {
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
                created_at: Utc::now(),
                updated_at: None,
            },
        );
        Ok(id)
    }

    async fn get_by_id(&mut self, id: &str) -> Result<Guide, PlatformError> {
        self.guides
            .get(id)
            .cloned()
            .ok_or_else(|| PlatformError::not_found(id))
    }

    async fn list_all(&mut self) -> Result<Vec<Guide>, PlatformError> {
        let mut guides: Vec<Guide> = self.guides.values().cloned().collect();
        guides.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(guides)
    }

    async fn list_by_author(&mut self, author_id: &str) -> Result<Vec<Guide>, PlatformError> {
        Ok(self
            .guides
            .values()
            .filter(|guide| guide.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn list_top_by_likes(&mut self, limit: usize) -> Result<Vec<Guide>, PlatformError> {
        let mut guides: Vec<Guide> = self.guides.values().cloned().collect();
        guides.sort_by(|a, b| b.likes_count.cmp(&a.likes_count).then_with(|| a.id.cmp(&b.id)));
        guides.truncate(limit);
        Ok(guides)
    }

    async fn update(&mut self, id: &str, draft: &GuideDraft) -> Result<(), PlatformError> {
        let draft = draft.normalized();
        draft.validate()?;
        self.take_injected_failure()?;

        let guide = self.guides.get_mut(id).ok_or_else(|| PlatformError::not_found(id))?;
        guide.title = draft.title;
        guide.region = draft.region;
        guide.guide_type = draft.guide_type;
        guide.season = draft.season;
        guide.duration = draft.duration;
        guide.difficulty = draft.difficulty;
        guide.short_description = draft.short_description;
        guide.content = draft.content;
        guide.cover_image_url = draft.cover_image_url;
        guide.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn delete(&mut self, id: &str) -> Result<(), PlatformError> {
        self.take_injected_failure()?;
        self.guides
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| PlatformError::not_found(id))
    }

    async fn toggle_like(&mut self, id: &str, uid: &str, was_liked: bool) -> Result<(), PlatformError> {
        self.toggle_calls += 1;
        self.take_injected_failure()?;

        let guide = self.guides.get_mut(id).ok_or_else(|| PlatformError::not_found(id))?;
        if was_liked {
            guide.liked_by.retain(|liker| liker != uid);
            guide.likes_count -= 1;
        } else {
            if !guide.liked_by.iter().any(|liker| liker == uid) {
                guide.liked_by.push(uid.to_string());
            }
            guide.likes_count += 1;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryCommentStore {
    comments: HashMap<String, Comment>,
    fail_next_write: bool,
}

impl MemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_write(&mut self) {
        self.fail_next_write = true;
    }

    fn take_injected_failure(&mut self) -> Result<(), PlatformError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(PlatformError::other("injected write failure"));
        }
        Ok(())
    }
}

impl CommentStore for MemoryCommentStore {
    async fn create(
        &mut self,
        guide_id: &str,
        author_id: &str,
        author_name: &str,
        text: &str,
    ) -> Result<String, PlatformError> {
        let text = validate_comment_text(text)?;
        self.take_injected_failure()?;

        let id = new_entity_id();
        self.comments.insert(
            id.clone(),
            Comment {
                id: id.clone(),
                guide_id: guide_id.to_string(),
                author_id: author_id.to_string(),
                author_name: author_name.to_string(),
                text: text.to_string(),
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn list_by_guide(&mut self, guide_id: &str) -> Result<Vec<Comment>, PlatformError> {
        let mut comments: Vec<Comment> = self
            .comments
            .values()
            .filter(|comment| comment.guide_id == guide_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn list_by_author(&mut self, author_id: &str) -> Result<Vec<Comment>, PlatformError> {
        let mut comments: Vec<Comment> = self
            .comments
            .values()
            .filter(|comment| comment.author_id == author_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn delete(&mut self, id: &str) -> Result<(), PlatformError> {
        self.take_injected_failure()?;
        self.comments
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| PlatformError::not_found(id))
    }
}
