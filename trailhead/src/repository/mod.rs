//! Repository contracts and their implementations. The coordinator is written
//! against the two store traits; production code plugs in the Redis-backed
//! repositories, tests plug in the in-memory doubles.
//!
//! Authorization is deliberately NOT a repository concern: callers apply the
//! ownership guard before invoking `update`/`delete`.

mod comments;
mod guides;
mod memory;

pub use comments::CommentRepo;
pub use guides::GuideRepo;
pub use memory::{MemoryCommentStore, MemoryGuideStore};

use crate::{
    errors::PlatformError,
    model::{Comment, Guide, GuideDraft},
};

/// Operations over the guide collection.
#[allow(async_fn_in_trait)]
pub trait GuideStore {
    /// Validates the draft and writes a new guide with zero likes, capturing
    /// the acting identity as the immutable author. Returns the new id.
    async fn create(&mut self, draft: &GuideDraft, author_id: &str, author_name: &str)
    -> Result<String, PlatformError>;

    async fn get_by_id(&mut self, id: &str) -> Result<Guide, PlatformError>;

    /// All guides, newest first.
    async fn list_all(&mut self) -> Result<Vec<Guide>, PlatformError>;

    /// One author's guides, unordered.
    async fn list_by_author(&mut self, author_id: &str) -> Result<Vec<Guide>, PlatformError>;

    /// The `limit` most-liked guides, descending.
    async fn list_top_by_likes(&mut self, limit: usize) -> Result<Vec<Guide>, PlatformError>;

    /// Overwrites the editable fields and stamps `updated_at`.
    async fn update(&mut self, id: &str, draft: &GuideDraft) -> Result<(), PlatformError>;

    /// Removes the guide and everything hanging off it, comments included.
    async fn delete(&mut self, id: &str) -> Result<(), PlatformError>;

    /// Atomically flips `uid`'s membership in the liker set and adjusts the
    /// cached counter: `was_liked` removes and decrements, otherwise adds and
    /// increments. Never two round trips.
    async fn toggle_like(&mut self, id: &str, uid: &str, was_liked: bool) -> Result<(), PlatformError>;
}

/// Operations over the comment collection.
#[allow(async_fn_in_trait)]
pub trait CommentStore {
    async fn create(
        &mut self,
        guide_id: &str,
        author_id: &str,
        author_name: &str,
        text: &str,
    ) -> Result<String, PlatformError>;

    /// A guide's comments, oldest first (order re-derived from stored
    /// timestamps on every fetch).
    async fn list_by_guide(&mut self, guide_id: &str) -> Result<Vec<Comment>, PlatformError>;

    async fn list_by_author(&mut self, author_id: &str) -> Result<Vec<Comment>, PlatformError>;

    async fn delete(&mut self, id: &str) -> Result<(), PlatformError>;
}
