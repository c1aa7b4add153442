//! Trailhead core library.
//!
//! The engagement and ownership core of a community travel-guide platform:
//! guide and comment repositories over Redis, the identity session, the
//! ownership guard, and the engagement coordinator that keeps locally
//! rendered like counters consistent with the store's liker sets.

pub mod engagement;
pub mod errors;
pub mod guard;
pub mod id;
pub mod keys;
pub mod model;
pub mod platform;
pub mod repository;
pub mod runtime;
pub mod session;
pub mod upload;
pub mod validators;

pub use engagement::{CoverImage, Engagement, GuideView, LikeDecision, ProfileStats, Provenance, ToggleOutcome};
pub use errors::{PlatformError, ValidationError, ValidationIssue, ValidationResult};
pub use guard::{RouteGate, can_modify, require_owner};
pub use model::{Comment, Guide, GuideDraft};
pub use platform::Platform;
pub use repository::{
    CommentRepo, CommentStore, GuideRepo, GuideStore, MemoryCommentStore, MemoryGuideStore,
};
pub use session::{Identity, IdentityProvider, MemoryIdentityProvider, Session, SubscriberId};
pub use upload::{BlobStore, MemoryBlobStore};

// Re-export redis so callers don't need to depend on a specific version.
pub use redis;
pub use redis::aio::ConnectionManager;

/// Delete all keys matching a pattern (for test cleanup).
///
/// SCAN + DEL so large namespaces are removed without blocking the store.
pub async fn cleanup_pattern(conn: &mut ConnectionManager, pattern: &str) -> Result<u64, PlatformError> {
    const SCAN_COUNT: usize = 1000;
    let mut cursor: u64 = 0;
    let mut total_deleted: u64 = 0;

    loop {
        let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(SCAN_COUNT)
            .query_async(conn)
            .await
            .map_err(PlatformError::StoreWrite)?;

        if !keys.is_empty() {
            let deleted: u64 = redis::cmd("DEL")
                .arg(&keys)
                .query_async(conn)
                .await
                .map_err(PlatformError::StoreWrite)?;
            total_deleted += deleted;
        }

        cursor = next_cursor;
        if cursor == 0 {
            break;
        }
    }

    Ok(total_deleted)
}
