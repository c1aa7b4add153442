use serde::Serialize;

/// Payload for `guide_create.lua`. Carries every key the script touches so
/// the script itself stays key-agnostic.
#[derive(Debug, Serialize)]
pub struct GuideCreate {
    pub key: String,
    pub entity_id: String,
    pub payload_json: String,
    pub created_index_key: String,
    pub created_score: i64,
    pub likes_index_key: String,
    pub author_index_key: String,
}

/// Payload for `guide_update.lua`. `patch_json` holds the editable fields
/// only; `updated_at` is assigned separately so the script stamps it even
/// when the patch is otherwise empty.
#[derive(Debug, Serialize)]
pub struct GuidePatch {
    pub key: String,
    pub entity_id: String,
    pub patch_json: String,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Payload for `guide_delete.lua`. The comment prefixes let the script derive
/// the keys of cascaded comments from the ids it finds in the index set.
#[derive(Debug, Serialize)]
pub struct GuideDelete {
    pub key: String,
    pub entity_id: String,
    pub liked_by_key: String,
    pub created_index_key: String,
    pub likes_index_key: String,
    pub author_index_key: String,
    pub comment_index_key: String,
    pub comment_key_prefix: String,
    pub comment_author_prefix: String,
}

/// Payload for `guide_toggle_like.lua`. `was_liked` is the caller's
/// observation of the current membership; the script applies the matching
/// set mutation and counter adjustment as one step.
#[derive(Debug, Serialize)]
pub struct LikeToggle {
    pub key: String,
    pub entity_id: String,
    pub uid: String,
    pub was_liked: bool,
    pub liked_by_key: String,
    pub likes_index_key: String,
}

/// Payload for `comment_create.lua`.
#[derive(Debug, Serialize)]
pub struct CommentCreate {
    pub key: String,
    pub entity_id: String,
    pub payload_json: String,
    pub guide_index_key: String,
    pub author_index_key: String,
}

/// Payload for `comment_delete.lua`. Index keys are derived server-side from
/// the stored document, so the caller does not need to read it first.
#[derive(Debug, Serialize)]
pub struct CommentDelete {
    pub key: String,
    pub entity_id: String,
    pub guide_index_prefix: String,
    pub author_index_prefix: String,
}
