use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{ValidationError, ValidationIssue, ValidationResult},
    validators::is_valid_url,
};

/// One published travel article.
///
/// `author_id` is captured at creation and is the sole authorization anchor;
/// `author_name` is a denormalized display copy that may go stale if the user
/// renames. `likes_count` caches the size of `liked_by` and is kept in lock
/// step with it by the single atomic toggle operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub title: String,
    pub region: String,
    pub guide_type: Option<String>,
    pub season: Option<String>,
    pub duration: Option<String>,
    pub difficulty: Option<String>,
    pub short_description: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub likes_count: i64,
    /// Lives in its own set key, not in the stored document; repositories
    /// fill it in on read.
    #[serde(skip)]
    pub liked_by: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Guide {
    pub fn is_liked_by(&self, uid: &str) -> bool {
        self.liked_by.iter().any(|liker| liker == uid)
    }
}

/// One remark attached to a guide. Comments have no edit operation; they are
/// created and deleted whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub guide_id: String,
    pub author_id: String,
    pub author_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Author-supplied guide fields, as entered in the create/edit form.
///
/// Serialization order matches the stored document so a draft can double as
/// the field patch applied on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuideDraft {
    pub title: String,
    pub region: String,
    pub guide_type: Option<String>,
    pub season: Option<String>,
    pub duration: Option<String>,
    pub difficulty: Option<String>,
    pub short_description: String,
    pub content: String,
    pub cover_image_url: Option<String>,
}

impl GuideDraft {
    /// Trims every field and collapses empty optionals to `None`.
    pub fn normalized(&self) -> Self {
        fn opt(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|trimmed| !trimmed.is_empty())
                .map(str::to_string)
        }

        Self {
            title: self.title.trim().to_string(),
            region: self.region.trim().to_string(),
            guide_type: opt(&self.guide_type),
            season: opt(&self.season),
            duration: opt(&self.duration),
            difficulty: opt(&self.difficulty),
            short_description: self.short_description.trim().to_string(),
            content: self.content.trim().to_string(),
            cover_image_url: opt(&self.cover_image_url),
        }
    }

    /// Checks the required fields are non-empty after trimming and that a
    /// cover, when present, is an actual URL. Call on a normalized draft.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut issues = Vec::new();
        for (field, value) in [
            ("title", &self.title),
            ("region", &self.region),
            ("short_description", &self.short_description),
            ("content", &self.content),
        ] {
            if value.trim().is_empty() {
                issues.push(ValidationIssue::new(field, "validation.required", "field is required"));
            }
        }
        if let Some(url) = &self.cover_image_url
            && !is_valid_url(url)
        {
            issues.push(ValidationIssue::new(
                "cover_image_url",
                "validation.url",
                "cover image must be a valid URL",
            ));
        }

        if issues.is_empty() { Ok(()) } else { Err(ValidationError::new(issues)) }
    }
}

/// Validates comment text the same way the repositories expect it: non-empty
/// after trimming.
pub fn validate_comment_text(text: &str) -> ValidationResult<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::single(
            "text",
            "validation.required",
            "comment cannot be empty",
        ));
    }
    Ok(trimmed)
}
