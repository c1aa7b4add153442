/// Key-construction helpers for the two persisted collections.
///
/// Layout per guide: a JSON document, a liker set, plus three index keys
/// (creation order, like ranking, per-author membership). Comments carry a
/// JSON document and two index sets (per guide, per author). Entity ids never
/// contain `:`, so the flat segments below cannot collide.
#[derive(Debug, Clone)]
pub struct KeyContext<'a> {
    pub prefix: &'a str,
}

impl<'a> KeyContext<'a> {
    pub fn new(prefix: &'a str) -> Self {
        Self { prefix }
    }

    pub fn guide(&self, guide_id: &str) -> String {
        format!("{}:guides:{}", self.prefix, guide_id)
    }

    pub fn guide_liked_by(&self, guide_id: &str) -> String {
        format!("{}:guides:liked_by:{}", self.prefix, guide_id)
    }

    pub fn guides_by_created(&self) -> String {
        format!("{}:guides:by_created", self.prefix)
    }

    pub fn guides_by_likes(&self) -> String {
        format!("{}:guides:by_likes", self.prefix)
    }

    pub fn guides_by_author(&self, author_id: &str) -> String {
        format!("{}:guides:by_author:{}", self.prefix, author_id)
    }

    pub fn comment(&self, comment_id: &str) -> String {
        format!("{}{}", self.comment_prefix(), comment_id)
    }

    /// Prefix under which every comment document lives; the guide-delete
    /// script appends cascaded comment ids to it server-side.
    pub fn comment_prefix(&self) -> String {
        format!("{}:comments:", self.prefix)
    }

    pub fn comments_by_guide(&self, guide_id: &str) -> String {
        format!("{}{}", self.comments_by_guide_prefix(), guide_id)
    }

    pub fn comments_by_guide_prefix(&self) -> String {
        format!("{}:comments:by_guide:", self.prefix)
    }

    pub fn comments_by_author(&self, author_id: &str) -> String {
        format!("{}{}", self.comments_by_author_prefix(), author_id)
    }

    pub fn comments_by_author_prefix(&self) -> String {
        format!("{}:comments:by_author:", self.prefix)
    }

    /// Glob matching every key written under this prefix; used by test
    /// cleanup.
    pub fn all_pattern(&self) -> String {
        format!("{}:*", self.prefix)
    }
}
