//! Engagement coordinator: the state machine behind a guide's detail view.
//!
//! It holds the locally rendered guide snapshot and comment list, drives the
//! like-toggle protocol (optimistic local patch, at most one store call in
//! flight per guide, failures logged but never rolled back), and applies the
//! ownership guard at every mutating action site.
//!
//! The like toggle is split into `begin_like_toggle` / `complete_like_toggle`
//! around the store call so every transition is observable without I/O;
//! [`Engagement::toggle_like`] composes the three steps over the held store.

use chrono::Utc;

use crate::{
    errors::PlatformError,
    guard,
    model::{Comment, Guide, GuideDraft, validate_comment_text},
    repository::{CommentStore, GuideStore},
    session::Session,
    upload::BlobStore,
};

/// Whether the held snapshot has been confirmed by the store or still carries
/// an unacknowledged optimistic patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Confirmed,
    Optimistic,
}

/// The locally held guide snapshot, tagged with its provenance.
#[derive(Debug, Clone)]
pub struct GuideView {
    pub guide: Guide,
    pub provenance: Provenance,
}

/// Outcome of `begin_like_toggle`: the caller either proceeds with the store
/// call, redirects to authentication, or does nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LikeDecision {
    RequiresLogin,
    /// A toggle is already in flight for this guide, or no guide is open.
    Ignored,
    Proceed {
        guide_id: String,
        uid: String,
        was_liked: bool,
    },
}

/// Outcome of the composed [`Engagement::toggle_like`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Applied,
    RequiresLogin,
    Ignored,
}

/// Aggregate counts shown on a user's profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileStats {
    pub guides_count: usize,
    pub likes_received: i64,
    pub comments_count: usize,
}

/// Cover image bytes attached to a publish call.
#[derive(Debug, Clone, Copy)]
pub struct CoverImage<'a> {
    pub bytes: &'a [u8],
    pub file_name: &'a str,
}

struct PendingLike {
    guide_id: String,
}

pub struct Engagement<G, C> {
    session: Session,
    guides: G,
    comments: C,
    view: Option<GuideView>,
    comment_list: Vec<Comment>,
    pending_like: Option<PendingLike>,
}

impl<G, C> Engagement<G, C>
where
    G: GuideStore,
    C: CommentStore,
{
    pub fn new(session: Session, guides: G, comments: C) -> Self {
        Self {
            session,
            guides,
            comments,
            view: None,
            comment_list: Vec::new(),
            pending_like: None,
        }
    }

    /// Loads a guide and its comments from the store. The fresh snapshot is
    /// always `Confirmed`: reloads trust the store, never the optimistic
    /// patch.
    pub async fn open(&mut self, guide_id: &str) -> Result<(), PlatformError> {
        let guide = self.guides.get_by_id(guide_id).await?;
        let comments = self.comments.list_by_guide(guide_id).await?;
        self.view = Some(GuideView {
            guide,
            provenance: Provenance::Confirmed,
        });
        self.comment_list = comments;
        self.pending_like = None;
        Ok(())
    }

    /// Abandons the current view. A toggle still in flight keeps its pending
    /// marker so its eventual completion is dropped rather than applied to a
    /// view that no longer exists.
    pub fn close(&mut self) {
        self.view = None;
        self.comment_list.clear();
    }

    pub fn guide(&self) -> Option<&GuideView> {
        self.view.as_ref()
    }

    /// The underlying guide store, for the pages around the detail view
    /// (catalog, home ranking, an author's own list).
    pub fn guides_mut(&mut self) -> &mut G {
        &mut self.guides
    }

    pub fn comments_mut(&mut self) -> &mut C {
        &mut self.comments
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comment_list
    }

    pub fn like_in_flight(&self) -> bool {
        self.pending_like.is_some()
    }

    /// Derived each render: does the signed-in user like the open guide?
    pub fn is_liked(&self) -> bool {
        match (self.session.current(), &self.view) {
            (Some(identity), Some(view)) => view.guide.is_liked_by(&identity.uid),
            _ => false,
        }
    }

    /// Derived each render: may the signed-in user edit the open guide?
    pub fn is_owner(&self) -> bool {
        match &self.view {
            Some(view) => guard::can_modify(self.session.current().as_ref(), &view.guide.author_id),
            None => false,
        }
    }

    /// First half of the like-toggle protocol. On `Proceed` the snapshot has
    /// already been patched optimistically and the in-flight marker set; the
    /// caller must follow up with the store call and `complete_like_toggle`.
    pub fn begin_like_toggle(&mut self) -> LikeDecision {
        let Some(identity) = self.session.current() else {
            return LikeDecision::RequiresLogin;
        };
        if self.pending_like.is_some() {
            return LikeDecision::Ignored;
        }
        let Some(view) = self.view.as_mut() else {
            return LikeDecision::Ignored;
        };

        let uid = identity.uid;
        let was_liked = view.guide.is_liked_by(&uid);
        if was_liked {
            view.guide.liked_by.retain(|liker| liker != &uid);
            view.guide.likes_count = (view.guide.likes_count - 1).max(0);
        } else {
            view.guide.liked_by.push(uid.clone());
            view.guide.likes_count += 1;
        }
        view.provenance = Provenance::Optimistic;

        let guide_id = view.guide.id.clone();
        self.pending_like = Some(PendingLike {
            guide_id: guide_id.clone(),
        });
        LikeDecision::Proceed {
            guide_id,
            uid,
            was_liked,
        }
    }

    /// Second half: clears the in-flight marker and absorbs the store result.
    /// Completions for a guide that is no longer open are dropped. A failure
    /// (including `NotFound` from a concurrent deletion) is logged and
    /// swallowed; the optimistic patch stays in place and the snapshot keeps
    /// its `Optimistic` tag.
    pub fn complete_like_toggle(&mut self, result: Result<(), PlatformError>) {
        let Some(pending) = self.pending_like.take() else {
            return;
        };
        let Some(view) = self.view.as_mut() else {
            return;
        };
        if view.guide.id != pending.guide_id {
            return;
        }
        match result {
            Ok(()) => view.provenance = Provenance::Confirmed,
            Err(err) => log::warn!("like toggle for guide {} failed: {err}", pending.guide_id),
        }
    }

    pub async fn toggle_like(&mut self) -> ToggleOutcome {
        match self.begin_like_toggle() {
            LikeDecision::RequiresLogin => ToggleOutcome::RequiresLogin,
            LikeDecision::Ignored => ToggleOutcome::Ignored,
            LikeDecision::Proceed {
                guide_id,
                uid,
                was_liked,
            } => {
                let result = self.guides.toggle_like(&guide_id, &uid, was_liked).await;
                self.complete_like_toggle(result);
                ToggleOutcome::Applied
            }
        }
    }

    /// Posts a comment on the open guide and appends it to the local list.
    /// The local copy uses the repository-assigned id and a client-side
    /// timestamp placeholder; the exact stored timestamp is not re-fetched.
    pub async fn post_comment(&mut self, text: &str) -> Result<(), PlatformError> {
        let identity = self.session.current().ok_or(PlatformError::Unauthenticated)?;
        let guide_id = match &self.view {
            Some(view) => view.guide.id.clone(),
            None => return Err(PlatformError::NotFound { entity_id: None }),
        };
        let text = validate_comment_text(text)?;

        let author_name = identity.display_handle();
        let id = self
            .comments
            .create(&guide_id, &identity.uid, &author_name, text)
            .await?;
        self.comment_list.push(Comment {
            id,
            guide_id,
            author_id: identity.uid,
            author_name,
            text: text.to_string(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    /// Deletes one of the open guide's comments. Ownership is checked against
    /// the comment's author before any store call; the guide's author gets no
    /// special rights here. The local list only shrinks on success.
    pub async fn delete_comment(&mut self, comment_id: &str) -> Result<(), PlatformError> {
        let identity = self.session.current();
        let comment = self
            .comment_list
            .iter()
            .find(|comment| comment.id == comment_id)
            .ok_or_else(|| PlatformError::not_found(comment_id))?;
        guard::require_owner(identity.as_ref(), &comment.author_id, comment_id)?;

        self.comments.delete(comment_id).await?;
        self.comment_list.retain(|comment| comment.id != comment_id);
        Ok(())
    }

    /// Creates a guide authored by the signed-in user. When cover bytes are
    /// supplied they are uploaded first and the guide is only written once
    /// the upload succeeded; a failed upload never leaves a coverless guide.
    pub async fn publish_guide<B>(
        &mut self,
        blobs: &mut B,
        draft: &GuideDraft,
        cover: Option<CoverImage<'_>>,
    ) -> Result<String, PlatformError>
    where
        B: BlobStore,
    {
        let identity = self.session.current().ok_or(PlatformError::Unauthenticated)?;
        let mut draft = draft.normalized();
        if let Some(cover) = cover {
            let path = format!("covers/{}/{}", identity.uid, cover.file_name);
            let url = blobs.upload(cover.bytes, &path).await?;
            draft.cover_image_url = Some(url);
        }
        self.guides
            .create(&draft, &identity.uid, &identity.display_handle())
            .await
    }

    /// Edits a guide's fields. The ownership guard runs against the stored
    /// author id even when a route gate already admitted the user.
    pub async fn edit_guide(&mut self, guide_id: &str, draft: &GuideDraft) -> Result<(), PlatformError> {
        let identity = self.session.current();
        let stored = self.guides.get_by_id(guide_id).await?;
        guard::require_owner(identity.as_ref(), &stored.author_id, guide_id)?;
        self.guides.update(guide_id, draft).await
    }

    /// Deletes a guide, ownership-guarded the same way. Closes the view if it
    /// was showing the deleted guide.
    pub async fn remove_guide(&mut self, guide_id: &str) -> Result<(), PlatformError> {
        let identity = self.session.current();
        let stored = self.guides.get_by_id(guide_id).await?;
        guard::require_owner(identity.as_ref(), &stored.author_id, guide_id)?;
        self.guides.delete(guide_id).await?;
        if self.view.as_ref().is_some_and(|view| view.guide.id == guide_id) {
            self.close();
        }
        Ok(())
    }

    /// Profile counters: authored guides, likes received across them, and
    /// comments written.
    pub async fn profile_stats(&mut self, uid: &str) -> Result<ProfileStats, PlatformError> {
        let guides = self.guides.list_by_author(uid).await?;
        let comments = self.comments.list_by_author(uid).await?;
        Ok(ProfileStats {
            guides_count: guides.len(),
            likes_received: guides.iter().map(|guide| guide.likes_count).sum(),
            comments_count: comments.len(),
        })
    }
}
