pub(crate) use chrono::Utc;
pub(crate) use trailhead::{
    CommentStore, Engagement, GuideDraft, GuideStore, Identity, MemoryCommentStore, MemoryGuideStore, PlatformError,
    Provenance, Session,
};

pub(crate) fn identity(uid: &str, name: &str) -> Identity {
    Identity {
        uid: uid.to_string(),
        email: format!("{uid}@example.com"),
        display_name: Some(name.to_string()),
        photo_url: None,
        created_at: Utc::now(),
    }
}

/// Session already signed in as the given user.
pub(crate) fn session_as(uid: &str, name: &str) -> Session {
    let session = Session::new();
    session.accept_auth_change(Some(identity(uid, name)));
    session
}

pub(crate) fn draft(title: &str) -> GuideDraft {
    GuideDraft {
        title: title.to_string(),
        region: "Julian Alps".to_string(),
        guide_type: Some("hiking".to_string()),
        season: Some("summer".to_string()),
        duration: Some("2 days".to_string()),
        difficulty: Some("moderate".to_string()),
        short_description: "A quiet loop with two mountain huts.".to_string(),
        content: "Day one climbs to the first hut.\nDay two follows the ridge down.".to_string(),
        cover_image_url: None,
    }
}

/// A guide authored by `author_uid`, plus an engagement coordinator viewing
/// it as the session's user.
pub(crate) async fn engagement_on_guide(
    author_uid: &str,
    session: Session,
) -> (Engagement<MemoryGuideStore, MemoryCommentStore>, String) {
    let mut guides = MemoryGuideStore::new();
    let guide_id = guides
        .create(&draft("Seven Lakes Valley"), author_uid, "Ada")
        .await
        .expect("create guide");
    let mut engagement = Engagement::new(session, guides, MemoryCommentStore::new());
    engagement.open(&guide_id).await.expect("open guide");
    (engagement, guide_id)
}
