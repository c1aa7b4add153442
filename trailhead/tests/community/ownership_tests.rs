use trailhead::{CoverImage, Engagement, MemoryBlobStore};

use super::support::*;

#[tokio::test]
async fn only_the_author_may_edit_or_delete_a_guide() {
    let session = session_as("u2", "Bea");
    let (mut engagement, guide_id) = engagement_on_guide("u1", session.clone()).await;

    let mut changed = draft("Seven Lakes Valley");
    changed.difficulty = Some("hard".to_string());

    let err = engagement.edit_guide(&guide_id, &changed).await.expect_err("not owner");
    assert!(matches!(err, PlatformError::Forbidden { .. }));
    let err = engagement.remove_guide(&guide_id).await.expect_err("not owner");
    assert!(matches!(err, PlatformError::Forbidden { .. }));

    let stored = engagement.guides_mut().get_by_id(&guide_id).await.expect("still there");
    assert_eq!(stored.difficulty.as_deref(), Some("moderate"));
    assert!(stored.updated_at.is_none());

    session.accept_auth_change(Some(identity("u1", "Ada")));
    engagement.edit_guide(&guide_id, &changed).await.expect("owner edits");
    let stored = engagement.guides_mut().get_by_id(&guide_id).await.expect("get");
    assert_eq!(stored.difficulty.as_deref(), Some("hard"));
    assert!(stored.updated_at.is_some());

    engagement.remove_guide(&guide_id).await.expect("owner deletes");
    let err = engagement.guides_mut().get_by_id(&guide_id).await.expect_err("gone");
    assert!(matches!(err, PlatformError::NotFound { .. }));
    // The view showed the deleted guide, so it was closed.
    assert!(engagement.guide().is_none());
}

#[tokio::test]
async fn signed_out_edits_are_refused_before_any_store_call() {
    let session = Session::new();
    let (mut engagement, guide_id) = engagement_on_guide("u1", session).await;

    let err = engagement
        .edit_guide(&guide_id, &draft("retitled"))
        .await
        .expect_err("signed out");
    assert!(matches!(err, PlatformError::Unauthenticated));
}

#[tokio::test]
async fn publish_uploads_the_cover_before_writing_the_guide() {
    let session = session_as("u1", "Ada");
    let mut engagement = Engagement::new(session, MemoryGuideStore::new(), MemoryCommentStore::new());
    let mut blobs = MemoryBlobStore::new("https://blobs.example.com");

    let guide_id = engagement
        .publish_guide(
            &mut blobs,
            &draft("Vrata valley approach"),
            Some(CoverImage {
                bytes: b"jpeg bytes",
                file_name: "vrata.jpg",
            }),
        )
        .await
        .expect("publish");

    let stored = engagement.guides_mut().get_by_id(&guide_id).await.expect("get");
    assert_eq!(
        stored.cover_image_url.as_deref(),
        Some("https://blobs.example.com/covers/u1/vrata.jpg")
    );
    assert_eq!(stored.author_id, "u1");
    assert_eq!(stored.author_name, "Ada");
    assert_eq!(stored.likes_count, 0);
}

#[tokio::test]
async fn failed_cover_upload_aborts_the_publish() {
    let session = session_as("u1", "Ada");
    let mut engagement = Engagement::new(session, MemoryGuideStore::new(), MemoryCommentStore::new());
    let mut blobs = MemoryBlobStore::new("https://blobs.example.com");
    blobs.fail_next_upload();

    let err = engagement
        .publish_guide(
            &mut blobs,
            &draft("Vrata valley approach"),
            Some(CoverImage {
                bytes: b"jpeg bytes",
                file_name: "vrata.jpg",
            }),
        )
        .await
        .expect_err("upload fails");
    assert!(matches!(err, PlatformError::Upload { .. }));
    assert!(
        engagement
            .guides_mut()
            .list_by_author("u1")
            .await
            .expect("list")
            .is_empty(),
        "no guide may be written without its cover"
    );
}

#[tokio::test]
async fn profile_stats_aggregate_guides_likes_and_comments() {
    let session = session_as("u1", "Ada");
    let mut engagement = Engagement::new(session, MemoryGuideStore::new(), MemoryCommentStore::new());

    let first = engagement
        .guides_mut()
        .create(&draft("one"), "u1", "Ada")
        .await
        .expect("create");
    let second = engagement
        .guides_mut()
        .create(&draft("two"), "u1", "Ada")
        .await
        .expect("create");
    engagement.guides_mut().toggle_like(&first, "u2", false).await.unwrap();
    engagement.guides_mut().toggle_like(&first, "u3", false).await.unwrap();
    engagement.guides_mut().toggle_like(&second, "u2", false).await.unwrap();
    engagement
        .comments_mut()
        .create(&first, "u1", "Ada", "thanks everyone")
        .await
        .expect("comment");

    let stats = engagement.profile_stats("u1").await.expect("stats");
    assert_eq!(stats.guides_count, 2);
    assert_eq!(stats.likes_received, 3);
    assert_eq!(stats.comments_count, 1);
}
