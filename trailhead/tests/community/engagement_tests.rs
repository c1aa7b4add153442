use trailhead::{LikeDecision, ToggleOutcome};

use super::support::*;

#[tokio::test]
async fn like_patches_locally_and_confirms_remotely() {
    let (mut engagement, guide_id) = engagement_on_guide("u1", session_as("u2", "Bea")).await;

    assert_eq!(engagement.toggle_like().await, ToggleOutcome::Applied);

    let view = engagement.guide().expect("view");
    assert_eq!(view.guide.likes_count, 1);
    assert_eq!(view.guide.liked_by, vec!["u2".to_string()]);
    assert_eq!(view.provenance, Provenance::Confirmed);

    let stored = engagement.guides_mut().get_by_id(&guide_id).await.expect("stored");
    assert_eq!(stored.likes_count, 1);
    assert_eq!(stored.liked_by, vec!["u2".to_string()]);
}

#[tokio::test]
async fn second_toggle_unlikes_back_to_zero() {
    let (mut engagement, guide_id) = engagement_on_guide("u1", session_as("u2", "Bea")).await;

    assert_eq!(engagement.toggle_like().await, ToggleOutcome::Applied);
    assert_eq!(engagement.toggle_like().await, ToggleOutcome::Applied);

    let view = engagement.guide().expect("view");
    assert_eq!(view.guide.likes_count, 0);
    assert!(view.guide.liked_by.is_empty());

    let stored = engagement.guides_mut().get_by_id(&guide_id).await.expect("stored");
    assert_eq!(stored.likes_count, 0);
    assert!(stored.liked_by.is_empty());
}

#[tokio::test]
async fn signed_out_toggle_is_refused_without_state_change() {
    let session = Session::new();
    let (mut engagement, _) = engagement_on_guide("u1", session).await;

    assert_eq!(engagement.toggle_like().await, ToggleOutcome::RequiresLogin);

    let view = engagement.guide().expect("view");
    assert_eq!(view.guide.likes_count, 0);
    assert_eq!(view.provenance, Provenance::Confirmed);
    assert_eq!(engagement.guides_mut().toggle_calls, 0);
}

#[tokio::test]
async fn rapid_second_toggle_is_ignored_while_first_is_in_flight() {
    let (mut engagement, _) = engagement_on_guide("u1", session_as("u2", "Bea")).await;

    let decision = engagement.begin_like_toggle();
    let LikeDecision::Proceed {
        guide_id,
        uid,
        was_liked,
    } = decision
    else {
        panic!("expected Proceed, got {decision:?}");
    };

    // Second click lands before the store call resolves.
    assert_eq!(engagement.begin_like_toggle(), LikeDecision::Ignored);
    assert!(engagement.like_in_flight());

    let result = engagement.guides_mut().toggle_like(&guide_id, &uid, was_liked).await;
    engagement.complete_like_toggle(result);

    assert!(!engagement.like_in_flight());
    assert_eq!(engagement.guides_mut().toggle_calls, 1);
    assert_eq!(engagement.guide().expect("view").guide.likes_count, 1);
}

#[tokio::test]
async fn failed_toggle_keeps_optimistic_patch_until_reload() {
    let (mut engagement, guide_id) = engagement_on_guide("u1", session_as("u2", "Bea")).await;

    engagement.guides_mut().fail_next_write();
    assert_eq!(engagement.toggle_like().await, ToggleOutcome::Applied);

    // The optimistic patch stays and the divergence is visible in the tag.
    let view = engagement.guide().expect("view");
    assert_eq!(view.guide.likes_count, 1);
    assert_eq!(view.provenance, Provenance::Optimistic);
    assert!(!engagement.like_in_flight());
    let stored = engagement.guides_mut().get_by_id(&guide_id).await.expect("stored");
    assert_eq!(stored.likes_count, 0);

    // A full reload trusts the store and self-heals.
    engagement.open(&guide_id).await.expect("reload");
    let view = engagement.guide().expect("view");
    assert_eq!(view.guide.likes_count, 0);
    assert_eq!(view.provenance, Provenance::Confirmed);
}

#[tokio::test]
async fn toggle_against_concurrently_deleted_guide_is_swallowed() {
    let (mut engagement, guide_id) = engagement_on_guide("u1", session_as("u2", "Bea")).await;

    engagement.guides_mut().delete(&guide_id).await.expect("author deletes");

    assert_eq!(engagement.toggle_like().await, ToggleOutcome::Applied);
    assert!(!engagement.like_in_flight());
    // The view keeps rendering its last (optimistic) state.
    assert_eq!(engagement.guide().expect("view").guide.likes_count, 1);
}

#[tokio::test]
async fn stale_completion_after_navigation_is_dropped() {
    let (mut engagement, _first) = engagement_on_guide("u1", session_as("u2", "Bea")).await;
    let second = engagement
        .guides_mut()
        .create(&draft("Krn ascent"), "u1", "Ada")
        .await
        .expect("second guide");

    let decision = engagement.begin_like_toggle();
    assert!(matches!(decision, LikeDecision::Proceed { .. }));

    // Navigate away before the call resolves.
    engagement.open(&second).await.expect("open second");
    engagement.complete_like_toggle(Ok(()));

    let view = engagement.guide().expect("view");
    assert_eq!(view.guide.id, second);
    assert_eq!(view.guide.likes_count, 0);
    assert_eq!(view.provenance, Provenance::Confirmed);

    // The new view accepts a fresh toggle.
    assert_eq!(engagement.toggle_like().await, ToggleOutcome::Applied);
    assert_eq!(engagement.guide().expect("view").guide.likes_count, 1);
}

#[tokio::test]
async fn posted_comment_appends_at_end_with_author_attribution() {
    let session = session_as("u2", "Bea");
    let (mut engagement, guide_id) = engagement_on_guide("u1", session.clone()).await;

    engagement.post_comment("Great hike!").await.expect("post");
    session.accept_auth_change(Some(identity("u3", "Cho")));
    engagement.post_comment("Bring water.").await.expect("post");

    let comments = engagement.comments();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].text, "Great hike!");
    assert_eq!(comments[0].author_id, "u2");
    assert_eq!(comments[0].author_name, "Bea");
    assert_eq!(comments[1].text, "Bring water.");
    assert_eq!(comments[1].guide_id, guide_id);
}

#[tokio::test]
async fn empty_comment_is_refused_locally() {
    let (mut engagement, guide_id) = engagement_on_guide("u1", session_as("u2", "Bea")).await;

    let err = engagement.post_comment("   \n").await.expect_err("refused");
    assert!(matches!(err, PlatformError::Validation(_)));
    assert!(engagement.comments().is_empty());
    assert!(
        engagement
            .comments_mut()
            .list_by_guide(&guide_id)
            .await
            .expect("list")
            .is_empty()
    );
}

#[tokio::test]
async fn signed_out_comment_is_refused() {
    let session = Session::new();
    let (mut engagement, _) = engagement_on_guide("u1", session).await;

    let err = engagement.post_comment("hello").await.expect_err("refused");
    assert!(matches!(err, PlatformError::Unauthenticated));
}

#[tokio::test]
async fn guide_author_cannot_delete_someone_elses_comment() {
    let session = session_as("u2", "Bea");
    let (mut engagement, guide_id) = engagement_on_guide("u1", session.clone()).await;

    engagement.post_comment("Great hike!").await.expect("post");
    let comment_id = engagement.comments()[0].id.clone();

    // The guide's author signs in; owning the guide grants nothing here.
    session.accept_auth_change(Some(identity("u1", "Ada")));
    let err = engagement.delete_comment(&comment_id).await.expect_err("refused");
    assert!(matches!(err, PlatformError::Forbidden { .. }));
    assert_eq!(engagement.comments().len(), 1);
    assert_eq!(
        engagement
            .comments_mut()
            .list_by_guide(&guide_id)
            .await
            .expect("list")
            .len(),
        1
    );

    // The comment's own author may delete it.
    session.accept_auth_change(Some(identity("u2", "Bea")));
    engagement.delete_comment(&comment_id).await.expect("delete");
    assert!(engagement.comments().is_empty());
    assert!(
        engagement
            .comments_mut()
            .list_by_guide(&guide_id)
            .await
            .expect("list")
            .is_empty()
    );
}

#[tokio::test]
async fn failed_comment_delete_keeps_the_local_list() {
    let (mut engagement, _) = engagement_on_guide("u1", session_as("u2", "Bea")).await;

    engagement.post_comment("Great hike!").await.expect("post");
    let comment_id = engagement.comments()[0].id.clone();

    engagement.comments_mut().fail_next_write();
    engagement.delete_comment(&comment_id).await.expect_err("store failure");
    assert_eq!(engagement.comments().len(), 1);
}
