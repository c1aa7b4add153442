//! Walks the engagement flows end to end against the in-memory stores:
//! register, publish with a cover, like, comment, and inspect profile stats.
//!
//! Run with `cargo run --example community_demo`.

use anyhow::Result;
use trailhead::{
    CoverImage, Engagement, GuideDraft, GuideStore, MemoryBlobStore, MemoryCommentStore, MemoryGuideStore,
    MemoryIdentityProvider, Session, ToggleOutcome,
};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let session = Session::new();
    let mut provider = MemoryIdentityProvider::new();
    let mut blobs = MemoryBlobStore::new("https://blobs.example.com");
    let mut engagement = Engagement::new(session.clone(), MemoryGuideStore::new(), MemoryCommentStore::new());

    // Ada publishes a guide with a cover image.
    session
        .register(&mut provider, "ada@example.com", "hunter2", "hunter2", Some("Ada"))
        .await?;
    let draft = GuideDraft {
        title: "Seven Lakes Valley traverse".into(),
        region: "Julian Alps".into(),
        guide_type: Some("hiking".into()),
        season: Some("summer".into()),
        duration: Some("2 days".into()),
        difficulty: Some("moderate".into()),
        short_description: "A quiet two-day loop between two mountain huts.".into(),
        content: "Day one climbs from the trailhead to the first hut.\nDay two follows the ridge back down.".into(),
        cover_image_url: None,
    };
    let guide_id = engagement
        .publish_guide(
            &mut blobs,
            &draft,
            Some(CoverImage {
                bytes: b"jpeg bytes",
                file_name: "seven-lakes.jpg",
            }),
        )
        .await?;
    println!("Ada published guide {guide_id}");

    // Bea signs in, opens the guide, likes it, and leaves a comment.
    session.sign_out(&mut provider).await?;
    session
        .register(&mut provider, "bea@example.com", "hunter2", "hunter2", Some("Bea"))
        .await?;
    engagement.open(&guide_id).await?;
    match engagement.toggle_like().await {
        ToggleOutcome::Applied => {}
        other => println!("toggle came back as {other:?}"),
    }
    engagement.post_comment("Great hike, the second hut is lovely.").await?;

    let view = engagement.guide().expect("guide is open");
    println!(
        "\"{}\" now has {} like(s) and {} comment(s)",
        view.guide.title,
        view.guide.likes_count,
        engagement.comments().len()
    );

    // Ada's profile aggregates her authored guides and received likes.
    let author_id = engagement.guides_mut().get_by_id(&guide_id).await?.author_id;
    let stats = engagement.profile_stats(&author_id).await?;
    println!(
        "Ada: {} guide(s), {} like(s) received, {} comment(s) written",
        stats.guides_count, stats.likes_received, stats.comments_count
    );

    Ok(())
}
