use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use trailhead::{MemoryBlobStore, MemoryIdentityProvider, RouteGate};

use super::support::*;

#[tokio::test]
async fn subscribers_follow_the_full_auth_lifecycle() {
    let session = Session::new();
    let mut provider = MemoryIdentityProvider::new();
    let events = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&events);
    session.subscribe(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    session
        .register(&mut provider, "ada@example.com", "pw", "pw", Some("Ada"))
        .await
        .expect("register");
    session.sign_out(&mut provider).await.expect("sign out");
    session
        .sign_in(&mut provider, "ada@example.com", "pw")
        .await
        .expect("sign in");

    assert_eq!(events.load(Ordering::SeqCst), 3);

    session.teardown();
    assert!(!session.is_authenticated());
    session.accept_auth_change(Some(identity("u9", "Nia")));
    // Torn-down sessions have no subscribers left to notify.
    assert_eq!(events.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn avatar_upload_lands_under_the_user_and_refreshes_the_profile() {
    let session = Session::new();
    let mut provider = MemoryIdentityProvider::new();
    let mut blobs = MemoryBlobStore::new("https://blobs.example.com");

    let registered = session
        .register(&mut provider, "ada@example.com", "pw", "pw", Some("Ada"))
        .await
        .expect("register");

    let url = session
        .change_avatar(&mut provider, &mut blobs, b"png bytes", "me.png")
        .await
        .expect("avatar");
    assert_eq!(url, format!("https://blobs.example.com/avatars/{}/me.png", registered.uid));

    let refreshed = session.current().expect("signed in");
    assert_eq!(refreshed.photo_url.as_deref(), Some(url.as_str()));
    assert_eq!(refreshed.display_name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn failed_avatar_upload_leaves_the_profile_untouched() {
    let session = Session::new();
    let mut provider = MemoryIdentityProvider::new();
    let mut blobs = MemoryBlobStore::new("https://blobs.example.com");

    session
        .register(&mut provider, "ada@example.com", "pw", "pw", Some("Ada"))
        .await
        .expect("register");
    blobs.fail_next_upload();

    let err = session
        .change_avatar(&mut provider, &mut blobs, b"png bytes", "me.png")
        .await
        .expect_err("upload fails");
    assert!(matches!(err, PlatformError::Upload { .. }));
    assert!(session.current().expect("signed in").photo_url.is_none());
}

#[test]
fn route_gates_admit_by_auth_state_only() {
    let guest = Session::new();
    let member = session_as("u1", "Ada");

    assert!(RouteGate::Open.admits(&guest));
    assert!(RouteGate::Open.admits(&member));
    assert!(!RouteGate::RequiresAuth.admits(&guest));
    assert!(RouteGate::RequiresAuth.admits(&member));
    assert!(RouteGate::GuestOnly.admits(&guest));
    assert!(!RouteGate::GuestOnly.admits(&member));
}
