mod common;

use common::{draft, image, FakeStore, InMemoryBackend};
use estate_scout::contact::{can_contact, ContactForm};
use estate_scout::forms::{self, MyListings, ProfileForm};
use estate_scout::models::{Credentials, ListingType, SignUp};
use estate_scout::{FormError, Route, SessionStore};

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn sign_up_then_sign_in() {
    let backend = InMemoryBackend::new();
    let session = SessionStore::new();

    let route = forms::sign_up(
        &backend,
        &session,
        &SignUp {
            username: "mira".to_string(),
            email: "mira@example.com".to_string(),
            password: "hunter22".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(route, Route::SignIn);
    assert_eq!(session.current_user(), None);

    let route = forms::sign_in(&backend, &session, &credentials("mira@example.com", "hunter22"))
        .await
        .unwrap();
    assert_eq!(route, Route::Home);

    let state = session.snapshot();
    assert_eq!(state.current_user.map(|u| u.username), Some("mira".to_string()));
    assert!(!state.loading);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn failed_sign_in_records_the_message() {
    let backend = InMemoryBackend::new();
    backend.add_user("mira", "hunter22");
    let session = SessionStore::new();

    let err = forms::sign_in(&backend, &session, &credentials("mira@example.com", "nope"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Wrong credentials!");
    let state = session.snapshot();
    assert_eq!(state.current_user, None);
    assert_eq!(state.error.as_deref(), Some("Wrong credentials!"));
}

#[tokio::test]
async fn duplicate_sign_up_is_an_application_failure() {
    let backend = InMemoryBackend::new();
    backend.add_user("mira", "hunter22");
    let session = SessionStore::new();

    let err = forms::sign_up(
        &backend,
        &session,
        &SignUp {
            username: "mira2".to_string(),
            email: "mira@example.com".to_string(),
            password: "x".to_string(),
        },
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "User already exists");
    assert_eq!(session.snapshot().error.as_deref(), Some("User already exists"));
}

#[tokio::test]
async fn profile_update_with_new_avatar() {
    let backend = InMemoryBackend::new();
    backend.add_user("mira", "hunter22");
    let session = SessionStore::new();
    forms::sign_in(&backend, &session, &credentials("mira@example.com", "hunter22"))
        .await
        .unwrap();
    let store = FakeStore::new();

    let mut profile = ProfileForm::new();
    profile.set_username("mira_k");
    let url = profile.upload_avatar(&store, &image("me.png")).await.unwrap();
    assert_eq!(profile.avatar_percent(), 100);

    let updated = profile.submit(&backend, &session).await.unwrap();

    assert_eq!(updated.username, "mira_k");
    assert_eq!(updated.avatar, url);
    assert!(profile.update_success());
    assert_eq!(session.current_user(), Some(updated.clone()));
    assert_eq!(profile.avatar_preview(&updated), url);
}

#[tokio::test]
async fn failed_avatar_upload_keeps_the_old_avatar() {
    let store = FakeStore::new().failing("huge.png");
    let mut profile = ProfileForm::new();

    let err = profile.upload_avatar(&store, &image("huge.png")).await.unwrap_err();

    assert!(matches!(err, FormError::Storage(_)));
    assert_eq!(
        profile.upload_error(),
        Some("Error Image upload (image must be less than 2 mb)")
    );
    assert_eq!(profile.changes().avatar, None);
}

#[tokio::test]
async fn delete_account_and_sign_out_end_the_session() {
    let backend = InMemoryBackend::new();
    backend.add_user("mira", "hunter22");
    backend.add_user("jon", "pass");
    let session = SessionStore::new();

    forms::sign_in(&backend, &session, &credentials("mira@example.com", "hunter22"))
        .await
        .unwrap();
    forms::delete_account(&backend, &session).await.unwrap();
    assert_eq!(session.current_user(), None);
    assert_eq!(backend.users().len(), 1);

    forms::sign_in(&backend, &session, &credentials("jon@example.com", "pass"))
        .await
        .unwrap();
    backend.fail("signout", "Session store unavailable");
    forms::sign_out(&backend, &session).await.unwrap_err();
    assert!(session.current_user().is_some());
    assert_eq!(session.snapshot().error.as_deref(), Some("Session store unavailable"));
}

#[tokio::test]
async fn profile_actions_need_a_session() {
    let backend = InMemoryBackend::new();
    let session = SessionStore::new();

    let err = ProfileForm::new().submit(&backend, &session).await.unwrap_err();
    assert!(matches!(err, FormError::NotSignedIn));
    assert!(matches!(
        forms::delete_account(&backend, &session).await,
        Err(FormError::NotSignedIn)
    ));
}

#[tokio::test]
async fn my_listings_delete_removes_only_on_success() {
    let backend = InMemoryBackend::new();
    let owner = backend.add_user("mira", "hunter22");
    let other = backend.add_user("jon", "pass");
    let first = backend.add_listing(draft("First listing of mira", ListingType::Rent), &owner.id);
    backend.add_listing(draft("Second listing of mira", ListingType::Sale), &owner.id);
    backend.add_listing(draft("A listing owned by jon", ListingType::Sale), &other.id);

    let session = SessionStore::new();
    forms::sign_in(&backend, &session, &credentials("mira@example.com", "hunter22"))
        .await
        .unwrap();

    let mut mine = MyListings::load(&backend, &session).await.unwrap();
    assert_eq!(mine.listings().len(), 2);
    assert!(!mine.load_error());

    assert!(mine.delete(&backend, &first.id).await);
    assert_eq!(mine.listings().len(), 1);

    backend.fail("delete_listing", "Unauthorized");
    let remaining = mine.listings()[0].id.clone();
    assert!(!mine.delete(&backend, &remaining).await);
    assert_eq!(mine.listings().len(), 1);
}

#[tokio::test]
async fn my_listings_load_failure_is_flagged() {
    let backend = InMemoryBackend::new();
    backend.add_user("mira", "hunter22");
    let session = SessionStore::new();
    forms::sign_in(&backend, &session, &credentials("mira@example.com", "hunter22"))
        .await
        .unwrap();
    backend.fail("user_listings", "boom");

    let mine = MyListings::load(&backend, &session).await.unwrap();
    assert!(mine.load_error());
    assert!(mine.listings().is_empty());
}

#[tokio::test]
async fn visitor_can_mail_the_owner() {
    let backend = InMemoryBackend::new();
    let owner = backend.add_user("mira", "hunter22");
    let visitor = backend.add_user("jon", "pass");
    let listing = backend.add_listing(draft("Quiet studio", ListingType::Rent), &owner.id);

    assert!(can_contact(&listing, Some(&visitor)));
    assert!(!can_contact(&listing, Some(&owner)));

    let mut contact = ContactForm::load(&backend, &listing).await;
    assert_eq!(contact.landlord().map(|u| u.id.clone()), Some(owner.id.clone()));
    contact.set_message("Hello");
    assert_eq!(
        contact.mailto_link().as_deref(),
        Some("mailto:mira@example.com?subject=Regarding%20Quiet%20studio&body=Hello")
    );
}

#[tokio::test]
async fn missing_owner_means_no_contact_link() {
    let backend = InMemoryBackend::new();
    let listing = backend.add_listing(draft("Quiet studio", ListingType::Rent), "ghost");

    let contact = ContactForm::load(&backend, &listing).await;
    assert!(contact.landlord().is_none());
    assert_eq!(contact.mailto_link(), None);
}
