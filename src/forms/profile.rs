use crate::api::{AuthApi, ListingApi, UserApi};
use crate::error::{ApiError, FormError};
use crate::models::{Listing, ProfileUpdate, User};
use crate::session::{SessionAction, SessionStore};
use crate::storage::batcher::object_name;
use crate::storage::{BatchProgress, ObjectStore, ProgressSink, UploadFile};
use tokio::sync::watch;
use tracing::{info, warn};

const AVATAR_UPLOAD_ERROR: &str = "Error Image upload (image must be less than 2 mb)";

/// Profile edits; only touched fields are sent on submit
#[derive(Debug, Default)]
pub struct ProfileForm {
    changes: ProfileUpdate,
    avatar_progress: Option<watch::Receiver<BatchProgress>>,
    upload_error: Option<String>,
    update_success: bool,
}

impl ProfileForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changes(&self) -> &ProfileUpdate {
        &self.changes
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.changes.username = Some(username.into());
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.changes.email = Some(email.into());
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.changes.password = Some(password.into());
    }

    /// Percentage of the avatar upload in flight, or of the last one
    pub fn avatar_percent(&self) -> u8 {
        self.avatar_progress
            .as_ref()
            .map(|rx| rx.borrow().overall())
            .unwrap_or(0)
    }

    pub fn upload_error(&self) -> Option<&str> {
        self.upload_error.as_deref()
    }

    pub fn update_success(&self) -> bool {
        self.update_success
    }

    /// Avatar shown on the page: the freshly uploaded one, else the stored one
    pub fn avatar_preview<'a>(&'a self, user: &'a User) -> &'a str {
        self.changes.avatar.as_deref().unwrap_or(&user.avatar)
    }

    /// Upload a new avatar; its URL is sent with the next submit
    pub async fn upload_avatar(
        &mut self,
        store: &dyn ObjectStore,
        file: &UploadFile,
    ) -> Result<String, FormError> {
        let (sink, progress) = ProgressSink::single();
        self.avatar_progress = Some(progress);
        self.upload_error = None;

        match store.upload(&object_name(file), file, sink).await {
            Ok(url) => {
                self.changes.avatar = Some(url.clone());
                Ok(url)
            }
            Err(err) => {
                warn!("Avatar upload failed: {}", err);
                self.upload_error = Some(AVATAR_UPLOAD_ERROR.to_string());
                Err(err.into())
            }
        }
    }

    /// Send the changes for the signed-in user
    pub async fn submit(&mut self, api: &dyn UserApi, session: &SessionStore) -> Result<User, FormError> {
        let user_id = session.current_user_id().ok_or(FormError::NotSignedIn)?;
        self.update_success = false;

        session.dispatch(SessionAction::UpdateUserStart);
        match api.update_user(&user_id, &self.changes).await {
            Ok(user) => {
                info!("Updated profile of {}", user.username);
                session.dispatch(SessionAction::UpdateUserSuccess(user.clone()));
                self.update_success = true;
                Ok(user)
            }
            Err(err) => {
                session.dispatch(SessionAction::UpdateUserFailure(err.to_string()));
                Err(err.into())
            }
        }
    }
}

/// Delete the signed-in account and end the session
pub async fn delete_account(api: &dyn UserApi, session: &SessionStore) -> Result<(), FormError> {
    let user_id = session.current_user_id().ok_or(FormError::NotSignedIn)?;

    session.dispatch(SessionAction::DeleteUserStart);
    match api.delete_user(&user_id).await {
        Ok(()) => {
            info!("Deleted account {}", user_id);
            session.dispatch(SessionAction::DeleteUserSuccess);
            Ok(())
        }
        Err(err) => {
            session.dispatch(SessionAction::DeleteUserFailure(err.to_string()));
            Err(err.into())
        }
    }
}

pub async fn sign_out(api: &dyn AuthApi, session: &SessionStore) -> Result<(), ApiError> {
    session.dispatch(SessionAction::SignOutStart);
    match api.sign_out().await {
        Ok(()) => {
            session.dispatch(SessionAction::SignOutSuccess);
            Ok(())
        }
        Err(err) => {
            session.dispatch(SessionAction::SignOutFailure(err.to_string()));
            Err(err)
        }
    }
}

/// The signed-in user's own listings, as shown on the profile page
#[derive(Debug, Default)]
pub struct MyListings {
    listings: Vec<Listing>,
    load_error: bool,
}

impl MyListings {
    pub async fn load(api: &dyn UserApi, session: &SessionStore) -> Result<Self, FormError> {
        let user_id = session.current_user_id().ok_or(FormError::NotSignedIn)?;
        match api.user_listings(&user_id).await {
            Ok(listings) => Ok(Self {
                listings,
                load_error: false,
            }),
            Err(err) => {
                warn!("Could not load listings of {}: {}", user_id, err);
                Ok(Self {
                    listings: Vec::new(),
                    load_error: true,
                })
            }
        }
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    /// True when the last load failed ("Error showing listings")
    pub fn load_error(&self) -> bool {
        self.load_error
    }

    /// Delete one listing; failures are only logged and leave the list as is
    pub async fn delete(&mut self, api: &dyn ListingApi, listing_id: &str) -> bool {
        match api.delete_listing(listing_id).await {
            Ok(()) => {
                self.listings.retain(|listing| listing.id != listing_id);
                true
            }
            Err(err) => {
                warn!("Could not delete listing {}: {}", listing_id, err);
                false
            }
        }
    }
}
