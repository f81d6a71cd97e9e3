use crate::api::types::SearchQuery;
use crate::error::ApiError;
use crate::models::{Credentials, Listing, ListingDraft, ProfileUpdate, SignUp, User};
use async_trait::async_trait;

/// `/api/auth/*` endpoints
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn sign_up(&self, request: &SignUp) -> Result<(), ApiError>;

    /// Signs in and returns the account; the session cookie is kept by the client
    async fn sign_in(&self, credentials: &Credentials) -> Result<User, ApiError>;

    async fn sign_out(&self) -> Result<(), ApiError>;
}

/// `/api/user/*` endpoints
#[async_trait]
pub trait UserApi: Send + Sync {
    async fn get_user(&self, user_id: &str) -> Result<User, ApiError>;

    async fn update_user(&self, user_id: &str, update: &ProfileUpdate) -> Result<User, ApiError>;

    async fn delete_user(&self, user_id: &str) -> Result<(), ApiError>;

    /// Listings owned by the given user
    async fn user_listings(&self, user_id: &str) -> Result<Vec<Listing>, ApiError>;
}

/// `/api/listing/*` endpoints
#[async_trait]
pub trait ListingApi: Send + Sync {
    async fn create_listing(&self, draft: &ListingDraft, owner_id: &str) -> Result<Listing, ApiError>;

    async fn update_listing(
        &self,
        listing_id: &str,
        draft: &ListingDraft,
        owner_id: &str,
    ) -> Result<Listing, ApiError>;

    async fn delete_listing(&self, listing_id: &str) -> Result<(), ApiError>;

    async fn get_listing(&self, listing_id: &str) -> Result<Listing, ApiError>;

    /// Filtered, sorted page of listings
    async fn search_listings(&self, query: &SearchQuery) -> Result<Vec<Listing>, ApiError>;
}
