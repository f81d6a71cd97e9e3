use crate::api::traits::{AuthApi, ListingApi, UserApi};
use crate::api::types::{ApiResponse, SearchQuery};
use crate::error::ApiError;
use crate::models::{Credentials, Listing, ListingDraft, ProfileUpdate, SignUp, User};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("estate-scout/", env!("CARGO_PKG_VERSION"));

/// Reqwest-backed client for the listing backend.
///
/// The session cookie set by `/api/auth/signin` is kept in the client's cookie
/// jar and sent with every later request, so one `ApiClient` is one session.
pub struct ApiClient {
    client: Client,
    base: Url,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListingPayload<'a> {
    #[serde(flatten)]
    draft: &'a ListingDraft,
    user_ref: &'a str,
}

impl ApiClient {
    /// Create a client rooted at `base` (e.g. `http://localhost:3000`)
    pub fn new(base: Url, timeout: Duration) -> Result<Self, ApiError> {
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.bytes().await?;

        debug!("{} answered {} ({} bytes)", url, status, body.len());

        let value: serde_json::Value =
            serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
                status: status.as_u16(),
                source,
            })?;

        let outcome = ApiResponse::from_value(value).map_err(|source| ApiError::Decode {
            status: status.as_u16(),
            source,
        })?;

        if let ApiResponse::Failure { message } = &outcome {
            warn!("{} failed with status {}: {}", url, status, message);
        }
        outcome.into_result()
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.url(segments)?;
        debug!("GET {}", url);
        self.send(self.client.get(url)).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(segments)?;
        debug!("POST {}", url);
        self.send(self.client.post(url).json(body)).await
    }

    async fn delete(&self, segments: &[&str]) -> Result<(), ApiError> {
        let url = self.url(segments)?;
        debug!("DELETE {}", url);
        self.send::<IgnoredAny>(self.client.delete(url)).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn sign_up(&self, request: &SignUp) -> Result<(), ApiError> {
        self.post::<_, IgnoredAny>(&["api", "auth", "signup"], request)
            .await?;
        Ok(())
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<User, ApiError> {
        self.post(&["api", "auth", "signin"], credentials).await
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        self.get::<IgnoredAny>(&["api", "auth", "signout"]).await?;
        Ok(())
    }
}

#[async_trait]
impl UserApi for ApiClient {
    async fn get_user(&self, user_id: &str) -> Result<User, ApiError> {
        self.get(&["api", "user", user_id]).await
    }

    async fn update_user(&self, user_id: &str, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.post(&["api", "user", "update", user_id], update).await
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), ApiError> {
        self.delete(&["api", "user", "delete", user_id]).await
    }

    async fn user_listings(&self, user_id: &str) -> Result<Vec<Listing>, ApiError> {
        self.get(&["api", "user", "listings", user_id]).await
    }
}

#[async_trait]
impl ListingApi for ApiClient {
    async fn create_listing(&self, draft: &ListingDraft, owner_id: &str) -> Result<Listing, ApiError> {
        let payload = ListingPayload {
            draft,
            user_ref: owner_id,
        };
        self.post(&["api", "listing", "create"], &payload).await
    }

    async fn update_listing(
        &self,
        listing_id: &str,
        draft: &ListingDraft,
        owner_id: &str,
    ) -> Result<Listing, ApiError> {
        let payload = ListingPayload {
            draft,
            user_ref: owner_id,
        };
        self.post(&["api", "listing", "update", listing_id], &payload)
            .await
    }

    async fn delete_listing(&self, listing_id: &str) -> Result<(), ApiError> {
        self.delete(&["api", "listing", "delete", listing_id]).await
    }

    async fn get_listing(&self, listing_id: &str) -> Result<Listing, ApiError> {
        self.get(&["api", "listing", "get", listing_id]).await
    }

    async fn search_listings(&self, query: &SearchQuery) -> Result<Vec<Listing>, ApiError> {
        let mut url = self.url(&["api", "listing", "get"])?;
        let query_string = query.to_query();
        if !query_string.is_empty() {
            url.set_query(Some(&query_string));
        }
        debug!("GET {}", url);
        self.send(self.client.get(url)).await
    }
}
