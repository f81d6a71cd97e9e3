//! In-memory stand-ins for the backend and the object store.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use estate_scout::api::{AuthApi, ListingApi, SearchQuery, SortField, SortOrder, TypeFilter, UserApi};
use estate_scout::models::{
    Credentials, Listing, ListingDraft, ListingType, ProfileUpdate, SignUp, User,
};
use estate_scout::storage::{ObjectStore, ProgressSink, UploadFile};
use estate_scout::{ApiError, StorageError};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// Page size the backend uses when no `limit` is sent
pub const DEFAULT_LIMIT: usize = 9;

#[derive(Default)]
struct BackendState {
    users: Vec<(User, String)>,
    listings: Vec<Listing>,
    next_id: usize,
    signed_in: Option<String>,
    failures: HashMap<&'static str, String>,
    searches: Vec<SearchQuery>,
}

/// Behaves like the listing backend, including its search defaults
#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<BackendState>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `endpoint` answer `success: false` with `message`
    pub fn fail(&self, endpoint: &'static str, message: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(endpoint, message.to_string());
    }

    pub fn add_user(&self, username: &str, password: &str) -> User {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let user = User {
            id: format!("user-{}", state.next_id),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            avatar: "https://cdn.test/default-avatar.png".to_string(),
        };
        state.users.push((user.clone(), password.to_string()));
        user
    }

    pub fn add_listing(&self, draft: ListingDraft, owner_id: &str) -> Listing {
        let mut state = self.state.lock().unwrap();
        insert_listing(&mut state, draft, owner_id)
    }

    pub fn listings(&self) -> Vec<Listing> {
        self.state.lock().unwrap().listings.clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.state.lock().unwrap().users.iter().map(|(u, _)| u.clone()).collect()
    }

    pub fn searches(&self) -> Vec<SearchQuery> {
        self.state.lock().unwrap().searches.clone()
    }

    fn check(&self, endpoint: &'static str) -> Result<(), ApiError> {
        match self.state.lock().unwrap().failures.get(endpoint) {
            Some(message) => Err(ApiError::application(message.clone())),
            None => Ok(()),
        }
    }
}

fn insert_listing(state: &mut BackendState, draft: ListingDraft, owner_id: &str) -> Listing {
    state.next_id += 1;
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        + ChronoDuration::minutes(state.next_id as i64);
    let listing = Listing {
        id: format!("listing-{}", state.next_id),
        fields: draft,
        user_ref: owner_id.to_string(),
        created_at: Some(created),
        updated_at: Some(created),
    };
    state.listings.push(listing.clone());
    listing
}

#[async_trait]
impl AuthApi for InMemoryBackend {
    async fn sign_up(&self, request: &SignUp) -> Result<(), ApiError> {
        self.check("signup")?;
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|(u, _)| u.email == request.email) {
            return Err(ApiError::application("User already exists"));
        }
        state.next_id += 1;
        let user = User {
            id: format!("user-{}", state.next_id),
            username: request.username.clone(),
            email: request.email.clone(),
            avatar: String::new(),
        };
        state.users.push((user, request.password.clone()));
        Ok(())
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<User, ApiError> {
        self.check("signin")?;
        let mut state = self.state.lock().unwrap();
        let user = state
            .users
            .iter()
            .find(|(u, password)| u.email == credentials.email && *password == credentials.password)
            .map(|(u, _)| u.clone())
            .ok_or_else(|| ApiError::application("Wrong credentials!"))?;
        state.signed_in = Some(user.id.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        self.check("signout")?;
        self.state.lock().unwrap().signed_in = None;
        Ok(())
    }
}

#[async_trait]
impl UserApi for InMemoryBackend {
    async fn get_user(&self, user_id: &str) -> Result<User, ApiError> {
        self.check("get_user")?;
        self.state
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|(u, _)| u.id == user_id)
            .map(|(u, _)| u.clone())
            .ok_or_else(|| ApiError::application("User not found!"))
    }

    async fn update_user(&self, user_id: &str, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.check("update_user")?;
        let mut state = self.state.lock().unwrap();
        let (user, password) = state
            .users
            .iter_mut()
            .find(|(u, _)| u.id == user_id)
            .ok_or_else(|| ApiError::application("User not found!"))?;
        if let Some(username) = &update.username {
            user.username = username.clone();
        }
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        if let Some(new_password) = &update.password {
            *password = new_password.clone();
        }
        if let Some(avatar) = &update.avatar {
            user.avatar = avatar.clone();
        }
        Ok(user.clone())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), ApiError> {
        self.check("delete_user")?;
        self.state.lock().unwrap().users.retain(|(u, _)| u.id != user_id);
        Ok(())
    }

    async fn user_listings(&self, user_id: &str) -> Result<Vec<Listing>, ApiError> {
        self.check("user_listings")?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .listings
            .iter()
            .filter(|l| l.user_ref == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ListingApi for InMemoryBackend {
    async fn create_listing(&self, draft: &ListingDraft, owner_id: &str) -> Result<Listing, ApiError> {
        self.check("create_listing")?;
        let mut state = self.state.lock().unwrap();
        Ok(insert_listing(&mut state, draft.clone(), owner_id))
    }

    async fn update_listing(
        &self,
        listing_id: &str,
        draft: &ListingDraft,
        owner_id: &str,
    ) -> Result<Listing, ApiError> {
        self.check("update_listing")?;
        let mut state = self.state.lock().unwrap();
        let listing = state
            .listings
            .iter_mut()
            .find(|l| l.id == listing_id)
            .ok_or_else(|| ApiError::application("Listing not found!"))?;
        if listing.user_ref != owner_id {
            return Err(ApiError::application("You can only update your own listings!"));
        }
        listing.fields = draft.clone();
        Ok(listing.clone())
    }

    async fn delete_listing(&self, listing_id: &str) -> Result<(), ApiError> {
        self.check("delete_listing")?;
        self.state.lock().unwrap().listings.retain(|l| l.id != listing_id);
        Ok(())
    }

    async fn get_listing(&self, listing_id: &str) -> Result<Listing, ApiError> {
        self.check("get_listing")?;
        self.state
            .lock()
            .unwrap()
            .listings
            .iter()
            .find(|l| l.id == listing_id)
            .cloned()
            .ok_or_else(|| ApiError::application("Listing not found!"))
    }

    async fn search_listings(&self, query: &SearchQuery) -> Result<Vec<Listing>, ApiError> {
        self.check("search")?;
        let mut state = self.state.lock().unwrap();
        state.searches.push(query.clone());

        let filter = &query.filter;
        let term = filter.search_term.to_lowercase();
        let mut matches: Vec<Listing> = state
            .listings
            .iter()
            .filter(|l| l.fields.name.to_lowercase().contains(&term))
            .filter(|l| match filter.listing_type {
                TypeFilter::All => true,
                TypeFilter::Rent => l.fields.listing_type == ListingType::Rent,
                TypeFilter::Sale => l.fields.listing_type == ListingType::Sale,
            })
            .filter(|l| !filter.offer || l.fields.offer)
            .filter(|l| !filter.parking || l.fields.parking)
            .filter(|l| !filter.furnished || l.fields.furnished)
            .cloned()
            .collect();

        match filter.sort {
            SortField::RegularPrice => matches.sort_by(|a, b| {
                a.fields
                    .regular_price
                    .partial_cmp(&b.fields.regular_price)
                    .unwrap()
            }),
            SortField::CreatedAt => matches.sort_by_key(|l| l.created_at),
        }
        if filter.order == SortOrder::Desc {
            matches.reverse();
        }

        Ok(matches
            .into_iter()
            .skip(query.start_index.unwrap_or(0))
            .take(query.limit.unwrap_or(DEFAULT_LIMIT))
            .collect())
    }
}

/// Object store answering `https://cdn.test/<file name>`
#[derive(Default)]
pub struct FakeStore {
    delays: HashMap<String, u64>,
    failing: HashSet<String>,
    started: Mutex<Vec<String>>,
    finished: Mutex<Vec<String>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delay(mut self, file_name: &str, millis: u64) -> Self {
        self.delays.insert(file_name.to_string(), millis);
        self
    }

    pub fn failing(mut self, file_name: &str) -> Self {
        self.failing.insert(file_name.to_string());
        self
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }

    pub fn finished(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn upload(
        &self,
        _object_name: &str,
        file: &UploadFile,
        progress: ProgressSink,
    ) -> Result<String, StorageError> {
        self.started.lock().unwrap().push(file.name.clone());
        progress.report(50);
        if let Some(millis) = self.delays.get(&file.name) {
            tokio::time::sleep(Duration::from_millis(*millis)).await;
        }
        self.finished.lock().unwrap().push(file.name.clone());

        if self.failing.contains(&file.name) {
            return Err(StorageError::Rejected {
                status: 413,
                body: "file too large".to_string(),
            });
        }
        progress.report(100);
        Ok(format!("https://cdn.test/{}", file.name))
    }
}

pub fn image(name: &str) -> UploadFile {
    UploadFile::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF])
}

pub fn draft(name: &str, listing_type: ListingType) -> ListingDraft {
    ListingDraft {
        name: name.to_string(),
        description: "A well kept home close to the station".to_string(),
        address: "1 Station Road".to_string(),
        listing_type,
        regular_price: 1500.0,
        image_urls: vec!["https://cdn.test/cover.jpg".to_string()],
        ..ListingDraft::default()
    }
}
