//! Client for a real-estate listing service: typed access to the REST
//! backend, batched image uploads to object storage, listing and profile
//! forms, search with pagination, and the signed-in session.

pub mod api;
pub mod config;
pub mod contact;
pub mod error;
pub mod forms;
pub mod home;
pub mod models;
pub mod routes;
pub mod search;
pub mod session;
pub mod storage;

pub use config::Config;
pub use error::{ApiError, FormError, StorageError, UploadError, ValidationError};
pub use routes::Route;
pub use session::{SessionAction, SessionState, SessionStore};
