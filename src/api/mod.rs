pub mod client;
pub mod traits;
pub mod types;

pub use client::ApiClient;
pub use traits::{AuthApi, ListingApi, UserApi};
pub use types::{ApiResponse, SearchFilter, SearchQuery, SortField, SortOrder, TypeFilter};
