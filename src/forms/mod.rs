pub mod auth;
pub mod listing;
pub mod profile;

pub use auth::{sign_in, sign_up};
pub use listing::{validate_draft, FormMode, ListingEdit, ListingForm};
pub use profile::{delete_account, sign_out, MyListings, ProfileForm};
