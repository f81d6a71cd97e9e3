mod listing;
mod user;

pub use listing::{Listing, ListingDraft, ListingType};
pub use user::{Credentials, ProfileUpdate, SignUp, User};
