use std::fmt;

/// Places a flow can send the user to next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    SignIn,
    SignUp,
    Profile,
    CreateListing,
    UpdateListing(String),
    Listing(String),
    /// Search page with a query string (no leading `?`)
    Search(String),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => f.write_str("/"),
            Route::About => f.write_str("/about"),
            Route::SignIn => f.write_str("/sign-in"),
            Route::SignUp => f.write_str("/sign-up"),
            Route::Profile => f.write_str("/profile"),
            Route::CreateListing => f.write_str("/create-listing"),
            Route::UpdateListing(id) => write!(f, "/update-listing/{id}"),
            Route::Listing(id) => write!(f, "/listing/{id}"),
            Route::Search(query) => write!(f, "/search?{query}"),
        }
    }
}
