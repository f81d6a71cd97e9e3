use thiserror::Error;

/// Failure of a call to the REST backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, timeout, ...)
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with `success: false`
    #[error("{message}")]
    Application { message: String },

    /// The body was not the JSON shape we asked for
    #[error("unexpected response from server (status {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    pub fn application(message: impl Into<String>) -> Self {
        Self::Application {
            message: message.into(),
        }
    }
}

/// Failure of a single object-storage upload
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("upload rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("invalid upload response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid storage URL: {0}")]
    InvalidBaseUrl(String),
}

/// Outcome of an image batch that could not be applied to a draft
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Select at least one image to upload")]
    NoFiles,

    #[error("You can only upload {limit} images per listing")]
    Capacity { limit: usize },

    #[error("Image upload failed (2 mb max per image)")]
    Failed { failed: usize, total: usize },
}

/// Client-side checks that block a listing submission
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("You must upload at least one image")]
    MissingImage,

    #[error("Discount price cannot be higher than regular price")]
    DiscountAboveRegular,

    #[error("You can only upload {limit} images per listing")]
    TooManyImages { limit: usize },

    #[error("{0} is required")]
    Required(&'static str),

    #[error("Name must be between {min} and {max} characters")]
    NameLength { min: usize, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
}

/// Anything that can stop a form submission
#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("You must be signed in")]
    NotSignedIn,
}
