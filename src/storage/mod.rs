pub mod batcher;
pub mod http;
pub mod traits;

pub use batcher::{UploadBatcher, MAX_IMAGES};
pub use http::HttpObjectStore;
pub use traits::{BatchProgress, ObjectStore, ProgressSink, UploadFile};
