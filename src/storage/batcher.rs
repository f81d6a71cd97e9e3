use crate::error::UploadError;
use crate::storage::traits::{BatchProgress, ObjectStore, ProgressSink, UploadFile};
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Most images a single listing may carry
pub const MAX_IMAGES: usize = 6;

/// Uploads a selection of images concurrently and hands back their URLs.
///
/// A batch is all or nothing: every upload is awaited, and a single failure
/// discards the URLs of the uploads that did succeed.
pub struct UploadBatcher<'a> {
    store: &'a dyn ObjectStore,
    limit: usize,
    progress: Arc<watch::Sender<BatchProgress>>,
}

impl<'a> UploadBatcher<'a> {
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self::with_limit(store, MAX_IMAGES)
    }

    pub fn with_limit(store: &'a dyn ObjectStore, limit: usize) -> Self {
        let (tx, _rx) = watch::channel(BatchProgress::default());
        Self {
            store,
            limit,
            progress: Arc::new(tx),
        }
    }

    /// Observe per-file percentages of the batch in flight
    pub fn subscribe(&self) -> watch::Receiver<BatchProgress> {
        self.progress.subscribe()
    }

    /// Upload `files` for a listing that already has `existing` images.
    ///
    /// Returns the new URLs in the order the files were given.
    pub async fn upload(
        &self,
        files: &[UploadFile],
        existing: &[String],
    ) -> Result<Vec<String>, UploadError> {
        if files.is_empty() {
            return Err(UploadError::NoFiles);
        }
        if files.len() + existing.len() > self.limit {
            warn!(
                "Refusing {} new images, listing already has {} (limit {})",
                files.len(),
                existing.len(),
                self.limit
            );
            return Err(UploadError::Capacity { limit: self.limit });
        }

        self.progress.send_replace(BatchProgress::new(files.len()));
        info!("Uploading {} images", files.len());

        let uploads = files.iter().enumerate().map(|(slot, file)| {
            let sink = ProgressSink::new(slot, Arc::clone(&self.progress));
            let object_name = object_name(file);
            async move { self.store.upload(&object_name, file, sink).await }
        });
        let results = join_all(uploads).await;

        let total = results.len();
        let mut urls = Vec::with_capacity(total);
        let mut failed = 0;
        for (file, result) in files.iter().zip(results) {
            match result {
                Ok(url) => {
                    debug!("Uploaded {} -> {}", file.name, url);
                    urls.push(url);
                }
                Err(err) => {
                    warn!("Upload of {} failed: {}", file.name, err);
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            return Err(UploadError::Failed { failed, total });
        }
        Ok(urls)
    }
}

/// Unique object name: upload time in milliseconds followed by the file name
pub fn object_name(file: &UploadFile) -> String {
    format!("{}{}", Utc::now().timestamp_millis(), file.name)
}
