use crate::error::StorageError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;

/// A file picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing the content type from its extension
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .context("Upload path has no file name")?
            .to_string();
        let content_type = content_type_for(&name).to_string();

        Ok(Self {
            name,
            content_type,
            bytes,
        })
    }
}

fn content_type_for(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

/// Per-file upload percentages of one batch, in submission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchProgress {
    pub percents: Vec<u8>,
}

impl BatchProgress {
    pub fn new(files: usize) -> Self {
        Self {
            percents: vec![0; files],
        }
    }

    /// Mean percentage over all files; 0 for an empty batch
    pub fn overall(&self) -> u8 {
        if self.percents.is_empty() {
            return 0;
        }
        let sum: usize = self.percents.iter().map(|p| usize::from(*p)).sum();
        (sum / self.percents.len()) as u8
    }

    pub fn is_complete(&self) -> bool {
        !self.percents.is_empty() && self.percents.iter().all(|p| *p == 100)
    }
}

/// Handle an upload uses to publish its own percentage into a shared [`BatchProgress`]
#[derive(Debug, Clone)]
pub struct ProgressSink {
    slot: usize,
    state: Arc<watch::Sender<BatchProgress>>,
}

impl ProgressSink {
    pub fn new(slot: usize, state: Arc<watch::Sender<BatchProgress>>) -> Self {
        Self { slot, state }
    }

    /// Sink for a lone upload, with the receiver that observes it
    pub fn single() -> (Self, watch::Receiver<BatchProgress>) {
        let (tx, rx) = watch::channel(BatchProgress::new(1));
        (Self::new(0, Arc::new(tx)), rx)
    }

    pub fn report(&self, percent: u8) {
        let percent = percent.min(100);
        self.state.send_modify(|progress| {
            if let Some(slot) = progress.percents.get_mut(self.slot) {
                *slot = percent;
            }
        });
    }

    /// Report `sent` of `total` bytes
    pub fn report_bytes(&self, sent: usize, total: usize) {
        let percent = if total == 0 {
            100
        } else {
            (sent.min(total) * 100 / total) as u8
        };
        self.report(percent);
    }
}

/// External object storage that turns a file into a public download URL
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload `file` under `object_name`, reporting progress to `progress`
    async fn upload(
        &self,
        object_name: &str,
        file: &UploadFile,
        progress: ProgressSink,
    ) -> Result<String, StorageError>;
}
