use crate::error::StorageError;
use crate::storage::traits::{ObjectStore, ProgressSink, UploadFile};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Body, Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const CHUNK_SIZE: usize = 64 * 1024;

/// Object store reached over HTTP: `POST <base>/o/<object-name>` with the raw
/// bytes, answered by `{ "downloadUrl": "..." }`
pub struct HttpObjectStore {
    client: Client,
    base: Url,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    download_url: String,
}

impl HttpObjectStore {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, StorageError> {
        if base.cannot_be_a_base() {
            return Err(StorageError::InvalidBaseUrl(base.to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    fn object_url(&self, object_name: &str) -> Result<Url, StorageError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| StorageError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(["o", object_name]);
        Ok(url)
    }
}

/// Streams the file in chunks so progress follows what reqwest has pulled
fn progress_body(bytes: &[u8], progress: ProgressSink) -> Body {
    let total = bytes.len();
    let chunks: Vec<Vec<u8>> = bytes.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();
    let mut sent = 0;
    let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
        sent += chunk.len();
        progress.report_bytes(sent, total);
        Ok::<_, std::io::Error>(chunk)
    }));
    Body::wrap_stream(stream)
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn upload(
        &self,
        object_name: &str,
        file: &UploadFile,
        progress: ProgressSink,
    ) -> Result<String, StorageError> {
        let url = self.object_url(object_name)?;
        debug!("Uploading {} ({} bytes) to {}", file.name, file.bytes.len(), url);

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, file.content_type.as_str())
            .body(progress_body(&file.bytes, progress.clone()))
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).into_owned();
            warn!("Upload of {} rejected with {}", file.name, status);
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let decoded: UploadResponse = serde_json::from_slice(&body)?;
        progress.report(100);
        Ok(decoded.download_url)
    }
}
