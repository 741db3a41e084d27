//! Asset fetching and settle-always image loading.

use crate::client::{ClientError, HttpClient};
use async_trait::async_trait;
use bytes::Bytes;
use media::{Canvas, ImageDecoder};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Load error.
#[derive(Clone, Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP error: {status}")]
    Http { status: u16 },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Timeout")]
    Timeout,
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("IO error: {0}")]
    Io(String),
}

impl From<ClientError> for LoadError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Timeout => LoadError::Timeout,
            ClientError::InvalidUrl(msg) => LoadError::InvalidUrl(msg),
            ClientError::Status(404) => LoadError::NotFound("HTTP 404".to_string()),
            ClientError::Status(status) => LoadError::Http { status },
            _ => LoadError::Network(err.to_string()),
        }
    }
}

/// Where asset bytes come from.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetch the raw bytes behind `url`.
    async fn fetch(&self, url: &Url) -> Result<Bytes, LoadError>;
}

/// Assets served over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAssetSource {
    client: Arc<HttpClient>,
}

impl HttpAssetSource {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AssetSource for HttpAssetSource {
    async fn fetch(&self, url: &Url) -> Result<Bytes, LoadError> {
        Ok(self.client.fetch(url).await?)
    }
}

/// Assets mirrored into a local directory. The URL path (without the
/// leading slash) is resolved relative to `root`.
#[derive(Debug, Clone)]
pub struct DirectoryAssetSource {
    root: PathBuf,
}

impl DirectoryAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Local path an asset URL maps to.
    pub fn path_for(&self, url: &Url) -> Result<PathBuf, LoadError> {
        let relative = url.path().trim_start_matches('/');
        if relative.split('/').any(|segment| segment == "..") {
            return Err(LoadError::InvalidUrl(url.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AssetSource for DirectoryAssetSource {
    async fn fetch(&self, url: &Url) -> Result<Bytes, LoadError> {
        let path = self.path_for(url)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(LoadError::NotFound(path.display().to_string()))
            }
            Err(err) => Err(LoadError::Io(err.to_string())),
        }
    }
}

/// In-memory assets keyed by URL, with optional per-URL latency. Every
/// request is recorded, including misses.
#[derive(Debug, Default)]
pub struct MemoryAssetSource {
    assets: RwLock<HashMap<String, (Bytes, Duration)>>,
    requests: RwLock<Vec<String>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `data` for `url`.
    pub fn insert(&self, url: &Url, data: impl Into<Bytes>) {
        self.insert_with_latency(url, data, Duration::ZERO);
    }

    /// Serve `data` for `url` after `latency`.
    pub fn insert_with_latency(&self, url: &Url, data: impl Into<Bytes>, latency: Duration) {
        self.assets
            .write()
            .insert(url.to_string(), (data.into(), latency));
    }

    /// Change the latency of an already inserted asset.
    pub fn set_latency(&self, url: &Url, latency: Duration) {
        if let Some(entry) = self.assets.write().get_mut(url.as_str()) {
            entry.1 = latency;
        }
    }

    /// URLs requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.read().clone()
    }

    /// Forget recorded requests.
    pub fn clear_requests(&self) {
        self.requests.write().clear();
    }
}

#[async_trait]
impl AssetSource for MemoryAssetSource {
    async fn fetch(&self, url: &Url) -> Result<Bytes, LoadError> {
        self.requests.write().push(url.to_string());

        let entry = self.assets.read().get(url.as_str()).cloned();
        match entry {
            Some((data, latency)) => {
                if !latency.is_zero() {
                    tokio::time::sleep(latency).await;
                }
                Ok(data)
            }
            None => Err(LoadError::NotFound(url.to_string())),
        }
    }
}

/// Outcome of a settle-always image load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadedImage {
    /// Decoded image.
    Ready(Canvas),
    /// Fetch or decode failed, or nothing needed loading. Draws nothing.
    Unavailable,
}

impl LoadedImage {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadedImage::Ready(_))
    }

    pub fn as_canvas(&self) -> Option<&Canvas> {
        match self {
            LoadedImage::Ready(canvas) => Some(canvas),
            LoadedImage::Unavailable => None,
        }
    }

    pub fn into_canvas(self) -> Option<Canvas> {
        match self {
            LoadedImage::Ready(canvas) => Some(canvas),
            LoadedImage::Unavailable => None,
        }
    }
}

/// Image loader whose loads always settle.
///
/// Failures of any kind are logged and reported as
/// [`LoadedImage::Unavailable`]; callers never see an error.
#[derive(Clone)]
pub struct ImageLoader {
    source: Arc<dyn AssetSource>,
    decoder: Arc<ImageDecoder>,
}

impl ImageLoader {
    /// Create a loader over an asset source.
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        Self::with_decoder(source, ImageDecoder::new())
    }

    /// Create a loader with a custom decoder.
    pub fn with_decoder(source: Arc<dyn AssetSource>, decoder: ImageDecoder) -> Self {
        Self {
            source,
            decoder: Arc::new(decoder),
        }
    }

    /// Load and decode one image.
    pub async fn load(&self, url: &Url) -> LoadedImage {
        let bytes = match self.source.fetch(url).await {
            Ok(bytes) => bytes,
            Err(LoadError::NotFound(_)) => {
                debug!(%url, "asset not found");
                return LoadedImage::Unavailable;
            }
            Err(err) => {
                warn!(%url, %err, "asset fetch failed");
                return LoadedImage::Unavailable;
            }
        };

        match self.decoder.decode(&bytes) {
            Ok(canvas) => {
                debug!(%url, width = canvas.width(), height = canvas.height(), "asset loaded");
                LoadedImage::Ready(canvas)
            }
            Err(err) => {
                warn!(%url, %err, "asset decode failed");
                LoadedImage::Unavailable
            }
        }
    }
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("decoder", &self.decoder)
            .finish_non_exhaustive()
    }
}
