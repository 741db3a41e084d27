//! Renderer configuration.

use compositor::DEFAULT_CDN_URL;
use networking::DEFAULT_PROXY_URL;
use std::path::PathBuf;
use std::time::Duration;

use crate::user_agent;

/// Renderer configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct RendererConfig {
    /// Player service proxy endpoint.
    pub proxy_url: String,
    /// Base URL sprites and colour patterns are resolved against.
    pub cdn_url: String,
    /// Device pixel ratio; controls outline thickness.
    pub device_pixel_ratio: f64,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Serve assets from this directory instead of the CDN.
    pub asset_dir: Option<PathBuf>,
}

impl RendererConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for rendering from a local asset mirror.
    pub fn offline(asset_dir: impl Into<PathBuf>) -> Self {
        Self {
            asset_dir: Some(asset_dir.into()),
            ..Self::default()
        }
    }

    /// Set proxy endpoint.
    pub fn with_proxy_url(mut self, url: &str) -> Self {
        self.proxy_url = url.to_string();
        self
    }

    /// Set CDN base URL.
    pub fn with_cdn_url(mut self, url: &str) -> Self {
        self.cdn_url = url.to_string();
        self
    }

    /// Set device pixel ratio.
    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            cdn_url: DEFAULT_CDN_URL.to_string(),
            device_pixel_ratio: 1.0,
            timeout: Duration::from_secs(30),
            user_agent: user_agent(),
            asset_dir: None,
        }
    }
}
