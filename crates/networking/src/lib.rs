//! Networking layer for the tank icon renderer.
//!
//! This crate handles:
//! - HTTP requests through a shared reqwest client
//! - Asset sources (HTTP, local directory, in-memory)
//! - Settle-always image loading
//! - Player lookups through the player service proxy

pub mod client;
pub mod loader;
pub mod lookup;

#[cfg(test)]
mod testing;

pub use client::{ClientConfig, ClientError, HttpClient, HttpClientBuilder};
pub use loader::{
    AssetSource, DirectoryAssetSource, HttpAssetSource, ImageLoader, LoadError, LoadedImage,
    MemoryAssetSource,
};
pub use lookup::{
    LookupError, LookupResponse, PlayerLookup, ProxyPlayerLookup, StaticPlayerLookup,
    DEFAULT_PROXY_URL,
};
