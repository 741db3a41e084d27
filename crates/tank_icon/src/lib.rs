//! Tank icon renderer.
//!
//! This crate ties the renderer together:
//! - player lookup with fallback to a neutral gray tank
//! - layer compositing and optional outlining
//! - views that re-render when the player, size or outline flag changes

pub mod config;
pub mod renderer;
pub mod view;

#[cfg(test)]
mod testing;

pub use config::RendererConfig;
pub use renderer::{PlayerSource, RenderOutcome, RenderRequest, RenderState, TankRenderer};
pub use view::{TankView, ViewUpdate};

/// Renderer version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User agent string.
pub fn user_agent() -> String {
    format!("tank-icon/{} ({})", VERSION, std::env::consts::OS)
}
