//! Sprite compositing for tank icons.
//!
//! The compositor turns a player's customization into a finished icon:
//! - resolving sprite and colour URLs on the CDN
//! - planning the fixed 14-layer stack
//! - tinting paintable masks with flat colours or patterns
//! - loading layers concurrently and drawing them in plan order
//! - stamping an optional outline

pub mod assets;
pub mod compositor;
pub mod outline;
pub mod plan;
pub mod tint;

pub use self::compositor::{CompositeStats, Compositor};
pub use assets::{AssetPaths, DEFAULT_CDN_URL, ID_TOKEN};
pub use outline::{OutlineSynthesizer, OUTLINE_ALPHA};
pub use plan::{LayerDescriptor, LayerKind, LayerPlan, LAYER_COUNT};
pub use tint::TintBuffer;
