//! Common types shared across the tank icon renderer.

pub mod color;
pub mod error;
pub mod geometry;
pub mod player;
pub mod size;

pub use color::Color;
pub use error::{TankError, TankResult};
pub use geometry::{Point, Size};
pub use player::{
    AccessorySlot, ColourRecord, ColourSpec, ColourType, PlayerCustomization, PlayerDetails,
    NO_ACCESSORY, UNAVAILABLE_NAME,
};
pub use size::RenderSize;
