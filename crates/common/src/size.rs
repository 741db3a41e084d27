//! Icon size table.

use crate::error::TankError;
use crate::geometry::Size;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Requested tank icon size.
///
/// Every size maps to a fixed source sprite resolution and a fixed canvas
/// size; nothing here is computed from the sprites themselves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl RenderSize {
    pub const ALL: [RenderSize; 3] = [RenderSize::Small, RenderSize::Medium, RenderSize::Large];

    /// Resolution number embedded in sprite and colour asset names.
    pub const fn resolution(self) -> u32 {
        match self {
            RenderSize::Small => 140,
            RenderSize::Medium => 200,
            RenderSize::Large => 320,
        }
    }

    /// Pixel size of the destination surface.
    pub const fn canvas_size(self) -> Size {
        match self {
            RenderSize::Small => Size::new(140, 84),
            RenderSize::Medium => Size::new(200, 120),
            RenderSize::Large => Size::new(320, 192),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            RenderSize::Small => "small",
            RenderSize::Medium => "medium",
            RenderSize::Large => "large",
        }
    }
}

impl fmt::Display for RenderSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderSize {
    type Err = TankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(RenderSize::Small),
            "medium" => Ok(RenderSize::Medium),
            "large" => Ok(RenderSize::Large),
            other => Err(TankError::invalid(format!("unknown icon size '{other}'"))),
        }
    }
}
