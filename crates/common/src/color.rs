//! Color representation and parsing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// RGBA color with 8-bit, non-premultiplied components.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Neutral gray painted on tanks whose owner could not be resolved.
    pub const UNAVAILABLE_GRAY: Color = Color::rgb(0x88, 0x88, 0x88);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from a packed `0xRRGGBB` value.
    #[inline]
    pub const fn from_rgb_u32(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Return a copy with the alpha channel scaled to `alpha` (0.0 - 1.0).
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// Parse a numeric paint value as sent by the player service.
    ///
    /// The value is a 24-bit integer written in hex, with or without a `0x`
    /// prefix and without zero padding (`"0x88"` is `#000088`).
    pub fn from_numeric(value: &str) -> Option<Self> {
        let digits = value
            .trim()
            .strip_prefix("0x")
            .or_else(|| value.trim().strip_prefix("0X"))
            .unwrap_or(value.trim());

        if digits.is_empty()
            || digits.len() > 6
            || !digits.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return None;
        }

        u32::from_str_radix(digits, 16).ok().map(Self::from_rgb_u32)
    }

    /// Packed `0xRRGGBB` value, alpha ignored.
    #[inline]
    pub fn to_rgb_u32(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    #[inline]
    pub fn to_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_is_zero_padded() {
        assert_eq!(Color::from_numeric("0x888888"), Some(Color::UNAVAILABLE_GRAY));
        assert_eq!(Color::from_numeric("0x1A2B3C"), Some(Color::rgb(0x1a, 0x2b, 0x3c)));
        assert_eq!(Color::from_numeric("0xff"), Some(Color::rgb(0, 0, 255)));
        assert_eq!(Color::from_numeric("0x0"), Some(Color::BLACK));
        assert_eq!(Color::from_numeric("abc"), Some(Color::rgb(0, 0x0a, 0xbc)));
    }

    #[test]
    fn test_numeric_rejects_garbage() {
        assert_eq!(Color::from_numeric(""), None);
        assert_eq!(Color::from_numeric("0x"), None);
        assert_eq!(Color::from_numeric("0x1234567"), None);
        assert_eq!(Color::from_numeric("0xgg0000"), None);
    }

    #[test]
    fn test_numeric_rejects_signs() {
        assert_eq!(Color::from_numeric("+ff"), None);
        assert_eq!(Color::from_numeric("0x+ff"), None);
        assert_eq!(Color::from_numeric("-1"), None);
        assert_eq!(Color::from_numeric("0x 12"), None);
    }

    #[test]
    fn test_packed_rgb() {
        assert_eq!(Color::from_rgb_u32(0x1a2b3c), Color::rgb(0x1a, 0x2b, 0x3c));
        assert_eq!(Color::from_rgb_u32(0x1a2b3c).to_rgb_u32(), 0x1a2b3c);
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(Color::BLACK.with_alpha(0.8).a, 204);
        assert_eq!(Color::BLACK.with_alpha(2.0).a, 255);
    }
}
