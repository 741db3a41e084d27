//! Outline synthesis.
//!
//! A darkened copy of the composite's silhouette is stamped behind the
//! composite in the eight compass directions. The stamp distance follows
//! the device pixel ratio, so the outline keeps the same apparent width at
//! any zoom.

use common::{Color, Point, TankError, TankResult};
use media::{Canvas, CompositeOperation};
use tracing::trace;

/// Opacity of the outline fill.
pub const OUTLINE_ALPHA: f32 = 0.8;

/// Stamps a dark outline around already composited content.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutlineSynthesizer {
    device_pixel_ratio: f64,
}

impl OutlineSynthesizer {
    /// Create a synthesizer for a finite, positive device pixel ratio.
    pub fn new(device_pixel_ratio: f64) -> TankResult<Self> {
        if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
            return Err(TankError::invalid(format!(
                "device pixel ratio must be finite and positive, got {device_pixel_ratio}"
            )));
        }
        Ok(Self { device_pixel_ratio })
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Cardinal stamp distance.
    pub fn thickness(&self) -> f64 {
        self.device_pixel_ratio / 2.0
    }

    /// The eight stamp offsets: cardinals at the thickness, diagonals at
    /// the same euclidean distance.
    pub fn offsets(&self) -> [Point; 8] {
        let w = self.thickness();
        let d = (w * w / 2.0).sqrt();
        [
            Point::new(w, 0.0),
            Point::new(-w, 0.0),
            Point::new(0.0, w),
            Point::new(0.0, -w),
            Point::new(d, d),
            Point::new(d, -d),
            Point::new(-d, d),
            Point::new(-d, -d),
        ]
    }

    /// Silhouette of `surface` filled with the translucent outline colour.
    pub fn silhouette(&self, surface: &Canvas) -> TankResult<Canvas> {
        let mut scratch = Canvas::with_size(surface.size());
        let (width, height) = (scratch.width() as f64, scratch.height() as f64);
        let mut ctx = scratch
            .context_2d()
            .ok_or_else(|| TankError::missing_context("outline buffer"))?;

        ctx.set_global_composite_operation(CompositeOperation::Copy);
        ctx.set_fill_style(Color::BLACK.with_alpha(OUTLINE_ALPHA));
        ctx.fill_rect(0.0, 0.0, width, height);

        ctx.set_global_composite_operation(CompositeOperation::DestinationIn);
        ctx.draw_image(surface, 0.0, 0.0);

        Ok(scratch)
    }

    /// Stamp the outline beneath the content of `surface`.
    pub fn apply(&self, surface: &mut Canvas) -> TankResult<()> {
        let silhouette = self.silhouette(surface)?;

        let mut ctx = surface
            .context_2d()
            .ok_or_else(|| TankError::missing_context("destination surface"))?;
        ctx.set_global_composite_operation(CompositeOperation::DestinationOver);

        for offset in self.offsets() {
            ctx.draw_image_at(&silhouette, offset);
        }

        trace!(thickness = self.thickness(), "outline applied");
        Ok(())
    }
}

impl Default for OutlineSynthesizer {
    fn default() -> Self {
        Self {
            device_pixel_ratio: 1.0,
        }
    }
}
