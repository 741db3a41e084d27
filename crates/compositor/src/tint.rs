//! Tint engine.
//!
//! A paintable sprite is a shape mask: opaque where the part exists and
//! transparent elsewhere. Tinting recolours that silhouette with either a
//! flat colour or a pattern image, using an off-screen buffer.

use common::{Color, ColourSpec, Size, TankError, TankResult};
use media::{Canvas, CompositeOperation};

/// Off-screen buffer used to tint one mask at a time.
///
/// Every result is copied out of the buffer, so one buffer can serve
/// several masks in sequence without earlier results changing.
#[derive(Debug)]
pub struct TintBuffer {
    canvas: Canvas,
}

impl TintBuffer {
    pub fn new(size: Size) -> Self {
        Self {
            canvas: Canvas::with_size(size),
        }
    }

    pub fn size(&self) -> Size {
        self.canvas.size()
    }

    /// Recolour `mask` flatly with `color`, keeping the mask's alpha.
    pub fn tint_numeric(&mut self, mask: &Canvas, color: Color) -> TankResult<Canvas> {
        let (width, height) = (self.canvas.width() as f64, self.canvas.height() as f64);
        let mut ctx = self
            .canvas
            .context_2d()
            .ok_or_else(|| TankError::missing_context("tint buffer"))?;

        ctx.clear();
        ctx.set_global_composite_operation(CompositeOperation::Copy);
        ctx.set_fill_style(Color { a: 255, ..color });
        ctx.fill_rect(0.0, 0.0, width, height);

        ctx.set_global_composite_operation(CompositeOperation::DestinationAtop);
        ctx.draw_image(mask, 0.0, 0.0);

        Ok(self.canvas.clone())
    }

    /// Fill the silhouette of `mask` with `pattern`.
    pub fn tint_pattern(&mut self, mask: &Canvas, pattern: &Canvas) -> TankResult<Canvas> {
        let mut ctx = self
            .canvas
            .context_2d()
            .ok_or_else(|| TankError::missing_context("tint buffer"))?;

        ctx.clear();
        ctx.set_global_composite_operation(CompositeOperation::Copy);
        ctx.draw_image(mask, 0.0, 0.0);

        ctx.set_global_composite_operation(CompositeOperation::SourceIn);
        ctx.draw_image(pattern, 0.0, 0.0);

        Ok(self.canvas.clone())
    }

    /// Tint with a resolved paint. Pattern paints need their pattern image;
    /// without it the result is blank.
    pub fn tint(
        &mut self,
        mask: &Canvas,
        paint: &ColourSpec,
        pattern: Option<&Canvas>,
    ) -> TankResult<Canvas> {
        match (paint, pattern) {
            (ColourSpec::Numeric(color), _) => self.tint_numeric(mask, *color),
            (ColourSpec::Image { .. }, Some(pattern)) => self.tint_pattern(mask, pattern),
            (ColourSpec::Image { .. }, None) => Ok(Canvas::with_size(self.size())),
        }
    }
}
