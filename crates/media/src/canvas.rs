//! Canvas raster surface and 2D drawing context.
//!
//! Pixels are stored as non-premultiplied RGBA8. Compositing happens in
//! premultiplied floating point and follows the Porter-Duff operators
//! exposed by [`CompositeOperation`]. Like an HTML canvas, operators that
//! discard the destination (`Copy`, `SourceIn`, `DestinationIn`, ...) act on
//! the whole surface: pixels the source does not cover are treated as
//! transparent source pixels.

use crate::image_decoder::ImageError;
use common::{Color, Point, Size};

/// Premultiplied, normalized RGBA.
type Premul = [f32; 4];

const TRANSPARENT: Premul = [0.0; 4];

/// Raster surface that owns its pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct Canvas {
    /// Canvas width.
    width: u32,
    /// Canvas height.
    height: u32,
    /// Pixel data (RGBA, non-premultiplied).
    data: Vec<u8>,
    /// Context type the canvas has been claimed by, if any.
    context_type: Option<ContextType>,
}

impl Canvas {
    /// Create a new, fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; Self::byte_len(width, height)],
            context_type: None,
        }
    }

    /// Create a canvas of the given size.
    pub fn with_size(size: Size) -> Self {
        Self::new(size.width, size.height)
    }

    /// Wrap raw RGBA pixels.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ImageError> {
        let expected = Self::byte_len(width, height);
        if data.len() != expected {
            return Err(ImageError::InvalidBuffer {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
            context_type: None,
        })
    }

    /// Canvas filled with a single colour.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let mut canvas = Self::new(width, height);
        for pixel in canvas.data.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color.to_array());
        }
        canvas
    }

    fn byte_len(width: u32, height: u32) -> usize {
        Size::new(width, height).area() * 4
    }

    /// Get width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Resize the canvas. Like assigning an HTML canvas's dimensions, this
    /// always clears the content, even when the size is unchanged.
    pub fn set_size(&mut self, size: Size) {
        self.width = size.width;
        self.height = size.height;
        self.data.clear();
        self.data.resize(Self::byte_len(size.width, size.height), 0);
    }

    /// Get raw pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at `(x, y)`, `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        Some(Color::rgba(
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ))
    }

    /// Whether every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Number of pixels with non-zero alpha.
    pub fn coverage(&self) -> usize {
        self.data.chunks_exact(4).filter(|px| px[3] != 0).count()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Claim the canvas for a context type. Returns `false` when the canvas
    /// is already claimed by a different type.
    pub fn claim_context(&mut self, context_type: ContextType) -> bool {
        match self.context_type {
            None => {
                self.context_type = Some(context_type);
                true
            }
            Some(existing) => existing == context_type,
        }
    }

    /// Context type the canvas is bound to.
    pub fn context_type(&self) -> Option<ContextType> {
        self.context_type
    }

    /// Get a 2D context. `None` when the canvas is bound to another
    /// context type.
    pub fn context_2d(&mut self) -> Option<CanvasContext2D<'_>> {
        if self.claim_context(ContextType::Context2D) {
            Some(CanvasContext2D::new(self))
        } else {
            None
        }
    }

    /// Premultiplied texel, transparent outside the canvas.
    #[inline]
    fn texel(&self, x: i64, y: i64) -> Premul {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return TRANSPARENT;
        }
        let idx = self.index(x as u32, y as u32);
        premultiply(&self.data[idx..idx + 4])
    }

    /// Bilinear sample at a continuous texel coordinate.
    fn sample(&self, sx: f64, sy: f64) -> Premul {
        let x0 = sx.floor();
        let y0 = sy.floor();
        let fx = (sx - x0) as f32;
        let fy = (sy - y0) as f32;
        let (ix, iy) = (x0 as i64, y0 as i64);

        if fx == 0.0 && fy == 0.0 {
            return self.texel(ix, iy);
        }

        let taps = [
            (self.texel(ix, iy), (1.0 - fx) * (1.0 - fy)),
            (self.texel(ix + 1, iy), fx * (1.0 - fy)),
            (self.texel(ix, iy + 1), (1.0 - fx) * fy),
            (self.texel(ix + 1, iy + 1), fx * fy),
        ];

        let mut out = TRANSPARENT;
        for (texel, weight) in taps {
            if weight == 0.0 {
                continue;
            }
            for i in 0..4 {
                out[i] += texel[i] * weight;
            }
        }
        out
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("coverage", &self.coverage())
            .field("context_type", &self.context_type)
            .finish()
    }
}

/// Context type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextType {
    Context2D,
    ImageBitmapRenderingContext,
}

/// 2D rendering context borrowing a canvas.
#[derive(Debug)]
pub struct CanvasContext2D<'a> {
    canvas: &'a mut Canvas,
    /// Current fill style.
    fill_style: Color,
    /// Global alpha.
    global_alpha: f32,
    /// Global composite operation.
    global_composite_operation: CompositeOperation,
}

impl<'a> CanvasContext2D<'a> {
    fn new(canvas: &'a mut Canvas) -> Self {
        Self {
            canvas,
            fill_style: Color::BLACK,
            global_alpha: 1.0,
            global_composite_operation: CompositeOperation::SourceOver,
        }
    }

    // State methods

    /// Set fill style.
    pub fn set_fill_style(&mut self, color: Color) {
        self.fill_style = color;
    }

    /// Set global alpha.
    pub fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = alpha.clamp(0.0, 1.0);
    }

    /// Set global composite operation.
    pub fn set_global_composite_operation(&mut self, op: CompositeOperation) {
        self.global_composite_operation = op;
    }

    // Drawing methods

    /// Fill a rectangle with the fill style. A pixel is covered when its
    /// centre lies inside the rectangle.
    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let mut color = premultiply(&self.fill_style.to_array());
        scale(&mut color, self.global_alpha);

        self.composite(|px, py| {
            let cx = px as f64 + 0.5;
            let cy = py as f64 + 0.5;
            if cx >= x && cx < x + width && cy >= y && cy < y + height {
                color
            } else {
                TRANSPARENT
            }
        });
    }

    /// Clear the whole canvas.
    pub fn clear(&mut self) {
        self.canvas.data.fill(0);
    }

    /// Draw an image with its top-left corner at `(dx, dy)`. Fractional
    /// offsets are resampled bilinearly.
    pub fn draw_image(&mut self, image: &Canvas, dx: f64, dy: f64) {
        let alpha = self.global_alpha;
        let offset = Point::new(dx, dy);

        // Nothing of the image lands on the canvas. The operator still runs
        // against a transparent source, as operators like `Copy` clear.
        let visible = dx > -(image.width as f64)
            && dx < self.canvas.width as f64
            && dy > -(image.height as f64)
            && dy < self.canvas.height as f64;
        if !visible {
            self.composite(|_, _| TRANSPARENT);
            return;
        }

        if offset.is_integral() {
            let (ox, oy) = (dx as i64, dy as i64);
            self.composite(|px, py| {
                let mut texel = image.texel(px as i64 - ox, py as i64 - oy);
                scale(&mut texel, alpha);
                texel
            });
        } else {
            self.composite(|px, py| {
                let mut texel = image.sample(px as f64 - dx, py as f64 - dy);
                scale(&mut texel, alpha);
                texel
            });
        }
    }

    /// Draw an image at an offset.
    pub fn draw_image_at(&mut self, image: &Canvas, offset: Point) {
        self.draw_image(image, offset.x, offset.y);
    }

    /// Apply the current composite operation for every destination pixel,
    /// taking the premultiplied source colour from `source`.
    fn composite<F>(&mut self, source: F)
    where
        F: Fn(u32, u32) -> Premul,
    {
        let op = self.global_composite_operation;
        let (w, h) = (self.canvas.width, self.canvas.height);

        for py in 0..h {
            for px in 0..w {
                let src = source(px, py);
                let idx = self.canvas.index(px, py);
                let pixel = &mut self.canvas.data[idx..idx + 4];
                let dst = premultiply(pixel);
                let out = op.apply(src, dst);
                pixel.copy_from_slice(&unpremultiply(out));
            }
        }
    }
}

/// Porter-Duff composite operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompositeOperation {
    #[default]
    SourceOver,
    SourceIn,
    DestinationOver,
    DestinationIn,
    DestinationAtop,
    Copy,
}

impl CompositeOperation {
    /// Source and destination coverage factors `(Fa, Fb)`.
    #[inline]
    fn factors(self, src_alpha: f32, dst_alpha: f32) -> (f32, f32) {
        match self {
            CompositeOperation::SourceOver => (1.0, 1.0 - src_alpha),
            CompositeOperation::SourceIn => (dst_alpha, 0.0),
            CompositeOperation::DestinationOver => (1.0 - dst_alpha, 1.0),
            CompositeOperation::DestinationIn => (0.0, src_alpha),
            CompositeOperation::DestinationAtop => (1.0 - dst_alpha, src_alpha),
            CompositeOperation::Copy => (1.0, 0.0),
        }
    }

    /// Composite premultiplied `src` onto premultiplied `dst`.
    #[inline]
    fn apply(self, src: Premul, dst: Premul) -> Premul {
        let (fa, fb) = self.factors(src[3], dst[3]);
        let mut out = TRANSPARENT;
        for i in 0..4 {
            out[i] = src[i] * fa + dst[i] * fb;
        }
        out
    }
}

#[inline]
fn premultiply(rgba: &[u8]) -> Premul {
    let a = rgba[3] as f32 / 255.0;
    [
        rgba[0] as f32 / 255.0 * a,
        rgba[1] as f32 / 255.0 * a,
        rgba[2] as f32 / 255.0 * a,
        a,
    ]
}

#[inline]
fn unpremultiply(p: Premul) -> [u8; 4] {
    let a = p[3].clamp(0.0, 1.0);
    if a <= 0.0 {
        return [0; 4];
    }
    [
        to_u8(p[0] / a),
        to_u8(p[1] / a),
        to_u8(p[2] / a),
        to_u8(a),
    ]
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[inline]
fn scale(p: &mut Premul, factor: f32) {
    if factor != 1.0 {
        for c in p.iter_mut() {
            *c *= factor;
        }
    }
}
