//! Layer loading and compositing.

use crate::assets::AssetPaths;
use crate::plan::{LayerDescriptor, LayerPlan};
use crate::tint::TintBuffer;
use common::{ColourSpec, RenderSize, Size, TankError, TankResult};
use media::{Canvas, CompositeOperation};
use networking::{ImageLoader, LoadedImage};
use tracing::{debug, trace};

/// Counts from one composite pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompositeStats {
    /// Layers that produced an image and were drawn.
    pub drawn: usize,
    /// Layers that were empty or failed to load.
    pub skipped: usize,
}

/// Loads the layers of a plan and stacks them onto a surface.
#[derive(Debug, Clone)]
pub struct Compositor {
    loader: ImageLoader,
    paths: AssetPaths,
}

impl Compositor {
    pub fn new(loader: ImageLoader, paths: AssetPaths) -> Self {
        Self { loader, paths }
    }

    /// Load every layer of `plan` concurrently.
    ///
    /// The returned images are in plan order whatever order the loads
    /// finish in. Only a missing drawing context fails the whole batch.
    pub async fn load_layers(&self, plan: &LayerPlan, canvas_size: Size) -> TankResult<Vec<LoadedImage>> {
        let loads = plan
            .iter()
            .enumerate()
            .map(|(index, layer)| self.load_layer(index, layer, plan.size, canvas_size));

        futures::future::join_all(loads).await.into_iter().collect()
    }

    async fn load_layer(
        &self,
        index: usize,
        layer: &LayerDescriptor,
        size: RenderSize,
        canvas_size: Size,
    ) -> TankResult<LoadedImage> {
        if !layer.needs_fetch() {
            trace!(index, layer = layer.name, "empty slot");
            return Ok(LoadedImage::Unavailable);
        }

        let url = self
            .paths
            .sprite_url(&layer.asset_path, layer.accessory_id.as_deref())?;
        let image = self.loader.load(&url).await;

        let (Some(paint), LoadedImage::Ready(mask)) = (&layer.paint, &image) else {
            return Ok(image);
        };

        let pattern = match paint {
            ColourSpec::Image { pattern_id } => {
                let url = self.paths.colour_url(pattern_id, size)?;
                self.loader.load(&url).await.into_canvas()
            }
            ColourSpec::Numeric(_) => None,
        };

        // Each layer tints in its own buffer; loads run concurrently.
        let mut buffer = TintBuffer::new(canvas_size);
        let tinted = buffer.tint(mask, paint, pattern.as_ref())?;
        trace!(index, layer = layer.name, %paint, "tinted");

        Ok(LoadedImage::Ready(tinted))
    }

    /// Draw loaded layers onto `surface` in order, each at the origin.
    pub fn draw_layers(surface: &mut Canvas, images: &[LoadedImage]) -> TankResult<CompositeStats> {
        let mut ctx = surface
            .context_2d()
            .ok_or_else(|| TankError::missing_context("destination surface"))?;
        ctx.set_global_composite_operation(CompositeOperation::SourceOver);

        let mut stats = CompositeStats::default();
        for image in images {
            match image {
                LoadedImage::Ready(canvas) => {
                    ctx.draw_image(canvas, 0.0, 0.0);
                    stats.drawn += 1;
                }
                LoadedImage::Unavailable => stats.skipped += 1,
            }
        }

        Ok(stats)
    }

    /// Load and stack every layer of `plan` onto `surface`.
    pub async fn composite(&self, plan: &LayerPlan, surface: &mut Canvas) -> TankResult<CompositeStats> {
        let images = self.load_layers(plan, surface.size()).await?;
        let stats = Self::draw_layers(surface, &images)?;
        debug!(drawn = stats.drawn, skipped = stats.skipped, size = %plan.size, "composited layers");
        Ok(stats)
    }
}
