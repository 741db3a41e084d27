//! Sprite fixtures shared by the renderer tests.

use std::sync::Arc;
use std::time::Duration;

use common::{Color, ColourRecord, ColourSpec, PlayerCustomization, PlayerDetails, RenderSize};
use compositor::{AssetPaths, Compositor, LayerKind, LayerPlan};
use media::{encode_png, Canvas};
use networking::{ImageLoader, MemoryAssetSource, StaticPlayerLookup};

use crate::renderer::TankRenderer;

pub(crate) const PATTERN_COLOR: Color = Color::rgb(30, 160, 90);

/// A sprite covering a band of the canvas that shifts with the layer index.
pub(crate) fn sprite(size: RenderSize, index: usize, kind: LayerKind) -> Canvas {
    let canvas_size = size.canvas_size();
    let (w, h) = (canvas_size.width as f64, canvas_size.height as f64);
    let color = match kind {
        LayerKind::Paint => Color::WHITE,
        LayerKind::Shade => Color::rgba(0, 0, 0, 64),
        LayerKind::Accessory(_) => Color::rgb(200, (index * 15) as u8, 40),
    };

    let mut canvas = Canvas::with_size(canvas_size);
    {
        let mut ctx = canvas.context_2d().unwrap();
        ctx.set_fill_style(color);
        ctx.fill_rect(w / 6.0 + index as f64 * 3.0, h / 4.0, w / 3.0, h / 2.0);
    }
    canvas
}

/// Serve every asset `custom` needs at `size`.
pub(crate) fn populate(
    source: &MemoryAssetSource,
    paths: &AssetPaths,
    custom: &PlayerCustomization,
    size: RenderSize,
) {
    let plan = LayerPlan::build(custom, size);
    for (index, layer) in plan.iter().enumerate() {
        if layer.needs_fetch() {
            let url = paths
                .sprite_url(&layer.asset_path, layer.accessory_id.as_deref())
                .unwrap();
            source.insert(&url, encode_png(&sprite(size, index, layer.kind)).unwrap());
        }

        if let Some(ColourSpec::Image { pattern_id }) = &layer.paint {
            let canvas_size = size.canvas_size();
            let pattern = Canvas::filled(canvas_size.width, canvas_size.height, PATTERN_COLOR);
            let url = paths.colour_url(pattern_id, size).unwrap();
            source.insert(&url, encode_png(&pattern).unwrap());
        }
    }
}

/// Same as [`populate`], with every asset delayed by `latency`.
pub(crate) fn populate_with_latency(
    source: &MemoryAssetSource,
    custom: &PlayerCustomization,
    size: RenderSize,
    latency: Duration,
) {
    let paths = AssetPaths::default();
    populate(source, &paths, custom, size);
    for layer in &LayerPlan::build(custom, size) {
        let url = paths
            .sprite_url(&layer.asset_path, layer.accessory_id.as_deref())
            .unwrap();
        source.set_latency(&url, latency);
    }
}

pub(crate) fn renderer(
    lookup: Arc<StaticPlayerLookup>,
    source: Arc<MemoryAssetSource>,
    device_pixel_ratio: f64,
) -> TankRenderer {
    let compositor = Compositor::new(ImageLoader::new(source), AssetPaths::default());
    TankRenderer::new(lookup, compositor, device_pixel_ratio).unwrap()
}

/// A fully customized player.
pub(crate) fn details_1950197() -> PlayerDetails {
    PlayerDetails {
        username: "Laika".to_string(),
        player_id: "1950197".to_string(),
        base_colour: Some(ColourRecord::numeric("0x3a5f0b")),
        tread_colour: Some(ColourRecord::numeric("0x222222")),
        turret_colour: Some(ColourRecord::image("5")),
        back_accessory: Some("1".to_string()),
        tread_accessory: Some("7".to_string()),
        turret_accessory: Some("2".to_string()),
        front_accessory: Some("3".to_string()),
        barrel_accessory: Some("4".to_string()),
        ..Default::default()
    }
}

/// A player with flat paints and nothing equipped.
pub(crate) fn plain_details(name: &str, rgb: &str) -> PlayerDetails {
    PlayerDetails {
        username: name.to_string(),
        player_id: name.to_string(),
        base_colour: Some(ColourRecord::numeric(rgb)),
        tread_colour: Some(ColourRecord::numeric(rgb)),
        turret_colour: Some(ColourRecord::numeric(rgb)),
        ..Default::default()
    }
}
