//! Layer plan builder.
//!
//! The plan is the fixed z-order of sprites that make up a tank icon,
//! bottom first.

use crate::assets::AssetPaths;
use common::{AccessorySlot, ColourSpec, PlayerCustomization, RenderSize};

/// Number of layers in every plan.
pub const LAYER_COUNT: usize = 14;

/// How a layer is obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    /// Shape mask recoloured with the player's paint.
    Paint,
    /// Sprite drawn as loaded (shading overlays).
    Shade,
    /// Optional accessory sprite.
    Accessory(AccessorySlot),
}

/// One entry of a layer plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerDescriptor {
    /// Short name for logs.
    pub name: &'static str,
    /// Asset path, possibly containing the id token.
    pub asset_path: String,
    /// Accessory id substituted for the id token. `None` for empty slots
    /// and non-accessory layers.
    pub accessory_id: Option<String>,
    /// Paint applied to the loaded mask.
    pub paint: Option<ColourSpec>,
    pub kind: LayerKind,
}

impl LayerDescriptor {
    fn paint(name: &'static str, part: &str, colour: &ColourSpec, size: RenderSize) -> Self {
        Self {
            name,
            asset_path: AssetPaths::part_path(part, size),
            accessory_id: None,
            paint: Some(colour.clone()),
            kind: LayerKind::Paint,
        }
    }

    fn shade(name: &'static str, part: &str, size: RenderSize) -> Self {
        Self {
            name,
            asset_path: AssetPaths::part_path(part, size),
            accessory_id: None,
            paint: None,
            kind: LayerKind::Shade,
        }
    }

    fn accessory(
        name: &'static str,
        slot: AccessorySlot,
        custom: &PlayerCustomization,
        size: RenderSize,
    ) -> Self {
        Self {
            name,
            asset_path: AssetPaths::accessory_template(slot.asset_prefix(), size),
            accessory_id: custom.accessory(slot).map(str::to_string),
            paint: None,
            kind: LayerKind::Accessory(slot),
        }
    }

    /// Whether the paint is a pattern image rather than a flat colour.
    pub fn is_pattern_color(&self) -> bool {
        self.paint.as_ref().is_some_and(ColourSpec::is_pattern)
    }

    /// Whether anything has to be fetched. Empty accessory slots resolve to
    /// an empty image without touching the network.
    pub fn needs_fetch(&self) -> bool {
        match self.kind {
            LayerKind::Accessory(_) => self.accessory_id.is_some(),
            LayerKind::Paint | LayerKind::Shade => true,
        }
    }
}

/// Ordered layer descriptors for one render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerPlan {
    pub size: RenderSize,
    layers: Vec<LayerDescriptor>,
}

impl LayerPlan {
    /// Build the plan for a player at a size.
    pub fn build(custom: &PlayerCustomization, size: RenderSize) -> Self {
        use LayerDescriptor as L;

        let tread = &custom.tread_colour;
        let turret = &custom.turret_colour;
        let barrel = custom.barrel_colour();
        let base = &custom.base_colour;

        let layers = vec![
            L::accessory("back-accessory", AccessorySlot::Back, custom, size),
            L::paint("left-tread", "leftTread", tread, size),
            L::shade("left-tread-shade", "leftTreadShade", size),
            L::paint("turret", "turret", turret, size),
            L::shade("turret-shade", "turretShade", size),
            L::paint("barrel", "barrel", barrel, size),
            L::shade("barrel-shade", "barrelShade", size),
            L::paint("base", "base", base, size),
            L::shade("base-shade", "baseShade", size),
            L::paint("right-tread", "rightTread", tread, size),
            L::shade("right-tread-shade", "rightTreadShade", size),
            L::accessory("turret-accessory", AccessorySlot::Turret, custom, size),
            L::accessory("front-accessory", AccessorySlot::Front, custom, size),
            L::accessory("barrel-accessory", AccessorySlot::Barrel, custom, size),
        ];
        debug_assert_eq!(layers.len(), LAYER_COUNT);

        Self { size, layers }
    }

    pub fn layers(&self) -> &[LayerDescriptor] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LayerDescriptor> {
        self.layers.iter()
    }
}

impl<'a> IntoIterator for &'a LayerPlan {
    type Item = &'a LayerDescriptor;
    type IntoIter = std::slice::Iter<'a, LayerDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customized() -> PlayerCustomization {
        PlayerCustomization {
            display_name: "Laika".to_string(),
            base_colour: ColourSpec::numeric(0x112233),
            tread_colour: ColourSpec::image("4"),
            turret_colour: ColourSpec::numeric(0xabcdef),
            back_accessory: Some("5".to_string()),
            tread_accessory: Some("6".to_string()),
            turret_accessory: None,
            front_accessory: Some("0".to_string()),
            barrel_accessory: Some("8".to_string()),
        }
    }

    #[test]
    fn test_plan_order() {
        let plan = LayerPlan::build(&customized(), RenderSize::Medium);
        let names: Vec<_> = plan.iter().map(|l| l.name).collect();
        assert_eq!(
            names,
            [
                "back-accessory",
                "left-tread",
                "left-tread-shade",
                "turret",
                "turret-shade",
                "barrel",
                "barrel-shade",
                "base",
                "base-shade",
                "right-tread",
                "right-tread-shade",
                "turret-accessory",
                "front-accessory",
                "barrel-accessory",
            ]
        );
        assert_eq!(plan.len(), LAYER_COUNT);
    }

    #[test]
    fn test_paints() {
        let custom = customized();
        let plan = LayerPlan::build(&custom, RenderSize::Small);
        let layers = plan.layers();

        assert_eq!(layers[1].paint.as_ref(), Some(&custom.tread_colour));
        assert!(layers[1].is_pattern_color());
        assert_eq!(layers[3].paint.as_ref(), Some(&custom.turret_colour));
        assert_eq!(layers[5].paint.as_ref(), Some(&custom.turret_colour));
        assert_eq!(layers[7].paint.as_ref(), Some(&custom.base_colour));
        assert_eq!(layers[9].paint.as_ref(), Some(&custom.tread_colour));

        for index in [0, 2, 4, 6, 8, 10, 11, 12, 13] {
            assert_eq!(layers[index].paint, None, "layer {index}");
            assert!(!layers[index].is_pattern_color());
        }

        let paint_count = layers.iter().filter(|l| l.kind == LayerKind::Paint).count();
        assert_eq!(paint_count, 5);
    }

    #[test]
    fn test_paths_use_size_resolution() {
        let plan = LayerPlan::build(&customized(), RenderSize::Large);
        assert_eq!(plan.layers()[0].asset_path, "assets/images/accessories/back$ID$-320.png");
        assert_eq!(plan.layers()[7].asset_path, "assets/images/tankIcon/base-320.png");
        assert_eq!(plan.layers()[10].asset_path, "assets/images/tankIcon/rightTreadShade-320.png");
        assert!(plan.iter().all(|l| l.asset_path.ends_with("-320.png")));
    }

    #[test]
    fn test_empty_accessories_skip_fetch() {
        let plan = LayerPlan::build(&customized(), RenderSize::Medium);
        let layers = plan.layers();

        assert_eq!(layers[0].accessory_id.as_deref(), Some("5"));
        assert!(layers[0].needs_fetch());
        assert_eq!(layers[11].accessory_id, None);
        assert!(!layers[11].needs_fetch());
        assert_eq!(layers[12].accessory_id, None);
        assert!(!layers[12].needs_fetch());
        assert!(layers[13].needs_fetch());
        assert!(layers[1..11].iter().all(LayerDescriptor::needs_fetch));
    }

    #[test]
    fn test_fallback_plan_fetches_no_accessories() {
        let plan = LayerPlan::build(&PlayerCustomization::fallback(), RenderSize::Medium);
        assert_eq!(plan.iter().filter(|l| l.needs_fetch()).count(), 10);
        assert!(plan
            .iter()
            .filter_map(|l| l.paint.as_ref())
            .all(|p| *p == ColourSpec::unavailable()));
    }
}
