//! CDN asset naming.

use common::{RenderSize, TankResult, NO_ACCESSORY};
use url::Url;

/// Default CDN hosting the tank sprites.
pub const DEFAULT_CDN_URL: &str = "https://cdn.tanktrouble.com/";

/// Placeholder replaced by the accessory id in sprite paths.
pub const ID_TOKEN: &str = "$ID$";

/// Resolves sprite and colour paths against a CDN base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetPaths {
    base: Url,
}

impl AssetPaths {
    /// Create from a base URL. A missing trailing slash is added so that
    /// relative paths join below the base rather than replacing its last
    /// segment.
    pub fn new(mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { base }
    }

    pub fn parse(base: &str) -> TankResult<Self> {
        Ok(Self::new(Url::parse(base)?))
    }

    /// Path of an accessory sprite, with the id token left in place.
    pub fn accessory_template(prefix: &str, size: RenderSize) -> String {
        format!(
            "assets/images/accessories/{prefix}{ID_TOKEN}-{}.png",
            size.resolution()
        )
    }

    /// Path of a tank part sprite.
    pub fn part_path(part: &str, size: RenderSize) -> String {
        format!("assets/images/tankIcon/{part}-{}.png", size.resolution())
    }

    /// Path of a colour pattern image.
    pub fn colour_path(pattern_id: &str, size: RenderSize) -> String {
        format!(
            "assets/images/colours/colour{pattern_id}-{}.png",
            size.resolution()
        )
    }

    /// Absolute URL of a sprite path, substituting `accessory_id` for the
    /// id token (`"0"` when absent).
    pub fn sprite_url(&self, template: &str, accessory_id: Option<&str>) -> TankResult<Url> {
        let path = template.replace(ID_TOKEN, accessory_id.unwrap_or(NO_ACCESSORY));
        Ok(self.base.join(&path)?)
    }

    /// Absolute URL of a colour pattern image.
    pub fn colour_url(&self, pattern_id: &str, size: RenderSize) -> TankResult<Url> {
        Ok(self.base.join(&Self::colour_path(pattern_id, size))?)
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self::new(Url::parse(DEFAULT_CDN_URL).expect("default CDN URL is valid"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates() {
        assert_eq!(
            AssetPaths::accessory_template("back", RenderSize::Large),
            "assets/images/accessories/back$ID$-320.png"
        );
        assert_eq!(
            AssetPaths::part_path("leftTreadShade", RenderSize::Small),
            "assets/images/tankIcon/leftTreadShade-140.png"
        );
        assert_eq!(
            AssetPaths::colour_path("12", RenderSize::Medium),
            "assets/images/colours/colour12-200.png"
        );
    }

    #[test]
    fn test_sprite_url_substitutes_id() {
        let paths = AssetPaths::default();
        let template = AssetPaths::accessory_template("turret", RenderSize::Medium);

        assert_eq!(
            paths.sprite_url(&template, Some("17")).unwrap().as_str(),
            "https://cdn.tanktrouble.com/assets/images/accessories/turret17-200.png"
        );
        assert_eq!(
            paths.sprite_url(&template, None).unwrap().as_str(),
            "https://cdn.tanktrouble.com/assets/images/accessories/turret0-200.png"
        );
    }

    #[test]
    fn test_base_without_trailing_slash() {
        let paths = AssetPaths::parse("http://localhost:8080/mirror").unwrap();
        assert_eq!(
            paths.colour_url("3", RenderSize::Large).unwrap().as_str(),
            "http://localhost:8080/mirror/assets/images/colours/colour3-320.png"
        );
    }
}
