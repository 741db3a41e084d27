//! Player customization data.
//!
//! [`PlayerDetails`] mirrors the record returned by the player service.
//! [`PlayerCustomization`] is the narrowed, validated view the renderer
//! works from: three paints, the accessory slots and a display name.

use crate::color::Color;
use crate::error::{TankError, TankResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Accessory id meaning "nothing equipped".
pub const NO_ACCESSORY: &str = "0";

/// Display name used when the player could not be resolved.
pub const UNAVAILABLE_NAME: &str = "Unavailable";

/// Wire tag of a colour record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColourType {
    Numeric,
    Image,
}

/// Colour as sent by the player service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColourRecord {
    #[serde(rename = "type")]
    pub kind: ColourType,
    #[serde(default)]
    pub numeric_value: String,
    #[serde(default)]
    pub image_value: String,
    #[serde(default)]
    pub raw_value: String,
}

impl ColourRecord {
    pub fn numeric(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            kind: ColourType::Numeric,
            numeric_value: value.clone(),
            image_value: String::new(),
            raw_value: value,
        }
    }

    pub fn image(pattern_id: impl Into<String>) -> Self {
        let pattern_id = pattern_id.into();
        Self {
            kind: ColourType::Image,
            numeric_value: String::new(),
            image_value: pattern_id.clone(),
            raw_value: pattern_id,
        }
    }
}

/// Paint applied to a tank part.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColourSpec {
    /// Flat 24-bit colour.
    Numeric(Color),
    /// Patterned colour image, addressed by pattern id.
    Image { pattern_id: String },
}

impl ColourSpec {
    /// Flat colour from a packed `0xRRGGBB` value.
    pub fn numeric(value: u32) -> Self {
        ColourSpec::Numeric(Color::from_rgb_u32(value & 0x00ff_ffff))
    }

    pub fn image(pattern_id: impl Into<String>) -> Self {
        ColourSpec::Image {
            pattern_id: pattern_id.into(),
        }
    }

    /// The neutral gray used for unresolved players.
    pub fn unavailable() -> Self {
        ColourSpec::Numeric(Color::UNAVAILABLE_GRAY)
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, ColourSpec::Image { .. })
    }
}

impl TryFrom<&ColourRecord> for ColourSpec {
    type Error = TankError;

    fn try_from(record: &ColourRecord) -> TankResult<Self> {
        match record.kind {
            ColourType::Numeric => Color::from_numeric(&record.numeric_value)
                .map(ColourSpec::Numeric)
                .ok_or_else(|| {
                    TankError::decode(format!("invalid numeric colour '{}'", record.numeric_value))
                }),
            ColourType::Image => {
                let id = record.image_value.trim();
                if id.is_empty() {
                    return Err(TankError::decode("image colour without a pattern id"));
                }
                Ok(ColourSpec::image(id))
            }
        }
    }
}

impl fmt::Display for ColourSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColourSpec::Numeric(color) => write!(f, "0x{:06x}", color.to_rgb_u32()),
            ColourSpec::Image { pattern_id } => write!(f, "pattern {pattern_id}"),
        }
    }
}

/// Accessory slot on the tank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessorySlot {
    Back,
    Tread,
    Turret,
    Front,
    Barrel,
}

impl AccessorySlot {
    /// Prefix of the slot's sprite file names.
    pub const fn asset_prefix(self) -> &'static str {
        match self {
            AccessorySlot::Back => "back",
            AccessorySlot::Tread => "tread",
            AccessorySlot::Turret => "turret",
            AccessorySlot::Front => "front",
            AccessorySlot::Barrel => "barrel",
        }
    }
}

/// Player record returned by the player service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerDetails {
    pub username: String,
    #[serde(deserialize_with = "string_or_number")]
    pub player_id: String,

    pub kills: u64,
    pub victories: u64,
    pub deaths: u64,
    pub suicides: u64,
    pub surrenders: u64,

    pub created: u64,
    pub last_login: u64,
    pub last_forum_post: u64,

    pub rank: f64,
    pub experience: f64,
    pub xp: f64,

    pub base_colour: Option<ColourRecord>,
    pub tread_colour: Option<ColourRecord>,
    pub turret_colour: Option<ColourRecord>,

    #[serde(deserialize_with = "optional_string_or_number")]
    pub turret_accessory: Option<String>,
    #[serde(deserialize_with = "optional_string_or_number")]
    pub tread_accessory: Option<String>,
    #[serde(deserialize_with = "optional_string_or_number")]
    pub front_accessory: Option<String>,
    #[serde(deserialize_with = "optional_string_or_number")]
    pub barrel_accessory: Option<String>,
    #[serde(deserialize_with = "optional_string_or_number")]
    pub back_accessory: Option<String>,
    #[serde(deserialize_with = "optional_string_or_number")]
    pub background_accessory: Option<String>,
    #[serde(deserialize_with = "optional_string_or_number")]
    pub badge: Option<String>,

    pub verified: bool,
    pub username_approved: bool,
    pub banned: bool,
    pub guest: bool,
    pub beta: bool,
    pub news_subscriber: bool,
    pub premium: bool,

    pub country: Option<String>,
    pub gm_level: Option<u8>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::Text(s) => s,
            StringOrNumber::Unsigned(n) => n.to_string(),
            StringOrNumber::Signed(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}

/// Everything the renderer needs to know about one player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerCustomization {
    pub display_name: String,
    pub base_colour: ColourSpec,
    pub tread_colour: ColourSpec,
    pub turret_colour: ColourSpec,
    pub back_accessory: Option<String>,
    pub tread_accessory: Option<String>,
    pub turret_accessory: Option<String>,
    pub front_accessory: Option<String>,
    pub barrel_accessory: Option<String>,
}

impl PlayerCustomization {
    /// Neutral gray tank with nothing equipped.
    pub fn fallback() -> Self {
        Self {
            display_name: UNAVAILABLE_NAME.to_string(),
            base_colour: ColourSpec::unavailable(),
            tread_colour: ColourSpec::unavailable(),
            turret_colour: ColourSpec::unavailable(),
            back_accessory: Some(NO_ACCESSORY.to_string()),
            tread_accessory: Some(NO_ACCESSORY.to_string()),
            turret_accessory: Some(NO_ACCESSORY.to_string()),
            front_accessory: Some(NO_ACCESSORY.to_string()),
            barrel_accessory: Some(NO_ACCESSORY.to_string()),
        }
    }

    /// Narrow a service record. Unusable paints fall back to gray per part.
    pub fn from_details(details: &PlayerDetails) -> Self {
        let paint = |part: &str, record: Option<&ColourRecord>| match record {
            Some(record) => ColourSpec::try_from(record).unwrap_or_else(|err| {
                tracing::warn!(player = %details.player_id, part, %err, "unusable paint, using gray");
                ColourSpec::unavailable()
            }),
            None => {
                tracing::warn!(player = %details.player_id, part, "missing paint, using gray");
                ColourSpec::unavailable()
            }
        };

        Self {
            display_name: details.username.clone(),
            base_colour: paint("base", details.base_colour.as_ref()),
            tread_colour: paint("tread", details.tread_colour.as_ref()),
            turret_colour: paint("turret", details.turret_colour.as_ref()),
            back_accessory: details.back_accessory.clone(),
            tread_accessory: details.tread_accessory.clone(),
            turret_accessory: details.turret_accessory.clone(),
            front_accessory: details.front_accessory.clone(),
            barrel_accessory: details.barrel_accessory.clone(),
        }
    }

    /// The barrel is always painted like the turret.
    pub fn barrel_colour(&self) -> &ColourSpec {
        &self.turret_colour
    }

    /// Equipped accessory in `slot`, `None` when the slot is empty.
    pub fn accessory(&self, slot: AccessorySlot) -> Option<&str> {
        let id = match slot {
            AccessorySlot::Back => &self.back_accessory,
            AccessorySlot::Tread => &self.tread_accessory,
            AccessorySlot::Turret => &self.turret_accessory,
            AccessorySlot::Front => &self.front_accessory,
            AccessorySlot::Barrel => &self.barrel_accessory,
        };

        id.as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty() && *id != NO_ACCESSORY)
    }
}

impl From<&PlayerDetails> for PlayerCustomization {
    fn from(details: &PlayerDetails) -> Self {
        Self::from_details(details)
    }
}
