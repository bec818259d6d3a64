//! Typed views over a card's design JSON columns.
//!
//! Cards persist their design as opaque JSONB blobs (`theme`,
//! `carousel_settings`, three image arrays, `social_links`). This module gives
//! each blob an explicit struct, one nested struct per content category, and an
//! explicit overlay function per category so the fields a patch category may
//! write are fixed at compile time.
//!
//! Templates are parsed into these structs. A card's `theme` and
//! `carousel_settings` are not: overlays write the template's fields straight
//! into the card's raw JSON object, so keys a category does not name (odd
//! types and explicit `null`s included) are kept exactly as stored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A raw JSON object, as a card's `theme` / `carousel_settings` is stored.
pub type JsonObject = Map<String, Value>;

/// Write each listed `Option` field of the template section `$from` into the
/// card's raw object `$into` under its JSON key, when it is `Some`.
///
/// Fields absent from the template leave the card's key untouched.
macro_rules! overlay_fields {
    ($into:expr, $from:expr; $($field:ident => $key:literal),+ $(,)?) => {
        $(
            $crate::card_design::put_field($into, $key, &$from.$field);
        )+
    };
}

pub mod carousel;
pub mod layout;
pub mod social;
pub mod theme;

pub use carousel::{CarouselImage, CarouselSection, CarouselSectionSettings, CarouselSettings};
pub use layout::TemplateLayout;
pub use social::SocialLink;
pub use theme::ThemeConfig;

/// A template section that can write its own fields onto a card.
pub trait Overlay {
    /// Write the fields this category owns onto the card's raw object for it.
    fn overlay_onto(&self, card: &mut JsonObject);
}

pub(crate) fn put_field<T: Serialize>(into: &mut JsonObject, key: &str, value: &Option<T>) {
    if let Some(value) = value {
        if let Ok(value) = serde_json::to_value(value) {
            into.insert(key.to_string(), value);
        }
    }
}

/// Overlay an optional template section onto `card[key]`. The card's object
/// is created if missing, or replaced if it is not an object.
pub(crate) fn overlay_section<T: Overlay>(card: &mut JsonObject, key: &str, from: &Option<T>) {
    if let Some(from) = from {
        let mut section = match card.remove(key) {
            Some(Value::Object(section)) => section,
            _ => Map::new(),
        };
        from.overlay_onto(&mut section);
        card.insert(key.to_string(), Value::Object(section));
    }
}

/// A size, weight or duration that clients write either as a number or as
/// CSS text (`24`, `"8px"`, `"bold"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Measure {
    Number(Number),
    Text(String),
}

impl From<u32> for Measure {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A card design column could not be parsed into its typed form.
#[derive(Debug, thiserror::Error)]
#[error("Invalid {field} data: {source}")]
pub struct DesignDataError {
    pub field: &'static str,
    #[source]
    pub source: serde_json::Error,
}

/// Parse a design column. JSON `null` is treated as the empty value.
pub fn parse_blob<T>(field: &'static str, value: &Value) -> Result<T, DesignDataError>
where
    T: DeserializeOwned + Default,
{
    if value.is_null() {
        return Ok(T::default());
    }
    T::deserialize(value).map_err(|source| DesignDataError { field, source })
}

// ---------------------------------------------------------------------------
// Raw columns
// ---------------------------------------------------------------------------

/// The six design columns of a card, exactly as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardDesign {
    pub theme: Value,
    pub carousel_settings: Value,
    pub product_images: Value,
    pub package_images: Value,
    pub testimony_images: Value,
    pub social_links: Value,
}

impl CardDesign {
    /// The raw image array column for a carousel section.
    pub fn images(&self, section: CarouselSection) -> &Value {
        match section {
            CarouselSection::Products => &self.product_images,
            CarouselSection::Packages => &self.package_images,
            CarouselSection::Testimonies => &self.testimony_images,
        }
    }
}

/// Pre-patch state of one card, kept verbatim for rollback.
///
/// Serialized into `admin_patches.before_states` keyed by card ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSnapshot {
    pub theme: Value,
    pub carousel_settings: Value,
    pub product_images: Value,
    pub package_images: Value,
    pub testimony_images: Value,
    pub social_links: Value,
    pub design_version: i32,
}

impl CardSnapshot {
    pub fn capture(design: &CardDesign, design_version: i32) -> Self {
        Self {
            theme: design.theme.clone(),
            carousel_settings: design.carousel_settings.clone(),
            product_images: design.product_images.clone(),
            package_images: design.package_images.clone(),
            testimony_images: design.testimony_images.clone(),
            social_links: design.social_links.clone(),
            design_version,
        }
    }

    /// The design columns this snapshot restores.
    pub fn design(&self) -> CardDesign {
        CardDesign {
            theme: self.theme.clone(),
            carousel_settings: self.carousel_settings.clone(),
            product_images: self.product_images.clone(),
            package_images: self.package_images.clone(),
            testimony_images: self.testimony_images.clone(),
            social_links: self.social_links.clone(),
        }
    }
}
