//! Carousel sections: per-section settings (the `carousel_settings` column)
//! and the image arrays (`product_images`, `package_images`,
//! `testimony_images`).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;

use super::{overlay_section, JsonObject, Measure, Overlay};

/// The three carousels a card can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarouselSection {
    Products,
    Packages,
    Testimonies,
}

impl CarouselSection {
    pub const ALL: [CarouselSection; 3] = [Self::Products, Self::Packages, Self::Testimonies];

    /// Name of the card column holding this section's images.
    pub fn images_column(self) -> &'static str {
        match self {
            Self::Products => "product_images",
            Self::Packages => "package_images",
            Self::Testimonies => "testimony_images",
        }
    }

    /// Key of this section inside `carousel_settings`.
    pub fn settings_key(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Packages => "packages",
            Self::Testimonies => "testimonies",
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarouselSectionSettings {
    pub autoplay: Option<bool>,
    /// Autoplay interval in milliseconds.
    pub interval: Option<Measure>,
    pub show_arrows: Option<bool>,
    pub show_dots: Option<bool>,
    #[serde(rename = "loop")]
    pub looping: Option<bool>,
    pub items_per_view: Option<Measure>,
    pub transition: Option<String>,
    pub aspect_ratio: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Overlay for CarouselSectionSettings {
    fn overlay_onto(&self, card: &mut JsonObject) {
        overlay_fields!(card, self;
            autoplay => "autoplay",
            interval => "interval",
            show_arrows => "showArrows",
            show_dots => "showDots",
            looping => "loop",
            items_per_view => "itemsPerView",
            transition => "transition",
            aspect_ratio => "aspectRatio",
        );
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselSettings {
    pub products: Option<CarouselSectionSettings>,
    pub packages: Option<CarouselSectionSettings>,
    pub testimonies: Option<CarouselSectionSettings>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CarouselSettings {
    pub fn section(&self, section: CarouselSection) -> &Option<CarouselSectionSettings> {
        match section {
            CarouselSection::Products => &self.products,
            CarouselSection::Packages => &self.packages,
            CarouselSection::Testimonies => &self.testimonies,
        }
    }

    /// `carousel*.settings` option: overlay one section of these template
    /// settings onto a card's raw `carousel_settings` object.
    pub fn apply_section(&self, section: CarouselSection, card: &mut JsonObject) {
        overlay_section(card, section.settings_key(), self.section(section));
    }
}

/// One image in a carousel. Identity for merging is the URL.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselImage {
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CarouselImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            caption: None,
            link: None,
            alt: None,
            extra: Map::new(),
        }
    }
}

/// Merge template images into a card's images.
///
/// Card images keep their order; template images whose URL is not already
/// present are appended in template order.
pub fn merge_images(existing: &[CarouselImage], template: &[CarouselImage]) -> Vec<CarouselImage> {
    let mut seen: HashSet<&str> = existing.iter().map(|image| image.url.as_str()).collect();
    let mut merged = existing.to_vec();
    for image in template {
        if seen.insert(image.url.as_str()) {
            merged.push(image.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn urls(images: &[CarouselImage]) -> Vec<&str> {
        images.iter().map(|i| i.url.as_str()).collect()
    }

    fn images(list: &[&str]) -> Vec<CarouselImage> {
        list.iter().map(|url| CarouselImage::new(*url)).collect()
    }

    #[test]
    fn merge_keeps_card_order_and_appends_new() {
        let merged = merge_images(&images(&["b", "c"]), &images(&["a", "b"]));
        assert_eq!(urls(&merged), vec!["b", "c", "a"]);
    }

    #[test]
    fn merge_is_idempotent() {
        let template = images(&["a", "b"]);
        let once = merge_images(&images(&["b", "c"]), &template);
        let twice = merge_images(&once, &template);
        assert_eq!(once, twice);
    }

    #[test]
    fn merge_skips_duplicates_inside_template() {
        let merged = merge_images(&[], &images(&["a", "a", "b"]));
        assert_eq!(urls(&merged), vec!["a", "b"]);
    }

    #[test]
    fn merge_keeps_card_version_of_shared_url() {
        let mut card = images(&["a"]);
        card[0].caption = Some("mine".into());
        let mut template = images(&["a"]);
        template[0].caption = Some("theirs".into());

        let merged = merge_images(&card, &template);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].caption.as_deref(), Some("mine"));
    }

    #[test]
    fn apply_section_only_touches_that_section() {
        let mut card: JsonObject = serde_json::from_value(json!({
            "products": { "autoplay": false, "interval": "3s" },
            "packages": { "showDots": true, "itemsPerView": null }
        }))
        .unwrap();
        let template: CarouselSettings = serde_json::from_value(json!({
            "products": { "autoplay": true, "interval": 4000 },
            "packages": { "showDots": false }
        }))
        .unwrap();

        template.apply_section(CarouselSection::Products, &mut card);

        assert_eq!(card["products"], json!({ "autoplay": true, "interval": 4000 }));
        assert_eq!(card["packages"], json!({ "showDots": true, "itemsPerView": null }));
    }

    #[test]
    fn apply_section_writes_loop_under_json_name() {
        let mut card = JsonObject::new();
        let template: CarouselSettings =
            serde_json::from_value(json!({ "testimonies": { "loop": false } })).unwrap();

        template.apply_section(CarouselSection::Testimonies, &mut card);

        assert_eq!(card["testimonies"], json!({ "loop": false }));
    }

    #[test]
    fn loop_field_uses_json_name() {
        let settings: CarouselSectionSettings =
            serde_json::from_value(json!({ "loop": true })).unwrap();
        assert_eq!(settings.looping, Some(true));
        assert_eq!(serde_json::to_value(&settings).unwrap(), json!({ "loop": true }));
    }
}
