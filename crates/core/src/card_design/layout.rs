//! The template `layout_data` bundle.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{
    parse_blob, CardDesign, CarouselImage, CarouselSection, CarouselSettings, DesignDataError,
    SocialLink, ThemeConfig,
};

/// Everything a template can stamp onto a card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateLayout {
    pub theme: ThemeConfig,
    pub carousel_settings: CarouselSettings,
    pub product_images: Vec<CarouselImage>,
    pub package_images: Vec<CarouselImage>,
    pub testimony_images: Vec<CarouselImage>,
    pub social_links: Vec<SocialLink>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TemplateLayout {
    pub fn images(&self, section: CarouselSection) -> &[CarouselImage] {
        match section {
            CarouselSection::Products => &self.product_images,
            CarouselSection::Packages => &self.package_images,
            CarouselSection::Testimonies => &self.testimony_images,
        }
    }

    /// Build a layout from an existing card ("save as template").
    ///
    /// The card's QR `data` / `url` are dropped: they are the card's own deep
    /// link and must not travel to other cards.
    pub fn from_card(design: &CardDesign) -> Result<Self, DesignDataError> {
        let mut theme: ThemeConfig = parse_blob("theme", &design.theme)?;
        if let Some(qr) = theme.qr_settings.as_mut() {
            qr.clear_card_binding();
        }
        Ok(Self {
            theme,
            carousel_settings: parse_blob("carousel_settings", &design.carousel_settings)?,
            product_images: parse_blob("product_images", &design.product_images)?,
            package_images: parse_blob("package_images", &design.package_images)?,
            testimony_images: parse_blob("testimony_images", &design.testimony_images)?,
            social_links: parse_blob("social_links", &design.social_links)?,
            extra: Map::new(),
        })
    }

    /// Parse a stored `layout_data` value.
    pub fn from_value(value: &Value) -> Result<Self, DesignDataError> {
        parse_blob("layout_data", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_card_strips_qr_binding() {
        let design = CardDesign {
            theme: json!({ "qrSettings": { "data": "https://x/c1", "url": "https://x/c1", "fgColor": "#000" } }),
            product_images: json!([{ "url": "a" }]),
            ..CardDesign::default()
        };

        let layout = TemplateLayout::from_card(&design).unwrap();

        let qr = layout.theme.qr_settings.unwrap();
        assert!(qr.data.is_none());
        assert!(qr.url.is_none());
        assert_eq!(qr.fg_color.as_deref(), Some("#000"));
        assert_eq!(layout.product_images.len(), 1);
        assert!(layout.social_links.is_empty());
    }

    #[test]
    fn layout_data_uses_camel_case_keys() {
        let layout = TemplateLayout::from_value(&json!({
            "productImages": [{ "url": "a" }],
            "socialLinks": [{ "kind": "email", "url": "mailto:x@y.z" }]
        }))
        .unwrap();
        assert_eq!(layout.images(CarouselSection::Products).len(), 1);
        assert_eq!(layout.social_links[0].kind, "email");
    }
}
