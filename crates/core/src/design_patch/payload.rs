//! Patch payload builder.
//!
//! Maps `(template, card, options)` to the partial card update for one card.
//! Pure: no I/O, and the same inputs always give the same payload.

use serde::Serialize;
use serde_json::Value;
use serde_with::skip_serializing_none;

use super::options::{MergeMode, PatchOptionsState};
use crate::card_design::carousel::merge_images;
use crate::card_design::social::merge_social_links;
use crate::card_design::{
    parse_blob, CardDesign, CarouselImage, CarouselSection, DesignDataError, JsonObject,
    SocialLink, TemplateLayout, ThemeConfig,
};

/// Partial update for one card's design columns. `None` leaves a column as is.
///
/// `theme` and `carousel_settings` are the card's own raw objects with the
/// selected template fields written in.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatchPayload {
    pub theme: Option<JsonObject>,
    pub carousel_settings: Option<JsonObject>,
    pub product_images: Option<Vec<CarouselImage>>,
    pub package_images: Option<Vec<CarouselImage>>,
    pub testimony_images: Option<Vec<CarouselImage>>,
    pub social_links: Option<Vec<SocialLink>>,
}

/// Serialized column values of a [`PatchPayload`], ready to bind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesignColumnsUpdate {
    pub theme: Option<Value>,
    pub carousel_settings: Option<Value>,
    pub product_images: Option<Value>,
    pub package_images: Option<Value>,
    pub testimony_images: Option<Value>,
    pub social_links: Option<Value>,
}

impl PatchPayload {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn images_mut(&mut self, section: CarouselSection) -> &mut Option<Vec<CarouselImage>> {
        match section {
            CarouselSection::Products => &mut self.product_images,
            CarouselSection::Packages => &mut self.package_images,
            CarouselSection::Testimonies => &mut self.testimony_images,
        }
    }

    pub fn to_columns(&self) -> Result<DesignColumnsUpdate, serde_json::Error> {
        fn column<T: Serialize>(value: &Option<T>) -> Result<Option<Value>, serde_json::Error> {
            value.as_ref().map(serde_json::to_value).transpose()
        }
        Ok(DesignColumnsUpdate {
            theme: column(&self.theme)?,
            carousel_settings: column(&self.carousel_settings)?,
            product_images: column(&self.product_images)?,
            package_images: column(&self.package_images)?,
            testimony_images: column(&self.testimony_images)?,
            social_links: column(&self.social_links)?,
        })
    }
}

type ThemeStep = fn(&ThemeConfig, &mut JsonObject);

/// Build the partial update that applies `template` to `card` under `options`.
///
/// Theme categories share one accumulated `theme` object seeded from the
/// card's current theme, so several categories can write into it without
/// clobbering each other or the card's untouched fields. Carousel settings
/// work the same way. The card's `theme` and `carousel_settings` are only
/// required to be JSON objects; their contents are never validated.
///
/// Only the card columns a selected category needs are read; a malformed
/// column the options never touch does not cause an error.
pub fn build_patch_payload(
    template: &TemplateLayout,
    card: &CardDesign,
    options: &PatchOptionsState,
) -> Result<PatchPayload, DesignDataError> {
    let mut payload = PatchPayload::default();

    let theme_steps: [(bool, ThemeStep); 9] = [
        (options.theme, ThemeConfig::apply_palette),
        (options.fonts, ThemeConfig::apply_fonts),
        (options.button_styles, ThemeConfig::apply_button_styles),
        (options.layout_config, ThemeConfig::apply_layout),
        (options.qr_theme, ThemeConfig::apply_qr_theme),
        (options.qr_container, ThemeConfig::apply_qr_container),
        (options.social_link_styling, ThemeConfig::apply_social_link_styling),
        (options.section_headers, ThemeConfig::apply_section_headers),
        (options.section_visibility, ThemeConfig::apply_section_visibility),
    ];
    for (enabled, apply) in theme_steps {
        if enabled {
            let theme = accumulator(&mut payload.theme, "theme", &card.theme)?;
            apply(&template.theme, theme);
        }
    }

    for section in CarouselSection::ALL {
        let section_options = options.carousel(section);

        if section_options.settings {
            let settings = accumulator(
                &mut payload.carousel_settings,
                "carousel_settings",
                &card.carousel_settings,
            )?;
            template.carousel_settings.apply_section(section, settings);
        }

        let images = match section_options.images.effective_mode() {
            MergeMode::None => continue,
            MergeMode::Overwrite => template.images(section).to_vec(),
            MergeMode::Merge => {
                let existing: Vec<CarouselImage> =
                    parse_blob(section.images_column(), card.images(section))?;
                merge_images(&existing, template.images(section))
            }
        };
        *payload.images_mut(section) = Some(images);
    }

    match options.social_links_mode() {
        MergeMode::None => {}
        MergeMode::Overwrite => payload.social_links = Some(template.social_links.clone()),
        MergeMode::Merge => {
            let existing: Vec<SocialLink> = parse_blob("social_links", &card.social_links)?;
            payload.social_links = Some(merge_social_links(&existing, &template.social_links));
        }
    }

    Ok(payload)
}

/// Return the partial object in `slot`, seeding it from the card on first use.
fn accumulator<'a, T>(
    slot: &'a mut Option<T>,
    field: &'static str,
    current: &Value,
) -> Result<&'a mut T, DesignDataError>
where
    T: serde::de::DeserializeOwned + Default,
{
    let value = match slot.take() {
        Some(value) => value,
        None => parse_blob(field, current)?,
    };
    Ok(slot.insert(value))
}
