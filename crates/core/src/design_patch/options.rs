//! Patch options: which template categories a design patch applies, and how.
//!
//! The JSON shape is a contract with the admin UI (`PatchOptionsState`), so
//! the field names are fixed. A TypeScript definition is exported via `ts-rs`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::card_design::CarouselSection;

/// How template images / links combine with a card's existing ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum MergeMode {
    #[default]
    None,
    Merge,
    Overwrite,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct ImageOptions {
    pub apply: bool,
    pub mode: MergeMode,
}

impl ImageOptions {
    /// The mode that actually takes effect (`None` unless `apply` is set).
    pub fn effective_mode(&self) -> MergeMode {
        if self.apply {
            self.mode
        } else {
            MergeMode::None
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct CarouselSectionOptions {
    pub settings: bool,
    pub images: ImageOptions,
}

impl CarouselSectionOptions {
    fn is_selected(&self) -> bool {
        self.settings || self.images.effective_mode() != MergeMode::None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct PatchOptionsState {
    pub theme: bool,
    pub fonts: bool,
    pub button_styles: bool,
    pub layout_config: bool,
    pub qr_theme: bool,
    pub qr_container: bool,
    pub social_link_styling: bool,
    pub social_links_merge: bool,
    pub social_links_overwrite: bool,
    pub section_headers: bool,
    pub section_visibility: bool,
    pub carousel_products: CarouselSectionOptions,
    pub carousel_packages: CarouselSectionOptions,
    pub carousel_testimonies: CarouselSectionOptions,
}

impl PatchOptionsState {
    pub fn carousel(&self, section: CarouselSection) -> &CarouselSectionOptions {
        match section {
            CarouselSection::Products => &self.carousel_products,
            CarouselSection::Packages => &self.carousel_packages,
            CarouselSection::Testimonies => &self.carousel_testimonies,
        }
    }

    /// Social links policy. Overwrite wins when both flags are set.
    pub fn social_links_mode(&self) -> MergeMode {
        if self.social_links_overwrite {
            MergeMode::Overwrite
        } else if self.social_links_merge {
            MergeMode::Merge
        } else {
            MergeMode::None
        }
    }

    /// Whether at least one category would change a card.
    pub fn has_any_selection(&self) -> bool {
        self.theme
            || self.fonts
            || self.button_styles
            || self.layout_config
            || self.qr_theme
            || self.qr_container
            || self.social_link_styling
            || self.section_headers
            || self.section_visibility
            || self.social_links_mode() != MergeMode::None
            || CarouselSection::ALL
                .iter()
                .any(|section| self.carousel(*section).is_selected())
    }
}
