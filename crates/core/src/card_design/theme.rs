//! The `theme` column: palette with A/B variants plus one struct per styling
//! category.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;

use super::{overlay_section, JsonObject, Measure, Overlay};

// ---------------------------------------------------------------------------
// Category structs
// ---------------------------------------------------------------------------

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemePalette {
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Overlay for ThemePalette {
    fn overlay_onto(&self, card: &mut JsonObject) {
        overlay_fields!(card, self;
            primary_color => "primaryColor",
            secondary_color => "secondaryColor",
            accent_color => "accentColor",
            background_color => "backgroundColor",
            text_color => "textColor",
        );
    }
}

/// Per-variant palettes for A/B testing a card's look.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeVariants {
    #[serde(rename = "A")]
    pub a: Option<ThemePalette>,
    #[serde(rename = "B")]
    pub b: Option<ThemePalette>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Overlay for ThemeVariants {
    fn overlay_onto(&self, card: &mut JsonObject) {
        overlay_section(card, "A", &self.a);
        overlay_section(card, "B", &self.b);
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontSettings {
    pub heading_font: Option<String>,
    pub body_font: Option<String>,
    pub heading_weight: Option<Measure>,
    pub font_scale: Option<Measure>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Overlay for FontSettings {
    fn overlay_onto(&self, card: &mut JsonObject) {
        overlay_fields!(card, self;
            heading_font => "headingFont",
            body_font => "bodyFont",
            heading_weight => "headingWeight",
            font_scale => "fontScale",
        );
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonStyles {
    pub shape: Option<String>,
    pub fill: Option<String>,
    pub color: Option<String>,
    pub text_color: Option<String>,
    pub radius: Option<Measure>,
    pub shadow: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Overlay for ButtonStyles {
    fn overlay_onto(&self, card: &mut JsonObject) {
        overlay_fields!(card, self;
            shape => "shape",
            fill => "fill",
            color => "color",
            text_color => "textColor",
            radius => "radius",
            shadow => "shadow",
        );
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub template: Option<String>,
    pub header_alignment: Option<String>,
    pub avatar_shape: Option<String>,
    pub spacing: Option<String>,
    pub section_order: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Overlay for LayoutConfig {
    fn overlay_onto(&self, card: &mut JsonObject) {
        overlay_fields!(card, self;
            template => "template",
            header_alignment => "headerAlignment",
            avatar_shape => "avatarShape",
            spacing => "spacing",
            section_order => "sectionOrder",
        );
    }
}

/// QR code styling. `data` and `url` are bound to one specific card (its deep
/// link) and are never taken from a template.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QrSettings {
    pub data: Option<String>,
    pub url: Option<String>,
    pub logo_url: Option<String>,
    pub fg_color: Option<String>,
    pub bg_color: Option<String>,
    pub dot_style: Option<String>,
    pub corner_style: Option<String>,
    pub size: Option<Measure>,
    pub error_correction: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QrSettings {
    /// Drop the card-bound payload fields.
    pub fn clear_card_binding(&mut self) {
        self.data = None;
        self.url = None;
    }
}

impl Overlay for QrSettings {
    fn overlay_onto(&self, card: &mut JsonObject) {
        overlay_fields!(card, self;
            logo_url => "logoUrl",
            fg_color => "fgColor",
            bg_color => "bgColor",
            dot_style => "dotStyle",
            corner_style => "cornerStyle",
            size => "size",
            error_correction => "errorCorrection",
        );
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QrContainer {
    pub background_color: Option<String>,
    pub border_color: Option<String>,
    pub border_radius: Option<Measure>,
    pub padding: Option<Measure>,
    pub show_label: Option<bool>,
    pub label_text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Overlay for QrContainer {
    fn overlay_onto(&self, card: &mut JsonObject) {
        overlay_fields!(card, self;
            background_color => "backgroundColor",
            border_color => "borderColor",
            border_radius => "borderRadius",
            padding => "padding",
            show_label => "showLabel",
            label_text => "labelText",
        );
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLinkStyling {
    pub icon_style: Option<String>,
    pub icon_color: Option<String>,
    pub icon_size: Option<Measure>,
    pub show_labels: Option<bool>,
    pub arrangement: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Overlay for SocialLinkStyling {
    fn overlay_onto(&self, card: &mut JsonObject) {
        overlay_fields!(card, self;
            icon_style => "iconStyle",
            icon_color => "iconColor",
            icon_size => "iconSize",
            show_labels => "showLabels",
            arrangement => "arrangement",
        );
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionHeaders {
    pub products: Option<String>,
    pub packages: Option<String>,
    pub testimonies: Option<String>,
    pub social_links: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Overlay for SectionHeaders {
    fn overlay_onto(&self, card: &mut JsonObject) {
        overlay_fields!(card, self;
            products => "products",
            packages => "packages",
            testimonies => "testimonies",
            social_links => "socialLinks",
        );
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionVisibility {
    pub products: Option<bool>,
    pub packages: Option<bool>,
    pub testimonies: Option<bool>,
    pub social_links: Option<bool>,
    pub qr_code: Option<bool>,
    pub contact: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Overlay for SectionVisibility {
    fn overlay_onto(&self, card: &mut JsonObject) {
        overlay_fields!(card, self;
            products => "products",
            packages => "packages",
            testimonies => "testimonies",
            social_links => "socialLinks",
            qr_code => "qrCode",
            contact => "contact",
        );
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeConfig {
    pub variant: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub background_image: Option<String>,
    pub variants: Option<ThemeVariants>,
    pub fonts: Option<FontSettings>,
    pub buttons: Option<ButtonStyles>,
    pub layout: Option<LayoutConfig>,
    pub qr_settings: Option<QrSettings>,
    pub qr_container: Option<QrContainer>,
    pub social_link_styling: Option<SocialLinkStyling>,
    pub section_headers: Option<SectionHeaders>,
    pub section_visibility: Option<SectionVisibility>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Each `apply_*` writes one option's fields from this template theme onto a
/// card's raw `theme` object.
impl ThemeConfig {
    /// `theme` option: palette colours, background and A/B variants.
    pub fn apply_palette(&self, card: &mut JsonObject) {
        overlay_fields!(card, self;
            variant => "variant",
            primary_color => "primaryColor",
            secondary_color => "secondaryColor",
            accent_color => "accentColor",
            background_color => "backgroundColor",
            text_color => "textColor",
            background_image => "backgroundImage",
        );
        overlay_section(card, "variants", &self.variants);
    }

    /// `fonts` option.
    pub fn apply_fonts(&self, card: &mut JsonObject) {
        overlay_section(card, "fonts", &self.fonts);
    }

    /// `buttonStyles` option.
    pub fn apply_button_styles(&self, card: &mut JsonObject) {
        overlay_section(card, "buttons", &self.buttons);
    }

    /// `layoutConfig` option.
    pub fn apply_layout(&self, card: &mut JsonObject) {
        overlay_section(card, "layout", &self.layout);
    }

    /// `qrTheme` option. The card's own QR `data` / `url` always survive.
    pub fn apply_qr_theme(&self, card: &mut JsonObject) {
        overlay_section(card, "qrSettings", &self.qr_settings);
    }

    /// `qrContainer` option.
    pub fn apply_qr_container(&self, card: &mut JsonObject) {
        overlay_section(card, "qrContainer", &self.qr_container);
    }

    /// `socialLinkStyling` option.
    pub fn apply_social_link_styling(&self, card: &mut JsonObject) {
        overlay_section(card, "socialLinkStyling", &self.social_link_styling);
    }

    /// `sectionHeaders` option.
    pub fn apply_section_headers(&self, card: &mut JsonObject) {
        overlay_section(card, "sectionHeaders", &self.section_headers);
    }

    /// `sectionVisibility` option.
    pub fn apply_section_visibility(&self, card: &mut JsonObject) {
        overlay_section(card, "sectionVisibility", &self.section_visibility);
    }
}
