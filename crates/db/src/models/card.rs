//! Card models and DTOs.
//!
//! Maps to the `cards` table. The six design columns are raw JSONB; typed
//! views live in `cardex_core::card_design`.

use cardex_core::card_design::{CardDesign, CardSnapshot};
use cardex_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `cards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Card {
    pub id: DbId,
    pub user_id: UserId,
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub slug: String,
    pub is_published: bool,
    pub theme: Value,
    pub carousel_settings: Value,
    pub product_images: Value,
    pub package_images: Value,
    pub testimony_images: Value,
    pub social_links: Value,
    pub design_version: i32,
    pub last_design_patch_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Card {
    /// The design columns of this card.
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

    /// Verbatim pre-patch state of this card.
    pub fn snapshot(&self) -> CardSnapshot {
        CardSnapshot::capture(&self.design(), self.design_version)
    }
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// DTO for inserting a new card. Missing design columns take the table defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCard {
    pub user_id: UserId,
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub slug: String,
    #[serde(default)]
    pub is_published: bool,
    pub theme: Option<Value>,
    pub carousel_settings: Option<Value>,
    pub product_images: Option<Value>,
    pub package_images: Option<Value>,
    pub testimony_images: Option<Value>,
    pub social_links: Option<Value>,
}

// ---------------------------------------------------------------------------
// Update DTO
// ---------------------------------------------------------------------------

/// Manual design edit. Applied only if the card is still at `expected_version`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCardDesign {
    pub expected_version: i32,
    pub theme: Option<Value>,
    pub carousel_settings: Option<Value>,
    pub product_images: Option<Value>,
    pub package_images: Option<Value>,
    pub testimony_images: Option<Value>,
    pub social_links: Option<Value>,
}

impl UpdateCardDesign {
    pub fn is_empty(&self) -> bool {
        self.theme.is_none()
            && self.carousel_settings.is_none()
            && self.product_images.is_none()
            && self.package_images.is_none()
            && self.testimony_images.is_none()
            && self.social_links.is_none()
    }
}
