//! Card template models and DTOs.

use cardex_core::card_design::{DesignDataError, TemplateLayout};
use cardex_core::template::TemplateScope;
use cardex_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// A row from the `card_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CardTemplate {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: UserId,
    pub scope: String,
    pub team_id: Option<DbId>,
    pub layout_data: Value,
    pub source_card_id: Option<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CardTemplate {
    /// Typed view of `layout_data`.
    pub fn layout(&self) -> Result<TemplateLayout, DesignDataError> {
        TemplateLayout::from_value(&self.layout_data)
    }
}

/// DTO for inserting a new template.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCardTemplate {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: UserId,
    pub scope: TemplateScope,
    pub team_id: Option<DbId>,
    pub layout_data: Value,
    pub source_card_id: Option<DbId>,
}
