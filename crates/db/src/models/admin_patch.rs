//! Admin design patch models and DTOs.
//!
//! Maps to the `admin_patches` table, the audit trail of bulk design patches
//! and the only place rollback snapshots are kept.

use cardex_core::design_patch::{BeforeStates, PatchResults, PatchStatus, RollbackResults};
use cardex_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `admin_patches` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminPatch {
    pub id: DbId,
    pub admin_user_id: UserId,
    pub template_id: DbId,
    pub target_mode: String,
    pub target_card_ids: Vec<DbId>,
    pub patch_options: Value,
    pub results: Value,
    pub before_states: Value,
    pub cards_affected: i32,
    pub status: String,
    pub rollback_results: Option<Value>,
    pub completed_at: Option<Timestamp>,
    pub rolled_back_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AdminPatch {
    pub fn patch_status(&self) -> Result<PatchStatus, String> {
        PatchStatus::from_str_value(&self.status)
    }

    pub fn parsed_results(&self) -> Result<PatchResults, serde_json::Error> {
        serde_json::from_value(self.results.clone())
    }

    pub fn parsed_before_states(&self) -> Result<BeforeStates, serde_json::Error> {
        serde_json::from_value(self.before_states.clone())
    }

    pub fn parsed_rollback_results(&self) -> Result<Option<RollbackResults>, serde_json::Error> {
        self.rollback_results
            .clone()
            .map(serde_json::from_value)
            .transpose()
    }
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// DTO for opening a new patch record. `cards_affected` is derived from the
/// target list.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAdminPatch {
    pub admin_user_id: UserId,
    pub template_id: DbId,
    pub target_mode: String,
    pub target_card_ids: Vec<DbId>,
    pub patch_options: Value,
}
