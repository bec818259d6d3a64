//! Persisted shapes of a patch record's JSON columns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::card_design::CardSnapshot;
use crate::types::DbId;

/// Pre-patch snapshots keyed by card ID (`admin_patches.before_states`).
pub type BeforeStates = BTreeMap<DbId, CardSnapshot>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardError {
    pub card_id: DbId,
    pub message: String,
}

/// `admin_patches.results`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatchResults {
    pub success_ids: Vec<DbId>,
    pub failed_ids: Vec<DbId>,
    pub errors: Vec<CardError>,
}

impl PatchResults {
    pub fn record_success(&mut self, card_id: DbId) {
        self.success_ids.push(card_id);
    }

    pub fn record_failure(&mut self, card_id: DbId, message: impl Into<String>) {
        self.failed_ids.push(card_id);
        self.errors.push(CardError {
            card_id,
            message: message.into(),
        });
    }

    /// Human-readable outcome, e.g. `"2 succeeded, 1 failed"`.
    pub fn summary(&self) -> String {
        format!(
            "{} succeeded, {} failed",
            self.success_ids.len(),
            self.failed_ids.len()
        )
    }
}

/// `admin_patches.rollback_results`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RollbackResults {
    pub restored_ids: Vec<DbId>,
    /// Cards whose forward update had failed, so there is nothing to restore.
    pub skipped_ids: Vec<DbId>,
    pub failed_ids: Vec<DbId>,
    pub errors: Vec<CardError>,
}

impl RollbackResults {
    pub fn record_failure(&mut self, card_id: DbId, message: impl Into<String>) {
        self.failed_ids.push(card_id);
        self.errors.push(CardError {
            card_id,
            message: message.into(),
        });
    }

    pub fn is_complete(&self) -> bool {
        self.failed_ids.is_empty()
    }
}
