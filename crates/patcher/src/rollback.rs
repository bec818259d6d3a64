//! Rollback of a completed design patch.
//!
//! Restores are sequential and isolated: each card is restored on its own
//! and a failure is recorded without stopping the rest. The patch becomes
//! `rolled_back` only when every restorable card is restored; otherwise it
//! stays `completed` and the rollback can be retried.

use std::collections::HashSet;

use cardex_core::card_design::CardSnapshot;
use cardex_core::design_patch::{PatchStatus, RollbackResults};
use cardex_core::types::DbId;
use serde::Serialize;

use crate::error::PatchError;
use crate::store::{PatchStore, PatchStoreError};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackOutcome {
    pub patch_id: DbId,
    pub status: PatchStatus,
    #[serde(flatten)]
    pub results: RollbackResults,
}

pub async fn rollback_patch<S: PatchStore>(
    store: &S,
    patch_id: DbId,
) -> Result<RollbackOutcome, PatchError> {
    let record = store
        .load_patch_record(patch_id)
        .await?
        .ok_or(PatchError::NotFound(patch_id))?;
    if !record.status.can_transition_to(PatchStatus::RolledBack) {
        return Err(PatchError::InvalidState {
            patch_id,
            status: record.status,
        });
    }

    let never_patched: HashSet<DbId> = record.results.failed_ids.iter().copied().collect();
    let mut results = RollbackResults::default();

    for (card_id, snapshot) in &record.before_states {
        if never_patched.contains(card_id) {
            results.skipped_ids.push(*card_id);
            continue;
        }
        match restore_one(store, *card_id, patch_id, snapshot).await {
            Ok(()) => results.restored_ids.push(*card_id),
            Err(err) => {
                tracing::warn!(
                    patch_id = %patch_id,
                    card_id = %card_id,
                    error = %err,
                    "Card restore failed"
                );
                results.record_failure(*card_id, err.to_string());
            }
        }
    }

    let status = if results.is_complete() {
        store.complete_rollback(patch_id, &results).await?;
        PatchStatus::RolledBack
    } else {
        store.record_rollback_attempt(patch_id, &results).await?;
        PatchStatus::Completed
    };

    tracing::info!(
        patch_id = %patch_id,
        status = status.as_str(),
        restored = results.restored_ids.len(),
        skipped = results.skipped_ids.len(),
        failed = results.failed_ids.len(),
        "Design patch rollback finished"
    );

    Ok(RollbackOutcome {
        patch_id,
        status,
        results,
    })
}

/// Restore one card. A guard mismatch on a card that already equals its
/// snapshot counts as restored, which makes a retried rollback converge.
async fn restore_one<S: PatchStore>(
    store: &S,
    card_id: DbId,
    patch_id: DbId,
    snapshot: &CardSnapshot,
) -> Result<(), PatchStoreError> {
    match store.restore_card(card_id, patch_id, snapshot).await {
        Err(PatchStoreError::Conflict(_)) => match store.load_card(card_id).await? {
            Some(card) if card.matches_snapshot(snapshot) => Ok(()),
            Some(_) => Err(PatchStoreError::Conflict(card_id)),
            None => Err(PatchStoreError::NotFound {
                entity: "Card",
                id: card_id,
            }),
        },
        other => other,
    }
}
