//! Patch executor.
//!
//! Opens an audit record, applies the payload to every target card in
//! sequential batches with concurrent updates inside each batch, and closes
//! the record with per-card results and the pre-patch snapshots.

use cardex_core::card_design::{DesignDataError, TemplateLayout};
use cardex_core::design_patch::{
    build_patch_payload, validate_batch_size, validate_target_ids, BeforeStates,
    PatchOptionsState, PatchResults, PatchStatus, TargetMode,
};
use cardex_core::types::{DbId, UserId};
use futures::future::join_all;
use serde::Serialize;

use crate::error::PatchError;
use crate::store::{CardRecord, NewPatchRecord, PatchStore, PatchStoreError};

/// Everything needed to run one patch.
#[derive(Debug, Clone)]
pub struct PatchRequest {
    pub template_id: DbId,
    pub template: TemplateLayout,
    /// Target cards as read just before the run. Their versions are the
    /// compare-and-swap baseline.
    pub cards: Vec<CardRecord>,
    pub options: PatchOptionsState,
    pub target_mode: TargetMode,
    pub admin_user_id: UserId,
    pub batch_size: usize,
}

/// Reported once per settled batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchProgress {
    /// Cards processed so far, including this batch.
    pub current: usize,
    pub total: usize,
    /// 1-based index of the batch that just settled.
    pub batch: usize,
    pub batch_count: usize,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchOutcome {
    pub patch_id: DbId,
    pub status: PatchStatus,
    #[serde(flatten)]
    pub results: PatchResults,
}

#[derive(Debug, thiserror::Error)]
enum CardFailure {
    #[error(transparent)]
    Design(#[from] DesignDataError),
    #[error("Could not encode payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] PatchStoreError),
}

/// Run a design patch.
///
/// Per-card failures are recorded and never stop the run. The record ends
/// `failed` only if no card succeeded. A fatal store error stops after the
/// current batch settles, marks the record `failed` and returns
/// [`PatchError::Aborted`]. If the closing record update fails, the record
/// is marked `failed` with the results and snapshots it has, and
/// [`PatchError::Finalize`] is returned.
pub async fn execute_patch<S, F>(
    store: &S,
    request: PatchRequest,
    mut on_progress: F,
) -> Result<PatchOutcome, PatchError>
where
    S: PatchStore,
    F: FnMut(&PatchProgress) + Send,
{
    let target_ids: Vec<DbId> = request.cards.iter().map(|card| card.id).collect();
    validate_target_ids(&target_ids).map_err(|e| PatchError::InvalidRequest(e.to_string()))?;
    validate_batch_size(request.batch_size)
        .map_err(|e| PatchError::InvalidRequest(e.to_string()))?;

    let patch_id = store
        .create_patch_record(&NewPatchRecord {
            admin_user_id: request.admin_user_id,
            template_id: request.template_id,
            target_mode: request.target_mode,
            target_card_ids: target_ids,
            options: request.options.clone(),
        })
        .await
        .map_err(PatchError::AuditRecord)?;

    let total = request.cards.len();
    let batch_count = total.div_ceil(request.batch_size);
    tracing::info!(
        patch_id = %patch_id,
        template_id = %request.template_id,
        total,
        batch_count,
        "Design patch started"
    );

    let mut results = PatchResults::default();
    let mut before_states = BeforeStates::new();
    let mut fatal: Option<PatchStoreError> = None;
    let mut current = 0;

    for (index, batch) in request.cards.chunks(request.batch_size).enumerate() {
        for card in batch {
            before_states.insert(card.id, card.snapshot());
        }

        let outcomes = join_all(
            batch
                .iter()
                .map(|card| patch_card(store, &request.template, &request.options, patch_id, card)),
        )
        .await;

        for (card, outcome) in batch.iter().zip(outcomes) {
            match outcome {
                Ok(()) => results.record_success(card.id),
                Err(err) => {
                    tracing::warn!(
                        patch_id = %patch_id,
                        card_id = %card.id,
                        error = %err,
                        "Card patch failed"
                    );
                    results.record_failure(card.id, err.to_string());
                    if let CardFailure::Store(store_err) = err {
                        if store_err.is_fatal() && fatal.is_none() {
                            fatal = Some(store_err);
                        }
                    }
                }
            }
        }

        current += batch.len();
        let progress = PatchProgress {
            current,
            total,
            batch: index + 1,
            batch_count,
            status: format!(
                "Batch {}/{batch_count}: {current} of {total} cards processed",
                index + 1
            ),
        };
        tracing::debug!(patch_id = %patch_id, batch = progress.batch, current, "Batch settled");
        on_progress(&progress);

        if fatal.is_some() {
            break;
        }
    }

    if let Some(source) = fatal {
        tracing::error!(
            patch_id = %patch_id,
            error = %source,
            summary = %results.summary(),
            "Design patch aborted"
        );
        mark_failed(store, patch_id, &results, &before_states).await;
        return Err(PatchError::Aborted {
            patch_id,
            results,
            source,
        });
    }

    let status = PatchStatus::from_outcome(results.success_ids.len());
    if let Err(source) = store
        .finalize_patch_record(patch_id, status, &results, &before_states)
        .await
    {
        tracing::error!(
            patch_id = %patch_id,
            status = status.as_str(),
            error = %source,
            "Could not finalize patch record"
        );
        mark_failed(store, patch_id, &results, &before_states).await;
        return Err(PatchError::Finalize { patch_id, source });
    }

    tracing::info!(
        patch_id = %patch_id,
        status = status.as_str(),
        summary = %results.summary(),
        "Design patch finished"
    );

    Ok(PatchOutcome {
        patch_id,
        status,
        results,
    })
}

/// Best-effort close of a record that cannot end `completed`, keeping the
/// results and snapshots rollback needs.
async fn mark_failed<S: PatchStore>(
    store: &S,
    patch_id: DbId,
    results: &PatchResults,
    before_states: &BeforeStates,
) {
    if let Err(err) = store
        .finalize_patch_record(patch_id, PatchStatus::Failed, results, before_states)
        .await
    {
        tracing::error!(
            patch_id = %patch_id,
            error = %err,
            "Could not mark patch as failed"
        );
    }
}

async fn patch_card<S: PatchStore>(
    store: &S,
    template: &TemplateLayout,
    options: &PatchOptionsState,
    patch_id: DbId,
    card: &CardRecord,
) -> Result<(), CardFailure> {
    let payload = build_patch_payload(template, &card.design, options)?;
    let columns = payload.to_columns()?;
    store
        .apply_card_update(card.id, card.design_version, patch_id, &columns)
        .await?;
    tracing::debug!(patch_id = %patch_id, card_id = %card.id, "Card patched");
    Ok(())
}
