//! Errors surfaced by patch execution and rollback.
//!
//! Per-card failures never appear here; they are recorded in the patch
//! results. These variants are the outcomes that abort an operation.

use cardex_core::design_patch::{PatchResults, PatchStatus};
use cardex_core::types::DbId;

use crate::store::PatchStoreError;

#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// Rejected before anything was written.
    #[error("Invalid patch request: {0}")]
    InvalidRequest(String),

    /// The audit record could not be created, so no card was touched.
    #[error("Could not create patch record: {0}")]
    AuditRecord(#[source] PatchStoreError),

    /// A systemic store failure stopped the batch loop. The record has been
    /// marked `failed` with the partial results.
    #[error("Patch {patch_id} aborted: {source}")]
    Aborted {
        patch_id: DbId,
        results: PatchResults,
        #[source]
        source: PatchStoreError,
    },

    /// Every batch ran but the final record update failed.
    #[error("Could not finalize patch {patch_id}: {source}")]
    Finalize {
        patch_id: DbId,
        #[source]
        source: PatchStoreError,
    },

    #[error("Patch {0} not found")]
    NotFound(DbId),

    #[error("Patch {patch_id} is {}, expected completed", status.as_str())]
    InvalidState { patch_id: DbId, status: PatchStatus },

    #[error(transparent)]
    Store(#[from] PatchStoreError),
}
