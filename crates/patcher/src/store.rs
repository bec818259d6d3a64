//! The persistence seam used by the executor and rollback.

use cardex_core::card_design::{CardDesign, CardSnapshot};
use cardex_core::design_patch::{
    BeforeStates, DesignColumnsUpdate, PatchOptionsState, PatchResults, PatchStatus,
    RollbackResults, TargetMode,
};
use cardex_core::types::{DbId, UserId};

/// A card as the patcher sees it: its design columns and version stamp.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRecord {
    pub id: DbId,
    pub design: CardDesign,
    pub design_version: i32,
    pub last_design_patch_id: Option<DbId>,
}

impl CardRecord {
    pub fn snapshot(&self) -> CardSnapshot {
        CardSnapshot::capture(&self.design, self.design_version)
    }

    /// Whether the card is exactly back at `snapshot` with no patch stamp.
    pub fn matches_snapshot(&self, snapshot: &CardSnapshot) -> bool {
        self.last_design_patch_id.is_none()
            && self.design_version == snapshot.design_version
            && self.design == snapshot.design()
    }
}

/// Audit record opened before any card is touched.
#[derive(Debug, Clone)]
pub struct NewPatchRecord {
    pub admin_user_id: UserId,
    pub template_id: DbId,
    pub target_mode: TargetMode,
    pub target_card_ids: Vec<DbId>,
    pub options: PatchOptionsState,
}

/// What rollback needs from a stored patch record.
#[derive(Debug, Clone)]
pub struct PatchRecordState {
    pub id: DbId,
    pub status: PatchStatus,
    pub results: PatchResults,
    pub before_states: BeforeStates,
}

#[derive(Debug, thiserror::Error)]
pub enum PatchStoreError {
    /// A compare-and-swap guard did not match: the row moved on.
    #[error("Record {0} was modified concurrently")]
    Conflict(DbId),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Invalid stored data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Backend(String),

    /// The store cannot serve any request (pool closed, connection refused).
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl PatchStoreError {
    /// Whether the error affects every card rather than just the one at hand.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Storage operations for design patching.
///
/// Every card write is a compare-and-swap: `apply_card_update` requires the
/// card to still be at `expected_version`, and `restore_card` requires the
/// card to still be exactly as the patch left it. A mismatch is reported as
/// [`PatchStoreError::Conflict`].
pub trait PatchStore: Send + Sync {
    /// Open an `in_progress` patch record and return its ID.
    fn create_patch_record(
        &self,
        record: &NewPatchRecord,
    ) -> impl std::future::Future<Output = Result<DbId, PatchStoreError>> + Send;

    /// Write `columns` to a card, bump its version and stamp it with `patch_id`.
    fn apply_card_update(
        &self,
        card_id: DbId,
        expected_version: i32,
        patch_id: DbId,
        columns: &DesignColumnsUpdate,
    ) -> impl std::future::Future<Output = Result<(), PatchStoreError>> + Send;

    /// Close an `in_progress` record with its final status, results and snapshots.
    fn finalize_patch_record(
        &self,
        patch_id: DbId,
        status: PatchStatus,
        results: &PatchResults,
        before_states: &BeforeStates,
    ) -> impl std::future::Future<Output = Result<(), PatchStoreError>> + Send;

    fn load_patch_record(
        &self,
        patch_id: DbId,
    ) -> impl std::future::Future<Output = Result<Option<PatchRecordState>, PatchStoreError>> + Send;

    fn load_card(
        &self,
        card_id: DbId,
    ) -> impl std::future::Future<Output = Result<Option<CardRecord>, PatchStoreError>> + Send;

    /// Write `snapshot` back verbatim and clear the card's patch stamp.
    fn restore_card(
        &self,
        card_id: DbId,
        patch_id: DbId,
        snapshot: &CardSnapshot,
    ) -> impl std::future::Future<Output = Result<(), PatchStoreError>> + Send;

    /// Transition a `completed` record to `rolled_back`.
    fn complete_rollback(
        &self,
        patch_id: DbId,
        results: &RollbackResults,
    ) -> impl std::future::Future<Output = Result<(), PatchStoreError>> + Send;

    /// Persist a partial rollback; the record stays `completed`.
    fn record_rollback_attempt(
        &self,
        patch_id: DbId,
        results: &RollbackResults,
    ) -> impl std::future::Future<Output = Result<(), PatchStoreError>> + Send;
}
