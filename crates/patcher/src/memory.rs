//! In-memory [`PatchStore`] with failure injection, used by the executor and
//! rollback tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use cardex_core::card_design::CardSnapshot;
use cardex_core::design_patch::{
    BeforeStates, DesignColumnsUpdate, PatchResults, PatchStatus, RollbackResults,
};
use cardex_core::types::DbId;
use uuid::Uuid;

use crate::store::{CardRecord, NewPatchRecord, PatchRecordState, PatchStore, PatchStoreError};

/// A stored patch record.
#[derive(Debug, Clone)]
pub struct MemoryPatch {
    pub record: NewPatchRecord,
    pub status: PatchStatus,
    pub results: PatchResults,
    pub before_states: BeforeStates,
    pub rollback_results: Option<RollbackResults>,
}

impl MemoryPatch {
    pub fn cards_affected(&self) -> usize {
        self.record.target_card_ids.len()
    }
}

#[derive(Debug, Default)]
struct State {
    cards: HashMap<DbId, CardRecord>,
    patches: HashMap<DbId, MemoryPatch>,
    failing_updates: HashMap<DbId, String>,
    failing_restores: HashSet<DbId>,
    fail_record_creation: bool,
    failing_finalizes: usize,
    /// Card writes allowed before every call reports `Unavailable`.
    writes_before_outage: Option<usize>,
    writes: usize,
}

impl State {
    fn check_available(&self) -> Result<(), PatchStoreError> {
        match self.writes_before_outage {
            Some(limit) if self.writes >= limit => {
                Err(PatchStoreError::Unavailable("connection refused".to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryPatchStore {
    state: Mutex<State>,
}

impl MemoryPatchStore {
    pub fn with_cards(cards: impl IntoIterator<Item = CardRecord>) -> Self {
        let store = Self::default();
        store.lock().cards = cards.into_iter().map(|card| (card.id, card)).collect();
        store
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn card(&self, id: DbId) -> Option<CardRecord> {
        self.lock().cards.get(&id).cloned()
    }

    /// Replace a card as if edited outside the patcher.
    pub fn put_card(&self, card: CardRecord) {
        self.lock().cards.insert(card.id, card);
    }

    pub fn patch(&self, id: DbId) -> Option<MemoryPatch> {
        self.lock().patches.get(&id).cloned()
    }

    pub fn patch_count(&self) -> usize {
        self.lock().patches.len()
    }

    /// Make every forward update of `card_id` fail with a backend error.
    pub fn fail_updates_for(&self, card_id: DbId, message: &str) {
        self.lock().failing_updates.insert(card_id, message.to_string());
    }

    /// Make every restore of `card_id` fail with a backend error.
    pub fn fail_restores_for(&self, card_id: DbId) {
        self.lock().failing_restores.insert(card_id);
    }

    pub fn allow_restores_for(&self, card_id: DbId) {
        self.lock().failing_restores.remove(&card_id);
    }

    pub fn fail_record_creation(&self) {
        self.lock().fail_record_creation = true;
    }

    /// Make the next record finalization fail with a backend error.
    pub fn fail_next_finalize(&self) {
        self.lock().failing_finalizes += 1;
    }

    /// Let `writes` card writes succeed, then report the store unavailable.
    pub fn become_unavailable_after(&self, writes: usize) {
        self.lock().writes_before_outage = Some(writes);
    }
}

impl PatchStore for MemoryPatchStore {
    async fn create_patch_record(&self, record: &NewPatchRecord) -> Result<DbId, PatchStoreError> {
        let mut state = self.lock();
        if state.fail_record_creation {
            return Err(PatchStoreError::Backend("insert into admin_patches failed".to_string()));
        }
        let id = Uuid::new_v4();
        state.patches.insert(
            id,
            MemoryPatch {
                record: record.clone(),
                status: PatchStatus::InProgress,
                results: PatchResults::default(),
                before_states: BeforeStates::new(),
                rollback_results: None,
            },
        );
        Ok(id)
    }

    async fn apply_card_update(
        &self,
        card_id: DbId,
        expected_version: i32,
        patch_id: DbId,
        columns: &DesignColumnsUpdate,
    ) -> Result<(), PatchStoreError> {
        let mut state = self.lock();
        state.check_available()?;
        if let Some(message) = state.failing_updates.get(&card_id) {
            return Err(PatchStoreError::Backend(message.clone()));
        }
        let card = state.cards.get_mut(&card_id).ok_or(PatchStoreError::NotFound {
            entity: "Card",
            id: card_id,
        })?;
        if card.design_version != expected_version {
            return Err(PatchStoreError::Conflict(card_id));
        }

        let design = &mut card.design;
        let writes = [
            (&mut design.theme, &columns.theme),
            (&mut design.carousel_settings, &columns.carousel_settings),
            (&mut design.product_images, &columns.product_images),
            (&mut design.package_images, &columns.package_images),
            (&mut design.testimony_images, &columns.testimony_images),
            (&mut design.social_links, &columns.social_links),
        ];
        for (column, value) in writes {
            if let Some(value) = value {
                *column = value.clone();
            }
        }
        card.design_version += 1;
        card.last_design_patch_id = Some(patch_id);
        state.writes += 1;
        Ok(())
    }

    async fn finalize_patch_record(
        &self,
        patch_id: DbId,
        status: PatchStatus,
        results: &PatchResults,
        before_states: &BeforeStates,
    ) -> Result<(), PatchStoreError> {
        let mut state = self.lock();
        if state.failing_finalizes > 0 {
            state.failing_finalizes -= 1;
            return Err(PatchStoreError::Backend("update admin_patches failed".to_string()));
        }
        let patch = state.patches.get_mut(&patch_id).ok_or(PatchStoreError::NotFound {
            entity: "Patch",
            id: patch_id,
        })?;
        if !patch.status.can_transition_to(status) {
            return Err(PatchStoreError::Conflict(patch_id));
        }
        patch.status = status;
        patch.results = results.clone();
        patch.before_states = before_states.clone();
        Ok(())
    }

    async fn load_patch_record(
        &self,
        patch_id: DbId,
    ) -> Result<Option<PatchRecordState>, PatchStoreError> {
        Ok(self.lock().patches.get(&patch_id).map(|patch| PatchRecordState {
            id: patch_id,
            status: patch.status,
            results: patch.results.clone(),
            before_states: patch.before_states.clone(),
        }))
    }

    async fn load_card(&self, card_id: DbId) -> Result<Option<CardRecord>, PatchStoreError> {
        Ok(self.card(card_id))
    }

    async fn restore_card(
        &self,
        card_id: DbId,
        patch_id: DbId,
        snapshot: &CardSnapshot,
    ) -> Result<(), PatchStoreError> {
        let mut state = self.lock();
        state.check_available()?;
        if state.failing_restores.contains(&card_id) {
            return Err(PatchStoreError::Backend("restore write failed".to_string()));
        }
        let card = state.cards.get_mut(&card_id).ok_or(PatchStoreError::NotFound {
            entity: "Card",
            id: card_id,
        })?;
        if card.last_design_patch_id != Some(patch_id)
            || card.design_version != snapshot.design_version + 1
        {
            return Err(PatchStoreError::Conflict(card_id));
        }
        card.design = snapshot.design();
        card.design_version = snapshot.design_version;
        card.last_design_patch_id = None;
        Ok(())
    }

    async fn complete_rollback(
        &self,
        patch_id: DbId,
        results: &RollbackResults,
    ) -> Result<(), PatchStoreError> {
        let mut state = self.lock();
        let patch = state
            .patches
            .get_mut(&patch_id)
            .filter(|patch| patch.status == PatchStatus::Completed)
            .ok_or(PatchStoreError::Conflict(patch_id))?;
        patch.status = PatchStatus::RolledBack;
        patch.rollback_results = Some(results.clone());
        Ok(())
    }

    async fn record_rollback_attempt(
        &self,
        patch_id: DbId,
        results: &RollbackResults,
    ) -> Result<(), PatchStoreError> {
        let mut state = self.lock();
        let patch = state
            .patches
            .get_mut(&patch_id)
            .filter(|patch| patch.status == PatchStatus::Completed)
            .ok_or(PatchStoreError::Conflict(patch_id))?;
        patch.rollback_results = Some(results.clone());
        Ok(())
    }
}
