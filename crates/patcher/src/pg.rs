//! Postgres-backed [`PatchStore`] over the `cardex-db` repositories.

use cardex_core::card_design::CardSnapshot;
use cardex_core::design_patch::{
    BeforeStates, DesignColumnsUpdate, PatchResults, PatchStatus, RollbackResults,
};
use cardex_core::types::DbId;
use cardex_db::models::admin_patch::CreateAdminPatch;
use cardex_db::models::card::Card;
use cardex_db::repositories::{AdminPatchRepo, CardRepo};
use cardex_db::DbPool;

use crate::store::{CardRecord, NewPatchRecord, PatchRecordState, PatchStore, PatchStoreError};

impl From<sqlx::Error> for PatchStoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                PatchStoreError::Unavailable(err.to_string())
            }
            other => PatchStoreError::Backend(other.to_string()),
        }
    }
}

impl From<Card> for CardRecord {
    fn from(card: Card) -> Self {
        Self {
            id: card.id,
            design: card.design(),
            design_version: card.design_version,
            last_design_patch_id: card.last_design_patch_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgPatchStore {
    pool: DbPool,
}

impl PgPatchStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Tell a missing card apart from one whose guard did not match.
    async fn card_write_miss(&self, card_id: DbId) -> PatchStoreError {
        match CardRepo::find_by_id(&self.pool, card_id).await {
            Ok(Some(_)) => PatchStoreError::Conflict(card_id),
            Ok(None) => PatchStoreError::NotFound {
                entity: "Card",
                id: card_id,
            },
            Err(err) => err.into(),
        }
    }
}

impl PatchStore for PgPatchStore {
    async fn create_patch_record(&self, record: &NewPatchRecord) -> Result<DbId, PatchStoreError> {
        let created = AdminPatchRepo::create(
            &self.pool,
            &CreateAdminPatch {
                admin_user_id: record.admin_user_id,
                template_id: record.template_id,
                target_mode: record.target_mode.as_str().to_string(),
                target_card_ids: record.target_card_ids.clone(),
                patch_options: serde_json::to_value(&record.options)?,
            },
        )
        .await?;
        Ok(created.id)
    }

    async fn apply_card_update(
        &self,
        card_id: DbId,
        expected_version: i32,
        patch_id: DbId,
        columns: &DesignColumnsUpdate,
    ) -> Result<(), PatchStoreError> {
        match CardRepo::apply_patch(&self.pool, card_id, expected_version, patch_id, columns).await? {
            Some(_) => Ok(()),
            None => Err(self.card_write_miss(card_id).await),
        }
    }

    async fn finalize_patch_record(
        &self,
        patch_id: DbId,
        status: PatchStatus,
        results: &PatchResults,
        before_states: &BeforeStates,
    ) -> Result<(), PatchStoreError> {
        let results = serde_json::to_value(results)?;
        let before_states = serde_json::to_value(before_states)?;
        AdminPatchRepo::finalize(&self.pool, patch_id, status, &results, &before_states)
            .await?
            .map(|_| ())
            .ok_or(PatchStoreError::Conflict(patch_id))
    }

    async fn load_patch_record(
        &self,
        patch_id: DbId,
    ) -> Result<Option<PatchRecordState>, PatchStoreError> {
        let Some(patch) = AdminPatchRepo::find_by_id(&self.pool, patch_id).await? else {
            return Ok(None);
        };
        let status = patch.patch_status().map_err(PatchStoreError::Backend)?;
        Ok(Some(PatchRecordState {
            id: patch.id,
            status,
            results: patch.parsed_results()?,
            before_states: patch.parsed_before_states()?,
        }))
    }

    async fn load_card(&self, card_id: DbId) -> Result<Option<CardRecord>, PatchStoreError> {
        Ok(CardRepo::find_by_id(&self.pool, card_id)
            .await?
            .map(CardRecord::from))
    }

    async fn restore_card(
        &self,
        card_id: DbId,
        patch_id: DbId,
        snapshot: &CardSnapshot,
    ) -> Result<(), PatchStoreError> {
        match CardRepo::restore_snapshot(&self.pool, card_id, patch_id, snapshot).await? {
            Some(_) => Ok(()),
            None => Err(self.card_write_miss(card_id).await),
        }
    }

    async fn complete_rollback(
        &self,
        patch_id: DbId,
        results: &RollbackResults,
    ) -> Result<(), PatchStoreError> {
        let results = serde_json::to_value(results)?;
        AdminPatchRepo::mark_rolled_back(&self.pool, patch_id, &results)
            .await?
            .map(|_| ())
            .ok_or(PatchStoreError::Conflict(patch_id))
    }

    async fn record_rollback_attempt(
        &self,
        patch_id: DbId,
        results: &RollbackResults,
    ) -> Result<(), PatchStoreError> {
        let results = serde_json::to_value(results)?;
        AdminPatchRepo::record_rollback_attempt(&self.pool, patch_id, &results)
            .await?
            .map(|_| ())
            .ok_or(PatchStoreError::Conflict(patch_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_loss_is_fatal() {
        let err: PatchStoreError = sqlx::Error::PoolClosed.into();
        assert!(err.is_fatal());

        let err: PatchStoreError = sqlx::Error::RowNotFound.into();
        assert!(!err.is_fatal());
    }
}
