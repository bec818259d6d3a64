//! Repository for the `admin_patches` table.
//!
//! Status transitions are guarded in SQL so a record can only move along
//! `in_progress -> completed | failed` and `completed -> rolled_back`.

use cardex_core::design_patch::status::{
    STATUS_COMPLETED, STATUS_IN_PROGRESS, STATUS_ROLLED_BACK,
};
use cardex_core::design_patch::PatchStatus;
use cardex_core::types::DbId;
use serde_json::Value;
use sqlx::PgPool;

use crate::models::admin_patch::{AdminPatch, CreateAdminPatch};

const COLUMNS: &str = "id, admin_user_id, template_id, target_mode, target_card_ids, \
    patch_options, results, before_states, cards_affected, status, rollback_results, \
    completed_at, rolled_back_at, created_at, updated_at";

/// Provides the audit trail operations for design patches.
pub struct AdminPatchRepo;

impl AdminPatchRepo {
    /// Open a patch record in `in_progress`.
    pub async fn create(pool: &PgPool, body: &CreateAdminPatch) -> Result<AdminPatch, sqlx::Error> {
        let query = format!(
            "INSERT INTO admin_patches \
                (admin_user_id, template_id, target_mode, target_card_ids, patch_options, \
                 cards_affected, status) \
             VALUES ($1, $2, $3, $4, $5, cardinality($4::uuid[]), '{STATUS_IN_PROGRESS}') \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminPatch>(&query)
            .bind(body.admin_user_id)
            .bind(body.template_id)
            .bind(&body.target_mode)
            .bind(&body.target_card_ids)
            .bind(&body.patch_options)
            .fetch_one(pool)
            .await
    }

    /// Close an in-progress record with its final status, results and snapshots.
    ///
    /// Returns `None` if the record is missing or no longer in progress.
    pub async fn finalize(
        pool: &PgPool,
        id: DbId,
        status: PatchStatus,
        results: &Value,
        before_states: &Value,
    ) -> Result<Option<AdminPatch>, sqlx::Error> {
        let query = format!(
            "UPDATE admin_patches \
             SET status = $2, results = $3, before_states = $4, completed_at = NOW() \
             WHERE id = $1 AND status = '{STATUS_IN_PROGRESS}' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminPatch>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(results)
            .bind(before_states)
            .fetch_optional(pool)
            .await
    }

    /// Persist the results of a partial rollback. The record stays `completed`.
    pub async fn record_rollback_attempt(
        pool: &PgPool,
        id: DbId,
        rollback_results: &Value,
    ) -> Result<Option<AdminPatch>, sqlx::Error> {
        let query = format!(
            "UPDATE admin_patches SET rollback_results = $2 \
             WHERE id = $1 AND status = '{STATUS_COMPLETED}' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminPatch>(&query)
            .bind(id)
            .bind(rollback_results)
            .fetch_optional(pool)
            .await
    }

    /// Transition a completed record to `rolled_back`.
    pub async fn mark_rolled_back(
        pool: &PgPool,
        id: DbId,
        rollback_results: &Value,
    ) -> Result<Option<AdminPatch>, sqlx::Error> {
        let query = format!(
            "UPDATE admin_patches \
             SET status = '{STATUS_ROLLED_BACK}', rollback_results = $2, rolled_back_at = NOW() \
             WHERE id = $1 AND status = '{STATUS_COMPLETED}' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminPatch>(&query)
            .bind(id)
            .bind(rollback_results)
            .fetch_optional(pool)
            .await
    }

    /// Find a single patch record by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AdminPatch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admin_patches WHERE id = $1");
        sqlx::query_as::<_, AdminPatch>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List patch records, newest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<AdminPatch>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM admin_patches \
             ORDER BY created_at DESC, id \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, AdminPatch>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List patch records with the given status, newest first.
    pub async fn list_by_status(
        pool: &PgPool,
        status: PatchStatus,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AdminPatch>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM admin_patches \
             WHERE status = $1 \
             ORDER BY created_at DESC, id \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, AdminPatch>(&query)
            .bind(status.as_str())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
