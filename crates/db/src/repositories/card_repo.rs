//! Repository for the `cards` table.
//!
//! Every design write is a compare-and-swap on `design_version`: the update
//! only lands if the row still carries the version the caller read. A `None`
//! return means the row is missing or has moved on.

use cardex_core::card_design::CardSnapshot;
use cardex_core::design_patch::DesignColumnsUpdate;
use cardex_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::card::{Card, CreateCard, UpdateCardDesign};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, title, company, slug, is_published, \
    theme, carousel_settings, product_images, package_images, testimony_images, \
    social_links, design_version, last_design_patch_id, created_at, updated_at";

/// Provides CRUD and versioned design writes for cards.
pub struct CardRepo;

impl CardRepo {
    /// Insert a new card, returning the created row.
    pub async fn create(pool: &PgPool, body: &CreateCard) -> Result<Card, sqlx::Error> {
        let query = format!(
            "INSERT INTO cards \
                (user_id, name, title, company, slug, is_published, theme, carousel_settings, \
                 product_images, package_images, testimony_images, social_links) \
             VALUES ($1, $2, $3, $4, $5, $6, \
                 COALESCE($7, '{{}}'::jsonb), COALESCE($8, '{{}}'::jsonb), \
                 COALESCE($9, '[]'::jsonb), COALESCE($10, '[]'::jsonb), \
                 COALESCE($11, '[]'::jsonb), COALESCE($12, '[]'::jsonb)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Card>(&query)
            .bind(body.user_id)
            .bind(&body.name)
            .bind(&body.title)
            .bind(&body.company)
            .bind(&body.slug)
            .bind(body.is_published)
            .bind(&body.theme)
            .bind(&body.carousel_settings)
            .bind(&body.product_images)
            .bind(&body.package_images)
            .bind(&body.testimony_images)
            .bind(&body.social_links)
            .fetch_one(pool)
            .await
    }

    /// Find a single card by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Card>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cards WHERE id = $1");
        sqlx::query_as::<_, Card>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch every card whose ID is in `ids`. Unknown IDs are simply absent.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Card>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cards WHERE id = ANY($1) ORDER BY created_at, id");
        sqlx::query_as::<_, Card>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List cards, newest first, optionally restricted to one owner.
    pub async fn list(
        pool: &PgPool,
        user_id: Option<UserId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Card>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cards \
             WHERE ($1::uuid IS NULL OR user_id = $1) \
             ORDER BY created_at DESC, id \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Card>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// IDs of every card, oldest first. Used for `target_mode = all`.
    pub async fn list_all_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as("SELECT id FROM cards ORDER BY created_at, id")
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Manual design edit. Writes the provided columns and bumps the version.
    pub async fn update_design(
        pool: &PgPool,
        id: DbId,
        body: &UpdateCardDesign,
    ) -> Result<Option<Card>, sqlx::Error> {
        let query = format!(
            "UPDATE cards SET \
                theme = COALESCE($3, theme), \
                carousel_settings = COALESCE($4, carousel_settings), \
                product_images = COALESCE($5, product_images), \
                package_images = COALESCE($6, package_images), \
                testimony_images = COALESCE($7, testimony_images), \
                social_links = COALESCE($8, social_links), \
                design_version = design_version + 1 \
             WHERE id = $1 AND design_version = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Card>(&query)
            .bind(id)
            .bind(body.expected_version)
            .bind(&body.theme)
            .bind(&body.carousel_settings)
            .bind(&body.product_images)
            .bind(&body.package_images)
            .bind(&body.testimony_images)
            .bind(&body.social_links)
            .fetch_optional(pool)
            .await
    }

    /// Apply a design patch payload, stamping the card with `patch_id`.
    pub async fn apply_patch(
        pool: &PgPool,
        id: DbId,
        expected_version: i32,
        patch_id: DbId,
        columns: &DesignColumnsUpdate,
    ) -> Result<Option<Card>, sqlx::Error> {
        let query = format!(
            "UPDATE cards SET \
                theme = COALESCE($4, theme), \
                carousel_settings = COALESCE($5, carousel_settings), \
                product_images = COALESCE($6, product_images), \
                package_images = COALESCE($7, package_images), \
                testimony_images = COALESCE($8, testimony_images), \
                social_links = COALESCE($9, social_links), \
                design_version = design_version + 1, \
                last_design_patch_id = $3 \
             WHERE id = $1 AND design_version = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Card>(&query)
            .bind(id)
            .bind(expected_version)
            .bind(patch_id)
            .bind(&columns.theme)
            .bind(&columns.carousel_settings)
            .bind(&columns.product_images)
            .bind(&columns.package_images)
            .bind(&columns.testimony_images)
            .bind(&columns.social_links)
            .fetch_optional(pool)
            .await
    }

    /// Write a snapshot back verbatim and clear `last_design_patch_id`.
    ///
    /// Only lands if the card is still exactly as `patch_id` left it: the
    /// patch stamp is present and the version is one past the snapshot's.
    pub async fn restore_snapshot(
        pool: &PgPool,
        id: DbId,
        patch_id: DbId,
        snapshot: &CardSnapshot,
    ) -> Result<Option<Card>, sqlx::Error> {
        let query = format!(
            "UPDATE cards SET \
                theme = $4, \
                carousel_settings = $5, \
                product_images = $6, \
                package_images = $7, \
                testimony_images = $8, \
                social_links = $9, \
                design_version = $3, \
                last_design_patch_id = NULL \
             WHERE id = $1 AND last_design_patch_id = $2 AND design_version = $3 + 1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Card>(&query)
            .bind(id)
            .bind(patch_id)
            .bind(snapshot.design_version)
            .bind(&snapshot.theme)
            .bind(&snapshot.carousel_settings)
            .bind(&snapshot.product_images)
            .bind(&snapshot.package_images)
            .bind(&snapshot.testimony_images)
            .bind(&snapshot.social_links)
            .fetch_optional(pool)
            .await
    }
}
