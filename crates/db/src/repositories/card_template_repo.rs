//! Repository for the `card_templates` table.

use cardex_core::template::{SCOPE_GLOBAL, SCOPE_PRIVATE, SCOPE_TEAM};
use cardex_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::card_template::{CardTemplate, CreateCardTemplate};

const COLUMNS: &str = "id, name, description, owner_id, scope, team_id, layout_data, \
    source_card_id, is_active, created_at, updated_at";

/// Provides CRUD operations for card templates.
pub struct CardTemplateRepo;

impl CardTemplateRepo {
    /// Insert a new template, returning the created row.
    pub async fn create(
        pool: &PgPool,
        body: &CreateCardTemplate,
    ) -> Result<CardTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO card_templates \
                (name, description, owner_id, scope, team_id, layout_data, source_card_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CardTemplate>(&query)
            .bind(&body.name)
            .bind(&body.description)
            .bind(body.owner_id)
            .bind(body.scope.as_str())
            .bind(body.team_id)
            .bind(&body.layout_data)
            .bind(body.source_card_id)
            .fetch_one(pool)
            .await
    }

    /// Find a template by ID, active or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CardTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM card_templates WHERE id = $1");
        sqlx::query_as::<_, CardTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Active templates a user may see: global ones, their team's, and their own
    /// private ones.
    pub async fn list_visible(
        pool: &PgPool,
        user_id: UserId,
        team_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CardTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM card_templates \
             WHERE is_active \
               AND (scope = '{SCOPE_GLOBAL}' \
                    OR (scope = '{SCOPE_TEAM}' AND team_id = $2) \
                    OR (scope = '{SCOPE_PRIVATE}' AND owner_id = $1)) \
             ORDER BY name, id \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, CardTemplate>(&query)
            .bind(user_id)
            .bind(team_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Soft-delete a template. Returns `true` if an active row was deactivated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE card_templates SET is_active = false WHERE id = $1 AND is_active")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
