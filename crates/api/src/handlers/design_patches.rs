//! Handlers for admin design patches: preview, execute, audit log and
//! rollback.
//!
//! Execution and rollback run on a spawned task so a client disconnect or
//! request timeout never leaves a record stuck `in_progress`.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use cardex_core::card_design::TemplateLayout;
use cardex_core::design_patch::{
    validate_target_ids, PatchOptionsState, PatchStatus, TargetMode,
};
use cardex_core::error::CoreError;
use cardex_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use cardex_core::types::DbId;
use cardex_db::repositories::{AdminPatchRepo, CardRepo, CardTemplateRepo};
use cardex_patcher::{CardRecord, PatchProgress, PatchRequest, PgPatchStore};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body for both preview and execute.
#[derive(Debug, Deserialize)]
pub struct ExecutePatchRequest {
    pub template_id: DbId,
    pub target_mode: TargetMode,
    /// Required when `target_mode` is `selected`, ignored for `all`.
    #[serde(default)]
    pub card_ids: Option<Vec<DbId>>,
    pub options: PatchOptionsState,
}

#[derive(Debug, Deserialize)]
pub struct ListPatchesParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

struct LoadedPatch {
    template: TemplateLayout,
    cards: Vec<CardRecord>,
}

async fn load_template(state: &AppState, template_id: DbId) -> AppResult<TemplateLayout> {
    let template = CardTemplateRepo::find_by_id(&state.pool, template_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CardTemplate",
            id: template_id,
        }))?;
    if !template.is_active {
        return Err(AppError::BadRequest(format!(
            "Template {template_id} is no longer active"
        )));
    }
    template
        .layout()
        .map_err(|e| AppError::BadRequest(format!("Template {template_id} is malformed: {e}")))
}

/// Resolve the target cards in request order. Empty, duplicate or unknown
/// IDs are rejected before any record is written.
async fn load_targets(state: &AppState, body: &ExecutePatchRequest) -> AppResult<Vec<CardRecord>> {
    let ids = match body.target_mode {
        TargetMode::Selected => body.card_ids.clone().ok_or_else(|| {
            AppError::BadRequest("card_ids is required when target_mode is 'selected'".into())
        })?,
        TargetMode::All => CardRepo::list_all_ids(&state.pool).await?,
    };

    validate_target_ids(&ids)?;

    let mut by_id: HashMap<DbId, CardRecord> = CardRepo::find_by_ids(&state.pool, &ids)
        .await?
        .into_iter()
        .map(|card| (card.id, CardRecord::from(card)))
        .collect();

    let mut cards = Vec::with_capacity(ids.len());
    let mut missing = Vec::new();
    for id in &ids {
        match by_id.remove(id) {
            Some(card) => cards.push(card),
            None => missing.push(id.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Unknown card ids: {}",
            missing.join(", ")
        )));
    }
    Ok(cards)
}

async fn load_patch(state: &AppState, body: &ExecutePatchRequest) -> AppResult<LoadedPatch> {
    if !body.options.has_any_selection() {
        return Err(AppError::BadRequest(
            "Select at least one design category to apply".into(),
        ));
    }
    let template = load_template(state, body.template_id).await?;
    let cards = load_targets(state, body).await?;
    Ok(LoadedPatch { template, cards })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /admin/design-patches/preview
///
/// Computes each card's payload without writing anything.
pub async fn preview_patch(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<ExecutePatchRequest>,
) -> AppResult<impl IntoResponse> {
    let loaded = load_patch(&state, &body).await?;
    let previews = cardex_patcher::preview_patch(&loaded.template, &loaded.cards, &body.options);
    Ok(Json(DataResponse { data: previews }))
}

/// POST /admin/design-patches
pub async fn execute_patch(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<ExecutePatchRequest>,
) -> AppResult<impl IntoResponse> {
    let loaded = load_patch(&state, &body).await?;

    let request = PatchRequest {
        template_id: body.template_id,
        template: loaded.template,
        cards: loaded.cards,
        options: body.options,
        target_mode: body.target_mode,
        admin_user_id: admin.user_id,
        batch_size: state.config.design_patch_batch_size,
    };
    let store = PgPatchStore::new(state.pool.clone());
    let template_id = body.template_id;

    let outcome = tokio::spawn(async move {
        cardex_patcher::execute_patch(&store, request, |progress: &PatchProgress| {
            tracing::info!(
                template_id = %template_id,
                current = progress.current,
                total = progress.total,
                batch = progress.batch,
                batch_count = progress.batch_count,
                "Design patch progress"
            );
        })
        .await
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Design patch task failed: {e}")))??;

    tracing::info!(
        patch_id = %outcome.patch_id,
        status = outcome.status.as_str(),
        succeeded = outcome.results.success_ids.len(),
        failed = outcome.results.failed_ids.len(),
        user_id = %admin.user_id,
        "Design patch finished"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}

/// GET /admin/design-patches
pub async fn list_patches(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ListPatchesParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let patches = match params.status.as_deref() {
        Some(status) => {
            let status = PatchStatus::from_str_value(status).map_err(AppError::BadRequest)?;
            AdminPatchRepo::list_by_status(&state.pool, status, limit, offset).await?
        }
        None => AdminPatchRepo::list(&state.pool, limit, offset).await?,
    };

    Ok(Json(DataResponse { data: patches }))
}

/// GET /admin/design-patches/{id}
pub async fn get_patch(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let patch = AdminPatchRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Design patch",
            id,
        }))?;

    Ok(Json(DataResponse { data: patch }))
}

/// POST /admin/design-patches/{id}/rollback
pub async fn rollback_patch(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let store = PgPatchStore::new(state.pool.clone());

    let outcome = tokio::spawn(async move { cardex_patcher::rollback_patch(&store, id).await })
        .await
        .map_err(|e| AppError::InternalError(format!("Rollback task failed: {e}")))??;

    tracing::info!(
        patch_id = %id,
        status = outcome.status.as_str(),
        restored = outcome.results.restored_ids.len(),
        failed = outcome.results.failed_ids.len(),
        user_id = %admin.user_id,
        "Design patch rollback finished"
    );

    Ok(Json(DataResponse { data: outcome }))
}
