//! Handlers for card templates: visible listing, detail, save-as-template
//! and deactivation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use cardex_core::card_design::TemplateLayout;
use cardex_core::error::CoreError;
use cardex_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use cardex_core::template::{SaveCardAsTemplate, TemplateScope};
use cardex_core::types::DbId;
use cardex_db::models::card_template::{CardTemplate, CreateCardTemplate};
use cardex_db::repositories::{CardRepo, CardTemplateRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Whether `user` may see `template`. Admins see everything.
fn is_visible(template: &CardTemplate, user: &AuthUser) -> bool {
    if user.is_admin() {
        return true;
    }
    if !template.is_active {
        return false;
    }
    match TemplateScope::from_str_value(&template.scope) {
        Ok(TemplateScope::Global) => true,
        Ok(TemplateScope::Team) => template.team_id.is_some() && template.team_id == user.team_id,
        Ok(TemplateScope::Private) => template.owner_id == user.user_id,
        Err(_) => false,
    }
}

/// GET /templates
pub async fn list_templates(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let templates =
        CardTemplateRepo::list_visible(&state.pool, user.user_id, user.team_id, limit, offset)
            .await?;

    Ok(Json(DataResponse { data: templates }))
}

/// GET /templates/{id}
///
/// Templates the caller cannot see are reported as not found.
pub async fn get_template(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let template = CardTemplateRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|template| is_visible(template, &user))
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CardTemplate",
            id,
        }))?;

    Ok(Json(DataResponse { data: template }))
}

/// POST /templates
///
/// Save an existing card's design as a new template. Only the card's owner
/// or an admin may do this; global templates are admin-only and team
/// templates must target the caller's own team.
pub async fn save_card_as_template(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<SaveCardAsTemplate>,
) -> AppResult<impl IntoResponse> {
    let scope = body.check().map_err(AppError::BadRequest)?;

    let card = CardRepo::find_by_id(&state.pool, body.card_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Card",
            id: body.card_id,
        }))?;

    if !user.is_admin() {
        if card.user_id != user.user_id {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only the card owner can save it as a template".into(),
            )));
        }
        match scope {
            TemplateScope::Global => {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Only admins can create global templates".into(),
                )));
            }
            TemplateScope::Team if body.team_id != user.team_id => {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Team templates can only target your own team".into(),
                )));
            }
            _ => {}
        }
    }

    let layout = TemplateLayout::from_card(&card.design())
        .map_err(|e| AppError::BadRequest(format!("Card design cannot be templated: {e}")))?;
    let layout_data = serde_json::to_value(&layout)
        .map_err(|e| AppError::InternalError(format!("Failed to encode layout: {e}")))?;

    let template = CardTemplateRepo::create(
        &state.pool,
        &CreateCardTemplate {
            name: body.name,
            description: body.description,
            owner_id: user.user_id,
            scope,
            team_id: if scope == TemplateScope::Team { body.team_id } else { None },
            layout_data,
            source_card_id: Some(card.id),
        },
    )
    .await?;

    tracing::info!(
        template_id = %template.id,
        card_id = %card.id,
        scope = scope.as_str(),
        user_id = %user.user_id,
        "Card saved as template"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// DELETE /templates/{id}
///
/// Soft-delete: the template disappears from listings but existing patch
/// records keep referencing it.
pub async fn deactivate_template(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !CardTemplateRepo::deactivate(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "CardTemplate",
            id,
        }));
    }

    tracing::info!(template_id = %id, user_id = %admin.user_id, "Template deactivated");

    Ok(StatusCode::NO_CONTENT)
}
