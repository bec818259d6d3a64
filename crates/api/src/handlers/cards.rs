//! Handlers for the admin card endpoints.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use cardex_core::card_design::{
    parse_blob, CarouselImage, CarouselSettings, DesignDataError, SocialLink, ThemeConfig,
};
use cardex_core::error::CoreError;
use cardex_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use cardex_core::types::{DbId, UserId};
use cardex_db::models::card::UpdateCardDesign;
use cardex_db::repositories::CardRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListCardsParams {
    pub user_id: Option<UserId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Reject design columns that do not parse as their typed shape.
fn check_design_columns(body: &UpdateCardDesign) -> Result<(), DesignDataError> {
    fn check<T: serde::de::DeserializeOwned + Default>(
        field: &'static str,
        value: &Option<Value>,
    ) -> Result<(), DesignDataError> {
        match value {
            Some(value) => parse_blob::<T>(field, value).map(|_| ()),
            None => Ok(()),
        }
    }
    check::<ThemeConfig>("theme", &body.theme)?;
    check::<CarouselSettings>("carousel_settings", &body.carousel_settings)?;
    check::<Vec<CarouselImage>>("product_images", &body.product_images)?;
    check::<Vec<CarouselImage>>("package_images", &body.package_images)?;
    check::<Vec<CarouselImage>>("testimony_images", &body.testimony_images)?;
    check::<Vec<SocialLink>>("social_links", &body.social_links)?;
    Ok(())
}

/// GET /cards
pub async fn list_cards(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ListCardsParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let cards = CardRepo::list(&state.pool, params.user_id, limit, offset).await?;

    Ok(Json(DataResponse { data: cards }))
}

/// GET /cards/{id}
pub async fn get_card(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let card = CardRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Card", id }))?;

    Ok(Json(DataResponse { data: card }))
}

/// PUT /cards/{id}/design
///
/// Manual design edit guarded by `expected_version`. A stale version is a
/// 409 so the editor can reload instead of overwriting a patch.
pub async fn update_card_design(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateCardDesign>,
) -> AppResult<impl IntoResponse> {
    if body.is_empty() {
        return Err(AppError::BadRequest(
            "At least one design field must be provided".into(),
        ));
    }
    check_design_columns(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let Some(card) = CardRepo::update_design(&state.pool, id, &body).await? else {
        let current = CardRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound { entity: "Card", id }))?;
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Card {id} is at design_version {}, expected {}",
            current.design_version, body.expected_version
        ))));
    };

    tracing::info!(
        card_id = %id,
        design_version = card.design_version,
        user_id = %admin.user_id,
        "Card design updated"
    );

    Ok(Json(DataResponse { data: card }))
}
