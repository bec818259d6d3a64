//! Route definitions for bulk design patches.
//!
//! Mounted at `/admin/design-patches` by `api_routes()`.
//!
//! ```text
//! GET    /                -> list_patches (?status, limit, offset)
//! POST   /                -> execute_patch
//! POST   /preview         -> preview_patch
//! GET    /{id}            -> get_patch
//! POST   /{id}/rollback   -> rollback_patch
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::design_patches;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(design_patches::list_patches).post(design_patches::execute_patch),
        )
        .route("/preview", post(design_patches::preview_patch))
        .route("/{id}", get(design_patches::get_patch))
        .route("/{id}/rollback", post(design_patches::rollback_patch))
}
