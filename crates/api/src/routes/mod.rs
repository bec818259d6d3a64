pub mod cards;
pub mod design_patches;
pub mod health;
pub mod templates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /templates                                 list visible, save card as template
/// /templates/{id}                            get, deactivate (admin)
///
/// /cards                                     list (admin)
/// /cards/{id}                                get (admin)
/// /cards/{id}/design                         manual design edit (admin, PUT)
///
/// /admin/design-patches                      history, execute (admin)
/// /admin/design-patches/preview              dry run (admin, POST)
/// /admin/design-patches/{id}                 record detail (admin)
/// /admin/design-patches/{id}/rollback        roll back (admin, POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/templates", templates::router())
        .nest("/cards", cards::router())
        .nest("/admin/design-patches", design_patches::router())
}
