//! Route definitions for card templates.
//!
//! Mounted at `/templates` by `api_routes()`.
//!
//! ```text
//! GET    /          -> list_templates (?limit, offset)
//! POST   /          -> save_card_as_template
//! GET    /{id}      -> get_template
//! DELETE /{id}      -> deactivate_template (admin)
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(templates::list_templates).post(templates::save_card_as_template),
        )
        .route(
            "/{id}",
            get(templates::get_template).delete(templates::deactivate_template),
        )
}
