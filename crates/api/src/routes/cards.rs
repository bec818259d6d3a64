//! Route definitions for cards. Mounted at `/cards`.
//!
//! ```text
//! GET    /               -> list_cards (?user_id, limit, offset)
//! GET    /{id}           -> get_card
//! PUT    /{id}/design    -> update_card_design
//! ```

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::cards;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cards::list_cards))
        .route("/{id}", get(cards::get_card))
        .route("/{id}/design", put(cards::update_card_design))
}
