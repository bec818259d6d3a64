//! Dry run: the payload each card would receive, without writing anything.

use cardex_core::card_design::TemplateLayout;
use cardex_core::design_patch::{build_patch_payload, PatchOptionsState, PatchPayload};
use cardex_core::types::DbId;
use serde::Serialize;

use crate::store::CardRecord;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPreview {
    pub card_id: DbId,
    /// `None` when the card's stored design could not be read.
    pub payload: Option<PatchPayload>,
    pub error: Option<String>,
}

pub fn preview_patch(
    template: &TemplateLayout,
    cards: &[CardRecord],
    options: &PatchOptionsState,
) -> Vec<CardPreview> {
    cards
        .iter()
        .map(|card| match build_patch_payload(template, &card.design, options) {
            Ok(payload) => CardPreview {
                card_id: card.id,
                payload: Some(payload),
                error: None,
            },
            Err(err) => CardPreview {
                card_id: card.id,
                payload: None,
                error: Some(err.to_string()),
            },
        })
        .collect()
}
