//! The `social_links` column.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;

/// A contact method shown on a card. A card carries at most one link per
/// `kind` once merged.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    /// Contact-method kind, e.g. `"email"`, `"whatsapp"`, `"linkedin"`.
    pub kind: String,
    pub url: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SocialLink {
    pub fn new(kind: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            url: url.into(),
            label: None,
            extra: Map::new(),
        }
    }
}

/// Merge template links into a card's links, deduplicating by `kind`.
///
/// The first card link of each kind is kept (in order); template links are
/// appended only for kinds the card does not have yet.
pub fn merge_social_links(existing: &[SocialLink], template: &[SocialLink]) -> Vec<SocialLink> {
    let mut kinds: HashSet<&str> = HashSet::new();
    existing
        .iter()
        .chain(template)
        .filter(|link| kinds.insert(link.kind.as_str()))
        .cloned()
        .collect()
}
