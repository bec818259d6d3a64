//! Design patching: applying a template's design onto many cards.
//!
//! This module holds the pure parts (options, payload builder, record shapes,
//! status machine, request validation). Orchestration against the database
//! lives in the `cardex-patcher` crate.

pub mod options;
pub mod payload;
pub mod record;
pub mod status;

pub use options::{CarouselSectionOptions, ImageOptions, MergeMode, PatchOptionsState};
pub use payload::{build_patch_payload, DesignColumnsUpdate, PatchPayload};
pub use record::{BeforeStates, CardError, PatchResults, RollbackResults};
pub use status::{PatchStatus, TargetMode};

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

/// Cards updated concurrently per batch.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Upper bound on configurable batch size.
pub const MAX_BATCH_SIZE: usize = 100;

/// Validate a patch's target list: non-empty with no duplicate IDs.
///
/// There is no upper bound; `all` mode targets every card in the install.
pub fn validate_target_ids(ids: &[DbId]) -> Result<(), CoreError> {
    if ids.is_empty() {
        return Err(CoreError::Validation(
            "A design patch needs at least one target card".to_string(),
        ));
    }
    let mut seen = HashSet::with_capacity(ids.len());
    if let Some(duplicate) = ids.iter().find(|id| !seen.insert(**id)) {
        return Err(CoreError::Validation(format!(
            "Card {duplicate} is targeted more than once"
        )));
    }
    Ok(())
}

/// Validate a batch size is within `1..=MAX_BATCH_SIZE`.
pub fn validate_batch_size(batch_size: usize) -> Result<(), CoreError> {
    if batch_size == 0 || batch_size > MAX_BATCH_SIZE {
        return Err(CoreError::Validation(format!(
            "Batch size must be between 1 and {MAX_BATCH_SIZE}, got {batch_size}"
        )));
    }
    Ok(())
}
