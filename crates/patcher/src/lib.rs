//! Bulk design patching: apply a template onto many cards, audit the run,
//! and roll it back from the recorded snapshots.
//!
//! The orchestration is written against the [`PatchStore`] trait. Production
//! runs over Postgres ([`PgPatchStore`]); unit tests use an in-memory store.

pub mod error;
pub mod executor;
#[cfg(test)]
mod memory;
pub mod pg;
pub mod preview;
pub mod rollback;
pub mod store;

pub use error::PatchError;
pub use executor::{execute_patch, PatchOutcome, PatchProgress, PatchRequest};
pub use pg::PgPatchStore;
pub use preview::{preview_patch, CardPreview};
pub use rollback::{rollback_patch, RollbackOutcome};
pub use store::{CardRecord, NewPatchRecord, PatchRecordState, PatchStore, PatchStoreError};
