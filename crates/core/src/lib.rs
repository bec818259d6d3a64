//! Card-Ex domain core.
//!
//! Pure types and logic for the design patcher: typed card design blobs,
//! patch options, the payload builder, and the patch record state machine.
//! Nothing in this crate talks to the database; callers pass data in.

pub mod card_design;
pub mod design_patch;
pub mod error;
pub mod pagination;
pub mod roles;
pub mod template;
pub mod types;
