//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod admin_patch_repo;
pub mod card_repo;
pub mod card_template_repo;

pub use admin_patch_repo::AdminPatchRepo;
pub use card_repo::CardRepo;
pub use card_template_repo::CardTemplateRepo;
