pub mod cards;
pub mod design_patches;
pub mod templates;
