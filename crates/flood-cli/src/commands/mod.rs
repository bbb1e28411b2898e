//! CLI command implementations

pub mod predict;
pub mod render;
pub mod status;
