//! Service layer for placement logic.
//!
//! This module contains the geometry, validation, mutation and export logic
//! operating on the models in [`crate::models`], plus catalog file I/O.

pub mod bounding_box;
pub mod catalog;
pub mod geometry;
pub mod mutator;
pub mod positions;
pub mod scale;
pub mod validator;

// Re-export commonly used types and functions
pub use bounding_box::{export_multi_door, export_single_door};
pub use catalog::{LayoutCatalog, PlacementFile, SkuCatalog};
pub use mutator::{PlacementError, PlacementResult, Placed};
pub use scale::scale_backend;
pub use validator::{
    compute_valid_targets, compute_valid_targets_multi, find_conflicts, find_conflicts_multi,
    PlacementCandidate, ValidTargets,
};
