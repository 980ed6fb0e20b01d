//! Data models for catalogs, placement trees and backend exports.
//!
//! This module contains the core data structures used throughout the crate.
//! Models are independent of validation and geometry logic, which live in
//! [`crate::services`].

pub mod backend;
pub mod item;
pub mod layout_data;
pub mod refrigerator;
pub mod row;
pub mod sku;
pub mod stack;

// Re-export all model types
pub use backend::{
    BackendDimensions, BackendDoor, BackendExport, BackendProduct, BackendSection, Corner, Polygon,
};
pub use item::Item;
pub use layout_data::{DoorConfig, LayoutData, RowConfig};
pub use refrigerator::{Door, ItemLocation, MultiDoorRefrigerator, Refrigerator};
pub use row::{AllowedProductTypes, Row};
pub use sku::{Sku, SkuConstraints, BLANK_PRODUCT_TYPE};
pub use stack::Stack;
