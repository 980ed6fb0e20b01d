//! Backend export tree consumed by the product-recognition pipeline.
//!
//! The field names are a fixed wire format; do not rename them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Key under which every section is emitted, for single- and multi-door coolers alike.
pub const DOOR_KEY: &str = "Door-1";

/// Confidence reported for hand-placed products.
pub const MANUAL_CONFIDENCE: &str = "1.0";

/// A pixel coordinate pair `[x, y]`.
pub type Corner = [i64; 2];

/// Four corners in the fixed order top-left, bottom-left, bottom-right, top-right.
pub type Polygon = [Corner; 4];

/// Root of the export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendExport {
    /// Doors keyed by [`DOOR_KEY`]
    #[serde(rename = "Cooler")]
    pub cooler: BTreeMap<String, BackendDoor>,
    /// Overall cooler dimensions
    pub dimensions: BackendDimensions,
}

impl BackendExport {
    /// Sections of the shared door entry.
    pub fn sections(&self) -> &[BackendSection] {
        self.cooler
            .get(DOOR_KEY)
            .map_or(&[], |door| door.sections.as_slice())
    }

    /// Iterates front products and their stacked children, depth first.
    pub fn all_products(&self) -> impl Iterator<Item = &BackendProduct> {
        self.sections()
            .iter()
            .flat_map(|section| section.products.iter())
            .flat_map(|product| std::iter::once(product).chain(product.stacked.iter()))
    }
}

/// One exported door.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendDoor {
    /// Reserved, always empty
    pub data: Vec<Value>,
    /// One section per row
    #[serde(rename = "Sections")]
    pub sections: Vec<BackendSection>,
    /// Always true for generated layouts
    #[serde(rename = "Door-Visible")]
    pub door_visible: bool,
}

/// One exported row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSection {
    /// Reserved, always empty
    pub data: Vec<Value>,
    /// 1-based row number, offset by `door_index * 100` for multi-door coolers
    pub position: u32,
    /// One product per stack
    pub products: Vec<BackendProduct>,
}

/// One exported product with its absolute bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendProduct {
    /// Product display name
    pub product: String,
    /// Catalog SKU id
    #[serde(rename = "SKU-Code")]
    pub sku_code: String,
    /// Products stacked above this one, bottom first; empty for stacked children
    pub stacked: Vec<BackendProduct>,
    /// `"{section}-{stack}"` for front products, `"{section}-{stack}-{level}"` for stacked ones
    #[serde(rename = "Position")]
    pub position: String,
    /// Number of products stacked above the front product
    #[serde(rename = "stackSize")]
    pub stack_size: usize,
    /// Always [`MANUAL_CONFIDENCE`]
    #[serde(rename = "Confidence")]
    pub confidence: String,
    /// Corners in absolute pixels
    #[serde(rename = "Bounding-Box")]
    pub bounding_box: Polygon,
    /// Box width in pixels
    pub width: i64,
    /// Box height in pixels
    pub height: i64,
}

/// Overall dimensions of the exported cooler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendDimensions {
    /// Inner width (sum of door widths for multi-door coolers)
    pub width: i64,
    /// Inner height (tallest door for multi-door coolers)
    pub height: i64,
    /// Outer width including frames and door gaps
    #[serde(rename = "totalWidth", skip_serializing_if = "Option::is_none")]
    pub total_width: Option<i64>,
    /// Outer height including frame, header and grille
    #[serde(rename = "totalHeight", skip_serializing_if = "Option::is_none")]
    pub total_height: Option<i64>,
    /// Header height
    #[serde(rename = "headerHeight", skip_serializing_if = "Option::is_none")]
    pub header_height: Option<i64>,
    /// Grille height
    #[serde(rename = "grilleHeight", skip_serializing_if = "Option::is_none")]
    pub grille_height: Option<i64>,
    /// Frame border width
    #[serde(rename = "frameBorder", skip_serializing_if = "Option::is_none")]
    pub frame_border: Option<i64>,
    /// Scale applied to coordinates relative to on-screen layout pixels
    #[serde(rename = "BoundingBoxScale")]
    pub bounding_box_scale: f64,
}
