//! Placed product instances.

use crate::models::sku::{Sku, SkuConstraints, BLANK_PRODUCT_TYPE};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One physical instance of a SKU placed into a layout.
///
/// Carries a copy of the SKU fields so that exports and validation never need
/// a catalog lookup. Width and height may diverge from the SKU for BLANK
/// spacers (width is user-adjustable, height follows the row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Globally unique instance id
    pub id: String,
    /// Catalog SKU id
    pub sku_id: String,
    /// Display name
    pub name: String,
    /// Product type tag
    pub product_type: String,
    /// Rendered width in layout pixels
    pub width: f64,
    /// Rendered height in layout pixels
    pub height: f64,
    /// Nominal width in millimeters
    pub width_mm: f64,
    /// Nominal height in millimeters
    pub height_mm: f64,
    /// Image reference
    #[serde(default)]
    pub image_url: String,
    /// Placement constraints copied from the SKU
    #[serde(default)]
    pub constraints: SkuConstraints,
    /// Canonical spacer width in millimeters (BLANK only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_width_mm: Option<f64>,
}

impl Item {
    /// Creates a fresh instance of a SKU with a new instance id.
    pub fn from_sku(sku: &Sku) -> Self {
        Self {
            id: generate_instance_id(&sku.id),
            sku_id: sku.id.clone(),
            name: sku.name.clone(),
            product_type: sku.product_type.clone(),
            width: sku.width,
            height: sku.height,
            width_mm: sku.width_mm,
            height_mm: sku.height_mm,
            image_url: sku.image_url.clone(),
            constraints: sku.constraints,
            custom_width_mm: sku.is_blank().then_some(sku.width_mm),
        }
    }

    /// Creates an instance sized for a row; BLANK spacers take the full row height.
    pub fn for_row(sku: &Sku, row_max_height: f64) -> Self {
        let mut item = Self::from_sku(sku);
        if item.is_blank() {
            item.height = row_max_height;
        }
        item
    }

    /// Clones this item under a new instance id.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: generate_instance_id(&self.sku_id),
            ..self.clone()
        }
    }

    /// Returns true for spacer items.
    pub fn is_blank(&self) -> bool {
        self.product_type == BLANK_PRODUCT_TYPE
    }

    /// Returns true if other items may be stacked on this one.
    pub const fn is_stackable(&self) -> bool {
        self.constraints.stackable
    }
}

/// Builds an instance id from the SKU id, the current time and a random suffix.
///
/// Format: `{sku_id}-{unix_millis}-{8 hex chars}`.
pub fn generate_instance_id(sku_id: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        sku_id,
        Utc::now().timestamp_millis(),
        &suffix[..8]
    )
}
