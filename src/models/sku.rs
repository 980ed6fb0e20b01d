//! SKU catalog templates.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Product type tag reserved for spacer elements.
///
/// BLANK items are admitted into every row regardless of its allow-list,
/// fill the full row height and can be resized horizontally.
pub const BLANK_PRODUCT_TYPE: &str = "BLANK";

/// Placement constraints attached to a SKU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkuConstraints {
    /// Whether further items may be stacked on top of this product
    pub stackable: bool,
    /// Whether the product may be removed from the layout
    pub deletable: bool,
}

impl Default for SkuConstraints {
    fn default() -> Self {
        Self {
            stackable: false,
            deletable: true,
        }
    }
}

/// Catalog template for one product.
///
/// SKUs are immutable once loaded; placed instances are [`Item`](crate::models::Item)s.
///
/// # Validation
///
/// - id must be non-empty
/// - pixel width and height must be strictly positive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sku {
    /// Stable catalog identifier (exported as `SKU-Code`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Nominal width in millimeters
    pub width_mm: f64,
    /// Nominal height in millimeters
    pub height_mm: f64,
    /// Rendered width in layout pixels
    pub width: f64,
    /// Rendered height in layout pixels
    pub height: f64,
    /// Image reference used by the editor
    #[serde(default)]
    pub image_url: String,
    /// Free-form category tag (e.g. "CAN", "PET", "BLANK")
    pub product_type: String,
    /// Placement constraints
    #[serde(default)]
    pub constraints: SkuConstraints,
}

impl Sku {
    /// Creates a new SKU, deriving pixel dimensions from millimeters.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        product_type: impl Into<String>,
        width_mm: f64,
        height_mm: f64,
        pixels_per_mm: f64,
    ) -> Result<Self> {
        let sku = Self {
            id: id.into(),
            name: name.into(),
            width_mm,
            height_mm,
            width: width_mm * pixels_per_mm,
            height: height_mm * pixels_per_mm,
            image_url: String::new(),
            product_type: product_type.into(),
            constraints: SkuConstraints::default(),
        };
        sku.validate()?;
        Ok(sku)
    }

    /// Sets the placement constraints.
    #[must_use]
    pub const fn with_constraints(mut self, constraints: SkuConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Sets the stackable flag.
    #[must_use]
    pub const fn stackable(mut self, stackable: bool) -> Self {
        self.constraints.stackable = stackable;
        self
    }

    /// Returns true for spacer SKUs.
    pub fn is_blank(&self) -> bool {
        self.product_type == BLANK_PRODUCT_TYPE
    }

    /// Validates catalog invariants.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            anyhow::bail!("SKU id cannot be empty");
        }

        if self.width <= 0.0 || self.height <= 0.0 {
            anyhow::bail!(
                "SKU '{}' must have positive pixel dimensions (got {}x{})",
                self.id,
                self.width,
                self.height
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_pixels() {
        let sku = Sku::new("cola-330", "Cola 330ml", "CAN", 66.0, 115.0, 0.5).unwrap();
        assert!((sku.width - 33.0).abs() < f64::EPSILON);
        assert!((sku.height - 57.5).abs() < f64::EPSILON);
        assert!(!sku.is_blank());
        assert!(sku.constraints.deletable);
        assert!(!sku.constraints.stackable);
    }

    #[test]
    fn test_new_rejects_degenerate() {
        assert!(Sku::new("", "x", "CAN", 10.0, 10.0, 1.0).is_err());
        assert!(Sku::new("a", "x", "CAN", 0.0, 10.0, 1.0).is_err());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": "blank-50",
            "name": "Spacer",
            "widthMm": 50,
            "heightMm": 10,
            "width": 20,
            "height": 4,
            "productType": "BLANK",
            "constraints": { "stackable": false, "deletable": true }
        }"#;
        let sku: Sku = serde_json::from_str(json).unwrap();
        assert!(sku.is_blank());
        assert_eq!(sku.image_url, "");
    }
}
