//! Static layout catalog entries.

use crate::models::refrigerator::{Door, MultiDoorRefrigerator, Refrigerator};
use crate::models::row::{AllowedProductTypes, Row};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Shelf dimensions as defined by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowConfig {
    /// Row id
    pub id: String,
    /// Maximum total width in layout pixels
    pub capacity: f64,
    /// Maximum stack height in layout pixels
    pub max_height: f64,
    /// Admitted product types
    #[serde(default)]
    pub allowed_product_types: AllowedProductTypes,
}

impl RowConfig {
    /// Builds an empty editable row from this definition.
    pub fn to_row(&self) -> Row {
        Row::new(self.id.clone(), self.capacity, self.max_height)
            .with_allowed(self.allowed_product_types.clone())
    }
}

/// One door of a catalog layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoorConfig {
    /// Door id
    pub id: String,
    /// Inner width in layout pixels
    pub width: f64,
    /// Inner height in layout pixels
    pub height: f64,
    /// Rows, top to bottom
    pub rows: Vec<RowConfig>,
}

impl DoorConfig {
    /// Row definition by id.
    pub fn row(&self, row_id: &str) -> Option<&RowConfig> {
        self.rows.iter().find(|row| row.id == row_id)
    }

    /// Builds an empty editable refrigerator for this door.
    pub fn instantiate(&self) -> Refrigerator {
        Refrigerator::new(self.rows.iter().map(RowConfig::to_row).collect())
    }

    /// Copies this door's current row limits onto a saved tree.
    ///
    /// Rows unknown to the catalog keep their saved limits. Only rows whose
    /// limits actually change are cloned.
    pub fn apply_rules(&self, fridge: &Refrigerator) -> Refrigerator {
        let mut next = fridge.clone();
        for idx in 0..fridge.row_count() {
            let Some(config) = fridge.row_at(idx).and_then(|row| self.row(&row.id)) else {
                continue;
            };
            #[allow(clippy::float_cmp)]
            let unchanged = fridge.row_at(idx).is_some_and(|row| {
                row.capacity == config.capacity
                    && row.max_height == config.max_height
                    && row.allowed_product_types == config.allowed_product_types
            });
            if unchanged {
                continue;
            }
            if let Some(row) = next.row_at_mut(idx) {
                row.capacity = config.capacity;
                row.max_height = config.max_height;
                row.allowed_product_types = config.allowed_product_types.clone();
            }
        }
        next
    }
}

/// Catalog layout template.
///
/// # Validation
///
/// - at least one door
/// - door ids unique; row ids unique within a door
/// - capacities and heights strictly positive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutData {
    /// Catalog id
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Doors, left to right
    pub doors: Vec<DoorConfig>,
}

impl LayoutData {
    /// Returns true when the layout has more than one door.
    pub fn is_multi_door(&self) -> bool {
        self.doors.len() > 1
    }

    /// Seeds an editable single-door layout from the first door.
    pub fn instantiate_single(&self) -> Result<Refrigerator> {
        let door = self
            .doors
            .first()
            .ok_or_else(|| anyhow::anyhow!("Layout '{}' defines no doors", self.id))?;
        Ok(door.instantiate())
    }

    /// Seeds an editable multi-door layout.
    pub fn instantiate_multi(&self) -> MultiDoorRefrigerator {
        MultiDoorRefrigerator::new(
            self.doors
                .iter()
                .map(|door| Door {
                    id: door.id.clone(),
                    width: door.width,
                    height: door.height,
                    refrigerator: door.instantiate(),
                })
                .collect(),
        )
    }

    /// Validates catalog invariants.
    pub fn validate(&self) -> Result<()> {
        if self.doors.is_empty() {
            anyhow::bail!("Layout '{}' must define at least one door", self.id);
        }

        let mut door_ids = HashSet::new();
        for door in &self.doors {
            if !door_ids.insert(door.id.as_str()) {
                anyhow::bail!("Layout '{}' has duplicate door id '{}'", self.id, door.id);
            }

            let mut row_ids = HashSet::new();
            for row in &door.rows {
                if !row_ids.insert(row.id.as_str()) {
                    anyhow::bail!(
                        "Door '{}' of layout '{}' has duplicate row id '{}'",
                        door.id,
                        self.id,
                        row.id
                    );
                }
                if row.capacity <= 0.0 || row.max_height <= 0.0 {
                    anyhow::bail!(
                        "Row '{}' must have positive capacity and max height",
                        row.id
                    );
                }
            }
        }

        Ok(())
    }
}
