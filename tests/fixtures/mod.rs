//! Shared test fixtures for library and CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use planogram::models::{LayoutData, MultiDoorRefrigerator, Refrigerator, Sku};
use planogram::services::mutator::{add_item, stack_item};
use planogram::services::{LayoutCatalog, PlacementFile};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Layout catalog with a single-door and a two-door cooler.
///
/// Door rows: `row-1` (capacity 200, max height 100, CAN only) above
/// `row-2` (capacity 200, max height 150, any type).
pub const LAYOUTS_JSON: &str = r#"[
  {
    "id": "single",
    "name": "Single door",
    "doors": [
      {
        "id": "door-1",
        "width": 200,
        "height": 250,
        "rows": [
          { "id": "row-1", "capacity": 200, "maxHeight": 100, "allowedProductTypes": ["CAN"] },
          { "id": "row-2", "capacity": 200, "maxHeight": 150, "allowedProductTypes": "all" }
        ]
      }
    ]
  },
  {
    "id": "double",
    "name": "Two doors",
    "doors": [
      {
        "id": "door-1",
        "width": 200,
        "height": 250,
        "rows": [
          { "id": "row-1", "capacity": 200, "maxHeight": 100, "allowedProductTypes": ["CAN"] },
          { "id": "row-2", "capacity": 200, "maxHeight": 150 }
        ]
      },
      {
        "id": "door-2",
        "width": 200,
        "height": 250,
        "rows": [
          { "id": "row-1", "capacity": 200, "maxHeight": 100, "allowedProductTypes": ["CAN"] },
          { "id": "row-2", "capacity": 200, "maxHeight": 150 }
        ]
      }
    ]
  }
]"#;

/// Parsed layout catalog.
pub fn layout_catalog() -> LayoutCatalog {
    let layouts: Vec<LayoutData> =
        serde_json::from_str(LAYOUTS_JSON).expect("Failed to parse layout fixture");
    LayoutCatalog::from_layouts(layouts).expect("Invalid layout fixture")
}

/// Catalog layout by id.
pub fn layout(layout_id: &str) -> LayoutData {
    layout_catalog()
        .get(layout_id)
        .cloned()
        .expect("Unknown layout fixture")
}

/// SKU sized directly in layout pixels.
pub fn sku(id: &str, product_type: &str, width: f64, height: f64) -> Sku {
    Sku::new(id, id, product_type, width, height, 1.0).expect("Invalid SKU fixture")
}

/// Empty single-door placement for the `single` layout.
pub fn empty_single() -> Refrigerator {
    layout("single")
        .instantiate_single()
        .expect("Failed to instantiate single-door fixture")
}

/// Empty placement for the `double` layout.
pub fn empty_double() -> MultiDoorRefrigerator {
    layout("double").instantiate_multi()
}

/// Single-door placement with a two-item stack in `row-1` and a spacer in `row-2`.
///
/// Returns the tree plus the ids of (bottom can, top can, spacer).
pub fn stacked_single() -> (Refrigerator, [String; 3]) {
    let can = sku("cola", "CAN", 40.0, 50.0).stackable(true);
    let placed = add_item(&empty_single(), &can, "row-1", None).expect("add can");
    let bottom = placed.item_id;

    let mut light = sku("cola-light", "CAN", 30.0, 30.0).stackable(true);
    light.name = "Cola Light".to_string();
    let placed = add_item(&placed.layout, &light, "row-1", None).expect("add light");
    let light_id = placed.item_id;
    let fridge = stack_item(&placed.layout, &light_id, &bottom)
        .expect("stack light onto can");

    let spacer = sku("blank", "BLANK", 20.0, 10.0);
    let placed = add_item(&fridge, &spacer, "row-2", None).expect("add spacer");

    (placed.layout, [bottom, light_id, placed.item_id])
}

/// Single-door placement whose only stack is taller than its row.
///
/// Built by editing the tree directly, since the mutator refuses it.
pub fn overfull_single() -> (Refrigerator, String) {
    let can = sku("tall", "CAN", 40.0, 60.0).stackable(true);
    let placed = add_item(&empty_single(), &can, "row-1", None).expect("add can");
    let id = placed.item_id;

    let mut fridge = placed.layout;
    let row = fridge.row_at_mut(0).expect("row-1");
    let copy = row.stacks[0].items[0].duplicate();
    row.stacks[0].items.push(copy);
    (fridge, id)
}

/// Writes `contents` to `name` inside a fresh temp dir.
pub fn write_temp(name: &str, contents: &str) -> (PathBuf, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("Failed to write temp file");
    (path, dir)
}

/// Writes the layout catalog into `dir`.
pub fn write_layouts(dir: &Path) -> PathBuf {
    let path = dir.join("layouts.json");
    fs::write(&path, LAYOUTS_JSON).expect("Failed to write layouts");
    path
}

/// Saves a placement into `dir`.
pub fn write_placement(dir: &Path, placement: &PlacementFile) -> PathBuf {
    let path = dir.join("placement.json");
    placement.save(&path).expect("Failed to save placement");
    path
}

/// Config path inside `dir` that does not exist yet, so defaults apply.
pub fn isolated_config(dir: &Path) -> PathBuf {
    dir.join("config.toml")
}
