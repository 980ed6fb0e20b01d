//! Catalog and placement file I/O.
//!
//! All files are JSON. The SKU catalog and the layout catalog are arrays;
//! placement files hold either a single-door tree (`{"rows": [...]}`) or a
//! multi-door tree (`{"doors": [...]}`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::models::{LayoutData, MultiDoorRefrigerator, Refrigerator, Sku};

/// SKU catalog keyed by SKU id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkuCatalog {
    skus: BTreeMap<String, Sku>,
}

impl SkuCatalog {
    /// Builds a catalog, validating every entry and rejecting duplicate ids.
    pub fn from_skus(skus: Vec<Sku>) -> Result<Self> {
        let mut catalog = BTreeMap::new();
        for sku in skus {
            sku.validate()?;
            if catalog.contains_key(&sku.id) {
                anyhow::bail!("Duplicate SKU id '{}' in catalog", sku.id);
            }
            catalog.insert(sku.id.clone(), sku);
        }
        Ok(Self { skus: catalog })
    }

    /// Loads a catalog from a JSON array of SKUs.
    pub fn load(path: &Path) -> Result<Self> {
        let skus: Vec<Sku> = read_json(path, "SKU catalog")?;
        Self::from_skus(skus)
            .with_context(|| format!("Invalid SKU catalog: {}", path.display()))
    }

    /// SKU by id.
    pub fn get(&self, sku_id: &str) -> Option<&Sku> {
        self.skus.get(sku_id)
    }

    /// Iterates SKUs ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Sku> {
        self.skus.values()
    }

    /// Number of SKUs.
    pub fn len(&self) -> usize {
        self.skus.len()
    }

    /// Returns true if the catalog holds no SKUs.
    pub fn is_empty(&self) -> bool {
        self.skus.is_empty()
    }
}

/// Layout catalog in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutCatalog {
    layouts: Vec<LayoutData>,
}

impl LayoutCatalog {
    /// Builds a catalog, validating every layout and rejecting duplicate ids.
    pub fn from_layouts(layouts: Vec<LayoutData>) -> Result<Self> {
        for (idx, layout) in layouts.iter().enumerate() {
            layout.validate()?;
            if layouts[..idx].iter().any(|other| other.id == layout.id) {
                anyhow::bail!("Duplicate layout id '{}' in catalog", layout.id);
            }
        }
        Ok(Self { layouts })
    }

    /// Loads a catalog from a JSON array of layouts.
    pub fn load(path: &Path) -> Result<Self> {
        let layouts: Vec<LayoutData> = read_json(path, "layout catalog")?;
        Self::from_layouts(layouts)
            .with_context(|| format!("Invalid layout catalog: {}", path.display()))
    }

    /// Layout by id.
    pub fn get(&self, layout_id: &str) -> Option<&LayoutData> {
        self.layouts.iter().find(|layout| layout.id == layout_id)
    }

    /// Layout by id, as an error when missing.
    pub fn require(&self, layout_id: &str) -> Result<&LayoutData> {
        self.get(layout_id).with_context(|| {
            let known: Vec<&str> = self.layouts.iter().map(|l| l.id.as_str()).collect();
            format!(
                "Layout '{}' not found in catalog (available: {})",
                layout_id,
                known.join(", ")
            )
        })
    }

    /// Iterates layouts in file order.
    pub fn iter(&self) -> impl Iterator<Item = &LayoutData> {
        self.layouts.iter()
    }
}

/// A saved placement tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlacementFile {
    /// One door
    Single(Refrigerator),
    /// Several doors, left to right
    Multi(MultiDoorRefrigerator),
}

impl PlacementFile {
    /// Loads a placement tree from JSON.
    pub fn load(path: &Path) -> Result<Self> {
        read_json(path, "placement file")
    }

    /// Saves a placement tree as pretty-printed JSON.
    ///
    /// Writes to a temp file first and renames it over the target, so the
    /// target is never left half-written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize placement")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = path.with_extension("json.tmp");
        let mut temp_file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
        temp_file
            .write_all(json.as_bytes())
            .context("Failed to write placement")?;
        temp_file.sync_all().context("Failed to sync placement file")?;
        drop(temp_file);

        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to save placement to {}", path.display()))?;

        Ok(())
    }

    /// Returns true for multi-door trees.
    pub const fn is_multi_door(&self) -> bool {
        matches!(self, Self::Multi(_))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what}: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {what}: {}", path.display()))
}
