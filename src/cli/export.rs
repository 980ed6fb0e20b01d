//! Export command producing backend bounding-box JSON.

use crate::cli::common::{load_config, print_json, CliError, CliResult};
use crate::config::RenderConfig;
use crate::models::{BackendExport, LayoutData};
use crate::services::{
    export_multi_door, export_single_door, scale_backend, LayoutCatalog, PlacementFile,
};
use clap::Args;
use std::fs;
use std::path::PathBuf;

/// Export a placement as backend bounding-box JSON
#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// Path to the layout catalog JSON
    #[arg(long, value_name = "FILE")]
    pub layouts: PathBuf,

    /// Catalog id of the cooler layout
    #[arg(long, value_name = "ID")]
    pub layout_id: String,

    /// Path to the placement JSON
    #[arg(short, long, value_name = "FILE")]
    pub placement: PathBuf,

    /// Scale coordinates to captured-image resolution using the configured pixel ratio
    #[arg(long)]
    pub scaled: bool,

    /// Explicit pixel ratio (implies --scaled)
    #[arg(long, value_name = "RATIO")]
    pub pixel_ratio: Option<f64>,

    /// Output path (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Configuration file (defaults to the platform config file)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ExportArgs {
    /// Execute the export command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config(self.config.as_deref())?;

        let catalog = LayoutCatalog::load(&self.layouts)
            .map_err(|e| CliError::io(format!("Failed to load layouts: {e:#}")))?;
        let layout = catalog
            .require(&self.layout_id)
            .map_err(|e| CliError::validation(format!("{e:#}")))?;

        let placement = PlacementFile::load(&self.placement)
            .map_err(|e| CliError::io(format!("Failed to load placement: {e:#}")))?;

        let mut export = build_export(layout, &placement, &config.render)?;

        let ratio = self
            .pixel_ratio
            .or_else(|| self.scaled.then_some(config.export.pixel_ratio));
        if let Some(ratio) = ratio {
            if ratio <= 0.0 || !ratio.is_finite() {
                return Err(CliError::validation(format!(
                    "Pixel ratio must be a positive number (got {ratio})"
                )));
            }
            export = scale_backend(&export, ratio);
        }

        match &self.output {
            Some(path) => {
                let json = serde_json::to_string_pretty(&export)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
                fs::write(path, json)
                    .map_err(|e| CliError::io(format!("Failed to write output file: {e}")))?;
                println!("✓ Exported {} products to: {}", export.all_products().count(), path.display());
            }
            None => print_json(&export)?,
        }

        Ok(())
    }
}

/// Exports a placement against its catalog layout.
///
/// A single-door placement needs a single-door layout and vice versa.
pub fn build_export(
    layout: &LayoutData,
    placement: &PlacementFile,
    render: &RenderConfig,
) -> CliResult<BackendExport> {
    match placement {
        PlacementFile::Single(fridge) => {
            if layout.is_multi_door() {
                return Err(CliError::validation(format!(
                    "Placement has one door but layout '{}' defines {}",
                    layout.id,
                    layout.doors.len()
                )));
            }
            let door = layout.doors.first().ok_or_else(|| {
                CliError::validation(format!("Layout '{}' defines no doors", layout.id))
            })?;
            Ok(export_single_door(fridge, door, render))
        }
        PlacementFile::Multi(fridge) => Ok(export_multi_door(fridge, layout, render)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MultiDoorRefrigerator, Refrigerator};

    fn layout(doors: usize) -> LayoutData {
        let doors: Vec<String> = (0..doors)
            .map(|idx| {
                format!(
                    r#"{{"id": "door-{idx}", "width": 300, "height": 250,
                        "rows": [{{"id": "row-1", "capacity": 300, "maxHeight": 100}}]}}"#
                )
            })
            .collect();
        serde_json::from_str(&format!(
            r#"{{"id": "l", "name": "L", "doors": [{}]}}"#,
            doors.join(",")
        ))
        .unwrap()
    }

    #[test]
    fn test_single_placement_needs_single_door_layout() {
        let placement = PlacementFile::Single(Refrigerator::default());
        let render = RenderConfig::default();

        assert!(build_export(&layout(1), &placement, &render).is_ok());

        let err = build_export(&layout(2), &placement, &render).unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(err.message.contains("defines 2"));
    }

    #[test]
    fn test_multi_placement_exports_every_door() {
        let layout = layout(2);
        let placement = PlacementFile::Multi(layout.instantiate_multi());
        let export = build_export(&layout, &placement, &RenderConfig::default()).unwrap();
        assert_eq!(export.dimensions.width, 600);

        let empty = PlacementFile::Multi(MultiDoorRefrigerator::default());
        assert!(build_export(&layout, &empty, &RenderConfig::default()).is_ok());
    }
}
