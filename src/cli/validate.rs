//! Validation command for placement files.

use crate::cli::common::{print_json, CliError, CliResult};
use crate::models::{LayoutData, MultiDoorRefrigerator, Refrigerator};
use crate::services::validator::{row_overflows, scan_conflicts};
use crate::services::{LayoutCatalog, PlacementFile};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Check a placement for rule conflicts and overfull rows
#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Path to the placement JSON
    #[arg(short, long, value_name = "FILE")]
    pub placement: PathBuf,

    /// Layout catalog whose current row rules replace the saved ones
    #[arg(long, value_name = "FILE", requires = "layout_id")]
    pub layouts: Option<PathBuf>,

    /// Catalog id of the cooler layout
    #[arg(long, value_name = "ID", requires = "layouts")]
    pub layout_id: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Validation outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// True when there are neither conflicts nor overfull rows
    pub valid: bool,
    /// Items breaking a row rule
    pub conflicts: Vec<ConflictEntry>,
    /// Rows wider than their capacity
    pub overflows: Vec<OverflowEntry>,
}

/// One conflicting item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    door_id: Option<String>,
    row_id: String,
    item_id: String,
    reason: String,
}

/// One overfull row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverflowEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    door_id: Option<String>,
    row_id: String,
    used_width: f64,
    capacity: f64,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> CliResult<()> {
        let placement = PlacementFile::load(&self.placement)
            .map_err(|e| CliError::io(format!("Failed to load placement: {e:#}")))?;

        let placement = match (&self.layouts, &self.layout_id) {
            (Some(path), Some(layout_id)) => {
                let catalog = LayoutCatalog::load(path)
                    .map_err(|e| CliError::io(format!("Failed to load layouts: {e:#}")))?;
                let layout = catalog
                    .require(layout_id)
                    .map_err(|e| CliError::validation(format!("{e:#}")))?;
                apply_catalog_rules(&placement, layout)
            }
            _ => placement,
        };

        let report = build_report(&placement);

        if self.json {
            print_json(&report)?;
        } else {
            print_report(&report);
        }

        if !report.valid {
            return Err(CliError::validation("Validation failed"));
        }

        Ok(())
    }
}

/// Replaces saved row limits with the catalog's current ones.
pub fn apply_catalog_rules(placement: &PlacementFile, layout: &LayoutData) -> PlacementFile {
    match placement {
        PlacementFile::Single(fridge) => match layout.doors.first() {
            Some(door) => PlacementFile::Single(door.apply_rules(fridge)),
            None => placement.clone(),
        },
        PlacementFile::Multi(multi) => {
            let mut next = multi.clone();
            for door in &mut next.doors {
                if let Some(config) = layout.doors.iter().find(|config| config.id == door.id) {
                    door.refrigerator = config.apply_rules(&door.refrigerator);
                }
            }
            PlacementFile::Multi(next)
        }
    }
}

/// Collects conflicts and overflows for every door.
pub fn build_report(placement: &PlacementFile) -> ValidationReport {
    let mut conflicts = Vec::new();
    let mut overflows = Vec::new();

    match placement {
        PlacementFile::Single(fridge) => collect(fridge, None, &mut conflicts, &mut overflows),
        PlacementFile::Multi(MultiDoorRefrigerator { doors }) => {
            for door in doors {
                collect(
                    &door.refrigerator,
                    Some(&door.id),
                    &mut conflicts,
                    &mut overflows,
                );
            }
        }
    }

    ValidationReport {
        valid: conflicts.is_empty() && overflows.is_empty(),
        conflicts,
        overflows,
    }
}

fn collect(
    fridge: &Refrigerator,
    door_id: Option<&str>,
    conflicts: &mut Vec<ConflictEntry>,
    overflows: &mut Vec<OverflowEntry>,
) {
    conflicts.extend(scan_conflicts(fridge).into_iter().map(|conflict| ConflictEntry {
        door_id: door_id.map(str::to_string),
        row_id: conflict.row_id,
        item_id: conflict.item_id,
        reason: conflict.kind.to_string(),
    }));
    overflows.extend(row_overflows(fridge).into_iter().map(|overflow| OverflowEntry {
        door_id: door_id.map(str::to_string),
        row_id: overflow.row_id,
        used_width: overflow.used_width,
        capacity: overflow.capacity,
    }));
}

fn print_report(report: &ValidationReport) {
    if report.valid {
        println!("✓ Validation passed");
        return;
    }

    println!("✗ Validation failed");

    if !report.conflicts.is_empty() {
        println!("\nConflicts:");
        for entry in &report.conflicts {
            match &entry.door_id {
                Some(door) => println!(
                    "  ✗ [{} / {}] {}: {}",
                    door, entry.row_id, entry.item_id, entry.reason
                ),
                None => println!("  ✗ [{}] {}: {}", entry.row_id, entry.item_id, entry.reason),
            }
        }
    }

    if !report.overflows.is_empty() {
        println!("\nOverfull rows:");
        for entry in &report.overflows {
            let location = entry
                .door_id
                .as_ref()
                .map_or_else(|| entry.row_id.clone(), |door| format!("{door} / {}", entry.row_id));
            println!(
                "  ⚠ [{}] uses {:.1}px of {:.1}px",
                location, entry.used_width, entry.capacity
            );
        }
    }
}
