//! Lists where an existing item's stack may be moved or merged.

use crate::cli::common::{load_config, print_json, CliError, CliResult};
use crate::services::{
    compute_valid_targets, compute_valid_targets_multi, PlacementCandidate, PlacementFile,
};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Show valid drop targets for an item
#[derive(Debug, Clone, Args)]
pub struct TargetsArgs {
    /// Path to the placement JSON
    #[arg(short, long, value_name = "FILE")]
    pub placement: PathBuf,

    /// Instance id of any item in the stack being moved
    #[arg(long, value_name = "ID")]
    pub item: String,

    /// Ignore capacity, height and product-type rules
    #[arg(long)]
    pub rules_off: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Configuration file (defaults to the platform config file)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Rows and stacks accepting the item's stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetsReport {
    /// Item the query was made for
    pub item_id: String,
    /// Whether placement rules were applied
    pub rules_enabled: bool,
    /// Rows the stack may move to
    pub rows: Vec<RowTarget>,
    /// Front-item ids of stacks the item may be merged onto
    pub stack_targets: Vec<String>,
}

/// One accepting row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowTarget {
    /// Door id, for multi-door placements
    #[serde(skip_serializing_if = "Option::is_none")]
    pub door_id: Option<String>,
    /// Row id
    pub row_id: String,
}

impl TargetsArgs {
    /// Execute the targets command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config(self.config.as_deref())?;
        let placement = PlacementFile::load(&self.placement)
            .map_err(|e| CliError::io(format!("Failed to load placement: {e:#}")))?;

        let rules_enabled = config.editor.rules_enabled && !self.rules_off;
        let report = find_targets(&placement, &self.item, rules_enabled)?;

        if self.json {
            print_json(&report)?;
        } else {
            println!(
                "Targets for {} (rules {})",
                report.item_id,
                if report.rules_enabled { "on" } else { "off" }
            );
            println!("\nRows:");
            if report.rows.is_empty() {
                println!("  (none)");
            }
            for row in &report.rows {
                match &row.door_id {
                    Some(door) => println!("  {door} / {}", row.row_id),
                    None => println!("  {}", row.row_id),
                }
            }
            println!("\nStack onto:");
            if report.stack_targets.is_empty() {
                println!("  (none)");
            }
            for id in &report.stack_targets {
                println!("  {id}");
            }
        }

        Ok(())
    }
}

/// Computes the targets for the stack holding `item_id`.
pub fn find_targets(
    placement: &PlacementFile,
    item_id: &str,
    rules_enabled: bool,
) -> CliResult<TargetsReport> {
    let not_found = || CliError::validation(format!("Item '{item_id}' not found in placement"));

    let (rows, stack_targets) = match placement {
        PlacementFile::Single(fridge) => {
            let loc = fridge.locate(item_id).ok_or_else(not_found)?;
            let stack = fridge
                .row_at(loc.row)
                .map(|row| &row.stacks[loc.stack])
                .ok_or_else(not_found)?;
            let candidate = PlacementCandidate::for_stack(stack).ok_or_else(not_found)?;
            let targets = compute_valid_targets(&candidate, fridge, rules_enabled);
            let rows = targets
                .valid_row_ids
                .into_iter()
                .map(|row_id| RowTarget {
                    door_id: None,
                    row_id,
                })
                .collect();
            (rows, targets.valid_stack_target_ids)
        }
        PlacementFile::Multi(multi) => {
            let (door, loc) = multi.locate(item_id).ok_or_else(not_found)?;
            let stack = multi.doors[door]
                .refrigerator
                .row_at(loc.row)
                .map(|row| &row.stacks[loc.stack])
                .ok_or_else(not_found)?;
            let candidate = PlacementCandidate::for_stack(stack).ok_or_else(not_found)?;
            let targets = compute_valid_targets_multi(&candidate, multi, rules_enabled);
            let rows = targets
                .valid_rows
                .into_iter()
                .map(|target| RowTarget {
                    door_id: Some(target.door_id),
                    row_id: target.row_id,
                })
                .collect();
            (rows, targets.valid_stack_target_ids)
        }
    };

    Ok(TargetsReport {
        item_id: item_id.to_string(),
        rules_enabled,
        rows,
        stack_targets,
    })
}
