//! Row extents and stack offsets within a door.
//!
//! Rows abut directly (no vertical gap) and stacks are separated by
//! [`STACK_GAP`] pixels, matching how the editor draws them.

use crate::models::{Row, RowConfig};
use crate::services::geometry::{stack_footprint_width, STACK_GAP};

/// Anything with shelf dimensions.
pub trait ShelfDimensions {
    /// Row id
    fn row_id(&self) -> &str;
    /// Maximum total width
    fn capacity(&self) -> f64;
    /// Maximum stack height
    fn max_height(&self) -> f64;
}

impl ShelfDimensions for Row {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn capacity(&self) -> f64 {
        self.capacity
    }

    fn max_height(&self) -> f64 {
        self.max_height
    }
}

impl ShelfDimensions for RowConfig {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn capacity(&self) -> f64 {
        self.capacity
    }

    fn max_height(&self) -> f64 {
        self.max_height
    }
}

/// Vertical extent of one row in door-relative layout pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RowExtent {
    /// Row id
    pub row_id: String,
    /// Top edge
    pub y_start: f64,
    /// Bottom edge
    pub y_end: f64,
    /// Row capacity
    pub capacity: f64,
    /// Row height limit
    pub max_height: f64,
}

/// Computes row extents for rows listed top to bottom.
///
/// Row 0 starts at `y = 0`; every following row starts where the previous ends.
pub fn compute_row_extents<R: ShelfDimensions>(rows: &[R]) -> Vec<RowExtent> {
    let mut y = 0.0;
    rows.iter()
        .map(|row| {
            let extent = RowExtent {
                row_id: row.row_id().to_string(),
                y_start: y,
                y_end: y + row.max_height(),
                capacity: row.capacity(),
                max_height: row.max_height(),
            };
            y = extent.y_end;
            extent
        })
        .collect()
}

/// X offset of every stack in a row, left to right.
///
/// Stack `k` starts at the summed footprints of stacks `0..k` plus `k` gaps.
pub fn stack_x_offsets(row: &Row) -> Vec<f64> {
    let mut x = 0.0;
    row.stacks
        .iter()
        .map(|stack| {
            let offset = x;
            x += stack_footprint_width(stack) + STACK_GAP;
            offset
        })
        .collect()
}
