//! Geometry primitives shared by the exporter and the validator.
//!
//! Both call sites must count gaps with [`cumulative_row_width`]; any drift
//! between them makes exported coordinates disagree with validated capacity.

use crate::models::backend::Polygon;
use crate::models::{Row, Stack};

/// Horizontal gap between adjacent stacks, in layout pixels.
pub const STACK_GAP: f64 = 1.0;

/// Horizontal footprint of a stack: the widest member, 0 for an empty stack.
///
/// Items are centered within their stack, so the widest one determines the
/// slot width regardless of its position.
pub fn stack_footprint_width(stack: &Stack) -> f64 {
    stack
        .items
        .iter()
        .map(|item| item.width)
        .fold(0.0, f64::max)
}

/// Number of gaps between `count` stacks placed side by side.
pub fn gap_count(count: usize) -> usize {
    count.saturating_sub(1)
}

/// Total width of a row's stacks plus one gap between each remaining pair.
///
/// Stacks matched by `exclude` are left out entirely, including their gaps.
#[allow(clippy::cast_precision_loss)]
pub fn cumulative_row_width<F>(row: &Row, exclude: F) -> f64
where
    F: Fn(&Stack) -> bool,
{
    let (width, count) = row
        .stacks
        .iter()
        .filter(|stack| !exclude(stack))
        .fold((0.0, 0_usize), |(width, count), stack| {
            (width + stack_footprint_width(stack), count + 1)
        });

    width + gap_count(count) as f64 * STACK_GAP
}

/// Width a new stack occupies when appended to a row already `occupied` by stacks.
///
/// Adds the separating gap only when the row is not empty.
pub fn width_with_new_stack(occupied_width: f64, remaining_stacks: usize, new_width: f64) -> f64 {
    if remaining_stacks == 0 {
        new_width
    } else {
        occupied_width + STACK_GAP + new_width
    }
}

/// Edge coordinates of an item before rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edges {
    /// Left edge
    pub left: f64,
    /// Top edge
    pub top: f64,
    /// Right edge
    pub right: f64,
    /// Bottom edge
    pub bottom: f64,
}

impl Edges {
    /// Builds edges from a bottom-left anchor and a size.
    pub fn from_bottom_left(left: f64, bottom: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top: bottom - height,
            right: left + width,
            bottom,
        }
    }

    /// Shifts every edge by the given offsets.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }
}

/// Integer bounding box covering a set of edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    /// Left edge, floored
    pub left: i64,
    /// Top edge, floored
    pub top: i64,
    /// Right edge, ceiled
    pub right: i64,
    /// Bottom edge, ceiled
    pub bottom: i64,
}

impl PixelBox {
    /// Rounds left/top down and right/bottom up so the box always covers the item.
    ///
    /// Symmetric rounding lets boxes creep upward over many stacked rows.
    #[allow(clippy::cast_possible_truncation)]
    pub fn covering(edges: Edges) -> Self {
        Self {
            left: edges.left.floor() as i64,
            top: edges.top.floor() as i64,
            right: edges.right.ceil() as i64,
            bottom: edges.bottom.ceil() as i64,
        }
    }

    /// Box width.
    pub const fn width(&self) -> i64 {
        self.right - self.left
    }

    /// Box height.
    pub const fn height(&self) -> i64 {
        self.bottom - self.top
    }

    /// Corners in the order top-left, bottom-left, bottom-right, top-right.
    pub const fn corners(&self) -> Polygon {
        [
            [self.left, self.top],
            [self.left, self.bottom],
            [self.right, self.bottom],
            [self.right, self.top],
        ]
    }
}
