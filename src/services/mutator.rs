//! Placement state transitions.
//!
//! Every operation takes the current tree by reference and returns a new
//! tree; the input is never modified. Rows that an operation does not touch
//! are shared between both snapshots. A rejected operation returns a
//! [`PlacementError`] and the caller keeps its current tree.
//!
//! Moves and merges do not re-check capacity; callers consult
//! [`crate::services::validator`] before invoking them.

use std::fmt;

use tracing::debug;

use crate::config::RenderConfig;
use crate::models::{Item, MultiDoorRefrigerator, Refrigerator, Row, Sku, Stack};
use crate::services::geometry::{
    cumulative_row_width, stack_footprint_width, width_with_new_stack,
};
use crate::services::validator::fits;

/// Narrowest spacer width in millimeters.
pub const MIN_BLANK_WIDTH_MM: f64 = 25.0;

/// Spacer widths snap to multiples of this many millimeters.
pub const BLANK_WIDTH_STEP_MM: f64 = 5.0;

/// Reason a placement operation was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementError {
    /// No row with this id
    RowNotFound {
        /// Requested row id
        row_id: String,
    },
    /// No door with this id
    DoorNotFound {
        /// Requested door id
        door_id: String,
    },
    /// No item with this instance id
    ItemNotFound {
        /// Requested item id
        item_id: String,
    },
    /// The row would become wider than its capacity
    ExceedsCapacity {
        /// Width the row would need
        required: f64,
        /// Row capacity
        capacity: f64,
    },
    /// The stack would become taller than the row allows
    ExceedsHeight {
        /// Height the stack would need
        required: f64,
        /// Row height limit
        max_height: f64,
    },
    /// The row does not admit this product type
    ProductTypeNotAllowed {
        /// Rejected product type
        product_type: String,
        /// Target row id
        row_id: String,
    },
    /// Nothing may be stacked with this item
    NotStackable {
        /// Item id
        item_id: String,
    },
    /// Only spacer items can be resized
    NotBlank {
        /// Item id
        item_id: String,
    },
    /// Only a stack holding exactly one item can be merged onto another
    NotSingleItem {
        /// Item id
        item_id: String,
    },
    /// Source and target are in different rows
    DifferentRows,
    /// Source and target are behind different doors
    DifferentDoors,
    /// Source and target are the same stack
    SameStack,
    /// Stack index outside the row
    StackIndexOutOfRange {
        /// Row id
        row_id: String,
        /// Requested index
        index: usize,
    },
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowNotFound { row_id } => write!(f, "Row '{row_id}' not found"),
            Self::DoorNotFound { door_id } => write!(f, "Door '{door_id}' not found"),
            Self::ItemNotFound { item_id } => write!(f, "Item '{item_id}' not found"),
            Self::ExceedsCapacity { required, capacity } => write!(
                f,
                "Not enough space in row: needs {required:.1}px, capacity is {capacity:.1}px"
            ),
            Self::ExceedsHeight {
                required,
                max_height,
            } => write!(
                f,
                "Stack too tall: needs {required:.1}px, row allows {max_height:.1}px"
            ),
            Self::ProductTypeNotAllowed {
                product_type,
                row_id,
            } => write!(f, "Product type '{product_type}' is not allowed in row '{row_id}'"),
            Self::NotStackable { item_id } => write!(f, "Item '{item_id}' is not stackable"),
            Self::NotBlank { item_id } => {
                write!(f, "Item '{item_id}' is not a spacer and cannot be resized")
            }
            Self::NotSingleItem { item_id } => {
                write!(f, "Item '{item_id}' is part of a stack and cannot be merged")
            }
            Self::DifferentRows => write!(f, "Items can only be stacked within the same row"),
            Self::DifferentDoors => write!(f, "Items can only be stacked within the same door"),
            Self::SameStack => write!(f, "Cannot stack an item onto its own stack"),
            Self::StackIndexOutOfRange { row_id, index } => {
                write!(f, "Row '{row_id}' has no stack at index {index}")
            }
        }
    }
}

impl std::error::Error for PlacementError {}

/// Result type for placement operations.
pub type PlacementResult<T> = Result<T, PlacementError>;

/// A new tree together with the instance id the operation created.
#[derive(Debug, Clone, PartialEq)]
pub struct Placed<L> {
    /// Tree after the operation
    pub layout: L,
    /// Instance id of the created item
    pub item_id: String,
}

fn reject<T>(operation: &'static str, error: PlacementError) -> PlacementResult<T> {
    debug!(operation, %error, "placement rejected");
    Err(error)
}

fn row_not_found(row_id: &str) -> PlacementError {
    PlacementError::RowNotFound {
        row_id: row_id.to_string(),
    }
}

fn item_not_found(item_id: &str) -> PlacementError {
    PlacementError::ItemNotFound {
        item_id: item_id.to_string(),
    }
}

/// Width check for a stack of `footprint` placed among a row's other stacks.
fn check_capacity(row: &Row, own_stack: Option<usize>, footprint: f64) -> PlacementResult<()> {
    let others = row.stacks.len() - usize::from(own_stack.is_some());
    let occupied = cumulative_row_width(row, |stack| {
        own_stack.is_some_and(|idx| std::ptr::eq(stack, &row.stacks[idx]))
    });
    let required = width_with_new_stack(occupied, others, footprint);

    if fits(required, row.capacity) {
        Ok(())
    } else {
        Err(PlacementError::ExceedsCapacity {
            required,
            capacity: row.capacity,
        })
    }
}

fn check_height(row: &Row, required: f64) -> PlacementResult<()> {
    if fits(required, row.max_height) {
        Ok(())
    } else {
        Err(PlacementError::ExceedsHeight {
            required,
            max_height: row.max_height,
        })
    }
}

/// Adds a new instance of `sku` as a single-item stack.
///
/// Inserted at `index` (clamped to the row) or appended. BLANK spacers take
/// the row's full height.
pub fn add_item(
    layout: &Refrigerator,
    sku: &Sku,
    row_id: &str,
    index: Option<usize>,
) -> PlacementResult<Placed<Refrigerator>> {
    let Some(row_idx) = layout.row_index(row_id) else {
        return reject("add_item", row_not_found(row_id));
    };

    let mut next = layout.clone();
    let row = next.row_at_mut(row_idx).ok_or_else(|| row_not_found(row_id))?;
    let item = Item::for_row(sku, row.max_height);
    let item_id = item.id.clone();

    let at = index.map_or(row.stacks.len(), |idx| idx.min(row.stacks.len()));
    row.stacks.insert(at, Stack::single(item));

    Ok(Placed {
        layout: next,
        item_id,
    })
}

/// Duplicates an item into a new stack at the end of its row.
pub fn duplicate_as_new_stack(
    layout: &Refrigerator,
    item_id: &str,
) -> PlacementResult<Placed<Refrigerator>> {
    let Some(loc) = layout.locate(item_id) else {
        return reject("duplicate_as_new_stack", item_not_found(item_id));
    };
    let row = layout.row_at(loc.row).ok_or_else(|| item_not_found(item_id))?;
    let copy = row.stacks[loc.stack].items[loc.item].duplicate();

    if let Err(error) = check_capacity(row, None, copy.width) {
        return reject("duplicate_as_new_stack", error);
    }

    let new_id = copy.id.clone();
    let mut next = layout.clone();
    if let Some(row) = next.row_at_mut(loc.row) {
        row.stacks.push(Stack::single(copy));
    }

    Ok(Placed {
        layout: next,
        item_id: new_id,
    })
}

/// Duplicates an item onto the top of its own stack.
pub fn duplicate_into_stack(
    layout: &Refrigerator,
    item_id: &str,
) -> PlacementResult<Placed<Refrigerator>> {
    let Some(loc) = layout.locate(item_id) else {
        return reject("duplicate_into_stack", item_not_found(item_id));
    };
    let row = layout.row_at(loc.row).ok_or_else(|| item_not_found(item_id))?;
    let stack = &row.stacks[loc.stack];
    let source = &stack.items[loc.item];

    if !source.is_stackable() {
        return reject(
            "duplicate_into_stack",
            PlacementError::NotStackable {
                item_id: item_id.to_string(),
            },
        );
    }
    if let Err(error) = check_height(row, stack.total_height() + source.height) {
        return reject("duplicate_into_stack", error);
    }

    let copy = source.duplicate();
    let new_id = copy.id.clone();
    let mut next = layout.clone();
    if let Some(row) = next.row_at_mut(loc.row) {
        row.stacks[loc.stack].items.push(copy);
    }

    Ok(Placed {
        layout: next,
        item_id: new_id,
    })
}

/// Replaces an item with a fresh instance of another SKU, in place.
///
/// The product-type rule is enforced only when `rules_enabled`; width and
/// height always are.
pub fn replace_item(
    layout: &Refrigerator,
    item_id: &str,
    sku: &Sku,
    rules_enabled: bool,
) -> PlacementResult<Placed<Refrigerator>> {
    let Some(loc) = layout.locate(item_id) else {
        return reject("replace_item", item_not_found(item_id));
    };
    let row = layout.row_at(loc.row).ok_or_else(|| item_not_found(item_id))?;

    if rules_enabled && !row.admits(&sku.product_type) {
        return reject(
            "replace_item",
            PlacementError::ProductTypeNotAllowed {
                product_type: sku.product_type.clone(),
                row_id: row.id.clone(),
            },
        );
    }

    let replacement = Item::for_row(sku, row.max_height);
    let stack = &row.stacks[loc.stack];
    let old = &stack.items[loc.item];

    let mut replaced = stack.clone();
    replaced.items[loc.item] = replacement;
    let footprint = stack_footprint_width(&replaced);

    let checks = check_capacity(row, Some(loc.stack), footprint).and_then(|()| {
        check_height(
            row,
            stack.total_height() - old.height + replaced.items[loc.item].height,
        )
    });
    if let Err(error) = checks {
        return reject("replace_item", error);
    }

    let new_id = replaced.items[loc.item].id.clone();
    let mut next = layout.clone();
    if let Some(row) = next.row_at_mut(loc.row) {
        row.stacks[loc.stack] = replaced;
    }

    Ok(Placed {
        layout: next,
        item_id: new_id,
    })
}

/// Moves the stack containing `item_id` to `target_index` of another (or the same) row.
pub fn move_item(
    layout: &Refrigerator,
    item_id: &str,
    target_row_id: &str,
    target_index: usize,
) -> PlacementResult<Refrigerator> {
    let Some(loc) = layout.locate(item_id) else {
        return reject("move_item", item_not_found(item_id));
    };
    let Some(target_row) = layout.row_index(target_row_id) else {
        return reject("move_item", row_not_found(target_row_id));
    };

    let mut next = layout.clone();
    let stack = match next.row_at_mut(loc.row) {
        Some(row) => row.stacks.remove(loc.stack),
        None => return reject("move_item", item_not_found(item_id)),
    };
    if let Some(row) = next.row_at_mut(target_row) {
        let at = target_index.min(row.stacks.len());
        row.stacks.insert(at, stack);
    }

    Ok(next)
}

/// Moves a stack within its row.
pub fn reorder_stack(
    layout: &Refrigerator,
    row_id: &str,
    from: usize,
    to: usize,
) -> PlacementResult<Refrigerator> {
    let Some(row_idx) = layout.row_index(row_id) else {
        return reject("reorder_stack", row_not_found(row_id));
    };
    let len = layout.row_at(row_idx).map_or(0, |row| row.stacks.len());
    if from >= len {
        return reject(
            "reorder_stack",
            PlacementError::StackIndexOutOfRange {
                row_id: row_id.to_string(),
                index: from,
            },
        );
    }

    let mut next = layout.clone();
    if let Some(row) = next.row_at_mut(row_idx) {
        let stack = row.stacks.remove(from);
        let at = to.min(row.stacks.len());
        row.stacks.insert(at, stack);
    }

    Ok(next)
}

/// Merges the single-item stack of `dragged_id` onto the stack containing `target_id`.
///
/// The merged stack is re-sorted so that the widest item sits at the bottom
/// and the narrowest on top; equal widths keep their order. The emptied
/// source stack is removed.
pub fn stack_item(
    layout: &Refrigerator,
    dragged_id: &str,
    target_id: &str,
) -> PlacementResult<Refrigerator> {
    let Some(source) = layout.locate(dragged_id) else {
        return reject("stack_item", item_not_found(dragged_id));
    };
    let Some(target) = layout.locate(target_id) else {
        return reject("stack_item", item_not_found(target_id));
    };

    if source.row != target.row {
        return reject("stack_item", PlacementError::DifferentRows);
    }
    if source.stack == target.stack {
        return reject("stack_item", PlacementError::SameStack);
    }
    let source_len = layout
        .row_at(source.row)
        .map_or(0, |row| row.stacks[source.stack].len());
    if source_len != 1 {
        return reject(
            "stack_item",
            PlacementError::NotSingleItem {
                item_id: dragged_id.to_string(),
            },
        );
    }

    let mut next = layout.clone();
    if let Some(row) = next.row_at_mut(source.row) {
        let Stack { items } = row.stacks.remove(source.stack);
        let target_stack = &mut row.stacks[if source.stack < target.stack {
            target.stack - 1
        } else {
            target.stack
        }];
        target_stack.items.extend(items);
        target_stack
            .items
            .sort_by(|a, b| b.width.total_cmp(&a.width));
    }

    Ok(next)
}

/// Removes every listed item and prunes stacks left empty.
///
/// Unknown ids are ignored.
pub fn delete_items(layout: &Refrigerator, item_ids: &[&str]) -> Refrigerator {
    let mut next = layout.clone();

    for row_idx in 0..layout.row_count() {
        let touched = layout
            .row_at(row_idx)
            .is_some_and(|row| row.items().any(|item| item_ids.contains(&item.id.as_str())));
        if !touched {
            continue;
        }

        if let Some(row) = next.row_at_mut(row_idx) {
            for stack in &mut row.stacks {
                stack
                    .items
                    .retain(|item| !item_ids.contains(&item.id.as_str()));
            }
            row.stacks.retain(|stack| !stack.is_empty());
        }
    }

    next
}

/// Sets a spacer's width.
///
/// The requested width snaps to the nearest 5 mm, is raised to at least
/// 25 mm, and is then capped at the space the rest of the row leaves free.
pub fn resize_blank(
    layout: &Refrigerator,
    item_id: &str,
    requested_width_mm: f64,
    render: &RenderConfig,
) -> PlacementResult<Refrigerator> {
    let Some(loc) = layout.locate(item_id) else {
        return reject("resize_blank", item_not_found(item_id));
    };
    let row = layout.row_at(loc.row).ok_or_else(|| item_not_found(item_id))?;
    let item = &row.stacks[loc.stack].items[loc.item];

    if !item.is_blank() {
        return reject(
            "resize_blank",
            PlacementError::NotBlank {
                item_id: item_id.to_string(),
            },
        );
    }

    let own = &row.stacks[loc.stack];
    let others = row.stacks.len() - 1;
    let occupied = cumulative_row_width(row, |stack| std::ptr::eq(stack, own));
    let available = row.capacity - width_with_new_stack(occupied, others, 0.0);
    if available <= 0.0 {
        return reject(
            "resize_blank",
            PlacementError::ExceedsCapacity {
                required: width_with_new_stack(occupied, others, 0.0),
                capacity: row.capacity,
            },
        );
    }

    let snapped_mm = (requested_width_mm / BLANK_WIDTH_STEP_MM).round() * BLANK_WIDTH_STEP_MM;
    let mut width_mm = snapped_mm.max(MIN_BLANK_WIDTH_MM);
    let mut width = render.mm_to_px(width_mm);
    if !fits(width, available) {
        width = available;
        width_mm = render.px_to_mm(available);
    }

    let mut next = layout.clone();
    if let Some(row) = next.row_at_mut(loc.row) {
        let item = &mut row.stacks[loc.stack].items[loc.item];
        item.width = width;
        item.width_mm = width_mm;
        item.custom_width_mm = Some(width_mm);
    }

    Ok(next)
}

/// Applies a single-door operation to the door holding `item_id`.
pub fn within_door_of<F>(
    layout: &MultiDoorRefrigerator,
    item_id: &str,
    operation: F,
) -> PlacementResult<MultiDoorRefrigerator>
where
    F: FnOnce(&Refrigerator) -> PlacementResult<Refrigerator>,
{
    let Some((door_idx, _)) = layout.locate(item_id) else {
        return reject("within_door_of", item_not_found(item_id));
    };

    let updated = operation(&layout.doors[door_idx].refrigerator)?;
    let mut next = layout.clone();
    next.doors[door_idx].refrigerator = updated;
    Ok(next)
}

/// Adds a new instance of `sku` to a row of a specific door.
pub fn add_item_multi(
    layout: &MultiDoorRefrigerator,
    door_id: &str,
    sku: &Sku,
    row_id: &str,
    index: Option<usize>,
) -> PlacementResult<Placed<MultiDoorRefrigerator>> {
    let Some(door_idx) = layout.door_index(door_id) else {
        return reject(
            "add_item_multi",
            PlacementError::DoorNotFound {
                door_id: door_id.to_string(),
            },
        );
    };

    let placed = add_item(&layout.doors[door_idx].refrigerator, sku, row_id, index)?;
    let mut next = layout.clone();
    next.doors[door_idx].refrigerator = placed.layout;

    Ok(Placed {
        layout: next,
        item_id: placed.item_id,
    })
}

/// Moves the stack containing `item_id` to a row of any door.
pub fn move_item_multi(
    layout: &MultiDoorRefrigerator,
    item_id: &str,
    target_door_id: &str,
    target_row_id: &str,
    target_index: usize,
) -> PlacementResult<MultiDoorRefrigerator> {
    let Some((source_door, loc)) = layout.locate(item_id) else {
        return reject("move_item_multi", item_not_found(item_id));
    };
    let Some(target_door) = layout.door_index(target_door_id) else {
        return reject(
            "move_item_multi",
            PlacementError::DoorNotFound {
                door_id: target_door_id.to_string(),
            },
        );
    };

    if source_door == target_door {
        return within_door_of(layout, item_id, |fridge| {
            move_item(fridge, item_id, target_row_id, target_index)
        });
    }

    let Some(target_row) = layout.doors[target_door]
        .refrigerator
        .row_index(target_row_id)
    else {
        return reject("move_item_multi", row_not_found(target_row_id));
    };

    let mut next = layout.clone();
    let stack = match next.doors[source_door].refrigerator.row_at_mut(loc.row) {
        Some(row) => row.stacks.remove(loc.stack),
        None => return reject("move_item_multi", item_not_found(item_id)),
    };
    if let Some(row) = next.doors[target_door].refrigerator.row_at_mut(target_row) {
        let at = target_index.min(row.stacks.len());
        row.stacks.insert(at, stack);
    }

    Ok(next)
}

/// Merges one single-item stack onto another; both must be behind the same door.
pub fn stack_item_multi(
    layout: &MultiDoorRefrigerator,
    dragged_id: &str,
    target_id: &str,
) -> PlacementResult<MultiDoorRefrigerator> {
    let Some((target_door, _)) = layout.locate(target_id) else {
        return reject("stack_item_multi", item_not_found(target_id));
    };
    match layout.locate(dragged_id) {
        Some((source_door, _)) if source_door == target_door => {
            within_door_of(layout, dragged_id, |fridge| {
                stack_item(fridge, dragged_id, target_id)
            })
        }
        Some(_) => reject("stack_item_multi", PlacementError::DifferentDoors),
        None => reject("stack_item_multi", item_not_found(dragged_id)),
    }
}

/// Removes every listed item from every door.
pub fn delete_items_multi(layout: &MultiDoorRefrigerator, item_ids: &[&str]) -> MultiDoorRefrigerator {
    let mut next = layout.clone();
    for door in &mut next.doors {
        door.refrigerator = delete_items(&door.refrigerator, item_ids);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AllowedProductTypes, Door};
    use crate::services::find_conflicts;

    fn sku(id: &str, product_type: &str, width: f64, height: f64) -> Sku {
        Sku::new(id, id, product_type, width, height, 1.0).unwrap()
    }

    fn fridge() -> Refrigerator {
        Refrigerator::new(vec![
            Row::new("top", 200.0, 100.0).with_allowed(AllowedProductTypes::only(["CAN"])),
            Row::new("bottom", 200.0, 150.0),
        ])
    }

    fn add(layout: &Refrigerator, sku: &Sku, row_id: &str) -> (Refrigerator, String) {
        let placed = add_item(layout, sku, row_id, None).unwrap();
        (placed.layout, placed.item_id)
    }

    #[test]
    fn test_add_item_appends_and_inserts() {
        let cola = sku("cola", "CAN", 50.0, 40.0);
        let (layout, first) = add(&fridge(), &cola, "top");
        let placed = add_item(&layout, &cola, "top", Some(0)).unwrap();

        let row = placed.layout.row("top").unwrap();
        assert_eq!(row.stacks.len(), 2);
        assert_eq!(row.stacks[0].front_id(), Some(placed.item_id.as_str()));
        assert_eq!(row.stacks[1].front_id(), Some(first.as_str()));

        // untouched row is shared with the previous snapshot
        assert!(placed.layout.shares_row_with(&layout, 1));
        assert!(!placed.layout.shares_row_with(&layout, 0));
    }

    #[test]
    fn test_add_blank_takes_row_height() {
        let spacer = sku("blank", "BLANK", 30.0, 5.0);
        let (layout, id) = add(&fridge(), &spacer, "bottom");
        assert!((layout.item(&id).unwrap().height - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_item_unknown_row() {
        let err = add_item(&fridge(), &sku("x", "CAN", 1.0, 1.0), "nope", None).unwrap_err();
        assert_eq!(
            err,
            PlacementError::RowNotFound {
                row_id: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_as_new_stack_respects_capacity() {
        let wide = sku("wide", "CAN", 80.0, 40.0);
        let (layout, id) = add(&fridge(), &wide, "top");

        let placed = duplicate_as_new_stack(&layout, &id).unwrap();
        let row = placed.layout.row("top").unwrap();
        assert_eq!(row.stacks.len(), 2);
        assert_ne!(placed.item_id, id);

        // 80 + 1 + 80 + 1 + 80 = 242 > 200
        let err = duplicate_as_new_stack(&placed.layout, &id).unwrap_err();
        assert!(matches!(err, PlacementError::ExceedsCapacity { .. }));
    }

    #[test]
    fn test_duplicate_into_stack() {
        let stackable = sku("s", "CAN", 50.0, 40.0).stackable(true);
        let (layout, id) = add(&fridge(), &stackable, "top");

        let placed = duplicate_into_stack(&layout, &id).unwrap();
        assert_eq!(placed.layout.row("top").unwrap().stacks[0].len(), 2);

        // 40 * 3 > 100
        let err = duplicate_into_stack(&placed.layout, &id).unwrap_err();
        assert!(matches!(err, PlacementError::ExceedsHeight { .. }));

        let rigid = sku("r", "CAN", 50.0, 40.0);
        let (layout, id) = add(&fridge(), &rigid, "top");
        assert!(matches!(
            duplicate_into_stack(&layout, &id).unwrap_err(),
            PlacementError::NotStackable { .. }
        ));
    }

    #[test]
    fn test_replace_item() {
        let cola = sku("cola", "CAN", 50.0, 40.0);
        let (layout, id) = add(&fridge(), &cola, "top");
        let (layout, _) = add(&layout, &cola, "top");

        let fanta = sku("fanta", "CAN", 60.0, 45.0);
        let placed = replace_item(&layout, &id, &fanta, true).unwrap();
        let row = placed.layout.row("top").unwrap();
        assert_eq!(row.stacks[0].front().unwrap().sku_id, "fanta");
        assert_eq!(row.stacks[0].front_id(), Some(placed.item_id.as_str()));
        assert!(placed.layout.item(&id).is_none());

        let water = sku("water", "PET", 50.0, 40.0);
        assert!(matches!(
            replace_item(&layout, &id, &water, true).unwrap_err(),
            PlacementError::ProductTypeNotAllowed { .. }
        ));
        assert!(replace_item(&layout, &id, &water, false).is_ok());

        let too_wide = sku("keg", "CAN", 160.0, 40.0);
        assert!(matches!(
            replace_item(&layout, &id, &too_wide, true).unwrap_err(),
            PlacementError::ExceedsCapacity { .. }
        ));

        let too_tall = sku("tall", "CAN", 50.0, 101.0);
        assert!(matches!(
            replace_item(&layout, &id, &too_tall, true).unwrap_err(),
            PlacementError::ExceedsHeight { .. }
        ));
    }

    #[test]
    fn test_move_item_between_rows() {
        let cola = sku("cola", "CAN", 50.0, 40.0);
        let (layout, a) = add(&fridge(), &cola, "top");
        let (layout, b) = add(&layout, &cola, "bottom");

        let moved = move_item(&layout, &a, "bottom", 0).unwrap();
        assert!(moved.row("top").unwrap().stacks.is_empty());
        let bottom = moved.row("bottom").unwrap();
        assert_eq!(bottom.stacks[0].front_id(), Some(a.as_str()));
        assert_eq!(bottom.stacks[1].front_id(), Some(b.as_str()));

        assert!(matches!(
            move_item(&layout, &a, "ghost", 0).unwrap_err(),
            PlacementError::RowNotFound { .. }
        ));
    }

    #[test]
    fn test_reorder_stack() {
        let cola = sku("cola", "CAN", 20.0, 40.0);
        let (layout, a) = add(&fridge(), &cola, "top");
        let (layout, b) = add(&layout, &cola, "top");
        let (layout, c) = add(&layout, &cola, "top");

        let reordered = reorder_stack(&layout, "top", 0, 2).unwrap();
        let ids: Vec<&str> = reordered
            .row("top")
            .unwrap()
            .stacks
            .iter()
            .filter_map(Stack::front_id)
            .collect();
        assert_eq!(ids, vec![b.as_str(), c.as_str(), a.as_str()]);

        assert!(matches!(
            reorder_stack(&layout, "top", 3, 0).unwrap_err(),
            PlacementError::StackIndexOutOfRange { .. }
        ));
    }

    #[test]
    fn test_stack_item_sorts_widest_to_bottom() {
        let narrow = sku("narrow", "CAN", 30.0, 20.0).stackable(true);
        let wide = sku("wide", "CAN", 60.0, 20.0).stackable(true);
        let (layout, n) = add(&fridge(), &narrow, "top");
        let (layout, w) = add(&layout, &wide, "top");

        let merged = stack_item(&layout, &w, &n).unwrap();
        let row = merged.row("top").unwrap();
        assert_eq!(row.stacks.len(), 1);
        let order: Vec<&str> = row.stacks[0].items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(order, vec![w.as_str(), n.as_str()]);
    }

    #[test]
    fn test_stack_item_guards() {
        let can = sku("can", "CAN", 30.0, 20.0).stackable(true);
        let (layout, a) = add(&fridge(), &can, "top");
        let (layout, b) = add(&layout, &can, "bottom");
        assert_eq!(stack_item(&layout, &a, &b).unwrap_err(), PlacementError::DifferentRows);
        assert_eq!(stack_item(&layout, &a, &a).unwrap_err(), PlacementError::SameStack);

        let (layout, c) = add(&layout, &can, "top");
        let merged = stack_item(&layout, &c, &a).unwrap();
        let (merged, d) = add(&merged, &can, "top");
        assert!(matches!(
            stack_item(&merged, &a, &d).unwrap_err(),
            PlacementError::NotSingleItem { .. }
        ));
    }

    #[test]
    fn test_delete_items_prunes_empty_stacks() {
        let can = sku("can", "CAN", 30.0, 20.0).stackable(true);
        let (layout, a) = add(&fridge(), &can, "top");
        let (layout, b) = add(&layout, &can, "top");
        let layout = stack_item(&layout, &b, &a).unwrap();
        let (layout, c) = add(&layout, &can, "bottom");

        let after = delete_items(&layout, &[a.as_str(), c.as_str(), "unknown"]);
        let top = after.row("top").unwrap();
        assert_eq!(top.stacks.len(), 1);
        assert_eq!(top.stacks[0].front_id(), Some(b.as_str()));
        assert!(after.row("bottom").unwrap().stacks.is_empty());

        let after = delete_items(&after, &[b.as_str()]);
        assert!(after.row("top").unwrap().stacks.is_empty());
    }

    #[test]
    fn test_resize_blank_clamps_and_snaps() {
        let render = RenderConfig::default();
        let spacer = Sku::new("blank", "Spacer", "BLANK", 50.0, 10.0, render.pixels_per_mm).unwrap();
        let cola = sku("cola", "CAN", 100.0, 40.0);
        let (layout, blank) = add(&fridge(), &spacer, "top");
        let (layout, _) = add(&layout, &cola, "top");

        let small = resize_blank(&layout, &blank, 10.0, &render).unwrap();
        let item = small.item(&blank).unwrap();
        assert!((item.width - render.mm_to_px(25.0)).abs() < 1e-9);
        assert_eq!(item.custom_width_mm, Some(25.0));

        let snapped = resize_blank(&layout, &blank, 62.0, &render).unwrap();
        assert_eq!(snapped.item(&blank).unwrap().custom_width_mm, Some(60.0));

        // 200 capacity - 100 cola - 1 gap
        let big = resize_blank(&layout, &blank, 1000.0, &render).unwrap();
        let item = big.item(&blank).unwrap();
        assert!((item.width - 99.0).abs() < 1e-9);
        assert!(find_conflicts(&big).is_empty());

        let cola_id = layout.row("top").unwrap().stacks[1].front_id().unwrap().to_string();
        assert!(matches!(
            resize_blank(&layout, &cola_id, 50.0, &render).unwrap_err(),
            PlacementError::NotBlank { .. }
        ));
    }

    #[test]
    fn test_capacity_invariant_after_guarded_operations() {
        let can = sku("can", "CAN", 45.0, 30.0).stackable(true);
        let (mut layout, id) = add(&fridge(), &can, "top");
        while let Ok(placed) = duplicate_as_new_stack(&layout, &id) {
            layout = placed.layout;
        }
        while let Ok(placed) = duplicate_into_stack(&layout, &id) {
            layout = placed.layout;
        }

        for row in layout.rows() {
            assert!(cumulative_row_width(row, |_| false) <= row.capacity);
            assert!(row.stacks.iter().all(|s| s.total_height() <= row.max_height));
        }
        assert_eq!(layout.row("top").unwrap().stacks.len(), 4);
    }

    fn two_doors() -> MultiDoorRefrigerator {
        MultiDoorRefrigerator::new(vec![
            Door {
                id: "left".to_string(),
                width: 200.0,
                height: 250.0,
                refrigerator: fridge(),
            },
            Door {
                id: "right".to_string(),
                width: 200.0,
                height: 250.0,
                refrigerator: fridge(),
            },
        ])
    }

    #[test]
    fn test_multi_door_move_and_stack() {
        let can = sku("can", "CAN", 30.0, 20.0).stackable(true);
        let placed = add_item_multi(&two_doors(), "left", &can, "top", None).unwrap();
        let a = placed.item_id;
        let placed = add_item_multi(&placed.layout, "right", &can, "top", None).unwrap();
        let b = placed.item_id;
        let layout = placed.layout;

        assert_eq!(
            stack_item_multi(&layout, &a, &b).unwrap_err(),
            PlacementError::DifferentDoors
        );

        let moved = move_item_multi(&layout, &a, "right", "top", 0).unwrap();
        assert_eq!(moved.locate(&a).map(|(door, _)| door), Some(1));
        assert!(moved.doors[0].refrigerator.row("top").unwrap().stacks.is_empty());

        let merged = stack_item_multi(&moved, &a, &b).unwrap();
        assert_eq!(merged.doors[1].refrigerator.row("top").unwrap().stacks.len(), 1);

        let cleared = delete_items_multi(&merged, &[a.as_str(), b.as_str()]);
        assert_eq!(cleared.items().count(), 0);

        assert!(matches!(
            add_item_multi(&layout, "middle", &can, "top", None).unwrap_err(),
            PlacementError::DoorNotFound { .. }
        ));
    }

    #[test]
    fn test_within_door_of_delegates() {
        let can = sku("can", "CAN", 30.0, 20.0);
        let placed = add_item_multi(&two_doors(), "right", &can, "bottom", None).unwrap();
        let next = within_door_of(&placed.layout, &placed.item_id, |fridge| {
            duplicate_as_new_stack(fridge, &placed.item_id).map(|p| p.layout)
        })
        .unwrap();
        assert_eq!(next.doors[1].refrigerator.row("bottom").unwrap().stacks.len(), 2);
        assert_eq!(next.doors[0].refrigerator.items().count(), 0);
    }
}
