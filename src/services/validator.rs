//! Placement validation against row capacity, height and product-type rules.
//!
//! Two entry points:
//! - [`compute_valid_targets`] answers "where may this item or stack go?"
//!   while a drag is in progress
//! - [`find_conflicts`] scans a whole layout for placements that already
//!   break the rules (after a rule change or an unchecked edit)
//!
//! Rejections are ordinary outcomes, reported as data rather than errors.

use std::collections::HashSet;
use std::fmt;

use crate::models::{Item, MultiDoorRefrigerator, Refrigerator, Row, Stack};
use crate::services::geometry::{cumulative_row_width, stack_footprint_width, width_with_new_stack};

/// Tolerance for accumulated floating point error in size comparisons.
const FIT_TOLERANCE: f64 = 1e-9;

/// Returns true if `required` fits within `limit`.
pub(crate) fn fits(required: f64, limit: f64) -> bool {
    required <= limit + FIT_TOLERANCE
}

/// The item or stack being placed.
#[derive(Debug, Clone, Copy)]
pub struct PlacementCandidate<'a> {
    /// Representative item (the bottom item when moving a stack)
    pub item: &'a Item,
    /// Horizontal footprint of the candidate
    pub width: f64,
    /// Total height of the candidate
    pub height: f64,
    /// A single stackable item that may be merged onto another stack
    pub single_stackable_unit: bool,
    /// Instance id whose stack is being dragged and must be ignored
    pub exclude_id: Option<&'a str>,
}

impl<'a> PlacementCandidate<'a> {
    /// Candidate for an item dragged in from the palette.
    pub fn for_new_item(item: &'a Item) -> Self {
        Self {
            item,
            width: item.width,
            height: item.height,
            single_stackable_unit: item.is_stackable(),
            exclude_id: None,
        }
    }

    /// Candidate for an existing stack being moved.
    ///
    /// Returns `None` for an empty stack.
    pub fn for_stack(stack: &'a Stack) -> Option<Self> {
        let front = stack.front()?;
        Some(Self {
            item: front,
            width: stack_footprint_width(stack),
            height: stack.total_height(),
            single_stackable_unit: stack.len() == 1 && front.is_stackable(),
            exclude_id: Some(front.id.as_str()),
        })
    }

    fn is_dragged(&self, stack: &Stack) -> bool {
        self.exclude_id.is_some_and(|id| stack.contains(id))
    }
}

/// Rows and stacks that accept a candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidTargets {
    /// Rows the candidate may be moved or added to, top to bottom
    pub valid_row_ids: Vec<String>,
    /// Front-item ids of stacks the candidate may be stacked onto
    pub valid_stack_target_ids: Vec<String>,
}

impl ValidTargets {
    /// Returns true if the row accepts the candidate.
    pub fn accepts_row(&self, row_id: &str) -> bool {
        self.valid_row_ids.iter().any(|id| id == row_id)
    }

    /// Returns true if the stack fronted by `item_id` accepts the candidate.
    pub fn accepts_stack(&self, item_id: &str) -> bool {
        self.valid_stack_target_ids.iter().any(|id| id == item_id)
    }
}

/// Row of a multi-door cooler, qualified by its door.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoorRowTarget {
    /// Door id
    pub door_id: String,
    /// Row id within the door
    pub row_id: String,
}

/// Valid targets across every door of a multi-door cooler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiDoorTargets {
    /// Door-qualified rows, door by door
    pub valid_rows: Vec<DoorRowTarget>,
    /// Front-item ids of accepting stacks
    pub valid_stack_target_ids: Vec<String>,
}

/// Row admits the candidate's product type and its height.
fn row_admits(row: &Row, candidate: &PlacementCandidate<'_>) -> bool {
    row.admits(&candidate.item.product_type) && fits(candidate.height, row.max_height)
}

/// Row has room for the candidate as a new stack, ignoring the dragged stack.
fn row_has_room(row: &Row, candidate: &PlacementCandidate<'_>) -> bool {
    let is_dragged = |stack: &Stack| candidate.is_dragged(stack);
    let remaining = row.stacks.iter().filter(|stack| !is_dragged(stack)).count();
    let occupied = cumulative_row_width(row, is_dragged);
    fits(
        width_with_new_stack(occupied, remaining, candidate.width),
        row.capacity,
    )
}

/// Computes the rows and stacks that accept a candidate.
///
/// With rules disabled every row and every stack other than the dragged one
/// is accepted, even where the result would overflow the row geometrically.
pub fn compute_valid_targets(
    candidate: &PlacementCandidate<'_>,
    layout: &Refrigerator,
    rules_enabled: bool,
) -> ValidTargets {
    let mut targets = ValidTargets::default();

    for row in layout.rows() {
        let admitted = !rules_enabled || row_admits(row, candidate);

        if admitted && (!rules_enabled || row_has_room(row, candidate)) {
            targets.valid_row_ids.push(row.id.clone());
        }

        for stack in &row.stacks {
            let Some(front_id) = stack.front_id() else {
                continue;
            };
            if candidate.is_dragged(stack) {
                continue;
            }

            let accepts = !rules_enabled
                || (candidate.single_stackable_unit
                    && admitted
                    && fits(stack.total_height() + candidate.height, row.max_height));
            if accepts {
                targets.valid_stack_target_ids.push(front_id.to_string());
            }
        }
    }

    targets
}

/// Computes valid targets across every door of a multi-door cooler.
pub fn compute_valid_targets_multi(
    candidate: &PlacementCandidate<'_>,
    layout: &MultiDoorRefrigerator,
    rules_enabled: bool,
) -> MultiDoorTargets {
    let mut targets = MultiDoorTargets::default();

    for door in &layout.doors {
        let door_targets = compute_valid_targets(candidate, &door.refrigerator, rules_enabled);
        targets
            .valid_rows
            .extend(door_targets.valid_row_ids.into_iter().map(|row_id| DoorRowTarget {
                door_id: door.id.clone(),
                row_id,
            }));
        targets
            .valid_stack_target_ids
            .extend(door_targets.valid_stack_target_ids);
    }

    targets
}

/// Rule broken by an existing placement.
#[derive(Debug, Clone, PartialEq)]
pub enum ConflictKind {
    /// The item's stack is taller than the row allows
    StackTooTall {
        /// Total stack height
        stack_height: f64,
        /// Row height limit
        max_height: f64,
    },
    /// The row's allow-list does not include the item's product type
    ProductTypeNotAllowed {
        /// Offending product type
        product_type: String,
    },
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StackTooTall {
                stack_height,
                max_height,
            } => write!(
                f,
                "stack height {stack_height} exceeds row max height {max_height}"
            ),
            Self::ProductTypeNotAllowed { product_type } => {
                write!(f, "product type '{product_type}' is not allowed in this row")
            }
        }
    }
}

/// One rule violation in an existing layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    /// Offending item
    pub item_id: String,
    /// Row holding the item
    pub row_id: String,
    /// Broken rule
    pub kind: ConflictKind,
}

/// Lists every rule violation in a layout, row by row.
///
/// Every member of an over-height stack is reported; a non-BLANK item whose
/// type is missing from the row's allow-list is reported once more for that.
pub fn scan_conflicts(layout: &Refrigerator) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for row in layout.rows() {
        for stack in &row.stacks {
            let stack_height = stack.total_height();
            let too_tall = !fits(stack_height, row.max_height);

            for item in &stack.items {
                if too_tall {
                    conflicts.push(Conflict {
                        item_id: item.id.clone(),
                        row_id: row.id.clone(),
                        kind: ConflictKind::StackTooTall {
                            stack_height,
                            max_height: row.max_height,
                        },
                    });
                }
                if !row.admits(&item.product_type) {
                    conflicts.push(Conflict {
                        item_id: item.id.clone(),
                        row_id: row.id.clone(),
                        kind: ConflictKind::ProductTypeNotAllowed {
                            product_type: item.product_type.clone(),
                        },
                    });
                }
            }
        }
    }

    conflicts
}

/// Ids of items that currently violate height or product-type rules.
///
/// Each id appears once, in tree order.
pub fn find_conflicts(layout: &Refrigerator) -> Vec<String> {
    dedup_ids(scan_conflicts(layout))
}

/// Ids of conflicting items across every door.
pub fn find_conflicts_multi(layout: &MultiDoorRefrigerator) -> Vec<String> {
    dedup_ids(
        layout
            .doors
            .iter()
            .flat_map(|door| scan_conflicts(&door.refrigerator)),
    )
}

fn dedup_ids(conflicts: impl IntoIterator<Item = Conflict>) -> Vec<String> {
    let mut seen = HashSet::new();
    conflicts
        .into_iter()
        .filter_map(|conflict| seen.insert(conflict.item_id.clone()).then_some(conflict.item_id))
        .collect()
}

/// Row whose stacks are wider than its capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct RowOverflow {
    /// Row id
    pub row_id: String,
    /// Stacks plus gaps
    pub used_width: f64,
    /// Row capacity
    pub capacity: f64,
}

/// Lists rows whose cumulative width exceeds capacity.
///
/// Only reachable through rules-disabled edits or hand-edited files.
pub fn row_overflows(layout: &Refrigerator) -> Vec<RowOverflow> {
    layout
        .rows()
        .filter_map(|row| {
            let used_width = cumulative_row_width(row, |_| false);
            (!fits(used_width, row.capacity)).then(|| RowOverflow {
                row_id: row.id.clone(),
                used_width,
                capacity: row.capacity,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AllowedProductTypes, Sku};

    fn item(product_type: &str, width: f64, height: f64, stackable: bool) -> Item {
        let sku = Sku::new("sku", "sku", product_type, width, height, 1.0)
            .unwrap()
            .stackable(stackable);
        Item::from_sku(&sku)
    }

    fn can_row() -> Row {
        Row::new("cans", 200.0, 100.0).with_allowed(AllowedProductTypes::only(["CAN"]))
    }

    #[test]
    fn test_capacity_scenario() {
        let candidate_item = item("CAN", 80.0, 50.0, false);
        let candidate = PlacementCandidate::for_new_item(&candidate_item);

        let mut row = can_row();
        let layout = Refrigerator::new(vec![row.clone()]);
        assert!(compute_valid_targets(&candidate, &layout, true).accepts_row("cans"));

        row.stacks.push(Stack::single(item("CAN", 80.0, 50.0, false)));
        let layout = Refrigerator::new(vec![row.clone()]);
        assert!(compute_valid_targets(&candidate, &layout, true).accepts_row("cans"));

        row.stacks.push(Stack::single(item("CAN", 80.0, 50.0, false)));
        let layout = Refrigerator::new(vec![row]);
        let targets = compute_valid_targets(&candidate, &layout, true);
        assert!(!targets.accepts_row("cans"));
    }

    #[test]
    fn test_type_and_height_rules() {
        let layout = Refrigerator::new(vec![can_row(), Row::new("tall", 200.0, 300.0)]);

        let pet = item("PET", 50.0, 50.0, false);
        let targets = compute_valid_targets(&PlacementCandidate::for_new_item(&pet), &layout, true);
        assert_eq!(targets.valid_row_ids, vec!["tall".to_string()]);

        let blank = item("BLANK", 50.0, 50.0, false);
        let targets = compute_valid_targets(&PlacementCandidate::for_new_item(&blank), &layout, true);
        assert_eq!(targets.valid_row_ids.len(), 2);

        let tall_can = item("CAN", 50.0, 150.0, false);
        let targets =
            compute_valid_targets(&PlacementCandidate::for_new_item(&tall_can), &layout, true);
        assert_eq!(targets.valid_row_ids, vec!["tall".to_string()]);
    }

    #[test]
    fn test_moving_stack_ignores_its_own_width() {
        let moving = item("CAN", 120.0, 50.0, false);
        let other = item("CAN", 70.0, 50.0, false);
        let row = can_row()
            .with_stack(Stack::single(moving.clone()))
            .with_stack(Stack::single(other));
        let layout = Refrigerator::new(vec![row]);

        let stack = &layout.row_at(0).unwrap().stacks[0];
        let candidate = PlacementCandidate::for_stack(stack).unwrap();
        let targets = compute_valid_targets(&candidate, &layout, true);
        assert!(targets.accepts_row("cans"));
        assert!(!targets.accepts_stack(&moving.id));
    }

    #[test]
    fn test_stack_targets() {
        let base = item("CAN", 60.0, 60.0, true);
        let short = item("CAN", 60.0, 30.0, true);
        let layout = Refrigerator::new(vec![can_row()
            .with_stack(Stack::single(base.clone()))
            .with_stack(Stack::single(short.clone()))]);

        let candidate_item = item("CAN", 50.0, 50.0, true);
        let candidate = PlacementCandidate::for_new_item(&candidate_item);
        let targets = compute_valid_targets(&candidate, &layout, true);
        assert!(!targets.accepts_stack(&base.id)); // 60 + 50 > 100
        assert!(targets.accepts_stack(&short.id));

        let rigid_item = item("CAN", 50.0, 10.0, false);
        let rigid = PlacementCandidate::for_new_item(&rigid_item);
        assert!(compute_valid_targets(&rigid, &layout, true)
            .valid_stack_target_ids
            .is_empty());
    }

    #[test]
    fn test_rules_disabled_accepts_everything_but_dragged_stack() {
        let huge = item("PET", 500.0, 500.0, false);
        let row = can_row()
            .with_stack(Stack::single(huge.clone()))
            .with_stack(Stack::single(item("CAN", 10.0, 10.0, false)));
        let layout = Refrigerator::new(vec![row]);

        let stack = &layout.row_at(0).unwrap().stacks[0];
        let candidate = PlacementCandidate::for_stack(stack).unwrap();
        let targets = compute_valid_targets(&candidate, &layout, false);
        assert!(targets.accepts_row("cans"));
        assert_eq!(targets.valid_stack_target_ids.len(), 1);
        assert!(!targets.accepts_stack(&huge.id));
    }

    #[test]
    fn test_find_conflicts() {
        let blank = item("BLANK", 20.0, 100.0, false);
        let pet = item("PET", 20.0, 20.0, false);
        let low = item("CAN", 20.0, 60.0, true);
        let high = item("CAN", 20.0, 60.0, true);
        let fine = item("CAN", 20.0, 60.0, false);

        let layout = Refrigerator::new(vec![can_row()
            .with_stack(Stack::single(blank.clone()))
            .with_stack(Stack::single(pet.clone()))
            .with_stack(Stack::from(vec![low.clone(), high.clone()]))
            .with_stack(Stack::single(fine.clone()))]);

        let ids = find_conflicts(&layout);
        assert_eq!(ids, vec![pet.id.clone(), low.id.clone(), high.id.clone()]);
        assert!(!ids.contains(&blank.id));
        assert!(!ids.contains(&fine.id));
    }

    #[test]
    fn test_all_allow_list_never_conflicts_on_type() {
        let layout = Refrigerator::new(vec![
            Row::new("any", 200.0, 100.0).with_stack(Stack::single(item("PET", 20.0, 20.0, false))),
        ]);
        assert!(find_conflicts(&layout).is_empty());
    }

    #[test]
    fn test_conflict_ids_are_unique() {
        let a = item("PET", 20.0, 80.0, true);
        let b = item("PET", 20.0, 80.0, true);
        let layout = Refrigerator::new(vec![can_row().with_stack(Stack::from(vec![a.clone(), b.clone()]))]);

        assert_eq!(scan_conflicts(&layout).len(), 4);
        assert_eq!(find_conflicts(&layout), vec![a.id, b.id]);
    }

    #[test]
    fn test_row_overflows() {
        let layout = Refrigerator::new(vec![can_row()
            .with_stack(Stack::single(item("CAN", 100.0, 10.0, false)))
            .with_stack(Stack::single(item("CAN", 100.0, 10.0, false)))]);
        let overflows = row_overflows(&layout);
        assert_eq!(overflows.len(), 1);
        assert!((overflows[0].used_width - 201.0).abs() < f64::EPSILON);
    }
}
