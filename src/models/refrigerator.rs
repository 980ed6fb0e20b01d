//! Placement trees for single- and multi-door coolers.
//!
//! Rows are held behind [`Arc`] so that a mutation clones only the row it
//! touches; every untouched row is shared between the previous and the new
//! snapshot.

use crate::models::item::Item;
use crate::models::row::Row;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Address of an item inside a refrigerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemLocation {
    /// Row index in top-to-bottom order
    pub row: usize,
    /// Stack index within the row
    pub stack: usize,
    /// Item index within the stack (0 = bottom)
    pub item: usize,
}

/// Single-door placement tree.
///
/// Row order is explicit: `rows[0]` is the top shelf.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Refrigerator {
    rows: Vec<Arc<Row>>,
}

impl Refrigerator {
    /// Creates a refrigerator from rows listed top to bottom.
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: rows.into_iter().map(Arc::new).collect(),
        }
    }

    /// Creates a refrigerator from a row-id keyed map.
    ///
    /// Keys are ordered lexicographically, matching how keyed layouts have
    /// always been rendered.
    pub fn from_row_map(rows: BTreeMap<String, Row>) -> Self {
        Self::new(rows.into_values().collect())
    }

    /// Rows, top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &Row> {
        self.rows.iter().map(AsRef::as_ref)
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Row at an index.
    pub fn row_at(&self, index: usize) -> Option<&Row> {
        self.rows.get(index).map(AsRef::as_ref)
    }

    /// Row by id.
    pub fn row(&self, row_id: &str) -> Option<&Row> {
        self.rows().find(|row| row.id == row_id)
    }

    /// Index of a row by id.
    pub fn row_index(&self, row_id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.id == row_id)
    }

    /// Mutable access to a row; clones the row first if it is shared.
    pub fn row_at_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index).map(Arc::make_mut)
    }

    /// Returns true if both snapshots share the same allocation for a row.
    pub fn shares_row_with(&self, other: &Self, index: usize) -> bool {
        match (self.rows.get(index), other.rows.get(index)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Finds an item by instance id.
    ///
    /// Scans the whole tree; layouts hold at most a few hundred items.
    pub fn locate(&self, item_id: &str) -> Option<ItemLocation> {
        self.rows().enumerate().find_map(|(row_idx, row)| {
            row.stacks
                .iter()
                .enumerate()
                .find_map(|(stack_idx, stack)| {
                    stack.position_of(item_id).map(|item_idx| ItemLocation {
                        row: row_idx,
                        stack: stack_idx,
                        item: item_idx,
                    })
                })
        })
    }

    /// Looks up an item by instance id.
    pub fn item(&self, item_id: &str) -> Option<&Item> {
        let loc = self.locate(item_id)?;
        self.rows[loc.row].stacks[loc.stack].items.get(loc.item)
    }

    /// Iterates every placed item, row by row.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.rows().flat_map(Row::items)
    }
}

/// One door of a multi-door cooler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    /// Door id
    pub id: String,
    /// Inner width in layout pixels
    pub width: f64,
    /// Inner height in layout pixels
    pub height: f64,
    /// Rows behind this door
    pub refrigerator: Refrigerator,
}

/// Multi-door placement tree; doors are ordered left to right.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MultiDoorRefrigerator {
    /// Doors, left to right
    pub doors: Vec<Door>,
}

impl MultiDoorRefrigerator {
    /// Creates a multi-door tree from doors listed left to right.
    pub fn new(doors: Vec<Door>) -> Self {
        Self { doors }
    }

    /// Door index by id.
    pub fn door_index(&self, door_id: &str) -> Option<usize> {
        self.doors.iter().position(|door| door.id == door_id)
    }

    /// Door by id.
    pub fn door(&self, door_id: &str) -> Option<&Door> {
        self.doors.iter().find(|door| door.id == door_id)
    }

    /// Finds the door index and in-door location of an item.
    pub fn locate(&self, item_id: &str) -> Option<(usize, ItemLocation)> {
        self.doors
            .iter()
            .enumerate()
            .find_map(|(idx, door)| door.refrigerator.locate(item_id).map(|loc| (idx, loc)))
    }

    /// Iterates every placed item, door by door.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.doors.iter().flat_map(|door| door.refrigerator.items())
    }
}
