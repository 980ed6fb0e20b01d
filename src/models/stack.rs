//! Vertical stacks of items occupying one horizontal slot.

use crate::models::item::Item;
use serde::{Deserialize, Serialize};

/// Ordered items from bottom (index 0) to top.
///
/// The bottom item is the "front" product of the stack and anchors its
/// horizontal position. An empty stack is never produced by the mutator but
/// may appear in hand-edited placement files.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stack {
    /// Items, bottom first
    pub items: Vec<Item>,
}

impl Stack {
    /// Creates a stack holding a single item.
    pub fn single(item: Item) -> Self {
        Self { items: vec![item] }
    }

    /// Bottom item, if any.
    pub fn front(&self) -> Option<&Item> {
        self.items.first()
    }

    /// Id of the bottom item; used to address the stack as a merge target.
    pub fn front_id(&self) -> Option<&str> {
        self.front().map(|item| item.id.as_str())
    }

    /// Sum of member heights.
    pub fn total_height(&self) -> f64 {
        self.items.iter().map(|item| item.height).sum()
    }

    /// Number of items in the stack.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when the stack holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if an item with the given instance id is in this stack.
    pub fn contains(&self, item_id: &str) -> bool {
        self.items.iter().any(|item| item.id == item_id)
    }

    /// Position of an item within the stack.
    pub fn position_of(&self, item_id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == item_id)
    }
}

impl From<Vec<Item>> for Stack {
    fn from(items: Vec<Item>) -> Self {
        Self { items }
    }
}
