//! Shelf rows and their product-type admission rules.

use crate::models::item::Item;
use crate::models::sku::BLANK_PRODUCT_TYPE;
use crate::models::stack::Stack;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Keyword accepted on the wire for "every product type".
const ALL_KEYWORD: &str = "all";

/// Product types admitted into a row.
///
/// Serialized as the string `"all"` or as an array of tags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "AllowedRepr", into = "AllowedRepr")]
pub enum AllowedProductTypes {
    /// Every product type is admitted
    #[default]
    All,
    /// Only the listed tags are admitted (BLANK is always admitted)
    Only(BTreeSet<String>),
}

impl AllowedProductTypes {
    /// Builds an explicit allow-list.
    pub fn only<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(types.into_iter().map(Into::into).collect())
    }

    /// Returns true if an item of `product_type` may be placed in the row.
    pub fn admits(&self, product_type: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(types) => product_type == BLANK_PRODUCT_TYPE || types.contains(product_type),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum AllowedRepr {
    Keyword(String),
    List(Vec<String>),
}

impl TryFrom<AllowedRepr> for AllowedProductTypes {
    type Error = String;

    fn try_from(repr: AllowedRepr) -> Result<Self, Self::Error> {
        match repr {
            AllowedRepr::Keyword(keyword) if keyword.eq_ignore_ascii_case(ALL_KEYWORD) => {
                Ok(Self::All)
            }
            AllowedRepr::Keyword(other) => Err(format!(
                "allowedProductTypes must be \"{ALL_KEYWORD}\" or a list, got \"{other}\""
            )),
            AllowedRepr::List(list) => Ok(Self::Only(list.into_iter().collect())),
        }
    }
}

impl From<AllowedProductTypes> for AllowedRepr {
    fn from(allowed: AllowedProductTypes) -> Self {
        match allowed {
            AllowedProductTypes::All => Self::Keyword(ALL_KEYWORD.to_string()),
            AllowedProductTypes::Only(types) => Self::List(types.into_iter().collect()),
        }
    }
}

/// One shelf of a refrigerator.
///
/// # Invariants
///
/// - sum of stack footprints plus one gap pixel between neighbours ≤ `capacity`
/// - every stack's total height ≤ `max_height`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// Unique row id
    pub id: String,
    /// Maximum total width in layout pixels
    pub capacity: f64,
    /// Maximum stack height in layout pixels
    pub max_height: f64,
    /// Stacks, left to right
    #[serde(default)]
    pub stacks: Vec<Stack>,
    /// Admitted product types
    #[serde(default)]
    pub allowed_product_types: AllowedProductTypes,
}

impl Row {
    /// Creates an empty row.
    pub fn new(id: impl Into<String>, capacity: f64, max_height: f64) -> Self {
        Self {
            id: id.into(),
            capacity,
            max_height,
            stacks: Vec::new(),
            allowed_product_types: AllowedProductTypes::All,
        }
    }

    /// Sets the admitted product types.
    #[must_use]
    pub fn with_allowed(mut self, allowed: AllowedProductTypes) -> Self {
        self.allowed_product_types = allowed;
        self
    }

    /// Appends a stack, returning self for fixture-style construction.
    #[must_use]
    pub fn with_stack(mut self, stack: Stack) -> Self {
        self.stacks.push(stack);
        self
    }

    /// Index of the stack containing the given item.
    pub fn stack_index_of(&self, item_id: &str) -> Option<usize> {
        self.stacks.iter().position(|stack| stack.contains(item_id))
    }

    /// Iterates every item in the row, stack by stack, bottom first.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.stacks.iter().flat_map(|stack| stack.items.iter())
    }

    /// Returns true if the row admits the given product type.
    pub fn admits(&self, product_type: &str) -> bool {
        self.allowed_product_types.admits(product_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_always_admitted() {
        let allowed = AllowedProductTypes::only(["CAN"]);
        assert!(allowed.admits("CAN"));
        assert!(allowed.admits("BLANK"));
        assert!(!allowed.admits("PET"));
        assert!(AllowedProductTypes::All.admits("PET"));
    }

    #[test]
    fn test_allowed_wire_format() {
        let all: AllowedProductTypes = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(all, AllowedProductTypes::All);

        let list: AllowedProductTypes = serde_json::from_str(r#"["CAN","PET"]"#).unwrap();
        assert_eq!(list, AllowedProductTypes::only(["PET", "CAN"]));

        assert!(serde_json::from_str::<AllowedProductTypes>("\"some\"").is_err());
        assert_eq!(serde_json::to_string(&AllowedProductTypes::All).unwrap(), "\"all\"");
    }

    #[test]
    fn test_row_defaults_from_json() {
        let row: Row =
            serde_json::from_str(r#"{"id":"row-1","capacity":200,"maxHeight":100}"#).unwrap();
        assert!(row.stacks.is_empty());
        assert_eq!(row.allowed_product_types, AllowedProductTypes::All);
    }
}
