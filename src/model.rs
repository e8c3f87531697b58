//! Item records and the payload types that flow between service and store.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored item. `id` is assigned once by the store and never changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

impl Item {
    pub fn from_fields(id: i64, fields: ItemFields) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            price: fields.price,
        }
    }

    /// Overwrite every mutable field. An omitted description is already `None` in `fields`.
    pub fn replace_fields(&mut self, fields: ItemFields) {
        self.name = fields.name;
        self.description = fields.description;
        self.price = fields.price;
    }
}

/// Mutable part of an item, validated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemFields {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

impl ItemFields {
    pub fn new(name: impl Into<String>, description: Option<&str>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: description.map(String::from),
            price,
        }
    }
}

/// Validated create payload. `id: None` asks the store to assign one.
#[derive(Clone, Debug, PartialEq, Deserialize, ToSchema)]
pub struct NewItem {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub fields: ItemFields,
}

/// Validated partial update.
///
/// `description` is doubly optional: `None` leaves it alone, `Some(None)` clears it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<f64>,
}

impl ItemPatch {
    /// Merge supplied fields into `item`; absent fields keep their current value.
    pub fn apply(self, item: &mut Item) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(price) = self.price {
            item.price = price;
        }
    }
}

/// Result of seed-if-empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedOutcome {
    Inserted(u64),
    AlreadySeeded(u64),
}

/// Fixed sample set inserted by `/seed`.
pub fn sample_items() -> Vec<ItemFields> {
    vec![
        ItemFields::new("Laptop", Some("Portable computer"), 999.99),
        ItemFields::new("Mouse", Some("Wireless mouse"), 29.99),
        ItemFields::new("Keyboard", Some("Mechanical keyboard"), 49.99),
    ]
}

/// Next id under the max+1 rule. Gaps left by deletes are never refilled.
/// Fails once the largest id is `i64::MAX`.
pub fn next_id<I: IntoIterator<Item = i64>>(ids: I) -> Result<i64, AppError> {
    ids.into_iter()
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(id_space_exhausted)
}

pub fn id_space_exhausted() -> AppError {
    AppError::Conflict("id space exhausted".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laptop() -> Item {
        Item::from_fields(1, ItemFields::new("Laptop", Some("Portable computer"), 999.99))
    }

    #[test]
    fn patch_keeps_unsupplied_fields() {
        let mut item = laptop();
        ItemPatch {
            price: Some(899.0),
            ..ItemPatch::default()
        }
        .apply(&mut item);
        assert_eq!(item.name, "Laptop");
        assert_eq!(item.description.as_deref(), Some("Portable computer"));
        assert_eq!(item.price, 899.0);
        assert_eq!(item.id, 1);
    }

    #[test]
    fn patch_can_clear_description() {
        let mut item = laptop();
        ItemPatch {
            description: Some(None),
            ..ItemPatch::default()
        }
        .apply(&mut item);
        assert_eq!(item.description, None);
    }

    #[test]
    fn replace_fields_drops_omitted_description() {
        let mut item = laptop();
        item.replace_fields(ItemFields::new("Notebook", None, 10.0));
        assert_eq!(item, Item::from_fields(1, ItemFields::new("Notebook", None, 10.0)));
    }

    #[test]
    fn next_id_is_max_plus_one() {
        assert_eq!(next_id(Vec::new()).unwrap(), 1);
        assert_eq!(next_id(vec![2, 7, 3]).unwrap(), 8);
    }

    #[test]
    fn next_id_after_max_is_an_error() {
        let err = next_id(vec![1, i64::MAX]).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
