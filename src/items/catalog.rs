use super::types::{GachaItem, ItemId, Rarity};
use crate::core::error::GachaError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Immutable id -> item map shared by every banner drawing from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GachaItem>", into = "Vec<GachaItem>")]
pub struct Catalog {
    items: BTreeMap<ItemId, GachaItem>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate ids.
    pub fn from_items(items: impl IntoIterator<Item = GachaItem>) -> Result<Self, GachaError> {
        let mut map = BTreeMap::new();
        for item in items {
            if map.contains_key(&item.id) {
                return Err(GachaError::DuplicateItem(item.id));
            }
            map.insert(item.id.clone(), item);
        }
        Ok(Self { items: map })
    }

    pub fn get(&self, id: &str) -> Option<&GachaItem> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in id order.
    pub fn iter(&self) -> impl Iterator<Item = &GachaItem> {
        self.items.values()
    }

    pub fn of_rarity(&self, rarity: Rarity) -> impl Iterator<Item = &GachaItem> {
        self.items.values().filter(move |item| item.rarity == rarity)
    }
}

impl TryFrom<Vec<GachaItem>> for Catalog {
    type Error = GachaError;

    fn try_from(items: Vec<GachaItem>) -> Result<Self, Self::Error> {
        Catalog::from_items(items)
    }
}

impl From<Catalog> for Vec<GachaItem> {
    fn from(catalog: Catalog) -> Self {
        catalog.items.into_values().collect()
    }
}
