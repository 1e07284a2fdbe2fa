use crate::core::constants::RARITY_COUNT;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog identifier for a drawable item.
pub type ItemId = String;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common = 0,
    Uncommon = 1,
    Rare = 2,
    Epic = 3,
    Legendary = 4,
}

impl Rarity {
    /// All tiers, lowest first.
    pub const ALL: [Rarity; RARITY_COUNT] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    /// Order of the cumulative walk during a rarity draw. Highest tier first so
    /// rounding at a boundary resolves the same way for a given roll no matter
    /// how the rate table was built.
    pub const DRAW_ORDER: [Rarity; RARITY_COUNT] = [
        Rarity::Legendary,
        Rarity::Epic,
        Rarity::Rare,
        Rarity::Uncommon,
        Rarity::Common,
    ];

    /// Position of this tier in `Rarity::ALL`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the display name for this rarity tier.
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A drawable catalog entry. `payload` is an opaque reference that the
/// consuming system (hiring, cosmetics, mods) resolves on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GachaItem {
    pub id: ItemId,
    pub rarity: Rarity,
    pub display_name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl GachaItem {
    pub fn new(
        id: impl Into<String>,
        rarity: Rarity,
        display_name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            rarity,
            display_name: display_name.into(),
            category: category.into(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_ordering() {
        assert!(Rarity::Common < Rarity::Uncommon);
        assert!(Rarity::Uncommon < Rarity::Rare);
        assert!(Rarity::Rare < Rarity::Epic);
        assert!(Rarity::Epic < Rarity::Legendary);
    }

    #[test]
    fn test_draw_order_is_highest_first() {
        let mut expected = Rarity::ALL;
        expected.reverse();
        assert_eq!(Rarity::DRAW_ORDER, expected);
    }

    #[test]
    fn test_rarity_index_matches_all() {
        for (i, rarity) in Rarity::ALL.iter().enumerate() {
            assert_eq!(rarity.index(), i);
        }
    }

    #[test]
    fn test_rarity_serializes_lowercase() {
        let json = serde_json::to_string(&Rarity::Legendary).unwrap();
        assert_eq!(json, "\"legendary\"");
        let back: Rarity = serde_json::from_str("\"uncommon\"").unwrap();
        assert_eq!(back, Rarity::Uncommon);
    }

    #[test]
    fn test_item_payload_is_optional_in_json() {
        let item: GachaItem = serde_json::from_str(
            r#"{"id":"cto","rarity":"epic","display_name":"CTO","category":"staff"}"#,
        )
        .unwrap();
        assert_eq!(item.payload, None);

        let with = GachaItem::new("hat", Rarity::Rare, "Hat", "cosmetic").with_payload("hats/top");
        assert_eq!(with.payload.as_deref(), Some("hats/top"));
    }
}
