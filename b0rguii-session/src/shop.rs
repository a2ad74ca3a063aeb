//! Shop catalog.
//!
//! Static listing of the enhancements a unit can sink credits into. The
//! purchase rules themselves live on [`crate::session::Session`]; this
//! module only knows what is on sale.

use serde::Serialize;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// What an item changes once owned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum ShopItemKind {
    /// Presentation swap
    Theme,
    /// Gameplay modifier
    Perk,
    /// Pure decoration
    Cosmetic,
}

/// A purchasable enhancement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ShopItem {
    /// Stable purchase id
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Price in credits
    pub price: u64,
    /// Sales pitch
    pub description: &'static str,
    /// Item kind
    pub kind: ShopItemKind,
}

const CATALOG: &[ShopItem] = &[
    ShopItem {
        id: "red-theme",
        name: "OVERLOAD_RED",
        price: 500,
        description: "Change UI to emergency red.",
        kind: ShopItemKind::Theme,
    },
    ShopItem {
        id: "streak-freeze",
        name: "STREAK_STASIS",
        price: 200,
        description: "Prevent streak loss for 24h.",
        kind: ShopItemKind::Perk,
    },
    ShopItem {
        id: "double-ad",
        name: "MARKETING_MAXIMIZER",
        price: 300,
        description: "Ads grant 10 credits instead of 5.",
        kind: ShopItemKind::Perk,
    },
];

impl ShopItem {
    /// Every item on sale, in display order.
    pub fn catalog() -> &'static [ShopItem] {
        CATALOG
    }

    /// Look an item up by its purchase id.
    pub fn find(id: &str) -> Option<&'static ShopItem> {
        CATALOG.iter().find(|item| item.id == id)
    }
}
