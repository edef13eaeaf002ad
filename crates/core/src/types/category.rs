//! Grocery item categories.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known [`ItemCategory`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("not a valid category: {0}")]
pub struct ParseCategoryError(pub String);

/// Aisle a grocery item belongs to.
///
/// Stored as the `grocery.item_category` Postgres enum using the snake_case
/// values; shown to users with [`ItemCategory::label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "grocery.item_category", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Produce,
    Deli,
    Bakery,
    Pantry,
    Frozen,
    #[default]
    Other,
}

impl ItemCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 6] = [
        Self::Produce,
        Self::Deli,
        Self::Bakery,
        Self::Pantry,
        Self::Frozen,
        Self::Other,
    ];

    /// The stored/form value, e.g. `"produce"`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Produce => "produce",
            Self::Deli => "deli",
            Self::Bakery => "bakery",
            Self::Pantry => "pantry",
            Self::Frozen => "frozen",
            Self::Other => "other",
        }
    }

    /// Human-readable label, e.g. `"Produce"`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Produce => "Produce",
            Self::Deli => "Deli",
            Self::Bakery => "Bakery",
            Self::Pantry => "Pantry",
            Self::Frozen => "Frozen",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ItemCategory {
    type Err = ParseCategoryError;

    /// Accepts the stored value or the label, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseCategoryError(needle.to_owned()))
    }
}
