//! Custom Askama template filters.

use std::fmt::Display;

use grocery_core::Price;

/// Formats a price or bare amount as dollars with two decimals.
///
/// Values that are not a valid price are rendered unchanged.
///
/// Usage in templates: `{{ item.price|money }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = value.to_string();
    Ok(Price::parse(&raw).map_or(raw, |price| price.to_string()))
}
