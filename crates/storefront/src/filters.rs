//! Custom Askama template filters.

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Pluralizes a unit label by count.
///
/// Usage in templates: `{{ cart.item_count|units }}` renders "1 item" or "3 items".
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn units(count: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let count = count.to_string();
    let label = if count == "1" { "item" } else { "items" };
    Ok(format!("{count} {label}"))
}
