//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::DateTime;

/// Format a numeric amount as a price string.
///
/// Usage in templates: `{{ product.price|money }}`
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_money(&value.to_string()))
}

/// Format a backend timestamp for display.
///
/// Parses RFC 3339; anything else is shown as-is.
///
/// Usage in templates: `{{ purchase.date|date }}`
#[askama::filter_fn]
pub fn date(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_date(&value.to_string()))
}

/// Price formatting shared with route view models.
#[must_use]
pub fn format_money(raw: &str) -> String {
    raw.parse::<f64>()
        .map_or_else(|_| format!("${raw}"), |amount| format!("${amount:.2}"))
}

fn format_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_string(),
        |parsed| parsed.format("%d/%m/%Y %H:%M").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_rounds_to_two_decimals() {
        assert_eq!(format_money("12.5"), "$12.50");
    }

    #[test]
    fn money_passes_through_non_numeric_input() {
        assert_eq!(format_money("n/a"), "$n/a");
    }

    #[test]
    fn date_formats_rfc3339() {
        assert_eq!(format_date("2026-08-01T12:30:00Z"), "01/08/2026 12:30");
    }

    #[test]
    fn date_passes_through_unparseable_input() {
        assert_eq!(format_date("ayer"), "ayer");
    }
}
