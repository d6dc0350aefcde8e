//! Client-side product search.
//!
//! A multi-tier relevance filter over the fetched product list. There is
//! no server-side search in the catalog service; both the search box and
//! the autocomplete dropdown re-run this matcher over a full product fetch
//! on every (debounced) keystroke.
//!
//! Tiers, evaluated per product against name, active ingredient, and
//! dosage form (case-insensitive):
//!
//! 1. Exact - a compared field equals the query
//! 2. Prefix - a compared field starts with the query
//! 3. Partial - a compared field contains the query
//! 4. Fuzzy - every query character occurs somewhere in the name or
//!    active ingredient (coverage, not edit distance)
//!
//! Tiers are concatenated in order, deduplicated by resolved product
//! identity keeping the first occurrence, and truncated to the limit.

use std::collections::HashSet;

use botica_core::Product;

/// Maximum results for the combined intelligent search.
pub const INTELLIGENT_RESULT_LIMIT: usize = 20;

/// Maximum results for the autocomplete dropdown.
pub const AUTOCOMPLETE_RESULT_LIMIT: usize = 10;

/// Combined tiered search, truncated to [`INTELLIGENT_RESULT_LIMIT`].
#[must_use]
pub fn intelligent_search(query: &str, products: &[Product]) -> Vec<Product> {
    ranked(query, products, INTELLIGENT_RESULT_LIMIT)
}

/// Tiered search for the autocomplete dropdown, truncated to
/// [`AUTOCOMPLETE_RESULT_LIMIT`].
#[must_use]
pub fn autocomplete(query: &str, products: &[Product]) -> Vec<Product> {
    ranked(query, products, AUTOCOMPLETE_RESULT_LIMIT)
}

/// Single-tier filter: fields starting with the query.
#[must_use]
pub fn prefix_search(query: &str, products: &[Product]) -> Vec<Product> {
    let Some(query) = normalized(query) else {
        return Vec::new();
    };
    products
        .iter()
        .filter(|product| {
            compared_fields(product)
                .iter()
                .any(|field| field.starts_with(&query))
        })
        .cloned()
        .collect()
}

/// Single-tier filter: character-coverage fuzzy match over name and
/// active ingredient.
#[must_use]
pub fn fuzzy_search(query: &str, products: &[Product]) -> Vec<Product> {
    let Some(query) = normalized(query) else {
        return Vec::new();
    };
    products
        .iter()
        .filter(|product| fuzzy_covers(&query, product))
        .cloned()
        .collect()
}

/// Trim and lowercase the query; `None` when blank.
fn normalized(query: &str) -> Option<String> {
    let query = query.trim();
    if query.is_empty() {
        None
    } else {
        Some(query.to_lowercase())
    }
}

/// The three compared fields, lowercased.
fn compared_fields(product: &Product) -> [String; 3] {
    [
        product.name.to_lowercase(),
        product.active_ingredient.to_lowercase(),
        product.dosage_form.to_lowercase(),
    ]
}

/// Every query character occurs somewhere in the name or active
/// ingredient. Order-independent coverage, not similarity.
fn fuzzy_covers(query: &str, product: &Product) -> bool {
    let name = product.name.to_lowercase();
    let ingredient = product.active_ingredient.to_lowercase();
    query
        .chars()
        .all(|c| name.contains(c) || ingredient.contains(c))
}

fn ranked(query: &str, products: &[Product], limit: usize) -> Vec<Product> {
    let Some(query) = normalized(query) else {
        return Vec::new();
    };

    let mut exact = Vec::new();
    let mut prefix = Vec::new();
    let mut partial = Vec::new();
    let mut fuzzy = Vec::new();

    for product in products {
        let fields = compared_fields(product);

        if fields.iter().any(|field| *field == query) {
            exact.push(product);
        } else if fields.iter().any(|field| field.starts_with(&query)) {
            prefix.push(product);
        } else if fields.iter().any(|field| field.contains(&query)) {
            partial.push(product);
        } else if fuzzy_covers(&query, product) {
            fuzzy.push(product);
        }
    }

    let mut seen: HashSet<String> = HashSet::new();
    exact
        .into_iter()
        .chain(prefix)
        .chain(partial)
        .chain(fuzzy)
        .filter(|product| seen.insert(product.key().to_string()))
        .take(limit)
        .cloned()
        .collect()
}
