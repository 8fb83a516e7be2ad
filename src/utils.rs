//! Small string helpers shared by the scrapers and HTTP handlers.
//!
//! This module provides:
//! - Log-friendly truncation of upstream bodies
//! - Normalization of optional query parameters
//! - Case-insensitive category matching

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` bytes (backing off to a char boundary) and
/// get an ellipsis and byte count appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Treat a missing or empty query parameter as absent.
///
/// Whitespace-only values are kept: they are real (if useless) filters.
pub fn non_empty(param: Option<String>) -> Option<String> {
    param.filter(|p| !p.is_empty())
}

/// Case-insensitive equality between an article category and a filter.
pub fn category_matches(category: &str, filter: &str) -> bool {
    category.trim().to_lowercase() == filter.trim().to_lowercase()
}
