//! Detection of identifier-like column names.

use once_cell::sync::Lazy;
use regex::Regex;

// Compiled once on first use
static ID_NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // "id", "user_id", "ID-number", "order id"
        Regex::new(r"(?:^|[^A-Za-z])[Ii][Dd](?:$|[^A-Za-z])").expect("Invalid regex: id token"),
        // camelCase "userId", "orderID"
        Regex::new(r"[a-z]I[Dd](?:$|[^a-z])").expect("Invalid regex: camelCase id"),
        Regex::new(r"(?i)uuid|guid").expect("Invalid regex: uuid"),
    ]
});

/// True if a column name suggests it holds row identifiers.
///
/// Matches `id` as a separate token or camelCase suffix, so `user_id` and
/// `userId` match while `width` and `valid` do not.
pub fn is_identifier_like(name: &str) -> bool {
    ID_NAME_PATTERNS.iter().any(|p| p.is_match(name))
}
