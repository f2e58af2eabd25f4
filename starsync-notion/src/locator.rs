//! Turning a Notion table URL into a database id.

use starsync_core::TableError;

/// Extract the database id from a Notion URL or bare id.
///
/// Accepts `https://www.notion.so/<ws>/<Title>-<32 hex>?v=<view>`, a
/// 32-digit hex id, or the dashed UUID form. Returns the dashed form.
pub fn database_id(locator: &str) -> Result<String, TableError> {
    let invalid = || TableError::InvalidLocator(locator.to_string());

    let trimmed = locator.trim();
    let without_query = trimmed
        .split(['?', '#'])
        .next()
        .unwrap_or(trimmed)
        .trim_end_matches('/');
    let segment = without_query.rsplit('/').next().unwrap_or(without_query);

    let compact: Vec<char> = segment.chars().filter(|c| *c != '-').collect();
    if compact.len() < 32 {
        return Err(invalid());
    }
    let hex: String = compact[compact.len() - 32..].iter().collect();
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let hex = hex.to_ascii_lowercase();
    Ok(format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    ))
}
