//! Shared helper functions for CLI commands

use console::{style, StyledObject};
use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::expiry::ExpiryStatus;
use crate::core::identity::ProductId;
use crate::core::inventory::Inventory;
use crate::core::persist::FileKvStore;

/// Open the inventory backed by the resolved data directory
pub fn open_inventory(global: &GlobalOpts, config: &Config) -> Result<Inventory<FileKvStore>> {
    let dir = config
        .resolve_data_dir(global.data_dir.as_deref())
        .map_err(|e| miette::miette!("{}", e))?;
    let kv = FileKvStore::open(&dir).map_err(|e| miette::miette!("{}", e))?;
    Inventory::open(kv, config.dims(), config.undo_capacity)
        .map_err(|e| miette::miette!("{}", e))
}

/// Resolve a full or partial id against the current collection.
///
/// Exact match wins; otherwise a unique prefix match is accepted.
pub fn resolve_id(
    inventory: &Inventory<FileKvStore>,
    text: &str,
) -> Result<ProductId> {
    let exact = inventory.products().iter().find(|p| p.id.as_str() == text);
    if let Some(product) = exact {
        return Ok(product.id.clone());
    }

    let matches: Vec<&ProductId> = inventory
        .products()
        .iter()
        .filter(|p| p.id.as_str().starts_with(text))
        .map(|p| &p.id)
        .collect();
    match matches.as_slice() {
        [id] => Ok((*id).clone()),
        [] => Err(miette::miette!("no product with id '{}'", text)),
        many => Err(miette::miette!(
            "id '{}' is ambiguous ({} matches); use more characters",
            text,
            many.len()
        )),
    }
}

/// Format a ProductId for display, truncating if too long
pub fn format_short_id(id: &ProductId) -> String {
    truncate_str(id.as_str(), 16)
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Escape a string for CSV output (RFC 4180)
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Styled status label for an expiry tier
pub fn status_label(status: ExpiryStatus) -> StyledObject<&'static str> {
    match status {
        ExpiryStatus::None => style("-").dim(),
        ExpiryStatus::Expired => style("EXPIRED").red().bold(),
        ExpiryStatus::Red => style("red").red(),
        ExpiryStatus::Yellow => style("yellow").yellow(),
        ExpiryStatus::Green => style("green").green(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_short_id_truncates_generated() {
        let id = ProductId::generate();
        let formatted = format_short_id(&id);
        // PRD- + ULID is 30 chars, so this always truncates
        assert_eq!(formatted.chars().count(), 16);
        assert!(formatted.ends_with("..."));
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
    }

    #[test]
    fn test_truncate_str_multibyte_safe() {
        assert_eq!(truncate_str("città però lontana", 10), "città p...");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
    }
}
