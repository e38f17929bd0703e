//! JSON export of the full product collection

use chrono::NaiveDate;

use crate::core::product::Product;

/// Prefix for suggested export file names
pub const EXPORT_PREFIX: &str = "dispensa-export";

/// Pretty-printed (2-space indent) JSON array of the collection, in the
/// same flat wire shape the importer accepts
pub fn to_pretty_json(products: &[Product]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(products)
}

/// Suggested file name: identifying prefix plus the current date
pub fn file_name(today: NaiveDate) -> String {
    format!("{}-{}.json", EXPORT_PREFIX, today.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_is_pretty_with_two_space_indent() {
        let products = vec![Product::new("Milk".into(), "A1".into(), String::new())];
        let json = to_pretty_json(&products).unwrap();
        assert!(json.starts_with("[\n  {"));
        assert!(json.contains("\"name\": \"Milk\""));
    }

    #[test]
    fn test_file_name_carries_prefix_and_date() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        assert_eq!(file_name(today), "dispensa-export-2026-08-06.json");
    }
}
