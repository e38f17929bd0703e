//! Import normalization
//!
//! Converts arbitrary external JSON into valid product records. The input is
//! untrusted and heterogeneous (hand-edited files, exports from older tools,
//! misconfigured fetches that saved an HTML error page), so this is the one
//! place in the core that raises distinguishable error kinds; per-entry
//! problems degrade gracefully and never abort the batch.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;

use crate::core::grid::{GridDims, Position};
use crate::core::identity::ProductId;
use crate::core::product::{Placement, Product};

/// Object keys recognized as holding the product list, tried in order
pub const LIST_KEYS: &[&str] = &["products", "items"];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("input is not valid UTF-8")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),

    /// A common failure mode: a misconfigured fetch saved an HTML page
    /// instead of JSON. Caught before parsing for a clearer message.
    #[error("input looks like an HTML document, not JSON")]
    LooksLikeHtml,

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no product list found (expected a JSON array, or an object with a `products` or `items` array)")]
    InvalidFormat,
}

/// The outcome of a normalization pass, with per-entry degradation counts
/// for user messaging
#[derive(Debug, Clone, Default)]
pub struct NormalizedImport {
    pub products: Vec<Product>,
    /// Entries dropped entirely (not an object, or no identifying field)
    pub dropped: usize,
    /// Ids regenerated because they duplicated an earlier entry
    pub reassigned_ids: usize,
    /// Grid positions dropped (invalid, out of bounds, or cell collision);
    /// the products themselves were kept, shelf-only
    pub dropped_positions: usize,
}

/// Decode raw import bytes: UTF-8, with an optional leading BOM stripped
pub fn decode(bytes: Vec<u8>) -> Result<String, ImportError> {
    let text = String::from_utf8(bytes)?;
    Ok(text
        .strip_prefix('\u{feff}')
        .map(str::to_string)
        .unwrap_or(text))
}

/// Parse and normalize import text. The store is never touched here; the
/// caller replaces its collection only on success.
pub fn normalize(
    text: &str,
    dims: GridDims,
    now: DateTime<Utc>,
) -> Result<NormalizedImport, ImportError> {
    let trimmed = text.trim_start_matches('\u{feff}').trim();
    if trimmed.starts_with('<') {
        return Err(ImportError::LooksLikeHtml);
    }
    let value: Value = serde_json::from_str(trimmed)?;
    normalize_value(&value, dims, now)
}

/// Normalize an already-parsed JSON value
pub fn normalize_value(
    value: &Value,
    dims: GridDims,
    now: DateTime<Utc>,
) -> Result<NormalizedImport, ImportError> {
    let entries = match value {
        Value::Array(list) => list,
        Value::Object(map) => LIST_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .ok_or(ImportError::InvalidFormat)?,
        _ => return Err(ImportError::InvalidFormat),
    };

    let mut out = NormalizedImport::default();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut taken_cells: HashSet<Position> = HashSet::new();

    for entry in entries {
        let Value::Object(obj) = entry else {
            out.dropped += 1;
            continue;
        };

        let name = string_field(obj, &["name"]);
        let lot = string_field(obj, &["lot"]);
        let expiry_text = string_field(obj, &["expiry", "expiryText", "expiry_text"]);
        if name.trim().is_empty() && lot.trim().is_empty() && expiry_text.trim().is_empty() {
            out.dropped += 1;
            continue;
        }

        let id = match ProductId::from_external(&string_field(obj, &["id"])) {
            Some(id) if !seen_ids.contains(id.as_str()) => id,
            Some(_) => {
                out.reassigned_ids += 1;
                ProductId::generate()
            }
            None => ProductId::generate(),
        };
        seen_ids.insert(id.as_str().to_string());

        let date_added = obj
            .get("date_added")
            .or_else(|| obj.get("dateAdded"))
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(now);

        let picked = ["picked", "inPrelievo", "in_prelievo"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_bool))
            .unwrap_or(false);

        let placement = if picked {
            // a picked product never holds a live cell, but may carry a
            // validated backup position for later return
            let previous = position_field(
                obj,
                &["prev_row", "prevRow", "_prevRow"],
                &["prev_col", "prevCol", "_prevCol"],
                dims,
            );
            Placement::Picked { previous }
        } else {
            let wanted = obj.contains_key("row") || obj.contains_key("col");
            match position_field(obj, &["row"], &["col"], dims) {
                Some(pos) if taken_cells.insert(pos) => Placement::Cell(pos),
                Some(_) => {
                    // first-come-first-served within the batch; the loser
                    // keeps its data but goes shelf-only
                    out.dropped_positions += 1;
                    Placement::Shelf
                }
                None => {
                    if wanted {
                        out.dropped_positions += 1;
                    }
                    Placement::Shelf
                }
            }
        };

        out.products.push(Product {
            id,
            name,
            lot,
            expiry_text,
            date_added,
            placement,
        });
    }

    Ok(out)
}

/// First recognized key coerced to a string; numbers and booleans are
/// stringified, anything else is treated as absent
fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> String {
    for key in keys {
        match obj.get(*key) {
            Some(Value::String(s)) => return s.clone(),
            Some(Value::Number(n)) => return n.to_string(),
            Some(Value::Bool(b)) => return b.to_string(),
            _ => {}
        }
    }
    String::new()
}

/// A non-negative integral JSON number, if that is what the value is
fn cell_component(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    // numbers that passed through JavaScript arrive as floats; integral
    // values still count
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u32::MAX))
        .map(|f| f as u32)
}

/// An in-bounds position from the first recognized row/col key pair;
/// anything invalid is `None`, never an error
fn position_field(
    obj: &Map<String, Value>,
    row_keys: &[&str],
    col_keys: &[&str],
    dims: GridDims,
) -> Option<Position> {
    let row = row_keys.iter().find_map(|k| obj.get(*k).and_then(cell_component))?;
    let col = col_keys.iter().find_map(|k| obj.get(*k).and_then(cell_component))?;
    let pos = Position::new(row, col);
    dims.contains(pos).then_some(pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims() -> GridDims {
        GridDims::new(4, 4)
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn run(text: &str) -> Result<NormalizedImport, ImportError> {
        normalize(text, dims(), now())
    }

    #[test]
    fn test_direct_list_accepted() {
        let out = run(r#"[{"name":"Milk"},{"name":"Bread"}]"#).unwrap();
        assert_eq!(out.products.len(), 2);
        assert_eq!(out.products[0].name, "Milk");
    }

    #[test]
    fn test_products_and_items_keys_accepted() {
        assert_eq!(run(r#"{"products":[{"name":"X"}]}"#).unwrap().products.len(), 1);
        assert_eq!(run(r#"{"items":[{"name":"X"}]}"#).unwrap().products.len(), 1);
    }

    #[test]
    fn test_unrecognized_shape_is_invalid_format() {
        assert!(matches!(run(r#"{"foo":[{"name":"X"}]}"#), Err(ImportError::InvalidFormat)));
        assert!(matches!(run(r#""just a string""#), Err(ImportError::InvalidFormat)));
        assert!(matches!(run("42"), Err(ImportError::InvalidFormat)));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(run("{not json"), Err(ImportError::Parse(_))));
    }

    #[test]
    fn test_html_rejected_early() {
        assert!(matches!(
            run("<!DOCTYPE html><html></html>"),
            Err(ImportError::LooksLikeHtml)
        ));
        assert!(matches!(run("  <html>"), Err(ImportError::LooksLikeHtml)));
    }

    #[test]
    fn test_bom_stripped() {
        let out = run("\u{feff}[{\"name\":\"Milk\"}]").unwrap();
        assert_eq!(out.products.len(), 1);
    }

    #[test]
    fn test_decode_strips_utf8_bom_bytes() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"[]");
        assert_eq!(decode(bytes).unwrap(), "[]");
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        assert!(matches!(
            decode(vec![0xFF, 0xFE, 0x00]),
            Err(ImportError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_entry_without_identity_dropped_not_fatal() {
        let out = run(r#"[{"name":"Milk"},{},{"row":1},{"name":"  "}]"#).unwrap();
        assert_eq!(out.products.len(), 1);
        assert_eq!(out.dropped, 3);
    }

    #[test]
    fn test_non_object_entries_dropped() {
        let out = run(r#"[{"name":"Milk"},42,"x",null]"#).unwrap();
        assert_eq!(out.products.len(), 1);
        assert_eq!(out.dropped, 3);
    }

    #[test]
    fn test_missing_fields_defaulted() {
        let out = run(r#"[{"name":"Milk"}]"#).unwrap();
        let p = &out.products[0];
        assert_eq!(p.lot, "");
        assert_eq!(p.expiry_text, "");
        assert_eq!(p.placement, Placement::Shelf);
        assert!(!p.is_picked());
    }

    #[test]
    fn test_expiry_key_aliases() {
        let out = run(
            r#"[{"name":"a","expiry":"1"},{"name":"b","expiryText":"2"},{"name":"c","expiry_text":"3"}]"#,
        )
        .unwrap();
        assert_eq!(out.products[0].expiry_text, "1");
        assert_eq!(out.products[1].expiry_text, "2");
        assert_eq!(out.products[2].expiry_text, "3");
    }

    #[test]
    fn test_date_added_parsed_or_defaulted() {
        let out = run(
            r#"[{"name":"a","dateAdded":"2024-01-15T10:00:00Z"},{"name":"b","dateAdded":"yesterday"}]"#,
        )
        .unwrap();
        assert_eq!(
            out.products[0].date_added,
            "2024-01-15T10:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert!(out.products[1].date_added >= out.products[0].date_added);
    }

    #[test]
    fn test_numeric_name_stringified() {
        let out = run(r#"[{"name":42}]"#).unwrap();
        assert_eq!(out.products[0].name, "42");
    }

    #[test]
    fn test_external_id_preserved() {
        let out = run(r#"[{"id":"1699-abc","name":"Milk"}]"#).unwrap();
        assert_eq!(out.products[0].id.as_str(), "1699-abc");
        assert_eq!(out.reassigned_ids, 0);
    }

    #[test]
    fn test_duplicate_id_reassigned() {
        let out = run(r#"[{"id":"same","name":"a"},{"id":"same","name":"b"}]"#).unwrap();
        assert_eq!(out.products[0].id.as_str(), "same");
        assert_ne!(out.products[1].id.as_str(), "same");
        assert_eq!(out.reassigned_ids, 1);
    }

    #[test]
    fn test_missing_id_generated() {
        let out = run(r#"[{"name":"Milk"}]"#).unwrap();
        assert!(out.products[0].id.as_str().starts_with("PRD-"));
        assert_eq!(out.reassigned_ids, 0);
    }

    #[test]
    fn test_valid_position_kept() {
        let out = run(r#"[{"name":"Milk","row":2,"col":3}]"#).unwrap();
        assert_eq!(out.products[0].position(), Some(Position::new(2, 3)));
        assert_eq!(out.dropped_positions, 0);
    }

    #[test]
    fn test_invalid_positions_dropped_product_kept() {
        let out = run(
            r#"[
                {"name":"oob","row":9,"col":0},
                {"name":"negative","row":-1,"col":0},
                {"name":"fraction","row":1.5,"col":0},
                {"name":"lone","row":1},
                {"name":"typed","row":"one","col":"two"}
            ]"#,
        )
        .unwrap();
        assert_eq!(out.products.len(), 5);
        assert!(out.products.iter().all(|p| p.position().is_none()));
        assert_eq!(out.dropped_positions, 5);
    }

    #[test]
    fn test_integral_float_position_accepted() {
        let out = run(r#"[{"name":"Milk","row":2.0,"col":3.0}]"#).unwrap();
        assert_eq!(out.products[0].position(), Some(Position::new(2, 3)));
    }

    #[test]
    fn test_cell_collision_first_come_first_served() {
        let out = run(
            r#"[{"name":"winner","row":1,"col":1},{"name":"loser","row":1,"col":1}]"#,
        )
        .unwrap();
        assert_eq!(out.products[0].position(), Some(Position::new(1, 1)));
        assert_eq!(out.products[1].position(), None);
        assert_eq!(out.dropped_positions, 1);
    }

    #[test]
    fn test_picked_entry_never_holds_cell() {
        let out = run(
            r#"[{"name":"Milk","row":1,"col":1,"inPrelievo":true,"_prevRow":1,"_prevCol":1}]"#,
        )
        .unwrap();
        let p = &out.products[0];
        assert!(p.is_picked());
        assert_eq!(p.position(), None);
        assert_eq!(
            p.placement,
            Placement::Picked {
                previous: Some(Position::new(1, 1))
            }
        );
    }

    #[test]
    fn test_picked_alias_keys() {
        let out = run(r#"[{"name":"a","picked":true},{"name":"b","in_prelievo":true}]"#).unwrap();
        assert!(out.products.iter().all(|p| p.is_picked()));
    }

    #[test]
    fn test_empty_list_is_valid() {
        let out = run("[]").unwrap();
        assert!(out.products.is_empty());
        assert_eq!(out.dropped, 0);
    }

    #[test]
    fn test_idempotent_on_exported_data() {
        let first = run(
            r#"[
                {"name":"Milk","lot":"A1","expiry":"2025-01-01","row":0,"col":0},
                {"name":"Bread","lot":"B2","expiry":"01/06/2025"}
            ]"#,
        )
        .unwrap();
        let exported = serde_json::to_string(&first.products).unwrap();
        let second = run(&exported).unwrap();
        assert_eq!(second.products, first.products);
        assert_eq!(second.reassigned_ids, 0);
        assert_eq!(second.dropped, 0);
        assert_eq!(second.dropped_positions, 0);
    }
}
