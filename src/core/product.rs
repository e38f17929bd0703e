//! The product record and its placement state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::grid::Position;
use crate::core::identity::ProductId;

/// Where a product currently lives.
///
/// A product has a grid position iff it is `Cell`; a picked product keeps
/// the cell it came from (if any) so `return` can restore it, but never
/// occupies a cell itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// On a shelf, no grid position
    #[default]
    Shelf,
    /// Occupying exactly one grid cell
    Cell(Position),
    /// Out for staging; `previous` is the cell to return to
    Picked { previous: Option<Position> },
}

impl Placement {
    /// The currently occupied cell, if any
    pub fn position(&self) -> Option<Position> {
        match self {
            Placement::Cell(pos) => Some(*pos),
            _ => None,
        }
    }

    pub fn is_picked(&self) -> bool {
        matches!(self, Placement::Picked { .. })
    }
}

/// A tracked product
///
/// `expiry_text` stays free-form text; classification into status tiers
/// happens at read time (see [`crate::core::expiry`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProductRecord", into = "ProductRecord")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub lot: String,
    pub expiry_text: String,
    pub date_added: DateTime<Utc>,
    pub placement: Placement,
}

impl Product {
    /// Create a new shelf product with a fresh id and the current time
    pub fn new(name: String, lot: String, expiry_text: String) -> Self {
        Self {
            id: ProductId::generate(),
            name,
            lot,
            expiry_text,
            date_added: Utc::now(),
            placement: Placement::Shelf,
        }
    }

    pub fn position(&self) -> Option<Position> {
        self.placement.position()
    }

    pub fn is_picked(&self) -> bool {
        self.placement.is_picked()
    }

    /// Case-insensitive substring match over name, lot and expiry text.
    /// `query` must already be lowercased.
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query)
            || self.lot.to_lowercase().contains(query)
            || self.expiry_text.to_lowercase().contains(query)
    }

    /// A short human label: name, falling back to lot, then expiry text
    pub fn label(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if !self.lot.is_empty() {
            &self.lot
        } else {
            &self.expiry_text
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Flat wire shape used for persistence and export.
///
/// Exports stay flat JSON (optional `row`/`col`, boolean `picked`) so that
/// exported files re-import idempotently and stay readable by other tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProductRecord {
    id: ProductId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    lot: String,
    #[serde(default, rename = "expiry")]
    expiry_text: String,
    date_added: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    row: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    col: Option<u32>,
    #[serde(default, skip_serializing_if = "is_false")]
    picked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prev_row: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prev_col: Option<u32>,
}

impl From<ProductRecord> for Product {
    fn from(rec: ProductRecord) -> Self {
        // picked wins over a (stale) row/col pair; a lone row or col is no
        // position at all
        let placement = if rec.picked {
            let previous = match (rec.prev_row, rec.prev_col) {
                (Some(row), Some(col)) => Some(Position::new(row, col)),
                _ => None,
            };
            Placement::Picked { previous }
        } else if let (Some(row), Some(col)) = (rec.row, rec.col) {
            Placement::Cell(Position::new(row, col))
        } else {
            Placement::Shelf
        };

        Self {
            id: rec.id,
            name: rec.name,
            lot: rec.lot,
            expiry_text: rec.expiry_text,
            date_added: rec.date_added,
            placement,
        }
    }
}

impl From<Product> for ProductRecord {
    fn from(product: Product) -> Self {
        let (row, col, picked, prev_row, prev_col) = match product.placement {
            Placement::Shelf => (None, None, false, None, None),
            Placement::Cell(pos) => (Some(pos.row), Some(pos.col), false, None, None),
            Placement::Picked { previous } => (
                None,
                None,
                true,
                previous.map(|p| p.row),
                previous.map(|p| p.col),
            ),
        };

        Self {
            id: product.id,
            name: product.name,
            lot: product.lot,
            expiry_text: product.expiry_text,
            date_added: product.date_added,
            row,
            col,
            picked,
            prev_row,
            prev_col,
        }
    }
}
