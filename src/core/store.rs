//! The product store: ordered collection, identity and lifecycle
//!
//! The store owns the grid index and rebuilds it at every mutation
//! boundary, so occupancy can never drift from the collection. Expected
//! edge cases come back as [`StoreError`] values; nothing in here panics.

use thiserror::Error;

use crate::core::grid::{GridDims, GridIndex, Position};
use crate::core::identity::ProductId;
use crate::core::product::{Placement, Product};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no product with id '{0}'")]
    NotFound(ProductId),

    #[error("product '{0}' is out for picking and locked until returned")]
    PickedLocked(ProductId),

    #[error("product '{0}' is already out for picking")]
    AlreadyPicked(ProductId),

    #[error("product '{0}' is not out for picking")]
    NotPicked(ProductId),

    #[error("position ({row}, {col}) is outside the {dims} grid")]
    OutOfBounds { row: u32, col: u32, dims: GridDims },

    #[error("cell ({row}, {col}) is already occupied")]
    CellOccupied { row: u32, col: u32 },
}

/// Fields for a new product; all optional, but at least one must be
/// non-empty for the add to take effect
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub name: String,
    pub lot: String,
    pub expiry_text: String,
}

impl ProductDraft {
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
            && self.lot.trim().is_empty()
            && self.expiry_text.trim().is_empty()
    }
}

/// Field changes for an edit; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub lot: Option<String>,
    pub expiry_text: Option<String>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.lot.is_none() && self.expiry_text.is_none()
    }
}

/// What happened when a picked product was returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnOutcome {
    /// Restored to its previous cell
    Restored(Position),
    /// Had no previous cell; now on the shelf
    Shelved,
    /// Previous cell is now occupied; left on the shelf, never silently
    /// placed elsewhere
    Blocked(Position),
}

/// The ordered product collection, most-recent-first
#[derive(Debug, Clone)]
pub struct ProductStore {
    products: Vec<Product>,
    grid: GridIndex,
}

impl ProductStore {
    pub fn new(dims: GridDims) -> Self {
        Self {
            products: Vec::new(),
            grid: GridIndex::new(dims),
        }
    }

    /// Build a store around an existing collection (persistence load)
    pub fn from_products(dims: GridDims, products: Vec<Product>) -> Self {
        let mut store = Self {
            products,
            grid: GridIndex::new(dims),
        };
        store.grid.rebuild(&store.products);
        store
    }

    pub fn dims(&self) -> GridDims {
        self.grid.dims()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn grid(&self) -> &GridIndex {
        &self.grid
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    fn index_of(&self, id: &ProductId) -> Option<usize> {
        self.products.iter().position(|p| &p.id == id)
    }

    /// Case-insensitive substring search over name, lot and expiry text
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let query = query.to_lowercase();
        self.products
            .iter()
            .filter(|p| p.matches(&query))
            .collect()
    }

    /// Add a product to the shelf, most-recent-first.
    ///
    /// Returns `None` without touching anything when every field is empty:
    /// a deliberate no-op, not an error.
    pub fn add(&mut self, draft: ProductDraft) -> Option<&Product> {
        if draft.is_empty() {
            return None;
        }
        let product = Product::new(
            draft.name.trim().to_string(),
            draft.lot.trim().to_string(),
            draft.expiry_text.trim().to_string(),
        );
        self.products.insert(0, product);
        self.grid.rebuild(&self.products);
        self.products.first()
    }

    /// Edit fields of a product; picked products are edit-locked
    pub fn edit(&mut self, id: &ProductId, update: ProductUpdate) -> Result<&Product, StoreError> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if self.products[idx].is_picked() {
            return Err(StoreError::PickedLocked(id.clone()));
        }

        let product = &mut self.products[idx];
        if let Some(name) = update.name {
            product.name = name.trim().to_string();
        }
        if let Some(lot) = update.lot {
            product.lot = lot.trim().to_string();
        }
        if let Some(expiry_text) = update.expiry_text {
            product.expiry_text = expiry_text.trim().to_string();
        }

        self.grid.rebuild(&self.products);
        Ok(&self.products[idx])
    }

    /// Remove a product unconditionally, vacating any cell it held
    pub fn remove(&mut self, id: &ProductId) -> Result<Product, StoreError> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let product = self.products.remove(idx);
        self.grid.rebuild(&self.products);
        Ok(product)
    }

    /// Place a product into a grid cell.
    ///
    /// The caller resolves collisions: a cell held by a different product is
    /// `CellOccupied`, never a silent overwrite. Re-placing a product on its
    /// own cell succeeds as a no-op.
    pub fn place(&mut self, id: &ProductId, pos: Position) -> Result<(), StoreError> {
        let dims = self.grid.dims();
        if !dims.contains(pos) {
            return Err(StoreError::OutOfBounds {
                row: pos.row,
                col: pos.col,
                dims,
            });
        }
        let idx = self
            .index_of(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if self.products[idx].is_picked() {
            return Err(StoreError::PickedLocked(id.clone()));
        }
        if let Some(occupant) = self.grid.product_at(pos) {
            if occupant != id {
                return Err(StoreError::CellOccupied {
                    row: pos.row,
                    col: pos.col,
                });
            }
        }

        self.products[idx].placement = Placement::Cell(pos);
        self.grid.rebuild(&self.products);
        Ok(())
    }

    /// Move a placed product back to the shelf
    pub fn unplace(&mut self, id: &ProductId) -> Result<(), StoreError> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if self.products[idx].is_picked() {
            return Err(StoreError::PickedLocked(id.clone()));
        }
        self.products[idx].placement = Placement::Shelf;
        self.grid.rebuild(&self.products);
        Ok(())
    }

    /// Take a product out for staging, remembering its cell for return
    pub fn pick(&mut self, id: &ProductId) -> Result<(), StoreError> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if self.products[idx].is_picked() {
            return Err(StoreError::AlreadyPicked(id.clone()));
        }
        let previous = self.products[idx].position();
        self.products[idx].placement = Placement::Picked { previous };
        self.grid.rebuild(&self.products);
        Ok(())
    }

    /// Return a picked product: back to its previous cell if that cell is
    /// still free, otherwise onto the shelf with a `Blocked` outcome
    pub fn put_back(&mut self, id: &ProductId) -> Result<ReturnOutcome, StoreError> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let Placement::Picked { previous } = self.products[idx].placement else {
            return Err(StoreError::NotPicked(id.clone()));
        };

        let dims = self.grid.dims();
        let outcome = match previous {
            Some(pos) if dims.contains(pos) && self.grid.is_free(pos) => {
                self.products[idx].placement = Placement::Cell(pos);
                ReturnOutcome::Restored(pos)
            }
            Some(pos) if dims.contains(pos) => {
                self.products[idx].placement = Placement::Shelf;
                ReturnOutcome::Blocked(pos)
            }
            // backup outside the configured grid (corrupt import): shelf
            _ => {
                self.products[idx].placement = Placement::Shelf;
                ReturnOutcome::Shelved
            }
        };
        self.grid.rebuild(&self.products);
        Ok(outcome)
    }

    /// Wholesale collection replacement (undo restore, import overwrite)
    pub fn replace_all(&mut self, products: Vec<Product>) {
        self.products = products;
        self.grid.rebuild(&self.products);
    }
}
