//! Dispensa: shelf-map inventory tracker
//!
//! A CLI for tracking a small shop's inventory: products live on a shelf
//! (unplaced) or in cells of a fixed grid map, with expiry status tiers,
//! a bounded undo history and JSON import/export.

pub mod cli;
pub mod core;
