//! `dispensa place` command - put a product into a grid cell
//!
//! Cell collisions come back as errors; choosing a different cell is the
//! operator's call, never a silent overwrite.

use console::style;
use miette::Result;

use crate::cli::helpers::{open_inventory, resolve_id};
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::grid::Position;

#[derive(clap::Args, Debug)]
pub struct PlaceArgs {
    /// Product id (full or unique prefix)
    pub id: String,

    /// Grid row, zero-based
    pub row: u32,

    /// Grid column, zero-based
    pub col: u32,
}

pub fn run(args: PlaceArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut inventory = open_inventory(global, &config)?;
    let id = resolve_id(&inventory, &args.id)?;
    let pos = Position::new(args.row, args.col);

    let product = inventory
        .place(&id, pos)
        .map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Placed {} at {}",
            style("✓").green(),
            style(product.label()).bold(),
            style(pos).cyan()
        );
    }
    Ok(())
}
