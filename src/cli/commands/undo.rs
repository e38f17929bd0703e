//! `dispensa undo` command - revert the most recent change
//!
//! The snapshot stack is stored with the data, so undo works across
//! invocations. Consumption-only: there is no redo.

use console::style;
use miette::Result;

use crate::cli::helpers::open_inventory;
use crate::cli::GlobalOpts;
use crate::core::config::Config;

#[derive(clap::Args, Debug)]
pub struct UndoArgs {}

pub fn run(_args: UndoArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut inventory = open_inventory(global, &config)?;

    let undone = inventory.undo().map_err(|e| miette::miette!("{}", e))?;
    if !global.quiet {
        if undone {
            println!("{} Undid the last change", style("✓").green());
        } else {
            println!("{} Nothing to undo", style("·").dim());
        }
    }
    Ok(())
}
