//! `dispensa rm` command - remove a product

use console::style;
use miette::Result;

use crate::cli::helpers::{open_inventory, resolve_id};
use crate::cli::GlobalOpts;
use crate::core::config::Config;

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Product id (full or unique prefix)
    pub id: String,
}

pub fn run(args: RmArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut inventory = open_inventory(global, &config)?;
    let id = resolve_id(&inventory, &args.id)?;

    let product = inventory
        .remove(&id)
        .map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Removed {} {}",
            style("✓").green(),
            style(product.label()).bold(),
            style(format!("({})", product.id)).dim()
        );
    }
    Ok(())
}
