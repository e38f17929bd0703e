//! `dispensa unplace` command - move a placed product back to the shelf

use console::style;
use miette::Result;

use crate::cli::helpers::{open_inventory, resolve_id};
use crate::cli::GlobalOpts;
use crate::core::config::Config;

#[derive(clap::Args, Debug)]
pub struct UnplaceArgs {
    /// Product id (full or unique prefix)
    pub id: String,
}

pub fn run(args: UnplaceArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut inventory = open_inventory(global, &config)?;
    let id = resolve_id(&inventory, &args.id)?;

    let product = inventory
        .unplace(&id)
        .map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} {} is back on the shelf",
            style("✓").green(),
            style(product.label()).bold()
        );
    }
    Ok(())
}
