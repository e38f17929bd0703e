//! `dispensa pick` command - take a product out for staging

use console::style;
use miette::Result;

use crate::cli::helpers::{open_inventory, resolve_id};
use crate::cli::GlobalOpts;
use crate::core::config::Config;

#[derive(clap::Args, Debug)]
pub struct PickArgs {
    /// Product id (full or unique prefix)
    pub id: String,
}

pub fn run(args: PickArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut inventory = open_inventory(global, &config)?;
    let id = resolve_id(&inventory, &args.id)?;

    let product = inventory
        .pick(&id)
        .map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Picked {}; it is locked until returned",
            style("✓").green(),
            style(product.label()).bold()
        );
    }
    Ok(())
}
