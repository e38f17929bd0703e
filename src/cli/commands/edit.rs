//! `dispensa edit` command - change a product's fields

use console::style;
use miette::Result;

use crate::cli::helpers::{open_inventory, resolve_id};
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::store::ProductUpdate;

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Product id (full or unique prefix)
    pub id: String,

    /// New product name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// New lot / batch code
    #[arg(long, short = 'l')]
    pub lot: Option<String>,

    /// New expiry date text
    #[arg(long, short = 'e')]
    pub expiry: Option<String>,
}

pub fn run(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut inventory = open_inventory(global, &config)?;
    let id = resolve_id(&inventory, &args.id)?;

    let update = ProductUpdate {
        name: args.name,
        lot: args.lot,
        expiry_text: args.expiry,
    };
    if update.is_empty() {
        println!(
            "{} Nothing to change; pass --name, --lot or --expiry",
            style("·").dim()
        );
        return Ok(());
    }

    let product = inventory
        .edit(&id, update)
        .map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Updated {} {}",
            style("✓").green(),
            style(product.label()).bold(),
            style(format!("({})", product.id)).dim()
        );
    }
    Ok(())
}
