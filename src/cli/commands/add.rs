//! `dispensa add` command - add a product to the shelf

use console::style;
use miette::Result;

use crate::cli::helpers::open_inventory;
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::store::ProductDraft;

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Product name
    #[arg(long, short = 'n', default_value = "")]
    pub name: String,

    /// Lot / batch code
    #[arg(long, short = 'l', default_value = "")]
    pub lot: String,

    /// Expiry date text, free form (e.g. 2026-03-01 or 01/03/2026)
    #[arg(long, short = 'e', default_value = "")]
    pub expiry: String,
}

pub fn run(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut inventory = open_inventory(global, &config)?;

    let draft = ProductDraft {
        name: args.name,
        lot: args.lot,
        expiry_text: args.expiry,
    };

    match inventory.add(draft).map_err(|e| miette::miette!("{}", e))? {
        Some(product) => {
            if global.quiet {
                println!("{}", product.id);
            } else {
                println!(
                    "{} Added {} {}",
                    style("✓").green(),
                    style(product.label()).bold(),
                    style(format!("({})", product.id)).dim()
                );
            }
        }
        None => {
            // deliberate no-op, not an error: nothing was given to save
            if !global.quiet {
                println!(
                    "{} Nothing to add: name, lot and expiry are all empty",
                    style("·").dim()
                );
            }
        }
    }

    Ok(())
}
