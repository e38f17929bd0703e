//! `dispensa return` command - bring a picked product back
//!
//! The product goes back to the exact cell it was picked from, but only if
//! that cell is still free; otherwise it lands on the shelf and the blocked
//! cell is reported.

use console::style;
use miette::Result;

use crate::cli::helpers::{open_inventory, resolve_id};
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::store::ReturnOutcome;

#[derive(clap::Args, Debug)]
pub struct ReturnArgs {
    /// Product id (full or unique prefix)
    pub id: String,
}

pub fn run(args: ReturnArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut inventory = open_inventory(global, &config)?;
    let id = resolve_id(&inventory, &args.id)?;

    let outcome = inventory
        .put_back(&id)
        .map_err(|e| miette::miette!("{}", e))?;

    if global.quiet {
        return Ok(());
    }
    match outcome {
        ReturnOutcome::Restored(pos) => {
            println!(
                "{} Returned to its cell {}",
                style("✓").green(),
                style(pos).cyan()
            );
        }
        ReturnOutcome::Shelved => {
            println!(
                "{} Returned to the shelf (it had no saved cell)",
                style("✓").green()
            );
        }
        ReturnOutcome::Blocked(pos) => {
            println!(
                "{} Cell {} is now occupied; left on the shelf instead",
                style("!").yellow(),
                style(pos).cyan()
            );
        }
    }
    Ok(())
}
