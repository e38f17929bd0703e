//! `dispensa import` command - replace the inventory from a JSON file
//!
//! Full overwrite semantics, so the pipeline only starts after an explicit
//! confirmation. Declining (or never answering) leaves the store untouched;
//! a confirmed import is still a single undo step.

use console::style;
use dialoguer::Confirm;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::helpers::open_inventory;
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::import;

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// JSON file to import (a list, or an object with a `products` or
    /// `items` list)
    pub file: PathBuf,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut inventory = open_inventory(global, &config)?;

    let bytes = fs::read(&args.file).into_diagnostic()?;
    let text = import::decode(bytes).map_err(|e| miette::miette!("{}", e))?;

    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Replace the entire inventory ({} product(s)) with the contents of {}?",
                inventory.products().len(),
                args.file.display()
            ))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let report = inventory
        .import_replace(&text)
        .map_err(|e| miette::miette!("{}", e))?;

    if global.quiet {
        return Ok(());
    }
    println!(
        "{} Imported {} product(s)",
        style("✓").green(),
        style(report.products.len()).cyan()
    );
    if report.dropped > 0 {
        println!(
            "  {} entr{} had no usable fields and were skipped",
            style(report.dropped).yellow(),
            if report.dropped == 1 { "y" } else { "ies" }
        );
    }
    if report.reassigned_ids > 0 {
        println!(
            "  {} duplicate id(s) were reassigned",
            style(report.reassigned_ids).yellow()
        );
    }
    if report.dropped_positions > 0 {
        println!(
            "  {} grid position(s) were invalid or collided; those products are shelf-only",
            style(report.dropped_positions).yellow()
        );
    }
    println!("{}", style("Undo with `dispensa undo`.").dim());

    Ok(())
}
