//! `dispensa export` command - write the inventory as pretty JSON

use chrono::Local;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::helpers::open_inventory;
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::export;

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Output file (default: ./dispensa-export-<date>.json)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Print to stdout instead of writing a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
}

pub fn run(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let inventory = open_inventory(global, &config)?;

    let json = inventory
        .export_json()
        .map_err(|e| miette::miette!("{}", e))?;

    if args.stdout {
        println!("{json}");
        return Ok(());
    }

    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(export::file_name(Local::now().date_naive())));
    fs::write(&path, &json).into_diagnostic()?;

    if !global.quiet {
        println!(
            "{} Exported {} product(s) to {}",
            style("✓").green(),
            style(inventory.products().len()).cyan(),
            style(path.display()).yellow()
        );
    }
    Ok(())
}
