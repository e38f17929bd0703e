//! `dispensa list` command - list and search products
//!
//! Products print most-recent-first, the order the store keeps them in.

use chrono::Local;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{escape_csv, format_short_id, open_inventory, status_label, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::expiry::classify;
use crate::core::product::{Placement, Product};

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search query (matches name, lot and expiry text, case-insensitive)
    pub query: Option<String>,

    /// Show only products out for picking
    #[arg(long, conflicts_with_all = ["placed", "shelf"])]
    pub picked: bool,

    /// Show only products placed on the grid
    #[arg(long, conflicts_with_all = ["picked", "shelf"])]
    pub placed: bool,

    /// Show only shelf products (no grid position)
    #[arg(long, conflicts_with_all = ["picked", "placed"])]
    pub shelf: bool,

    /// Show only the count
    #[arg(long)]
    pub count: bool,
}

pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let inventory = open_inventory(global, &config)?;

    let query = args.query.as_deref().unwrap_or("");
    let mut products: Vec<&Product> = inventory.search(query);
    if args.picked {
        products.retain(|p| p.is_picked());
    } else if args.placed {
        products.retain(|p| p.position().is_some());
    } else if args.shelf {
        products.retain(|p| matches!(p.placement, Placement::Shelf));
    }

    if args.count {
        println!("{}", products.len());
        return Ok(());
    }

    if products.is_empty() {
        if !global.quiet {
            match args.query {
                Some(q) => println!("No products match '{}'.", style(q).yellow()),
                None => println!("The inventory is empty."),
            }
        }
        return Ok(());
    }

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };
    let today = Local::now().date_naive();
    let thresholds = config.thresholds();

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&products).into_diagnostic()?
            );
        }
        OutputFormat::Csv => {
            println!("id,name,lot,expiry,status,placement");
            for p in &products {
                let status = classify(&p.expiry_text, today, thresholds).status;
                println!(
                    "{},{},{},{},{},{}",
                    escape_csv(p.id.as_str()),
                    escape_csv(&p.name),
                    escape_csv(&p.lot),
                    escape_csv(&p.expiry_text),
                    status,
                    escape_csv(&placement_text(p))
                );
            }
        }
        OutputFormat::Id => {
            for p in &products {
                println!("{}", p.id);
            }
        }
        OutputFormat::Tsv | OutputFormat::Auto => {
            println!(
                "{:<17} {:<24} {:<10} {:<12} {:<8} {:<10}",
                style("ID").bold(),
                style("NAME").bold(),
                style("LOT").bold(),
                style("EXPIRY").bold(),
                style("STATUS").bold(),
                style("WHERE").bold()
            );
            println!("{}", "-".repeat(85));
            for p in &products {
                let status = classify(&p.expiry_text, today, thresholds).status;
                println!(
                    "{:<17} {:<24} {:<10} {:<12} {:<8} {:<10}",
                    style(format_short_id(&p.id)).cyan(),
                    truncate_str(&p.name, 22),
                    truncate_str(&p.lot, 8),
                    truncate_str(&p.expiry_text, 10),
                    status_label(status),
                    placement_text(p)
                );
            }
            if !global.quiet {
                println!();
                println!("{} product(s)", style(products.len()).cyan());
            }
        }
    }

    Ok(())
}

fn placement_text(product: &Product) -> String {
    match product.placement {
        Placement::Shelf => "shelf".to_string(),
        Placement::Cell(pos) => pos.to_string(),
        Placement::Picked { .. } => "picked".to_string(),
    }
}
