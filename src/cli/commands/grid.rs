//! `dispensa grid` command - render the grid occupancy map

use chrono::Local;
use console::style;
use miette::Result;

use crate::cli::helpers::{format_short_id, open_inventory, truncate_str};
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::expiry::{classify, ExpiryStatus};
use crate::core::grid::Position;

#[derive(clap::Args, Debug)]
pub struct GridArgs {
    /// Also list every placed product under the map
    #[arg(long)]
    pub detail: bool,
}

pub fn run(args: GridArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let inventory = open_inventory(global, &config)?;
    let dims = inventory.dims();
    let today = Local::now().date_naive();
    let thresholds = config.thresholds();

    // column header
    print!("     ");
    for col in 0..dims.cols {
        print!("{:>3}", style(col).dim());
    }
    println!();

    for row in 0..dims.rows {
        print!("{:>4} ", style(row).dim());
        for col in 0..dims.cols {
            let pos = Position::new(row, col);
            match inventory.grid().product_at(pos) {
                Some(id) => {
                    let marker = match inventory.get(id) {
                        Some(p) => {
                            match classify(&p.expiry_text, today, thresholds).status {
                                ExpiryStatus::Expired => style("■").red().bold(),
                                ExpiryStatus::Red => style("■").red(),
                                ExpiryStatus::Yellow => style("■").yellow(),
                                ExpiryStatus::Green => style("■").green(),
                                ExpiryStatus::None => style("■").white(),
                            }
                        }
                        None => style("■").white(),
                    };
                    print!("{:>3}", marker);
                }
                None => print!("{:>3}", style("·").dim()),
            }
        }
        println!();
    }

    println!();
    println!(
        "{} of {} cells occupied",
        style(inventory.grid().occupied_count()).cyan(),
        dims.cell_count()
    );

    if args.detail {
        let mut placed: Vec<_> = inventory
            .products()
            .iter()
            .filter_map(|p| p.position().map(|pos| (pos, p)))
            .collect();
        placed.sort_by_key(|(pos, _)| (pos.row, pos.col));
        if !placed.is_empty() {
            println!();
            for (pos, p) in placed {
                println!(
                    "  {} {} {}",
                    style(pos).cyan(),
                    truncate_str(p.label(), 30),
                    style(format!("({})", format_short_id(&p.id))).dim()
                );
            }
        }
    }

    Ok(())
}
