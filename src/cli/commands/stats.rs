//! `dispensa stats` command - statistics derived from the event log
//!
//! All aggregation happens on demand from the append-only log; nothing is
//! maintained incrementally.

use chrono::{Duration, Local};
use console::style;
use miette::Result;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::open_inventory;
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::events::EventKind;
use crate::core::expiry::{classify, ExpiryStatus};

#[derive(clap::Args, Debug)]
pub struct StatsArgs {}

pub fn run(_args: StatsArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let inventory = open_inventory(global, &config)?;
    let stats = inventory.events().stats();

    println!("{}", style("Activity").bold());
    let mut builder = Builder::default();
    builder.push_record(["action", "count"]);
    for kind in EventKind::all() {
        builder.push_record([kind.as_str().to_string(), stats.count(*kind).to_string()]);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");

    println!();
    println!("{}", style("Current stock by expiry tier").bold());
    let today = Local::now().date_naive();
    let thresholds = config.thresholds();
    let mut tiers = [0usize; 5];
    for product in inventory.products() {
        let idx = match classify(&product.expiry_text, today, thresholds).status {
            ExpiryStatus::Expired => 0,
            ExpiryStatus::Red => 1,
            ExpiryStatus::Yellow => 2,
            ExpiryStatus::Green => 3,
            ExpiryStatus::None => 4,
        };
        tiers[idx] += 1;
    }
    let mut builder = Builder::default();
    builder.push_record(["tier", "products"]);
    for (label, count) in ["expired", "red", "yellow", "green", "no date"]
        .iter()
        .zip(tiers)
    {
        builder.push_record([label.to_string(), count.to_string()]);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");

    if !stats.top_added.is_empty() {
        println!();
        println!("{}", style("Most added").bold());
        for (name, count) in &stats.top_added {
            println!("  {:<30} {}", name, style(count).cyan());
        }
    }
    if !stats.top_removed.is_empty() {
        println!();
        println!("{}", style("Most removed").bold());
        for (name, count) in &stats.top_removed {
            println!("  {:<30} {}", name, style(count).cyan());
        }
    }

    println!();
    match stats.average_dwell {
        Some(dwell) => println!("Average dwell time: {}", style(humanize(dwell)).cyan()),
        None => println!("Average dwell time: {}", style("n/a").dim()),
    }

    Ok(())
}

fn humanize(duration: Duration) -> String {
    let days = duration.num_days();
    let hours = duration.num_hours() % 24;
    let minutes = duration.num_minutes() % 60;
    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes.max(0))
    }
}
