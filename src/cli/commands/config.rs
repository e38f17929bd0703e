//! `dispensa config` command - show the effective configuration

use console::style;
use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::config::Config;

#[derive(clap::Args, Debug)]
pub struct ConfigArgs {}

pub fn run(_args: ConfigArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();

    println!("{}", style("Effective configuration").bold());
    println!("  grid:          {}", config.dims());
    println!("  undo capacity: {}", config.undo_capacity);
    println!(
        "  expiry tiers:  red <= {} days, yellow <= {} days",
        config.red_days, config.yellow_days
    );

    let data_dir = config.resolve_data_dir(global.data_dir.as_deref());
    match data_dir {
        Ok(dir) => println!("  data dir:      {}", dir.display()),
        Err(_) => println!("  data dir:      {}", style("unresolved").red()),
    }
    match Config::config_file_path() {
        Some(path) if path.exists() => println!("  config file:   {}", path.display()),
        Some(path) => println!(
            "  config file:   {} {}",
            path.display(),
            style("(not present)").dim()
        ),
        None => println!("  config file:   {}", style("unavailable").dim()),
    }

    Ok(())
}
