//! `dispensa init` command - set up the data directory and config file

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::persist::FileKvStore;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config file with the default template
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();

    let data_dir = config
        .resolve_data_dir(global.data_dir.as_deref())
        .map_err(|e| miette::miette!("{}", e))?;
    let kv = FileKvStore::open(&data_dir).map_err(|e| miette::miette!("{}", e))?;
    println!(
        "{} Data directory ready at {}",
        style("✓").green(),
        style(kv.dir().display()).yellow()
    );

    if let Some(config_path) = Config::config_file_path() {
        if config_path.exists() && !args.force {
            println!(
                "{} Config file already exists at {} (use --force to overwrite)",
                style("·").dim(),
                config_path.display()
            );
        } else {
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).into_diagnostic()?;
            }
            std::fs::write(&config_path, Config::default_config_template()).into_diagnostic()?;
            println!(
                "{} Wrote config template to {}",
                style("✓").green(),
                style(config_path.display()).yellow()
            );
        }
    }

    Ok(())
}
