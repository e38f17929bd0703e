//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    add::AddArgs,
    completions::CompletionsArgs,
    config::ConfigArgs,
    edit::EditArgs,
    export::ExportArgs,
    grid::GridArgs,
    import::ImportArgs,
    init::InitArgs,
    list::ListArgs,
    pick::PickArgs,
    place::PlaceArgs,
    ret::ReturnArgs,
    rm::RmArgs,
    stats::StatsArgs,
    undo::UndoArgs,
    unplace::UnplaceArgs,
};

#[derive(Parser)]
#[command(name = "dispensa")]
#[command(author, version, about = "Dispensa - shelf-map inventory tracker")]
#[command(
    long_about = "A CLI for tracking a small shop's inventory: products on shelves or in cells of a fixed grid map, with expiry status tiers, a bounded undo history, statistics and JSON import/export."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Data directory (default: per-user data dir)
    #[arg(long, global = true, env = "DISPENSA_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the data directory and a config file template
    Init(InitArgs),

    /// Add a product to the shelf
    Add(AddArgs),

    /// List products, optionally filtered by a search query
    List(ListArgs),

    /// Edit a product's fields
    Edit(EditArgs),

    /// Remove a product
    Rm(RmArgs),

    /// Place a product into a grid cell
    Place(PlaceArgs),

    /// Move a placed product back to the shelf
    Unplace(UnplaceArgs),

    /// Take a product out for staging (its cell is remembered for return)
    Pick(PickArgs),

    /// Return a picked product to its previous cell
    #[command(name = "return")]
    Return(ReturnArgs),

    /// Undo the most recent change
    Undo(UndoArgs),

    /// Show the grid occupancy map
    Grid(GridArgs),

    /// Show statistics derived from the event log
    Stats(StatsArgs),

    /// Import a JSON file, replacing the whole inventory
    Import(ImportArgs),

    /// Export the inventory as pretty-printed JSON
    Export(ExportArgs),

    /// Show the effective configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically pick a format for the context
    #[default]
    Auto,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON (full fidelity)
    Json,
    /// CSV (for spreadsheets)
    Csv,
    /// Just ids, one per line
    Id,
}
