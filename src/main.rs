use clap::Parser;
use dispensa::cli::{Cli, Commands};
use miette::Result;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix
    // piping. Without this, piping to `head`, `grep -q`, etc. causes a panic
    // on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Init(args) => dispensa::cli::commands::init::run(args, &global),
        Commands::Add(args) => dispensa::cli::commands::add::run(args, &global),
        Commands::List(args) => dispensa::cli::commands::list::run(args, &global),
        Commands::Edit(args) => dispensa::cli::commands::edit::run(args, &global),
        Commands::Rm(args) => dispensa::cli::commands::rm::run(args, &global),
        Commands::Place(args) => dispensa::cli::commands::place::run(args, &global),
        Commands::Unplace(args) => dispensa::cli::commands::unplace::run(args, &global),
        Commands::Pick(args) => dispensa::cli::commands::pick::run(args, &global),
        Commands::Return(args) => dispensa::cli::commands::ret::run(args, &global),
        Commands::Undo(args) => dispensa::cli::commands::undo::run(args, &global),
        Commands::Grid(args) => dispensa::cli::commands::grid::run(args, &global),
        Commands::Stats(args) => dispensa::cli::commands::stats::run(args, &global),
        Commands::Import(args) => dispensa::cli::commands::import::run(args, &global),
        Commands::Export(args) => dispensa::cli::commands::export::run(args, &global),
        Commands::Config(args) => dispensa::cli::commands::config::run(args, &global),
        Commands::Completions(args) => dispensa::cli::commands::completions::run(args),
    }
}
