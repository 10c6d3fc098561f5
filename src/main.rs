use clap::Parser;
use tally::cli::commands::Cli;
use tally::cli::handlers::{self, Context};
use tally::io::{config_io, logging};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_io::resolve_config_path(cli.config.as_deref())?;
    let config = config_io::read_config(&config_path)?;

    // A broken log file must not stop the program
    let level = logging::parse_level(&config.log.level, cli.verbose);
    if let Err(e) = logging::setup_logging(&logging::default_log_path(), level) {
        eprintln!("warning: logging disabled: {}", e);
    }

    let ctx = Context {
        config,
        config_path,
        offline: cli.offline,
        json: cli.json,
    };

    match cli.command {
        // No subcommand → launch TUI
        None => tally::tui::run(&ctx),
        Some(command) => handlers::dispatch(command, &ctx),
    }
}
