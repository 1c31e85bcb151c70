mod cli;

use clap::Parser;
use cli::{output, Cli, Commands};
use spvbake_core::runner::exit_status;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("SPVBAKE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Build(args) => cli::build::execute(args),
        Commands::List(args) => cli::list::execute(args),
        Commands::Completions(args) => cli::completions::execute::<Cli>(args),
    };

    let status = exit_status(&result);
    if let Err(e) = result {
        output::error(&e.to_string());
    }
    std::process::exit(status);
}
