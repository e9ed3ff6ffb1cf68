use clap::Parser as _;
use miette::IntoDiagnostic as _;

use scanq::cli::{Cli, Commands};
use scanq::commands;
use scanq::config::RootConfig;

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    let config = RootConfig::resolve(cli.base_url.as_deref())?;

    let runtime = tokio::runtime::Runtime::new().into_diagnostic()?;

    runtime.block_on(async {
        match cli.command {
            Commands::Submit(args) => commands::submit::run(args, &config).await,
            Commands::List(args) => commands::list::run(args, &config).await,
            Commands::Show(args) => commands::show::run(args, &config).await,
            Commands::Report(args) => commands::report::run(args, &config).await,
            Commands::Watch(args) => commands::watch::run(args, &config).await,
        }
    })
}

fn init_tracing(verbose: bool) -> miette::Result<()> {
    let level = if verbose { "scanq=debug" } else { "warn" };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SCANQ_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Logs go to stderr so stdout stays clean for command output.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| miette::miette!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
